//! Seeded deck dealing for every world.
//!
//! Each deal samples the catalog without replacement in random order. Which
//! items are dealt comes from the deck stream; option order, inventory order
//! and beat schedules come from their own streams so they never disturb it.
use log::{debug, warn};
use rand::Rng;
use rand::seq::{SliceRandom, index};
use smallvec::SmallVec;

use crate::config::{DoctorCfg, EngineerCfg, InfluencerCfg, LawyerCfg, PoliticianCfg};
use crate::constants::{LANE_COUNT, LOG_TARGET_DECK};
use crate::data::{Catalogs, ContentType, LegalCase, PoliticalIssue};
use crate::numbers::usize_to_f64;
use crate::rng::RngBundle;
use crate::worlds::{Beat, Patient, ScheduledContent, ScheduledPuzzle};

/// Sample `min(count, catalog.len())` distinct items in random order.
///
/// Asking for more items than the catalog holds is not an error; the deal is
/// capped and a warning is logged.
pub fn select<T, R>(catalog: &[T], count: usize, rng: &mut R) -> Vec<T>
where
    T: Clone,
    R: Rng + ?Sized,
{
    let amount = count.min(catalog.len());
    if amount < count {
        warn!(
            target: LOG_TARGET_DECK,
            "requested {count} items from a catalog of {}; dealing {amount}",
            catalog.len()
        );
    }
    index::sample(rng, catalog.len(), amount)
        .into_iter()
        .filter_map(|idx| catalog.get(idx).cloned())
        .collect()
}

/// Deal patients, each with the correct diagnosis and distinct decoys shuffled together.
pub fn deal_patients(catalogs: &Catalogs, cfg: &DoctorCfg, rngs: &RngBundle) -> Vec<Patient> {
    let cases = select(&catalogs.patients, cfg.patients, &mut *rngs.deck());
    let pool = catalogs.diagnosis_pool();
    let decoys = cfg.option_count.saturating_sub(1);
    let mut layout = rngs.layout();
    let patients: Vec<Patient> = cases
        .into_iter()
        .map(|case| {
            let mut wrong: Vec<&str> = pool
                .iter()
                .copied()
                .filter(|diagnosis| *diagnosis != case.correct_diagnosis)
                .collect();
            wrong.shuffle(&mut *layout);
            let mut options: SmallVec<[String; 4]> =
                std::iter::once(case.correct_diagnosis.clone())
                    .chain(wrong.into_iter().take(decoys).map(String::from))
                    .collect();
            options.shuffle(&mut *layout);
            Patient { case, options }
        })
        .collect();
    debug!(target: LOG_TARGET_DECK, "dealt {} patients", patients.len());
    patients
}

pub fn deal_cases(catalogs: &Catalogs, cfg: &LawyerCfg, rngs: &RngBundle) -> Vec<LegalCase> {
    select(&catalogs.cases, cfg.cases, &mut *rngs.deck())
}

pub fn deal_issues(
    catalogs: &Catalogs,
    cfg: &PoliticianCfg,
    rngs: &RngBundle,
) -> Vec<PoliticalIssue> {
    select(&catalogs.issues, cfg.issues, &mut *rngs.deck())
}

/// Deal videos and synthesize a beat schedule for each.
pub fn deal_content(
    catalogs: &Catalogs,
    cfg: &InfluencerCfg,
    rngs: &RngBundle,
) -> Vec<ScheduledContent> {
    let picked = select(&catalogs.content, cfg.videos, &mut *rngs.deck());
    let mut beats_rng = rngs.beats();
    picked
        .into_iter()
        .map(|content| {
            let beats = synthesize_beats(&content, cfg, &mut *beats_rng);
            ScheduledContent { content, beats }
        })
        .collect()
}

/// Beat `i` lands at `(i + 1) * spacing / speed` plus uniform jitter, in a random lane.
pub fn synthesize_beats<R>(
    content: &ContentType,
    cfg: &InfluencerCfg,
    rng: &mut R,
) -> SmallVec<[Beat; 12]>
where
    R: Rng + ?Sized,
{
    let interval = cfg.beat_spacing / content.speed;
    (0..content.beat_count)
        .map(|i| {
            let jitter = if cfg.beat_jitter > 0.0 {
                rng.gen_range(-cfg.beat_jitter..=cfg.beat_jitter)
            } else {
                0.0
            };
            let target_time = usize_to_f64(i + 1).mul_add(interval, jitter).max(0.0);
            Beat {
                target_time,
                lane: rng.gen_range(0..LANE_COUNT),
            }
        })
        .collect()
}

/// Deal puzzles with inventories shuffled away from target order.
pub fn deal_puzzles(
    catalogs: &Catalogs,
    cfg: &EngineerCfg,
    rngs: &RngBundle,
) -> Vec<ScheduledPuzzle> {
    let picked = select(&catalogs.puzzles, cfg.puzzles, &mut *rngs.deck());
    let mut layout = rngs.layout();
    picked
        .into_iter()
        .map(|puzzle| {
            let mut inventory: SmallVec<[_; 6]> = puzzle.components.iter().copied().collect();
            inventory.shuffle(&mut *layout);
            ScheduledPuzzle { puzzle, inventory }
        })
        .collect()
}
