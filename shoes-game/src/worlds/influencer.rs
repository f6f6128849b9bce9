//! Content studio: tap each beat on time while the energy meter drains.
//!
//! Unlike the single-answer worlds, a video stays in gameplay while its beats
//! are hit or missed independently. Misses are detected on every tick whether
//! or not the player acted, and the video completes once every beat is
//! resolved or the energy meter empties.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::career::CareerId;
use crate::config::InfluencerCfg;
use crate::constants::{INDICATOR_RATE, INDICATOR_SPAN, LANE_COUNT};
use crate::data::ContentType;
use crate::numbers::{percentage, usize_to_u32};
use crate::scoring::{HitQuality, classify_hit, grade_hit, grade_miss};
use crate::summary::{CREATOR_TABLE, GradeTable, Performance};
use crate::world::{GradingStrategy, SessionStats, Turn, Verdict, WorldPhase};

/// One scheduled beat; `target_time` is seconds since the video started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beat {
    pub target_time: f64,
    /// 0 = left, 1 = down, 2 = right.
    pub lane: u8,
}

/// A dealt video: catalog content plus its synthesized beat schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledContent {
    pub content: ContentType,
    pub beats: SmallVec<[Beat; 12]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "quality")]
pub enum BeatState {
    Pending,
    Hit(HitQuality),
    Missed,
}

impl BeatState {
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Hit counts for one video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeatCounts {
    pub perfect: u32,
    pub good: u32,
    pub ok: u32,
    pub missed: u32,
    pub pending: u32,
}

/// Live state of the video in play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub game_time: f64,
    pub energy: f64,
    /// Sweep position of the timing indicator in `[0, 700)`.
    pub indicator: f64,
    /// Status per beat, aligned with [`ScheduledContent::beats`].
    pub beats: Vec<BeatState>,
}

impl Stage {
    fn new(beat_count: usize, energy: f64) -> Self {
        Self {
            game_time: 0.0,
            energy,
            indicator: 0.0,
            beats: vec![BeatState::Pending; beat_count],
        }
    }

    /// Earliest beat that is neither hit nor missed.
    #[must_use]
    pub fn current_beat(&self) -> Option<usize> {
        self.beats.iter().position(|state| !state.is_resolved())
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.beats.iter().all(|state| state.is_resolved())
    }

    #[must_use]
    pub fn counts(&self) -> BeatCounts {
        let mut counts = BeatCounts::default();
        for state in &self.beats {
            let slot = match state {
                BeatState::Pending => &mut counts.pending,
                BeatState::Hit(HitQuality::Perfect) => &mut counts.perfect,
                BeatState::Hit(HitQuality::Good) => &mut counts.good,
                BeatState::Hit(HitQuality::Ok) => &mut counts.ok,
                BeatState::Missed => &mut counts.missed,
            };
            *slot += 1;
        }
        counts
    }
}

/// A tap on the timing bar, optionally aimed at one lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tap {
    pub lane: Option<u8>,
}

impl Tap {
    #[must_use]
    pub const fn any() -> Self {
        Self { lane: None }
    }

    #[must_use]
    pub const fn lane(lane: u8) -> Self {
        Self { lane: Some(lane) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfluencerWorld {
    cfg: InfluencerCfg,
}

impl InfluencerWorld {
    #[must_use]
    pub const fn new(cfg: InfluencerCfg) -> Self {
        Self { cfg }
    }

    #[must_use]
    pub const fn config(&self) -> &InfluencerCfg {
        &self.cfg
    }

    /// Beat a tap lands on, if any lies inside the ok window.
    fn tap_target(&self, item: &ScheduledContent, stage: &Stage, tap: Tap) -> Option<usize> {
        let current = stage.current_beat()?;
        let in_window = |index: usize| {
            item.beats.get(index).is_some_and(|beat| {
                (stage.game_time - beat.target_time).abs() <= self.cfg.ok_window
            })
        };
        match tap.lane {
            Some(lane) if lane >= LANE_COUNT => None,
            Some(lane) if item.beats.get(current).is_some_and(|beat| beat.lane != lane) => (current
                ..item.beats.len())
                .find(|&index| {
                    !stage.beats[index].is_resolved()
                        && item.beats[index].lane == lane
                        && in_window(index)
                }),
            _ => in_window(current).then_some(current),
        }
    }

    fn gain_energy(&self, stage: &mut Stage, quality: HitQuality) {
        let gain = match quality {
            HitQuality::Perfect => self.cfg.perfect_energy,
            HitQuality::Good => self.cfg.good_energy,
            HitQuality::Ok => 0.0,
        };
        stage.energy = (stage.energy + gain).min(self.cfg.starting_energy);
    }
}

impl GradingStrategy for InfluencerWorld {
    type Item = ScheduledContent;
    type Board = Stage;
    type Action = Tap;

    fn career(&self) -> CareerId {
        CareerId::Influencer
    }

    fn review_phase(&self) -> WorldPhase {
        WorldPhase::Complete
    }

    fn time_budget(&self, _item: &ScheduledContent) -> Option<f64> {
        None
    }

    fn feedback_secs(&self) -> f64 {
        self.cfg.feedback_secs
    }

    // Every video starts a fresh streak.
    fn carries_combo(&self) -> bool {
        false
    }

    fn load(&self, item: &ScheduledContent) -> Stage {
        Stage::new(item.beats.len(), self.cfg.starting_energy)
    }

    fn cursor_action(&self, _item: &ScheduledContent, _board: &Stage, _cursor: usize) -> Option<Tap> {
        Some(Tap::any())
    }

    fn submit(&self, turn: Turn<'_, ScheduledContent, Stage>, tap: Tap) -> Verdict {
        let Some(index) = self.tap_target(turn.item, turn.board, tap) else {
            return Verdict::ignored();
        };
        let Some(beat) = turn.item.beats.get(index) else {
            return Verdict::ignored();
        };
        let Some(quality) = classify_hit(&self.cfg, turn.board.game_time - beat.target_time) else {
            return Verdict::ignored();
        };
        turn.board.beats[index] = BeatState::Hit(quality);
        self.gain_energy(turn.board, quality);
        let verdict = Verdict::scored(grade_hit(&self.cfg, quality, turn.stats.combo));
        if turn.board.is_finished() {
            verdict.resolve()
        } else {
            verdict
        }
    }

    fn timeout(&self, _turn: Turn<'_, ScheduledContent, Stage>) -> Verdict {
        Verdict::ignored()
    }

    fn advance(&self, turn: Turn<'_, ScheduledContent, Stage>, dt: f64) -> Verdict {
        let stage = turn.board;
        stage.game_time += dt;
        stage.indicator =
            (stage.game_time * turn.item.content.speed * INDICATOR_RATE) % INDICATOR_SPAN;

        let mut verdict = Verdict::ignored();
        let now = stage.game_time;
        for (state, beat) in stage.beats.iter_mut().zip(&turn.item.beats) {
            if !state.is_resolved() && now > beat.target_time + self.cfg.ok_window {
                *state = BeatState::Missed;
                stage.energy = (stage.energy - self.cfg.miss_energy).max(0.0);
                verdict.push(grade_miss());
            }
        }
        stage.energy = (stage.energy - self.cfg.energy_drain * dt).max(0.0);

        if stage.energy <= 0.0 {
            for state in stage.beats.iter_mut().filter(|state| !state.is_resolved()) {
                *state = BeatState::Missed;
                verdict.push(grade_miss());
            }
        }
        if stage.is_finished() {
            verdict.resolve()
        } else {
            verdict
        }
    }

    fn item_label(&self, item: &ScheduledContent) -> String {
        item.content.name.clone()
    }

    fn item_detail(&self, _item: &ScheduledContent, stage: &Stage) -> Option<String> {
        let counts = stage.counts();
        Some(format!(
            "{} perfect, {} good, {} ok, {} missed",
            counts.perfect, counts.good, counts.ok, counts.missed
        ))
    }

    fn performance(&self, stats: &SessionStats, items: &[ScheduledContent]) -> Performance {
        let total = usize_to_u32(items.iter().map(|item| item.beats.len()).sum());
        let tally = &stats.tally;
        let landed = tally.perfect.saturating_add(tally.good).saturating_add(tally.ok);
        Performance {
            basis: percentage(landed, total),
            achieved: tally.perfect.saturating_add(tally.good),
            possible: total,
        }
    }

    fn grade_table(&self) -> &GradeTable {
        &CREATOR_TABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldMachine;

    fn video(beats: &[(f64, u8)]) -> ScheduledContent {
        ScheduledContent {
            content: ContentType {
                name: "Dance Challenge".into(),
                description: "Hit the beat".into(),
                beat_count: beats.len(),
                speed: 1.0,
            },
            beats: beats
                .iter()
                .map(|&(target_time, lane)| Beat { target_time, lane })
                .collect(),
        }
    }

    fn machine_with(cfg: InfluencerCfg, beats: &[(f64, u8)]) -> WorldMachine<InfluencerWorld> {
        let mut machine = WorldMachine::new(InfluencerWorld::new(cfg), vec![video(beats)]);
        machine.start();
        machine
    }

    fn machine(beats: &[(f64, u8)]) -> WorldMachine<InfluencerWorld> {
        machine_with(InfluencerCfg::default(), beats)
    }

    #[test]
    fn on_time_tap_is_perfect_and_caps_energy() {
        let mut machine = machine(&[(1.0, 0), (2.0, 1), (3.0, 2)]);
        machine.tick(1.0);
        machine.submit(Tap::any());
        let stats = machine.stats();
        assert_eq!(stats.score, 110);
        assert_eq!(stats.combo, 1);
        assert_eq!(stats.tally.perfect, 1);
        let stage = machine.board().unwrap();
        assert!((stage.energy - 100.0).abs() < f64::EPSILON);
        assert!((stage.indicator - 200.0).abs() < 1e-9);
        assert_eq!(machine.phase(), WorldPhase::Gameplay);
    }

    #[test]
    fn combo_restarts_with_each_video() {
        let items = vec![video(&[(1.0, 0)]), video(&[(1.0, 2)])];
        let mut machine = WorldMachine::new(InfluencerWorld::new(InfluencerCfg::default()), items);
        machine.start();
        machine.tick(1.0);
        machine.submit(Tap::any());
        assert_eq!(machine.phase(), WorldPhase::Complete);
        assert_eq!(machine.stats().combo, 1);

        machine.advance();
        assert_eq!(machine.stats().combo, 0);
        machine.tick(1.0);
        machine.submit(Tap::any());
        let stats = machine.stats();
        assert_eq!(stats.score, 220);
        assert_eq!(stats.combo, 1);
        assert_eq!(stats.best_combo, 1);
    }

    #[test]
    fn beats_miss_without_input() {
        let mut machine = machine(&[(1.0, 0), (2.0, 1)]);
        machine.tick(1.5);
        let stats = machine.stats();
        assert_eq!(stats.tally.miss, 1);
        assert_eq!(stats.combo, 0);
        let stage = machine.board().unwrap();
        assert_eq!(stage.beats[0], BeatState::Missed);
        assert!((stage.energy - 87.0).abs() < 1e-9);
        assert_eq!(machine.feedback_message(), Some("MISS"));
    }

    #[test]
    fn lane_tap_reaches_past_the_current_beat() {
        let mut machine = machine(&[(1.0, 0), (1.1, 1)]);
        machine.tick(1.05);
        machine.submit(Tap::lane(1));
        let stage = machine.board().unwrap();
        assert_eq!(stage.beats[0], BeatState::Pending);
        assert_eq!(stage.beats[1], BeatState::Hit(HitQuality::Perfect));
        assert!(machine.submit(Tap::lane(2)).is_ignored());
        assert!(machine.submit(Tap::lane(7)).is_ignored());
    }

    #[test]
    fn sloppy_hit_scores_ok_and_decays_combo() {
        let mut machine = machine(&[(1.0, 0), (2.0, 1), (3.0, 2)]);
        machine.tick(1.0);
        machine.submit(Tap::any());
        machine.tick(1.3);
        machine.submit(Tap::any());
        let stats = machine.stats();
        assert_eq!(stats.tally.ok, 1);
        assert_eq!(stats.combo, 0);
        assert_eq!(stats.best_combo, 1);
        assert_eq!(stats.score, 135);
    }

    #[test]
    fn early_tap_outside_window_is_ignored() {
        let mut machine = machine(&[(2.0, 0)]);
        machine.tick(1.0);
        assert!(machine.submit(Tap::any()).is_ignored());
        assert_eq!(machine.stats().tally.total(), 0);
    }

    #[test]
    fn last_hit_completes_the_video() {
        let mut machine = machine(&[(1.0, 0), (2.0, 1)]);
        machine.tick(1.0);
        machine.submit(Tap::any());
        machine.tick(1.0);
        machine.submit(Tap::lane(1));
        assert_eq!(machine.phase(), WorldPhase::Complete);
        machine.advance();
        let result = machine.result().unwrap();
        assert_eq!(result.title, "Viral Star!");
        assert_eq!(result.outcomes[0].detail.as_deref(), Some("2 perfect, 0 good, 0 ok, 0 missed"));
        assert_eq!(result.achieved, 2);
        assert_eq!(result.possible, 2);
    }

    #[test]
    fn empty_energy_misses_every_remaining_beat() {
        let cfg = InfluencerCfg {
            energy_drain: 200.0,
            ..InfluencerCfg::default()
        };
        let mut machine = machine_with(cfg, &[(1.0, 0), (2.0, 1), (3.0, 2)]);
        machine.tick(0.5);
        assert_eq!(machine.phase(), WorldPhase::Complete);
        assert_eq!(machine.stats().tally.miss, 3);
        assert_eq!(machine.board().unwrap().counts().missed, 3);
    }

    #[test]
    fn confirm_taps_without_lane() {
        let mut machine = machine(&[(0.5, 2)]);
        machine.tick(0.5);
        machine.handle_event(crate::world::InputEvent::Confirm);
        assert_eq!(machine.stats().tally.perfect, 1);
        assert_eq!(machine.phase(), WorldPhase::Complete);
    }
}
