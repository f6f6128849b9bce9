use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use shoes_game::{
    AnyWorld, CareerId, EngineerAction, GridCell, InputEvent, Tap, WorldAction, WorldPhase,
};

/// Policy interface for automated play.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Events to feed the world this frame.
    fn decide(&mut self, world: &AnyWorld, dt: f64) -> Vec<InputEvent<WorldAction>>;
}

/// Built-in player styles for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayStyle {
    /// Always right, always on the beat.
    Expert,
    /// Hesitates and gets some answers wrong.
    Novice,
    /// Never answers; only moves past intro and review screens.
    Idle,
    /// Random input of every kind.
    Chaos,
}

impl PlayStyle {
    pub const ALL: [Self; 4] = [Self::Expert, Self::Novice, Self::Idle, Self::Chaos];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Expert => "expert",
            Self::Novice => "novice",
            Self::Idle => "idle",
            Self::Chaos => "chaos",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy> {
        match self {
            Self::Expert => Box::new(ExpertPolicy),
            Self::Novice => Box::new(NovicePolicy::new(seed)),
            Self::Idle => Box::new(IdlePolicy),
            Self::Chaos => Box::new(ChaosPolicy::new(seed)),
        }
    }
}

impl fmt::Display for PlayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlayStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown policy '{s}'"))
    }
}

/// Review and intro screens are confirmed by every policy.
fn screen_events(world: &AnyWorld) -> Option<Vec<InputEvent<WorldAction>>> {
    match world.phase() {
        WorldPhase::Intro => Some(vec![InputEvent::Confirm]),
        phase if phase.is_review() => Some(vec![InputEvent::Confirm]),
        WorldPhase::Results => Some(Vec::new()),
        _ => None,
    }
}

fn submit(action: Option<WorldAction>) -> Vec<InputEvent<WorldAction>> {
    action.map(InputEvent::Submit).into_iter().collect()
}

/// Number of answers on offer for the current choice item.
fn choice_count(world: &AnyWorld) -> usize {
    match world {
        AnyWorld::Doctor(m) => m.current_item().map_or(0, |patient| patient.options.len()),
        AnyWorld::Lawyer(m) => m.current_item().map_or(0, |case| case.statements.len()),
        AnyWorld::Politician(m) => m.current_item().map_or(0, |issue| issue.responses.len()),
        _ => 0,
    }
}

/// The best answer for choice-based worlds.
fn best_choice(world: &AnyWorld) -> Option<usize> {
    match world {
        AnyWorld::Doctor(m) => m.current_item()?.correct_option(),
        AnyWorld::Lawyer(m) => Some(m.current_item()?.contradiction_index),
        AnyWorld::Politician(m) => m
            .current_item()?
            .responses
            .iter()
            .enumerate()
            .max_by_key(|(_, response)| response.approval_delta)
            .map(|(index, _)| index),
        _ => None,
    }
}

/// Seconds until the current beat lands, and the beat's index.
fn beat_lead(world: &AnyWorld) -> Option<(usize, f64)> {
    let machine = world.as_influencer()?;
    let stage = machine.board()?;
    let index = stage.current_beat()?;
    let beat = machine.current_item()?.beats.get(index)?;
    Some((index, beat.target_time - stage.game_time))
}

/// Next placement toward a solved grid: select the right slot, then tap its cell.
fn next_placement(world: &AnyWorld) -> Option<EngineerAction> {
    let machine = world.as_engineer()?;
    let puzzle = &machine.current_item()?.puzzle;
    let bench = machine.board()?;
    let (cell, kind) = puzzle
        .targets
        .iter()
        .copied()
        .zip(puzzle.components.iter().copied())
        .find(|(cell, _)| bench.component_at(*cell).is_none())?;
    if bench.selected_kind() == Some(kind) {
        return Some(EngineerAction::Tap(cell));
    }
    bench
        .slots
        .iter()
        .position(|slot| !slot.used && slot.kind == kind)
        .map(EngineerAction::Select)
}

pub struct ExpertPolicy;

impl PlayerPolicy for ExpertPolicy {
    fn name(&self) -> &'static str {
        "Expert"
    }

    fn decide(&mut self, world: &AnyWorld, dt: f64) -> Vec<InputEvent<WorldAction>> {
        if let Some(events) = screen_events(world) {
            return events;
        }
        match world.career() {
            CareerId::Doctor | CareerId::Lawyer | CareerId::Politician => {
                submit(best_choice(world).map(WorldAction::Choose))
            }
            CareerId::Influencer => submit(
                beat_lead(world)
                    .filter(|(_, lead)| *lead <= dt / 2.0)
                    .map(|_| WorldAction::Tap(Tap::any())),
            ),
            CareerId::Engineer => submit(next_placement(world).map(WorldAction::Engineer)),
        }
    }
}

/// Plays like a learner: thinks before answering and is right `accuracy` of the time.
pub struct NovicePolicy {
    rng: ChaCha20Rng,
    accuracy: f64,
    thinking: Option<f64>,
    beat_offset: Option<(usize, f64)>,
}

impl NovicePolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            accuracy: 0.7,
            thinking: None,
            beat_offset: None,
        }
    }

    /// Count down a per-item thinking delay; true once it has elapsed.
    fn ready(&mut self, dt: f64) -> bool {
        let remaining = match self.thinking {
            Some(remaining) => remaining - dt,
            None => self.rng.gen_range(0.5..4.0),
        };
        if remaining <= 0.0 {
            self.thinking = None;
            true
        } else {
            self.thinking = Some(remaining);
            false
        }
    }

    fn choose(&mut self, world: &AnyWorld) -> Option<WorldAction> {
        let count = choice_count(world);
        if count == 0 {
            return None;
        }
        let index = if self.rng.gen_bool(self.accuracy) {
            best_choice(world)?
        } else {
            self.rng.gen_range(0..count)
        };
        Some(WorldAction::Choose(index))
    }

    fn tap(&mut self, world: &AnyWorld) -> Option<WorldAction> {
        let (index, lead) = beat_lead(world)?;
        let offset = match self.beat_offset {
            Some((planned, offset)) if planned == index => offset,
            _ => {
                let offset = self.rng.gen_range(-0.3..0.3);
                self.beat_offset = Some((index, offset));
                offset
            }
        };
        (lead + offset <= 0.0).then_some(WorldAction::Tap(Tap::any()))
    }

    fn build(&mut self, world: &AnyWorld) -> Option<WorldAction> {
        if self.rng.gen_bool((1.0 - self.accuracy) / 6.0) {
            return Some(WorldAction::Engineer(EngineerAction::Submit));
        }
        next_placement(world).map(WorldAction::Engineer)
    }
}

impl PlayerPolicy for NovicePolicy {
    fn name(&self) -> &'static str {
        "Novice"
    }

    fn decide(&mut self, world: &AnyWorld, dt: f64) -> Vec<InputEvent<WorldAction>> {
        if let Some(events) = screen_events(world) {
            self.thinking = None;
            return events;
        }
        let action = match world.career() {
            CareerId::Influencer => self.tap(world),
            _ if !self.ready(dt) => None,
            CareerId::Engineer => self.build(world),
            _ => self.choose(world),
        };
        submit(action)
    }
}

pub struct IdlePolicy;

impl PlayerPolicy for IdlePolicy {
    fn name(&self) -> &'static str {
        "Idle"
    }

    fn decide(&mut self, world: &AnyWorld, _dt: f64) -> Vec<InputEvent<WorldAction>> {
        screen_events(world).unwrap_or_default()
    }
}

/// Random input of every kind, valid or not.
pub struct ChaosPolicy {
    rng: ChaCha20Rng,
}

impl ChaosPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    fn action(&mut self, career: CareerId) -> WorldAction {
        match career {
            CareerId::Doctor | CareerId::Lawyer | CareerId::Politician => {
                WorldAction::Choose(self.rng.gen_range(0..6))
            }
            CareerId::Influencer => {
                if self.rng.gen_bool(0.5) {
                    WorldAction::Tap(Tap::any())
                } else {
                    WorldAction::Tap(Tap::lane(self.rng.gen_range(0..4)))
                }
            }
            CareerId::Engineer => WorldAction::Engineer(match self.rng.gen_range(0..3) {
                0 => EngineerAction::Select(self.rng.gen_range(0..7)),
                1 => EngineerAction::Tap(GridCell::new(
                    self.rng.gen_range(0..6),
                    self.rng.gen_range(0..5),
                )),
                _ => EngineerAction::Submit,
            }),
        }
    }
}

impl PlayerPolicy for ChaosPolicy {
    fn name(&self) -> &'static str {
        "Chaos"
    }

    fn decide(&mut self, world: &AnyWorld, _dt: f64) -> Vec<InputEvent<WorldAction>> {
        let career = world.career();
        (0..self.rng.gen_range(0..3))
            .map(|_| match self.rng.gen_range(0..12) {
                0 => InputEvent::Navigate(self.rng.gen_range(-3..=3)),
                1 | 2 => InputEvent::Confirm,
                3 => InputEvent::Cancel,
                _ => InputEvent::Submit(self.action(career)),
            })
            .collect()
    }
}
