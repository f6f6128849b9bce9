use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::WorldPhase;
use crate::career::CareerId;
use crate::scoring::Grade;

/// Input reported by the renderer for one world.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent<A> {
    /// Submit a world-specific action against the current item.
    Submit(A),
    /// Move the highlighted choice; wraps at either end.
    Navigate(i32),
    Confirm,
    Cancel,
}

/// What handling an event or tick did to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Transition {
    /// Invalid in the current phase, or out of range. Nothing changed.
    Ignored,
    /// State changed without leaving the phase.
    Updated,
    PhaseChanged {
        from: WorldPhase,
        to: WorldPhase,
    },
    /// The player asked to leave for the hub.
    ExitRequested,
}

impl Transition {
    #[must_use]
    pub const fn is_ignored(self) -> bool {
        matches!(self, Self::Ignored)
    }

    #[must_use]
    pub(crate) fn between(from: WorldPhase, to: WorldPhase) -> Self {
        if from == to {
            Self::Updated
        } else {
            Self::PhaseChanged { from, to }
        }
    }
}

/// A strategy's answer to a submission, tick or timeout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Verdict {
    pub grades: SmallVec<[Grade; 2]>,
    /// Input was valid and changed the board.
    pub accepted: bool,
    /// The current item is finished.
    pub resolved: bool,
}

impl Verdict {
    #[must_use]
    pub fn ignored() -> Self {
        Self::default()
    }

    /// Board changed but nothing was graded.
    #[must_use]
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            ..Self::default()
        }
    }

    /// Graded, item still in play.
    #[must_use]
    pub fn scored(grade: Grade) -> Self {
        let mut grades = SmallVec::new();
        grades.push(grade);
        Self {
            grades,
            accepted: true,
            resolved: false,
        }
    }

    /// Graded and finished.
    #[must_use]
    pub fn resolved(grade: Grade) -> Self {
        Self {
            resolved: true,
            ..Self::scored(grade)
        }
    }

    #[must_use]
    pub fn resolve(mut self) -> Self {
        self.accepted = true;
        self.resolved = true;
        self
    }

    pub fn push(&mut self, grade: Grade) {
        self.accepted = true;
        self.grades.push(grade);
    }
}

/// Transitions produced by one call to `frame`, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub transitions: SmallVec<[Transition; 4]>,
}

impl FrameReport {
    #[must_use]
    pub fn phase_changes(&self) -> impl Iterator<Item = (WorldPhase, WorldPhase)> + '_ {
        self.transitions.iter().filter_map(|t| match t {
            Transition::PhaseChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
    }

    #[must_use]
    pub fn exit_requested(&self) -> bool {
        self.transitions.contains(&Transition::ExitRequested)
    }
}

/// Read-only per-tick state for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub career: CareerId,
    pub phase: WorldPhase,
    pub item_index: usize,
    pub item_count: usize,
    pub item_label: Option<String>,
    pub cursor: usize,
    pub time_remaining: Option<f64>,
    pub score: u32,
    pub combo: u32,
    pub best_combo: u32,
    pub lives: Option<u8>,
    pub approval: Option<u8>,
    pub feedback_message: Option<String>,
    /// Seconds left on the cosmetic feedback flash.
    pub feedback_timer: f64,
}
