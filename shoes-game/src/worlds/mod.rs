//! The five career worlds and a career-agnostic wrapper over their machines.
use serde::{Deserialize, Serialize};

pub mod doctor;
pub mod engineer;
pub mod influencer;
pub mod lawyer;
pub mod politician;

pub use doctor::{DoctorWorld, Patient};
pub use engineer::{EngineerAction, EngineerWorld, InventorySlot, ScheduledPuzzle, Workbench};
pub use influencer::{
    Beat, BeatCounts, BeatState, InfluencerWorld, ScheduledContent, Stage, Tap,
};
pub use lawyer::LawyerWorld;
pub use politician::{PoliticianWorld, decision_breakdown};

use crate::career::CareerId;
use crate::summary::{Performance, PerformanceSummary, SessionResult};
use crate::world::{FrameReport, HudSnapshot, InputEvent, Transition, WorldMachine, WorldPhase};

pub type DoctorMachine = WorldMachine<DoctorWorld>;
pub type LawyerMachine = WorldMachine<LawyerWorld>;
pub type InfluencerMachine = WorldMachine<InfluencerWorld>;
pub type PoliticianMachine = WorldMachine<PoliticianWorld>;
pub type EngineerMachine = WorldMachine<EngineerWorld>;

/// Submission understood by any world; each world accepts only its own shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum WorldAction {
    /// Pick an option, statement or response by index.
    Choose(usize),
    Tap(Tap),
    Engineer(EngineerAction),
}

/// Narrow a [`WorldAction`] to one world's action type.
pub trait FromWorldAction: Sized {
    fn from_world_action(action: WorldAction) -> Option<Self>;
}

impl FromWorldAction for usize {
    fn from_world_action(action: WorldAction) -> Option<Self> {
        match action {
            WorldAction::Choose(index) => Some(index),
            _ => None,
        }
    }
}

impl FromWorldAction for Tap {
    fn from_world_action(action: WorldAction) -> Option<Self> {
        match action {
            WorldAction::Tap(tap) => Some(tap),
            _ => None,
        }
    }
}

impl FromWorldAction for EngineerAction {
    fn from_world_action(action: WorldAction) -> Option<Self> {
        match action {
            WorldAction::Engineer(action) => Some(action),
            _ => None,
        }
    }
}

fn narrow<A: FromWorldAction>(event: InputEvent<WorldAction>) -> Option<InputEvent<A>> {
    Some(match event {
        InputEvent::Submit(action) => InputEvent::Submit(A::from_world_action(action)?),
        InputEvent::Navigate(delta) => InputEvent::Navigate(delta),
        InputEvent::Confirm => InputEvent::Confirm,
        InputEvent::Cancel => InputEvent::Cancel,
    })
}

/// One world in play, whichever career it is.
#[derive(Debug, Clone)]
pub enum AnyWorld {
    Doctor(DoctorMachine),
    Lawyer(LawyerMachine),
    Influencer(InfluencerMachine),
    Politician(PoliticianMachine),
    Engineer(EngineerMachine),
}

macro_rules! dispatch {
    ($world:expr, $machine:ident => $body:expr) => {
        match $world {
            AnyWorld::Doctor($machine) => $body,
            AnyWorld::Lawyer($machine) => $body,
            AnyWorld::Influencer($machine) => $body,
            AnyWorld::Politician($machine) => $body,
            AnyWorld::Engineer($machine) => $body,
        }
    };
}

impl AnyWorld {
    #[must_use]
    pub const fn career(&self) -> CareerId {
        match self {
            Self::Doctor(_) => CareerId::Doctor,
            Self::Lawyer(_) => CareerId::Lawyer,
            Self::Influencer(_) => CareerId::Influencer,
            Self::Politician(_) => CareerId::Politician,
            Self::Engineer(_) => CareerId::Engineer,
        }
    }

    #[must_use]
    pub fn phase(&self) -> WorldPhase {
        dispatch!(self, machine => machine.phase())
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        dispatch!(self, machine => machine.is_finished())
    }

    #[must_use]
    pub fn snapshot(&self) -> HudSnapshot {
        dispatch!(self, machine => machine.snapshot())
    }

    pub fn start(&mut self) -> Transition {
        dispatch!(self, machine => machine.start())
    }

    pub fn tick(&mut self, dt: f64) -> Transition {
        dispatch!(self, machine => machine.tick(dt))
    }

    /// Route an event; a submission shaped for another world is ignored.
    pub fn handle_event(&mut self, event: InputEvent<WorldAction>) -> Transition {
        dispatch!(self, machine => match narrow(event) {
            Some(event) => machine.handle_event(event),
            None => Transition::Ignored,
        })
    }

    pub fn submit(&mut self, action: WorldAction) -> Transition {
        self.handle_event(InputEvent::Submit(action))
    }

    pub fn confirm(&mut self) -> Transition {
        self.handle_event(InputEvent::Confirm)
    }

    pub fn navigate(&mut self, delta: i32) -> Transition {
        self.handle_event(InputEvent::Navigate(delta))
    }

    pub fn cancel(&mut self) -> Transition {
        self.handle_event(InputEvent::Cancel)
    }

    pub fn advance(&mut self) -> Transition {
        dispatch!(self, machine => machine.advance())
    }

    pub fn abort(&mut self) -> Transition {
        dispatch!(self, machine => machine.abort())
    }

    pub fn frame<E>(&mut self, events: E, dt: f64) -> FrameReport
    where
        E: IntoIterator<Item = InputEvent<WorldAction>>,
    {
        dispatch!(self, machine => machine.frame(events.into_iter().filter_map(narrow), dt))
    }

    #[must_use]
    pub fn performance(&self) -> Performance {
        dispatch!(self, machine => machine.performance())
    }

    #[must_use]
    pub fn summary(&self) -> PerformanceSummary {
        dispatch!(self, machine => machine.summary())
    }

    #[must_use]
    pub fn result(&self) -> Option<SessionResult> {
        dispatch!(self, machine => machine.result())
    }

    #[must_use]
    pub const fn as_doctor(&self) -> Option<&DoctorMachine> {
        match self {
            Self::Doctor(machine) => Some(machine),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_lawyer(&self) -> Option<&LawyerMachine> {
        match self {
            Self::Lawyer(machine) => Some(machine),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_influencer(&self) -> Option<&InfluencerMachine> {
        match self {
            Self::Influencer(machine) => Some(machine),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_politician(&self) -> Option<&PoliticianMachine> {
        match self {
            Self::Politician(machine) => Some(machine),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_engineer(&self) -> Option<&EngineerMachine> {
        match self {
            Self::Engineer(machine) => Some(machine),
            _ => None,
        }
    }
}

impl From<DoctorMachine> for AnyWorld {
    fn from(machine: DoctorMachine) -> Self {
        Self::Doctor(machine)
    }
}

impl From<LawyerMachine> for AnyWorld {
    fn from(machine: LawyerMachine) -> Self {
        Self::Lawyer(machine)
    }
}

impl From<InfluencerMachine> for AnyWorld {
    fn from(machine: InfluencerMachine) -> Self {
        Self::Influencer(machine)
    }
}

impl From<PoliticianMachine> for AnyWorld {
    fn from(machine: PoliticianMachine) -> Self {
        Self::Politician(machine)
    }
}

impl From<EngineerMachine> for AnyWorld {
    fn from(machine: EngineerMachine) -> Self {
        Self::Engineer(machine)
    }
}
