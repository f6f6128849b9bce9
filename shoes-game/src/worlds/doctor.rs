//! Emergency-room triage: read the symptoms, pick the diagnosis.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::career::CareerId;
use crate::config::DoctorCfg;
use crate::constants::MSG_DOCTOR_TIMEOUT;
use crate::data::PatientCase;
use crate::numbers::{percentage, usize_to_u32};
use crate::scoring::{grade_diagnosis, grade_timeout};
use crate::summary::{ACCURACY_TABLE, GradeTable, Performance};
use crate::world::{GradingStrategy, SessionStats, Turn, Verdict, WorldPhase};

/// A dealt patient: the catalog case plus its shuffled diagnosis options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub case: PatientCase,
    pub options: SmallVec<[String; 4]>,
}

impl Patient {
    /// Index of the correct diagnosis within `options`.
    #[must_use]
    pub fn correct_option(&self) -> Option<usize> {
        self.options
            .iter()
            .position(|option| *option == self.case.correct_diagnosis)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoctorWorld {
    cfg: DoctorCfg,
}

impl DoctorWorld {
    #[must_use]
    pub const fn new(cfg: DoctorCfg) -> Self {
        Self { cfg }
    }

    #[must_use]
    pub const fn config(&self) -> &DoctorCfg {
        &self.cfg
    }
}

impl GradingStrategy for DoctorWorld {
    type Item = Patient;
    type Board = ();
    /// Index into [`Patient::options`].
    type Action = usize;

    fn career(&self) -> CareerId {
        CareerId::Doctor
    }

    fn review_phase(&self) -> WorldPhase {
        WorldPhase::Feedback
    }

    fn time_budget(&self, _item: &Patient) -> Option<f64> {
        Some(self.cfg.time_per_patient)
    }

    fn starting_lives(&self) -> Option<u8> {
        Some(self.cfg.lives)
    }

    fn feedback_secs(&self) -> f64 {
        self.cfg.feedback_secs
    }

    fn load(&self, _item: &Patient) {}

    fn choice_count(&self, item: &Patient, _board: &()) -> usize {
        item.options.len()
    }

    fn cursor_action(&self, item: &Patient, _board: &(), cursor: usize) -> Option<usize> {
        (cursor < item.options.len()).then_some(cursor)
    }

    fn submit(&self, turn: Turn<'_, Patient, ()>, choice: usize) -> Verdict {
        let Some(chosen) = turn.item.options.get(choice) else {
            return Verdict::ignored();
        };
        Verdict::resolved(grade_diagnosis(
            &self.cfg,
            turn.attempt(),
            chosen,
            &turn.item.case.correct_diagnosis,
        ))
    }

    // Running out of time is not a misdiagnosis; lives are untouched.
    fn timeout(&self, _turn: Turn<'_, Patient, ()>) -> Verdict {
        Verdict::resolved(grade_timeout(MSG_DOCTOR_TIMEOUT))
    }

    fn item_label(&self, item: &Patient) -> String {
        format!(
            "{} patient: {}",
            item.case.severity,
            item.case.symptoms.join(", ")
        )
    }

    fn item_detail(&self, item: &Patient, _board: &()) -> Option<String> {
        Some(format!("Diagnosis: {}", item.case.correct_diagnosis))
    }

    fn performance(&self, stats: &SessionStats, items: &[Patient]) -> Performance {
        let possible = usize_to_u32(items.len());
        Performance {
            basis: percentage(stats.tally.correct, possible),
            achieved: stats.tally.correct,
            possible,
        }
    }

    fn grade_table(&self) -> &GradeTable {
        &ACCURACY_TABLE
    }
}
