//! Courtroom: find the witness statement that contradicts the others.
use crate::career::CareerId;
use crate::config::LawyerCfg;
use crate::constants::MSG_LAWYER_TIMEOUT;
use crate::data::LegalCase;
use crate::numbers::{percentage, usize_to_u32};
use crate::scoring::{grade_testimony, grade_timeout};
use crate::summary::{ACCURACY_TABLE, GradeTable, Performance};
use crate::world::{GradingStrategy, SessionStats, Turn, Verdict, WorldPhase};

#[derive(Debug, Clone, PartialEq)]
pub struct LawyerWorld {
    cfg: LawyerCfg,
}

impl LawyerWorld {
    #[must_use]
    pub const fn new(cfg: LawyerCfg) -> Self {
        Self { cfg }
    }

    #[must_use]
    pub const fn config(&self) -> &LawyerCfg {
        &self.cfg
    }
}

impl GradingStrategy for LawyerWorld {
    type Item = LegalCase;
    type Board = ();
    /// Index into [`LegalCase::statements`].
    type Action = usize;

    fn career(&self) -> CareerId {
        CareerId::Lawyer
    }

    fn review_phase(&self) -> WorldPhase {
        WorldPhase::Feedback
    }

    fn time_budget(&self, _item: &LegalCase) -> Option<f64> {
        Some(self.cfg.time_per_case)
    }

    fn feedback_secs(&self) -> f64 {
        self.cfg.feedback_secs
    }

    fn load(&self, _item: &LegalCase) {}

    fn choice_count(&self, item: &LegalCase, _board: &()) -> usize {
        item.statements.len()
    }

    fn cursor_action(&self, item: &LegalCase, _board: &(), cursor: usize) -> Option<usize> {
        (cursor < item.statements.len()).then_some(cursor)
    }

    fn submit(&self, turn: Turn<'_, LegalCase, ()>, statement: usize) -> Verdict {
        if statement >= turn.item.statements.len() {
            return Verdict::ignored();
        }
        Verdict::resolved(grade_testimony(
            &self.cfg,
            turn.attempt(),
            statement,
            turn.item.contradiction_index,
        ))
    }

    fn timeout(&self, _turn: Turn<'_, LegalCase, ()>) -> Verdict {
        Verdict::resolved(grade_timeout(MSG_LAWYER_TIMEOUT))
    }

    fn item_label(&self, item: &LegalCase) -> String {
        item.title.clone()
    }

    fn item_detail(&self, item: &LegalCase, _board: &()) -> Option<String> {
        Some(item.explanation.clone())
    }

    fn performance(&self, stats: &SessionStats, items: &[LegalCase]) -> Performance {
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
