//! City hall: answer each crisis and live with the approval meter.
use crate::career::CareerId;
use crate::config::PoliticianCfg;
use crate::data::PoliticalIssue;
use crate::scoring::{OutcomeTier, grade_response};
use crate::summary::{GradeTable, LEGACY_TABLE, Performance};
use crate::world::{GradingStrategy, SessionStats, Turn, Verdict, WorldPhase};

#[derive(Debug, Clone, PartialEq)]
pub struct PoliticianWorld {
    cfg: PoliticianCfg,
}

impl PoliticianWorld {
    #[must_use]
    pub const fn new(cfg: PoliticianCfg) -> Self {
        Self { cfg }
    }

    #[must_use]
    pub const fn config(&self) -> &PoliticianCfg {
        &self.cfg
    }
}

impl GradingStrategy for PoliticianWorld {
    type Item = PoliticalIssue;
    type Board = ();
    /// Index into [`PoliticalIssue::responses`].
    type Action = usize;

    fn career(&self) -> CareerId {
        CareerId::Politician
    }

    fn review_phase(&self) -> WorldPhase {
        WorldPhase::Complete
    }

    fn time_budget(&self, _item: &PoliticalIssue) -> Option<f64> {
        None
    }

    fn starting_approval(&self) -> Option<u8> {
        Some(self.cfg.starting_approval)
    }

    fn feedback_secs(&self) -> f64 {
        self.cfg.feedback_secs
    }

    fn load(&self, _item: &PoliticalIssue) {}

    fn choice_count(&self, item: &PoliticalIssue, _board: &()) -> usize {
        item.responses.len()
    }

    fn cursor_action(&self, item: &PoliticalIssue, _board: &(), cursor: usize) -> Option<usize> {
        (cursor < item.responses.len()).then_some(cursor)
    }

    fn submit(&self, turn: Turn<'_, PoliticalIssue, ()>, choice: usize) -> Verdict {
        let Some(response) = turn.item.responses.get(choice) else {
            return Verdict::ignored();
        };
        Verdict::resolved(grade_response(&self.cfg, response, turn.stats.combo))
    }

    // Issues are untimed; reached only if a caller forces a timeout.
    fn timeout(&self, _turn: Turn<'_, PoliticalIssue, ()>) -> Verdict {
        Verdict::ignored()
    }

    fn item_label(&self, item: &PoliticalIssue) -> String {
        item.headline.clone()
    }

    fn performance(&self, stats: &SessionStats, _items: &[PoliticalIssue]) -> Performance {
        let approval = stats
            .approval
            .map_or(self.cfg.starting_approval, |meter| meter.value());
        Performance {
            basis: f64::from(approval),
            achieved: u32::from(approval),
            possible: 100,
        }
    }

    fn grade_table(&self) -> &GradeTable {
        &LEGACY_TABLE
    }
}

/// Decision counts in the four response tiers, best first.
#[must_use]
pub fn decision_breakdown(stats: &SessionStats) -> [(OutcomeTier, u32); 4] {
    [
        OutcomeTier::Excellent,
        OutcomeTier::Good,
        OutcomeTier::Neutral,
        OutcomeTier::Poor,
    ]
    .map(|tier| (tier, stats.tally.count(tier)))
}
