//! Circuit lab: place each component on its target cell before time runs out.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::career::CareerId;
use crate::config::EngineerCfg;
use crate::data::{CircuitPuzzle, ComponentKind, GridCell};
use crate::numbers::{percentage, usize_to_u32};
use crate::scoring::{CircuitCheck, grade_circuit};
use crate::summary::{ENGINEER_TABLE, GradeTable, Performance};
use crate::world::{GradingStrategy, SessionStats, Turn, Verdict, WorldPhase};

/// A dealt puzzle; `inventory` is shuffled independently of the target order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPuzzle {
    pub puzzle: CircuitPuzzle,
    pub inventory: SmallVec<[ComponentKind; 6]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub kind: ComponentKind,
    pub used: bool,
}

/// Components placed so far and the current inventory selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Workbench {
    pub slots: Vec<InventorySlot>,
    pub selected: Option<usize>,
    pub placed: BTreeMap<GridCell, ComponentKind>,
}

impl Workbench {
    fn new(inventory: &[ComponentKind]) -> Self {
        Self {
            slots: inventory
                .iter()
                .map(|&kind| InventorySlot { kind, used: false })
                .collect(),
            selected: None,
            placed: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn component_at(&self, cell: GridCell) -> Option<ComponentKind> {
        self.placed.get(&cell).copied()
    }

    #[must_use]
    pub fn selected_kind(&self) -> Option<ComponentKind> {
        self.selected
            .and_then(|slot| self.slots.get(slot))
            .map(|slot| slot.kind)
    }

    /// Tally placements against the puzzle's expected components.
    #[must_use]
    pub fn check(&self, puzzle: &CircuitPuzzle) -> CircuitCheck {
        let mut check = CircuitCheck {
            total: usize_to_u32(puzzle.targets.len()),
            ..CircuitCheck::default()
        };
        for (&cell, &expected) in puzzle.targets.iter().zip(&puzzle.components) {
            match self.component_at(cell) {
                Some(kind) if kind == expected => check.correct += 1,
                Some(_) => check.misplaced += 1,
                None => {}
            }
        }
        check
    }

    fn take_back(&mut self, cell: GridCell) -> bool {
        let Some(kind) = self.placed.remove(&cell) else {
            return false;
        };
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|slot| slot.used && slot.kind == kind)
        {
            slot.used = false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "target")]
pub enum EngineerAction {
    /// Pick up an unused inventory slot.
    Select(usize),
    /// Place the selection on an empty target, or take back a placed component.
    Tap(GridCell),
    /// Grade the grid as it stands.
    Submit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineerWorld {
    cfg: EngineerCfg,
}

impl EngineerWorld {
    #[must_use]
    pub const fn new(cfg: EngineerCfg) -> Self {
        Self { cfg }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineerCfg {
        &self.cfg
    }

    fn grade(&self, turn: &Turn<'_, ScheduledPuzzle, Workbench>, timed_out: bool) -> Verdict {
        let check = turn.board.check(&turn.item.puzzle);
        Verdict::resolved(grade_circuit(
            &self.cfg,
            check,
            turn.clock.remaining,
            turn.stats.combo,
            timed_out,
        ))
    }
}

impl GradingStrategy for EngineerWorld {
    type Item = ScheduledPuzzle;
    type Board = Workbench;
    type Action = EngineerAction;

    fn career(&self) -> CareerId {
        CareerId::Engineer
    }

    fn review_phase(&self) -> WorldPhase {
        WorldPhase::Complete
    }

    fn time_budget(&self, item: &ScheduledPuzzle) -> Option<f64> {
        Some(item.puzzle.time_limit)
    }

    fn feedback_secs(&self) -> f64 {
        self.cfg.feedback_secs
    }

    fn load(&self, item: &ScheduledPuzzle) -> Workbench {
        Workbench::new(&item.inventory)
    }

    fn cursor_action(
        &self,
        _item: &ScheduledPuzzle,
        _board: &Workbench,
        _cursor: usize,
    ) -> Option<EngineerAction> {
        Some(EngineerAction::Submit)
    }

    fn cancel(&self, board: &mut Workbench) -> bool {
        board.selected.take().is_some()
    }

    fn submit(&self, turn: Turn<'_, ScheduledPuzzle, Workbench>, action: EngineerAction) -> Verdict {
        let puzzle = &turn.item.puzzle;
        match action {
            EngineerAction::Submit => self.grade(&turn, false),
            EngineerAction::Select(slot) => match turn.board.slots.get(slot) {
                Some(entry) if !entry.used => {
                    turn.board.selected = Some(slot);
                    Verdict::accepted()
                }
                _ => Verdict::ignored(),
            },
            EngineerAction::Tap(cell) if !puzzle.grid_size.contains(cell) => Verdict::ignored(),
            EngineerAction::Tap(cell) => {
                let board = &mut *turn.board;
                let empty_target = puzzle.is_target(cell) && board.component_at(cell).is_none();
                let selected = board.selected;
                match selected {
                    Some(slot) if empty_target => {
                        let Some(entry) = board.slots.get_mut(slot) else {
                            return Verdict::ignored();
                        };
                        entry.used = true;
                        board.placed.insert(cell, entry.kind);
                        board.selected = None;
                        if board.check(puzzle).is_perfect() {
                            return self.grade(&turn, false);
                        }
                        Verdict::accepted()
                    }
                    _ if board.take_back(cell) => Verdict::accepted(),
                    _ => Verdict::ignored(),
                }
            }
        }
    }

    // The grid is graded as it stands, without a time bonus.
    fn timeout(&self, turn: Turn<'_, ScheduledPuzzle, Workbench>) -> Verdict {
        self.grade(&turn, true)
    }

    fn item_label(&self, item: &ScheduledPuzzle) -> String {
        item.puzzle.name.clone()
    }

    fn item_detail(&self, item: &ScheduledPuzzle, board: &Workbench) -> Option<String> {
        let check = board.check(&item.puzzle);
        Some(format!(
            "{}/{} components correct, {} misplaced",
            check.correct, check.total, check.misplaced
        ))
    }

    fn performance(&self, stats: &SessionStats, items: &[ScheduledPuzzle]) -> Performance {
        let possible = usize_to_u32(items.len());
        Performance {
            basis: percentage(stats.tally.perfect, possible),
            achieved: stats.tally.perfect,
            possible,
        }
    }

    fn grade_table(&self) -> &GradeTable {
        &ENGINEER_TABLE
    }
}
