//! Generic world state machine.
//!
//! Every career world runs the same loop: `intro -> gameplay -> review ->
//! (gameplay | results)`. What differs per world (item shape, grading rule,
//! which review screen follows an answer) lives behind [`GradingStrategy`];
//! [`WorldMachine`] owns the session, the item clock and every transition.
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

mod event;
mod session;

pub use event::{FrameReport, HudSnapshot, InputEvent, Transition, Verdict};
pub use session::{Approval, ItemClock, ItemOutcome, OutcomeTally, Session, SessionStats};

use crate::career::CareerId;
use crate::constants::LOG_TARGET_WORLD;
use crate::numbers::sanitize_dt;
use crate::scoring::{Attempt, OutcomeTier};
use crate::summary::{GradeTable, Performance, PerformanceSummary, SessionResult, summarize};
use session::ItemProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldPhase {
    Intro,
    Gameplay,
    /// Per-answer review used by the triage and courtroom worlds.
    Feedback,
    /// Per-item completion screen used by the other worlds.
    Complete,
    Results,
}

impl WorldPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Gameplay => "gameplay",
            Self::Feedback => "feedback",
            Self::Complete => "complete",
            Self::Results => "results",
        }
    }

    #[must_use]
    pub const fn is_review(self) -> bool {
        matches!(self, Self::Feedback | Self::Complete)
    }
}

impl fmt::Display for WorldPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a strategy may read or mutate while handling one event.
#[derive(Debug)]
pub struct Turn<'a, I, B> {
    pub item: &'a I,
    pub board: &'a mut B,
    pub clock: ItemClock,
    pub stats: &'a SessionStats,
}

impl<I, B> Turn<'_, I, B> {
    #[must_use]
    pub fn attempt(&self) -> Attempt {
        Attempt {
            time_remaining: self.clock.remaining,
            time_budget: self.clock.budget.unwrap_or(0.0),
            combo: self.stats.combo,
        }
    }
}

/// Per-world grading behaviour plugged into [`WorldMachine`].
pub trait GradingStrategy {
    /// Immutable challenge drawn from the deck.
    type Item: Clone + fmt::Debug;
    /// Mutable per-item play state (placed components, beat status, ...).
    type Board: Clone + fmt::Debug;
    type Action: Clone + fmt::Debug;

    fn career(&self) -> CareerId;

    /// Screen shown after an item resolves.
    fn review_phase(&self) -> WorldPhase;

    /// Countdown for `item`; `None` leaves the item untimed.
    fn time_budget(&self, item: &Self::Item) -> Option<f64>;

    fn starting_lives(&self) -> Option<u8> {
        None
    }

    fn starting_approval(&self) -> Option<u8> {
        None
    }

    /// Length of the cosmetic feedback flash after a grade.
    fn feedback_secs(&self) -> f64;

    /// Whether a running combo survives into the next item.
    fn carries_combo(&self) -> bool {
        true
    }

    fn load(&self, item: &Self::Item) -> Self::Board;

    /// Number of choices keyboard navigation cycles through.
    fn choice_count(&self, _item: &Self::Item, _board: &Self::Board) -> usize {
        0
    }

    /// Action submitted by `Confirm` with the cursor at `cursor`.
    fn cursor_action(
        &self,
        item: &Self::Item,
        board: &Self::Board,
        cursor: usize,
    ) -> Option<Self::Action>;

    /// Handle `Cancel` during gameplay; returns whether the board changed.
    fn cancel(&self, _board: &mut Self::Board) -> bool {
        false
    }

    fn submit(&self, turn: Turn<'_, Self::Item, Self::Board>, action: Self::Action) -> Verdict;

    /// Grade the item when its clock runs out.
    fn timeout(&self, turn: Turn<'_, Self::Item, Self::Board>) -> Verdict;

    /// Continuous per-tick simulation while in gameplay.
    fn advance(&self, _turn: Turn<'_, Self::Item, Self::Board>, _dt: f64) -> Verdict {
        Verdict::ignored()
    }

    fn item_label(&self, item: &Self::Item) -> String;

    /// Extra text recorded with a finished item.
    fn item_detail(&self, _item: &Self::Item, _board: &Self::Board) -> Option<String> {
        None
    }

    fn performance(&self, stats: &SessionStats, items: &[Self::Item]) -> Performance;

    fn grade_table(&self) -> &GradeTable;
}

/// One world's session driven through its phases.
#[derive(Debug, Clone)]
pub struct WorldMachine<S: GradingStrategy> {
    strategy: S,
    phase: WorldPhase,
    session: Session<S::Item>,
    board: Option<S::Board>,
    clock: ItemClock,
    cursor: usize,
    progress: ItemProgress,
    feedback: Option<String>,
    feedback_timer: f64,
}

impl<S: GradingStrategy> WorldMachine<S> {
    #[must_use]
    pub fn new(strategy: S, items: Vec<S::Item>) -> Self {
        let stats = SessionStats::new(strategy.starting_lives(), strategy.starting_approval());
        Self {
            strategy,
            phase: WorldPhase::Intro,
            session: Session::new(items, stats),
            board: None,
            clock: ItemClock::default(),
            cursor: 0,
            progress: ItemProgress::default(),
            feedback: None,
            feedback_timer: 0.0,
        }
    }

    #[must_use]
    pub const fn strategy(&self) -> &S {
        &self.strategy
    }

    #[must_use]
    pub const fn phase(&self) -> WorldPhase {
        self.phase
    }

    #[must_use]
    pub const fn session(&self) -> &Session<S::Item> {
        &self.session
    }

    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        self.session.stats()
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&S::Item> {
        match self.phase {
            WorldPhase::Intro => None,
            _ => self.session.current(),
        }
    }

    #[must_use]
    pub const fn board(&self) -> Option<&S::Board> {
        self.board.as_ref()
    }

    #[must_use]
    pub const fn clock(&self) -> &ItemClock {
        &self.clock
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn feedback_message(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == WorldPhase::Results
    }

    /// Leave the intro and load the first item, or go straight to results on an empty deck.
    pub fn start(&mut self) -> Transition {
        if self.phase != WorldPhase::Intro {
            return Transition::Ignored;
        }
        if self.session.is_empty() {
            log::warn!(
                target: LOG_TARGET_WORLD,
                "{} deck is empty; skipping to results",
                self.strategy.career()
            );
            return self.enter_results();
        }
        self.load_current();
        self.set_phase(WorldPhase::Gameplay)
    }

    pub fn handle_event(&mut self, event: InputEvent<S::Action>) -> Transition {
        match (self.phase, event) {
            (WorldPhase::Intro, InputEvent::Confirm) => self.start(),
            (WorldPhase::Intro, InputEvent::Cancel)
            | (WorldPhase::Results, InputEvent::Confirm | InputEvent::Cancel) => {
                Transition::ExitRequested
            }
            (WorldPhase::Gameplay, InputEvent::Submit(action)) => self.submit(action),
            (WorldPhase::Gameplay, InputEvent::Navigate(delta)) => self.navigate(delta),
            (WorldPhase::Gameplay, InputEvent::Confirm) => self.confirm(),
            (WorldPhase::Gameplay, InputEvent::Cancel) => self.cancel(),
            (WorldPhase::Feedback | WorldPhase::Complete, InputEvent::Confirm) => self.advance(),
            _ => Transition::Ignored,
        }
    }

    /// Submit an action against the current item. Only valid in gameplay.
    pub fn submit(&mut self, action: S::Action) -> Transition {
        if self.phase != WorldPhase::Gameplay {
            return Transition::Ignored;
        }
        let expired = self.clock.expired();
        let verdict = self.run_turn(|strategy, turn| {
            if expired {
                strategy.timeout(turn)
            } else {
                strategy.submit(turn, action)
            }
        });
        verdict.map_or(Transition::Ignored, |verdict| self.apply_verdict(verdict))
    }

    /// Move the highlighted choice, wrapping at either end.
    pub fn navigate(&mut self, delta: i32) -> Transition {
        if self.phase != WorldPhase::Gameplay || delta == 0 {
            return Transition::Ignored;
        }
        let (Some(item), Some(board)) = (self.session.current(), self.board.as_ref()) else {
            return Transition::Ignored;
        };
        let count = self.strategy.choice_count(item, board);
        if count == 0 {
            return Transition::Ignored;
        }
        self.cursor = wrap_cursor(self.cursor, delta, count);
        Transition::Updated
    }

    fn confirm(&mut self) -> Transition {
        let (Some(item), Some(board)) = (self.session.current(), self.board.as_ref()) else {
            return Transition::Ignored;
        };
        match self.strategy.cursor_action(item, board, self.cursor) {
            Some(action) => self.submit(action),
            None => Transition::Ignored,
        }
    }

    fn cancel(&mut self) -> Transition {
        if let Some(board) = self.board.as_mut()
            && self.strategy.cancel(board)
        {
            Transition::Updated
        } else {
            Transition::Ignored
        }
    }

    /// Leave the review screen: next item, or results after the last one.
    pub fn advance(&mut self) -> Transition {
        if !self.phase.is_review() {
            return Transition::Ignored;
        }
        if self.session.step() {
            self.load_current();
            self.set_phase(WorldPhase::Gameplay)
        } else {
            self.enter_results()
        }
    }

    /// Force results from any phase.
    pub fn abort(&mut self) -> Transition {
        if self.phase == WorldPhase::Results {
            return Transition::Ignored;
        }
        self.enter_results()
    }

    /// Advance timers by `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> Transition {
        self.tick_inner(dt, true)
    }

    /// Apply one frame: every event first, then the timers.
    ///
    /// When an event resolves the current item the countdown is not
    /// decremented for the rest of the frame, so an answer and a timeout
    /// never both land on the same item. Board edits that leave the item in
    /// play do not pause the clock.
    pub fn frame<E>(&mut self, events: E, dt: f64) -> FrameReport
    where
        E: IntoIterator<Item = InputEvent<S::Action>>,
    {
        let mut report = FrameReport::default();
        let mut resolved = false;
        for event in events {
            let from = self.phase;
            let transition = self.handle_event(event);
            if transition.is_ignored() {
                continue;
            }
            resolved |= from == WorldPhase::Gameplay && self.phase != WorldPhase::Gameplay;
            report.transitions.push(transition);
        }
        let transition = self.tick_inner(dt, !resolved);
        if !transition.is_ignored() {
            report.transitions.push(transition);
        }
        report
    }

    fn tick_inner(&mut self, dt: f64, countdown: bool) -> Transition {
        let dt = sanitize_dt(dt);
        self.feedback_timer = (self.feedback_timer - dt).max(0.0);
        if self.phase != WorldPhase::Gameplay {
            return Transition::Ignored;
        }
        let from = self.phase;
        if countdown {
            self.clock.tick(dt);
        }
        if let Some(verdict) = self.run_turn(|strategy, turn| strategy.advance(turn, dt)) {
            self.apply_verdict(verdict);
        }
        if countdown && self.phase == WorldPhase::Gameplay && self.clock.expired() {
            debug!(
                target: LOG_TARGET_WORLD,
                "{} item {} timed out",
                self.strategy.career(),
                self.session.current_index()
            );
            if let Some(verdict) = self.run_turn(|strategy, turn| strategy.timeout(turn)) {
                self.apply_verdict(verdict);
            }
        }
        Transition::between(from, self.phase)
    }

    /// Renderer-facing view of the current state.
    #[must_use]
    pub fn snapshot(&self) -> HudSnapshot {
        let stats = self.session.stats();
        let item_loaded = matches!(
            self.phase,
            WorldPhase::Gameplay | WorldPhase::Feedback | WorldPhase::Complete
        );
        HudSnapshot {
            career: self.strategy.career(),
            phase: self.phase,
            item_index: self.session.current_index(),
            item_count: self.session.len(),
            item_label: self
                .current_item()
                .map(|item| self.strategy.item_label(item)),
            cursor: self.cursor,
            time_remaining: if item_loaded {
                self.clock.time_remaining()
            } else {
                None
            },
            score: stats.score,
            combo: stats.combo,
            best_combo: stats.best_combo,
            lives: stats.lives,
            approval: stats.approval.map(Approval::value),
            feedback_message: self.feedback.clone(),
            feedback_timer: self.feedback_timer,
        }
    }

    #[must_use]
    pub fn performance(&self) -> Performance {
        self.strategy
            .performance(self.session.stats(), self.session.items())
    }

    #[must_use]
    pub fn summary(&self) -> PerformanceSummary {
        summarize(self.strategy.grade_table(), self.performance())
    }

    /// Terminal hand-off; `None` until the machine reaches results.
    #[must_use]
    pub fn result(&self) -> Option<SessionResult> {
        if self.phase != WorldPhase::Results {
            return None;
        }
        let stats = self.session.stats();
        let performance = self.performance();
        let summary = summarize(self.strategy.grade_table(), performance);
        Some(SessionResult {
            career: self.strategy.career(),
            score: stats.score,
            grade: summary.grade,
            title: summary.title,
            percentage: summary.percentage,
            failed: stats.failed,
            best_combo: stats.best_combo,
            approval: stats.approval.map(Approval::value),
            tally: stats.tally,
            outcomes: self.session.outcomes().to_vec(),
            achieved: performance.achieved,
            possible: performance.possible,
            feedback: None,
        })
    }

    fn run_turn<F>(&mut self, f: F) -> Option<Verdict>
    where
        F: FnOnce(&S, Turn<'_, S::Item, S::Board>) -> Verdict,
    {
        let item = self.session.current()?;
        let board = self.board.as_mut()?;
        let turn = Turn {
            item,
            board,
            clock: self.clock,
            stats: &self.session.stats,
        };
        Some(f(&self.strategy, turn))
    }

    fn apply_verdict(&mut self, verdict: Verdict) -> Transition {
        if !verdict.accepted && !verdict.resolved && verdict.grades.is_empty() {
            return Transition::Ignored;
        }
        let from = self.phase;
        let career = self.strategy.career();
        for grade in &verdict.grades {
            self.session.stats.apply(grade);
            self.clock.penalise(grade.time_penalty);
            self.progress.record(grade);
            self.feedback = Some(grade.message.clone());
            self.feedback_timer = self.strategy.feedback_secs();
            debug!(
                target: LOG_TARGET_WORLD,
                "{career} graded {} ({:+} pts, combo {})",
                grade.tier,
                grade.points,
                grade.combo_after
            );
        }
        if self.session.stats.out_of_lives() {
            self.session.stats.failed = true;
            self.finish_item();
            return self.enter_results();
        }
        if verdict.resolved {
            self.finish_item();
            let review = self.strategy.review_phase();
            self.set_phase(review);
        }
        Transition::between(from, self.phase)
    }

    fn finish_item(&mut self) {
        let progress = std::mem::take(&mut self.progress);
        let Some(item) = self.session.current() else {
            return;
        };
        let label = self.strategy.item_label(item);
        let detail = self
            .board
            .as_ref()
            .and_then(|board| self.strategy.item_detail(item, board));
        let outcome = ItemOutcome {
            index: self.session.current_index(),
            label,
            tier: progress.last_tier.unwrap_or(OutcomeTier::Timeout),
            points: progress.points,
            tally: progress.tally,
            message: progress.message,
            detail,
        };
        self.session.record_outcome(outcome);
    }

    fn load_current(&mut self) {
        let Some(item) = self.session.current() else {
            return;
        };
        let board = self.strategy.load(item);
        let budget = self.strategy.time_budget(item);
        if !self.strategy.carries_combo() {
            self.session.stats.combo = 0;
        }
        self.board = Some(board);
        self.clock = ItemClock::start(budget);
        self.cursor = 0;
        self.progress = ItemProgress::default();
    }

    fn set_phase(&mut self, to: WorldPhase) -> Transition {
        let from = self.phase;
        self.phase = to;
        if from != to {
            debug!(
                target: LOG_TARGET_WORLD,
                "{} phase {from} -> {to}",
                self.strategy.career()
            );
        }
        Transition::between(from, to)
    }

    fn enter_results(&mut self) -> Transition {
        let stats = self.session.stats();
        info!(
            target: LOG_TARGET_WORLD,
            "{} session finished: score {}, best combo {}, failed {}",
            self.strategy.career(),
            stats.score,
            stats.best_combo,
            stats.failed
        );
        self.set_phase(WorldPhase::Results)
    }
}

fn wrap_cursor(cursor: usize, delta: i32, count: usize) -> usize {
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    let current = i64::try_from(cursor).unwrap_or(0);
    let next = current.saturating_add(i64::from(delta)).rem_euclid(count);
    usize::try_from(next).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Grade, grade_timeout};
    use crate::summary::ACCURACY_TABLE;

    /// Minimal timed quiz: answer `0` is always right.
    #[derive(Debug, Clone)]
    struct Quiz {
        review: WorldPhase,
        lives: Option<u8>,
    }

    impl Quiz {
        fn timed() -> Self {
            Self {
                review: WorldPhase::Feedback,
                lives: None,
            }
        }
    }

    impl GradingStrategy for Quiz {
        type Item = &'static str;
        type Board = ();
        type Action = usize;

        fn career(&self) -> CareerId {
            CareerId::Lawyer
        }

        fn review_phase(&self) -> WorldPhase {
            self.review
        }

        fn time_budget(&self, _item: &Self::Item) -> Option<f64> {
            Some(10.0)
        }

        fn starting_lives(&self) -> Option<u8> {
            self.lives
        }

        fn feedback_secs(&self) -> f64 {
            1.0
        }

        fn load(&self, _item: &Self::Item) -> Self::Board {}

        fn choice_count(&self, _item: &Self::Item, _board: &Self::Board) -> usize {
            3
        }

        fn cursor_action(&self, _item: &Self::Item, _board: &(), cursor: usize) -> Option<usize> {
            Some(cursor)
        }

        fn submit(&self, turn: Turn<'_, Self::Item, ()>, action: usize) -> Verdict {
            // 5 marks the answer sheet without handing it in.
            if action == 5 {
                return Verdict::accepted();
            }
            if action >= 3 {
                return Verdict::ignored();
            }
            let combo = turn.stats.combo;
            if action == 0 {
                Verdict::resolved(Grade::new(OutcomeTier::Correct, 10, combo + 1, "yes"))
            } else {
                Verdict::resolved(
                    Grade::new(OutcomeTier::Wrong, -5, 0, "no")
                        .with_time_penalty(2.0)
                        .with_life_cost(1),
                )
            }
        }

        fn timeout(&self, _turn: Turn<'_, Self::Item, ()>) -> Verdict {
            Verdict::resolved(grade_timeout("late"))
        }

        fn item_label(&self, item: &Self::Item) -> String {
            (*item).to_string()
        }

        fn performance(&self, stats: &SessionStats, items: &[Self::Item]) -> Performance {
            Performance {
                basis: crate::numbers::percentage(
                    stats.tally.correct,
                    crate::numbers::usize_to_u32(items.len()),
                ),
                achieved: stats.tally.correct,
                possible: crate::numbers::usize_to_u32(items.len()),
            }
        }

        fn grade_table(&self) -> &GradeTable {
            &ACCURACY_TABLE
        }
    }

    fn started(items: Vec<&'static str>, quiz: Quiz) -> WorldMachine<Quiz> {
        let mut machine = WorldMachine::new(quiz, items);
        assert_eq!(
            machine.handle_event(InputEvent::Confirm),
            Transition::PhaseChanged {
                from: WorldPhase::Intro,
                to: WorldPhase::Gameplay
            }
        );
        machine
    }

    #[test]
    fn empty_deck_goes_straight_to_results() {
        let mut machine = WorldMachine::new(Quiz::timed(), Vec::new());
        machine.start();
        assert_eq!(machine.phase(), WorldPhase::Results);
        assert!(machine.result().is_some());
    }

    #[test]
    fn submissions_outside_gameplay_are_ignored() {
        let mut machine = WorldMachine::new(Quiz::timed(), vec!["a"]);
        assert_eq!(machine.submit(0), Transition::Ignored);
        assert_eq!(machine.stats().score, 0);
        machine.start();
        machine.submit(0);
        assert_eq!(machine.phase(), WorldPhase::Feedback);
        assert_eq!(machine.submit(0), Transition::Ignored);
        assert_eq!(machine.stats().score, 10);
    }

    #[test]
    fn out_of_range_selection_changes_nothing() {
        let mut machine = started(vec!["a"], Quiz::timed());
        let before = machine.snapshot();
        assert_eq!(machine.submit(7), Transition::Ignored);
        assert_eq!(machine.snapshot(), before);
    }

    #[test]
    fn advance_round_trip_never_skips() {
        let mut machine = started(vec!["a", "b", "c"], Quiz::timed());
        for expected in 0..3 {
            assert_eq!(machine.session().current_index(), expected);
            machine.submit(0);
            machine.advance();
        }
        assert_eq!(machine.phase(), WorldPhase::Results);
        assert_eq!(machine.session().outcomes().len(), 3);
        let labels: Vec<_> = machine
            .session()
            .outcomes()
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(labels, ["a", "b", "c"]);
    }

    #[test]
    fn advance_only_from_review() {
        let mut machine = started(vec!["a", "b"], Quiz::timed());
        assert_eq!(machine.advance(), Transition::Ignored);
        assert_eq!(machine.session().current_index(), 0);
    }

    #[test]
    fn wrong_answer_penalises_clock_and_goes_to_review() {
        let mut machine = started(vec!["a", "b"], Quiz::timed());
        machine.tick(3.0);
        machine.submit(1);
        let hud = machine.snapshot();
        assert_eq!(hud.phase, WorldPhase::Feedback);
        assert_eq!(hud.time_remaining, Some(5.0));
        assert_eq!(hud.combo, 0);
        assert_eq!(hud.feedback_message.as_deref(), Some("no"));
    }

    #[test]
    fn countdown_crossing_zero_synthesizes_timeout() {
        let mut machine = started(vec!["a", "b"], Quiz::timed());
        machine.submit(0);
        machine.advance();
        assert_eq!(machine.stats().combo, 1);
        machine.tick(4.0);
        assert_eq!(machine.phase(), WorldPhase::Gameplay);
        let transition = machine.tick(6.0);
        assert_eq!(
            transition,
            Transition::PhaseChanged {
                from: WorldPhase::Gameplay,
                to: WorldPhase::Feedback
            }
        );
        assert_eq!(machine.stats().combo, 0);
        assert_eq!(machine.stats().tally.timeout, 1);
        assert_eq!(machine.stats().best_combo, 1);
    }

    #[test]
    fn frame_submission_beats_simultaneous_timeout() {
        let mut machine = started(vec!["a"], Quiz::timed());
        machine.tick(9.5);
        let report = machine.frame([InputEvent::Submit(0)], 1.0);
        assert_eq!(machine.stats().tally.correct, 1);
        assert_eq!(machine.stats().tally.timeout, 0);
        assert_eq!(report.phase_changes().count(), 1);
    }

    #[test]
    fn board_edits_every_frame_do_not_stop_the_clock() {
        let mut machine = started(vec!["a"], Quiz::timed());
        let mut frames = 0;
        while machine.phase() == WorldPhase::Gameplay && frames < 1_000 {
            let report = machine.frame([InputEvent::Submit(5)], 1.0 / 60.0);
            if frames == 0 {
                assert_eq!(report.transitions.first(), Some(&Transition::Updated));
            }
            frames += 1;
        }
        assert_eq!(machine.phase(), WorldPhase::Feedback);
        assert_eq!(machine.stats().tally.timeout, 1);
        assert!((590..=601).contains(&frames), "timed out after {frames} frames");
    }

    #[test]
    fn frame_without_input_times_out() {
        let mut machine = started(vec!["a"], Quiz::timed());
        machine.tick(9.5);
        let report = machine.frame(std::iter::empty(), 1.0);
        assert_eq!(machine.stats().tally.timeout, 1);
        assert_eq!(
            report.phase_changes().collect::<Vec<_>>(),
            [(WorldPhase::Gameplay, WorldPhase::Feedback)]
        );
    }

    #[test]
    fn navigation_wraps_and_confirm_submits_cursor() {
        let mut machine = started(vec!["a"], Quiz::timed());
        machine.navigate(-1);
        assert_eq!(machine.cursor(), 2);
        machine.navigate(1);
        assert_eq!(machine.cursor(), 0);
        machine.handle_event(InputEvent::Navigate(4));
        assert_eq!(machine.cursor(), 1);
        machine.handle_event(InputEvent::Navigate(-1));
        machine.handle_event(InputEvent::Confirm);
        assert_eq!(machine.stats().tally.correct, 1);
    }

    #[test]
    fn losing_last_life_forces_results_mid_deck() {
        let quiz = Quiz {
            review: WorldPhase::Feedback,
            lives: Some(2),
        };
        let mut machine = started(vec!["a", "b", "c", "d"], quiz);
        machine.submit(1);
        machine.advance();
        assert_eq!(machine.phase(), WorldPhase::Gameplay);
        machine.submit(2);
        assert_eq!(machine.phase(), WorldPhase::Results);
        let result = machine.result().unwrap();
        assert!(result.failed);
        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn abort_forces_results_and_results_exit_to_hub() {
        let mut machine = started(vec!["a", "b"], Quiz::timed());
        assert!(matches!(machine.abort(), Transition::PhaseChanged { .. }));
        assert_eq!(machine.abort(), Transition::Ignored);
        assert_eq!(
            machine.handle_event(InputEvent::Confirm),
            Transition::ExitRequested
        );
        assert!(!machine.result().unwrap().failed);
    }

    #[test]
    fn feedback_timer_counts_down_cosmetically() {
        let mut machine = started(vec!["a", "b"], Quiz::timed());
        machine.submit(0);
        assert!((machine.snapshot().feedback_timer - 1.0).abs() < f64::EPSILON);
        machine.tick(0.25);
        assert!((machine.snapshot().feedback_timer - 0.75).abs() < f64::EPSILON);
        machine.tick(5.0);
        assert!(machine.snapshot().feedback_timer.abs() < f64::EPSILON);
        assert_eq!(machine.phase(), WorldPhase::Feedback);
    }

    #[test]
    fn wrap_cursor_handles_large_deltas() {
        assert_eq!(wrap_cursor(0, -1, 4), 3);
        assert_eq!(wrap_cursor(3, 1, 4), 0);
        assert_eq!(wrap_cursor(1, -9, 4), 0);
    }
}
