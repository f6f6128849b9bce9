use serde::{Deserialize, Serialize};

use crate::constants::{APPROVAL_MAX, APPROVAL_MIN};
use crate::numbers::sanitize_dt;
use crate::scoring::{Grade, OutcomeTier};

/// Persistent public-approval meter clamped to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Approval(u8);

impl Approval {
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.clamp(APPROVAL_MIN, APPROVAL_MAX))
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Apply a signed delta and return the change actually applied after clamping.
    pub fn apply(&mut self, delta: i32) -> i32 {
        let before = i32::from(self.0);
        let after = before
            .saturating_add(delta)
            .clamp(i32::from(APPROVAL_MIN), i32::from(APPROVAL_MAX));
        self.0 = u8::try_from(after).unwrap_or(APPROVAL_MAX);
        after - before
    }
}

/// Per-tier answer counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub perfect: u32,
    pub correct: u32,
    pub excellent: u32,
    pub good: u32,
    pub ok: u32,
    pub neutral: u32,
    pub partial: u32,
    pub poor: u32,
    pub wrong: u32,
    pub miss: u32,
    pub timeout: u32,
}

impl OutcomeTally {
    fn slot(&mut self, tier: OutcomeTier) -> &mut u32 {
        match tier {
            OutcomeTier::Perfect => &mut self.perfect,
            OutcomeTier::Correct => &mut self.correct,
            OutcomeTier::Excellent => &mut self.excellent,
            OutcomeTier::Good => &mut self.good,
            OutcomeTier::Ok => &mut self.ok,
            OutcomeTier::Neutral => &mut self.neutral,
            OutcomeTier::Partial => &mut self.partial,
            OutcomeTier::Poor => &mut self.poor,
            OutcomeTier::Wrong => &mut self.wrong,
            OutcomeTier::Miss => &mut self.miss,
            OutcomeTier::Timeout => &mut self.timeout,
        }
    }

    pub fn record(&mut self, tier: OutcomeTier) {
        let slot = self.slot(tier);
        *slot = slot.saturating_add(1);
    }

    #[must_use]
    pub const fn count(&self, tier: OutcomeTier) -> u32 {
        match tier {
            OutcomeTier::Perfect => self.perfect,
            OutcomeTier::Correct => self.correct,
            OutcomeTier::Excellent => self.excellent,
            OutcomeTier::Good => self.good,
            OutcomeTier::Ok => self.ok,
            OutcomeTier::Neutral => self.neutral,
            OutcomeTier::Partial => self.partial,
            OutcomeTier::Poor => self.poor,
            OutcomeTier::Wrong => self.wrong,
            OutcomeTier::Miss => self.miss,
            OutcomeTier::Timeout => self.timeout,
        }
    }

    #[must_use]
    pub const fn successes(&self) -> u32 {
        self.perfect
            .saturating_add(self.correct)
            .saturating_add(self.excellent)
            .saturating_add(self.good)
    }

    #[must_use]
    pub const fn failures(&self) -> u32 {
        self.partial
            .saturating_add(self.poor)
            .saturating_add(self.wrong)
            .saturating_add(self.miss)
            .saturating_add(self.timeout)
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.successes()
            .saturating_add(self.failures())
            .saturating_add(self.ok)
            .saturating_add(self.neutral)
    }
}

/// Cumulative session aggregates. Mutated only through [`SessionStats::apply`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub score: u32,
    pub combo: u32,
    pub best_combo: u32,
    pub lives: Option<u8>,
    pub approval: Option<Approval>,
    pub tally: OutcomeTally,
    pub misplaced: u32,
    pub failed: bool,
}

impl SessionStats {
    #[must_use]
    pub fn new(lives: Option<u8>, approval: Option<u8>) -> Self {
        Self {
            lives,
            approval: approval.map(Approval::new),
            ..Self::default()
        }
    }

    /// Fold one grade into the aggregates. Score never drops below zero.
    pub fn apply(&mut self, grade: &Grade) {
        self.score = self.score.saturating_add_signed(grade.points);
        self.combo = grade.combo_after;
        self.best_combo = self.best_combo.max(self.combo);
        self.tally.record(grade.tier);
        self.misplaced = self.misplaced.saturating_add(grade.misplaced);
        if grade.life_cost > 0
            && let Some(lives) = self.lives.as_mut()
        {
            *lives = lives.saturating_sub(grade.life_cost);
        }
        if let Some(approval) = self.approval.as_mut() {
            approval.apply(grade.approval_delta);
        }
    }

    #[must_use]
    pub fn out_of_lives(&self) -> bool {
        self.lives == Some(0)
    }
}

/// Record of a finished item, kept as read-only history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOutcome {
    pub index: usize,
    pub label: String,
    /// Tier of the last grade applied to the item.
    pub tier: OutcomeTier,
    pub points: i32,
    pub tally: OutcomeTally,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Grades accumulated for the item in play.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ItemProgress {
    pub points: i32,
    pub tally: OutcomeTally,
    pub last_tier: Option<OutcomeTier>,
    pub message: String,
}

impl ItemProgress {
    pub fn record(&mut self, grade: &Grade) {
        self.points = self.points.saturating_add(grade.points);
        self.tally.record(grade.tier);
        self.last_tier = Some(grade.tier);
        self.message.clone_from(&grade.message);
    }
}

/// Countdown for the item in play. Untimed items carry no budget.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemClock {
    pub budget: Option<f64>,
    pub remaining: f64,
    pub elapsed: f64,
}

impl ItemClock {
    #[must_use]
    pub fn start(budget: Option<f64>) -> Self {
        Self {
            budget,
            remaining: budget.unwrap_or(0.0),
            elapsed: 0.0,
        }
    }

    pub fn tick(&mut self, dt: f64) {
        let dt = sanitize_dt(dt);
        self.elapsed += dt;
        if self.budget.is_some() {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    /// Remove seconds from the countdown, flooring at zero.
    pub fn penalise(&mut self, seconds: f64) {
        if self.budget.is_some() && seconds > 0.0 {
            self.remaining = (self.remaining - seconds).max(0.0);
        }
    }

    /// Closed lower bound: exactly zero counts as expired.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.budget.is_some() && self.remaining <= 0.0
    }

    #[must_use]
    pub fn time_remaining(&self) -> Option<f64> {
        self.budget.map(|_| self.remaining)
    }
}

/// Ordered, non-repeating deck plus cursor and aggregates for one playthrough.
#[derive(Debug, Clone, PartialEq)]
pub struct Session<I> {
    items: Vec<I>,
    current_index: usize,
    pub(crate) stats: SessionStats,
    outcomes: Vec<ItemOutcome>,
}

impl<I> Session<I> {
    #[must_use]
    pub fn new(items: Vec<I>, stats: SessionStats) -> Self {
        Self {
            items,
            current_index: 0,
            stats,
            outcomes: Vec::new(),
        }
    }

    #[must_use]
    pub fn items(&self) -> &[I] {
        &self.items
    }

    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current(&self) -> Option<&I> {
        self.items.get(self.current_index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_index + 1 < self.items.len()
    }

    /// Move the cursor forward; returns false when no item remains.
    pub(crate) fn step(&mut self) -> bool {
        if self.has_next() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[must_use]
    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    pub(crate) fn record_outcome(&mut self, outcome: ItemOutcome) {
        self.outcomes.push(outcome);
    }
}
