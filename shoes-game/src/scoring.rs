//! Pure grading rules for single answer events.
//!
//! Nothing here touches session state: each function maps one submission
//! (plus the clock and combo at that moment) to a [`Grade`] that the world
//! machine folds into the session.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{DoctorCfg, EngineerCfg, InfluencerCfg, LawyerCfg, PoliticianCfg};
use crate::constants::{
    MSG_ENGINEER_TIMEOUT, MSG_HIT_GOOD, MSG_HIT_MISS, MSG_HIT_OK, MSG_HIT_PERFECT,
    MSG_LAWYER_CORRECT, MSG_LAWYER_WRONG,
};
use crate::data::PolicyResponse;
use crate::numbers::{floor_f64_to_u32, u32_to_i32};

/// Classification of a graded answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTier {
    Perfect,
    Correct,
    Excellent,
    Good,
    Ok,
    Neutral,
    Partial,
    Poor,
    Wrong,
    Miss,
    Timeout,
}

impl OutcomeTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Correct => "correct",
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Ok => "ok",
            Self::Neutral => "neutral",
            Self::Partial => "partial",
            Self::Poor => "poor",
            Self::Wrong => "wrong",
            Self::Miss => "miss",
            Self::Timeout => "timeout",
        }
    }

    /// Successes extend the combo.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(
            self,
            Self::Perfect | Self::Correct | Self::Excellent | Self::Good
        )
    }

    /// Failures reset the combo to zero.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(
            self,
            Self::Partial | Self::Poor | Self::Wrong | Self::Miss | Self::Timeout
        )
    }

    /// Headline shown above a policy outcome.
    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent Decision!",
            Self::Good => "Good Response",
            Self::Neutral => "Neutral Outcome",
            Self::Poor => "Poor Decision",
            Self::Perfect => "Perfect!",
            Self::Correct => "Correct!",
            Self::Ok => "OK",
            Self::Partial => "Needs work!",
            Self::Wrong => "Wrong!",
            Self::Miss => "Miss",
            Self::Timeout => "Time's Up!",
        }
    }
}

impl fmt::Display for OutcomeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clock and combo at the moment an answer is graded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attempt {
    pub time_remaining: f64,
    pub time_budget: f64,
    pub combo: u32,
}

/// Result of grading one answer event.
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub tier: OutcomeTier,
    /// Signed score delta; negative deltas are clamped at a session floor of zero.
    pub points: i32,
    pub combo_after: u32,
    /// Seconds removed from the item clock.
    pub time_penalty: f64,
    pub life_cost: u8,
    pub approval_delta: i32,
    /// Components sitting on the wrong target cell when the grid was graded.
    pub misplaced: u32,
    pub message: String,
}

impl Grade {
    #[must_use]
    pub fn new(tier: OutcomeTier, points: i32, combo_after: u32, message: impl Into<String>) -> Self {
        Self {
            tier,
            points,
            combo_after,
            time_penalty: 0.0,
            life_cost: 0,
            approval_delta: 0,
            misplaced: 0,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_time_penalty(mut self, seconds: f64) -> Self {
        self.time_penalty = seconds;
        self
    }

    #[must_use]
    pub fn with_life_cost(mut self, lives: u8) -> Self {
        self.life_cost = lives;
        self
    }

    #[must_use]
    pub fn with_approval(mut self, delta: i32) -> Self {
        self.approval_delta = delta;
        self
    }

    #[must_use]
    pub fn with_misplaced(mut self, count: u32) -> Self {
        self.misplaced = count;
        self
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.tier.is_success()
    }
}

/// `floor((remaining / budget) * scale)`; zero for an untimed or exhausted clock.
#[must_use]
pub fn time_bonus(time_remaining: f64, time_budget: f64, scale: f64) -> u32 {
    if time_budget.is_nan() || time_budget <= 0.0 || time_remaining <= 0.0 {
        return 0;
    }
    let ratio = (time_remaining / time_budget).min(1.0);
    floor_f64_to_u32(ratio * scale)
}

fn success_points(base: u32, bonus: u32, combo_after: u32, per_combo: u32) -> i32 {
    let combo_points = combo_after.saturating_mul(per_combo);
    u32_to_i32(base.saturating_add(bonus).saturating_add(combo_points))
}

fn penalty(points: u32) -> i32 {
    u32_to_i32(points).saturating_neg()
}

/// Grade a diagnosis pick.
#[must_use]
pub fn grade_diagnosis(cfg: &DoctorCfg, attempt: Attempt, chosen: &str, correct: &str) -> Grade {
    if chosen == correct {
        let combo_after = attempt.combo.saturating_add(1);
        let bonus = time_bonus(
            attempt.time_remaining,
            attempt.time_budget,
            cfg.time_bonus_scale,
        );
        let points = success_points(cfg.base_points, bonus, combo_after, cfg.combo_bonus);
        return Grade::new(
            OutcomeTier::Correct,
            points,
            combo_after,
            format!("+{points} pts"),
        );
    }
    Grade::new(
        OutcomeTier::Wrong,
        penalty(cfg.wrong_penalty),
        0,
        format!("Wrong - correct: {correct} (-{} pts)", cfg.wrong_penalty),
    )
    .with_time_penalty(cfg.time_penalty)
    .with_life_cost(1)
}

/// Grade a contradiction pick.
#[must_use]
pub fn grade_testimony(cfg: &LawyerCfg, attempt: Attempt, chosen: usize, contradiction: usize) -> Grade {
    if chosen == contradiction {
        let streak_after = attempt.combo.saturating_add(1);
        let bonus = time_bonus(
            attempt.time_remaining,
            attempt.time_budget,
            cfg.time_bonus_scale,
        );
        let points = success_points(cfg.base_points, bonus, streak_after, cfg.streak_bonus);
        return Grade::new(
            OutcomeTier::Correct,
            points,
            streak_after,
            format!("+{points} pts - {MSG_LAWYER_CORRECT}"),
        );
    }
    Grade::new(
        OutcomeTier::Wrong,
        penalty(cfg.wrong_penalty),
        0,
        MSG_LAWYER_WRONG,
    )
    .with_time_penalty(cfg.time_penalty)
}

/// Automatic failure when the item clock runs out.
#[must_use]
pub fn grade_timeout(message: &str) -> Grade {
    Grade::new(OutcomeTier::Timeout, 0, 0, message)
}

/// Timing quality of a beat hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitQuality {
    Perfect,
    Good,
    Ok,
}

/// Classify the absolute offset between input and beat target, if it lands at all.
#[must_use]
pub fn classify_hit(cfg: &InfluencerCfg, offset: f64) -> Option<HitQuality> {
    let offset = offset.abs();
    if offset <= cfg.perfect_window {
        Some(HitQuality::Perfect)
    } else if offset <= cfg.good_window {
        Some(HitQuality::Good)
    } else if offset <= cfg.ok_window {
        Some(HitQuality::Ok)
    } else {
        None
    }
}

#[must_use]
pub fn grade_hit(cfg: &InfluencerCfg, quality: HitQuality, combo: u32) -> Grade {
    match quality {
        HitQuality::Perfect => {
            let combo_after = combo.saturating_add(1);
            let points = success_points(cfg.perfect_points, 0, combo_after, cfg.perfect_combo_bonus);
            Grade::new(OutcomeTier::Perfect, points, combo_after, MSG_HIT_PERFECT)
        }
        HitQuality::Good => {
            let combo_after = combo.saturating_add(1);
            let points = success_points(cfg.good_points, 0, combo_after, cfg.good_combo_bonus);
            Grade::new(OutcomeTier::Good, points, combo_after, MSG_HIT_GOOD)
        }
        // Sloppy hits still score but bleed one step of combo.
        HitQuality::Ok => Grade::new(
            OutcomeTier::Ok,
            u32_to_i32(cfg.ok_points),
            combo.saturating_sub(1),
            MSG_HIT_OK,
        ),
    }
}

#[must_use]
pub fn grade_miss() -> Grade {
    Grade::new(OutcomeTier::Miss, 0, 0, MSG_HIT_MISS)
}

/// Classify a policy response by its approval delta.
#[must_use]
pub const fn classify_response(cfg: &PoliticianCfg, delta: i32) -> OutcomeTier {
    if delta > cfg.excellent_above {
        OutcomeTier::Excellent
    } else if delta > cfg.good_above {
        OutcomeTier::Good
    } else if delta >= cfg.neutral_floor {
        OutcomeTier::Neutral
    } else {
        OutcomeTier::Poor
    }
}

/// Grade a policy response; the combo is carried through untouched.
#[must_use]
pub fn grade_response(cfg: &PoliticianCfg, response: &PolicyResponse, combo: u32) -> Grade {
    let delta = response.approval_delta;
    let tier = classify_response(cfg, delta);
    let points = match tier {
        OutcomeTier::Excellent => u32_to_i32(cfg.excellent_points)
            .saturating_add(cfg.excellent_delta_factor.saturating_mul(delta)),
        OutcomeTier::Good => u32_to_i32(cfg.good_points).saturating_add(delta),
        OutcomeTier::Neutral => u32_to_i32(cfg.neutral_points),
        _ => penalty(cfg.poor_penalty),
    };
    Grade::new(
        tier,
        points,
        combo,
        format!("Approval {delta:+}% - {}", response.outcome),
    )
    .with_approval(delta)
}

/// Placement tallies for a graded circuit grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CircuitCheck {
    pub correct: u32,
    pub total: u32,
    pub misplaced: u32,
}

impl CircuitCheck {
    #[must_use]
    pub fn accuracy(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total)
    }

    #[must_use]
    pub const fn is_perfect(self) -> bool {
        self.total > 0 && self.correct == self.total
    }
}

/// Grade a whole circuit grid at once.
///
/// Score is `floor(accuracy * accuracy_points) + floor(time_remaining * rate)`.
/// A timed-out grid keeps its accuracy points but earns no time bonus and
/// always breaks the perfect streak.
#[must_use]
pub fn grade_circuit(
    cfg: &EngineerCfg,
    check: CircuitCheck,
    time_remaining: f64,
    combo: u32,
    timed_out: bool,
) -> Grade {
    let accuracy = check.accuracy();
    let base = floor_f64_to_u32(accuracy * cfg.accuracy_points);
    let bonus = if timed_out {
        0
    } else {
        floor_f64_to_u32(time_remaining * cfg.time_bonus_rate)
    };
    let points = u32_to_i32(base.saturating_add(bonus));
    let verdict = if check.is_perfect() {
        "Perfect!"
    } else if accuracy >= cfg.good_accuracy {
        "Good!"
    } else {
        "Needs work!"
    };
    let (tier, combo_after, message) = if timed_out {
        (
            OutcomeTier::Timeout,
            0,
            format!("{MSG_ENGINEER_TIMEOUT} {verdict} +{points} pts"),
        )
    } else if check.is_perfect() {
        (
            OutcomeTier::Perfect,
            combo.saturating_add(1),
            format!("{verdict} +{points} pts"),
        )
    } else {
        (OutcomeTier::Partial, 0, format!("{verdict} +{points} pts"))
    };
    Grade::new(tier, points, combo_after, message).with_misplaced(check.misplaced)
}
