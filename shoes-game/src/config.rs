//! Per-world tuning tables.
//!
//! Every field carries a serde default so partial JSON overlays only need to
//! name the values they change. Defaults reproduce the shipped balance.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::APPROVAL_MAX;
use crate::numbers::usize_to_f64;

/// Errors raised when tuning configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be at least {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("hit windows must widen: perfect {perfect:.2} <= good {good:.2} <= ok {ok:.2}")]
    WindowOrder { perfect: f64, good: f64, ok: f64 },
    #[error(
        "approval tiers must ascend: neutral floor {neutral} <= good above {good} <= excellent above {excellent}"
    )]
    TierOrder {
        neutral: i32,
        good: i32,
        excellent: i32,
    },
    #[error("failed to parse game config: {0}")]
    Parse(#[from] serde_json::Error),
}

fn require_min(field: &'static str, min: f64, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < min {
        return Err(ConfigError::MinViolation { field, min, value });
    }
    Ok(())
}

fn require_range(field: &'static str, min: f64, max: f64, value: f64) -> Result<(), ConfigError> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::RangeViolation {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

fn require_count(field: &'static str, value: usize) -> Result<(), ConfigError> {
    require_min(field, 1.0, usize_to_f64(value))
}

/// Complete tuning for all five worlds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub doctor: DoctorCfg,
    #[serde(default)]
    pub lawyer: LawyerCfg,
    #[serde(default)]
    pub influencer: InfluencerCfg,
    #[serde(default)]
    pub politician: PoliticianCfg,
    #[serde(default)]
    pub engineer: EngineerCfg,
}

impl GameConfig {
    /// Parse a (possibly partial) JSON overlay and validate the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and the matching
    /// violation when a value is out of bounds.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants for every world.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.doctor.validate()?;
        self.lawyer.validate()?;
        self.influencer.validate()?;
        self.politician.validate()?;
        self.engineer.validate()?;
        Ok(())
    }
}

/// Triage diagnosis tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorCfg {
    #[serde(default = "DoctorCfg::default_patients")]
    pub patients: usize,
    #[serde(default = "DoctorCfg::default_time_per_patient")]
    pub time_per_patient: f64,
    #[serde(default = "DoctorCfg::default_lives")]
    pub lives: u8,
    #[serde(default = "DoctorCfg::default_option_count")]
    pub option_count: usize,
    #[serde(default = "DoctorCfg::default_base_points")]
    pub base_points: u32,
    #[serde(default = "DoctorCfg::default_time_bonus_scale")]
    pub time_bonus_scale: f64,
    #[serde(default = "DoctorCfg::default_combo_bonus")]
    pub combo_bonus: u32,
    #[serde(default = "DoctorCfg::default_wrong_penalty")]
    pub wrong_penalty: u32,
    #[serde(default = "DoctorCfg::default_time_penalty")]
    pub time_penalty: f64,
    #[serde(default = "DoctorCfg::default_feedback_secs")]
    pub feedback_secs: f64,
}

impl DoctorCfg {
    const fn default_patients() -> usize {
        5
    }

    const fn default_time_per_patient() -> f64 {
        15.0
    }

    const fn default_lives() -> u8 {
        3
    }

    const fn default_option_count() -> usize {
        4
    }

    const fn default_base_points() -> u32 {
        100
    }

    const fn default_time_bonus_scale() -> f64 {
        50.0
    }

    const fn default_combo_bonus() -> u32 {
        10
    }

    const fn default_wrong_penalty() -> u32 {
        25
    }

    const fn default_time_penalty() -> f64 {
        3.0
    }

    const fn default_feedback_secs() -> f64 {
        1.5
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_count("doctor.patients", self.patients)?;
        require_min("doctor.time_per_patient", 1.0, self.time_per_patient)?;
        require_min("doctor.lives", 1.0, f64::from(self.lives))?;
        require_range(
            "doctor.option_count",
            2.0,
            8.0,
            usize_to_f64(self.option_count),
        )?;
        require_min("doctor.time_bonus_scale", 0.0, self.time_bonus_scale)?;
        require_min("doctor.time_penalty", 0.0, self.time_penalty)?;
        require_min("doctor.feedback_secs", 0.0, self.feedback_secs)?;
        Ok(())
    }
}

impl Default for DoctorCfg {
    fn default() -> Self {
        Self {
            patients: Self::default_patients(),
            time_per_patient: Self::default_time_per_patient(),
            lives: Self::default_lives(),
            option_count: Self::default_option_count(),
            base_points: Self::default_base_points(),
            time_bonus_scale: Self::default_time_bonus_scale(),
            combo_bonus: Self::default_combo_bonus(),
            wrong_penalty: Self::default_wrong_penalty(),
            time_penalty: Self::default_time_penalty(),
            feedback_secs: Self::default_feedback_secs(),
        }
    }
}

/// Testimony contradiction tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LawyerCfg {
    #[serde(default = "LawyerCfg::default_cases")]
    pub cases: usize,
    #[serde(default = "LawyerCfg::default_time_per_case")]
    pub time_per_case: f64,
    #[serde(default = "LawyerCfg::default_base_points")]
    pub base_points: u32,
    #[serde(default = "LawyerCfg::default_time_bonus_scale")]
    pub time_bonus_scale: f64,
    #[serde(default = "LawyerCfg::default_streak_bonus")]
    pub streak_bonus: u32,
    #[serde(default = "LawyerCfg::default_wrong_penalty")]
    pub wrong_penalty: u32,
    #[serde(default = "LawyerCfg::default_time_penalty")]
    pub time_penalty: f64,
    #[serde(default = "LawyerCfg::default_feedback_secs")]
    pub feedback_secs: f64,
}

impl LawyerCfg {
    const fn default_cases() -> usize {
        5
    }

    const fn default_time_per_case() -> f64 {
        30.0
    }

    const fn default_base_points() -> u32 {
        100
    }

    const fn default_time_bonus_scale() -> f64 {
        50.0
    }

    const fn default_streak_bonus() -> u32 {
        15
    }

    const fn default_wrong_penalty() -> u32 {
        30
    }

    const fn default_time_penalty() -> f64 {
        5.0
    }

    const fn default_feedback_secs() -> f64 {
        2.0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_count("lawyer.cases", self.cases)?;
        require_min("lawyer.time_per_case", 1.0, self.time_per_case)?;
        require_min("lawyer.time_bonus_scale", 0.0, self.time_bonus_scale)?;
        require_min("lawyer.time_penalty", 0.0, self.time_penalty)?;
        require_min("lawyer.feedback_secs", 0.0, self.feedback_secs)?;
        Ok(())
    }
}

impl Default for LawyerCfg {
    fn default() -> Self {
        Self {
            cases: Self::default_cases(),
            time_per_case: Self::default_time_per_case(),
            base_points: Self::default_base_points(),
            time_bonus_scale: Self::default_time_bonus_scale(),
            streak_bonus: Self::default_streak_bonus(),
            wrong_penalty: Self::default_wrong_penalty(),
            time_penalty: Self::default_time_penalty(),
            feedback_secs: Self::default_feedback_secs(),
        }
    }
}

/// Rhythm timing tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluencerCfg {
    #[serde(default = "InfluencerCfg::default_videos")]
    pub videos: usize,
    #[serde(default = "InfluencerCfg::default_perfect_window")]
    pub perfect_window: f64,
    #[serde(default = "InfluencerCfg::default_good_window")]
    pub good_window: f64,
    #[serde(default = "InfluencerCfg::default_ok_window")]
    pub ok_window: f64,
    #[serde(default = "InfluencerCfg::default_perfect_points")]
    pub perfect_points: u32,
    #[serde(default = "InfluencerCfg::default_perfect_combo_bonus")]
    pub perfect_combo_bonus: u32,
    #[serde(default = "InfluencerCfg::default_good_points")]
    pub good_points: u32,
    #[serde(default = "InfluencerCfg::default_good_combo_bonus")]
    pub good_combo_bonus: u32,
    #[serde(default = "InfluencerCfg::default_ok_points")]
    pub ok_points: u32,
    #[serde(default = "InfluencerCfg::default_starting_energy")]
    pub starting_energy: f64,
    #[serde(default = "InfluencerCfg::default_energy_drain")]
    pub energy_drain: f64,
    #[serde(default = "InfluencerCfg::default_miss_energy")]
    pub miss_energy: f64,
    #[serde(default = "InfluencerCfg::default_perfect_energy")]
    pub perfect_energy: f64,
    #[serde(default = "InfluencerCfg::default_good_energy")]
    pub good_energy: f64,
    #[serde(default = "InfluencerCfg::default_beat_spacing")]
    pub beat_spacing: f64,
    #[serde(default = "InfluencerCfg::default_beat_jitter")]
    pub beat_jitter: f64,
    #[serde(default = "InfluencerCfg::default_feedback_secs")]
    pub feedback_secs: f64,
}

impl InfluencerCfg {
    const fn default_videos() -> usize {
        4
    }

    const fn default_perfect_window() -> f64 {
        0.15
    }

    const fn default_good_window() -> f64 {
        0.25
    }

    const fn default_ok_window() -> f64 {
        0.4
    }

    const fn default_perfect_points() -> u32 {
        100
    }

    const fn default_perfect_combo_bonus() -> u32 {
        10
    }

    const fn default_good_points() -> u32 {
        50
    }

    const fn default_good_combo_bonus() -> u32 {
        5
    }

    const fn default_ok_points() -> u32 {
        25
    }

    const fn default_starting_energy() -> f64 {
        100.0
    }

    const fn default_energy_drain() -> f64 {
        2.0
    }

    const fn default_miss_energy() -> f64 {
        10.0
    }

    const fn default_perfect_energy() -> f64 {
        5.0
    }

    const fn default_good_energy() -> f64 {
        2.0
    }

    const fn default_beat_spacing() -> f64 {
        1.2
    }

    const fn default_beat_jitter() -> f64 {
        0.1
    }

    const fn default_feedback_secs() -> f64 {
        0.5
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_count("influencer.videos", self.videos)?;
        if !(self.perfect_window > 0.0
            && self.perfect_window <= self.good_window
            && self.good_window <= self.ok_window)
        {
            return Err(ConfigError::WindowOrder {
                perfect: self.perfect_window,
                good: self.good_window,
                ok: self.ok_window,
            });
        }
        require_min("influencer.starting_energy", 1.0, self.starting_energy)?;
        require_min("influencer.energy_drain", 0.0, self.energy_drain)?;
        require_min("influencer.miss_energy", 0.0, self.miss_energy)?;
        require_min("influencer.beat_spacing", 0.1, self.beat_spacing)?;
        // Jitter must stay below half the spacing so beats never reorder.
        require_range(
            "influencer.beat_jitter",
            0.0,
            self.beat_spacing / 2.0,
            self.beat_jitter,
        )?;
        require_min("influencer.feedback_secs", 0.0, self.feedback_secs)?;
        Ok(())
    }
}

impl Default for InfluencerCfg {
    fn default() -> Self {
        Self {
            videos: Self::default_videos(),
            perfect_window: Self::default_perfect_window(),
            good_window: Self::default_good_window(),
            ok_window: Self::default_ok_window(),
            perfect_points: Self::default_perfect_points(),
            perfect_combo_bonus: Self::default_perfect_combo_bonus(),
            good_points: Self::default_good_points(),
            good_combo_bonus: Self::default_good_combo_bonus(),
            ok_points: Self::default_ok_points(),
            starting_energy: Self::default_starting_energy(),
            energy_drain: Self::default_energy_drain(),
            miss_energy: Self::default_miss_energy(),
            perfect_energy: Self::default_perfect_energy(),
            good_energy: Self::default_good_energy(),
            beat_spacing: Self::default_beat_spacing(),
            beat_jitter: Self::default_beat_jitter(),
            feedback_secs: Self::default_feedback_secs(),
        }
    }
}

/// Policy response tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoliticianCfg {
    #[serde(default = "PoliticianCfg::default_issues")]
    pub issues: usize,
    #[serde(default = "PoliticianCfg::default_starting_approval")]
    pub starting_approval: u8,
    /// Deltas strictly above this are excellent.
    #[serde(default = "PoliticianCfg::default_excellent_above")]
    pub excellent_above: i32,
    /// Deltas strictly above this (and not excellent) are good.
    #[serde(default = "PoliticianCfg::default_good_above")]
    pub good_above: i32,
    /// Deltas at or above this (and not good) are neutral.
    #[serde(default = "PoliticianCfg::default_neutral_floor")]
    pub neutral_floor: i32,
    #[serde(default = "PoliticianCfg::default_excellent_points")]
    pub excellent_points: u32,
    #[serde(default = "PoliticianCfg::default_excellent_delta_factor")]
    pub excellent_delta_factor: i32,
    #[serde(default = "PoliticianCfg::default_good_points")]
    pub good_points: u32,
    #[serde(default = "PoliticianCfg::default_neutral_points")]
    pub neutral_points: u32,
    #[serde(default = "PoliticianCfg::default_poor_penalty")]
    pub poor_penalty: u32,
    #[serde(default = "PoliticianCfg::default_feedback_secs")]
    pub feedback_secs: f64,
}

impl PoliticianCfg {
    const fn default_issues() -> usize {
        6
    }

    const fn default_starting_approval() -> u8 {
        50
    }

    const fn default_excellent_above() -> i32 {
        10
    }

    const fn default_good_above() -> i32 {
        0
    }

    const fn default_neutral_floor() -> i32 {
        -5
    }

    const fn default_excellent_points() -> u32 {
        100
    }

    const fn default_excellent_delta_factor() -> i32 {
        2
    }

    const fn default_good_points() -> u32 {
        50
    }

    const fn default_neutral_points() -> u32 {
        25
    }

    const fn default_poor_penalty() -> u32 {
        25
    }

    const fn default_feedback_secs() -> f64 {
        2.0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_count("politician.issues", self.issues)?;
        require_range(
            "politician.starting_approval",
            0.0,
            f64::from(APPROVAL_MAX),
            f64::from(self.starting_approval),
        )?;
        if !(self.neutral_floor <= self.good_above && self.good_above <= self.excellent_above) {
            return Err(ConfigError::TierOrder {
                neutral: self.neutral_floor,
                good: self.good_above,
                excellent: self.excellent_above,
            });
        }
        require_min(
            "politician.excellent_delta_factor",
            0.0,
            f64::from(self.excellent_delta_factor),
        )?;
        require_min("politician.feedback_secs", 0.0, self.feedback_secs)?;
        Ok(())
    }
}

impl Default for PoliticianCfg {
    fn default() -> Self {
        Self {
            issues: Self::default_issues(),
            starting_approval: Self::default_starting_approval(),
            excellent_above: Self::default_excellent_above(),
            good_above: Self::default_good_above(),
            neutral_floor: Self::default_neutral_floor(),
            excellent_points: Self::default_excellent_points(),
            excellent_delta_factor: Self::default_excellent_delta_factor(),
            good_points: Self::default_good_points(),
            neutral_points: Self::default_neutral_points(),
            poor_penalty: Self::default_poor_penalty(),
            feedback_secs: Self::default_feedback_secs(),
        }
    }
}

/// Circuit placement tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineerCfg {
    #[serde(default = "EngineerCfg::default_puzzles")]
    pub puzzles: usize,
    #[serde(default = "EngineerCfg::default_accuracy_points")]
    pub accuracy_points: f64,
    /// Points per whole second left on the puzzle clock.
    #[serde(default = "EngineerCfg::default_time_bonus_rate")]
    pub time_bonus_rate: f64,
    /// Accuracy at or above which a non-perfect grid still reads as "Good!".
    #[serde(default = "EngineerCfg::default_good_accuracy")]
    pub good_accuracy: f64,
    #[serde(default = "EngineerCfg::default_feedback_secs")]
    pub feedback_secs: f64,
}

impl EngineerCfg {
    const fn default_puzzles() -> usize {
        4
    }

    const fn default_accuracy_points() -> f64 {
        200.0
    }

    const fn default_time_bonus_rate() -> f64 {
        5.0
    }

    const fn default_good_accuracy() -> f64 {
        0.5
    }

    const fn default_feedback_secs() -> f64 {
        2.0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        require_count("engineer.puzzles", self.puzzles)?;
        require_min("engineer.accuracy_points", 0.0, self.accuracy_points)?;
        require_min("engineer.time_bonus_rate", 0.0, self.time_bonus_rate)?;
        require_range("engineer.good_accuracy", 0.0, 1.0, self.good_accuracy)?;
        require_min("engineer.feedback_secs", 0.0, self.feedback_secs)?;
        Ok(())
    }
}

impl Default for EngineerCfg {
    fn default() -> Self {
        Self {
            puzzles: Self::default_puzzles(),
            accuracy_points: Self::default_accuracy_points(),
            time_bonus_rate: Self::default_time_bonus_rate(),
            good_accuracy: Self::default_good_accuracy(),
            feedback_secs: Self::default_feedback_secs(),
        }
    }
}
