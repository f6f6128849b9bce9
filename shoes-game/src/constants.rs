//! Centralized constants for the career worlds.
//!
//! Tunable balance numbers live in [`crate::config`]; the values here are
//! structural (lane counts, display sweep geometry, fixed feedback copy) and
//! only change alongside code.

// Logging targets ----------------------------------------------------------
pub(crate) const LOG_TARGET_ENGINE: &str = "shoes::engine";
pub(crate) const LOG_TARGET_WORLD: &str = "shoes::world";
pub(crate) const LOG_TARGET_DECK: &str = "shoes::deck";
pub(crate) const LOG_TARGET_CATALOG: &str = "shoes::catalog";

// Influencer stage ---------------------------------------------------------
/// Number of beat lanes (left, down, right).
pub const LANE_COUNT: u8 = 3;
/// Indicator sweep speed in display units per second at speed 1.0.
pub(crate) const INDICATOR_RATE: f64 = 200.0;
/// Width of the indicator bar the sweep wraps around.
pub(crate) const INDICATOR_SPAN: f64 = 700.0;

// Approval meter -----------------------------------------------------------
pub const APPROVAL_MIN: u8 = 0;
pub const APPROVAL_MAX: u8 = 100;

// Feedback copy ------------------------------------------------------------
pub(crate) const MSG_DOCTOR_TIMEOUT: &str = "Time's Up!";
pub(crate) const MSG_LAWYER_CORRECT: &str = "Contradiction Found!";
pub(crate) const MSG_LAWYER_WRONG: &str = "Incorrect Analysis";
pub(crate) const MSG_LAWYER_TIMEOUT: &str = "Time's Up! The judge is impatient.";
pub(crate) const MSG_HIT_PERFECT: &str = "PERFECT!";
pub(crate) const MSG_HIT_GOOD: &str = "GOOD!";
pub(crate) const MSG_HIT_OK: &str = "OK";
pub(crate) const MSG_HIT_MISS: &str = "MISS";
pub(crate) const MSG_ENGINEER_TIMEOUT: &str = "Time's Up!";
