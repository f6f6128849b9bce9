//! Session aggregation into letter grades and career titles.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::career::CareerId;
use crate::world::{ItemOutcome, OutcomeTally};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
}

impl LetterGrade {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One threshold row; `min` is inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeRow {
    pub min: f64,
    pub grade: LetterGrade,
    pub title: Option<&'static str>,
}

impl GradeRow {
    #[must_use]
    pub const fn graded(min: f64, grade: LetterGrade) -> Self {
        Self {
            min,
            grade,
            title: None,
        }
    }

    #[must_use]
    pub const fn titled(min: f64, grade: LetterGrade, title: &'static str) -> Self {
        Self {
            min,
            grade,
            title: Some(title),
        }
    }
}

/// Ordered threshold table evaluated highest-first; first match wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeTable {
    rows: &'static [GradeRow],
    floor: GradeRow,
}

impl GradeTable {
    #[must_use]
    pub const fn new(rows: &'static [GradeRow], floor: GradeRow) -> Self {
        Self { rows, floor }
    }

    #[must_use]
    pub fn evaluate(&self, value: f64) -> GradeRow {
        self.rows
            .iter()
            .copied()
            .find(|row| value >= row.min)
            .unwrap_or(self.floor)
    }
}

/// Share-of-items-correct table used by the triage and courtroom worlds.
pub const ACCURACY_TABLE: GradeTable = GradeTable::new(
    &[
        GradeRow::graded(80.0, LetterGrade::A),
        GradeRow::graded(60.0, LetterGrade::B),
        GradeRow::graded(40.0, LetterGrade::C),
    ],
    GradeRow::graded(0.0, LetterGrade::D),
);

/// Hit-rate table for the rhythm world.
pub const CREATOR_TABLE: GradeTable = GradeTable::new(
    &[
        GradeRow::titled(85.0, LetterGrade::A, "Viral Star!"),
        GradeRow::titled(70.0, LetterGrade::B, "Rising Creator"),
        GradeRow::titled(50.0, LetterGrade::C, "Aspiring Influencer"),
    ],
    GradeRow::titled(0.0, LetterGrade::D, "Keep Practicing"),
);

/// Final approval table; evaluated on the meter value itself.
pub const LEGACY_TABLE: GradeTable = GradeTable::new(
    &[
        GradeRow::titled(70.0, LetterGrade::A, "Beloved Leader"),
        GradeRow::titled(50.0, LetterGrade::B, "Competent Official"),
        GradeRow::titled(30.0, LetterGrade::C, "Controversial Figure"),
    ],
    GradeRow::titled(0.0, LetterGrade::D, "Unpopular Politician"),
);

/// Perfect-solve share table for the circuit world.
pub const ENGINEER_TABLE: GradeTable = GradeTable::new(
    &[
        GradeRow::titled(75.0, LetterGrade::A, "Master Engineer"),
        GradeRow::titled(50.0, LetterGrade::B, "Senior Engineer"),
        GradeRow::titled(25.0, LetterGrade::C, "Junior Engineer"),
    ],
    GradeRow::titled(0.0, LetterGrade::D, "Engineering Intern"),
);

/// What a world reports about a finished session before grading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Performance {
    /// Value fed through the grade table: a 0..=100 share, or the approval meter.
    pub basis: f64,
    /// Achieved / possible counts handed to the narrative feedback.
    pub achieved: u32,
    pub possible: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub grade: LetterGrade,
    pub title: String,
    pub percentage: f64,
}

#[must_use]
pub fn summarize(table: &GradeTable, performance: Performance) -> PerformanceSummary {
    let row = table.evaluate(performance.basis);
    let title = row
        .title
        .map_or_else(|| format!("Grade: {}", row.grade), ToString::to_string);
    PerformanceSummary {
        grade: row.grade,
        title,
        percentage: performance.basis,
    }
}

/// Terminal hand-off produced once a world reaches results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub career: CareerId,
    pub score: u32,
    pub grade: LetterGrade,
    pub title: String,
    pub percentage: f64,
    /// Ended early by running out of lives.
    pub failed: bool,
    pub best_combo: u32,
    pub approval: Option<u8>,
    pub tally: OutcomeTally,
    pub outcomes: Vec<ItemOutcome>,
    pub achieved: u32,
    pub possible: u32,
    /// Narrative feedback attached by the hub engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}
