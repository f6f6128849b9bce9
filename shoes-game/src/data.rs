//! Static challenge catalogs for every world.
//!
//! Catalogs are compiled in from `data/*.json` and validated once on first
//! access. A catalog that fails validation is logged and replaced by an empty
//! one; an empty deck sends its world straight to results.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

use crate::career::CareerId;
use crate::constants::LOG_TARGET_CATALOG;

const PATIENTS_JSON: &str = include_str!("../data/patients.json");
const CASES_JSON: &str = include_str!("../data/cases.json");
const CONTENT_JSON: &str = include_str!("../data/content.json");
const ISSUES_JSON: &str = include_str!("../data/issues.json");
const PUZZLES_JSON: &str = include_str!("../data/puzzles.json");

/// Errors raised when a compiled-in catalog is malformed.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog {catalog} failed to parse: {source}")]
    Parse {
        catalog: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("catalog {catalog} is empty")]
    Empty { catalog: &'static str },
    #[error("case '{title}' marks statement {index} but only has {statements}")]
    ContradictionOutOfRange {
        title: String,
        index: usize,
        statements: usize,
    },
    #[error("issue '{headline}' offers no responses")]
    NoResponses { headline: String },
    #[error("content '{name}' needs a positive speed and beat count")]
    InvalidContent { name: String },
    #[error("puzzle '{name}' has {targets} targets but {components} components")]
    TargetMismatch {
        name: String,
        targets: usize,
        components: usize,
    },
    #[error("puzzle '{name}' repeats target cell {cell}")]
    DuplicateTarget { name: String, cell: GridCell },
    #[error("puzzle '{name}' places target {cell} outside its {cols}x{rows} grid")]
    TargetOutsideGrid {
        name: String,
        cell: GridCell,
        cols: u8,
        rows: u8,
    },
    #[error("puzzle '{name}' needs a positive time limit")]
    InvalidTimeLimit { name: String },
    #[error("career templates have no usable entry for {career}")]
    MissingCareer { career: CareerId },
}

// Doctor -------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Urgent,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Urgent => "urgent",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientCase {
    pub symptoms: Vec<String>,
    #[serde(rename = "diagnosis")]
    pub correct_diagnosis: String,
    pub severity: Severity,
    pub hint: String,
}

// Lawyer -------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub witness: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalCase {
    pub title: String,
    pub context: String,
    pub statements: Vec<Statement>,
    #[serde(rename = "contradiction")]
    pub contradiction_index: usize,
    pub explanation: String,
}

// Influencer ---------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentType {
    pub name: String,
    pub description: String,
    pub beat_count: usize,
    pub speed: f64,
}

// Politician ---------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyResponse {
    pub text: String,
    #[serde(rename = "approval")]
    pub approval_delta: i32,
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoliticalIssue {
    pub headline: String,
    pub context: String,
    pub responses: Vec<PolicyResponse>,
}

// Engineer -----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Inductor,
    Diode,
    Transistor,
    Led,
}

impl ComponentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resistor => "resistor",
            Self::Capacitor => "capacitor",
            Self::Inductor => "inductor",
            Self::Diode => "diode",
            Self::Transistor => "transistor",
            Self::Led => "led",
        }
    }

    /// Schematic glyph drawn on the grid.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Resistor => "R",
            Self::Capacitor => "C",
            Self::Inductor => "L",
            Self::Diode => "D",
            Self::Transistor => "T",
            Self::Led => "★",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grid coordinate stored as `[col, row]` in catalog JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(u8, u8)", into = "(u8, u8)")]
pub struct GridCell {
    pub col: u8,
    pub row: u8,
}

impl GridCell {
    #[must_use]
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }
}

impl From<(u8, u8)> for GridCell {
    fn from((col, row): (u8, u8)) -> Self {
        Self { col, row }
    }
}

impl From<GridCell> for (u8, u8) {
    fn from(cell: GridCell) -> Self {
        (cell.col, cell.row)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Grid dimensions stored as `[cols, rows]` in catalog JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u8, u8)", into = "(u8, u8)")]
pub struct GridSize {
    pub cols: u8,
    pub rows: u8,
}

impl GridSize {
    #[must_use]
    pub const fn contains(self, cell: GridCell) -> bool {
        cell.col < self.cols && cell.row < self.rows
    }
}

impl From<(u8, u8)> for GridSize {
    fn from((cols, rows): (u8, u8)) -> Self {
        Self { cols, rows }
    }
}

impl From<GridSize> for (u8, u8) {
    fn from(size: GridSize) -> Self {
        (size.cols, size.rows)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitPuzzle {
    pub name: String,
    pub description: String,
    pub grid_size: GridSize,
    /// Target cells, aligned by index with `components`.
    pub targets: Vec<GridCell>,
    pub components: Vec<ComponentKind>,
    pub time_limit: f64,
}

impl CircuitPuzzle {
    /// Component the circuit expects at `cell`, if it is a target.
    #[must_use]
    pub fn expected_at(&self, cell: GridCell) -> Option<ComponentKind> {
        self.targets
            .iter()
            .position(|target| *target == cell)
            .and_then(|idx| self.components.get(idx).copied())
    }

    #[must_use]
    pub fn is_target(&self, cell: GridCell) -> bool {
        self.targets.contains(&cell)
    }
}

// Catalog bundle -----------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PatientFile {
    patients: Vec<PatientCase>,
}

#[derive(Debug, Deserialize)]
struct CaseFile {
    cases: Vec<LegalCase>,
}

#[derive(Debug, Deserialize)]
struct ContentFile {
    content: Vec<ContentType>,
}

#[derive(Debug, Deserialize)]
struct IssueFile {
    issues: Vec<PoliticalIssue>,
}

#[derive(Debug, Deserialize)]
struct PuzzleFile {
    puzzles: Vec<CircuitPuzzle>,
}

/// Every world's challenge catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogs {
    pub patients: Vec<PatientCase>,
    pub cases: Vec<LegalCase>,
    pub content: Vec<ContentType>,
    pub issues: Vec<PoliticalIssue>,
    pub puzzles: Vec<CircuitPuzzle>,
}

fn parse<T: serde::de::DeserializeOwned>(
    catalog: &'static str,
    json: &str,
) -> Result<T, CatalogError> {
    serde_json::from_str(json).map_err(|source| CatalogError::Parse { catalog, source })
}

impl Catalogs {
    /// Parse and validate the compiled-in catalogs.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when any catalog fails to parse or violates an
    /// item invariant.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        let catalogs = Self {
            patients: parse::<PatientFile>("patients", PATIENTS_JSON)?.patients,
            cases: parse::<CaseFile>("cases", CASES_JSON)?.cases,
            content: parse::<ContentFile>("content", CONTENT_JSON)?.content,
            issues: parse::<IssueFile>("issues", ISSUES_JSON)?.issues,
            puzzles: parse::<PuzzleFile>("puzzles", PUZZLES_JSON)?.puzzles,
        };
        catalogs.validate()?;
        Ok(catalogs)
    }

    /// Shared, lazily loaded built-in catalogs.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static CATALOGS: OnceLock<Catalogs> = OnceLock::new();
        CATALOGS.get_or_init(|| {
            Self::load_from_static().unwrap_or_else(|err| {
                log::error!(target: LOG_TARGET_CATALOG, "built-in catalogs rejected: {err}");
                Self::default()
            })
        })
    }

    /// Distinct diagnoses across the patient catalog, in catalog order.
    #[must_use]
    pub fn diagnosis_pool(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.patients
            .iter()
            .map(|case| case.correct_diagnosis.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Validate item invariants across every catalog.
    ///
    /// # Errors
    ///
    /// Returns the first `CatalogError` encountered.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (catalog, len) in [
            ("patients", self.patients.len()),
            ("cases", self.cases.len()),
            ("content", self.content.len()),
            ("issues", self.issues.len()),
            ("puzzles", self.puzzles.len()),
        ] {
            if len == 0 {
                return Err(CatalogError::Empty { catalog });
            }
        }
        for case in &self.cases {
            if case.contradiction_index >= case.statements.len() {
                return Err(CatalogError::ContradictionOutOfRange {
                    title: case.title.clone(),
                    index: case.contradiction_index,
                    statements: case.statements.len(),
                });
            }
        }
        for content in &self.content {
            if content.beat_count == 0 || content.speed.is_nan() || content.speed <= 0.0 {
                return Err(CatalogError::InvalidContent {
                    name: content.name.clone(),
                });
            }
        }
        for issue in &self.issues {
            if issue.responses.is_empty() {
                return Err(CatalogError::NoResponses {
                    headline: issue.headline.clone(),
                });
            }
        }
        self.puzzles.iter().try_for_each(validate_puzzle)
    }
}

fn validate_puzzle(puzzle: &CircuitPuzzle) -> Result<(), CatalogError> {
    if puzzle.targets.len() != puzzle.components.len() || puzzle.targets.is_empty() {
        return Err(CatalogError::TargetMismatch {
            name: puzzle.name.clone(),
            targets: puzzle.targets.len(),
            components: puzzle.components.len(),
        });
    }
    if puzzle.time_limit.is_nan() || puzzle.time_limit <= 0.0 {
        return Err(CatalogError::InvalidTimeLimit {
            name: puzzle.name.clone(),
        });
    }
    let mut seen = BTreeSet::new();
    for &cell in &puzzle.targets {
        if !puzzle.grid_size.contains(cell) {
            return Err(CatalogError::TargetOutsideGrid {
                name: puzzle.name.clone(),
                cell,
                cols: puzzle.grid_size.cols,
                rows: puzzle.grid_size.rows,
            });
        }
        if !seen.insert(cell) {
            return Err(CatalogError::DuplicateTarget {
                name: puzzle.name.clone(),
                cell,
            });
        }
    }
    Ok(())
}
