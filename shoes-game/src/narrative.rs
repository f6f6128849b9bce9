//! Template-driven career backstories and feedback.
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::NarrativeProvider;
use crate::career::CareerId;
use crate::constants::LOG_TARGET_CATALOG;
use crate::data::CatalogError;
use crate::numbers::percentage;

const CAREERS_JSON: &str = include_str!("../data/careers.json");

/// Story intensity for generated backstories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }

    /// Adjective used in the backstory's closing line.
    #[must_use]
    pub const fn intensity(self) -> &'static str {
        match self {
            Self::Easy => "manageable",
            Self::Normal => "challenging",
            Self::Hard => "intense",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown difficulty '{0}' (expected easy, normal or hard)")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(UnknownDifficulty(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    pub setup: String,
    pub challenge: String,
    pub stakes: String,
}

/// Story material for one career.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CareerTemplate {
    pub career: CareerId,
    pub titles: Vec<String>,
    pub workplaces: Vec<String>,
    pub scenarios: Vec<Scenario>,
    pub mentors: Vec<String>,
    pub skills: Vec<String>,
    /// Real-world connection shown on the results screen.
    pub lesson: String,
}

impl CareerTemplate {
    fn is_usable(&self) -> bool {
        !(self.titles.is_empty()
            || self.workplaces.is_empty()
            || self.scenarios.is_empty()
            || self.mentors.is_empty()
            || self.skills.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NarrativeCatalog {
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
    pub traits: Vec<String>,
    pub careers: Vec<CareerTemplate>,
}

impl NarrativeCatalog {
    /// Parse the compiled-in career templates.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` when the JSON is malformed, a name list is
    /// empty, or a career lacks a usable template.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(CAREERS_JSON).map_err(|source| {
            CatalogError::Parse {
                catalog: "careers",
                source,
            }
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Shared built-in templates; an invalid file is logged and replaced by an empty catalog.
    #[must_use]
    pub fn builtin() -> &'static Self {
        static CATALOG: OnceLock<NarrativeCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            Self::load_from_static().unwrap_or_else(|err| {
                log::error!(target: LOG_TARGET_CATALOG, "career templates rejected: {err}");
                Self::default()
            })
        })
    }

    /// # Errors
    ///
    /// Returns the first `CatalogError` encountered.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (catalog, len) in [
            ("first_names", self.first_names.len()),
            ("last_names", self.last_names.len()),
            ("traits", self.traits.len()),
        ] {
            if len == 0 {
                return Err(CatalogError::Empty { catalog });
            }
        }
        for career in CareerId::ALL {
            if !self.template(career).is_some_and(CareerTemplate::is_usable) {
                return Err(CatalogError::MissingCareer { career });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn template(&self, career: CareerId) -> Option<&CareerTemplate> {
        self.careers.iter().find(|template| template.career == career)
    }
}

/// Built-in [`NarrativeProvider`] assembling text from career templates.
///
/// Picks come from a seeded ChaCha stream, so the same seed tells the same story.
#[derive(Debug)]
pub struct TemplateNarrative {
    catalog: &'static NarrativeCatalog,
    rng: RefCell<ChaCha20Rng>,
}

impl TemplateNarrative {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_catalog(NarrativeCatalog::builtin(), seed)
    }

    #[must_use]
    pub fn with_catalog(catalog: &'static NarrativeCatalog, seed: u64) -> Self {
        Self {
            catalog,
            rng: RefCell::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    fn pick<'a>(&self, items: &'a [String], fallback: &'a str) -> &'a str {
        items
            .choose(&mut *self.rng.borrow_mut())
            .map_or(fallback, String::as_str)
    }

    fn character_name(&self) -> String {
        format!(
            "{} {}",
            self.pick(&self.catalog.first_names, "Alex"),
            self.pick(&self.catalog.last_names, "Morgan")
        )
    }

    fn generic_backstory(&self, career: CareerId) -> String {
        let name = self.character_name();
        let trait_word = self.pick(&self.catalog.traits, "determined");
        format!(
            "You are {name}, a {trait_word} professional embarking on a career in {career}.\n\n\
             Today brings unexpected challenges that will test your abilities.\n\n\
             Your mentors have prepared you, but the real test begins now.\n\n\
             Show what you're made of!"
        )
    }
}

impl NarrativeProvider for TemplateNarrative {
    fn generate(&self, career: CareerId, difficulty: Difficulty) -> String {
        let Some(template) = self.catalog.template(career) else {
            return self.generic_backstory(career);
        };
        let Some(scenario) = template
            .scenarios
            .choose(&mut *self.rng.borrow_mut())
            .cloned()
        else {
            return self.generic_backstory(career);
        };
        let name = self.character_name();
        let trait_word = self.pick(&self.catalog.traits, "determined");
        let title = self.pick(&template.titles, "professional");
        let workplace = self.pick(&template.workplaces, "a busy workplace");
        let mentor = self.pick(&template.mentors, "a seasoned veteran");
        let skill = self.pick(&template.skills, "problem-solving");
        let intensity = difficulty.intensity();
        format!(
            "You are {name}, a {trait_word} {title} working at {workplace}.\n\n\
             {setup}\n\n\
             {challenge}\n\n\
             Your mentor, {mentor}, has prepared you for moments like this. \
             But nothing compares to the real thing.\n\n\
             {stakes}\n\n\
             This {intensity} situation will test everything you've learned. \
             Your skills in {skill} will be crucial.\n\n\
             Are you ready to step into these shoes?",
            setup = scenario.setup,
            challenge = scenario.challenge,
            stakes = scenario.stakes,
        )
    }

    fn skills(&self, career: CareerId) -> Vec<String> {
        self.catalog.template(career).map_or_else(
            || vec!["problem-solving".to_string(), "critical thinking".to_string()],
            |template| template.skills.clone(),
        )
    }

    fn lesson(&self, career: CareerId) -> String {
        self.catalog.template(career).map_or_else(
            || "Every career requires dedication, skill, and continuous learning.".to_string(),
            |template| template.lesson.clone(),
        )
    }

    fn performance_feedback(&self, career: CareerId, achieved: u32, possible: u32) -> String {
        let share = percentage(achieved, possible);
        let skills = self
            .catalog
            .template(career)
            .map_or(&[][..], |template| template.skills.as_slice());
        let skill = self.pick(skills, "your skills");
        if share >= 90.0 {
            format!(
                "Outstanding! You demonstrated exceptional {skill}. \
                 You have what it takes to excel in this field!"
            )
        } else if share >= 70.0 {
            format!("Great work! Your {skill} skills are developing well. Keep practicing!")
        } else if share >= 50.0 {
            format!("Good effort! With more practice on {skill}, you'll improve significantly.")
        } else {
            format!(
                "This career is challenging! Focus on developing your {skill} skills. \
                 Every expert started somewhere."
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_templates_cover_every_career() {
        let catalog = NarrativeCatalog::load_from_static().unwrap();
        for career in CareerId::ALL {
            assert!(catalog.template(career).is_some(), "{career} missing");
        }
    }

    #[test]
    fn same_seed_tells_the_same_story() {
        let a = TemplateNarrative::new(5);
        let b = TemplateNarrative::new(5);
        for career in CareerId::ALL {
            assert_eq!(
                a.generate(career, Difficulty::Hard),
                b.generate(career, Difficulty::Hard)
            );
        }
    }

    #[test]
    fn backstory_mentions_intensity_and_closing_question() {
        let narrative = TemplateNarrative::new(1);
        let story = narrative.generate(CareerId::Doctor, Difficulty::Easy);
        assert!(story.starts_with("You are "));
        assert!(story.contains("This manageable situation"));
        assert!(story.ends_with("Are you ready to step into these shoes?"));
    }

    #[test]
    fn feedback_tiers_follow_share_of_possible() {
        let narrative = TemplateNarrative::new(2);
        let career = CareerId::Engineer;
        assert!(narrative.performance_feedback(career, 9, 10).starts_with("Outstanding!"));
        assert!(narrative.performance_feedback(career, 7, 10).starts_with("Great work!"));
        assert!(narrative.performance_feedback(career, 5, 10).starts_with("Good effort!"));
        assert!(
            narrative
                .performance_feedback(career, 0, 0)
                .starts_with("This career is challenging!")
        );
    }

    #[test]
    fn empty_catalog_falls_back_to_generic_text() {
        static EMPTY: NarrativeCatalog = NarrativeCatalog {
            first_names: Vec::new(),
            last_names: Vec::new(),
            traits: Vec::new(),
            careers: Vec::new(),
        };
        let narrative = TemplateNarrative::with_catalog(&EMPTY, 0);
        let story = narrative.generate(CareerId::Lawyer, Difficulty::Normal);
        assert!(story.contains("a career in Lawyer"));
        assert_eq!(narrative.skills(CareerId::Lawyer).len(), 2);
        assert!(EMPTY.validate().is_err());
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("brutal".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default().intensity(), "challenging");
    }
}
