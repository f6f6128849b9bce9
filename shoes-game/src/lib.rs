//! Step Into My Shoes Game Engine
//!
//! Platform-agnostic core for the career-exploration game. Five worlds
//! (doctor, lawyer, influencer, politician, engineer) share one state machine,
//! one scoring model and one summary pipeline; this crate holds all of it
//! without UI or platform-specific dependencies.

pub mod career;
pub mod config;
pub mod constants;
pub mod data;
pub mod deck;
pub mod narrative;
pub mod numbers;
pub mod rng;
pub mod scoring;
pub mod seed;
pub mod summary;
pub mod world;
pub mod worlds;

// Re-export commonly used types
pub use career::{CareerId, UnknownCareer};
pub use config::{
    ConfigError, DoctorCfg, EngineerCfg, GameConfig, InfluencerCfg, LawyerCfg, PoliticianCfg,
};
pub use data::{
    CatalogError, Catalogs, CircuitPuzzle, ComponentKind, ContentType, GridCell, GridSize,
    LegalCase, PatientCase, PoliticalIssue, PolicyResponse, Severity, Statement,
};
pub use narrative::{Difficulty, NarrativeCatalog, TemplateNarrative, UnknownDifficulty};
pub use rng::RngBundle;
pub use scoring::{Grade, HitQuality, OutcomeTier};
pub use seed::{InvalidReplayCode, ReplayCode, parse_replay_code};
pub use summary::{LetterGrade, Performance, PerformanceSummary, SessionResult};
pub use world::{
    Approval, FrameReport, GradingStrategy, HudSnapshot, InputEvent, ItemClock, ItemOutcome,
    OutcomeTally, SessionStats, Transition, Verdict, WorldMachine, WorldPhase,
};
pub use worlds::{
    AnyWorld, DoctorWorld, EngineerAction, EngineerWorld, InfluencerWorld, LawyerWorld,
    PoliticianWorld, Tap, WorldAction,
};

use constants::LOG_TARGET_ENGINE;

/// Career narrative collaborator.
/// Implementations supply story text; the engine never inspects it.
pub trait NarrativeProvider {
    /// Backstory shown before a world's intro.
    fn generate(&self, career: CareerId, difficulty: Difficulty) -> String;

    /// Real-world skills the career exercises.
    fn skills(&self, career: CareerId) -> Vec<String>;

    /// Educational takeaway shown with the results.
    fn lesson(&self, career: CareerId) -> String;

    /// One-line feedback for `achieved` out of `possible`.
    fn performance_feedback(&self, career: CareerId, achieved: u32, possible: u32) -> String;
}

/// Everything shown before a world starts.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Briefing {
    pub career: CareerId,
    pub backstory: String,
    pub skills: Vec<String>,
    pub lesson: String,
}

/// Hub engine: owns tuning and narrative, creates worlds, finalises results.
pub struct GameEngine<N>
where
    N: NarrativeProvider,
{
    narrative: N,
    config: GameConfig,
    catalogs: &'static Catalogs,
}

impl GameEngine<TemplateNarrative> {
    /// Engine with default tuning and the built-in templates seeded by `seed`.
    #[must_use]
    pub fn with_defaults(seed: u64) -> Self {
        Self {
            narrative: TemplateNarrative::new(seed),
            config: GameConfig::default(),
            catalogs: Catalogs::builtin(),
        }
    }
}

impl<N> GameEngine<N>
where
    N: NarrativeProvider,
{
    /// Create an engine from a narrative provider and tuning config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the config fails validation.
    pub fn new(narrative: N, config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            narrative,
            config,
            catalogs: Catalogs::builtin(),
        })
    }

    /// Deal from `catalogs` instead of the built-in ones.
    #[must_use]
    pub fn with_catalogs(mut self, catalogs: &'static Catalogs) -> Self {
        self.catalogs = catalogs;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn narrative(&self) -> &N {
        &self.narrative
    }

    /// Deal a fresh session for `career` from `seed`. The world starts in its intro.
    #[must_use]
    pub fn enter_world(&self, career: CareerId, seed: u64) -> AnyWorld {
        let rngs = RngBundle::from_user_seed(seed);
        let catalogs = self.catalogs;
        let cfg = &self.config;
        log::debug!(target: LOG_TARGET_ENGINE, "entering {career} with seed {seed:#x}");
        match career {
            CareerId::Doctor => WorldMachine::new(
                DoctorWorld::new(cfg.doctor.clone()),
                deck::deal_patients(catalogs, &cfg.doctor, &rngs),
            )
            .into(),
            CareerId::Lawyer => WorldMachine::new(
                LawyerWorld::new(cfg.lawyer.clone()),
                deck::deal_cases(catalogs, &cfg.lawyer, &rngs),
            )
            .into(),
            CareerId::Influencer => WorldMachine::new(
                InfluencerWorld::new(cfg.influencer.clone()),
                deck::deal_content(catalogs, &cfg.influencer, &rngs),
            )
            .into(),
            CareerId::Politician => WorldMachine::new(
                PoliticianWorld::new(cfg.politician.clone()),
                deck::deal_issues(catalogs, &cfg.politician, &rngs),
            )
            .into(),
            CareerId::Engineer => WorldMachine::new(
                EngineerWorld::new(cfg.engineer.clone()),
                deck::deal_puzzles(catalogs, &cfg.engineer, &rngs),
            )
            .into(),
        }
    }

    /// Enter the world named by a replay code such as `DR-ORANGE42`.
    #[must_use]
    pub fn enter_replay(&self, code: &str) -> Option<AnyWorld> {
        parse_replay_code(code).map(|(career, seed)| self.enter_world(career, seed))
    }

    #[must_use]
    pub fn backstory(&self, career: CareerId, difficulty: Difficulty) -> String {
        self.narrative.generate(career, difficulty)
    }

    #[must_use]
    pub fn briefing(&self, career: CareerId, difficulty: Difficulty) -> Briefing {
        Briefing {
            career,
            backstory: self.narrative.generate(career, difficulty),
            skills: self.narrative.skills(career),
            lesson: self.narrative.lesson(career),
        }
    }

    /// Final result with narrative feedback, once the world reaches results.
    #[must_use]
    pub fn finish(&self, world: &AnyWorld) -> Option<SessionResult> {
        let mut result = world.result()?;
        result.feedback = Some(self.narrative.performance_feedback(
            result.career,
            result.achieved,
            result.possible,
        ));
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Default)]
    struct FixtureNarrative;

    impl NarrativeProvider for FixtureNarrative {
        fn generate(&self, career: CareerId, difficulty: Difficulty) -> String {
            format!("{career}:{difficulty}")
        }

        fn skills(&self, _career: CareerId) -> Vec<String> {
            vec!["focus".to_string()]
        }

        fn lesson(&self, career: CareerId) -> String {
            format!("{career} lesson")
        }

        fn performance_feedback(&self, _career: CareerId, achieved: u32, possible: u32) -> String {
            format!("{achieved}/{possible}")
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = GameConfig::default();
        config.doctor.time_per_patient = 0.0;
        assert!(GameEngine::new(FixtureNarrative, config).is_err());
    }

    #[test]
    fn every_career_enters_its_own_world() {
        let engine = GameEngine::new(FixtureNarrative, GameConfig::default()).unwrap();
        for career in CareerId::ALL {
            let world = engine.enter_world(career, 0xABCD);
            assert_eq!(world.career(), career);
            assert_eq!(world.phase(), WorldPhase::Intro);
            assert!(world.snapshot().item_count > 0);
        }
    }

    #[test]
    fn same_seed_deals_identical_worlds() {
        let engine = GameEngine::new(FixtureNarrative, GameConfig::default()).unwrap();
        for career in CareerId::ALL {
            let a = engine.enter_world(career, 77);
            let b = engine.enter_world(career, 77);
            assert_eq!(format!("{a:?}"), format!("{b:?}"));
        }
    }

    #[test]
    fn finish_attaches_feedback_only_at_results() {
        let engine = GameEngine::new(FixtureNarrative, GameConfig::default()).unwrap();
        let mut world = engine.enter_world(CareerId::Politician, 3);
        assert!(engine.finish(&world).is_none());
        world.start();
        world.abort();
        let result = engine.finish(&world).unwrap();
        assert_eq!(result.feedback.as_deref(), Some("50/100"));
        assert_eq!(result.approval, Some(50));
    }

    #[test]
    fn briefing_collects_narrative_pieces() {
        let engine = GameEngine::new(FixtureNarrative, GameConfig::default()).unwrap();
        let briefing = engine.briefing(CareerId::Engineer, Difficulty::Hard);
        assert_eq!(briefing.backstory, "Engineer:hard");
        assert_eq!(briefing.skills, ["focus"]);
        assert_eq!(briefing.lesson, "Engineer lesson");
    }

    #[test]
    fn replay_codes_enter_the_named_career() {
        let engine = GameEngine::with_defaults(1);
        let world = engine.enter_replay("EN-CIRCUIT07").unwrap();
        assert_eq!(world.career(), CareerId::Engineer);
        assert!(engine.enter_replay("nonsense").is_none());
    }
}
