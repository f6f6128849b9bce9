use shoes_game::{
    AnyWorld, CareerId, GameEngine, HudSnapshot, NarrativeProvider, SessionResult, WorldPhase,
};

use crate::logic::policy::{PlayStyle, PlayerPolicy};

/// Frame length used by the headless loop.
pub const FRAME_DT: f64 = 1.0 / 60.0;

/// Configuration for a simulation session.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub career: CareerId,
    pub style: PlayStyle,
    pub seed: u64,
    pub dt: f64,
    pub max_frames: u32,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(career: CareerId, style: PlayStyle, seed: u64) -> Self {
        Self {
            career,
            style,
            seed,
            dt: FRAME_DT,
            max_frames: 60 * 60 * 10,
        }
    }

    #[must_use]
    pub const fn with_max_frames(mut self, max_frames: u32) -> Self {
        self.max_frames = max_frames;
        self
    }
}

/// Outcome of one headless session.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub career: CareerId,
    pub style: PlayStyle,
    pub seed: u64,
    pub frames: u32,
    pub finished: bool,
    pub result: Option<SessionResult>,
    pub violations: Vec<String>,
}

/// Frame-by-frame checks of the engine invariants.
#[derive(Debug, Default)]
struct InvariantChecker {
    prev: Option<HudSnapshot>,
    failures: u32,
    violations: Vec<String>,
}

impl InvariantChecker {
    fn observe(&mut self, frame: u32, world: &AnyWorld) {
        let hud = world.snapshot();
        let failures = failure_count(world);
        let career = hud.career;
        let mut violation = |message: String| {
            self.violations.push(format!("frame {frame}: {message}"));
        };

        if let Some(approval) = hud.approval
            && approval > 100
        {
            violation(format!("approval {approval} outside [0, 100]"));
        }
        if hud.best_combo < hud.combo {
            violation(format!("best combo {} below combo {}", hud.best_combo, hud.combo));
        }
        if hud.item_count > 0 && hud.item_index >= hud.item_count {
            violation(format!("item index {} of {}", hud.item_index, hud.item_count));
        }
        if hud.time_remaining.is_some_and(|t| t < 0.0) {
            violation("negative item clock".to_string());
        }
        if failures > self.failures && career != CareerId::Politician && hud.combo != 0 {
            violation(format!("combo {} survived a failure", hud.combo));
        }
        if let Some(prev) = &self.prev {
            if hud.best_combo < prev.best_combo {
                violation("best combo shrank".to_string());
            }
            if hud.item_index < prev.item_index || hud.item_index > prev.item_index + 1 {
                violation(format!(
                    "item index jumped {} -> {}",
                    prev.item_index, hud.item_index
                ));
            }
            if let (Some(now), Some(before)) = (hud.lives, prev.lives)
                && now > before
            {
                violation(format!("lives rose {before} -> {now}"));
            }
            if prev.phase == WorldPhase::Results && hud.phase != WorldPhase::Results {
                violation(format!("left results for {}", hud.phase));
            }
        }
        self.failures = failures;
        self.prev = Some(hud);
    }
}

fn failure_count(world: &AnyWorld) -> u32 {
    match world {
        AnyWorld::Doctor(m) => m.stats().tally.failures(),
        AnyWorld::Lawyer(m) => m.stats().tally.failures(),
        AnyWorld::Influencer(m) => m.stats().tally.failures(),
        AnyWorld::Politician(m) => m.stats().tally.failures(),
        AnyWorld::Engineer(m) => m.stats().tally.failures(),
    }
}

/// Core deterministic simulation harness used by the tester.
pub struct SimulationSession {
    world: AnyWorld,
    policy: Box<dyn PlayerPolicy>,
    config: SimulationConfig,
    checker: InvariantChecker,
    frames: u32,
}

impl SimulationSession {
    pub fn new<N: NarrativeProvider>(engine: &GameEngine<N>, config: SimulationConfig) -> Self {
        Self {
            world: engine.enter_world(config.career, config.seed),
            policy: config.style.create_policy(config.seed),
            config,
            checker: InvariantChecker::default(),
            frames: 0,
        }
    }

    /// Run one frame; returns true once the world reaches results.
    pub fn step(&mut self) -> bool {
        let events = self.policy.decide(&self.world, self.config.dt);
        self.world.frame(events, self.config.dt);
        self.frames += 1;
        self.checker.observe(self.frames, &self.world);
        self.world.is_finished()
    }

    /// Run until results or the frame cap, whichever comes first.
    pub fn run<N: NarrativeProvider>(mut self, engine: &GameEngine<N>) -> SimulationSummary {
        let mut finished = self.world.is_finished();
        while !finished && self.frames < self.config.max_frames {
            finished = self.step();
        }
        if !finished {
            log::debug!(
                "{} {} seed {} stalled after {} frames in {}",
                self.config.career,
                self.policy.name(),
                self.config.seed,
                self.frames,
                self.world.phase()
            );
        }
        SimulationSummary {
            career: self.config.career,
            style: self.config.style,
            seed: self.config.seed,
            frames: self.frames,
            finished,
            result: engine.finish(&self.world),
            violations: self.checker.violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoes_game::LetterGrade;

    fn run(career: CareerId, style: PlayStyle, seed: u64) -> SimulationSummary {
        let engine = GameEngine::with_defaults(seed);
        SimulationSession::new(&engine, SimulationConfig::new(career, style, seed)).run(&engine)
    }

    #[test]
    fn experts_finish_every_world_with_an_a() {
        for career in CareerId::ALL {
            let summary = run(career, PlayStyle::Expert, 21);
            assert!(summary.finished, "{career}");
            assert!(summary.violations.is_empty(), "{:?}", summary.violations);
            let result = summary.result.unwrap();
            assert_eq!(result.grade, LetterGrade::A, "{career}");
            assert!(result.feedback.is_some());
        }
    }

    #[test]
    fn chaos_never_breaks_an_invariant() {
        for seed in [1, 2, 3] {
            for career in CareerId::ALL {
                let summary = run(career, PlayStyle::Chaos, seed);
                assert!(summary.violations.is_empty(), "{career}: {:?}", summary.violations);
            }
        }
    }

    #[test]
    fn idle_politician_stalls_at_the_frame_cap() {
        let engine = GameEngine::with_defaults(1);
        let config =
            SimulationConfig::new(CareerId::Politician, PlayStyle::Idle, 1).with_max_frames(120);
        let summary = SimulationSession::new(&engine, config).run(&engine);
        assert!(!summary.finished);
        assert_eq!(summary.frames, 120);
        assert!(summary.result.is_none());
    }
}
