use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use shoes_game::{
    AnyWorld, CareerId, ComponentKind, EngineerAction, GameEngine, GridCell, HudSnapshot,
    InputEvent, Tap, WorldAction, WorldPhase,
};

const DT: f64 = 1.0 / 30.0;
const MAX_FRAMES: usize = 30 * 60 * 20;
const SEEDS: [u64; 6] = [0, 1, 7, 42, 0xDEAD_BEEF, u64::MAX];

fn random_action(career: CareerId, rng: &mut SmallRng) -> WorldAction {
    match career {
        CareerId::Doctor | CareerId::Lawyer | CareerId::Politician => {
            WorldAction::Choose(rng.gen_range(0..5))
        }
        CareerId::Influencer => {
            if rng.gen_bool(0.5) {
                WorldAction::Tap(Tap::any())
            } else {
                WorldAction::Tap(Tap::lane(rng.gen_range(0..4)))
            }
        }
        CareerId::Engineer => WorldAction::Engineer(match rng.gen_range(0..3) {
            0 => EngineerAction::Select(rng.gen_range(0..6)),
            1 => EngineerAction::Tap(GridCell::new(rng.gen_range(0..7), rng.gen_range(0..5))),
            _ => EngineerAction::Submit,
        }),
    }
}

fn random_events(career: CareerId, rng: &mut SmallRng) -> Vec<InputEvent<WorldAction>> {
    (0..rng.gen_range(0..3))
        .map(|_| match rng.gen_range(0..10) {
            0 => InputEvent::Navigate(rng.gen_range(-2..=2)),
            1 => InputEvent::Confirm,
            2 => InputEvent::Cancel,
            _ => InputEvent::Submit(random_action(career, rng)),
        })
        .collect()
}

fn check_snapshot(career: CareerId, hud: &HudSnapshot, prev: &HudSnapshot, failures_grew: bool) {
    if let Some(approval) = hud.approval {
        assert!(approval <= 100, "{career} approval {approval}");
    }
    assert!(hud.best_combo >= hud.combo, "{career} best combo below combo");
    assert!(hud.best_combo >= prev.best_combo, "{career} best combo shrank");
    if hud.item_count > 0 {
        assert!(hud.item_index < hud.item_count, "{career} index out of range");
    }
    assert!(hud.item_index >= prev.item_index, "{career} index went backwards");
    assert!(hud.item_index <= prev.item_index + 1, "{career} skipped an item");
    if let Some(lives) = hud.lives {
        assert!(lives <= prev.lives.unwrap_or(lives), "{career} regained a life");
    }
    if let Some(remaining) = hud.time_remaining {
        assert!(remaining >= 0.0, "{career} negative clock");
    }
    if failures_grew && career != CareerId::Politician {
        assert_eq!(hud.combo, 0, "{career} combo survived a failure");
    }
}

fn sweep(world: &mut AnyWorld, seed: u64) {
    let career = world.career();
    let mut rng = SmallRng::seed_from_u64(seed ^ 0x00C0_FFEE);
    world.start();
    let mut prev = world.snapshot();
    let mut failures = 0;
    for _ in 0..MAX_FRAMES {
        let phase = world.phase();
        if phase == WorldPhase::Results {
            break;
        }
        if phase.is_review() {
            let index = prev.item_index;
            world.advance();
            let hud = world.snapshot();
            if world.phase() != WorldPhase::Results {
                assert_eq!(hud.item_index, index + 1, "{career} advance skipped");
                assert_eq!(hud.phase, WorldPhase::Gameplay);
            }
            prev = hud;
            continue;
        }
        world.frame(random_events(career, &mut rng), DT);
        let hud = world.snapshot();
        let now = world
            .as_doctor()
            .map(|m| m.stats().tally.failures())
            .or_else(|| world.as_lawyer().map(|m| m.stats().tally.failures()))
            .or_else(|| world.as_influencer().map(|m| m.stats().tally.failures()))
            .or_else(|| world.as_politician().map(|m| m.stats().tally.failures()))
            .or_else(|| world.as_engineer().map(|m| m.stats().tally.failures()))
            .unwrap_or(0);
        check_snapshot(career, &hud, &prev, now > failures);
        failures = now;
        prev = hud;
    }
    assert_eq!(world.phase(), WorldPhase::Results, "{career} seed {seed} stalled");
    let result = world.result().unwrap();
    for (i, outcome) in result.outcomes.iter().enumerate() {
        assert_eq!(outcome.index, i, "{career} outcome order");
    }
    if career == CareerId::Doctor && !result.failed {
        assert_eq!(result.outcomes.len(), result.possible as usize);
    }
}

#[test]
fn random_play_keeps_every_invariant() {
    let engine = GameEngine::with_defaults(3);
    for seed in SEEDS {
        for career in CareerId::ALL {
            let mut world = engine.enter_world(career, seed);
            sweep(&mut world, seed);
        }
    }
}

#[test]
fn penalties_never_push_score_below_zero() {
    let engine = GameEngine::with_defaults(3);
    for seed in SEEDS {
        for career in [CareerId::Doctor, CareerId::Lawyer] {
            let mut world = engine.enter_world(career, seed);
            world.start();
            while !world.is_finished() {
                let wrong = match &world {
                    AnyWorld::Doctor(m) => m
                        .current_item()
                        .and_then(|patient| patient.correct_option())
                        .map_or(0, |correct| (correct + 1) % 4),
                    AnyWorld::Lawyer(m) => m.current_item().map_or(0, |case| {
                        (case.contradiction_index + 1) % case.statements.len()
                    }),
                    _ => unreachable!(),
                };
                world.submit(WorldAction::Choose(wrong));
                assert_eq!(world.snapshot().score, 0);
                assert_eq!(world.snapshot().combo, 0);
                world.advance();
            }
            let result = world.result().unwrap();
            assert_eq!(result.score, 0);
            if career == CareerId::Doctor {
                assert!(result.failed);
                assert_eq!(result.outcomes.len(), 3);
            }
        }
    }
}

#[test]
fn engineer_misplacement_is_counted() {
    let engine = GameEngine::with_defaults(3);
    let mut world = engine.enter_world(CareerId::Engineer, 17);
    world.start();
    let machine = world.as_engineer().unwrap();
    let puzzle = machine.current_item().unwrap().puzzle.clone();
    let bench = machine.board().unwrap();
    let first = puzzle.targets[0];
    let expected = puzzle.components[0];
    let slot = bench
        .slots
        .iter()
        .position(|slot| slot.kind != expected)
        .expect("puzzle mixes component kinds");
    let kind: ComponentKind = bench.slots[slot].kind;
    world.submit(WorldAction::Engineer(EngineerAction::Select(slot)));
    world.submit(WorldAction::Engineer(EngineerAction::Tap(first)));
    let bench = world.as_engineer().unwrap().board().unwrap();
    assert_eq!(bench.component_at(first), Some(kind));
    world.submit(WorldAction::Engineer(EngineerAction::Submit));
    let stats = world.as_engineer().unwrap().stats();
    assert_eq!(stats.misplaced, 1);
    assert_eq!(stats.combo, 0);
}
