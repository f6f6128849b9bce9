use shoes_game::data::Catalogs;
use shoes_game::worlds::{Patient, ScheduledContent, ScheduledPuzzle, Stage, Workbench};
use shoes_game::{
    AnyWorld, CareerId, EngineerAction, GameEngine, InputEvent, LetterGrade, OutcomeTier,
    PoliticalIssue, PoliticianCfg, PoliticianWorld, PolicyResponse, Tap, WorldAction,
    WorldMachine, WorldPhase,
};

const DT: f64 = 1.0 / 60.0;
const MAX_FRAMES: usize = 60 * 60 * 10;

fn engine() -> GameEngine<shoes_game::TemplateNarrative> {
    GameEngine::with_defaults(0x5EED)
}

/// Drive a world to results, asking `pick` for at most one submission per frame.
fn drive<F>(world: &mut AnyWorld, pick: F)
where
    F: Fn(&AnyWorld) -> Option<WorldAction>,
{
    world.start();
    for _ in 0..MAX_FRAMES {
        match world.phase() {
            WorldPhase::Results => return,
            phase if phase.is_review() => {
                world.advance();
            }
            _ => {
                let action = pick(world);
                world.frame(action.map(InputEvent::Submit), DT);
            }
        }
    }
    panic!("{} never reached results", world.career());
}

fn doctor_pick(world: &AnyWorld) -> Option<WorldAction> {
    let patient: &Patient = world.as_doctor()?.current_item()?;
    patient.correct_option().map(WorldAction::Choose)
}

fn lawyer_pick(world: &AnyWorld) -> Option<WorldAction> {
    let case = world.as_lawyer()?.current_item()?;
    Some(WorldAction::Choose(case.contradiction_index))
}

fn politician_pick(world: &AnyWorld) -> Option<WorldAction> {
    let issue = world.as_politician()?.current_item()?;
    issue
        .responses
        .iter()
        .enumerate()
        .max_by_key(|(_, response)| response.approval_delta)
        .map(|(index, _)| WorldAction::Choose(index))
}

fn influencer_pick(world: &AnyWorld) -> Option<WorldAction> {
    let machine = world.as_influencer()?;
    let item: &ScheduledContent = machine.current_item()?;
    let stage: &Stage = machine.board()?;
    let beat = item.beats.get(stage.current_beat()?)?;
    (stage.game_time >= beat.target_time - DT / 2.0).then_some(WorldAction::Tap(Tap::any()))
}

fn engineer_pick(world: &AnyWorld) -> Option<WorldAction> {
    let machine = world.as_engineer()?;
    let item: &ScheduledPuzzle = machine.current_item()?;
    let bench: &Workbench = machine.board()?;
    let puzzle = &item.puzzle;
    let (cell, kind) = puzzle
        .targets
        .iter()
        .copied()
        .zip(puzzle.components.iter().copied())
        .find(|(cell, _)| bench.component_at(*cell).is_none())?;
    if bench.selected_kind() == Some(kind) {
        return Some(WorldAction::Engineer(EngineerAction::Tap(cell)));
    }
    bench
        .slots
        .iter()
        .position(|slot| !slot.used && slot.kind == kind)
        .map(|slot| WorldAction::Engineer(EngineerAction::Select(slot)))
}

#[test]
fn flawless_doctor_shift_earns_an_a() {
    let engine = engine();
    let mut world = engine.enter_world(CareerId::Doctor, 11);
    drive(&mut world, doctor_pick);
    let result = engine.finish(&world).unwrap();
    let patients = engine.config().doctor.patients;
    assert_eq!(result.grade, LetterGrade::A);
    assert!(!result.failed);
    assert_eq!(result.tally.correct as usize, patients);
    assert_eq!(result.best_combo as usize, patients);
    assert_eq!(result.outcomes.len(), patients);
    assert!(result.feedback.unwrap().starts_with("Outstanding!"));
}

#[test]
fn lawyer_wrong_answer_at_twenty_seconds() {
    let engine = engine();
    let mut world = engine.enter_world(CareerId::Lawyer, 23);
    world.start();
    world.tick(10.0);
    let case = world.as_lawyer().unwrap().current_item().unwrap().clone();
    let wrong = (case.contradiction_index + 1) % case.statements.len();
    world.submit(WorldAction::Choose(wrong));

    let hud = world.snapshot();
    assert_eq!(hud.score, 0);
    assert_eq!(hud.combo, 0);
    assert_eq!(hud.time_remaining, Some(15.0));
    assert_eq!(hud.phase, WorldPhase::Feedback);
    let outcome = &world.as_lawyer().unwrap().session().outcomes()[0];
    assert_eq!(outcome.tier, OutcomeTier::Wrong);
}

#[test]
fn flawless_lawyer_docket() {
    let engine = engine();
    let mut world = engine.enter_world(CareerId::Lawyer, 5);
    drive(&mut world, lawyer_pick);
    let result = world.result().unwrap();
    assert_eq!(result.tally.correct as usize, engine.config().lawyer.cases);
    assert_eq!(result.grade, LetterGrade::A);
}

#[test]
fn approval_clamps_at_one_hundred() {
    let issue = PoliticalIssue {
        headline: "Budget Surplus".into(),
        context: "Everyone agrees".into(),
        responses: vec![PolicyResponse {
            text: "Fund schools".into(),
            approval_delta: 20,
            outcome: "Cheers all round".into(),
        }],
    };
    let mut machine = WorldMachine::new(
        PoliticianWorld::new(PoliticianCfg::default()),
        vec![issue; 5],
    );
    machine.start();
    while !machine.is_finished() {
        machine.submit(0);
        machine.advance();
    }
    let result = machine.result().unwrap();
    assert_eq!(result.approval, Some(100));
    assert_eq!(result.tally.excellent, 5);
    assert_eq!(result.title, "Beloved Leader");
}

#[test]
fn best_policies_build_a_legacy() {
    let engine = engine();
    let mut world = engine.enter_world(CareerId::Politician, 9);
    drive(&mut world, politician_pick);
    let result = engine.finish(&world).unwrap();
    assert_eq!(result.approval, Some(100));
    assert_eq!(result.grade, LetterGrade::A);
    assert_eq!(result.possible, 100);
}

#[test]
fn on_beat_creator_goes_viral() {
    let engine = engine();
    let mut world = engine.enter_world(CareerId::Influencer, 31);
    drive(&mut world, influencer_pick);
    let result = world.result().unwrap();
    assert_eq!(result.tally.miss, 0);
    assert_eq!(result.tally.perfect, result.possible);
    assert_eq!(result.title, "Viral Star!");
    let longest_video = world
        .as_influencer()
        .map(|machine| machine.session().items().iter().map(|v| v.beats.len()).max())
        .unwrap()
        .unwrap();
    assert_eq!(result.best_combo as usize, longest_video);
}

#[test]
fn methodical_engineer_solves_every_circuit() {
    let engine = engine();
    let mut world = engine.enter_world(CareerId::Engineer, 47);
    drive(&mut world, engineer_pick);
    let result = world.result().unwrap();
    assert_eq!(result.tally.perfect as usize, engine.config().engineer.puzzles);
    assert!(
        result
            .outcomes
            .iter()
            .all(|outcome| outcome.tier == OutcomeTier::Perfect)
    );
    assert_eq!(result.title, "Master Engineer");
}

#[test]
fn idle_timed_worlds_run_out_the_clock() {
    let engine = engine();
    for career in [
        CareerId::Doctor,
        CareerId::Lawyer,
        CareerId::Influencer,
        CareerId::Engineer,
    ] {
        let mut world = engine.enter_world(career, 2);
        drive(&mut world, |_| None);
        let result = world.result().unwrap();
        assert_eq!(result.score, 0, "{career}");
        assert_eq!(result.best_combo, 0, "{career}");
        assert!(!result.failed, "{career}");
        assert_eq!(result.grade, LetterGrade::D, "{career}");
    }
}

#[test]
fn idle_politician_waits_forever() {
    let mut world = engine().enter_world(CareerId::Politician, 2);
    world.start();
    for _ in 0..600 {
        world.tick(1.0);
    }
    assert_eq!(world.phase(), WorldPhase::Gameplay);
    assert_eq!(world.snapshot().time_remaining, None);
}

#[test]
fn replay_code_reproduces_the_deal() {
    let engine = engine();
    let first = engine.enter_replay("DR-ORANGE42").unwrap();
    let second = engine.enter_replay("dr-orange42").unwrap();
    assert_eq!(first.career(), CareerId::Doctor);
    assert_eq!(format!("{first:?}"), format!("{second:?}"));
    let other = engine.enter_replay("DR-ORANGE43").unwrap();
    assert_ne!(format!("{first:?}"), format!("{other:?}"));
}

#[test]
fn empty_catalogs_skip_straight_to_results() {
    static EMPTY: std::sync::OnceLock<Catalogs> = std::sync::OnceLock::new();
    let engine = engine().with_catalogs(EMPTY.get_or_init(Catalogs::default));
    for career in CareerId::ALL {
        let mut world = engine.enter_world(career, 1);
        world.start();
        assert_eq!(world.phase(), WorldPhase::Results, "{career}");
        assert!(engine.finish(&world).is_some());
    }
}
