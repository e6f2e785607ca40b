use settlement_planner::{
    command::{ActionStatus, Command},
    console::Console,
    engine::Engine,
};

type Session = Console<Vec<u8>, Vec<u8>>;

fn run_script(script: &str) -> (Session, String, String) {
    let mut console = Console::new(Engine::default(), Vec::new(), Vec::new());
    console.run(script.as_bytes()).expect("script runs");
    let output = String::from_utf8(console.output().clone()).expect("utf8 output");
    let errors = String::from_utf8(console.errors().clone()).expect("utf8 errors");
    (console, output, errors)
}

#[test]
fn script_prints_status_log_and_summary() {
    let script = "\
settlement S 0
facility F1 1 1 1 1 1
plan S nve
step 1
planStatus 0
changePolicy 0 nve
restore
log
close
step 5
";
    let mut console = Console::new(Engine::default(), Vec::new(), Vec::new());
    console.run(script.as_bytes()).unwrap();

    assert!(!console.is_running());
    assert_eq!(console.log().len(), 9);
    assert_eq!(console.engine().world().tick(), 1);

    let (_, out, err) = console.into_parts();
    let output = String::from_utf8(out).unwrap();
    let errors = String::from_utf8(err).unwrap();
    let expected = "\
The simulation has started
PlanID: 0
SettlementName: S
PlanStatus: AVAILABLE
SelectionPolicy: nve
LifeQualityScore: 1
EconomyScore: 1
EnvironmentScore: 1
FacilityName: F1
FacilityStatus: OPERATIONAL
settlement S 0 COMPLETED
facility F1 1 1 1 1 1 COMPLETED
plan S nve COMPLETED
step 1 COMPLETED
planStatus 0 COMPLETED
changePolicy 0 nve ERROR: plan 0 already uses nve selection
restore ERROR: no backup available
PlanID: 0
SettlementName: S
LifeQualityScore: 1
EconomyScore: 1
EnvironmentScore: 1
";
    assert_eq!(output, expected);
    assert_eq!(
        errors,
        "Error: plan 0 already uses nve selection\nError: no backup available\n"
    );
}

#[test]
fn malformed_lines_are_reported_but_not_logged() {
    let (console, output, errors) =
        run_script("bogus\nstep\nsettlement S 9\n\nsettlement S 1\n");

    assert_eq!(console.log().len(), 1);
    assert_eq!(console.log()[0].to_string(), "settlement S 1 COMPLETED");
    assert_eq!(output, "The simulation has started\n");
    assert!(errors.contains("Error: unknown command 'bogus'"));
    assert!(errors.contains("Error: step: missing step count"));
    assert!(errors.contains("Error: settlement: invalid settlement size '9'"));
}

#[test]
fn failed_commands_are_logged_with_their_error() {
    let mut console = Console::new(Engine::default(), Vec::new(), Vec::new());

    let status = console
        .execute(Command::AddPlan {
            settlement: "Nowhere".into(),
            policy: "eco".into(),
        })
        .unwrap();

    assert_eq!(
        status,
        ActionStatus::Error("settlement 'Nowhere' doesn't exist".into())
    );
    assert_eq!(console.log().len(), 1);
    assert!(console.engine().world().plans().is_empty());
    assert_eq!(
        console.errors().as_slice(),
        b"Error: settlement 'Nowhere' doesn't exist\n"
    );
    assert!(console.output().is_empty());
}

#[test]
fn zero_cost_facility_is_rejected() {
    let (console, _, errors) = run_script("facility Free 1 0 1 1 1\n");

    assert!(console.engine().world().catalog().is_empty());
    assert!(errors.contains("Error: invalid facility 'Free': build cost must be at least one tick"));
}

#[test]
fn restore_does_not_rewind_the_action_log() {
    let script = "\
settlement S 1
facility Mall 1 2 0 3 0
plan S eco
backup
step 4
restore
planStatus 0
";
    let (console, output, _) = run_script(script);

    assert_eq!(console.log().len(), 7);
    assert!(console
        .log()
        .iter()
        .all(|record| record.status == ActionStatus::Completed));
    assert_eq!(console.engine().world().tick(), 0);
    assert!(output.contains("PlanStatus: AVAILABLE"));
    assert!(output.contains("EconomyScore: 0"));
    assert!(!output.contains("FacilityName"));
}

#[test]
fn step_failure_is_reported_to_the_session() {
    let (console, output, errors) = run_script("settlement S 0\nplan S eco\nstep 2\n");

    assert_eq!(
        console.log()[2].status,
        ActionStatus::Error("no facility eligible for eco selection".into())
    );
    assert!(errors.contains("Error: no facility eligible for eco selection"));
    assert!(!output.contains("Error"));
}

#[test]
fn extreme_scores_do_not_overflow() {
    let script = "\
settlement S 0
facility big 1 1 18446744073709551615 0 0
plan S bal
step 3
planStatus 0
";
    let (console, output, errors) = run_script(script);

    assert!(errors.is_empty());
    assert_eq!(console.engine().world().tick(), 3);
    assert!(output.contains("LifeQualityScore: 18446744073709551615"));
}
