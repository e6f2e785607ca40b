use settlement_planner::{
    components::{FacilityCategory, FacilityTemplate, Scores, Settlement, SettlementSize},
    engine::Engine,
    policy::{PolicyKind, SelectionPolicy},
    SimError, TickSummary,
};

fn template(name: &str, category: FacilityCategory, scores: (u64, u64, u64)) -> FacilityTemplate {
    FacilityTemplate::new(name, category, 1, Scores::new(scores.0, scores.1, scores.2))
        .expect("valid template")
}

fn village_engine(catalog: Vec<FacilityTemplate>) -> Engine {
    let mut engine = Engine::default();
    engine
        .add_settlement(Settlement::new("S", SettlementSize::Village))
        .unwrap();
    for template in catalog {
        engine.add_facility_template(template).unwrap();
    }
    engine
}

fn queued_names(engine: &mut Engine, ticks: u64) -> Vec<String> {
    let mut names = Vec::new();
    engine
        .run_with_hook(ticks, |summary: &TickSummary| {
            for (_, tick) in &summary.plans {
                names.extend(tick.queued.iter().cloned());
            }
        })
        .unwrap();
    names
}

#[test]
fn naive_picks_up_templates_added_mid_run() {
    let mut engine = village_engine(vec![
        template("a", FacilityCategory::Economy, (1, 0, 0)),
        template("b", FacilityCategory::Economy, (0, 1, 0)),
    ]);
    engine.add_plan("S", "nve").unwrap();

    assert_eq!(queued_names(&mut engine, 3), ["a", "b", "a"]);

    engine
        .add_facility_template(template("c", FacilityCategory::Environment, (0, 0, 1)))
        .unwrap();

    assert_eq!(queued_names(&mut engine, 4), ["b", "c", "a", "b"]);
}

#[test]
fn balanced_keeps_totals_level() {
    let mut engine = village_engine(vec![
        template("quality", FacilityCategory::LifeQuality, (2, 0, 0)),
        template("economy", FacilityCategory::Economy, (0, 2, 0)),
        template("green", FacilityCategory::Environment, (0, 0, 2)),
    ]);
    let id = engine.add_plan("S", "bal").unwrap();

    assert_eq!(
        queued_names(&mut engine, 6),
        ["quality", "economy", "green", "quality", "economy", "green"]
    );
    assert_eq!(engine.plan(id).unwrap().scores(), Scores::new(4, 4, 4));
    assert_eq!(
        engine.plan(id).unwrap().policy(),
        &SelectionPolicy::balanced(Scores::new(4, 4, 4))
    );
}

#[test]
fn category_policies_only_build_their_category() {
    let mut engine = village_engine(vec![
        template("mall", FacilityCategory::Economy, (0, 1, 0)),
        template("park", FacilityCategory::Environment, (0, 0, 1)),
        template("port", FacilityCategory::Economy, (0, 2, 0)),
        template("forest", FacilityCategory::Environment, (0, 0, 2)),
    ]);
    let eco = engine.add_plan("S", "eco").unwrap();
    let env = engine.add_plan("S", "env").unwrap();

    engine.step(4).unwrap();

    let built = |id| -> Vec<String> {
        engine
            .plan(id)
            .unwrap()
            .completed()
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    };
    assert_eq!(built(eco), ["mall", "port", "mall", "port"]);
    assert_eq!(built(env), ["park", "forest", "park", "forest"]);
    assert_eq!(engine.plan(eco).unwrap().scores(), Scores::new(0, 6, 0));
    assert_eq!(engine.plan(env).unwrap().scores(), Scores::new(0, 0, 6));
}

#[test]
fn economy_plan_fails_once_catalog_has_no_economy_template() {
    let mut engine = village_engine(vec![template(
        "park",
        FacilityCategory::Environment,
        (0, 0, 1),
    )]);
    engine.add_plan("S", "eco").unwrap();

    assert_eq!(
        engine.step(1),
        Err(SimError::NoEligibleTemplate {
            policy: PolicyKind::Economy
        })
    );
    assert_eq!(engine.world().tick(), 0);
}

#[test]
fn changing_policy_switches_selection_from_the_next_tick() {
    let mut engine = village_engine(vec![
        template("mall", FacilityCategory::Economy, (0, 1, 0)),
        template("park", FacilityCategory::Environment, (0, 0, 1)),
    ]);
    let id = engine.add_plan("S", "eco").unwrap();

    assert_eq!(queued_names(&mut engine, 2), ["mall", "mall"]);
    engine.change_policy(id, "env").unwrap();
    assert_eq!(queued_names(&mut engine, 2), ["park", "park"]);
    assert_eq!(engine.plan(id).unwrap().scores(), Scores::new(0, 2, 2));
}
