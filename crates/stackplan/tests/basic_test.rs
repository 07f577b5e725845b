//! Integration tests for the planner

use stackplan::{
    formula_satisfied, ground_problem, plan, replay, same_arrangement, search, BlocksGraph, Catalog,
    Form, Formula, HeuristicContext, Literal, ObjectSpec, PlanError, PlanLine, PlanOutcome,
    PlanStatus, Planner, PlannerConfig, ProblemJson, Relation, SearchBudget, Size, WorldState,
};
use std::sync::Arc;
use std::time::Duration;

fn problem(json: &str) -> ProblemJson {
    serde_json::from_str(json).unwrap()
}

const BALL_AND_BOX: &str = r#"{
    "world": {
        "stacks": [["a"], ["b"], []],
        "arms": [0],
        "objects": {
            "a": {"form": "ball", "size": "small", "color": "white"},
            "b": {"form": "box", "size": "large", "color": "red"}
        }
    },
    "goal": [[{"relation": "holding", "args": ["a"]}]]
}"#;

#[test]
fn test_holding_without_travel() {
    let grounded = ground_problem(&problem(BALL_AND_BOX)).unwrap();
    let outcome = Planner::new(grounded.config.clone())
        .plan(&grounded.goal, &grounded.state)
        .unwrap();

    match outcome {
        PlanOutcome::Planned(plan) => {
            assert_eq!(plan.tokens(), vec!["p"]);
            assert_eq!(plan.cost, 1);
            assert_eq!(
                plan.lines,
                vec![
                    PlanLine::Message("Picking up the small white ball".into()),
                    PlanLine::Tick("p".into()),
                ]
            );
        }
        other => panic!("Expected a plan, got {:?}", other),
    }
}

#[test]
fn test_already_satisfied_skips_search() {
    let mut json = problem(BALL_AND_BOX);
    json.goal = serde_json::from_str(r#"[[{"relation": "leftof", "args": ["a", "b"]}]]"#).unwrap();
    // a budget that could not run a single expansion
    json.config = Some(PlannerConfig {
        timeout: Duration::ZERO,
        max_expansions: 1,
        max_attempts: 1,
        ..Default::default()
    });
    let grounded = ground_problem(&json).unwrap();
    let outcome = Planner::new(grounded.config.clone())
        .plan(&grounded.goal, &grounded.state)
        .unwrap();
    assert!(outcome.is_already_satisfied());

    let json = outcome.to_json();
    assert_eq!(json.status, PlanStatus::AlreadySatisfied);
    assert!(json.tokens.is_empty());
}

#[test]
fn test_ungrounded_goal_is_reported() {
    let mut json = problem(BALL_AND_BOX);
    json.goal = serde_json::from_str(r#"[[{"relation": "ontop", "args": ["a", "c"]}]]"#).unwrap();
    let err = ground_problem(&json).unwrap_err();
    assert_eq!(err, PlanError::UngroundedReference { name: "c".into() });
}

#[test]
fn test_timeouts_are_retried_then_reported() {
    let mut json = problem(BALL_AND_BOX);
    json.goal = serde_json::from_str(r#"[[{"relation": "rightof", "args": ["a", "b"]}]]"#).unwrap();
    json.config = Some(PlannerConfig {
        max_expansions: 1,
        ..Default::default()
    });
    let grounded = ground_problem(&json).unwrap();
    let err = Planner::new(grounded.config.clone())
        .plan(&grounded.goal, &grounded.state)
        .unwrap_err();
    assert_eq!(err, PlanError::Timeout { attempts: 3 });
}

/// [a, c, d] [b] [] [] with one arm at column 0, all large bricks
fn buried() -> (WorldState, Formula) {
    let mut catalog = Catalog::new();
    let a = catalog.insert("a", ObjectSpec::new(Form::Brick, Size::Large, "red")).unwrap();
    let b = catalog.insert("b", ObjectSpec::new(Form::Brick, Size::Large, "blue")).unwrap();
    let c = catalog.insert("c", ObjectSpec::new(Form::Brick, Size::Large, "green")).unwrap();
    let d = catalog.insert("d", ObjectSpec::new(Form::Brick, Size::Large, "yellow")).unwrap();
    let state = WorldState::new(
        vec![vec![a, c, d], vec![b], vec![], vec![]],
        vec![None],
        vec![0],
        Arc::new(catalog),
    )
    .unwrap();
    (state, Formula::all_of(vec![Literal::binary(Relation::OnTop, a, b)]))
}

#[test]
fn test_buried_object_plan_is_optimal() {
    let (state, goal) = buried();
    let ctx = HeuristicContext::new(&goal, 0);
    // a walks 0 -> 1 once two obstructions are cleared at 4 actions each
    assert!(ctx.estimate(&state) >= 4 + 1);

    let outcome = plan(&goal, &state).unwrap();
    let plan = outcome.plan().unwrap();

    let budget = SearchBudget::unlimited();
    let exact = search(&BlocksGraph::new(), state.clone(), |s| ctx.is_goal(s), |_| 0, &budget).unwrap();
    assert_eq!(plan.cost, exact.cost);

    // two obstructions cleared, then a placed: three pick/drop pairs
    let manipulations: usize = plan
        .tokens()
        .iter()
        .filter(|t| **t == "p" || **t == "d")
        .count();
    assert_eq!(manipulations, 6);
    assert_eq!(plan.tokens().len() as u32, plan.cost);
}

#[test]
fn test_replayed_plan_reaches_the_goal() {
    let (state, goal) = buried();
    let outcome = plan(&goal, &state).unwrap();
    let plan = outcome.plan().unwrap();

    let end = replay(&state, &plan.lines).unwrap();
    assert!(same_arrangement(&end, plan.final_state().unwrap()));
    assert!(formula_satisfied(&goal, &end));
}

#[test]
fn test_retry_with_penalty_finds_a_plan() {
    let mut catalog = Catalog::new();
    let mut brick = |name: &str| {
        catalog
            .insert(name, ObjectSpec::new(Form::Brick, Size::Large, "red"))
            .unwrap()
    };
    let (a, b, c, d, e) = (brick("a"), brick("b"), brick("c"), brick("d"), brick("e"));
    let state = WorldState::new(
        vec![vec![a, c, d], vec![b, e], vec![], vec![]],
        vec![None],
        vec![0],
        Arc::new(catalog),
    )
    .unwrap();
    let goal = Formula::all_of(vec![
        Literal::binary(Relation::OnTop, a, b),
        Literal::binary(Relation::LeftOf, e, c),
    ]);
    // too small for the admissible attempt, enough once the estimate is looser
    let config = PlannerConfig {
        max_expansions: 58,
        timeout: Duration::from_secs(30),
        ..Default::default()
    };

    let outcome = Planner::new(config).plan(&goal, &state).unwrap();
    let plan = outcome.plan().unwrap();
    assert!(plan.attempts > 1);

    let retries = plan.attempts - 1;
    for (i, line) in plan.lines[..retries].iter().enumerate() {
        let penalty = 2 * (i + 1);
        assert!(
            matches!(line, PlanLine::Message(text) if text.ends_with(&format!("(penalty {})", penalty))),
            "unexpected line {:?}",
            line
        );
    }
    assert!(plan.lines[retries..]
        .iter()
        .all(|line| !matches!(line, PlanLine::Message(text) if text.contains("retrying"))));

    let end = replay(&state, &plan.lines).unwrap();
    assert!(formula_satisfied(&goal, &end));
    assert_eq!(outcome.to_json().attempts, plan.attempts);
}

#[test]
fn test_two_arms_share_the_work() {
    let mut catalog = Catalog::new();
    let a = catalog.insert("a", ObjectSpec::new(Form::Brick, Size::Large, "red")).unwrap();
    let b = catalog.insert("b", ObjectSpec::new(Form::Brick, Size::Large, "blue")).unwrap();
    let c = catalog.insert("c", ObjectSpec::new(Form::Brick, Size::Large, "green")).unwrap();
    let state = WorldState::new(
        vec![vec![a], vec![], vec![], vec![b], vec![c]],
        vec![None, None],
        vec![0, 4],
        Arc::new(catalog),
    )
    .unwrap();
    let goal = Formula::all_of(vec![
        Literal::binary(Relation::RightOf, a, b),
        Literal::binary(Relation::LeftOf, c, b),
    ]);

    let outcome = plan(&goal, &state).unwrap();
    let plan = outcome.plan().unwrap();
    assert!(plan.tokens().iter().all(|t| t.len() == 2));

    let end = replay(&state, &plan.lines).unwrap();
    assert!(same_arrangement(&end, plan.final_state().unwrap()));
    assert!(formula_satisfied(&goal, &end));
}

#[test]
fn test_unsupported_placement_has_no_path() {
    let mut json = problem(BALL_AND_BOX);
    json.goal = serde_json::from_str(r#"[[{"relation": "ontop", "args": ["b", "a"]}]]"#).unwrap();
    let grounded = ground_problem(&json).unwrap();
    let err = plan(&grounded.goal, &grounded.state).unwrap_err();
    assert_eq!(err, PlanError::NoPath);
}

#[test]
fn test_plan_json_output() {
    let grounded = ground_problem(&problem(BALL_AND_BOX)).unwrap();
    let outcome = plan(&grounded.goal, &grounded.state).unwrap();
    let value = serde_json::to_value(outcome.to_json()).unwrap();
    assert_eq!(value["status"], "planned");
    assert_eq!(value["tokens"], serde_json::json!(["p"]));
    assert_eq!(value["cost"], 1);
    assert_eq!(value["lines"][1]["kind"], "tick");
}
