//! Smoke tests for the planner on the gripper domain.
//!
//! A robot with two grippers moves balls between two rooms.

use liftplan::state::StateSnapshot;
use liftplan::{
    AStarSearch, BlindHeuristic, BreadthFirstSearch, GoalCountHeuristic, GroundingMode,
    NoopObserver, Plan, SearchAlgorithm, SearchLimits, SearchStatus, StateId, StateSpace,
    TaskDescription,
};
use std::collections::BTreeSet;

const GRIPPER: &str = r#"{
    "name": "gripper-2",
    "objects": ["rooma", "roomb", "ball1", "ball2", "left", "right"],
    "predicates": [
        {"name": "room", "arity": 1},
        {"name": "ball", "arity": 1},
        {"name": "gripper", "arity": 1},
        {"name": "at-robby", "arity": 1},
        {"name": "at", "arity": 2},
        {"name": "free", "arity": 1},
        {"name": "carry", "arity": 2}
    ],
    "actions": [
        {
            "name": "move",
            "parameters": ["?from", "?to"],
            "precondition": [
                {"predicate": "room", "args": ["?from"]},
                {"predicate": "room", "args": ["?to"]},
                {"predicate": "at-robby", "args": ["?from"]}
            ],
            "effect": [
                {"predicate": "at-robby", "args": ["?to"]},
                {"predicate": "at-robby", "args": ["?from"], "negated": true}
            ]
        },
        {
            "name": "pick",
            "parameters": ["?obj", "?room", "?gripper"],
            "precondition": [
                {"predicate": "ball", "args": ["?obj"]},
                {"predicate": "room", "args": ["?room"]},
                {"predicate": "gripper", "args": ["?gripper"]},
                {"predicate": "at", "args": ["?obj", "?room"]},
                {"predicate": "at-robby", "args": ["?room"]},
                {"predicate": "free", "args": ["?gripper"]}
            ],
            "effect": [
                {"predicate": "carry", "args": ["?obj", "?gripper"]},
                {"predicate": "at", "args": ["?obj", "?room"], "negated": true},
                {"predicate": "free", "args": ["?gripper"], "negated": true}
            ]
        },
        {
            "name": "drop",
            "parameters": ["?obj", "?room", "?gripper"],
            "precondition": [
                {"predicate": "ball", "args": ["?obj"]},
                {"predicate": "room", "args": ["?room"]},
                {"predicate": "gripper", "args": ["?gripper"]},
                {"predicate": "carry", "args": ["?obj", "?gripper"]},
                {"predicate": "at-robby", "args": ["?room"]}
            ],
            "effect": [
                {"predicate": "at", "args": ["?obj", "?room"]},
                {"predicate": "free", "args": ["?gripper"]},
                {"predicate": "carry", "args": ["?obj", "?gripper"], "negated": true}
            ]
        }
    ],
    "init": [
        {"predicate": "room", "args": ["rooma"]},
        {"predicate": "room", "args": ["roomb"]},
        {"predicate": "ball", "args": ["ball1"]},
        {"predicate": "ball", "args": ["ball2"]},
        {"predicate": "gripper", "args": ["left"]},
        {"predicate": "gripper", "args": ["right"]},
        {"predicate": "at-robby", "args": ["rooma"]},
        {"predicate": "free", "args": ["left"]},
        {"predicate": "free", "args": ["right"]},
        {"predicate": "at", "args": ["ball1", "rooma"]},
        {"predicate": "at", "args": ["ball2", "rooma"]}
    ],
    "goal": [{"predicate": "at", "args": ["ball1", "roomb"]}]
}"#;

fn gripper(mode: GroundingMode) -> StateSpace {
    let task = TaskDescription::from_json_str(GRIPPER).expect("parse failed");
    StateSpace::from_description(&task, mode).expect("build failed")
}

fn applicable_names(space: &mut StateSpace) -> BTreeSet<String> {
    let initial = space.initial_state();
    space
        .applicable_actions(initial)
        .into_iter()
        .map(|action| space.format_action(action))
        .collect()
}

fn apply(space: &mut StateSpace, state: StateId, name: &str) -> StateId {
    let action = space
        .applicable_actions(state)
        .into_iter()
        .find(|&action| space.format_action(action) == name)
        .expect("action should be applicable");
    space.successor(state, action).unwrap().0
}

#[test]
fn test_initial_applicable_actions() {
    let mut space = gripper(GroundingMode::Lifted);
    let names = applicable_names(&mut space);
    let expected: BTreeSet<String> = [
        "(move rooma rooma)",
        "(move rooma roomb)",
        "(pick ball1 rooma left)",
        "(pick ball1 rooma right)",
        "(pick ball2 rooma left)",
        "(pick ball2 rooma right)",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect();
    assert_eq!(names, expected);
}

#[test]
fn test_grounded_mode_matches_lifted() {
    let mut lifted = gripper(GroundingMode::Lifted);
    let mut grounded = gripper(GroundingMode::Grounded);
    assert_eq!(applicable_names(&mut lifted), applicable_names(&mut grounded));
}

#[test]
fn test_self_loop_returns_the_same_state() {
    let mut space = gripper(GroundingMode::Lifted);
    let initial = space.initial_state();
    let schema = space.problem().find_action_schema("move").unwrap();
    let rooma = space.repository().find_object("rooma").unwrap();
    let action = space.ground_action_for(schema, vec![rooma, rooma]).unwrap();
    let (next, cost) = space.successor(initial, action).unwrap();
    assert_eq!(next, initial);
    assert_eq!(cost, 1.0);
    assert_eq!(space.num_states(), 1);
}

#[test]
fn test_breadth_first_finds_three_step_plan() {
    let mut space = gripper(GroundingMode::Lifted);
    let mut search = BreadthFirstSearch::new(SearchLimits::unlimited());
    let result = search.search(&mut space, &mut NoopObserver).unwrap();
    assert_eq!(result.status, SearchStatus::Solved);
    let plan = result.plan.expect("plan");
    assert_eq!(plan.len(), 3);
    assert_eq!(plan.cost, 3.0);
    let lines = plan.format(&space);
    assert!(lines[0].starts_with("(pick ball1 rooma"));
    assert_eq!(lines[1], "(move rooma roomb)");
    assert!(lines[2].starts_with("(drop ball1 roomb"));
    assert_eq!(plan.validate(&mut space).ok(), result.goal_state);
}

#[test]
fn test_astar_matches_breadth_first_cost() {
    for mode in [GroundingMode::Lifted, GroundingMode::Grounded] {
        let mut space = gripper(mode);
        let breadth_first = BreadthFirstSearch::new(SearchLimits::unlimited())
            .search(&mut space, &mut NoopObserver)
            .unwrap();

        let mut space = gripper(mode);
        let mut search = AStarSearch::new(BlindHeuristic, SearchLimits::unlimited());
        let result = search.search(&mut space, &mut NoopObserver).unwrap();
        assert_eq!(result.cost(), Some(3.0), "{mode:?}");
        assert!(result.counters.expanded <= breadth_first.counters.expanded);

        let mut space = gripper(mode);
        let mut search = AStarSearch::new(GoalCountHeuristic, SearchLimits::unlimited())
            .with_preferred_operators(1);
        let result = search.search(&mut space, &mut NoopObserver).unwrap();
        assert!(result.is_solved(), "{mode:?}");
    }
}

#[test]
fn test_plan_file_round_trip() {
    let mut space = gripper(GroundingMode::Lifted);
    let result = BreadthFirstSearch::new(SearchLimits::unlimited())
        .search(&mut space, &mut NoopObserver)
        .unwrap();
    let plan = result.plan.expect("plan");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gripper.plan.json");
    plan.save(&path).unwrap();
    let loaded = Plan::load(&path).unwrap();
    assert_eq!(loaded, plan);

    let mut fresh = gripper(GroundingMode::Grounded);
    assert!(loaded.validate(&mut fresh).is_ok());
}

#[test]
fn test_invalid_plan_is_rejected() {
    let mut space = gripper(GroundingMode::Lifted);
    let result = BreadthFirstSearch::new(SearchLimits::unlimited())
        .search(&mut space, &mut NoopObserver)
        .unwrap();
    let mut plan = result.plan.expect("plan");

    let mut truncated = plan.clone();
    truncated.steps.pop();
    assert!(matches!(
        truncated.validate(&mut space),
        Err(liftplan::Error::GoalNotReached)
    ));

    // Dropping before picking is not applicable.
    plan.steps.swap(0, 2);
    assert!(matches!(
        plan.validate(&mut space),
        Err(liftplan::Error::ActionNotApplicable(_))
    ));
}

#[test]
fn test_snapshots_do_not_depend_on_exploration_order() {
    let mut first = gripper(GroundingMode::Lifted);
    let initial = first.initial_state();
    let picked = apply(&mut first, initial, "(pick ball1 rooma left)");
    let moved = apply(&mut first, picked, "(move rooma roomb)");

    // The second space grounds every other branch before taking the same path.
    let mut second = gripper(GroundingMode::Lifted);
    let initial = second.initial_state();
    for action in second.applicable_actions(initial) {
        let next = second.successor(initial, action).unwrap().0;
        second.applicable_actions(next);
    }
    let picked = apply(&mut second, initial, "(pick ball1 rooma left)");
    let expected = apply(&mut second, picked, "(move rooma roomb)");

    let snapshot = first.snapshot(moved);
    assert_eq!(snapshot, second.snapshot(expected));

    let json = serde_json::to_string(&snapshot).unwrap();
    let decoded: StateSnapshot = serde_json::from_str(&json).unwrap();
    let restored = second.restore(&decoded).unwrap();
    assert_eq!(restored, expected);
    assert_eq!(second.describe_state(restored), first.describe_state(moved));
}

#[test]
fn test_foreign_snapshots_are_rejected() {
    let mut space = gripper(GroundingMode::Lifted);
    let states = space.num_states();
    let unknown_atom = StateSnapshot {
        fluent: vec![100_000],
        derived: Vec::new(),
        numeric: Vec::new(),
    };
    assert!(matches!(
        space.restore(&unknown_atom),
        Err(liftplan::Error::InvalidSnapshot(_))
    ));
    let surplus_value = StateSnapshot {
        fluent: Vec::new(),
        derived: Vec::new(),
        numeric: vec![Some(1.0)],
    };
    assert!(matches!(
        space.restore(&surplus_value),
        Err(liftplan::Error::InvalidSnapshot(_))
    ));
    assert_eq!(space.num_states(), states);
}
