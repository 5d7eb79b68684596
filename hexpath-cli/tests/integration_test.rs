//! Integration tests for the HEXPATH movement core
//!
//! Tests the full stack: board, filters, search engine and query API

use hexpath_core::{
    dominates, find_all_paths_batch, CutOff, Facing, HexBoard, HexTile, Location, MovementMode,
    PathCache, PathError, PathFinder, RangeRequest, SearchConfig, SearchStatus, StepKind,
    TerrainCosts, TerrainKind, UnitState,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Standard 16x9 clear board
fn clear_board() -> HexBoard {
    HexBoard::uniform(16, 9, TerrainCosts::default())
}

/// Mixed terrain board, same every run
fn random_board(seed: u64) -> HexBoard {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    HexBoard::random(16, 9, TerrainCosts::default(), &mut rng)
}

fn random_location(board: &HexBoard, rng: &mut ChaCha8Rng) -> Location {
    Location::new(rng.gen_range(1..=board.width()), rng.gen_range(1..=board.height()))
}

// ============================================================================
// SINGLE-DESTINATION QUERIES
// ============================================================================

#[test]
fn test_straight_ahead_path() {
    let board = clear_board();
    let finder = PathFinder::new(&board, SearchConfig::default());
    let unit = UnitState::mech(1, 0, 5);

    let result = finder
        .find_path(&unit, Location::new(3, 4), Facing::N, Location::new(3, 2), MovementMode::Walk)
        .unwrap();

    let path = result.path.expect("goal is two hexes ahead");
    assert_eq!(path.len(), 2);
    assert_eq!(path.mp_used(), 2);
    assert_eq!(path.final_location(), Location::new(3, 2));
    assert!(path.steps().iter().all(|s| s.kind == StepKind::Forward));
    assert!(!result.status.is_cut_off());
}

#[test]
fn test_goal_off_board() {
    let board = clear_board();
    let finder = PathFinder::new(&board, SearchConfig::default());
    let unit = UnitState::mech(1, 0, 5);

    let err = finder
        .find_path(&unit, Location::new(3, 4), Facing::N, Location::new(0, 3), MovementMode::Walk)
        .unwrap_err();
    assert_eq!(err, PathError::GoalOffBoard(Location::new(0, 3)));
}

#[test]
fn test_start_is_goal() {
    let board = clear_board();
    let finder = PathFinder::new(&board, SearchConfig::default());
    let unit = UnitState::mech(1, 0, 5);
    let here = Location::new(6, 6);

    let path = finder
        .find_path(&unit, here, Facing::SE, here, MovementMode::Walk)
        .unwrap()
        .path
        .expect("zero-step path");
    assert!(path.is_empty());
    assert_eq!(path.mp_used(), 0);
    assert_eq!(path.final_facing(), Facing::SE);
}

#[test]
fn test_walled_in_goal_has_no_path() {
    let mut board = clear_board();
    let goal = Location::new(10, 5);
    for wall in goal.adjacent() {
        board.set_tile(wall, HexTile::new(TerrainKind::Impassable, 0));
    }
    let finder = PathFinder::new(&board, SearchConfig::default());
    let unit = UnitState::mech(1, 0, 8);

    let result = finder
        .find_path(&unit, Location::new(3, 4), Facing::N, goal, MovementMode::Run)
        .unwrap();
    assert!(result.path.is_none());
    assert_eq!(result.status, SearchStatus::Exhausted);
}

#[test]
fn test_flat_board_cost_equals_distance() {
    let board = HexBoard::uniform(16, 9, TerrainCosts::flat());
    let finder = PathFinder::new(&board, SearchConfig::default());
    let unit = UnitState::mech(1, 0, 30);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..40 {
        let start = random_location(&board, &mut rng);
        let goal = random_location(&board, &mut rng);
        let facing = Facing::new(rng.gen_range(0..6));

        let path = finder
            .find_path(&unit, start, facing, goal, MovementMode::Walk)
            .unwrap()
            .path
            .expect("open board");
        assert_eq!(path.mp_used(), start.distance_to(goal), "{} -> {}", start, goal);
    }
}

#[test]
fn test_heuristic_does_not_change_cost() {
    let board = random_board(11);
    let unit = UnitState::mech(1, 0, 6);
    let astar = PathFinder::new(&board, SearchConfig::default());
    let dijkstra = PathFinder::new(&board, SearchConfig::default().with_goal_heuristic(false));
    let mut rng = ChaCha8Rng::seed_from_u64(12);

    for _ in 0..25 {
        let start = random_location(&board, &mut rng);
        let goal = random_location(&board, &mut rng);
        let a = astar.find_path(&unit, start, Facing::N, goal, MovementMode::Run);
        let d = dijkstra.find_path(&unit, start, Facing::N, goal, MovementMode::Run);
        match (a, d) {
            (Ok(a), Ok(d)) => assert_eq!(
                a.path.map(|p| p.mp_used()),
                d.path.map(|p| p.mp_used()),
                "{} -> {}",
                start,
                goal
            ),
            (Err(a), Err(d)) => assert_eq!(a, d),
            (a, d) => panic!("finders disagree: {:?} vs {:?}", a.err(), d.err()),
        }
    }
}

// ============================================================================
// RANGE QUERIES
// ============================================================================

#[test]
fn test_longest_path_keeps_both_tradeoffs() {
    let board = clear_board();
    let finder = PathFinder::new(&board, SearchConfig::default());
    let unit = UnitState::mech(1, 0, 6);

    let reachable = finder
        .find_all_paths(&unit, Location::new(8, 8), Facing::N, MovementMode::Walk)
        .unwrap();
    let paths = reachable.paths_to(Location::new(8, 4));

    assert!(paths.iter().any(|p| p.hexes_moved() == 4 && p.mp_used() == 4));
    let long = paths
        .iter()
        .find(|p| p.hexes_moved() == 6 && p.mp_used() == 6)
        .expect("five forward and one back");
    assert_eq!(long.backward_steps(), 1);

    for (_, paths) in reachable.iter() {
        assert!(paths.iter().all(|p| p.mp_used() <= 6 && p.is_legal()));
    }
}

#[test]
fn test_range_is_idempotent() {
    let board = random_board(3);
    let finder = PathFinder::new(&board, SearchConfig::default());
    let unit = UnitState::mech(1, 0, 5);

    let summarize = || {
        let reachable = finder
            .find_all_paths(&unit, Location::new(8, 5), Facing::S, MovementMode::Run)
            .unwrap();
        reachable
            .iter()
            .map(|(location, paths)| {
                let costs: Vec<_> = paths.iter().map(|p| (p.mp_used(), p.hexes_moved())).collect();
                (location, costs)
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(summarize(), summarize());
}

#[test]
fn test_range_holds_no_dominated_paths() {
    let board = random_board(5);
    let finder = PathFinder::new(&board, SearchConfig::default());
    let unit = UnitState::mech(1, 0, 5);

    let reachable = finder
        .find_all_paths(&unit, Location::new(4, 4), Facing::NE, MovementMode::Run)
        .unwrap();
    assert!(!reachable.is_empty());

    for (location, paths) in reachable.iter() {
        for (i, a) in paths.iter().enumerate() {
            for (j, b) in paths.iter().enumerate() {
                if i != j {
                    assert!(!dominates(a, b), "dominated path kept at {}", location);
                }
            }
        }
    }
}

#[test]
fn test_running_limits_reverse() {
    let board = clear_board();
    let finder = PathFinder::new(&board, SearchConfig::default());
    let unit = UnitState::mech(1, 0, 4);

    let reachable = finder
        .find_all_paths(&unit, Location::new(8, 5), Facing::N, MovementMode::Run)
        .unwrap();
    let mut reversed = 0;
    for (_, paths) in reachable.iter() {
        for path in paths.iter().filter(|p| p.backward_steps() > 0) {
            reversed += 1;
            assert!(path.mp_used() <= unit.walk_mp, "reversed past walking MP: {:?}", path.steps());
        }
    }
    assert!(reversed > 0);
}

#[test]
fn test_cut_off_returns_partial_range() {
    let board = clear_board();
    let config = SearchConfig::default().with_max_expansions(10);
    let finder = PathFinder::new(&board, config);
    let unit = UnitState::mech(1, 0, 8);

    let reachable = finder
        .find_all_paths(&unit, Location::new(8, 5), Facing::N, MovementMode::Run)
        .unwrap();
    assert_eq!(reachable.status, SearchStatus::CutOff(CutOff::ExpansionBudget));
    assert!(reachable.expansions <= 10);
    assert!(reachable.contains(Location::new(8, 5)));
}

#[test]
fn test_batch_matches_single_queries() {
    let board = random_board(9);
    let config = SearchConfig::default();
    let requests: Vec<RangeRequest> = (0..4)
        .map(|i| RangeRequest {
            unit: UnitState::mech(i + 1, 0, 4 + i),
            start: Location::new(2 + 3 * i as i32, 5),
            facing: Facing::new(i as u8),
            mode: MovementMode::Walk,
        })
        .collect();

    let batch = find_all_paths_batch(&board, &requests, &config);
    assert_eq!(batch.len(), requests.len());

    let finder = PathFinder::new(&board, config.clone());
    for (request, result) in requests.iter().zip(batch) {
        let single = finder.find_all_paths(&request.unit, request.start, request.facing, request.mode);
        match (result, single) {
            (Ok(a), Ok(b)) => {
                let a: Vec<_> = a.locations().collect();
                let b: Vec<_> = b.locations().collect();
                assert_eq!(a, b);
            }
            (Err(a), Err(b)) => assert_eq!(a, b),
            _ => panic!("batch and single query disagree for unit {}", request.unit.id),
        }
    }
}

// ============================================================================
// CACHE AND BOARD FILES
// ============================================================================

#[test]
fn test_cache_over_saved_board() {
    let board = random_board(21);
    let json = board.to_json().unwrap();
    let reloaded = HexBoard::from_json(&json).unwrap();

    let finder = PathFinder::new(&reloaded, SearchConfig::default());
    let direct = PathFinder::new(&board, SearchConfig::default());
    let unit = UnitState::mech(1, 0, 6);
    let mut cache = PathCache::new();
    let (start, goal) = (Location::new(2, 2), Location::new(6, 4));

    let cached = cache
        .find_path(&finder, &unit, start, Facing::S, goal, MovementMode::Run)
        .unwrap();
    let again = cache
        .find_path(&finder, &unit, start, Facing::S, goal, MovementMode::Run)
        .unwrap();
    let fresh = direct
        .find_path(&unit, start, Facing::S, goal, MovementMode::Run)
        .unwrap()
        .path;

    assert_eq!(cached.as_ref().map(|p| p.mp_used()), fresh.map(|p| p.mp_used()));
    assert_eq!(cached, again);
    assert_eq!(cache.hits(), 1);
}
