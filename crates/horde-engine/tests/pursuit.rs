//! Single-threaded pursuit scenarios driven through the public world API.

use horde_core::{Direction, EndReason, GameEvent, Position, StepOutcome};
use horde_engine::{initialize, World, WorldConfig};
use horde_grid::Terrain;
use horde_test_utils::{map_config, spawn_pursuer_at, world_config};

fn p(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

#[test]
fn pursuer_crosses_open_grid_and_strikes() {
    let world = initialize(20, 20, 3, 5).unwrap();
    world.set_player_intent(Direction::None);
    let player = world.player_position();
    assert_eq!(player, p(10, 10));

    let id = spawn_pursuer_at(&world, p(1, 1)).unwrap();
    assert_eq!(world.lives(), 3);

    // Manhattan 18: 17 steps to become adjacent, then the strike.
    let mut moves = 0;
    let struck_from = loop {
        match world.advance_pursuer(id) {
            StepOutcome::Moved { from, to } => {
                assert!(from.is_adjacent(to));
                assert_eq!(to.manhattan(player), from.manhattan(player) - 1);
                moves += 1;
            }
            StepOutcome::Struck { at } => break at,
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(moves <= 17, "pursuer overshot");
    };
    assert_eq!(moves, 17);
    assert!(struck_from.is_adjacent(player));
    assert_eq!(world.pursuer_position(id), Some(struck_from));
    assert_eq!(world.lives(), 2);

    // A second strike in the same tick is absorbed.
    assert!(matches!(world.advance_pursuer(id), StepOutcome::Struck { .. }));
    assert_eq!(world.lives(), 2);

    world.tick();
    assert!(matches!(world.advance_pursuer(id), StepOutcome::Struck { .. }));
    assert_eq!(world.lives(), 1);
}

#[test]
fn first_step_breaks_ties_downwards() {
    let world = initialize(20, 20, 3, 5).unwrap();
    world.set_player_intent(Direction::None);
    let id = spawn_pursuer_at(&world, p(1, 1)).unwrap();
    assert_eq!(
        world.advance_pursuer(id),
        StepOutcome::Moved {
            from: p(1, 1),
            to: p(1, 2)
        }
    );
}

#[test]
fn three_strikes_end_the_game() {
    let world = initialize(20, 20, 3, 5).unwrap();
    world.set_player_intent(Direction::None);
    let id = spawn_pursuer_at(&world, p(10, 9)).unwrap();
    let events = world.events();

    for expected in [2, 1, 0] {
        assert!(matches!(world.advance_pursuer(id), StepOutcome::Struck { .. }));
        assert_eq!(world.lives(), expected);
        world.tick();
    }
    assert!(!world.is_running());
    assert_eq!(world.end_reason(), Some(EndReason::LivesExhausted));

    let hits = events
        .try_iter()
        .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
        .count();
    assert_eq!(hits, 3);
}

#[test]
fn items_respawn_in_batches() {
    let config = WorldConfig {
        player_start: Some(p(1, 1)),
        ..map_config(&["#######", "#.$$..#", "#.....#", "#######"])
    };
    let world = World::new(&config).unwrap();
    world.begin();
    let events = world.events();
    assert_eq!(world.items_remaining(), 2);

    world.tick();
    assert_eq!(world.score(), 10);
    assert_eq!(world.items_remaining(), 1);

    world.tick();
    assert_eq!(world.score(), 20);
    assert_eq!(world.items_remaining(), 5);

    let frame = world.render_snapshot();
    let placed = frame
        .rows()
        .iter()
        .flat_map(|r| r.chars())
        .filter(|&c| c == '$')
        .count();
    assert_eq!(placed, 5);
    assert_ne!(frame.symbol_at(world.player_position()), '$');

    let collected: Vec<_> = events.try_iter().collect();
    assert_eq!(
        collected,
        vec![
            GameEvent::ItemCollected {
                at: p(2, 1),
                score: 10
            },
            GameEvent::ItemCollected {
                at: p(3, 1),
                score: 20
            },
            GameEvent::ItemsRespawned { count: 5 },
        ]
    );
}

#[test]
fn default_world_starts_with_one_batch() {
    let world = initialize(20, 20, 3, 5).unwrap();
    let frame = world.render_snapshot();
    assert_eq!(frame.items_remaining, 5);
    assert_eq!(frame.lives, 3);
    assert_eq!(frame.score, 0);
    assert!(frame.pursuers.is_empty());
    assert!(frame.to_string().starts_with("SCORE: 0 | LIVES: 3 | PURSUERS: 0"));
}

#[test]
fn entities_never_rest_on_walls() {
    let maze = [
        "##########",
        "#........#",
        "#.####.#.#",
        "#.#....#.#",
        "#.#.##.#.#",
        "#...#....#",
        "##########",
    ];
    let config = WorldConfig {
        player_start: Some(p(3, 3)),
        starting_lives: 1000,
        ..map_config(&maze)
    };
    let world = World::new(&config).unwrap();
    world.begin();
    let ids: Vec<_> = [p(1, 1), p(8, 1), p(8, 5)]
        .into_iter()
        .filter_map(|at| spawn_pursuer_at(&world, at))
        .collect();
    assert_eq!(ids.len(), 3);

    let script = [
        Direction::Right,
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
        Direction::Right,
        Direction::Down,
    ];
    for round in 0..300 {
        world.set_player_intent(script[round % script.len()]);
        world.tick();
        for &id in &ids {
            world.advance_pursuer(id);
        }

        let walls = world.walls();
        assert!(!walls.is_blocked(world.player_position()));
        let cells = world.occupied_positions();
        for (i, at) in cells.iter().enumerate() {
            assert!(!walls.is_blocked(*at), "pursuer on wall at {at}");
            assert!(!cells[i + 1..].contains(at), "pursuers share {at}");
        }
    }
}

#[test]
fn walled_off_player_is_never_reached() {
    let config = WorldConfig {
        player_start: Some(p(5, 1)),
        ..map_config(&["#######", "#..#..#", "#######"])
    };
    let world = World::new(&config).unwrap();
    world.begin();
    world.set_player_intent(Direction::None);
    let id = spawn_pursuer_at(&world, p(1, 1)).unwrap();
    for _ in 0..10 {
        assert_eq!(world.advance_pursuer(id), StepOutcome::Held { at: p(1, 1) });
    }
    assert_eq!(world.lives(), 3);
}

#[test]
fn player_cannot_walk_into_a_pursuer() {
    let world = World::new(&world_config(9, 9)).unwrap();
    world.begin();
    let player = world.player_position();
    spawn_pursuer_at(&world, player.step(Direction::Up)).unwrap();
    assert!(!world.move_player(Direction::Up).is_moved());
    assert_eq!(world.player_position(), player);
    assert_eq!(world.lives(), 3);
}
