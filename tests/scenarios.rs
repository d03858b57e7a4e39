//! End-to-end sessions driven through the public API

use neon_snake::game::{
    CollisionType, Direction, FOOD_REWARD, GridConfig, GridSimulation, InputBuffer, Outcome,
    Position, SessionLayout, SessionState, TickScheduler, TickStrategy,
};
use rand::{SeedableRng, rngs::StdRng};
use std::time::Duration;

fn p(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

fn layout(snake: Vec<Position>, direction: Direction, food: Option<Position>) -> SessionLayout {
    SessionLayout {
        snake,
        direction,
        food,
    }
}

fn simulation(config: GridConfig, layout: SessionLayout, seed: u64) -> GridSimulation {
    GridSimulation::from_layout(config, layout, StdRng::seed_from_u64(seed)).unwrap()
}

#[test]
fn food_eaten_after_two_ticks_on_15x17_board() {
    let config = GridConfig::new(15, 17, 100);
    let mut sim = simulation(
        config,
        layout(vec![p(7, 8), p(6, 8)], Direction::Right, Some(p(9, 8))),
        1,
    );

    let first = sim.step();
    assert!(!first.ate_food);
    let second = sim.step();
    assert!(second.ate_food);

    let snapshot = sim.snapshot();
    assert_eq!(snapshot.head(), Some(p(9, 8)));
    assert_eq!(snapshot.score, FOOD_REWARD);
    assert_eq!(snapshot.snake.len(), 3);
    let food = snapshot.food.unwrap();
    assert!(!snapshot.snake.contains(&food));
}

#[test]
fn running_off_the_right_edge_ends_the_session() {
    let mut sim = simulation(
        GridConfig::new(10, 10, 100),
        layout(vec![p(9, 4), p(8, 4)], Direction::Right, Some(p(0, 0))),
        2,
    );

    let result = sim.step();
    assert_eq!(result.outcome, Some(Outcome::Lose(CollisionType::Wall)));
    assert_eq!(
        sim.state(),
        SessionState::Ended(Outcome::Lose(CollisionType::Wall))
    );
}

#[test]
fn reversal_of_a_queued_turn_is_rejected() {
    let mut buffer = InputBuffer::new();
    let live = Direction::Right;

    assert!(buffer.push(Direction::Up, live));
    // Down would reverse the queued Up
    assert!(!buffer.push(Direction::Down, live));
    assert!(buffer.push(Direction::Left, live));
    assert_eq!(
        buffer.pending().collect::<Vec<_>>(),
        vec![Direction::Up, Direction::Left]
    );

    // Full queue: the oldest turn is evicted and the queue stays legal
    assert!(buffer.push(Direction::Down, live));
    assert_eq!(buffer.pending().collect::<Vec<_>>(), vec![Direction::Down]);
}

#[test]
fn full_board_wins_on_next_step() {
    // Serpentine covering a 3x2 board
    let body = vec![p(0, 0), p(1, 0), p(2, 0), p(2, 1), p(1, 1), p(0, 1)];
    let mut sim = simulation(
        GridConfig::new(3, 2, 100),
        layout(body.clone(), Direction::Left, None),
        3,
    );
    assert_eq!(sim.food(), None);

    let result = sim.step();
    assert_eq!(result.outcome, Some(Outcome::Win));
    assert_eq!(sim.state(), SessionState::Ended(Outcome::Win));
    assert_eq!(sim.snake().body, body);
}

#[test]
fn pause_keeps_queued_turns_for_resume() {
    let mut sim = GridSimulation::with_seed(GridConfig::new(20, 20, 100), 4).unwrap();
    sim.boot();
    let mut scheduler = TickScheduler::for_config(TickStrategy::FixedRate, sim.config());

    scheduler.on_timer(&mut sim);
    let head_before = sim.snake().head();

    sim.toggle_pause();
    assert!(sim.push_direction(Direction::Down));
    assert!(sim.push_direction(Direction::Left));
    for _ in 0..5 {
        assert!(scheduler.on_timer(&mut sim).is_none());
    }
    assert_eq!(sim.snake().head(), head_before);
    assert_eq!(sim.pending_turns().len(), 2);

    sim.toggle_pause();
    scheduler.on_timer(&mut sim);
    assert_eq!(sim.direction(), Direction::Down);
    assert_eq!(sim.snake().head(), head_before.moved_in_direction(Direction::Down));
    assert_eq!(sim.pending_turns().len(), 1);
}

#[test]
fn frame_gated_session_plays_like_fixed_rate() {
    let config = GridConfig::new(12, 12, 50);
    let start = layout(vec![p(2, 6), p(1, 6)], Direction::Right, Some(p(11, 0)));
    let mut fixed = simulation(config, start.clone(), 9);
    let mut gated = simulation(config, start, 9);

    let mut fixed_scheduler = TickScheduler::for_config(TickStrategy::FixedRate, &config);
    let mut gated_scheduler = TickScheduler::for_config(TickStrategy::FrameGated, &config);

    // 16 ms frames: a step lands every fourth frame
    let mut frame = Duration::ZERO;
    for _ in 0..5 {
        fixed_scheduler.on_timer(&mut fixed);
        let mut stepped = 0;
        while stepped == 0 {
            frame += Duration::from_millis(16);
            stepped += gated_scheduler.on_frame(&mut gated, frame).map_or(0, |_| 1);
        }
    }

    assert_eq!(fixed.snapshot(), gated.snapshot());
    assert_eq!(gated.ticks(), 5);
}

/// Greedy move toward the food that avoids reversals, walls and the body
fn toward_food(sim: &GridSimulation) -> Direction {
    let head = sim.snake().head();
    let live = sim.direction();
    let Some(food) = sim.food() else {
        return live;
    };
    let (cols, rows) = (sim.config().cols, sim.config().rows);

    Direction::ALL
        .into_iter()
        .filter(|dir| !dir.is_opposite(live))
        .map(|dir| (dir, head.moved_in_direction(dir)))
        .filter(|(_, next)| next.is_within(cols, rows) && !sim.snake().occupies(*next))
        .min_by_key(|(_, next)| (next.x - food.x).abs() + (next.y - food.y).abs())
        .map_or(live, |(dir, _)| dir)
}

#[test]
fn length_changes_only_when_food_is_eaten() {
    let mut sim = GridSimulation::with_seed(GridConfig::new(16, 16, 100), 21).unwrap();
    sim.boot();

    // Chase the food; check invariants on every tick
    let mut eaten = 0;
    for _ in 0..2_000 {
        if sim.state() != SessionState::Active || eaten >= 6 {
            break;
        }
        sim.push_direction(toward_food(&sim));

        let before = sim.snake().len();
        let result = sim.step();
        if result.terminated() {
            assert_eq!(sim.snake().len(), before);
            break;
        }

        let expected = if result.ate_food { before + 1 } else { before };
        assert_eq!(sim.snake().len(), expected);
        if result.ate_food {
            eaten += 1;
            assert_eq!(sim.score(), eaten * FOOD_REWARD);
        }
        if let Some(food) = sim.food() {
            assert!(!sim.snake().occupies(food));
        }
    }

    assert!(eaten >= 3, "only {eaten} meals");
    assert_eq!(sim.snake().len(), 2 + eaten as usize);
}
