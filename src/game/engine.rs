use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::{debug, info};

use super::{
    action::Direction,
    config::{ConfigError, FOOD_REWARD, GridConfig},
    input_buffer::InputBuffer,
    state::{CollisionType, Outcome, Position, SessionState, Snake, Snapshot},
};

/// Random draws tried before food placement falls back to a scan
const MAX_RANDOM_FOOD_ATTEMPTS: usize = 32;

/// Length of the snake at the start of a session
const INITIAL_SNAKE_LENGTH: usize = 2;

/// Result of a call to [`GridSimulation::step`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// False when the session was not active and nothing happened
    pub advanced: bool,
    /// Tick counter after this step
    pub tick: u64,
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Set when this step ended the session
    pub outcome: Option<Outcome>,
}

impl StepResult {
    fn idle(tick: u64) -> Self {
        Self {
            advanced: false,
            tick,
            ate_food: false,
            outcome: None,
        }
    }

    pub fn terminated(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Explicit starting arrangement for a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLayout {
    /// Snake cells, head first, each one step from the previous
    pub snake: Vec<Position>,
    /// Live direction at the start
    pub direction: Direction,
    /// Food cell; `None` asks the simulation to place one
    pub food: Option<Position>,
}

/// Reasons a [`SessionLayout`] is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("snake needs at least 2 cells, got {0}")]
    SnakeTooShort(usize),
    #[error("cell ({}, {}) is outside the board", .0.x, .0.y)]
    OutOfBounds(Position),
    #[error("snake covers cell ({}, {}) twice", .0.x, .0.y)]
    Overlap(Position),
    #[error("cell ({}, {}) does not touch the segment before it", .0.x, .0.y)]
    Disconnected(Position),
    #[error("food at ({}, {}) sits on the snake", .0.x, .0.y)]
    FoodOnSnake(Position),
}

/// Snake simulation for one board
///
/// Owns the snake, food, score and pending turns of the current session.
/// Nothing outside this type mutates them; the presentation layer reads a
/// [`Snapshot`] and feeds turns through [`GridSimulation::push_direction`].
#[derive(Debug, Clone)]
pub struct GridSimulation<R = StdRng> {
    config: GridConfig,
    rng: R,
    snake: Snake,
    food: Option<Position>,
    score: u32,
    ticks: u64,
    inputs: InputBuffer,
    state: SessionState,
}

impl GridSimulation<StdRng> {
    /// Create a simulation sitting on the menu, seeded from OS entropy
    pub fn new(config: GridConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a simulation with a reproducible food sequence
    pub fn with_seed(config: GridConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GridSimulation<R> {
    pub fn with_rng(config: GridConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut sim = Self {
            config,
            rng,
            snake: initial_snake(&config),
            food: None,
            score: 0,
            ticks: 0,
            inputs: InputBuffer::new(),
            state: SessionState::Menu,
        };
        sim.spawn_food();
        Ok(sim)
    }

    /// Start an active session from an explicit arrangement
    pub fn from_layout(
        config: GridConfig,
        layout: SessionLayout,
        rng: R,
    ) -> Result<Self, LayoutError> {
        config.validate()?;

        if layout.snake.len() < INITIAL_SNAKE_LENGTH {
            return Err(LayoutError::SnakeTooShort(layout.snake.len()));
        }
        for (i, cell) in layout.snake.iter().enumerate() {
            if !cell.is_within(config.cols, config.rows) {
                return Err(LayoutError::OutOfBounds(*cell));
            }
            if layout.snake[..i].contains(cell) {
                return Err(LayoutError::Overlap(*cell));
            }
        }
        for pair in layout.snake.windows(2) {
            let (dx, dy) = (pair[1].x - pair[0].x, pair[1].y - pair[0].y);
            if dx.abs() + dy.abs() != 1 {
                return Err(LayoutError::Disconnected(pair[1]));
            }
        }
        if let Some(food) = layout.food {
            if !food.is_within(config.cols, config.rows) {
                return Err(LayoutError::OutOfBounds(food));
            }
            if layout.snake.contains(&food) {
                return Err(LayoutError::FoodOnSnake(food));
            }
        }

        let mut sim = Self {
            config,
            rng,
            snake: Snake::from_cells(layout.snake, layout.direction),
            food: layout.food,
            score: 0,
            ticks: 0,
            inputs: InputBuffer::new(),
            state: SessionState::Active,
        };
        if sim.food.is_none() {
            sim.spawn_food();
        }
        Ok(sim)
    }

    /// Start a fresh session on the current configuration
    pub fn boot(&mut self) {
        self.snake = initial_snake(&self.config);
        self.inputs.clear();
        self.score = 0;
        self.ticks = 0;
        self.food = None;
        self.spawn_food();
        self.state = SessionState::Active;

        info!(
            cols = self.config.cols,
            rows = self.config.rows,
            tick_ms = self.config.tick_interval_ms,
            "session booted"
        );
    }

    /// Start a fresh session on a new configuration
    pub fn reset(&mut self, config: GridConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.boot();
        Ok(())
    }

    /// Flip between active and paused; any other state is left alone
    pub fn toggle_pause(&mut self) -> SessionState {
        self.state = match self.state {
            SessionState::Active => SessionState::Paused,
            SessionState::Paused => SessionState::Active,
            other => other,
        };
        debug!(state = ?self.state, "pause toggled");
        self.state
    }

    /// Leave a finished or paused session for the menu
    pub fn return_to_menu(&mut self) -> bool {
        match self.state {
            SessionState::Ended(_) | SessionState::Paused => {
                self.inputs.clear();
                self.state = SessionState::Menu;
                true
            }
            _ => false,
        }
    }

    /// Queue a turn request; only live sessions (active or paused) take input
    pub fn push_direction(&mut self, requested: Direction) -> bool {
        match self.state {
            SessionState::Active | SessionState::Paused => {
                self.inputs.push(requested, self.snake.direction)
            }
            _ => false,
        }
    }

    /// Advance the session by exactly one tick
    ///
    /// Calling this outside [`SessionState::Active`] changes nothing.
    pub fn step(&mut self) -> StepResult {
        if !self.state.accepts_ticks() {
            debug!(state = ?self.state, "step ignored outside an active session");
            return StepResult::idle(self.ticks);
        }

        if let Some(turn) = self.inputs.pop() {
            if !self.snake.direction.is_opposite(turn) {
                self.snake.direction = turn;
            }
        }

        let new_head = self.snake.head().moved_in_direction(self.snake.direction);
        self.ticks += 1;

        if self.snake.len() >= self.config.total_cells() {
            return self.finish(Outcome::Win);
        }
        if let Some(collision) = self.check_collision(new_head) {
            return self.finish(Outcome::Lose(collision));
        }

        let ate_food = self.food == Some(new_head);
        self.snake.advance_to(new_head, ate_food);

        if ate_food {
            self.score += FOOD_REWARD;
            self.food = None;
            self.spawn_food();
            debug!(score = self.score, length = self.snake.len(), "food eaten");
        }

        StepResult {
            advanced: true,
            tick: self.ticks,
            ate_food,
            outcome: None,
        }
    }

    /// Place food on a free cell and return it
    ///
    /// Random draws first; once those keep landing on the snake the board is
    /// scanned row by row. Yields `None` only when no cell is free.
    pub fn spawn_food(&mut self) -> Option<Position> {
        let (cols, rows) = (self.config.cols, self.config.rows);

        self.food = if self.snake.len() >= self.config.total_cells() {
            None
        } else {
            let random = (0..MAX_RANDOM_FOOD_ATTEMPTS)
                .map(|_| {
                    Position::new(
                        self.rng.gen_range(0..cols) as i32,
                        self.rng.gen_range(0..rows) as i32,
                    )
                })
                .find(|pos| !self.snake.occupies(*pos));

            random.or_else(|| {
                (0..rows)
                    .flat_map(|y| (0..cols).map(move |x| Position::new(x as i32, y as i32)))
                    .find(|pos| !self.snake.occupies(*pos))
            })
        };
        self.food
    }

    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !pos.is_within(self.config.cols, self.config.rows) {
            return Some(CollisionType::Wall);
        }

        if self.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn finish(&mut self, outcome: Outcome) -> StepResult {
        self.state = SessionState::Ended(outcome);
        info!(
            ?outcome,
            score = self.score,
            length = self.snake.len(),
            ticks = self.ticks,
            "session ended"
        );

        StepResult {
            advanced: true,
            tick: self.ticks,
            ate_food: false,
            outcome: Some(outcome),
        }
    }
}

impl<R> GridSimulation<R> {
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    pub fn pending_turns(&self) -> &InputBuffer {
        &self.inputs
    }

    /// Copy of everything the presentation layer needs to draw a frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake: self.snake.body.clone(),
            direction: self.snake.direction,
            food: self.food,
            score: self.score,
            state: self.state,
            ticks: self.ticks,
            cols: self.config.cols,
            rows: self.config.rows,
        }
    }
}

/// Two cells at the board centre, heading right
fn initial_snake(config: &GridConfig) -> Snake {
    let head = Position::new((config.cols / 2) as i32, (config.rows / 2) as i32);
    Snake::new(head, Direction::Right, INITIAL_SNAKE_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim_with(
        cols: usize,
        rows: usize,
        snake: Vec<Position>,
        dir: Direction,
        food: Position,
    ) -> GridSimulation {
        GridSimulation::from_layout(
            GridConfig::new(cols, rows, 100),
            SessionLayout {
                snake,
                direction: dir,
                food: Some(food),
            },
            StdRng::seed_from_u64(7),
        )
        .unwrap()
    }

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_new_starts_on_menu() {
        let sim = GridSimulation::with_seed(GridConfig::default(), 1).unwrap();
        assert_eq!(sim.state(), SessionState::Menu);
        assert_eq!(sim.snake().body, vec![p(7, 8), p(6, 8)]);
        assert!(sim.food().is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = GridSimulation::new(GridConfig::new(1, 5, 100)).unwrap_err();
        assert_eq!(err, ConfigError::TooFewColumns(1));
    }

    #[test]
    fn test_boot_resets_session() {
        let mut sim = sim_with(10, 10, vec![p(5, 5), p(4, 5)], Direction::Right, p(6, 5));
        sim.step();
        assert_eq!(sim.score(), FOOD_REWARD);

        sim.boot();
        assert_eq!(sim.state(), SessionState::Active);
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.snake().len(), 2);
        assert_eq!(sim.direction(), Direction::Right);
        assert!(sim.pending_turns().is_empty());
    }

    #[test]
    fn test_reset_applies_new_config() {
        let mut sim = GridSimulation::with_seed(GridConfig::default(), 3).unwrap();
        sim.reset(GridConfig::new(21, 23, 70)).unwrap();
        assert_eq!(sim.config().cols, 21);
        assert_eq!(sim.snake().head(), p(10, 11));

        assert!(sim.reset(GridConfig::new(21, 23, 0)).is_err());
        assert_eq!(sim.config().tick_interval_ms, 70);
    }

    #[test]
    fn test_basic_movement() {
        let mut sim = sim_with(10, 10, vec![p(5, 5), p(4, 5)], Direction::Right, p(0, 0));
        let result = sim.step();

        assert!(result.advanced);
        assert!(!result.ate_food);
        assert!(!result.terminated());
        assert_eq!(sim.snake().body, vec![p(6, 5), p(5, 5)]);
    }

    #[test]
    fn test_food_consumption() {
        let mut sim = sim_with(10, 10, vec![p(5, 5), p(4, 5)], Direction::Right, p(6, 5));
        let result = sim.step();

        assert!(result.ate_food);
        assert_eq!(sim.score(), FOOD_REWARD);
        assert_eq!(sim.snake().len(), 3);
        let food = sim.food().unwrap();
        assert!(!sim.snake().occupies(food));
    }

    #[test]
    fn test_wall_collision() {
        let mut sim = sim_with(10, 10, vec![p(0, 5), p(1, 5)], Direction::Left, p(5, 5));
        let result = sim.step();

        assert_eq!(result.outcome, Some(Outcome::Lose(CollisionType::Wall)));
        assert_eq!(sim.state(), SessionState::Ended(Outcome::Lose(CollisionType::Wall)));
        // The failing move leaves the snake where it was
        assert_eq!(sim.snake().head(), p(0, 5));
    }

    #[test]
    fn test_self_collision() {
        // Hook shape: heading up into its own body
        let body = vec![p(5, 5), p(5, 6), p(4, 6), p(4, 5), p(4, 4), p(5, 4)];
        let mut sim = sim_with(10, 10, body, Direction::Up, p(9, 9));
        let result = sim.step();

        assert_eq!(
            result.outcome,
            Some(Outcome::Lose(CollisionType::SelfCollision))
        );
    }

    #[test]
    fn test_moving_into_tail_cell_is_a_collision() {
        // 2x2 loop: the tail is where the head wants to go next
        let body = vec![p(0, 0), p(1, 0), p(1, 1), p(0, 1)];
        let mut sim = sim_with(3, 3, body, Direction::Left, p(2, 2));
        sim.push_direction(Direction::Down);
        let result = sim.step();

        assert_eq!(
            result.outcome,
            Some(Outcome::Lose(CollisionType::SelfCollision))
        );
    }

    #[test]
    fn test_wall_collision_at_right_edge() {
        let body = vec![p(9, 0), p(8, 0), p(8, 1)];
        let mut sim = sim_with(10, 10, body, Direction::Right, p(0, 9));
        assert_eq!(
            sim.step().outcome,
            Some(Outcome::Lose(CollisionType::Wall))
        );
    }

    #[test]
    fn test_turn_applied_one_per_tick() {
        let mut sim = sim_with(10, 10, vec![p(5, 5), p(4, 5)], Direction::Right, p(0, 0));
        assert!(sim.push_direction(Direction::Up));
        assert!(sim.push_direction(Direction::Left));

        sim.step();
        assert_eq!(sim.direction(), Direction::Up);
        assert_eq!(sim.snake().head(), p(5, 4));

        sim.step();
        assert_eq!(sim.direction(), Direction::Left);
        assert_eq!(sim.snake().head(), p(4, 4));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut sim = sim_with(10, 10, vec![p(5, 5), p(4, 5)], Direction::Right, p(0, 0));
        assert!(!sim.push_direction(Direction::Left));
        sim.step();
        assert_eq!(sim.direction(), Direction::Right);
    }

    #[test]
    fn test_board_full_wins_before_moving() {
        // 2x2 board completely filled
        let body = vec![p(0, 0), p(1, 0), p(1, 1), p(0, 1)];
        let mut sim = GridSimulation::from_layout(
            GridConfig::new(2, 2, 100),
            SessionLayout {
                snake: body.clone(),
                direction: Direction::Up,
                food: None,
            },
            StdRng::seed_from_u64(1),
        )
        .unwrap();
        assert_eq!(sim.food(), None);

        let result = sim.step();
        assert_eq!(result.outcome, Some(Outcome::Win));
        assert_eq!(sim.snake().body, body);
    }

    #[test]
    fn test_eating_last_free_cell_then_win() {
        // 3x1 board, snake of 2 about to eat the only free cell
        let mut sim = sim_with(3, 1, vec![p(1, 0), p(0, 0)], Direction::Right, p(2, 0));
        let result = sim.step();
        assert!(result.ate_food);
        assert_eq!(sim.snake().len(), 3);
        assert_eq!(sim.food(), None);

        assert_eq!(sim.step().outcome, Some(Outcome::Win));
    }

    #[test]
    fn test_spawn_food_falls_back_to_scan() {
        // Only (2, 2) is free on a 3x3 board
        let body = vec![
            p(0, 0),
            p(1, 0),
            p(2, 0),
            p(2, 1),
            p(1, 1),
            p(0, 1),
            p(0, 2),
            p(1, 2),
        ];
        let mut sim = GridSimulation::from_layout(
            GridConfig::new(3, 3, 100),
            SessionLayout {
                snake: body,
                direction: Direction::Left,
                food: None,
            },
            StdRng::seed_from_u64(99),
        )
        .unwrap();
        for _ in 0..20 {
            assert_eq!(sim.spawn_food(), Some(p(2, 2)));
        }
    }

    #[test]
    fn test_pause_blocks_steps_and_keeps_turns() {
        let mut sim = sim_with(10, 10, vec![p(5, 5), p(4, 5)], Direction::Right, p(0, 0));
        assert_eq!(sim.toggle_pause(), SessionState::Paused);
        assert!(sim.push_direction(Direction::Down));

        let result = sim.step();
        assert!(!result.advanced);
        assert_eq!(sim.snake().head(), p(5, 5));
        assert_eq!(sim.pending_turns().len(), 1);

        assert_eq!(sim.toggle_pause(), SessionState::Active);
        sim.step();
        assert_eq!(sim.snake().head(), p(5, 6));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut sim = sim_with(10, 10, vec![p(0, 5), p(1, 5)], Direction::Left, p(5, 5));
        sim.step();
        let ticks = sim.ticks();
        let snapshot = sim.snapshot();

        let result = sim.step();
        assert!(!result.advanced);
        assert_eq!(sim.ticks(), ticks);
        assert_eq!(sim.snapshot(), snapshot);
        assert!(!sim.push_direction(Direction::Up));
        assert_eq!(sim.toggle_pause(), snapshot.state);
    }

    #[test]
    fn test_return_to_menu() {
        let mut sim = sim_with(10, 10, vec![p(0, 5), p(1, 5)], Direction::Left, p(5, 5));
        assert!(!sim.return_to_menu());
        sim.step();
        assert!(sim.return_to_menu());
        assert_eq!(sim.state(), SessionState::Menu);
    }

    #[test]
    fn test_layout_validation() {
        let config = GridConfig::new(5, 5, 100);
        let layout = |snake: Vec<Position>, food| SessionLayout {
            snake,
            direction: Direction::Right,
            food,
        };
        let rng = || StdRng::seed_from_u64(0);

        assert_eq!(
            GridSimulation::from_layout(config, layout(vec![p(1, 1)], None), rng()).unwrap_err(),
            LayoutError::SnakeTooShort(1)
        );
        assert_eq!(
            GridSimulation::from_layout(config, layout(vec![p(5, 1), p(4, 1)], None), rng()).unwrap_err(),
            LayoutError::OutOfBounds(p(5, 1))
        );
        assert_eq!(
            GridSimulation::from_layout(config, layout(vec![p(1, 1), p(1, 1)], None), rng()).unwrap_err(),
            LayoutError::Overlap(p(1, 1))
        );
        assert_eq!(
            GridSimulation::from_layout(config, layout(vec![p(1, 1), p(3, 1)], None), rng()).unwrap_err(),
            LayoutError::Disconnected(p(3, 1))
        );
        assert_eq!(
            GridSimulation::from_layout(config, layout(vec![p(1, 1), p(0, 0)], None), rng()).unwrap_err(),
            LayoutError::Disconnected(p(0, 0))
        );
        assert_eq!(
            GridSimulation::from_layout(config, layout(vec![p(1, 1), p(0, 1)], Some(p(0, 1))), rng())
                .unwrap_err(),
            LayoutError::FoodOnSnake(p(0, 1))
        );
    }

    #[test]
    fn test_seeded_sessions_are_reproducible() {
        let config = GridConfig::new(12, 12, 100);
        let mut a = GridSimulation::with_seed(config, 42).unwrap();
        let mut b = GridSimulation::with_seed(config, 42).unwrap();
        a.boot();
        b.boot();
        assert_eq!(a.food(), b.food());
    }
}
