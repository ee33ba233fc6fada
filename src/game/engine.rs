use super::{
    action::Direction,
    config::{Difficulty, FoodPlacement, GameConfig},
    state::{CollisionType, GameState, Phase, Position, Snake},
};
use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::time::Duration;

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The snake moved one cell
    Ok,
    /// The snake crashed; the game is now over
    Collision(CollisionType),
    /// The game was already over, nothing happened
    Idle,
}

/// Result of a game tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub outcome: TickOutcome,
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Whether the tick period changed and the scheduler needs a new one
    pub speed_changed: bool,
}

impl TickResult {
    fn new(outcome: TickOutcome) -> Self {
        Self {
            outcome,
            ate_food: false,
            speed_changed: false,
        }
    }

    pub fn collision(&self) -> Option<CollisionType> {
        match self.outcome {
            TickOutcome::Collision(kind) => Some(kind),
            _ => None,
        }
    }
}

/// The game engine: owns one game's state and applies the rules to it.
///
/// Timing is not the engine's business. Whoever owns the engine calls
/// [`tick`](Self::tick) once per period and reads [`tick_period`](Self::tick_period)
/// back when a result reports `speed_changed`.
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    /// Turn requested since the last tick
    pending: Option<Direction>,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with an entropy-seeded food RNG
    pub fn new(config: GameConfig) -> Self {
        Self::from_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Start from an arbitrary state, e.g. a scenario set up by a test
    pub fn with_state(config: GameConfig, state: GameState, seed: u64) -> Self {
        Self {
            config,
            state,
            pending: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn from_rng(config: GameConfig, mut rng: StdRng) -> Self {
        let state = initial_state(&config, &mut rng);
        Self {
            config,
            state,
            pending: None,
            rng,
        }
    }

    /// Reset the game to its initial state under `difficulty`
    pub fn reset(&mut self, difficulty: Difficulty) -> &GameState {
        self.config.difficulty = difficulty;
        self.state = initial_state(&self.config, &mut self.rng);
        self.pending = None;
        debug!(
            "reset: difficulty={} speed={}ms",
            difficulty.label(),
            self.state.speed
        );
        &self.state
    }

    /// Leave the Ready phase. Ticking a Ready game does this implicitly.
    pub fn start(&mut self) -> bool {
        if self.state.phase != Phase::Ready {
            return false;
        }
        self.state.phase = Phase::Running;
        true
    }

    /// Request a turn for the next tick.
    ///
    /// A reversal relative to the direction the snake last moved in is
    /// ignored. Among accepted requests between two ticks the latest wins.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state.snake.direction.is_opposite(direction) {
            return false;
        }
        self.pending = Some(direction);
        true
    }

    /// Advance the game by one step
    pub fn tick(&mut self) -> TickResult {
        match self.state.phase {
            Phase::GameOver => return TickResult::new(TickOutcome::Idle),
            Phase::Ready => self.state.phase = Phase::Running,
            Phase::Running => {}
        }

        if let Some(direction) = self.pending.take() {
            self.state.snake.direction = direction;
        }

        let new_head = self
            .state
            .snake
            .head()
            .moved_in_direction(self.state.snake.direction);

        if let Some(kind) = self.check_collision(new_head) {
            return self.end_game(kind);
        }

        let ate_food = new_head == self.state.food;
        self.state.snake.advance(new_head, ate_food);

        let mut speed_changed = false;
        if ate_food {
            self.state.score += self.config.food_reward;
            if let Some(food) = self.generate_food() {
                self.state.food = food;
            }
            speed_changed = self.accelerate();
            debug!(
                "food eaten: score={} length={} speed={}ms",
                self.state.score,
                self.state.snake.len(),
                self.state.speed
            );
        }

        TickResult {
            outcome: TickOutcome::Ok,
            ate_food,
            speed_changed,
        }
    }

    /// Wall first, then the pre-move body. The tail cell counts as occupied
    /// even though it is about to be vacated.
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !self.state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if self.state.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn end_game(&mut self, kind: CollisionType) -> TickResult {
        self.state.phase = Phase::GameOver;
        self.state.collision = Some(kind);
        self.pending = None;
        debug!(
            "game over: reason={} score={}",
            kind.reason(),
            self.state.score
        );
        TickResult::new(TickOutcome::Collision(kind))
    }

    fn accelerate(&mut self) -> bool {
        if !self
            .config
            .speed_policy
            .accelerates(self.config.difficulty)
        {
            return false;
        }
        let target = self
            .state
            .speed
            .saturating_sub(self.config.speed_step_ms)
            .max(self.config.min_speed_ms);
        self.set_speed(target)
    }

    /// Pick a cell for the next food according to the placement policy.
    ///
    /// Returns `None` when the snake covers every cell.
    pub fn generate_food(&mut self) -> Option<Position> {
        spawn_food(&self.state, self.config.food_placement, &mut self.rng)
    }

    /// Force the food onto a given cell
    pub fn place_food(&mut self, pos: Position) {
        self.state.food = pos;
    }

    /// Set the tick period in milliseconds, clamped to the configured floor.
    ///
    /// Returns whether the period actually changed.
    pub fn set_speed(&mut self, speed_ms: u64) -> bool {
        let speed = speed_ms.max(self.config.min_speed_ms);
        let changed = speed != self.state.speed;
        self.state.speed = speed;
        changed
    }

    /// Switch difficulty without disturbing the game in flight.
    ///
    /// The new difficulty's base speed replaces the current period.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        self.config.difficulty = difficulty;
        self.set_speed(difficulty.base_speed_ms())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// Milliseconds per tick
    pub fn speed(&self) -> u64 {
        self.state.speed
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.state.speed)
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Why the last game ended, if it has
    pub fn collision(&self) -> Option<CollisionType> {
        self.state.collision
    }
}

fn initial_state(config: &GameConfig, rng: &mut StdRng) -> GameState {
    let snake = Snake::new(config.start, Direction::Right);
    let mut state = GameState::new(
        snake,
        config.start,
        config.grid_width,
        config.grid_height,
        config.difficulty.base_speed_ms(),
    );
    if let Some(food) = spawn_food(&state, config.food_placement, rng) {
        state.food = food;
    }
    state
}

/// Random draws tried before enumerating every free cell
const FOOD_SAMPLE_ATTEMPTS: usize = 32;

fn spawn_food(state: &GameState, placement: FoodPlacement, rng: &mut StdRng) -> Option<Position> {
    if state.grid_width == 0 || state.grid_height == 0 {
        return None;
    }
    match placement {
        FoodPlacement::FreeCell => {
            // Rejected draws keep the pick uniform over free cells. Crowded
            // boards fall through to the full scan.
            for _ in 0..FOOD_SAMPLE_ATTEMPTS {
                let pos = random_cell(state, rng);
                if !state.snake.occupies(pos) {
                    return Some(pos);
                }
            }
            state.free_cells().choose(rng).copied()
        }
        FoodPlacement::Unchecked => Some(random_cell(state, rng)),
    }
}

fn random_cell(state: &GameState, rng: &mut StdRng) -> Position {
    let x = rng.gen_range(0..state.grid_width) as i32;
    let y = rng.gen_range(0..state.grid_height) as i32;
    Position::new(x, y)
}
