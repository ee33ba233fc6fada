//! Interactive play in the terminal.
//!
//! `PlayMode` owns the engine and its collaborators: the tick scheduler, the
//! renderer, the input handler and the key-value store behind the theme and
//! the leaderboard.
//!
//! # Controls
//!
//! - Arrows/WASD: turn
//! - Space/Enter: start, or restart after game over
//! - 1/2/3 or C: pick difficulty
//! - T: toggle light/dark theme
//! - Q/Esc: quit

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::{info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{Difficulty, GameEngine, Phase, TickResult};
use crate::input::{InputHandler, KeyAction, PromptAction};
use crate::metrics::SessionStats;
use crate::persistence::{
    KeyValueStore, Leaderboard, LeaderboardEntry, MAX_NAME_LEN, Theme, load_theme, save_theme,
};
use crate::render::{Renderer, View};
use crate::scheduler::TickScheduler;

/// Render at 30 FPS (33ms per frame)
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

pub struct PlayMode<S: KeyValueStore> {
    engine: GameEngine,
    store: S,
    leaderboard: Leaderboard,
    theme: Theme,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    /// Name being typed for a qualifying score
    name_prompt: Option<String>,
    should_quit: bool,
}

impl<S: KeyValueStore> PlayMode<S> {
    pub fn new(engine: GameEngine, store: S) -> Self {
        let leaderboard = Leaderboard::load(&store);
        let theme = load_theme(&store);
        let stats = SessionStats::new(leaderboard.best_score().unwrap_or(0));

        info!(
            "session start: {}x{} grid, {} entries on the leaderboard, {} theme",
            engine.config().grid_width,
            engine.config().grid_height,
            leaderboard.len(),
            theme.as_str()
        );

        Self {
            engine,
            store,
            leaderboard,
            theme,
            stats,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            name_prompt: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut scheduler = TickScheduler::new(self.engine.tick_period());
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event, &mut scheduler),
                        Some(Err(err)) => warn!("terminal event error: {err}"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = scheduler.tick() => {
                    self.on_tick(&mut scheduler);
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.stats.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.view());
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!("session end after {} games", self.stats.games_played);
        Ok(())
    }

    fn view(&self) -> View<'_> {
        View {
            state: self.engine.state(),
            difficulty: self.engine.difficulty(),
            stats: &self.stats,
            leaderboard: self.leaderboard.top(),
            theme: self.theme,
            name_prompt: self.name_prompt.as_deref(),
        }
    }

    fn handle_event(&mut self, event: Event, scheduler: &mut TickScheduler) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }
            self.handle_key(key, scheduler);
        }
    }

    fn handle_key(&mut self, key: KeyEvent, scheduler: &mut TickScheduler) {
        if self.name_prompt.is_some() {
            let action = self.input_handler.handle_prompt_key(key);
            self.handle_prompt_action(action, scheduler);
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(direction) => {
                self.engine.set_direction(direction);
            }
            KeyAction::Start => self.start_game(scheduler),
            KeyAction::ToggleTheme => self.toggle_theme(),
            KeyAction::SetDifficulty(difficulty) => self.change_difficulty(difficulty, scheduler),
            KeyAction::CycleDifficulty => {
                let next = self.engine.difficulty().next();
                self.change_difficulty(next, scheduler);
            }
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn start_game(&mut self, scheduler: &mut TickScheduler) {
        match self.engine.phase() {
            Phase::Running => return,
            Phase::GameOver => {
                let difficulty = self.engine.difficulty();
                self.engine.reset(difficulty);
            }
            Phase::Ready => {}
        }
        self.engine.start();
        self.stats.on_game_start();
        scheduler.set_period(self.engine.tick_period());
        scheduler.restart();
        info!(
            "game start: difficulty={} speed={}ms",
            self.engine.difficulty().label(),
            self.engine.speed()
        );
    }

    fn on_tick(&mut self, scheduler: &mut TickScheduler) {
        if self.engine.phase() != Phase::Running {
            return;
        }

        let result = self.engine.tick();
        self.stats.on_tick(&result);

        if result.speed_changed {
            scheduler.set_period(self.engine.tick_period());
        }
        if result.collision().is_some() {
            self.on_game_over(&result, scheduler);
        }
    }

    fn on_game_over(&mut self, result: &TickResult, scheduler: &mut TickScheduler) {
        let score = self.engine.state().score;
        self.stats.on_game_over(score);
        info!(
            "game over: reason={} score={} length={}",
            result.collision().map(|kind| kind.reason()).unwrap_or("-"),
            score,
            self.engine.state().snake.len()
        );

        if self.leaderboard.qualifies(score) {
            self.name_prompt = Some(String::new());
            scheduler.pause();
        }
    }

    fn handle_prompt_action(&mut self, action: PromptAction, scheduler: &mut TickScheduler) {
        let Some(name) = self.name_prompt.as_mut() else {
            return;
        };

        match action {
            PromptAction::Push(c) => {
                if name.chars().count() < MAX_NAME_LEN {
                    name.push(c);
                }
            }
            PromptAction::Backspace => {
                name.pop();
            }
            PromptAction::Submit => {
                let name = std::mem::take(name);
                self.record_score(&name);
                self.close_prompt(scheduler);
            }
            PromptAction::Skip => self.close_prompt(scheduler),
            PromptAction::Quit => {
                self.close_prompt(scheduler);
                self.should_quit = true;
            }
            PromptAction::None => {}
        }
    }

    fn close_prompt(&mut self, scheduler: &mut TickScheduler) {
        self.name_prompt = None;
        scheduler.resume();
    }

    fn record_score(&mut self, name: &str) {
        let entry = LeaderboardEntry::new(
            name,
            self.engine.state().score,
            self.engine.difficulty(),
        );
        info!("leaderboard entry: {} {}", entry.name, entry.score);

        if self.leaderboard.insert(entry).is_some() {
            if let Err(err) = self.leaderboard.save(&mut self.store) {
                warn!("failed to save leaderboard: {err:#}");
            }
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(err) = save_theme(&mut self.store, self.theme) {
            warn!("failed to save theme: {err:#}");
        }
    }

    fn change_difficulty(&mut self, difficulty: Difficulty, scheduler: &mut TickScheduler) {
        if difficulty == self.engine.difficulty() {
            return;
        }
        self.engine.set_difficulty(difficulty);
        scheduler.set_period(self.engine.tick_period());
        info!("difficulty set to {}", difficulty.label());
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
