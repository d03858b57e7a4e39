use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::game::{
    GridConfig, GridSimulation, SessionState, StepResult, TickScheduler, TickStrategy,
};
use crate::input::{InputHandler, KeyAction, SwipeTracker};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, SessionInfo, Theme};
use crate::storage::ScoreStore;
use crate::variant::Variant;

/// Redraw period for fixed-rate variants (about 30 FPS)
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Frame period for frame-gated variants (about 60 FPS)
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Everything chosen at startup
pub struct PlaySettings {
    pub variant: Variant,
    pub config: GridConfig,
    pub board_label: String,
    pub speed_label: String,
    pub seed: Option<u64>,
}

pub struct PlayMode {
    sim: GridSimulation,
    scheduler: TickScheduler,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    swipes: SwipeTracker,
    store: Box<dyn ScoreStore>,
    info: SessionInfo,
    /// Origin for frame timestamps
    started: Instant,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(settings: PlaySettings, store: Box<dyn ScoreStore>) -> Result<Self> {
        let sim = match settings.seed {
            Some(seed) => GridSimulation::with_seed(settings.config, seed),
            None => GridSimulation::new(settings.config),
        }
        .context("Invalid game configuration")?;

        let record = store.load().unwrap_or_else(|err| {
            warn!(%err, "could not load saved scores, starting from zero");
            Default::default()
        });

        let strategy = settings.variant.tick_strategy();
        let info = SessionInfo {
            title: settings.variant.title(),
            board: settings.board_label,
            speed: settings.speed_label,
            ticking: strategy.as_str(),
        };

        Ok(Self {
            scheduler: TickScheduler::for_config(strategy, sim.config()),
            sim,
            metrics: GameMetrics::with_record(record),
            renderer: Renderer::new(Theme::for_variant(settings.variant)),
            input_handler: InputHandler::new(),
            swipes: SwipeTracker::new(),
            store,
            info,
            started: Instant::now(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
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

        // Repeating timer for fixed-rate variants; idles otherwise
        let mut tick_timer = interval(self.scheduler.interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let render_interval = match self.scheduler.strategy() {
            TickStrategy::FixedRate => RENDER_INTERVAL,
            TickStrategy::FrameGated => FRAME_INTERVAL,
        };
        let mut render_timer = interval(render_interval);

        info!(
            strategy = self.scheduler.strategy().as_str(),
            tick_ms = self.scheduler.interval().as_millis() as u64,
            "game loop started"
        );

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        if self.handle_event(event) {
                            tick_timer.reset();
                        }
                    }
                }

                // Fixed-rate game logic tick
                _ = tick_timer.tick() => {
                    if let Some(result) = self.scheduler.on_timer(&mut self.sim) {
                        self.after_step(&result);
                    }
                }

                // Render frame; frame-gated variants tick from here
                _ = render_timer.tick() => {
                    let now = self.started.elapsed();
                    if let Some(result) = self.scheduler.on_frame(&mut self.sim, now) {
                        self.after_step(&result);
                    }

                    self.metrics.update();
                    let snapshot = self.sim.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics, &self.info);
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

        Ok(())
    }

    /// Returns true when a new session was booted
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return false;
                }
                let action = self.input_handler.handle_key_event(key);
                self.apply_action(action)
            }
            Event::Mouse(mouse) => {
                if let Some(direction) = self.swipes.handle_mouse_event(mouse) {
                    self.sim.push_direction(direction);
                }
                false
            }
            _ => false,
        }
    }

    fn apply_action(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Turn(direction) => {
                self.sim.push_direction(direction);
            }
            KeyAction::Confirm => match self.sim.state() {
                SessionState::Menu | SessionState::Ended(_) => {
                    self.start_session();
                    return true;
                }
                SessionState::Active | SessionState::Paused => self.toggle_pause(),
            },
            KeyAction::TogglePause => self.toggle_pause(),
            // Retry only from the end screen
            KeyAction::Restart => {
                if self.sim.state().is_ended() {
                    self.start_session();
                    return true;
                }
            }
            KeyAction::Menu => {
                if self.sim.return_to_menu() {
                    self.metrics.stop_clock_at(Instant::now());
                }
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
        false
    }

    fn toggle_pause(&mut self) {
        let now = Instant::now();
        match self.sim.toggle_pause() {
            SessionState::Paused => self.metrics.stop_clock_at(now),
            SessionState::Active => self.metrics.resume_clock_at(now),
            _ => {}
        }
    }

    fn start_session(&mut self) {
        self.sim.boot();
        self.scheduler.reconfigure(self.sim.config());
        self.metrics.on_game_start();
    }

    fn after_step(&mut self, result: &StepResult) {
        if result.terminated() {
            self.end_session();
        }
    }

    /// Persist the final score; a storage failure costs the record, not the game
    fn end_session(&mut self) {
        let score = self.sim.score();
        self.metrics.on_game_over(score);

        match self.store.record(score) {
            Ok(record) => self.metrics.sync_record(record),
            Err(err) => warn!(%err, score, "failed to save scores"),
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
