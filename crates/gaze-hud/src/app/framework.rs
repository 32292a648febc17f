//! Application framework for the terminal HUD

use std::io;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{Event as CrosstermEvent, EventStream},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::input::{Action, HeadPose, InputEvent, InputSimulator};
use crate::renderer::{terminal::TerminalBackend, RenderBackend, RenderError};

/// Timing and pose handed to [`OpticalApp::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInfo {
    /// Ticks completed before this one
    pub count: u64,
    /// Time since the runner started
    pub time: Duration,
    /// Time since the previous tick
    pub delta_time: Duration,
    /// Simulated head pose
    pub head: HeadPose,
}

/// Application driven by [`OpticalAppRunner`]
pub trait OpticalApp {
    /// Application state type
    type State;

    /// Initialize application state
    fn init(&mut self) -> Self::State;

    /// Handle an input event, return true to continue, false to quit
    fn handle_event(&mut self, event: InputEvent, state: &mut Self::State) -> bool;

    /// Advance the application by one tick
    fn update(&mut self, state: &mut Self::State, tick: &TickInfo);

    /// Draw the current state
    fn render(&self, state: &Self::State, backend: &mut dyn RenderBackend);
}

/// Raw mode and the alternate screen, restored on drop
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self, RenderError> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Runs an [`OpticalApp`] in the terminal on a fixed tick
pub struct OpticalAppRunner<A: OpticalApp> {
    app: A,
    backend: TerminalBackend,
    input_simulator: InputSimulator,
    tick_rate: Duration,
    ticks: u64,
}

impl<A: OpticalApp> OpticalAppRunner<A> {
    pub fn new(app: A, input_simulator: InputSimulator) -> Result<Self, RenderError> {
        Ok(Self {
            app,
            backend: TerminalBackend::new()?,
            input_simulator,
            tick_rate: Duration::from_millis(50),
            ticks: 0,
        })
    }

    /// Set tick rate
    pub fn with_tick_rate(mut self, rate: Duration) -> Self {
        self.tick_rate = rate.max(Duration::from_millis(1));
        self
    }

    /// Run until the app or the user asks to quit.
    ///
    /// Must be polled inside a tokio runtime with the time driver enabled.
    pub async fn run(&mut self) -> Result<(), RenderError> {
        let _guard = TerminalGuard::enter()?;

        let mut state = self.app.init();
        let mut events = EventStream::new();
        let mut interval = time::interval(self.tick_rate);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let started = Instant::now();
        let mut last_tick = started;
        info!("HUD running at {} ms per tick", self.tick_rate.as_millis());

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let now = Instant::now();
                    let tick = TickInfo {
                        count: self.ticks,
                        time: now - started,
                        delta_time: now - last_tick,
                        head: self.input_simulator.head_pose(),
                    };
                    last_tick = now;

                    self.app.update(&mut state, &tick);
                    self.ticks += 1;

                    self.backend.set_camera(tick.head.transform());
                    self.backend.begin_frame()?;
                    self.app.render(&state, &mut self.backend);
                    self.backend.end_frame()?;
                }
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) => {
                            if !self.dispatch(key, &mut state) {
                                break;
                            }
                        }
                        // Resizes are picked up by the backend at the next frame
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e.into()),
                        None => {
                            debug!("Terminal event stream closed");
                            break;
                        }
                    }
                }
            }
        }

        info!("HUD stopped after {} ticks", self.ticks);
        Ok(())
    }

    /// Feed a key through the simulator, false once quitting
    fn dispatch(&mut self, key: crossterm::event::KeyEvent, state: &mut A::State) -> bool {
        for event in self.input_simulator.process_key(key) {
            let quit = event.action() == Some(Action::Quit);
            if !self.app.handle_event(event, state) || quit {
                return false;
            }
        }
        true
    }
}
