//! The application loop: [`Model`], [`Driver`], [`Effect`], [`App`].
//!
//! The loop is single-threaded and cooperatively scheduled: the driver
//! polls for input with a frame-length timeout and emits [`Msg::Tick`]
//! when nothing arrives, so the model sees a steady stream of
//! animation-frame callbacks interleaved with input events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use crate::grid::{compute_frame, Frame, Grid};
use crate::messages::Msg;

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A simple cooperative-cancellation token backed by an [`AtomicBool`].
///
/// Cancellation is observed between frames: a batch of work already running
/// inside one frame is never interrupted.
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Signal the application loop to stop.
    End,
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// The application model: state plus update and draw.
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `grid`.
    fn draw(&self, grid: &mut Grid);
}

// ---------------------------------------------------------------------------
// Driver trait
// ---------------------------------------------------------------------------

/// Back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Poll for input, sending messages through `tx`. Should block for at
    /// most one frame interval and send [`Msg::Tick`] when the interval
    /// elapses with no input. The implementation should honour
    /// `ctx.is_done()` and return promptly when it becomes `true`.
    fn poll_msgs(
        &mut self,
        ctx: &Context,
        tx: Sender<Msg>,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Clean up / restore the terminal.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
}

/// The main application runner: poll → update → draw → diff → flush.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
}

impl<M: Model, D: Driver> App<M, D> {
    /// Create a new application from a configuration.
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
        }
    }

    /// Run the main loop.
    ///
    /// 1. Initialises the driver.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Loops: poll → drain messages → update → draw → diff → flush.
    /// 4. Stops when the model returns [`Effect::End`].
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;

        let ctx = Context::new();
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();

        tx.send(Msg::Init).ok();

        let mut prev_grid = Grid::new(self.width, self.height);
        let mut curr_grid = Grid::new(self.width, self.height);
        // Force a full first paint.
        prev_grid.resize(0, 0);

        // Process the Init message before the first poll.
        self.process_pending(&rx, &ctx, &mut prev_grid, &mut curr_grid)?;

        while !ctx.is_done() {
            match self.driver.poll_msgs(&ctx, tx.clone()) {
                Ok(()) => {}
                Err(e) => {
                    ctx.cancel();
                    self.driver.close();
                    return Err(e);
                }
            }

            if ctx.is_done() {
                break;
            }

            self.process_pending(&rx, &ctx, &mut prev_grid, &mut curr_grid)?;
        }

        self.driver.close();
        Ok(())
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        ctx: &Context,
        prev_grid: &mut Grid,
        curr_grid: &mut Grid,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut needs_draw = false;

        while let Ok(msg) = rx.try_recv() {
            // A resize re-buffers the frame grids; the stale previous frame
            // is discarded so the next flush repaints everything.
            if let Msg::Screen { width, height, .. } = msg {
                self.width = width;
                self.height = height;
                curr_grid.resize(width, height);
                prev_grid.resize(0, 0);
            }

            if let Some(Effect::End) = self.model.update(msg) {
                ctx.cancel();
                return Ok(());
            }
            needs_draw = true;
        }

        if needs_draw {
            self.model.draw(curr_grid);
            let frame = compute_frame(prev_grid, curr_grid);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            prev_grid.copy_from(curr_grid);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_cancels_once() {
        let ctx = Context::new();
        assert!(!ctx.is_done());
        ctx.cancel();
        assert!(ctx.is_done());
        // Cancelling a clone is visible through the original.
        let ctx2 = ctx.clone();
        assert!(ctx2.is_done());
    }
}
