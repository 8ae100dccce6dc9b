//! Fixed-timestep frame scheduler
//!
//! Decouples wall-clock frame delivery from simulation steps: every update
//! advances simulated time by exactly one fixed tick, and render runs once
//! per displayed frame against the latest settled state (no interpolation).
//!
//! The host frame primitive (requestAnimationFrame in the browser) is
//! abstracted behind [`FrameSource`] so the loop is drivable from tests.

use anyhow::{Result, bail};

/// Opaque handle for a requested frame callback
pub type FrameHandle = i32;

/// Host frame-delivery primitive
///
/// `request_frame` schedules one future delivery; the host is expected to
/// call [`Scheduler::frame`] with the current time in milliseconds when it
/// fires. `cancel_frame` revokes a not-yet-fired request.
pub trait FrameSource {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Per-tick callback bundle. Boxed so the wasm entry can hand in closures
/// over `Rc<RefCell<Game>>` state.
type UpdateFn = Box<dyn FnMut(f32)>;
type RenderFn = Box<dyn FnMut()>;

/// Builder for [`Scheduler`]
///
/// A render callback is mandatory; running the loop without one is a
/// programmer error and fails at `build` rather than producing a scheduler
/// that silently does nothing visible.
pub struct SchedulerBuilder {
    fps: u32,
    ignore_focus: bool,
    update: Option<UpdateFn>,
    render: Option<RenderFn>,
    clear: Option<RenderFn>,
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self {
            fps: crate::consts::SIM_FPS,
            ignore_focus: false,
            update: None,
            render: None,
            clear: None,
        }
    }
}

impl SchedulerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed update rate; the tick size `1 / fps` seconds is immutable after
    /// build
    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Keep updating and rendering while the host window is unfocused
    pub fn ignore_focus(mut self, ignore: bool) -> Self {
        self.ignore_focus = ignore;
        self
    }

    pub fn update(mut self, f: impl FnMut(f32) + 'static) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn render(mut self, f: impl FnMut() + 'static) -> Self {
        self.render = Some(Box::new(f));
        self
    }

    /// Surface-clear hook, run immediately before each render when set
    pub fn clear(mut self, f: impl FnMut() + 'static) -> Self {
        self.clear = Some(Box::new(f));
        self
    }

    pub fn build<F: FrameSource>(self, frames: F) -> Result<Scheduler<F>> {
        let Some(render) = self.render else {
            bail!("scheduler requires a render callback");
        };
        if self.fps == 0 {
            bail!("scheduler fps must be non-zero");
        }
        Ok(Scheduler {
            // Seconds, not milliseconds: 1/60 rounds down in f64, so a
            // 50 ms frame drains exactly 3 ticks with a ~0 remainder
            fixed_delta_secs: 1.0 / self.fps as f64,
            ignore_focus: self.ignore_focus,
            update: self.update.unwrap_or_else(|| Box::new(|_| {})),
            render,
            clear: self.clear,
            frames,
            running: false,
            focused: true,
            pending: None,
            last_time_ms: 0.0,
            accumulator_secs: 0.0,
            step_count: 0,
        })
    }
}

/// The fixed-step loop driver
///
/// States are Stopped and Running. While running, each delivered frame
/// drains the accumulator in fixed-size ticks, then renders once and
/// re-arms the frame source. Oversized deltas (tab suspension) and
/// unfocused frames are skipped whole - timing anomalies heal themselves
/// instead of being reported.
pub struct Scheduler<F: FrameSource> {
    fixed_delta_secs: f64,
    ignore_focus: bool,
    update: UpdateFn,
    render: RenderFn,
    clear: Option<RenderFn>,
    frames: F,
    running: bool,
    focused: bool,
    pending: Option<FrameHandle>,
    last_time_ms: f64,
    accumulator_secs: f64,
    step_count: u64,
}

impl<F: FrameSource> Scheduler<F> {
    /// Start the loop: record `now_ms` as the last-frame timestamp and
    /// request the first frame. No-op if already running.
    pub fn start(&mut self, now_ms: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_time_ms = now_ms;
        self.accumulator_secs = 0.0;
        self.pending = Some(self.frames.request_frame());
        log::info!(
            "scheduler started ({:.3} ms tick)",
            self.fixed_delta_secs * 1000.0
        );
    }

    /// Stop the loop, cancelling any pending frame. Idempotent, and safe to
    /// call from inside `update` or `render`: the current frame finishes
    /// but no further frame executes.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(handle) = self.pending.take() {
            self.frames.cancel_frame(handle);
        }
        log::info!("scheduler stopped after {} steps", self.step_count);
    }

    /// Focus flag, toggled by host focus/blur signals
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Fixed updates executed since construction
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Unconsumed accumulated time in milliseconds
    pub fn accumulator_ms(&self) -> f64 {
        self.accumulator_secs * 1000.0
    }

    /// Deliver one frame at wall-clock time `now_ms`
    ///
    /// Called by the host for each fired frame request. A stale delivery
    /// after `stop` is a no-op.
    pub fn frame(&mut self, now_ms: f64) {
        if !self.running {
            return;
        }
        self.pending = None;

        let dt_ms = now_ms - self.last_time_ms;
        self.last_time_ms = now_ms;

        // Unfocused host: idle this frame entirely so the sim does not
        // teleport when focus returns
        if !self.focused && !self.ignore_focus {
            self.rearm();
            return;
        }

        // Clock jump (suspension, debugger): drop the frame's contribution
        // instead of bursting through a pile of catch-up steps
        if dt_ms > crate::consts::FRAME_GAP_CLAMP_MS {
            log::warn!("dropping {dt_ms:.0} ms frame gap");
            self.rearm();
            return;
        }

        self.accumulator_secs += dt_ms / 1000.0;
        while self.accumulator_secs >= self.fixed_delta_secs {
            (self.update)(self.fixed_delta_secs as f32);
            self.accumulator_secs -= self.fixed_delta_secs;
            self.step_count += 1;
            // stop() inside update takes effect at the frame boundary
            if !self.running {
                return;
            }
        }

        if let Some(clear) = self.clear.as_mut() {
            (clear)();
        }
        (self.render)();

        self.rearm();
    }

    fn rearm(&mut self) {
        if self.running {
            self.pending = Some(self.frames.request_frame());
        }
    }
}
