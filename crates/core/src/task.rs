//! Unit of periodic work

use anyhow::Result;

/// One monitor's per-tick work, driven on a fixed interval by the scheduler
///
/// The scheduler moves the task onto a blocking thread for each tick, so
/// `tick` may block (scans, sampling windows, file appends). State kept in
/// the task between ticks is owned by its loop alone.
pub trait PollTask: Send + 'static {
    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Run one tick
    ///
    /// Recoverable failures are handled (and logged) inside the task.
    /// Returning an error stops this task's loop.
    fn tick(&mut self) -> Result<()>;
}
