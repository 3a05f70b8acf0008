use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// Failure raised by an explicit GPU error check.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum GpuError {
    /// The driver reported one or more errors since the previous check.
    Driver { count: usize, first: String },
    /// A render call arrived before the surface created its resources.
    NotInitialized,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::Driver { count: 1, first } => write!(f, "GPU error: {first}"),
            GpuError::Driver { count, first } => {
                write!(f, "{count} GPU errors, first: {first}")
            }
            GpuError::NotInitialized => f.write_str("render surface used before initialization"),
        }
    }
}

impl std::error::Error for GpuError {}

/// Collects errors the device did not deliver to an error scope.
///
/// wgpu reports validation and out-of-memory errors through an uncaptured-error
/// callback. The sink stores them until the next [`check`](Self::check), which
/// gives render code the "call, then ask the driver" flow of `glGetError`.
///
/// Cloning is cheap; all clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct GpuErrorSink {
    errors: Arc<Mutex<Vec<String>>>,
}

impl GpuErrorSink {
    /// Creates a sink and registers it as the device's uncaptured-error handler.
    ///
    /// Replaces wgpu's default handler, which panics.
    pub fn install(device: &wgpu::Device) -> Self {
        let sink = Self::default();
        let handler = sink.clone();
        device.on_uncaptured_error(Arc::new(move |err: wgpu::Error| {
            log::debug!("wgpu error recorded: {err}");
            handler.record(err.to_string());
        }));
        sink
    }

    /// Appends an error message.
    pub fn record(&self, message: impl Into<String>) {
        self.lock().push(message.into());
    }

    /// Returns `true` when no error is pending.
    pub fn is_clear(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes and returns all pending messages in arrival order.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    /// Clears pending errors, failing if any were reported.
    pub fn check(&self) -> Result<(), GpuError> {
        let mut pending = self.drain();
        if pending.is_empty() {
            return Ok(());
        }
        let count = pending.len();
        Err(GpuError::Driver {
            count,
            first: pending.swap_remove(0),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.errors.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_on_empty_sink_is_ok() {
        let sink = GpuErrorSink::default();
        assert!(sink.check().is_ok());
        assert!(sink.is_clear());
    }

    #[test]
    fn check_reports_once_then_clears() {
        let sink = GpuErrorSink::default();
        sink.record("invalid buffer");

        assert_eq!(
            sink.check(),
            Err(GpuError::Driver { count: 1, first: "invalid buffer".into() })
        );
        assert!(sink.check().is_ok());
    }

    #[test]
    fn check_keeps_first_error_and_count() {
        let sink = GpuErrorSink::default();
        sink.record("first");
        sink.record("second");
        sink.record("third");

        match sink.check() {
            Err(GpuError::Driver { count, first }) => {
                assert_eq!(count, 3);
                assert_eq!(first, "first");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn clones_share_the_buffer() {
        let sink = GpuErrorSink::default();
        let other = sink.clone();
        other.record("from clone");
        assert_eq!(sink.drain(), vec!["from clone".to_string()]);
        assert!(other.is_clear());
    }

    #[test]
    fn display_mentions_count_for_multiple_errors() {
        let err = GpuError::Driver { count: 2, first: "boom".into() };
        assert_eq!(err.to_string(), "2 GPU errors, first: boom");
    }
}
