//! Progress notification seam

/// Single presentation capability used by the reconciler.
///
/// How a message reaches the operator (stdout, a log file, a test
/// buffer) is the implementor's business; the passes never format or
/// route output themselves.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier that drops everything. For callers that only want the
/// reports.
#[derive(Debug, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _message: &str) {}
}
