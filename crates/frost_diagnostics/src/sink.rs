//! Collects diagnostics from loaders that may run on several threads.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A thread-safe diagnostic collector.
///
/// Emitting only needs `&self`. Per-severity totals are kept in atomics and
/// survive [`take_all`](Self::take_all), so a caller can render and drain
/// the messages and still ask afterwards whether anything failed.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    pending: Mutex<Vec<Diagnostic>>,
    totals: [AtomicUsize; 3],
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn pending(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.totals[diag.severity.index()].fetch_add(1, Ordering::Relaxed);
        self.pending().push(diag);
    }

    /// Number of diagnostics of `severity` emitted so far.
    pub fn count(&self, severity: Severity) -> usize {
        self.totals[severity.index()].load(Ordering::Relaxed)
    }

    /// Number of errors emitted so far.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Returns `true` once any error has been emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// The most severe level emitted so far.
    pub fn worst(&self) -> Option<Severity> {
        Severity::ALL
            .into_iter()
            .rev()
            .find(|&s| self.count(s) > 0)
    }

    /// Removes and returns the pending diagnostics, in emission order.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.pending())
    }

    /// A copy of the pending diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.pending().clone()
    }
}
