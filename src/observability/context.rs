//! Thread-local context tracking for crash reports and fault logs.
//!
//! Provides context information about the current analysis phase and the
//! comment being processed. Uses thread-local storage for per-thread context
//! (works with rayon parallel iterators) and atomic counters for global
//! progress.
//!
//! ## Thread Safety
//!
//! - Thread-local context: Each thread has its own context (via `thread_local!`)
//! - Global progress: Atomic counters for comments processed/total
//! - Context guards use RAII for automatic cleanup on drop

use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

static COMMENTS_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static COMMENTS_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<AnalysisContext> =
        const { RefCell::new(AnalysisContext::new()) };
}

/// Context snapshot for the current analysis operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisContext {
    pub phase: Option<AnalysisPhase>,
    /// Platform of the batch being analyzed
    pub platform: Option<String>,
    /// Batch position of the comment being classified
    pub comment_index: Option<usize>,
    /// Panics here are caught and reported by the caller, not the panic hook
    pub guarded: bool,
}

impl AnalysisContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            platform: None,
            comment_index: None,
            guarded: false,
        }
    }
}

/// Major stages of one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    /// Pulling comments from a source
    Fetching,
    /// Calling the classifier and resolving labels
    Classification,
    /// Partitioning records by label
    Indexing,
    /// Counting labels and committing the history entry
    Aggregation,
    /// Writing reports
    OutputGeneration,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetching => write!(f, "fetching"),
            Self::Classification => write!(f, "classification"),
            Self::Indexing => write!(f, "indexing"),
            Self::Aggregation => write!(f, "aggregation"),
            Self::OutputGeneration => write!(f, "output_generation"),
        }
    }
}

/// RAII guard for restoring analysis context on drop.
///
/// While the thread is unwinding the context is left as it was at the
/// panic, so the catch site can still report it. The outermost guard that
/// drops normally restores everything.
pub struct ContextGuard {
    previous: AnalysisContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let previous = std::mem::take(&mut self.previous);
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = previous;
        });
    }
}

fn update(apply: impl FnOnce(&mut AnalysisContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

/// Set the current analysis phase until the guard drops.
#[must_use]
pub fn set_phase(phase: AnalysisPhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

#[must_use]
pub fn set_platform(platform: impl Into<String>) -> ContextGuard {
    let platform = platform.into();
    update(|ctx| ctx.platform = Some(platform))
}

#[must_use]
pub fn set_comment_index(index: usize) -> ContextGuard {
    update(|ctx| ctx.comment_index = Some(index))
}

/// Mark the current thread as running inside a `catch_unwind` boundary.
#[must_use]
pub fn enter_guarded() -> ContextGuard {
    update(|ctx| ctx.guarded = true)
}

/// Set the progress counters (processed and total comments).
pub fn set_progress(processed: usize, total: usize) {
    COMMENTS_PROCESSED.store(processed, Ordering::Relaxed);
    COMMENTS_TOTAL.store(total, Ordering::Relaxed);
}

/// Thread-safe; can be called from parallel iterators.
pub fn increment_processed() {
    COMMENTS_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> AnalysisContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Current progress as (processed, total)
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        COMMENTS_PROCESSED.load(Ordering::Relaxed),
        COMMENTS_TOTAL.load(Ordering::Relaxed),
    )
}

/// Reset the current thread's context to empty.
pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = AnalysisContext::new();
    });
}
