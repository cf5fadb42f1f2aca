//! Observability infrastructure for crash reports and debugging.
//!
//! ## Features
//!
//! - **Tracing**: fmt subscriber driven by `RUST_LOG` or the `-v` count
//! - **Panic Hook**: structured crash reports with analysis context
//! - **Context Tracking**: thread-local phase, platform and comment tracking
//! - **Progress Tracking**: atomic counters for batch progress
//!
//! ```ignore
//! use sentimap::observability::{set_phase, AnalysisPhase};
//!
//! let _phase = set_phase(AnalysisPhase::Classification);
//! // a crash here reports the classification phase
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use context::{
    enter_guarded, get_current_context, get_progress, increment_processed, set_comment_index,
    set_phase, set_platform, set_progress, AnalysisContext, AnalysisPhase, ContextGuard,
};
pub use panic_hook::{extract_panic_message, install_panic_hook};
pub use self::tracing::init_tracing;
