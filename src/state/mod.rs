/// State management module
///
/// Per-category rule snapshots and the swapper's lifecycle.

pub mod category;
pub mod lifecycle;

// Re-export commonly used types
pub use category::{CategoryState, RuleSnapshot};
pub use lifecycle::{Lifecycle, LifecycleState, TransitionError};
