/// Messaging module
///
/// Broadcasts swapper notifications to observers.
///
/// ```text
/// ┌─────────────┐    SwapperEvent    ┌───────────┐    ┌───────────────┐
/// │ SoundSwapper│ ─────────────────> │ Event Bus │ ─> │ Subscribers   │
/// │ SoundCache  │                    │           │    │ (overlay, CLI)│
/// └─────────────┘                    └───────────┘    └───────────────┘
/// ```

pub mod bus;
pub mod events;

// Re-export commonly used types
pub use bus::{EventBus, SubscriberId};
pub use events::SwapperEvent;
