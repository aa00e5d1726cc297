//! Recurring task tracking and reset scheduling.
//!
//! ```text
//!   ClockProvider ──► reset (next boundary per schedule)
//!                         │
//!   CounterProvider ──► registry ──► task (config + data)
//!   HuntReference  ───────┘              ├─ compare (threshold rules)
//!                                        └─ hunt (weekly / compound marks)
//! ```

pub mod compare;
pub mod config;
pub mod hunt;
pub mod providers;
pub mod registry;
pub mod reset;
pub mod task;

// Re-exports for convenience
pub use compare::{TaskStatus, evaluate};
pub use config::{ConfigError, DutyConfig};
pub use hunt::{HuntReferenceTable, TrackedMarkConfig, WeeklyHuntState};
pub use providers::{ClockProvider, ClockSnapshot, CounterProvider, CounterSnapshot, HuntReference};
pub use registry::{RegistryError, TaskRegistry, TickReport, TrackedTask};
pub use reset::{ResetError, ResetSchedule};
pub use task::{TaskConfig, TaskData, TaskKindConfig, TaskRecord};
