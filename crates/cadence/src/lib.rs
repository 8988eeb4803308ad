//! # Cadence
//!
//! Tick-driven timer substrate for cooperative game loops.
//!
//! Cadence provides the two pieces a host loop needs to drive time-based
//! gameplay without threads:
//!
//! - **[`GameClock`]**: a monotonic game-time accumulator advanced once per frame
//! - **[`TimerManager`]**: cancellable one-shot and repeating timers keyed by
//!   [`TimerHandle`], popped one expiry at a time so that a callback which
//!   cancels its own timer suppresses every later queued tick
//!
//! Gameplay code depends only on the [`Scheduler`] trait, so it expresses
//! intent (arm, cancel) and never owns timer mechanics.
//!
//! ## Quick Start
//!
//! ```
//! use cadence::{Scheduler, TimerManager, TimerSpec};
//!
//! let mut timers: TimerManager<&str> = TimerManager::new();
//! let handle = timers
//!     .set_timer(TimerSpec::repeating(0.5, 0.0), "fire")
//!     .unwrap();
//!
//! timers.advance(1.0).unwrap();
//!
//! let mut dues = Vec::new();
//! while let Some(expiry) = timers.pop_due() {
//!     assert_eq!(expiry.handle, handle);
//!     dues.push(expiry.due);
//! }
//! assert_eq!(dues, vec![0.0, 0.5, 1.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod error;
pub mod timer;

// Re-exports for convenience
pub use clock::GameClock;
pub use error::{Result, TimerError};
pub use timer::{Expiry, Scheduler, TimerHandle, TimerManager, TimerSpec};
