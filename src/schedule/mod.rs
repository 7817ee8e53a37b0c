// src/schedule/mod.rs

//! Recurrence policies and window resolution.
//!
//! - [`policy`] holds the immutable recurrence rule of a program.
//! - [`window`] is a concrete `[start, stop]` interval on the wall clock.
//! - [`resolver`] turns `(now, policy)` into the next window that has not
//!   fully elapsed.

pub mod policy;
pub mod resolver;
pub mod window;

pub use policy::{RecurrenceClass, RecurrencePolicy};
pub use resolver::{days_ahead, resolve};
pub use window::{Window, DISPLAY_FORMAT};
