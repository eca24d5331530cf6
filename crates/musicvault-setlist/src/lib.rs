//! Karyakram setlists: the ordered program of bandishes for one event.
//!
//! [`Setlist`] is the loaded, ordered view of an event's items.
//! [`SetlistEditor`] mutates it optimistically and pushes the change to the
//! persistence gateway. [`PerformanceNavigator`] steps through a frozen copy
//! one item at a time on stage.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod editor;
pub mod error;
pub mod model;
pub mod navigator;

pub use editor::{Direction, PendingAppend, PendingRemove, SetlistEditor, SwapOutcome};
pub use error::{Result, SetlistError};
pub use model::{Composition, Freshness, ItemIdentity, Setlist, SetlistItem};
pub use navigator::{PerformanceNavigator, Progress, Upcoming};
