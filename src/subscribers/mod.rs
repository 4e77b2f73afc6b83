//! Event subscribers: the presentation and logging collaborators.
//!
//! Subscribers receive every runtime [`Event`](crate::Event) from the
//! supervisor's bus listener. They are read-only with respect to the core:
//! a subscriber never mutates shared state.
//!
//! ## Contents
//! - [`Subscribe`] — the subscriber capability
//! - [`LogWriter`] — structured log sink for every event
//! - [`StatusPanel`] — stdout panel for status dumps and alarm banners

mod log;
mod panel;
mod subscribe;

pub use log::LogWriter;
pub use panel::StatusPanel;
pub use subscribe::Subscribe;
