//! The subscriber capability.

use async_trait::async_trait;

use crate::events::Event;

/// Receives runtime events from the supervisor's bus listener.
///
/// Implementations must be cheap per event; the listener awaits each
/// subscriber in turn. They must never mutate shared state.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use coachvisor::{Event, EventKind, Subscribe};
///
/// struct AlarmCounter;
///
/// #[async_trait]
/// impl Subscribe for AlarmCounter {
///     async fn on_event(&self, ev: &Event) {
///         if ev.kind == EventKind::FireAlert {
///             // count, export a metric, ...
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one runtime event.
    async fn on_event(&self, event: &Event);
}
