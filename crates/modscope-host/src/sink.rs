//! The event seam between the host and the tracker.

use modscope_core::RawModuleEvent;

/// Sink for raw lifecycle events.
///
/// The host calls into this interface from its event dispatch mechanism,
/// possibly from several callback threads at once. Implementations must be
/// safe under concurrent invocation and must never panic out of
/// [`on_event`](ModuleEventSink::on_event); an event that cannot be handled
/// is dropped, not raised.
pub trait ModuleEventSink: Send + Sync {
    /// Called for every lifecycle event the host delivers.
    fn on_event(&self, event: &RawModuleEvent);
}
