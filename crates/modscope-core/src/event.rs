//! Raw lifecycle events and their classification into typed transitions.

use serde::{Deserialize, Serialize};

use crate::key::ModuleKey;
use crate::state::ModuleState;

/// Raw lifecycle event codes as delivered by the host runtime.
pub mod codes {
    /// Module was installed.
    pub const INSTALLED: u32 = 0x001;
    /// Module was started.
    pub const STARTED: u32 = 0x002;
    /// Module was stopped.
    pub const STOPPED: u32 = 0x004;
    /// Module was updated in place.
    pub const UPDATED: u32 = 0x008;
    /// Module was uninstalled.
    pub const UNINSTALLED: u32 = 0x010;
    /// Module was resolved.
    pub const RESOLVED: u32 = 0x020;
    /// Module was unresolved.
    pub const UNRESOLVED: u32 = 0x040;
    /// Module is about to start.
    pub const STARTING: u32 = 0x080;
    /// Module is about to stop.
    pub const STOPPING: u32 = 0x100;
    /// Module declared lazy activation and is awaiting its trigger.
    pub const LAZY_ACTIVATION: u32 = 0x200;
}

/// A lifecycle event exactly as the host delivers it: the module identity
/// plus the raw event and state codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawModuleEvent {
    /// Identity of the module the event is about.
    pub key: ModuleKey,
    /// Raw lifecycle event code (see [`codes`]).
    pub event_code: u32,
    /// Raw module state code after the event (see [`crate::state::codes`]).
    pub state_code: u32,
}

impl RawModuleEvent {
    /// Convenience constructor.
    pub fn new(key: ModuleKey, event_code: u32, state_code: u32) -> Self {
        Self {
            key,
            event_code,
            state_code,
        }
    }
}

/// The kind of a classified lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionKind {
    /// Module entered the installed state.
    Installed,
    /// Module finished starting.
    Started,
    /// Module finished stopping.
    Stopped,
    /// Module was updated in place.
    Updated,
    /// Module was uninstalled.
    Uninstalled,
    /// Module was resolved.
    Resolved,
    /// Module lost its resolution.
    Unresolved,
    /// Module began starting.
    Starting,
    /// Module began stopping.
    Stopping,
    /// Module is awaiting lazy activation.
    LazyActivation,
    /// The host reported an event code this crate does not know.
    Unknown,
}

impl TransitionKind {
    /// Classify a raw event code.
    pub fn from_raw(code: u32) -> Self {
        match code {
            codes::INSTALLED => TransitionKind::Installed,
            codes::STARTED => TransitionKind::Started,
            codes::STOPPED => TransitionKind::Stopped,
            codes::UPDATED => TransitionKind::Updated,
            codes::UNINSTALLED => TransitionKind::Uninstalled,
            codes::RESOLVED => TransitionKind::Resolved,
            codes::UNRESOLVED => TransitionKind::Unresolved,
            codes::STARTING => TransitionKind::Starting,
            codes::STOPPING => TransitionKind::Stopping,
            codes::LAZY_ACTIVATION => TransitionKind::LazyActivation,
            _ => TransitionKind::Unknown,
        }
    }

    /// Upper-case report vocabulary for this transition.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Installed => "INSTALLED",
            TransitionKind::Started => "STARTED",
            TransitionKind::Stopped => "STOPPED",
            TransitionKind::Updated => "UPDATED",
            TransitionKind::Uninstalled => "UNINSTALLED",
            TransitionKind::Resolved => "RESOLVED",
            TransitionKind::Unresolved => "UNRESOLVED",
            TransitionKind::Starting => "STARTING",
            TransitionKind::Stopping => "STOPPING",
            TransitionKind::LazyActivation => "LAZY_ACTIVATION",
            TransitionKind::Unknown => "UNDEFINED",
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw event normalized into typed form.
///
/// Classification is a pure, total mapping: every raw event yields a
/// transition, with unrecognized codes mapped to the `Unknown` variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// What happened.
    pub kind: TransitionKind,
    /// The module's state after the event.
    pub state: ModuleState,
    /// Which module it happened to.
    pub key: ModuleKey,
}

impl Transition {
    /// Classify a raw event into a typed transition.
    pub fn classify(event: &RawModuleEvent) -> Self {
        Self {
            kind: TransitionKind::from_raw(event.event_code),
            state: ModuleState::from_raw(event.state_code),
            key: event.key.clone(),
        }
    }
}
