//! Module lifecycle states.

use serde::{Deserialize, Serialize};

/// Raw state codes as reported by the host runtime.
///
/// These are bit flags; a host may combine them into a mask when expressing
/// which states it tracks.
pub mod codes {
    /// Module is uninstalled.
    pub const UNINSTALLED: u32 = 0x01;
    /// Module is installed but not yet resolved.
    pub const INSTALLED: u32 = 0x02;
    /// Module dependencies are satisfied and a code-loading context exists.
    pub const RESOLVED: u32 = 0x04;
    /// Module is in the process of starting.
    pub const STARTING: u32 = 0x08;
    /// Module is in the process of stopping.
    pub const STOPPING: u32 = 0x10;
    /// Module is running.
    pub const ACTIVE: u32 = 0x20;
}

/// Typed module state.
///
/// Unknown raw codes classify as [`ModuleState::Unknown`] rather than
/// failing; the tracker must keep going on states it cannot interpret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleState {
    /// Module is uninstalled.
    Uninstalled,
    /// Module is installed but not yet resolved.
    #[default]
    Installed,
    /// Module is resolved.
    Resolved,
    /// Module is starting.
    Starting,
    /// Module is stopping.
    Stopping,
    /// Module is running.
    Active,
    /// The host reported a state code this crate does not know.
    Unknown,
}

impl ModuleState {
    /// Classify a raw state code.
    pub fn from_raw(code: u32) -> Self {
        match code {
            codes::UNINSTALLED => ModuleState::Uninstalled,
            codes::INSTALLED => ModuleState::Installed,
            codes::RESOLVED => ModuleState::Resolved,
            codes::STARTING => ModuleState::Starting,
            codes::STOPPING => ModuleState::Stopping,
            codes::ACTIVE => ModuleState::Active,
            _ => ModuleState::Unknown,
        }
    }

    /// Upper-case report vocabulary for this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleState::Uninstalled => "UNINSTALLED",
            ModuleState::Installed => "INSTALLED",
            ModuleState::Resolved => "RESOLVED",
            ModuleState::Starting => "STARTING",
            ModuleState::Stopping => "STOPPING",
            ModuleState::Active => "ACTIVE",
            ModuleState::Unknown => "UNDEFINED",
        }
    }
}

impl std::fmt::Display for ModuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
