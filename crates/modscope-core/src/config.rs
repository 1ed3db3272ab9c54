//! Configuration types for the Modscope tracker.
//!
//! This module provides configuration structures for customizing how the
//! tracker derives metrics: the transitive classpath expansion policy, the
//! same-key reinstall policy, and the resource suffixes counted by the
//! classpath sizer.

use serde::{Deserialize, Serialize};

/// How transitive classpath size is expanded over the wiring graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitivePolicy {
    /// Direct size plus the direct size of every module reachable via
    /// exactly one wiring edge. Providers' own wires are not followed.
    #[default]
    OneHop,
    /// Fixpoint over the wiring graph: providers' own wires are followed
    /// until no new module is reached. Cycle-safe.
    FullClosure,
}

/// What happens to the install timestamp when a module with an
/// already-tracked key is installed again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReinstallPolicy {
    /// Reset the install timestamp and invalidate the previous latency.
    /// Latency then measures the new lifecycle, not the stale one.
    #[default]
    ResetTimer,
    /// Keep the original install timestamp from the first lifecycle.
    KeepOriginal,
}

/// Configuration for the module tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TrackerConfig {
    /// Transitive classpath expansion policy.
    pub transitive_policy: TransitivePolicy,

    /// Same-key reinstall policy.
    pub reinstall_policy: ReinstallPolicy,

    /// Suffix of resource entries counted as classes.
    ///
    /// Defaults to `.class`.
    pub class_suffix: String,

    /// Suffix of resource entries treated as nested archives.
    ///
    /// Defaults to `.jar`.
    pub archive_suffix: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            transitive_policy: TransitivePolicy::OneHop,
            reinstall_policy: ReinstallPolicy::ResetTimer,
            class_suffix: ".class".to_string(),
            archive_suffix: ".jar".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transitive classpath expansion policy.
    pub fn with_transitive_policy(mut self, policy: TransitivePolicy) -> Self {
        self.transitive_policy = policy;
        self
    }

    /// Set the same-key reinstall policy.
    pub fn with_reinstall_policy(mut self, policy: ReinstallPolicy) -> Self {
        self.reinstall_policy = policy;
        self
    }

    /// Set the class resource suffix.
    pub fn with_class_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.class_suffix = suffix.into();
        self
    }

    /// Set the nested archive suffix.
    pub fn with_archive_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.archive_suffix = suffix.into();
        self
    }
}
