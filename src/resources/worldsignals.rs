//! Global signal storage resource.
//!
//! The [`WorldSignals`] resource provides a world-wide signal map for
//! cross-system communication. The choreography driver publishes its progress
//! here and the main loop watches it to know when to stop.
//!
//! Flags raised by the engine:
//! - `"choreography_done"` – the root sequence reached its end
//! - `"choreography_error"` – a step failed; the message is in the
//!   `"choreography_error"` string signal
//! - `"quit_game"` – the headless loop should stop

use bevy_ecs::prelude::Resource;
use rustc_hash::{FxHashMap, FxHashSet};

/// Global signal storage for cross-system communication.
#[derive(Debug, Clone, Default, Resource)]
pub struct WorldSignals {
    /// String signals addressed by string keys.
    pub strings: FxHashMap<String, String>,
    /// Presence-only boolean flags; a key being present means "true".
    pub flags: FxHashSet<String>,
}

impl WorldSignals {
    /// Set a string signal value.
    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }
    /// Get a string signal by key.
    pub fn get_string(&self, key: &str) -> Option<&String> {
        self.strings.get(key)
    }
    /// Mark a flag as present/true.
    pub fn set_flag(&mut self, key: impl Into<String>) {
        self.flags.insert(key.into());
    }
    /// Check whether a flag is present/true.
    pub fn has_flag(&self, key: &str) -> bool {
        self.flags.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_presence_only() {
        let mut signals = WorldSignals::default();
        assert!(!signals.has_flag("quit_game"));
        signals.set_flag("quit_game");
        signals.set_flag("quit_game");
        assert!(signals.has_flag("quit_game"));
        assert_eq!(signals.flags.len(), 1);
    }

    #[test]
    fn test_strings_and_flags_share_keys_independently() {
        let mut signals = WorldSignals::default();
        signals.set_string("choreography_error", "step failed");
        assert!(!signals.has_flag("choreography_error"));
        assert_eq!(
            signals.get_string("choreography_error").map(String::as_str),
            Some("step failed")
        );
        signals.set_flag("choreography_error");
        assert!(signals.has_flag("choreography_error"));
        assert!(signals.get_string("quit_game").is_none());
    }
}
