//! Interface to the external space state service: a replicated key/value
//! property store that echoes every write back to all clients.

use crate::error::StoreError;

/// Default prefix for game keys.
pub const DEFAULT_KEY_PREFIX: &str = "connect4_game_";

/// Shared-space key for one game instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey(String);

impl StoreKey {
    /// Derive the key for a deployment instance identifier. Anything from the
    /// first `?` on is dropped so that query parameters do not split a game.
    pub fn for_instance(prefix: &str, instance: &str) -> Self {
        let base = instance.split('?').next().unwrap_or_default();
        StoreKey(format!("{prefix}{base}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One changed property inside a change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChange {
    pub key: String,
    pub value: String,
}

/// Events delivered by the space state service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpaceEvent {
    /// The service is connected and its snapshot can be read.
    Ready,
    /// One or more properties changed. Delivered to every client, the writer
    /// included, with no ordering guarantee across keys.
    StateChanged { changes: Vec<PropertyChange> },
}

/// Writes and snapshot reads against the shared space.
pub trait SpaceStore {
    /// Best-effort broadcast of a property value. Success means the write was
    /// handed to the service, not that any client has seen it.
    fn set_property(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    /// Current snapshot value of a property, if any.
    fn get_property(&self, key: &str) -> Option<String>;
}

/// Source of asynchronous space events for one client.
pub trait SpaceEvents {
    /// Next queued event, or `None` if nothing has arrived yet.
    fn next_event(&mut self) -> Option<SpaceEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_strips_query() {
        let key = StoreKey::for_instance(DEFAULT_KEY_PREFIX, "https://example.org/room?seat=2&x=1");
        assert_eq!(key.as_str(), "connect4_game_https://example.org/room");
    }

    #[test]
    fn test_key_without_query() {
        let key = StoreKey::for_instance("c4_", "lobby");
        assert_eq!(key.to_string(), "c4_lobby");
    }

    #[test]
    fn test_distinct_instances_get_distinct_keys() {
        let a = StoreKey::for_instance(DEFAULT_KEY_PREFIX, "room-a");
        let b = StoreKey::for_instance(DEFAULT_KEY_PREFIX, "room-b");
        assert_ne!(a, b);
    }
}
