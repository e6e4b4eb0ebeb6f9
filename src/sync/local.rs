//! In-process space state service. Every write is stored and broadcast to all
//! connected clients, the writer included, through per-client channels.
//! Delivery happens when a client drains its queue, so echoes can be held
//! back to observe the input lock.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc;

use crate::error::StoreError;
use crate::sync::store::{PropertyChange, SpaceEvent, SpaceEvents, SpaceStore};

#[derive(Debug)]
struct SpaceInner {
    public: HashMap<String, String>,
    protected: HashMap<String, String>,
    subscribers: Vec<mpsc::Sender<SpaceEvent>>,
    online: bool,
}

impl Default for SpaceInner {
    fn default() -> Self {
        SpaceInner {
            public: HashMap::new(),
            protected: HashMap::new(),
            subscribers: Vec::new(),
            online: true,
        }
    }
}

impl SpaceInner {
    fn broadcast(&mut self, key: &str, value: &str) {
        let event = SpaceEvent::StateChanged {
            changes: vec![PropertyChange {
                key: key.to_string(),
                value: value.to_string(),
            }],
        };
        // Clients that went away are dropped here
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Handle to a shared in-process space. Clones refer to the same space.
#[derive(Debug, Clone, Default)]
pub struct LocalSpace {
    inner: Rc<RefCell<SpaceInner>>,
}

impl LocalSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a new client. Its queue starts with [`SpaceEvent::Ready`].
    pub fn connect(&self) -> SpaceClient {
        let (tx, rx) = mpsc::channel();
        // Receiver is alive, send cannot fail
        let _ = tx.send(SpaceEvent::Ready);
        self.inner.borrow_mut().subscribers.push(tx);
        SpaceClient {
            space: self.clone(),
            events: rx,
        }
    }

    /// Toggle service availability. While offline, writes fail and nothing is
    /// broadcast.
    pub fn set_online(&self, online: bool) {
        self.inner.borrow_mut().online = online;
    }

    pub fn is_online(&self) -> bool {
        self.inner.borrow().online
    }

    /// Write a property in the protected scope and broadcast it.
    pub fn set_protected(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if !inner.online {
            return Err(StoreError::Unavailable);
        }
        inner.broadcast(key, &value);
        inner.protected.insert(key.to_string(), value);
        Ok(())
    }

    fn set_public(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if !inner.online {
            return Err(StoreError::Unavailable);
        }
        inner.broadcast(key, &value);
        inner.public.insert(key.to_string(), value);
        Ok(())
    }

    /// Snapshot lookup: public scope first, then protected. Empty values count
    /// as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        let inner = self.inner.borrow();
        inner
            .public
            .get(key)
            .filter(|v| !v.is_empty())
            .or_else(|| inner.protected.get(key).filter(|v| !v.is_empty()))
            .cloned()
    }

    pub fn client_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

/// One client's connection to a [`LocalSpace`].
#[derive(Debug)]
pub struct SpaceClient {
    space: LocalSpace,
    events: mpsc::Receiver<SpaceEvent>,
}

impl SpaceClient {
    pub fn space(&self) -> &LocalSpace {
        &self.space
    }
}

impl SpaceStore for SpaceClient {
    fn set_property(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.space.set_public(key, value)
    }

    fn get_property(&self, key: &str) -> Option<String> {
        self.space.get(key)
    }
}

impl SpaceEvents for SpaceClient {
    fn next_event(&mut self) -> Option<SpaceEvent> {
        self.events.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_queues_ready() {
        let space = LocalSpace::new();
        let mut client = space.connect();
        assert_eq!(client.next_event(), Some(SpaceEvent::Ready));
        assert_eq!(client.next_event(), None);
        assert_eq!(space.client_count(), 1);
    }

    #[test]
    fn test_write_echoes_to_all_clients() {
        let space = LocalSpace::new();
        let mut writer = space.connect();
        let mut reader = space.connect();
        writer.next_event();
        reader.next_event();

        writer.set_property("k", "v1".to_string()).unwrap();

        let expected = SpaceEvent::StateChanged {
            changes: vec![PropertyChange {
                key: "k".to_string(),
                value: "v1".to_string(),
            }],
        };
        assert_eq!(writer.next_event(), Some(expected.clone()));
        assert_eq!(reader.next_event(), Some(expected));
        assert_eq!(reader.get_property("k"), Some("v1".to_string()));
    }

    #[test]
    fn test_offline_write_fails_silently_for_others() {
        let space = LocalSpace::new();
        let mut writer = space.connect();
        let mut reader = space.connect();
        writer.next_event();
        reader.next_event();

        space.set_online(false);
        assert_eq!(
            writer.set_property("k", "v".to_string()),
            Err(StoreError::Unavailable)
        );
        assert_eq!(reader.next_event(), None);
        assert_eq!(reader.get_property("k"), None);
    }

    #[test]
    fn test_snapshot_falls_back_to_protected() {
        let space = LocalSpace::new();
        space.set_protected("k", "p".to_string()).unwrap();
        assert_eq!(space.get("k"), Some("p".to_string()));

        let mut client = space.connect();
        client.set_property("k", String::new()).unwrap();
        assert_eq!(client.get_property("k"), Some("p".to_string()));

        client.set_property("k", "pub".to_string()).unwrap();
        assert_eq!(client.get_property("k"), Some("pub".to_string()));
    }

    #[test]
    fn test_dropped_client_is_pruned() {
        let space = LocalSpace::new();
        let mut writer = space.connect();
        let reader = space.connect();
        assert_eq!(space.client_count(), 2);

        drop(reader);
        writer.set_property("k", "v".to_string()).unwrap();
        assert_eq!(space.client_count(), 1);
    }
}
