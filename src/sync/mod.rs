//! Replication of a game through an external key/value space: the wire
//! payload, the store interface, an in-process store, and the lock-step
//! coordinator.

pub mod coordinator;
pub mod local;
pub mod store;
pub mod wire;

pub use coordinator::{Adoption, Coordinator, EventOutcome, MoveProposal, RequestOutcome, SyncPhase};
pub use local::{LocalSpace, SpaceClient};
pub use store::{PropertyChange, SpaceEvent, SpaceEvents, SpaceStore, StoreKey, DEFAULT_KEY_PREFIX};
