//! Lock-step replication of one game through the shared space.
//!
//! Local input never changes the committed state directly. A drop is
//! evaluated speculatively, published, and input stays locked until a change
//! notification for the game key comes back. Whatever that notification
//! carries is adopted as the new committed state, whether it is this client's
//! own echo or another client's write.
//!
//! There is no timeout: if no notification ever arrives the client stays
//! locked. A malformed notification does not unlock either.

use tracing::{debug, info, warn};

use crate::error::{PayloadError, StoreError};
use crate::game::{GameOutcome, GameState, MoveError, Player};
use crate::sync::store::{SpaceEvent, SpaceEvents, SpaceStore, StoreKey};
use crate::sync::wire;

/// A published, not yet confirmed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveProposal {
    /// Dropped column, `None` for a reset.
    pub column: Option<usize>,
    pub player: Player,
    pub state: GameState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPhase {
    /// Input accepted.
    Idle,
    /// A proposal is out; input is locked until the game key changes.
    AwaitingEcho(MoveProposal),
}

/// Result of a user request. None of these are errors: anything but
/// `Published` leaves the coordinator exactly as it was, except
/// `PublishFailed`, which stays locked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Published,
    /// The write was refused by the service. Input stays locked; there is no
    /// retry.
    PublishFailed(StoreError),
    /// A proposal is already in flight.
    Locked,
    Rejected(MoveError),
}

/// How an adopted state related to what this client was waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adoption {
    /// Read from the snapshot when the service became ready.
    Snapshot,
    /// Notification arrived while idle.
    Remote,
    /// Notification matched the outstanding proposal.
    OwnEcho,
    /// Notification carried some other state while a proposal was out.
    Superseded,
}

#[derive(Debug)]
pub enum EventOutcome {
    Adopted(Adoption),
    /// Not for this game, or nothing to read.
    Ignored,
    /// Payload could not be decoded; committed state and lock are unchanged.
    Malformed(PayloadError),
}

/// Owns the committed state and the input lock for one game instance.
#[derive(Debug)]
pub struct Coordinator<S> {
    store: S,
    key: StoreKey,
    committed: GameState,
    phase: SyncPhase,
}

impl<S: SpaceStore> Coordinator<S> {
    pub fn new(store: S, key: StoreKey) -> Self {
        Coordinator {
            store,
            key,
            committed: GameState::initial(),
            phase: SyncPhase::Idle,
        }
    }

    pub fn key(&self) -> &StoreKey {
        &self.key
    }

    /// The last adopted state. This is what should be presented.
    pub fn state(&self) -> &GameState {
        &self.committed
    }

    pub fn phase(&self) -> &SyncPhase {
        &self.phase
    }

    pub fn is_input_locked(&self) -> bool {
        matches!(self.phase, SyncPhase::AwaitingEcho(_))
    }

    pub fn pending_proposal(&self) -> Option<&MoveProposal> {
        match &self.phase {
            SyncPhase::AwaitingEcho(proposal) => Some(proposal),
            SyncPhase::Idle => None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Propose dropping the current player's piece in `column`.
    pub fn request_drop(&mut self, column: usize) -> RequestOutcome {
        if self.is_input_locked() {
            debug!(key = %self.key, column, "input locked, drop ignored");
            return RequestOutcome::Locked;
        }

        match self.committed.drop_column(column) {
            Ok(next) => self.publish(MoveProposal {
                column: Some(column),
                player: self.committed.current_turn(),
                state: next,
            }),
            Err(e) => {
                debug!(key = %self.key, column, reason = ?e, "drop rejected");
                RequestOutcome::Rejected(e)
            }
        }
    }

    /// Propose a fresh game. Only accepted while idle.
    pub fn request_reset(&mut self) -> RequestOutcome {
        if self.is_input_locked() {
            debug!(key = %self.key, "input locked, reset ignored");
            return RequestOutcome::Locked;
        }

        self.publish(MoveProposal {
            column: None,
            player: self.committed.current_turn(),
            state: GameState::new_game(),
        })
    }

    fn publish(&mut self, proposal: MoveProposal) -> RequestOutcome {
        let payload = wire::encode(&proposal.state);
        let column = proposal.column;
        self.phase = SyncPhase::AwaitingEcho(proposal);

        match self.store.set_property(self.key.as_str(), payload) {
            Ok(()) => {
                info!(key = %self.key, ?column, "proposal published, input locked");
                RequestOutcome::Published
            }
            Err(e) => {
                warn!(key = %self.key, ?column, error = %e, "publish failed, input stays locked");
                RequestOutcome::PublishFailed(e)
            }
        }
    }

    /// Adopt the store's current value for this key, if any. The lock is left
    /// as it is.
    pub fn adopt_snapshot(&mut self) -> EventOutcome {
        match self.store.get_property(self.key.as_str()) {
            Some(text) => self.adopt(&text, true),
            None => {
                debug!(key = %self.key, "no snapshot for game key");
                EventOutcome::Ignored
            }
        }
    }

    /// React to one event from the space state service.
    pub fn handle_event(&mut self, event: SpaceEvent) -> EventOutcome {
        match event {
            SpaceEvent::Ready => self.adopt_snapshot(),
            SpaceEvent::StateChanged { changes } => {
                let Some(change) = changes
                    .into_iter()
                    .rev()
                    .find(|c| c.key == self.key.as_str())
                else {
                    return EventOutcome::Ignored;
                };
                if change.value.is_empty() {
                    debug!(key = %self.key, "empty value for game key, ignored");
                    return EventOutcome::Ignored;
                }
                self.adopt(&change.value, false)
            }
        }
    }

    fn adopt(&mut self, text: &str, from_snapshot: bool) -> EventOutcome {
        let state = match wire::decode(text) {
            Ok(state) => state.reconstruct_derived(),
            Err(e) => {
                warn!(
                    key = %self.key,
                    error = %e,
                    locked = self.is_input_locked(),
                    "malformed game payload, keeping committed state"
                );
                return EventOutcome::Malformed(e);
            }
        };

        if let Some(GameOutcome::Winner(player)) = state.outcome() {
            if state.winning_line().is_empty() {
                warn!(key = %self.key, winner = player.name(), "adopted win has no four-in-a-row on board");
            }
        }

        let adoption = if from_snapshot {
            Adoption::Snapshot
        } else {
            match std::mem::replace(&mut self.phase, SyncPhase::Idle) {
                SyncPhase::Idle => Adoption::Remote,
                SyncPhase::AwaitingEcho(proposal) if proposal.state == state => Adoption::OwnEcho,
                SyncPhase::AwaitingEcho(_) => Adoption::Superseded,
            }
        };

        self.committed = state;
        info!(
            key = %self.key,
            ?adoption,
            turn = self.committed.current_turn().name(),
            outcome = ?self.committed.outcome(),
            "state adopted"
        );
        EventOutcome::Adopted(adoption)
    }
}

impl<S: SpaceStore + SpaceEvents> Coordinator<S> {
    /// Handle the next queued event, if any.
    pub fn pump_one(&mut self) -> Option<EventOutcome> {
        let event = self.store.next_event()?;
        Some(self.handle_event(event))
    }

    /// Handle every queued event.
    pub fn pump(&mut self) -> Vec<EventOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.pump_one() {
            outcomes.push(outcome);
        }
        outcomes
    }
}
