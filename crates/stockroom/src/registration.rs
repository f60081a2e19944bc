//! Registration state machine and the per-actor session table.
//!
//! ```text
//! Idle --begin--> ChoosingType --choose(Equipment)--> AwaitingEquipmentFields
//!                              --choose(Component)--> AwaitingComponentFields
//! Awaiting*Fields --valid input, committed--> Idle
//! Awaiting*Fields --invalid input--> (unchanged)
//! any --cancel--> Idle
//! ```
//!
//! Idle is both the initial and the terminal state. `begin` from any state
//! starts over.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use stockroom_core::{parse_registration_fields, ActorId, Category, NewItem, ValidationError};
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Where an actor is in the registration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationState {
    #[default]
    Idle,
    ChoosingType,
    AwaitingEquipmentFields,
    AwaitingComponentFields,
}

impl RegistrationState {
    fn awaiting(category: Category) -> Self {
        match category {
            Category::Equipment => RegistrationState::AwaitingEquipmentFields,
            Category::Component => RegistrationState::AwaitingComponentFields,
        }
    }

    /// The category whose fields are being collected, if any.
    pub fn pending_category(self) -> Option<Category> {
        match self {
            RegistrationState::AwaitingEquipmentFields => Some(Category::Equipment),
            RegistrationState::AwaitingComponentFields => Some(Category::Component),
            RegistrationState::Idle | RegistrationState::ChoosingType => None,
        }
    }
}

/// A transition that is not allowed from the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("no category choice is pending (state {0:?})")]
    NotChoosing(RegistrationState),

    #[error("no item fields are expected (state {0:?})")]
    NotAwaitingFields(RegistrationState),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// One actor's registration progress.
#[derive(Debug, Clone)]
pub struct RegistrationSession {
    actor: ActorId,
    state: RegistrationState,
    /// Time of the last transition (Unix ms).
    updated_at: i64,
}

impl RegistrationSession {
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            state: RegistrationState::Idle,
            updated_at: now_millis(),
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    pub fn pending_category(&self) -> Option<Category> {
        self.state.pending_category()
    }

    fn set(&mut self, state: RegistrationState) {
        self.state = state;
        self.updated_at = now_millis();
    }

    /// Start (or restart) a registration.
    pub fn begin(&mut self) {
        self.set(RegistrationState::ChoosingType);
    }

    /// Pick the category of the new item.
    pub fn choose(&mut self, category: Category) -> Result<(), TransitionError> {
        if self.state != RegistrationState::ChoosingType {
            return Err(TransitionError::NotChoosing(self.state));
        }
        self.set(RegistrationState::awaiting(category));
        Ok(())
    }

    /// Validate submitted fields.
    ///
    /// The state is left as is: on failure so the user can retry, on success
    /// until the caller has committed the item and calls [`complete`](Self::complete).
    pub fn submit(&self, input: &str) -> Result<NewItem, TransitionError> {
        let category = self
            .pending_category()
            .ok_or(TransitionError::NotAwaitingFields(self.state))?;
        Ok(parse_registration_fields(category, input)?)
    }

    /// The submitted item was committed.
    pub fn complete(&mut self) {
        self.set(RegistrationState::Idle);
    }

    /// Abandon whatever was in progress.
    pub fn cancel(&mut self) {
        self.set(RegistrationState::Idle);
    }

    /// Whether a non-idle session has sat untouched for longer than `ttl`.
    pub fn is_expired(&self, ttl: Duration, now: i64) -> bool {
        let ttl = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        self.state != RegistrationState::Idle && now.saturating_sub(self.updated_at) > ttl
    }
}

/// Actor id to session, one entry per actor with a registration in progress.
///
/// Holding the guard returned by [`lock`](Self::lock) serializes an actor's
/// messages; other actors are not blocked.
#[derive(Default)]
pub struct SessionTable {
    sessions: Mutex<HashMap<ActorId, Arc<AsyncMutex<RegistrationSession>>>>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to an actor's session, creating it if needed.
    pub async fn lock(&self, actor: ActorId) -> OwnedMutexGuard<RegistrationSession> {
        let slot = {
            let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                sessions
                    .entry(actor)
                    .or_insert_with(|| Arc::new(AsyncMutex::new(RegistrationSession::new(actor)))),
            )
        };
        slot.lock_owned().await
    }

    /// Hand back an actor's session after a message.
    ///
    /// An idle session holds nothing worth keeping, so it leaves the table
    /// unless another message for the same actor is already waiting on it.
    pub fn release(&self, guard: OwnedMutexGuard<RegistrationSession>) {
        let actor = guard.actor();
        let idle = guard.state() == RegistrationState::Idle;
        drop(guard);
        if !idle {
            return;
        }

        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        // Handles are only cloned under the table lock, see `prune`.
        let unused = sessions.get(&actor).is_some_and(|slot| {
            Arc::strong_count(slot) == 1
                && slot
                    .try_lock()
                    .is_ok_and(|session| session.state() == RegistrationState::Idle)
        });
        if unused {
            sessions.remove(&actor);
        }
    }

    /// Current state of an actor's session, without waiting for it.
    ///
    /// `None` if the session is busy handling a message.
    pub fn peek(&self, actor: ActorId) -> Option<RegistrationState> {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let state = match sessions.get(&actor) {
            Some(slot) => slot.try_lock().ok().map(|s| s.state()),
            None => Some(RegistrationState::Idle),
        };
        state
    }

    /// Drop idle sessions and, with a ttl, expired ones. Returns how many were removed.
    ///
    /// Sessions that are locked or awaited are kept.
    pub fn prune(&self, ttl: Option<Duration>) -> usize {
        let now = now_millis();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();

        sessions.retain(|_, slot| {
            // New handles are only cloned under the table lock, so a count of
            // one means nobody is waiting on this slot.
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(session) => {
                    let expired = ttl.is_some_and(|ttl| session.is_expired(ttl, now));
                    session.state() != RegistrationState::Idle && !expired
                }
                Err(_) => true,
            }
        });

        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Get current time in milliseconds.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
