use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::services::event_entry_service::EventEntryForm;
use crate::services::notifier::FlashMessages;
use crate::services::team_entry_service::TeamEntryForm;

/// Per-browser state. Lives in memory only and is dropped after being idle.
/// Each entry page drains its own notice queue.
#[derive(Debug, Default)]
pub struct PortalSession {
    pub team_entry: TeamEntryForm,
    pub team_flash: FlashMessages,
    pub event_entry: EventEntryForm,
    pub event_flash: FlashMessages,
}

impl PortalSession {
    pub fn abandon_team_submission(&mut self) {
        self.team_entry.abandon_submission(&mut self.team_flash);
    }

    pub fn abandon_event_submission(&mut self) {
        self.event_entry.abandon_submission(&mut self.event_flash);
    }
}

pub type SessionHandle = Arc<tokio::sync::Mutex<PortalSession>>;

/// Held by a handler while a submission runs with the session unlocked.
/// Dropped without [`InFlight::settle`] (the client went away mid-call), it
/// runs `abandon` so the form does not stay stuck in its submitting state.
pub struct InFlight {
    handle: Option<SessionHandle>,
    abandon: fn(&mut PortalSession),
}

impl InFlight {
    pub fn new(handle: SessionHandle, abandon: fn(&mut PortalSession)) -> Self {
        Self {
            handle: Some(handle),
            abandon,
        }
    }

    /// The outcome has been recorded on the session.
    pub fn settle(mut self) {
        self.handle = None;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let abandon = self.abandon;
        if let Ok(mut session) = handle.try_lock() {
            abandon(&mut session);
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    let mut session = handle.lock().await;
                    abandon(&mut session);
                });
            }
            Err(_) => warn!("submission dropped outside the runtime; session left as is"),
        }
    }
}

struct Slot {
    handle: SessionHandle,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Returns the session for `id`, or a fresh one (with a new id) when the
    /// id is unknown or expired. The flag is true for fresh sessions.
    pub fn get_or_create(&self, id: Option<&str>) -> (String, SessionHandle, bool) {
        let now = Instant::now();
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(id) = id {
            if let Some(slot) = slots.get_mut(id) {
                if now.duration_since(slot.last_seen) <= self.idle_timeout {
                    slot.last_seen = now;
                    return (id.to_string(), slot.handle.clone(), false);
                }
            }
        }

        let before = slots.len();
        let idle_timeout = self.idle_timeout;
        slots.retain(|_, slot| now.duration_since(slot.last_seen) <= idle_timeout);
        if slots.len() != before {
            debug!(pruned = before - slots.len(), "idle sessions dropped");
        }

        let id = Uuid::new_v4().to_string();
        let handle = SessionHandle::default();
        slots.insert(
            id.clone(),
            Slot {
                handle: handle.clone(),
                last_seen: now,
            },
        );
        (id, handle, true)
    }

    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifier::Notifier;

    #[test]
    fn known_id_returns_same_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (id, first, created) = store.get_or_create(None);
        assert!(created);
        let (same_id, second, created) = store.get_or_create(Some(&id));
        assert!(!created);
        assert_eq!(id, same_id);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_id_gets_a_fresh_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let (id, _, created) = store.get_or_create(Some("forged"));
        assert!(created);
        assert_ne!(id, "forged");
    }

    #[test]
    fn expired_sessions_are_replaced_and_pruned() {
        let store = SessionStore::new(Duration::ZERO);
        let (old, _, _) = store.get_or_create(None);
        std::thread::sleep(Duration::from_millis(5));
        let (new, _, created) = store.get_or_create(Some(&old));
        assert!(created);
        assert_ne!(old, new);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn dropped_in_flight_guard_abandons_the_submission() {
        let handle = SessionHandle::default();
        let guard = InFlight::new(handle.clone(), |s| {
            s.team_flash.error("gone");
        });
        drop(guard);
        assert_eq!(handle.lock().await.team_flash.take().len(), 1);

        let guard = InFlight::new(handle.clone(), |s| {
            s.team_flash.error("gone");
        });
        guard.settle();
        assert!(handle.lock().await.team_flash.take().is_empty());
    }

    #[tokio::test]
    async fn guard_dropped_while_session_is_locked_defers_the_reset() {
        let handle = SessionHandle::default();
        let locked = handle.lock().await;
        drop(InFlight::new(handle.clone(), |s| s.event_flash.error("gone")));
        drop(locked);

        // The deferred reset queues behind the lock we just released.
        let mut taken = Vec::new();
        for _ in 0..10 {
            taken = handle.lock().await.event_flash.take();
            if !taken.is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(taken.len(), 1);
    }
}
