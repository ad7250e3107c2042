//! Session store: who is signed in, and who wants to know.
//!
//! The store holds at most one current [`Identity`]. Listeners registered
//! with [`SessionStore::subscribe`] receive the current state once at
//! registration and then once per mutation, synchronously and in
//! registration order. Tasks that would rather await changes can use
//! [`SessionStore::watch`].
//!
//! Mutations are serialized by an async lock held across "update state and
//! notify", so two sign-ins never interleave their notifications. The
//! registry lock is released before listeners run; a listener may read the
//! session or register another subscription without deadlocking.
//!
//! Every mutation bumps a version. Each listener remembers the last version
//! it was handed and is called under its own lock, so a replay racing a
//! mutation on another thread is either delivered first or dropped as stale.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::watch;

use crate::record::Identity;

/// Callback invoked with the current identity, or `None` when signed out.
pub type Listener = Arc<dyn Fn(Option<&Identity>) + Send + Sync>;

struct Entry {
    id: u64,
    callback: Listener,
    /// Version of the last state handed to `callback`.
    delivered: Mutex<Option<u64>>,
}

impl Entry {
    /// Call the listener unless it already saw `version` or something newer.
    fn deliver(&self, version: u64, identity: Option<&Identity>) -> bool {
        let mut delivered = self.delivered.lock().unwrap_or_else(PoisonError::into_inner);
        if delivered.is_some_and(|seen| seen >= version) {
            return false;
        }
        (self.callback)(identity);
        *delivered = Some(version);
        true
    }
}

#[derive(Default)]
struct Registry {
    current: Option<Identity>,
    version: u64,
    listeners: Vec<Arc<Entry>>,
    next_id: u64,
}

struct Shared {
    registry: Mutex<Registry>,
    mutation: tokio::sync::Mutex<()>,
    watch_tx: watch::Sender<Option<Identity>>,
}

impl Shared {
    fn registry(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `identity` and notify. Callers hold the mutation lock.
    fn commit(&self, identity: Option<Identity>) {
        let (version, listeners) = {
            let mut registry = self.registry();
            registry.current = identity.clone();
            registry.version += 1;
            (registry.version, registry.listeners.clone())
        };

        tracing::debug!(
            user_id = identity.as_ref().map(|i| i.id.as_str()),
            version,
            listeners = listeners.len(),
            "Session changed"
        );

        for entry in &listeners {
            entry.deliver(version, identity.as_ref());
        }
        self.watch_tx.send_replace(identity);
    }
}

/// Process-wide session state plus its observer registry.
///
/// Cloning is cheap; clones share the same session.
#[derive(Clone)]
pub struct SessionStore {
    shared: Arc<Shared>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.shared.registry();
        f.debug_struct("SessionStore")
            .field("current", &registry.current)
            .field("listeners", &registry.listeners.len())
            .finish()
    }
}

impl SessionStore {
    /// Create a signed-out session store.
    pub fn new() -> Self {
        let (watch_tx, _) = watch::channel(None);
        Self {
            shared: Arc::new(Shared {
                registry: Mutex::new(Registry::default()),
                mutation: tokio::sync::Mutex::new(()),
                watch_tx,
            }),
        }
    }

    /// The signed-in identity, if any.
    pub fn current(&self) -> Option<Identity> {
        self.shared.registry().current.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.shared.registry().current.is_some()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.shared.registry().listeners.len()
    }

    /// Register `listener` and immediately call it with the current state.
    ///
    /// The returned handle removes the listener when
    /// [`Subscription::unsubscribe`] is called. Dropping the handle leaves the
    /// listener registered.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<&Identity>) + Send + Sync + 'static,
    {
        let (entry, version, snapshot) = {
            let mut registry = self.shared.registry();
            let entry = Arc::new(Entry {
                id: registry.next_id,
                callback: Arc::new(listener),
                delivered: Mutex::new(None),
            });
            registry.next_id += 1;
            registry.listeners.push(Arc::clone(&entry));
            (entry, registry.version, registry.current.clone())
        };
        let id = entry.id;

        if entry.deliver(version, snapshot.as_ref()) {
            tracing::trace!(subscription = id, version, "Session listener registered");
        } else {
            tracing::trace!(
                subscription = id,
                version,
                "Session listener registered, replay superseded"
            );
        }

        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Receiver that always holds the latest session state.
    pub fn watch(&self) -> watch::Receiver<Option<Identity>> {
        self.shared.watch_tx.subscribe()
    }

    /// Replace the session state and notify every listener.
    pub(crate) async fn set(&self, identity: Option<Identity>) {
        let _guard = self.shared.mutation.lock().await;
        self.shared.commit(identity);
    }

    /// Replace the identity only while `user_id` is still the one signed in.
    ///
    /// Returns `false`, leaving the session and listeners untouched, when the
    /// session was cleared or switched to another user.
    pub(crate) async fn replace_if_current(&self, user_id: &str, identity: Identity) -> bool {
        let _guard = self.shared.mutation.lock().await;
        let still_current = self
            .shared
            .registry()
            .current
            .as_ref()
            .is_some_and(|c| c.id == user_id);
        if still_current {
            self.shared.commit(Some(identity));
        }
        still_current
    }
}

/// Handle for one registered listener.
#[must_use = "dropping a Subscription keeps the listener registered; call unsubscribe() to remove it"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    shared: Weak<Shared>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the listener. Returns `false` if the store is gone or the
    /// listener was already removed.
    pub fn unsubscribe(self) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        let mut registry = shared.registry();
        let before = registry.listeners.len();
        registry.listeners.retain(|entry| entry.id != self.id);
        let removed = registry.listeners.len() != before;
        if removed {
            tracing::trace!(subscription = self.id, "Session listener removed");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Arc<Mutex<Vec<Option<String>>>>;

    fn recorder(log: &Log, tag: &'static str) -> impl Fn(Option<&Identity>) + Send + Sync {
        let log = Arc::clone(log);
        move |identity| {
            log.lock()
                .unwrap()
                .push(identity.map(|i| format!("{tag}:{}", i.id)));
        }
    }

    fn identity(id: &str) -> Identity {
        Identity {
            id: id.into(),
            email: format!("{id}@x.com"),
            display_name: id.to_uppercase(),
        }
    }

    #[tokio::test]
    async fn test_replay_on_subscribe() {
        let store = SessionStore::new();
        let log: Log = Arc::default();

        let _sub = store.subscribe(recorder(&log, "a"));
        assert_eq!(*log.lock().unwrap(), vec![None]);

        store.set(Some(identity("u1"))).await;
        let _late = store.subscribe(recorder(&log, "b"));
        assert_eq!(
            *log.lock().unwrap(),
            vec![None, Some("a:u1".into()), Some("b:u1".into())]
        );
    }

    #[tokio::test]
    async fn test_delivery_in_registration_order() {
        let store = SessionStore::new();
        let log: Log = Arc::default();
        let _a = store.subscribe(recorder(&log, "a"));
        let _b = store.subscribe(recorder(&log, "b"));
        log.lock().unwrap().clear();

        store.set(Some(identity("u1"))).await;
        store.set(None).await;

        assert_eq!(
            *log.lock().unwrap(),
            vec![Some("a:u1".into()), Some("b:u1".into()), None, None]
        );
    }

    #[tokio::test]
    async fn test_unsubscribe_is_independent() {
        let store = SessionStore::new();
        let log: Log = Arc::default();
        let a = store.subscribe(recorder(&log, "a"));
        let _b = store.subscribe(recorder(&log, "b"));
        assert_eq!(store.subscriber_count(), 2);

        assert!(a.unsubscribe());
        log.lock().unwrap().clear();

        store.set(Some(identity("u2"))).await;
        assert_eq!(*log.lock().unwrap(), vec![Some("b:u2".into())]);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_listener_may_read_and_subscribe() {
        let store = SessionStore::new();
        let seen: Log = Arc::default();
        let inner = store.clone();
        let seen_in = Arc::clone(&seen);

        let _sub = store.subscribe(move |identity| {
            if identity.is_some() {
                let current = inner.current().map(|i| i.id);
                seen_in.lock().unwrap().push(current);
                let _nested = inner.subscribe(|_| {});
            }
        });

        store.set(Some(identity("u1"))).await;
        assert_eq!(*seen.lock().unwrap(), vec![Some("u1".to_string())]);
        assert_eq!(store.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_watch_sees_latest_state() {
        let store = SessionStore::new();
        let mut rx = store.watch();
        assert!(rx.borrow().is_none());

        store.set(Some(identity("u1"))).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().map(|i| i.id.clone()), Some("u1".into()));
    }

    #[tokio::test]
    async fn test_replace_if_current() {
        let store = SessionStore::new();
        let log: Log = Arc::default();
        let _sub = store.subscribe(recorder(&log, "a"));

        assert!(!store.replace_if_current("u1", identity("u1")).await);
        assert!(store.current().is_none());

        store.set(Some(identity("u2"))).await;
        assert!(!store.replace_if_current("u1", identity("u1")).await);
        assert!(store.replace_if_current("u2", identity("u2")).await);

        assert_eq!(store.current().map(|i| i.id), Some("u2".into()));
        assert_eq!(
            *log.lock().unwrap(),
            vec![None, Some("a:u2".into()), Some("a:u2".into())]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_replay_never_overwrites_newer_state() {
        use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
        use std::time::Duration;

        let store = SessionStore::new();
        let log: Log = Arc::default();
        let started = Arc::new(AtomicBool::new(false));

        let subscriber = {
            let store = store.clone();
            let log = Arc::clone(&log);
            let started = Arc::clone(&started);
            std::thread::spawn(move || {
                let calls = AtomicUsize::new(0);
                store.subscribe(move |identity| {
                    if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                        started.store(true, Ordering::SeqCst);
                        std::thread::sleep(Duration::from_millis(300));
                    }
                    log.lock().unwrap().push(identity.map(|i| i.id.clone()));
                })
            })
        };

        while !started.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        store.set(Some(identity("u1"))).await;
        let _sub = subscriber.join().unwrap();

        assert_eq!(store.current().map(|i| i.id), Some("u1".into()));
        assert_eq!(*log.lock().unwrap(), vec![None, Some("u1".into())]);
    }

    #[tokio::test]
    async fn test_unsubscribe_after_store_dropped() {
        let store = SessionStore::new();
        let sub = store.subscribe(|_| {});
        drop(store);
        assert!(!sub.unsubscribe());
    }
}
