use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

// Receives the write's version with the snapshot taken at that version.
type Subscriber<T> = Arc<dyn Fn(u64, &T) + Send + Sync>;

struct Subscribers<T> {
    next_id: usize,
    entries: Vec<(usize, Subscriber<T>)>,
}

impl<T> Subscribers<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

/// State plus the number of writes applied to it.
struct Versioned<T> {
    version: u64,
    value: T,
}

// Poisoned locks are recovered: the guarded data is plain state.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// A thread-safe store for managing application state.
///
/// Every write through [`Store::set`] or [`Store::update`] notifies the
/// subscribers with a snapshot of the new state. Subscribers run after the
/// write lock is released, so they may read the store or write to it again.
///
/// Each write is numbered under the write lock. When writers on different
/// threads race, a subscriber never receives a snapshot older than one it
/// has already been given.
pub struct Store<T> {
    state: Arc<RwLock<Versioned<T>>>,
    subscribers: Arc<RwLock<Subscribers<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    /// Create a new store with the given initial state.
    pub fn new(initial: T) -> Self {
        Self {
            state: Arc::new(RwLock::new(Versioned {
                version: 0,
                value: initial,
            })),
            subscribers: Arc::new(RwLock::new(Subscribers::new())),
        }
    }

    /// Get a clone of the current state.
    pub fn get(&self) -> T {
        read_lock(&self.state).value.clone()
    }

    /// Read state without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let state = read_lock(&self.state);
        f(&state.value)
    }

    /// Number of writes applied since creation.
    pub fn version(&self) -> u64 {
        read_lock(&self.state).version
    }

    /// Update the state using a function.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.write(f);
    }

    /// Set a new state value.
    pub fn set(&self, new_state: T) {
        self.write(|state| *state = new_state);
    }

    /// Subscribe to state changes.
    ///
    /// The callback is called after every write, skipping any snapshot
    /// older than one it already received. It stays registered until the
    /// returned [`Subscription`] is dropped or unsubscribed.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let delivered = AtomicU64::new(0);
        self.subscribe_versioned(move |version, state| {
            if delivered.fetch_max(version, Ordering::SeqCst) < version {
                callback(state);
            }
        })
    }

    /// Watch one projection of the state.
    ///
    /// `callback` runs immediately with the current projection, then again
    /// only when a newer write changes the projected value.
    pub fn watch<U, S, F>(&self, selector: S, callback: F) -> Subscription
    where
        U: Clone + PartialEq + Send + 'static,
        S: Fn(&T) -> U + Send + Sync + 'static,
        F: Fn(U) + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);
        let notify = Arc::clone(&callback);

        // Registered under the read lock, so no write lands between the
        // initial projection and the first delivery.
        let (initial, subscription) = {
            let state = read_lock(&self.state);
            let initial = selector(&state.value);
            let last = Mutex::new((state.version, initial.clone()));

            let subscription = self.subscribe_versioned(move |version, state| {
                let mut last = last.lock().unwrap_or_else(PoisonError::into_inner);
                if version <= last.0 {
                    return;
                }
                last.0 = version;

                let next = selector(state);
                if last.1 != next {
                    last.1 = next.clone();
                    drop(last);
                    notify(next);
                }
            });
            (initial, subscription)
        };

        callback(initial);
        subscription
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        read_lock(&self.subscribers).entries.len()
    }

    fn subscribe_versioned<F>(&self, callback: F) -> Subscription
    where
        F: Fn(u64, &T) + Send + Sync + 'static,
    {
        let id = {
            let mut subscribers = write_lock(&self.subscribers);
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers.entries.push((id, Arc::new(callback)));
            id
        };

        let subscribers: Weak<RwLock<Subscribers<T>>> = Arc::downgrade(&self.subscribers);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(subscribers) = subscribers.upgrade() {
                    write_lock(&subscribers)
                        .entries
                        .retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    /// Apply a write, then notify all subscribers of the state change.
    fn write<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let (version, snapshot, subscribers) = {
            let mut state = write_lock(&self.state);
            f(&mut state.value);
            state.version += 1;

            let subscribers: Vec<Subscriber<T>> = read_lock(&self.subscribers)
                .entries
                .iter()
                .map(|(_, subscriber)| Arc::clone(subscriber))
                .collect();
            if subscribers.is_empty() {
                return;
            }
            // Snapshot and version are taken under the same lock.
            (state.version, state.value.clone(), subscribers)
        };

        for subscriber in subscribers {
            subscriber(version, &snapshot);
        }
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

/// RAII guard for a store subscriber.
#[must_use = "dropping a Subscription unsubscribes its callback"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Remove the callback now.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Keep the callback registered for as long as the store lives.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}
