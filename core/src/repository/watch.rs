use std::sync::{Arc, Mutex, Weak};

use tracing::warn;

pub type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Entry<T: ?Sized> {
    id: u64,
    key: String,
    callback: Callback<T>,
}

struct WatchState<T: ?Sized> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

/// Registry of change listeners keyed by owner (user id).
pub struct Watchers<T: ?Sized> {
    inner: Arc<Mutex<WatchState<T>>>,
}

impl<T: ?Sized> Clone for Watchers<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: ?Sized> Default for Watchers<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(WatchState { next_id: 0, entries: Vec::new() })),
        }
    }
}

impl<T: ?Sized + 'static> Watchers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, key: &str, callback: Callback<T>) -> Subscription {
        let id = match self.inner.lock() {
            Ok(mut state) => {
                state.next_id += 1;
                let id = state.next_id;
                state.entries.push(Entry { id, key: key.to_string(), callback });
                id
            }
            Err(_) => {
                warn!("watcher registry poisoned; subscription ignored");
                return Subscription::detached();
            }
        };

        let weak: Weak<Mutex<WatchState<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    if let Ok(mut state) = inner.lock() {
                        state.entries.retain(|e| e.id != id);
                    }
                }
            })),
        }
    }

    /// Calls every listener registered under `key`. Listeners run outside the lock.
    pub fn notify(&self, key: &str, value: &T) {
        let callbacks: Vec<Callback<T>> = match self.inner.lock() {
            Ok(state) => state
                .entries
                .iter()
                .filter(|e| e.key == key)
                .map(|e| Arc::clone(&e.callback))
                .collect(),
            Err(_) => return,
        };
        for callback in callbacks {
            callback(value);
        }
    }

    pub fn has_listeners(&self, key: &str) -> bool {
        self.inner
            .lock()
            .map(|state| state.entries.iter().any(|e| e.key == key))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|state| state.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Live-data handle. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_notify_by_key_and_unsubscribe() {
        let watchers: Watchers<[u32]> = Watchers::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let sub = watchers.subscribe("alice", Arc::new(move |values: &[u32]| {
            counter.fetch_add(values.len(), Ordering::SeqCst);
        }));

        watchers.notify("alice", &[1, 2, 3]);
        watchers.notify("bob", &[1]);
        assert_eq!(hits.load(Ordering::SeqCst), 3);

        sub.unsubscribe();
        watchers.notify("alice", &[1]);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(watchers.is_empty());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let watchers: Watchers<str> = Watchers::new();
        {
            let _sub = watchers.subscribe("k", Arc::new(|_: &str| {}));
            assert!(watchers.has_listeners("k"));
        }
        assert!(!watchers.has_listeners("k"));
    }
}
