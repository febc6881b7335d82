use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Dispose = Box<dyn FnOnce() + Send>;

/// Disposer handle returned by every `watch`/`subscribe` call.
///
/// Cloning shares the handle. `unsubscribe` runs the disposer at most once;
/// any further call is a no-op.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

struct SubscriptionInner {
    active: AtomicBool,
    dispose: Mutex<Option<Dispose>>,
}

impl Subscription {
    pub fn new(dispose: impl FnOnce() + Send + 'static) -> Self {
        Self {
            inner: Arc::new(SubscriptionInner {
                active: AtomicBool::new(true),
                dispose: Mutex::new(Some(Box::new(dispose))),
            }),
        }
    }

    /// A handle with nothing to release.
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    pub fn unsubscribe(&self) {
        if !self.inner.active.swap(false, Ordering::SeqCst) {
            return;
        }
        // Release the lock before running the disposer; it may re-enter.
        let dispose = self.inner.dispose.lock().take();
        if let Some(dispose) = dispose {
            dispose();
        }
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

struct Listener<T: ?Sized> {
    id: u64,
    active: AtomicBool,
    callback: Arc<dyn Fn(&T) + Send + Sync>,
}

/// Ordered listener list shared by stores, events and console connections.
pub(crate) struct Listeners<T: ?Sized> {
    next_id: AtomicU64,
    entries: Mutex<Vec<Arc<Listener<T>>>>,
}

impl<T: ?Sized + 'static> Listeners<T> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn add(self: &Arc<Self>, callback: Arc<dyn Fn(&T) + Send + Sync>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let listener = Arc::new(Listener {
            id,
            active: AtomicBool::new(true),
            callback,
        });
        self.entries.lock().push(listener);

        let weak: Weak<Self> = Arc::downgrade(self);
        Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                listeners.remove(id);
            }
        })
    }

    fn remove(&self, id: u64) {
        let mut entries = self.entries.lock();
        if let Some(pos) = entries.iter().position(|l| l.id == id) {
            let listener = entries.remove(pos);
            listener.active.store(false, Ordering::SeqCst);
        }
    }

    /// Calls every live listener in registration order.
    ///
    /// The list is copied before dispatch so callbacks may add or remove
    /// listeners; a listener removed mid-dispatch is skipped.
    pub(crate) fn notify(&self, payload: &T) {
        let snapshot: Vec<Arc<Listener<T>>> = self.entries.lock().clone();
        for listener in snapshot {
            if listener.active.load(Ordering::SeqCst) {
                (listener.callback)(payload);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().len()
    }
}
