//! Push-based reactive streams
//!
//! A [`Stream`] holds an optional current value and an ordered list of
//! listeners. Every [`Stream::push`] stores the value and then calls each
//! listener synchronously, in registration order, before returning.
//!
//! Semantics:
//! - Subscribing to a stream that already holds a value replays that value to
//!   the new listener before `subscribe` returns.
//! - Pushes are never deduplicated; pushing an equal value notifies again.
//! - Delivery runs over a snapshot of the listeners taken when the push
//!   starts. Listeners added during a push are not part of it (they get the
//!   replay instead); listeners removed during a push still receive the
//!   in-flight value but nothing after it.
//! - A panicking listener unwinds out of `push` and the remaining listeners of
//!   that push are skipped. The stream holds no borrow while listeners run, so
//!   it stays usable afterwards.
//!
//! A stream derived with `map` stays attached to its source while a handle
//! to it, or to a stream mapped from it, is alive. Dropping the last such
//! handle detaches it.
//!
//! Streams are single-threaded handles (`Rc`-based); cloning a stream yields
//! another handle to the same value and listeners.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type ListenerId = u64;
type Listener<T> = Rc<dyn Fn(&T)>;

struct StreamInner<T> {
    current: Option<T>,
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_id: ListenerId,
}

/// Listener removal, erased over the stream's value type
trait Detach {
    fn detach(&self, id: ListenerId);
}

impl<T> Detach for RefCell<StreamInner<T>> {
    fn detach(&self, id: ListenerId) {
        self.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
    }
}

/// Handle returned by `subscribe`
///
/// Dropping the handle leaves the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription {
    source: Weak<dyn Detach>,
    id: ListenerId,
    active: Cell<bool>,
}

impl Subscription {
    /// Remove the listener from future deliveries
    ///
    /// Calling this more than once, or after the stream is gone, does nothing.
    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(source) = self.source.upgrade() {
            source.detach(self.id);
        }
    }

    /// Whether `unsubscribe` has not been called yet
    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}

/// Attachment of a derived stream to its source
struct MapLink {
    subscription: Subscription,
    _upstream: Option<Rc<MapLink>>,
}

impl Drop for MapLink {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

/// A multicast value stream with replay-on-subscribe
pub struct Stream<T> {
    inner: Rc<RefCell<StreamInner<T>>>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// Create a stream with no current value
    pub fn new() -> Self {
        Self::from_current(None)
    }

    /// Create a stream seeded with a current value
    pub fn with_value(value: T) -> Self {
        Self::from_current(Some(value))
    }

    fn from_current(current: Option<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StreamInner {
                current,
                listeners: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Register a listener, replaying the current value if there is one
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let listener: Listener<T> = Rc::new(listener);
        let (id, replay) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Rc::clone(&listener)));
            (id, inner.current.clone())
        };

        if let Some(value) = replay {
            listener(&value);
        }

        let source: Weak<dyn Detach> = Rc::downgrade(&self.inner) as Weak<dyn Detach>;
        Subscription {
            source,
            id,
            active: Cell::new(true),
        }
    }

    /// Store `value` and deliver it to every listener
    pub fn push(&self, value: T) {
        let listeners: Vec<Listener<T>> = {
            let mut inner = self.inner.borrow_mut();
            inner.current = Some(value.clone());
            inner
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect()
        };

        for listener in listeners {
            listener(&value);
        }
    }

    /// Derive a read-only stream of `project(value)` for every pushed value
    ///
    /// The derived stream replays immediately when this stream already holds
    /// a value. Dropping every handle to it detaches it from this stream.
    pub fn map<U, F>(&self, project: F) -> StreamReader<U>
    where
        U: Clone + 'static,
        F: Fn(&T) -> U + 'static,
    {
        self.map_linked(project, None)
    }

    fn map_linked<U, F>(&self, project: F, upstream: Option<Rc<MapLink>>) -> StreamReader<U>
    where
        U: Clone + 'static,
        F: Fn(&T) -> U + 'static,
    {
        let derived = Stream::new();
        let sink = derived.clone();
        let subscription = self.subscribe(move |value| sink.push(project(value)));
        StreamReader {
            stream: derived,
            link: Some(Rc::new(MapLink {
                subscription,
                _upstream: upstream,
            })),
        }
    }

    /// Get a copy of the current value
    pub fn value(&self) -> Option<T> {
        self.inner.borrow().current.clone()
    }

    /// Check whether a value has been pushed (or seeded)
    pub fn has_value(&self) -> bool {
        self.inner.borrow().current.is_some()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Get a read-only handle to this stream
    pub fn reader(&self) -> StreamReader<T> {
        StreamReader {
            stream: self.clone(),
            link: None,
        }
    }
}

impl<T: Clone + 'static> Default for Stream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Stream")
            .field("current", &inner.current)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

/// Read-only view of a [`Stream`]
///
/// Handed out by stores and returned by `map`, so holders can observe values
/// but never push them.
pub struct StreamReader<T> {
    stream: Stream<T>,
    link: Option<Rc<MapLink>>,
}

impl<T> Clone for StreamReader<T> {
    fn clone(&self) -> Self {
        Self {
            stream: self.stream.clone(),
            link: self.link.clone(),
        }
    }
}

impl<T: Clone + 'static> StreamReader<T> {
    /// Register a listener, replaying the current value if there is one
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        self.stream.subscribe(listener)
    }

    /// Derive a read-only stream of `project(value)`
    pub fn map<U, F>(&self, project: F) -> StreamReader<U>
    where
        U: Clone + 'static,
        F: Fn(&T) -> U + 'static,
    {
        self.stream.map_linked(project, self.link.clone())
    }

    /// Get a copy of the current value
    pub fn value(&self) -> Option<T> {
        self.stream.value()
    }

    /// Check whether the stream holds a value
    pub fn has_value(&self) -> bool {
        self.stream.has_value()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.stream.listener_count()
    }
}

impl<T: fmt::Debug> fmt::Debug for StreamReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StreamReader").field(&self.stream).finish()
    }
}
