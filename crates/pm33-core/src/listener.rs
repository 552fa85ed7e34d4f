//! Scoped registration of callbacks.
//!
//! `Registry::register` hands back a [`Registration`] guard; the entry lives
//! exactly as long as the guard. Dropping the guard (or calling
//! [`Registration::release`]) removes it, on every exit path. A guard that
//! outlives its registry releases nothing.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

struct Inner<T: ?Sized> {
    next_id: u64,
    entries: Vec<(u64, Rc<T>)>,
}

pub struct Registry<T: ?Sized> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                next_id: 1,
                entries: Vec::new(),
            })),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("active", &self.len())
            .finish()
    }
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, item: Rc<T>) -> Registration<T> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, item));
        Registration {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Registered items in registration order. The borrow is released before
    /// returning, so callers may register or drop guards while iterating.
    pub fn snapshot(&self) -> Vec<Rc<T>> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|(_, item)| Rc::clone(item))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[must_use = "dropping the registration removes the entry immediately"]
pub struct Registration<T: ?Sized> {
    id: u64,
    registry: Weak<RefCell<Inner<T>>>,
}

impl<T: ?Sized> Registration<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True while the entry is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|inner| inner.borrow().entries.iter().any(|(id, _)| *id == self.id))
            .unwrap_or(false)
    }

    /// Explicit teardown; equivalent to dropping the guard.
    pub fn release(self) {}
}

impl<T: ?Sized> fmt::Debug for Registration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish()
    }
}

impl<T: ?Sized> Drop for Registration<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().entries.retain(|(id, _)| *id != self.id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
