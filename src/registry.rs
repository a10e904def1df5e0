use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use crate::Error;

type Cleanup = Box<dyn FnOnce()>;

/// A pending cleanup, tagged with the token of the registration that owns it.
struct Entry {
    token: u64,
    cleanup: Cleanup,
}

type Table<K> = RefCell<HashMap<K, Entry>>;

/// Associates handle identities with the action that releases them.
///
/// Every registered cleanup runs at most once: when its identity is released explicitly, when the
/// [`Registration`] returned by [`register`](Self::register) is dropped, or when the registry
/// itself is dropped, whichever comes first.
pub struct HandleRegistry<K: Eq + Hash> {
    table: Rc<Table<K>>,
    next_token: Cell<u64>,
}

impl<K> HandleRegistry<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Creates a new, empty [`HandleRegistry`].
    pub fn new() -> Self {
        Self {
            table: Rc::new(RefCell::new(HashMap::new())),
            next_token: Cell::new(0),
        }
    }

    /// Associates `cleanup` with the handle identified by `key`.
    ///
    /// The returned [`Registration`] does not keep the registry alive.
    pub fn register<F>(&self, key: K, cleanup: F) -> Result<Registration<K>, Error>
    where
        F: FnOnce() + 'static,
    {
        let mut table = self.table.borrow_mut();

        if table.contains_key(&key) {
            return Err(Error::HandleAlreadyRegistered(format!("{key:?}")));
        }

        let token = self.next_token.get();
        self.next_token.set(token + 1);

        let entry = Entry {
            token,
            cleanup: Box::new(cleanup),
        };
        table.insert(key.clone(), entry);
        log::trace!("registered cleanup for handle {key:?}");

        Ok(Registration {
            key,
            token,
            table: Rc::downgrade(&self.table),
            disposed: false,
        })
    }

    /// Runs the cleanup associated with `key`, if it has not run yet.
    ///
    /// Returns whether a cleanup was run.
    pub fn release(&self, key: &K) -> bool {
        run_cleanup(&self.table, key, None)
    }

    /// Returns whether a cleanup is still pending for `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.table.borrow().contains_key(key)
    }

    /// Returns the number of pending cleanups.
    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    /// Returns whether no cleanup is pending.
    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }

    /// Runs every pending cleanup.
    pub fn release_all(&self) {
        // Cleanups may touch the registry, so the table must not be borrowed while they run.
        let pending: Vec<(K, Entry)> = self.table.borrow_mut().drain().collect();

        for (key, entry) in pending {
            log::trace!("running cleanup for handle {key:?}");
            (entry.cleanup)();
        }
    }
}

impl<K> Default for HandleRegistry<K>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> Drop for HandleRegistry<K> {
    fn drop(&mut self) {
        let pending: Vec<Cleanup> = self
            .table
            .borrow_mut()
            .drain()
            .map(|(_, entry)| entry.cleanup)
            .collect();

        for cleanup in pending {
            cleanup();
        }
    }
}

impl<K: Eq + Hash + fmt::Debug> fmt::Debug for HandleRegistry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.table.borrow().keys()).finish()
    }
}

/// The owner's side of a [`HandleRegistry`] entry.
///
/// Dropping it runs the associated cleanup, unless that already happened.
pub struct Registration<K: Eq + Hash> {
    key: K,
    token: u64,
    table: Weak<Table<K>>,
    disposed: bool,
}

impl<K: Eq + Hash> Registration<K> {
    /// Returns the identity this registration is about.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns whether [`dispose`](Self::dispose) was already called.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Runs the associated cleanup if neither this registration nor the registry ran it already.
    ///
    /// Returns whether the cleanup ran during this call.
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }

        self.disposed = true;

        match self.table.upgrade() {
            Some(table) => run_cleanup(&table, &self.key, Some(self.token)),
            None => false,
        }
    }
}

impl<K: Eq + Hash> Drop for Registration<K> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<K: Eq + Hash + fmt::Debug> fmt::Debug for Registration<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("key", &self.key)
            .field("disposed", &self.disposed)
            .finish()
    }
}

/// Removes the cleanup of `key` from the table, then runs it.
///
/// With a `token`, only the cleanup registered under that token is run: an identity released
/// and registered again belongs to its new owner.
fn run_cleanup<K: Eq + Hash>(table: &Table<K>, key: &K, token: Option<u64>) -> bool {
    let entry = {
        let mut table = table.borrow_mut();
        let owned = table
            .get(key)
            .map_or(false, |entry| token.map_or(true, |token| token == entry.token));

        if owned {
            table.remove(key)
        } else {
            None
        }
    };

    match entry {
        Some(entry) => {
            (entry.cleanup)();
            true
        }
        None => false,
    }
}
