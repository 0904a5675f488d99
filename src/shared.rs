//! Thread-safe handle around a [`Scope`].

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

use crate::error::Result;
use crate::Scope;

/// SharedScope lets several threads query and update one Scope.
///
/// Queries take a read lock, mutations a write lock. A batch call holds the
/// write lock for the whole batch, so readers never observe half of it; a
/// failing batch still keeps the entries added before the failure.
///
/// # Examples
/// ```
/// use hostscope::{Scope, SharedScope};
///
/// let shared = SharedScope::new(Scope::new());
/// let worker = shared.clone();
///
/// std::thread::spawn(move || worker.add_includes(["*.example.com"]))
///     .join()
///     .unwrap()?;
///
/// assert!(shared.in_scope("api.example.com"));
/// # Ok::<(), hostscope::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedScope {
    inner: Arc<RwLock<Scope>>,
}

impl SharedScope {
    /// Wrap `scope`.
    pub fn new(scope: Scope) -> Self {
        Self {
            inner: Arc::new(RwLock::new(scope)),
        }
    }

    /// Lock for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, Scope> {
        self.inner.read()
    }

    /// Lock for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, Scope> {
        self.inner.write()
    }

    /// Replace the wrapped Scope, e.g. after reloading a config file.
    pub fn replace(&self, scope: Scope) -> Scope {
        let old = std::mem::replace(&mut *self.inner.write(), scope);
        log::debug!("Replaced shared scope");
        old
    }

    /// See [`Scope::add_includes`].
    pub fn add_includes<I, S>(&self, definitions: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scope = self.inner.write();
        let before = scope.include_rules().len();
        let result = scope.add_includes(definitions);
        log::debug!(
            "Added {} include rules",
            scope.include_rules().len().saturating_sub(before)
        );
        result
    }

    /// See [`Scope::add_excludes`].
    pub fn add_excludes<I, S>(&self, definitions: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scope = self.inner.write();
        let before = scope.exclude_rules().len();
        let result = scope.add_excludes(definitions);
        log::debug!(
            "Added {} exclude rules",
            scope.exclude_rules().len().saturating_sub(before)
        );
        result
    }

    /// See [`Scope::add_targets`].
    pub fn add_targets<I, S>(&self, targets: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scope = self.inner.write();
        let result = scope.add_targets(targets);
        if let Err(ref e) = result {
            log::debug!("Target registration stopped: {}", e);
        }
        result
    }

    /// See [`Scope::remove_target`].
    pub fn remove_target(&self, target: &str) -> Result<()> {
        self.inner.write().remove_target(target)
    }

    /// See [`Scope::is_included`].
    pub fn is_included(&self, target: &str) -> bool {
        self.inner.read().is_included(target)
    }

    /// See [`Scope::is_excluded`].
    pub fn is_excluded(&self, target: &str) -> bool {
        self.inner.read().is_excluded(target)
    }

    /// See [`Scope::in_scope`].
    pub fn in_scope(&self, target: &str) -> bool {
        self.inner.read().in_scope(target)
    }
}

impl From<Scope> for SharedScope {
    fn from(scope: Scope) -> Self {
        Self::new(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_queries_and_updates() {
        let shared = SharedScope::new(Scope::new());
        shared.add_includes(["10.0.0.0/8"]).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared.add_excludes([format!("10.0.0.{}", i)]).unwrap();
                    shared.in_scope("10.1.1.1")
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }

        assert_eq!(shared.read().excludes().len(), 4);
        assert!(!shared.in_scope("10.0.0.3"));
        assert!(shared.is_included("10.0.0.3"));
        assert!(shared.is_excluded("10.0.0.3"));
    }

    #[test]
    fn test_targets_and_replace() {
        let shared = SharedScope::from(Scope::new());
        shared.add_targets(["newhost.com"]).unwrap();
        assert!(shared.in_scope("newhost.com"));

        shared.remove_target("newhost.com").unwrap();
        assert!(shared.remove_target("newhost.com").is_err());

        let old = shared.replace(Scope::new());
        assert!(old.targets().is_empty());
        assert!(shared.read().includes().is_empty());
    }
}
