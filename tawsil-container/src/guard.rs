//! Same-thread re-entrancy detection for memo cells.
//!
//! Singleton and resolver results are memoized in `OnceCell`s. A provider
//! that (transitively) asks for its own cell while that cell is still
//! initializing would block forever, so each initialization is wrapped in
//! an [`InitGuard`] keyed by the cell's address.

use std::cell::RefCell;
use std::collections::HashSet;

use tracing::warn;

use crate::error::{ContainerError, Result};

thread_local! {
    static INITIALIZING: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());
}

/// Marks a memo cell as initializing on this thread until dropped.
pub(crate) struct InitGuard {
    cell: usize,
}

impl InitGuard {
    /// Enters `cell`, failing if this thread is already initializing it.
    pub fn enter<T>(cell: *const T, describe: impl FnOnce() -> String) -> Result<Self> {
        let cell = cell as usize;
        let fresh = INITIALIZING.with(|set| set.borrow_mut().insert(cell));
        if !fresh {
            let what = describe();
            warn!(what = %what, "Re-entrant initialization detected");
            return Err(ContainerError::Reentrant(what).into());
        }
        Ok(Self { cell })
    }
}

impl Drop for InitGuard {
    fn drop(&mut self) {
        INITIALIZING.with(|set| {
            set.borrow_mut().remove(&self.cell);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_enter_fails_until_drop() {
        let cell = 0u8;
        let guard = InitGuard::enter(&cell, || "cell".into()).unwrap();

        let err = InitGuard::enter(&cell, || "cell".into()).err().unwrap();
        assert!(err.to_string().contains("re-entered"));

        drop(guard);
        assert!(InitGuard::enter(&cell, || "cell".into()).is_ok());
    }

    #[test]
    fn distinct_cells_do_not_collide() {
        let (a, b) = (0u8, 0u8);
        let _ga = InitGuard::enter(&a, String::new).unwrap();
        assert!(InitGuard::enter(&b, String::new).is_ok());
    }
}
