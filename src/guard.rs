//! Scope guard that runs a cleanup closure when it is dropped.

/// Runs the wrapped closure exactly once when dropped.
///
/// Created through [`defer`]. The guard is neither `Clone` nor `Copy`, so the
/// cleanup action stays with the scope that created it. Bind it to a named
/// variable (`let _guard = ...`); binding to `_` drops it immediately.
#[must_use = "the closure runs as soon as the guard is dropped"]
pub struct Defer<F: FnOnce()> {
    action: Option<F>,
}

/// Defer `action` until the end of the enclosing scope.
///
/// The closure runs on every exit path, including early returns and `?`.
pub fn defer<F: FnOnce()>(action: F) -> Defer<F> {
    Defer {
        action: Some(action),
    }
}

impl<F: FnOnce()> Drop for Defer<F> {
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }
}

impl<F: FnOnce()> std::fmt::Debug for Defer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Defer")
            .field("armed", &self.action.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn runs_once_at_scope_end() {
        let count = Cell::new(0);
        {
            let _guard = defer(|| count.set(count.get() + 1));
            assert_eq!(count.get(), 0);
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn runs_on_early_return() {
        fn early(count: &Cell<u32>, bail: bool) -> Result<(), ()> {
            let _guard = defer(|| count.set(count.get() + 1));
            if bail {
                return Err(());
            }
            Ok(())
        }

        let count = Cell::new(0);
        assert!(early(&count, true).is_err());
        assert_eq!(count.get(), 1);
        assert!(early(&count, false).is_ok());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn guards_unwind_in_reverse_order() {
        let order = std::cell::RefCell::new(Vec::new());
        {
            let _first = defer(|| order.borrow_mut().push(1));
            let _second = defer(|| order.borrow_mut().push(2));
        }
        assert_eq!(*order.borrow(), vec![2, 1]);
    }
}
