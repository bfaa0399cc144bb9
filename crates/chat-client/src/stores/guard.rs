//! Loading-flag guard

use std::sync::Arc;

use parking_lot::RwLock;

/// Raises a boolean flag in store state and lowers it when dropped, so
/// loading indicators clear on every exit path
pub(crate) struct FlagGuard<S> {
    state: Arc<RwLock<S>>,
    flag: fn(&mut S) -> &mut bool,
}

impl<S> FlagGuard<S> {
    pub(crate) fn raise(state: &Arc<RwLock<S>>, flag: fn(&mut S) -> &mut bool) -> Self {
        {
            let mut guard = state.write();
            *flag(&mut guard) = true;
        }
        Self {
            state: Arc::clone(state),
            flag,
        }
    }
}

impl<S> Drop for FlagGuard<S> {
    fn drop(&mut self) {
        let mut guard = self.state.write();
        *(self.flag)(&mut guard) = false;
    }
}

/// Loading flag shared by overlapping requests
///
/// The flag stays raised until the last outstanding request finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Pending {
    count: u32,
}

pub(crate) struct PendingGuard<S> {
    state: Arc<RwLock<S>>,
    pending: fn(&mut S) -> (&mut Pending, &mut bool),
}

impl<S> PendingGuard<S> {
    pub(crate) fn raise(
        state: &Arc<RwLock<S>>,
        pending: fn(&mut S) -> (&mut Pending, &mut bool),
    ) -> Self {
        {
            let mut guard = state.write();
            let (counter, flag) = pending(&mut guard);
            counter.count += 1;
            *flag = true;
        }
        Self {
            state: Arc::clone(state),
            pending,
        }
    }
}

impl<S> Drop for PendingGuard<S> {
    fn drop(&mut self) {
        let mut guard = self.state.write();
        let (counter, flag) = (self.pending)(&mut guard);
        counter.count = counter.count.saturating_sub(1);
        *flag = counter.count > 0;
    }
}
