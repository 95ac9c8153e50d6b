use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::fmt;

use crate::active::ActiveIndexMap;
use crate::grab::GrabTracker;
use crate::settle::SettleMachine;
use crate::{ItemId, RecyclerKey, SettleCallback, SettleState};

/// Engine state reachable from item callbacks.
pub(crate) struct Shared<Ix, G> {
    pub(crate) active: ActiveIndexMap<Ix>,
    pub(crate) grabs: GrabTracker<Ix, G>,
    pub(crate) settle: SettleMachine,
    pub(crate) on_settle_change: Option<SettleCallback>,
}

impl<Ix: RecyclerKey, G: PartialEq> Shared<Ix, G> {
    pub(crate) fn new(on_settle_change: Option<SettleCallback>) -> Self {
        Self {
            active: ActiveIndexMap::new(),
            grabs: GrabTracker::new(),
            settle: SettleMachine::default(),
            on_settle_change,
        }
    }

    /// Returns the callback to fire, if settling actually started.
    pub(crate) fn start_settling(&mut self) -> Option<SettleCallback> {
        if !self.settle.start() {
            return None;
        }
        rdebug!("settling started");
        self.on_settle_change.clone()
    }

    /// Returns the callback to fire, if settling actually ended.
    pub(crate) fn end_settling(&mut self) -> Option<SettleCallback> {
        if !self.settle.end() {
            return None;
        }
        rdebug!("settling ended");
        self.on_settle_change.clone()
    }

    pub(crate) fn finish_pass(&mut self) -> (bool, Option<SettleCallback>) {
        if !self.settle.finish_pass() {
            return (false, None);
        }
        rdebug!("settling ended: pass left the list untouched");
        (true, self.on_settle_change.clone())
    }

    pub(crate) fn grabbed_item(&self, handle: &G) -> Option<ItemId> {
        self.grabs
            .index_for(handle)
            .and_then(|index| self.active.get(index))
    }
}

/// Fires a settle callback. Callers must not hold the shared state while doing so.
pub(crate) fn notify_settle(callback: Option<SettleCallback>, state: SettleState) {
    if let Some(cb) = callback {
        cb(state);
    }
}

/// The engine's callable surface, handed to every item on acquisition.
///
/// `ListHooks` does not own the engine: once the [`crate::Recycler`] is dropped, every call is a
/// no-op and every lookup returns `None`. Lookups return [`ItemId`]s; resolve them through
/// [`crate::Recycler::item`].
///
/// Calls made while the engine is itself inside a hook call are rejected the same way (and
/// reported with the `tracing` feature).
pub struct ListHooks<Ix, G> {
    shared: Weak<RefCell<Shared<Ix, G>>>,
}

impl<Ix, G> Clone for ListHooks<Ix, G> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<Ix, G> fmt::Debug for ListHooks<Ix, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListHooks")
            .field("attached", &(self.shared.strong_count() > 0))
            .finish()
    }
}

impl<Ix: RecyclerKey + Clone, G: PartialEq> ListHooks<Ix, G> {
    pub(crate) fn new(shared: &Rc<RefCell<Shared<Ix, G>>>) -> Self {
        Self {
            shared: Rc::downgrade(shared),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Shared<Ix, G>) -> R) -> Option<R> {
        let shared = self.shared.upgrade()?;
        let Ok(mut guard) = shared.try_borrow_mut() else {
            rwarn!("ListHooks: re-entrant call ignored");
            return None;
        };
        Some(f(&mut *guard))
    }

    /// `false` once the owning engine has been dropped.
    pub fn is_attached(&self) -> bool {
        self.shared.strong_count() > 0
    }

    pub fn start_settling(&self) {
        if let Some(cb) = self.with(Shared::start_settling).flatten() {
            notify_settle(Some(cb), SettleState::Settling);
        }
    }

    pub fn end_settling(&self) {
        if let Some(cb) = self.with(Shared::end_settling).flatten() {
            notify_settle(Some(cb), SettleState::Idle);
        }
    }

    pub fn settle_state(&self) -> SettleState {
        self.with(|s| s.settle.state()).unwrap_or_default()
    }

    /// Marks the transition as still in progress, keeping the list settling through the current
    /// pass (or the next one, when called between passes).
    pub fn signal_motion(&self) {
        self.with(|s| s.settle.signal_motion());
    }

    /// The instance currently bound to `index`.
    pub fn list_item(&self, index: &Ix) -> Option<ItemId> {
        self.with(|s| s.active.get(index)).flatten()
    }

    pub fn set_row_grabbed(&self, index: Ix, handle: G, grabbed: bool) {
        self.with(|s| s.grabs.set(index, handle, grabbed));
    }

    /// The instance bound to the row `handle` holds, if that row is visible.
    pub fn grabbed_row(&self, handle: &G) -> Option<ItemId> {
        self.with(|s| s.grabbed_item(handle)).flatten()
    }

    /// The data index `handle` holds, visible or not.
    pub fn grabbed_index(&self, handle: &G) -> Option<Ix> {
        self.with(|s| s.grabs.index_for(handle).cloned()).flatten()
    }
}
