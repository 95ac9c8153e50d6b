use alloc::rc::Rc;

use crate::{PoolOrder, SettlePolicy, SettleState};

/// A callback fired after every settle transition, with the new state.
///
/// It runs after the engine has released its internal state, so it may call back into
/// [`crate::ListHooks`]. The engine is single-threaded, so the callback may capture `Rc` state.
pub type SettleCallback = Rc<dyn Fn(SettleState)>;

/// Configuration for [`crate::Recycler`].
///
/// Cheap to clone: the callback is stored in an `Rc`.
#[derive(Clone)]
pub struct RecyclerOptions {
    /// Rows before position `0` that still count as visible.
    ///
    /// The default of `1` keeps the row scrolling out at the leading edge bound until it is fully
    /// gone, so items easing out of view are not released mid-transition.
    pub overscan_before: usize,
    /// Rows after position `num_rows - 1` that still count as visible.
    pub overscan_after: usize,
    /// Which parked instance a pool hands out first.
    pub pool_order: PoolOrder,
    /// Which pass work keeps the list settling.
    pub settle_policy: SettlePolicy,
    /// Optional callback fired on `Idle` ↔ `Settling` transitions.
    pub on_settle_change: Option<SettleCallback>,
}

impl Default for RecyclerOptions {
    fn default() -> Self {
        Self {
            overscan_before: 1,
            overscan_after: 0,
            pool_order: PoolOrder::Fifo,
            settle_policy: SettlePolicy::AcquireOrMotion,
            on_settle_change: None,
        }
    }
}

impl core::fmt::Debug for RecyclerOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecyclerOptions")
            .field("overscan_before", &self.overscan_before)
            .field("overscan_after", &self.overscan_after)
            .field("pool_order", &self.pool_order)
            .field("settle_policy", &self.settle_policy)
            .field("on_settle_change", &self.on_settle_change.is_some())
            .finish()
    }
}

impl RecyclerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overscan(mut self, before: usize, after: usize) -> Self {
        self.overscan_before = before;
        self.overscan_after = after;
        self
    }

    pub fn with_pool_order(mut self, pool_order: PoolOrder) -> Self {
        self.pool_order = pool_order;
        self
    }

    pub fn with_settle_policy(mut self, settle_policy: SettlePolicy) -> Self {
        self.settle_policy = settle_policy;
        self
    }

    pub fn with_on_settle_change(
        mut self,
        on_settle_change: Option<impl Fn(SettleState) + 'static>,
    ) -> Self {
        self.on_settle_change = on_settle_change.map(|f| Rc::new(f) as _);
        self
    }
}
