slotmap::new_key_type! {
    /// A stable handle to an item instance owned by a [`crate::Recycler`].
    ///
    /// Ids stay valid while the instance moves between the active map and its pool. They go
    /// stale once the instance is handed out by [`crate::Recycler::drain_pool`].
    pub struct ItemId;
}

/// Where an item instance currently lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemLocation<Ix> {
    /// Bound to a data index inside the visible window.
    Active(Ix),
    /// Parked in its template's pool, awaiting reuse.
    Parked,
}

impl<Ix> ItemLocation<Ix> {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

/// Result of the positioning callback for one visible row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Placement {
    /// The item is at rest.
    #[default]
    Settled,
    /// The item is still converging on its target (easing, animating).
    Moving,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SettleState {
    #[default]
    Idle,
    Settling,
}

/// Order in which parked instances are reused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PoolOrder {
    /// The instance parked first is reused first.
    #[default]
    Fifo,
    /// The instance parked last is reused first.
    Lifo,
}

/// Which pass work keeps the settle state machine in `Settling`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SettlePolicy {
    /// Acquisitions and `Placement::Moving` rows touch the pass. Releases do not.
    #[default]
    AcquireOrMotion,
    /// Releases touch the pass as well.
    AnyWork,
}

/// The range of row positions (`index_in_data + data_offset`) eligible for an item.
///
/// Both bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleWindow {
    pub first: i64,
    pub last: i64,
}

impl VisibleWindow {
    pub fn new(num_rows: usize, overscan_before: usize, overscan_after: usize) -> Self {
        let first = -(overscan_before as i64);
        let last = (num_rows as i64 - 1).saturating_add(overscan_after as i64);
        Self { first, last }
    }

    pub fn contains(&self, pos: i64) -> bool {
        pos >= self.first && pos <= self.last
    }

    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }
}

/// Counters collected by one visibility pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassStats {
    /// Rows handed to the positioning callback.
    pub positioned: usize,
    /// Rows that had no bound instance and received one.
    pub acquired: usize,
    /// Acquisitions served by a fresh instantiation.
    pub instantiated: usize,
    /// Acquisitions served from a pool.
    pub reused: usize,
    /// Instances returned to their pools.
    pub released: usize,
    /// Rows whose placement reported `Moving`.
    pub moving: usize,
    /// Visible rows that could not be materialized.
    pub skipped: usize,
    /// `true` when this pass ended settling.
    pub settled: bool,
}
