#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
pub(crate) type KeyMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyMap<K, V> = BTreeMap<K, V>;

/// Bound for data indices and template identifiers.
///
/// With `std` this is `Hash + Eq`; without it, `Ord` (backed by a `BTreeMap`).
#[cfg(feature = "std")]
pub trait RecyclerKey: core::hash::Hash + Eq {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq> RecyclerKey for K {}

#[cfg(not(feature = "std"))]
pub trait RecyclerKey: Ord {}
#[cfg(not(feature = "std"))]
impl<K: Ord> RecyclerKey for K {}
