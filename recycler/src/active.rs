use alloc::vec::Vec;

use crate::key::KeyMap;
use crate::{ItemId, RecyclerKey};

/// Data index → bound instance, for rows inside the visible window.
#[derive(Clone, Debug)]
pub(crate) struct ActiveIndexMap<Ix> {
    map: KeyMap<Ix, ItemId>,
}

impl<Ix: RecyclerKey> ActiveIndexMap<Ix> {
    pub(crate) fn new() -> Self {
        Self { map: KeyMap::new() }
    }

    pub(crate) fn get(&self, index: &Ix) -> Option<ItemId> {
        self.map.get(index).copied()
    }

    pub(crate) fn insert(&mut self, index: Ix, id: ItemId) -> Option<ItemId> {
        self.map.insert(index, id)
    }

    pub(crate) fn remove(&mut self, index: &Ix) -> Option<ItemId> {
        self.map.remove(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Ix, ItemId)> {
        self.map.iter().map(|(ix, id)| (ix, *id))
    }

    /// Empties the map, returning every binding.
    pub(crate) fn take_all(&mut self) -> Vec<(Ix, ItemId)> {
        core::mem::take(&mut self.map).into_iter().collect()
    }
}
