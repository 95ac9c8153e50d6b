use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::key::KeyMap;
use crate::{ItemId, PoolOrder, RecyclerKey};

#[derive(Clone, Debug)]
pub(crate) struct TemplateBucket<P> {
    prototype: P,
    pool: VecDeque<ItemId>,
}

/// Per-template prototypes plus the parked instances produced from them.
#[derive(Clone, Debug)]
pub(crate) struct PoolStore<T, P> {
    buckets: KeyMap<T, TemplateBucket<P>>,
    order: PoolOrder,
}

impl<T: RecyclerKey, P> PoolStore<T, P> {
    pub(crate) fn new(order: PoolOrder) -> Self {
        Self {
            buckets: KeyMap::new(),
            order,
        }
    }

    pub(crate) fn set_order(&mut self, order: PoolOrder) {
        self.order = order;
    }

    /// Registers (or replaces) a prototype. Parked instances of a replaced template stay pooled.
    pub(crate) fn register(&mut self, template: T, prototype: P) -> Option<P> {
        if let Some(bucket) = self.buckets.get_mut(&template) {
            return Some(core::mem::replace(&mut bucket.prototype, prototype));
        }
        self.buckets.insert(
            template,
            TemplateBucket {
                prototype,
                pool: VecDeque::new(),
            },
        );
        None
    }

    pub(crate) fn contains(&self, template: &T) -> bool {
        self.buckets.contains_key(template)
    }

    pub(crate) fn prototype(&self, template: &T) -> Option<&P> {
        self.buckets.get(template).map(|b| &b.prototype)
    }

    pub(crate) fn take(&mut self, template: &T) -> Option<ItemId> {
        let bucket = self.buckets.get_mut(template)?;
        match self.order {
            PoolOrder::Fifo => bucket.pool.pop_front(),
            PoolOrder::Lifo => bucket.pool.pop_back(),
        }
    }

    /// Parks `id` in its template's bucket. Returns `false` when the template is unknown.
    pub(crate) fn park(&mut self, template: &T, id: ItemId) -> bool {
        match self.buckets.get_mut(template) {
            Some(bucket) => {
                bucket.pool.push_back(id);
                true
            }
            None => false,
        }
    }

    pub(crate) fn parked_len(&self, template: &T) -> usize {
        self.buckets.get(template).map_or(0, |b| b.pool.len())
    }

    pub(crate) fn total_parked(&self) -> usize {
        self.buckets.values().map(|b| b.pool.len()).sum()
    }

    pub(crate) fn drain(&mut self, template: &T) -> Vec<ItemId> {
        match self.buckets.get_mut(template) {
            Some(bucket) => bucket.pool.drain(..).collect(),
            None => Vec::new(),
        }
    }
}
