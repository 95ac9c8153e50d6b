use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use slotmap::SlotMap;

use crate::hooks::{Shared, notify_settle};
use crate::pool::PoolStore;
use crate::{
    ItemData, ItemHost, ItemId, ItemLocation, ListHooks, ListItem, PassStats, Placement,
    RecycleError, RecyclerOptions, SettlePolicy, SettleState, VisibleWindow,
};

type Index<D> = <D as ItemData>::Index;
type Template<D> = <D as ItemData>::Template;
type Item<D, H> = <H as ItemHost<D>>::Item;

struct Slot<D: ItemData, I> {
    item: I,
    template: Template<D>,
    // `Some` while the instance sits in the active map.
    bound: Option<Index<D>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Acquired {
    Existing,
    Reused,
    Instantiated,
}

/// Everything but the dataset, so a pass can borrow the data while mutating the rest.
struct Store<D: ItemData, H: ItemHost<D>> {
    host: H,
    pools: PoolStore<Template<D>, H::Prototype>,
    items: SlotMap<ItemId, Slot<D, Item<D, H>>>,
    shared: Rc<RefCell<Shared<Index<D>, H::Handle>>>,
}

impl<D: ItemData, H: ItemHost<D>> Store<D, H> {
    fn bound(&self, index: &Index<D>) -> Option<ItemId> {
        self.shared.borrow().active.get(index)
    }

    fn touch(&self) {
        self.shared.borrow_mut().settle.touch();
    }

    fn acquire(&mut self, data: &D) -> Result<(ItemId, Acquired), RecycleError> {
        let template = data.template();
        if !self.pools.contains(template) {
            rwarn!("acquire: template is not registered");
            return Err(RecycleError::UnknownTemplate);
        }

        let index = data.index();
        if let Some(id) = self.bound(index) {
            return Ok((id, Acquired::Existing));
        }

        let parked = self.pools.take(template);
        let (id, acquired) = match parked.filter(|id| self.items.contains_key(*id)) {
            Some(id) => {
                if let Some(slot) = self.items.get_mut(id) {
                    slot.item.set_active(true);
                    slot.item.setup(data);
                    slot.bound = Some(index.clone());
                }
                (id, Acquired::Reused)
            }
            None => {
                let Some(prototype) = self.pools.prototype(template) else {
                    return Err(RecycleError::UnknownTemplate);
                };
                let mut item = self.host.instantiate(prototype);
                self.host.connect(&mut item);
                item.setup(data);
                let id = self.items.insert(Slot {
                    item,
                    template: template.clone(),
                    bound: Some(index.clone()),
                });
                (id, Acquired::Instantiated)
            }
        };

        self.shared.borrow_mut().active.insert(index.clone(), id);

        let hooks = ListHooks::new(&self.shared);
        if let Some(slot) = self.items.get_mut(id) {
            slot.item.bind_hooks(hooks);
        }
        rtrace!(reused = acquired == Acquired::Reused, "acquire");
        Ok((id, acquired))
    }

    fn release(&mut self, index: &Index<D>) -> bool {
        let removed = self.shared.borrow_mut().active.remove(index);
        let Some(id) = removed else {
            return false;
        };
        self.park(id);
        true
    }

    fn park(&mut self, id: ItemId) {
        let Some(slot) = self.items.get_mut(id) else {
            return;
        };
        slot.bound = None;
        slot.item.set_active(false);
        let parked = self.pools.park(&slot.template, id);
        debug_assert!(parked, "released an instance of an unregistered template");
    }

    fn position(&mut self, id: ItemId, visible_offset: usize) -> Placement {
        match self.items.get_mut(id) {
            Some(slot) => self.host.position(&mut slot.item, visible_offset),
            None => Placement::Settled,
        }
    }

    fn release_all(&mut self) -> usize {
        let bindings = self.shared.borrow_mut().active.take_all();
        let n = bindings.len();
        for (_, id) in bindings {
            self.park(id);
        }
        n
    }
}

/// A recycling list-view engine.
///
/// The engine maps an index-addressed dataset onto a small set of reusable item instances:
/// - rows inside the visible window get an instance (reused from the row template's pool when
///   one is parked, freshly instantiated otherwise),
/// - rows that leave the window return their instance to the pool,
/// - every visible row is handed to the host's positioning callback once per pass.
///
/// The engine is single-threaded and UI-agnostic. The host supplies the data offset and row
/// budget each frame (see `recycler-adapter` for a scroll-driven provider) and calls
/// [`Recycler::update_items`].
pub struct Recycler<D: ItemData, H: ItemHost<D>> {
    options: RecyclerOptions,
    data: Option<Vec<D>>,
    data_offset: i64,
    num_rows: usize,
    store: Store<D, H>,
}

impl<D: ItemData, H: ItemHost<D>> Recycler<D, H> {
    pub fn new(host: H, options: RecyclerOptions) -> Self {
        rdebug!(
            overscan_before = options.overscan_before,
            overscan_after = options.overscan_after,
            "Recycler::new"
        );
        let store = Store {
            host,
            pools: PoolStore::new(options.pool_order),
            items: SlotMap::with_key(),
            shared: Rc::new(RefCell::new(Shared::new(options.on_settle_change.clone()))),
        };
        Self {
            options,
            data: None,
            data_offset: 0,
            num_rows: 0,
            store,
        }
    }

    pub fn options(&self) -> &RecyclerOptions {
        &self.options
    }

    /// Clones the current options, applies `f`, then installs the result.
    pub fn update_options(&mut self, f: impl FnOnce(&mut RecyclerOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.store.pools.set_order(next.pool_order);
        self.store.shared.borrow_mut().on_settle_change = next.on_settle_change.clone();
        self.options = next;
    }

    pub fn host(&self) -> &H {
        &self.store.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.store.host
    }

    /// A callback table bound to this engine (the same one items receive on acquisition).
    pub fn hooks(&self) -> ListHooks<D::Index, H::Handle> {
        ListHooks::new(&self.store.shared)
    }

    /// Registers the prototype for `template`, returning the one it replaces.
    ///
    /// Parked instances of a replaced prototype stay pooled and keep being reused.
    pub fn register_template(
        &mut self,
        template: D::Template,
        prototype: H::Prototype,
    ) -> Option<H::Prototype> {
        rdebug!("register_template");
        self.store.pools.register(template, prototype)
    }

    pub fn has_template(&self, template: &D::Template) -> bool {
        self.store.pools.contains(template)
    }

    pub fn parked_len(&self, template: &D::Template) -> usize {
        self.store.pools.parked_len(template)
    }

    pub fn parked_total(&self) -> usize {
        self.store.pools.total_parked()
    }

    /// Removes every parked instance of `template` and hands them to the caller for disposal.
    ///
    /// Their [`ItemId`]s go stale.
    pub fn drain_pool(&mut self, template: &D::Template) -> Vec<H::Item> {
        let ids = self.store.pools.drain(template);
        let items: Vec<_> = ids
            .into_iter()
            .filter_map(|id| self.store.items.remove(id).map(|slot| slot.item))
            .collect();
        rdebug!(drained = items.len(), "drain_pool");
        items
    }

    /// Replaces the dataset.
    ///
    /// Every active instance goes back to its pool, the active map is cleared and the data offset
    /// resets to zero, all before this returns. `None` means "no data". Returns the previous
    /// dataset.
    pub fn set_data(&mut self, data: Option<Vec<D>>) -> Option<Vec<D>> {
        #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
        let released = self.store.release_all();
        self.data_offset = 0;
        rdebug!(
            released,
            len = data.as_ref().map_or(0, Vec::len),
            "set_data"
        );
        core::mem::replace(&mut self.data, data)
    }

    pub fn data(&self) -> Option<&[D]> {
        self.data.as_deref()
    }

    pub fn data_len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    pub fn data_offset(&self) -> i64 {
        self.data_offset
    }

    /// Sets the offset added to each entry's dataset position (negative when scrolled forward).
    pub fn set_data_offset(&mut self, data_offset: i64) {
        self.data_offset = data_offset;
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn set_num_rows(&mut self, num_rows: usize) {
        self.num_rows = num_rows;
    }

    pub fn set_window(&mut self, data_offset: i64, num_rows: usize) {
        self.data_offset = data_offset;
        self.num_rows = num_rows;
    }

    pub fn visible_window(&self) -> VisibleWindow {
        VisibleWindow::new(
            self.num_rows,
            self.options.overscan_before,
            self.options.overscan_after,
        )
    }

    /// Runs one visibility pass over the whole dataset.
    ///
    /// Rows whose position (`i + data_offset`) falls outside [`Recycler::visible_window`] release
    /// their instance. Rows inside it are acquired if needed and positioned. When the list is
    /// settling and nothing touched the pass, settling ends.
    pub fn update_items(&mut self) -> PassStats {
        let mut stats = PassStats::default();
        let window = self.visible_window();
        let offset = self.data_offset;
        let releases_touch = self.options.settle_policy == SettlePolicy::AnyWork;

        self.store.shared.borrow_mut().settle.begin_pass();

        if let Some(data) = self.data.as_deref() {
            for (i, datum) in data.iter().enumerate() {
                let pos = (i as i64).saturating_add(offset);
                if !window.contains(pos) {
                    if self.store.release(datum.index()) {
                        stats.released += 1;
                        if releases_touch {
                            self.store.touch();
                        }
                    }
                    continue;
                }

                let id = match self.store.bound(datum.index()) {
                    Some(id) => id,
                    None => match self.store.acquire(datum) {
                        Ok((id, acquired)) => {
                            stats.acquired += 1;
                            match acquired {
                                Acquired::Reused => stats.reused += 1,
                                Acquired::Instantiated => stats.instantiated += 1,
                                Acquired::Existing => {}
                            }
                            self.store.touch();
                            id
                        }
                        Err(_) => {
                            stats.skipped += 1;
                            continue;
                        }
                    },
                };

                stats.positioned += 1;
                if self.store.position(id, i) == Placement::Moving {
                    stats.moving += 1;
                    self.store.touch();
                }
            }
        }

        let (settled, callback) = self.store.shared.borrow_mut().finish_pass();
        stats.settled = settled;
        notify_settle(callback, SettleState::Idle);

        rtrace!(
            positioned = stats.positioned,
            acquired = stats.acquired,
            released = stats.released,
            skipped = stats.skipped,
            settled,
            "update_items"
        );
        stats
    }

    /// Acquires (or returns the already bound) instance for the entry at `position` in the
    /// dataset.
    pub fn acquire_at(&mut self, position: usize) -> Result<ItemId, RecycleError> {
        let Some(datum) = self.data.as_deref().and_then(|d| d.get(position)) else {
            rwarn!(position, "acquire_at: no data entry");
            return Err(RecycleError::MissingEntry { position });
        };
        self.store.acquire(datum).map(|(id, _)| id)
    }

    /// Returns the instance bound to `index` to its pool. `false` if nothing was bound.
    pub fn release(&mut self, index: &D::Index) -> bool {
        let released = self.store.release(index);
        if released {
            rtrace!("release");
        }
        released
    }

    pub fn item_id(&self, index: &D::Index) -> Option<ItemId> {
        self.store.bound(index)
    }

    pub fn item(&self, id: ItemId) -> Option<&H::Item> {
        self.store.items.get(id).map(|slot| &slot.item)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut H::Item> {
        self.store.items.get_mut(id).map(|slot| &mut slot.item)
    }

    /// The instance bound to `index`, if the row is visible.
    pub fn list_item(&self, index: &D::Index) -> Option<&H::Item> {
        self.item(self.item_id(index)?)
    }

    pub fn list_item_mut(&mut self, index: &D::Index) -> Option<&mut H::Item> {
        let id = self.item_id(index)?;
        self.item_mut(id)
    }

    pub fn location(&self, id: ItemId) -> Option<ItemLocation<D::Index>> {
        let slot = self.store.items.get(id)?;
        Some(match &slot.bound {
            Some(index) => ItemLocation::Active(index.clone()),
            None => ItemLocation::Parked,
        })
    }

    pub fn active_len(&self) -> usize {
        self.store.shared.borrow().active.len()
    }

    /// Every instance the engine owns, active and parked.
    pub fn instance_count(&self) -> usize {
        self.store.items.len()
    }

    pub fn for_each_active(&self, mut f: impl FnMut(&D::Index, &H::Item)) {
        for slot in self.store.items.values() {
            if let Some(index) = &slot.bound {
                f(index, &slot.item);
            }
        }
    }

    /// Snapshot of the active map, in no particular order.
    pub fn active_indices(&self) -> Vec<D::Index> {
        self.store
            .shared
            .borrow()
            .active
            .iter()
            .map(|(index, _)| index.clone())
            .collect()
    }

    pub fn settle_state(&self) -> SettleState {
        self.store.shared.borrow().settle.state()
    }

    pub fn is_settling(&self) -> bool {
        self.settle_state() == SettleState::Settling
    }

    /// Enters `Settling`. Idempotent.
    pub fn start_settling(&mut self) {
        let callback = self.store.shared.borrow_mut().start_settling();
        notify_settle(callback, SettleState::Settling);
    }

    pub fn end_settling(&mut self) {
        let callback = self.store.shared.borrow_mut().end_settling();
        notify_settle(callback, SettleState::Idle);
    }

    /// Keeps the list settling through the next pass.
    pub fn signal_motion(&mut self) {
        self.store.shared.borrow_mut().settle.signal_motion();
    }

    pub fn set_row_grabbed(&mut self, index: D::Index, handle: H::Handle, grabbed: bool) {
        self.store
            .shared
            .borrow_mut()
            .grabs
            .set(index, handle, grabbed);
    }

    /// The instance bound to the row `handle` holds, if any.
    pub fn grabbed_row(&self, handle: &H::Handle) -> Option<&H::Item> {
        let id = self.store.shared.borrow().grabbed_item(handle);
        self.item(id?)
    }

    pub fn grabbed_index(&self, handle: &H::Handle) -> Option<D::Index> {
        self.store.shared.borrow().grabs.index_for(handle).cloned()
    }

    pub fn grab_count(&self) -> usize {
        self.store.shared.borrow().grabs.len()
    }
}

impl<D: ItemData, H: ItemHost<D>> fmt::Debug for Recycler<D, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recycler")
            .field("options", &self.options)
            .field("data_len", &self.data_len())
            .field("data_offset", &self.data_offset)
            .field("num_rows", &self.num_rows)
            .field("active", &self.active_len())
            .field("instances", &self.instance_count())
            .field("settle", &self.settle_state())
            .finish()
    }
}
