use crate::{ListHooks, Placement, RecyclerKey};

/// A logical row of the dataset.
///
/// The `index` identifies the row across passes and dataset swaps (it is the key of the active
/// map), and the `template` selects which prototype renders it.
pub trait ItemData {
    type Index: RecyclerKey + Clone;
    type Template: RecyclerKey + Clone;

    fn index(&self) -> &Self::Index;
    fn template(&self) -> &Self::Template;
}

/// A materialized, reusable visual item.
///
/// `G` is the grab handle type of the host (see [`ItemHost::Handle`]).
pub trait ListItem<D: ItemData, G> {
    /// Rebinds the item to `data` without recreating it.
    fn setup(&mut self, data: &D);

    /// Called with `false` when the item is parked and `true` when it leaves the pool.
    fn set_active(&mut self, active: bool) {
        let _ = active;
    }

    /// Installs the engine's callback table. Called on every acquisition.
    fn bind_hooks(&mut self, hooks: ListHooks<D::Index, G>) {
        let _ = hooks;
    }
}

/// The environment the engine renders into.
///
/// This bundles the collaborators the engine drives but does not implement: instantiation,
/// interface wiring and the per-row positioning callback.
pub trait ItemHost<D: ItemData> {
    /// Template prototype registered per template id.
    type Prototype;
    /// Interaction handle used by grab tracking (e.g. an input ray).
    type Handle: PartialEq;
    type Item: ListItem<D, Self::Handle>;

    /// Creates a fresh instance from `prototype`. Only called on a pool miss.
    fn instantiate(&mut self, prototype: &Self::Prototype) -> Self::Item;

    /// Wires a freshly instantiated item into the host. Runs once per instance, before its first
    /// `setup`.
    fn connect(&mut self, item: &mut Self::Item) {
        let _ = item;
    }

    /// Positions a visible item at `visible_offset`, the entry's position in the dataset.
    ///
    /// Runs every pass for every visible row, including rows acquired during the pass.
    fn position(&mut self, item: &mut Self::Item, visible_offset: usize) -> Placement;
}
