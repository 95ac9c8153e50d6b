//! A headless, recycling list-view engine.
//!
//! This crate renders a large, index-addressed dataset through a small pool of reusable item
//! instances. Only rows inside the visible window hold an instance; rows that scroll out return
//! theirs to a per-template pool instead of destroying it, and rows that scroll in take one from
//! the pool before anything new is instantiated.
//!
//! It is UI-agnostic. A host layer is expected to provide:
//! - the data offset and row budget for each pass
//! - instantiation and wiring of fresh items ([`ItemHost`])
//! - the per-row positioning callback
//!
//! For a scroll-driven provider of offsets and row budgets, see the `recycler-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod active;
mod error;
mod grab;
mod hooks;
mod key;
mod options;
mod pool;
mod recycler;
mod settle;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use error::RecycleError;
pub use hooks::ListHooks;
pub use key::RecyclerKey;
pub use options::{RecyclerOptions, SettleCallback};
pub use recycler::Recycler;
pub use traits::{ItemData, ItemHost, ListItem};
pub use types::{
    ItemId, ItemLocation, PassStats, Placement, PoolOrder, SettlePolicy, SettleState,
    VisibleWindow,
};
