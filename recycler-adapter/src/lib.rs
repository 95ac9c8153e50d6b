//! Adapter utilities for the `recycler` crate.
//!
//! The `recycler` crate only needs a data offset and a row budget per pass. This crate provides
//! the small, framework-neutral layer most hosts put in front of it:
//!
//! - A pixel scroll model over fixed-size rows ([`RowScroll`])
//! - Drag gestures that start settling, and a snap-to-row tween when they end ([`Controller`])
//!
//! This crate is intentionally framework-agnostic and does no inertia or velocity tracking.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod controller;
mod options;
mod scroll;
mod tween;


pub use controller::Controller;
pub use options::ScrollOptions;
pub use scroll::RowScroll;
pub use tween::{Easing, Tween};
