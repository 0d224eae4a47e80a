//! Scroll layer - locks the two views' vertical and horizontal positions
//!
//! # Module Structure
//!
//! - `animated`: AnimatedOffset - ease-out offset sampled at explicit timestamps
//! - `synchronizer`: ScrollSynchronizer - scroll formula, top padding, offset favouring focus

pub mod animated;
pub mod synchronizer;

pub use animated::{ease_out_expo, AnimatedOffset};
pub use synchronizer::{ScrollState, ScrollSynchronizer, SyncTick};
