//! Data synchronization core for the photo feed.
//!
//! `FeedController` owns the state machine and sequencing tokens and is the
//! only writer of the published `FeedState`. `merge` holds the pure
//! pagination merge policies and `debounce` the type-to-search policy; both
//! are orchestrated exclusively by the controller.

mod controller;
mod debounce;
mod merge;
mod state;

pub use controller::{FeedController, FeedOptions};
pub use state::{FeedState, Phase};
