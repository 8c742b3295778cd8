//! Live result feeds.
//!
//! Every successful write publishes a [`Change`] on the [`ChangeBus`]. Each
//! watched view ([`FeedKey`]) has one pump task that recomputes the view when a
//! relevant change arrives and hands the latest payload to every subscriber.
//! The pump runs only while at least one [`FeedSubscription`] is alive.

mod changes;
mod registry;
mod source;

pub use changes::{Change, ChangeBus};
pub use registry::{FeedRegistry, FeedSubscription};
pub use source::{DbFeedSource, FeedKey, FeedPayload, FeedSource};
