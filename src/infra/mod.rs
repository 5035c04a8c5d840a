//! Feed access, the on-disk snapshot, and the search trigger.

pub mod dispatch;
pub mod feed;
pub mod loader;
pub mod snapshot;
