use std::sync::atomic::{AtomicUsize, Ordering};

pub mod assets;
pub mod persistence;

pub const APP_NAME: &str = "Listing Dashboard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const USER_AGENT: &str = concat!("listing-dashboard/", env!("CARGO_PKG_VERSION"));

static ID_COUNTER: AtomicUsize = AtomicUsize::new(1);

pub fn generate_id(prefix: &str) -> String {
    let value = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{value}")
}
