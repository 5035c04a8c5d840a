//! Listing data, display formatting, and dashboard state.

pub mod app_state;
pub mod format;
pub mod listing;
pub mod poll;
pub mod sample;
pub mod stats;
pub mod token;

pub use app_state::{AppState, Busy, LoadSource, StatusKind, StatusLine};
pub use listing::{Condition, Listing, ResultSet};
pub use poll::{PollBudget, PollOutcome, PollStep};
pub use token::ApiToken;
