//! Application state for the run-log view model.
//!
//! - `expanded`: ExpandedSet - ids whose children are shown
//! - `store`: EntryStore - latest entry sequence and update index
//! - `view_state`: ViewState value plus ActiveIndex and ViewSettings
//! - `log_state`: LogState - ties the above together and recomputes the
//!   filtered view on every change

pub mod expanded;
pub mod log_state;
pub mod store;
pub mod view_state;

pub use expanded::ExpandedSet;
pub use log_state::LogState;
pub use store::EntryStore;
pub use view_state::{ActiveIndex, ViewSettings, ViewState};
