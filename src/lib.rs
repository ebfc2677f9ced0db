//! Run log viewer (runlog)
//!
//! Turns a streamed run log (one message per line) into a hierarchical
//! tree of entries, and maintains a filterable, collapsible, lazily
//! measured view over that tree.
//!
//! Data flows one way:
//!
//! ```text
//! source -> decoder -> treebuild -> host --(events)--> state -> view
//! ```
//!
//! The `model`, `view_state` and `state` modules are the pure core; the
//! `source`, `host`, `logging` and `config` modules are the shell around it.

pub mod config;
pub mod decoder;
pub mod host;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod treebuild;
pub mod view;
pub mod view_state;
