//! Data pipeline core for an interactive car prices dashboard.
//!
//! The presentation layer (widgets and charts) lives outside this crate: it
//! loads a dataset once per session, then feeds widget changes into
//! [`state::SessionState`] and renders the derived [`data::model::Dataset`]
//! views it gets back.

pub mod data;
pub mod state;

pub use data::error::DataError;
pub use data::model::{CellValue, Dataset, Record};
pub use state::SessionState;
