//! # Records
//!
//! The country record model, the session's [`RecordStore`] and the read-only
//! [`query`] helpers that run over it.
pub mod country;
pub use country::{Country, RangeField, SortField, SortOrder, UnknownField};

pub mod store;
pub use store::{RecordStore, StoreErrors};

pub mod query;
pub use query::{Selection, Statistics};
