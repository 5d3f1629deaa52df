//! # CountryDesk
//!
//! A terminal application for keeping a small table of countries (name,
//! population, area, continent) in a CSV file, with interactive editing,
//! searching, filtering, sorting and statistics.
//!
//! ## Features
//!
//! - **Records** - An ordered, in-memory [`RecordStore`] with unique names ignoring case
//! - **Queries** - Substring search, continent and range filters, aggregate statistics
//! - **Storage** - CSV load with per-row warnings, atomic save, seed dataset
//! - **Input Sanitization & Validation** - Composable filters for prompt answers
//! - **Interactive Session** - Menu loop that saves on Ctrl+C or end of input
//!
//! ## Example
//! ```rust
//! use countrydesk::records::{RecordStore, SortField, SortOrder, query};
//! use countrydesk::storage;
//!
//! let mut store = RecordStore::from_loaded(storage::seed_countries());
//! store.sort(SortField::Population, SortOrder::Descending);
//! assert_eq!(store.get(0).unwrap().name, "Brasil");
//!
//! let stats = query::statistics(&store).unwrap();
//! assert_eq!(stats.continents["América"], 2);
//! ```
//!
//! The interactive program lives in the `countrydesk-cli` crate.

pub mod config;
pub mod records;
pub mod session;
pub mod storage;
pub mod utils;

pub use config::{Config, SeedPolicy};
pub use records::{Country, RecordStore};
pub use session::{Outcome, Session};
