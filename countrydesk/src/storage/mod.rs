//! # Storage
//!
//! CSV persistence for the record store.
//!
//! The file carries a header row with the columns `name,population,area,continent`
//! followed by one row per country, UTF-8 encoded, with standard CSV quoting.
//!
//! - [`load`] reads and validates a file. Rows with a blank name or continent
//!   are dropped, malformed numbers are coerced to `0`, and every such event
//!   is returned as a [`RowWarning`] and logged.
//! - [`save`] writes the whole store atomically.
//! - [`write_seed`] materializes [`seed_countries`] when no data exists yet.
//!
//! ## Example
//! ```rust,no_run
//! use countrydesk::storage::{self, LoadErrors};
//! use std::{io, path::Path};
//!
//! let path = Path::new("countries.csv");
//! let report = match storage::load(path) {
//!     Ok(report) => report,
//!     Err(LoadErrors::NotFound(_)) => {
//!         storage::write_seed(path).unwrap();
//!         storage::load(path).unwrap()
//!     }
//!     Err(e) => panic!("{e}"),
//! };
//! println!("{} countries", report.countries.len());
//! ```
use crate::records::Country;
use std::{io, path::Path};

pub mod loader;
pub use loader::{LoadErrors, LoadReport, RowWarning, from_reader, load};

pub mod persister;
pub use persister::{SaveErrors, save, to_writer};

/// Column names, in file order.
pub const HEADERS: [&str; 4] = ["name", "population", "area", "continent"];

/// The dataset written when the data file doesn't exist yet.
pub fn seed_countries() -> Vec<Country> {
    vec![
        Country::new("Argentina", 45376763, 2780400, "América"),
        Country::new("Japón", 125800000, 377975, "Asia"),
        Country::new("Brasil", 213993437, 8515767, "América"),
        Country::new("Alemania", 83149300, 357022, "Europa"),
    ]
}

pub fn write_seed(path: &Path) -> Result<(), SaveErrors> {
    save(path, &seed_countries())?;
    tracing::info!(path = %path.display(), "Seed dataset written");
    Ok(())
}

/// Unwraps the I/O error behind a csv failure; anything else is invalid data.
pub(crate) fn into_io(e: csv::Error) -> io::Error {
    match e.into_kind() {
        csv::ErrorKind::Io(e) => e,
        other => io::Error::new(io::ErrorKind::InvalidData, format!("{:?}", other)),
    }
}
