use super::{HEADERS, into_io};
use crate::records::Country;
use std::{
    fmt::Display,
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

/// Errors that prevent a source from being read at all.
///
/// Problems with individual rows never surface here, they are reported as
/// [`RowWarning`]s inside the [`LoadReport`].
#[derive(Debug, thiserror::Error)]
pub enum LoadErrors {
    #[error("File {} not found", .0.display())]
    NotFound(PathBuf),
    #[error("Couldn't read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A recoverable problem found in one data row. Rows are numbered from 1,
/// not counting the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowWarning {
    /// The row was dropped because a required text field was blank.
    MissingText { row: usize, field: &'static str },
    /// A numeric field was not a non-negative integer and was replaced by 0.
    CoercedNumber {
        row: usize,
        field: &'static str,
        raw: String,
    },
    /// The row couldn't be decoded (bad UTF-8, broken quoting) and was dropped.
    Unreadable { row: usize, reason: String },
}

impl Display for RowWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingText { row, field } => {
                write!(f, "Row {}: empty {}, row skipped", row, field)
            }
            Self::CoercedNumber { row, field, raw } => {
                write!(f, "Row {}: invalid {} {:?}, using 0", row, field, raw)
            }
            Self::Unreadable { row, reason } => {
                write!(f, "Row {}: unreadable ({}), row skipped", row, reason)
            }
        }
    }
}

/// Records accepted from a source, in file order, plus the warnings raised
/// while reading it.
#[derive(Debug, Default, PartialEq)]
pub struct LoadReport {
    pub countries: Vec<Country>,
    pub warnings: Vec<RowWarning>,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| !matches!(w, RowWarning::CoercedNumber { .. }))
            .count()
    }

    fn warn(&mut self, warning: RowWarning) {
        emit(&mut self.warnings, warning);
    }
}

/// Position of each known column in the header. Absent columns read as
/// empty text.
struct Columns([Option<usize>; 4]);

impl Columns {
    const NAME: usize = 0;
    const POPULATION: usize = 1;
    const AREA: usize = 2;
    const CONTINENT: usize = 3;

    fn locate(headers: &csv::StringRecord) -> Columns {
        Columns(HEADERS.map(|expected| {
            let found = headers.iter().position(|h| h == expected);
            if found.is_none() {
                tracing::warn!(column = expected, "Header is missing a column");
            }
            found
        }))
    }

    fn get<'r>(&self, record: &'r csv::StringRecord, column: usize) -> &'r str {
        self.0[column].and_then(|i| record.get(i)).unwrap_or("")
    }
}

/// Reads every valid country from the CSV file at `path`.
///
/// # Errors
/// - [`LoadErrors::NotFound`] when the file doesn't exist, so the caller can
///   offer the seed dataset.
/// - [`LoadErrors::Io`] for any other failure opening or reading the file.
pub fn load(path: &Path) -> Result<LoadReport, LoadErrors> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadErrors::NotFound(path.to_path_buf()),
        _ => LoadErrors::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let report = from_reader(file).map_err(|source| LoadErrors::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        path = %path.display(),
        loaded = report.countries.len(),
        warnings = report.warnings.len(),
        "Loaded countries"
    );
    Ok(report)
}

/// Same as [`load`] over any reader. Only I/O failures are errors.
pub fn from_reader<R: Read>(reader: R) -> Result<LoadReport, io::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns = Columns::locate(reader.headers().map_err(into_io)?);

    let mut report = LoadReport::default();
    for (i, record) in reader.records().enumerate() {
        let row_number = i + 1;
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(into_io(e)),
            Err(e) => {
                report.warn(RowWarning::Unreadable {
                    row: row_number,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if let Some(country) = validate(row_number, &columns, &record, &mut report.warnings)
        {
            report.countries.push(country);
        }
    }
    Ok(report)
}

fn validate(
    row: usize,
    columns: &Columns,
    record: &csv::StringRecord,
    warnings: &mut Vec<RowWarning>,
) -> Option<Country> {
    let name = columns.get(record, Columns::NAME).trim();
    let continent = columns.get(record, Columns::CONTINENT).trim();

    for (field, value) in [("name", name), ("continent", continent)] {
        if value.is_empty() {
            emit(warnings, RowWarning::MissingText { row, field });
            return None;
        }
    }

    let population = columns.get(record, Columns::POPULATION);
    let area = columns.get(record, Columns::AREA);

    let population = coerce_to_zero(row, "population", population, warnings);
    let area = coerce_to_zero(row, "area", area, warnings);
    Some(Country::new(name, population, area, continent))
}

/// Load-time numeric policy: anything that isn't plain digits becomes 0.
///
/// Surrounding whitespace is ignored. Values too large for `u64` are treated
/// as malformed as well.
fn coerce_to_zero(
    row: usize,
    field: &'static str,
    raw: &str,
    warnings: &mut Vec<RowWarning>,
) -> u64 {
    let value = raw.trim();
    let parsed = if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        value.parse::<u64>().ok()
    } else {
        None
    };

    parsed.unwrap_or_else(|| {
        emit(
            warnings,
            RowWarning::CoercedNumber {
                row,
                field,
                raw: raw.to_string(),
            },
        );
        0
    })
}

fn emit(warnings: &mut Vec<RowWarning>, warning: RowWarning) {
    tracing::warn!("{}", warning);
    warnings.push(warning);
}
