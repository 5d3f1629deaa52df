use serde::Serialize;
use std::{fmt::Display, str::FromStr};

/// A single country record.
///
/// `name` and `continent` are never empty inside a [`crate::records::RecordStore`].
/// Both are kept with their original casing for display and compared
/// case-insensitively everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Country {
    pub name: String,
    pub population: u64,
    pub area: u64,
    pub continent: String,
}

impl Country {
    pub fn new(name: &str, population: u64, area: u64, continent: &str) -> Country {
        Country {
            name: name.to_string(),
            population,
            area,
            continent: continent.to_string(),
        }
    }

    /// Key used for case-insensitive comparisons of the name.
    pub fn name_key(&self) -> String {
        fold(&self.name)
    }

    /// Returns true when `other` names this country, ignoring case.
    pub fn is_named(&self, other: &str) -> bool {
        self.name_key() == fold(other)
    }

    pub fn value_of(&self, field: RangeField) -> u64 {
        match field {
            RangeField::Population => self.population,
            RangeField::Area => self.area,
        }
    }
}

impl Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - Population: {}, Area: {} km², Continent: {}",
            self.name, self.population, self.area, self.continent
        )
    }
}

/// Lowercases after trimming, the canonical form for text comparisons.
pub(crate) fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Fields a store can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Population,
    Area,
}

/// Numeric fields accepted by range filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    Population,
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_descending(descending: bool) -> SortOrder {
        if descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}

/// Error returned when a field name does not match any known field.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field => {0}")]
pub struct UnknownField(pub String);

impl FromStr for SortField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "name" => Ok(SortField::Name),
            "population" => Ok(SortField::Population),
            "area" => Ok(SortField::Area),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

impl FromStr for RangeField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match fold(s).as_str() {
            "population" => Ok(RangeField::Population),
            "area" => Ok(RangeField::Area),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Population => write!(f, "population"),
            Self::Area => write!(f, "area"),
        }
    }
}

impl Display for RangeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Population => write!(f, "population"),
            Self::Area => write!(f, "area"),
        }
    }
}
