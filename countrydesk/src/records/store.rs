use super::country::{Country, SortField, SortOrder, fold};
use std::cmp::Ordering;

/// Errors raised when a mutation would break a store invariant.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreErrors {
    #[error("A country named {0} already exists")]
    DuplicateName(String),
    #[error("Country fields name and continent can't be empty")]
    EmptyField,
    #[error("No country at position {0}")]
    OutOfBounds(usize),
}

/// The in-memory, ordered collection of countries for one session.
///
/// The store is owned by the session loop and lent out to every operation.
/// Records are never removed. Only population and area can change after
/// insertion.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordStore {
    countries: Vec<Country>,
}

impl RecordStore {
    pub fn new() -> RecordStore {
        RecordStore::default()
    }

    /// Builds a store from loaded records as-is.
    ///
    /// Names are not deduplicated here; files may legitimately contain the
    /// same name twice and those rows are kept as separate entries.
    pub fn from_loaded(countries: Vec<Country>) -> RecordStore {
        RecordStore { countries }
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn get(&self, index: usize) -> Option<&Country> {
        self.countries.get(index)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.countries.iter().any(|c| c.is_named(name))
    }

    pub fn names(&self) -> Vec<String> {
        self.countries.iter().map(|c| c.name.clone()).collect()
    }

    /// Appends a new country after checking the add-time invariants.
    ///
    /// # Errors
    /// - [`StoreErrors::EmptyField`] if name or continent is blank.
    /// - [`StoreErrors::DuplicateName`] if the name collides ignoring case.
    ///
    /// The store is left untouched on error.
    pub fn add(&mut self, country: Country) -> Result<(), StoreErrors> {
        let name = country.name.trim();
        let continent = country.continent.trim();
        if name.is_empty() || continent.is_empty() {
            return Err(StoreErrors::EmptyField);
        }
        if self.contains_name(name) {
            return Err(StoreErrors::DuplicateName(name.to_string()));
        }

        self.countries.push(Country {
            name: name.to_string(),
            continent: continent.to_string(),
            ..country
        });
        Ok(())
    }

    /// Replaces population and/or area of the country at `index`.
    /// `None` keeps the current value.
    pub fn update(
        &mut self,
        index: usize,
        population: Option<u64>,
        area: Option<u64>,
    ) -> Result<&Country, StoreErrors> {
        let country = self
            .countries
            .get_mut(index)
            .ok_or(StoreErrors::OutOfBounds(index))?;

        if let Some(population) = population {
            country.population = population;
        }
        if let Some(area) = area {
            country.area = area;
        }
        Ok(country)
    }

    /// Stable sort by `field`. Ties keep their current relative order in both
    /// directions.
    pub fn sort(&mut self, field: SortField, order: SortOrder) {
        let compare: fn(&Country, &Country) -> Ordering = match field {
            SortField::Name => |a, b| fold(&a.name).cmp(&fold(&b.name)),
            SortField::Population => |a, b| a.population.cmp(&b.population),
            SortField::Area => |a, b| a.area.cmp(&b.area),
        };

        match order {
            SortOrder::Ascending => self.countries.sort_by(compare),
            SortOrder::Descending => self.countries.sort_by(|a, b| compare(b, a)),
        }
    }

    /// Sorts by a field given by name. Unknown names leave the order as is
    /// and return `false`.
    pub fn sort_by_field_name(&mut self, field: &str, descending: bool) -> bool {
        match field.parse::<SortField>() {
            Ok(field) => {
                self.sort(field, SortOrder::from_descending(descending));
                true
            }
            Err(_) => false,
        }
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Country;
    type IntoIter = std::slice::Iter<'a, Country>;

    fn into_iter(self) -> Self::IntoIter {
        self.countries.iter()
    }
}
