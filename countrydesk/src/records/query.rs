//! # Query Engine
//!
//! Read-only operations over a [`RecordStore`]. Every function here borrows
//! the store and returns references into it, preserving the store's current
//! order. Sorting is the only operation that touches the order and lives on
//! [`RecordStore::sort`].
//!
//! ## Example
//! ```rust
//! use countrydesk::records::{Country, RangeField, RecordStore, query};
//!
//! let store = RecordStore::from_loaded(vec![
//!     Country::new("Japón", 125800000, 377975, "Asia"),
//!     Country::new("Alemania", 83149300, 357022, "Europa"),
//! ]);
//!
//! let hits = query::search(&store, "ALE");
//! assert_eq!(hits.len(), 1);
//!
//! let mid = query::filter_by_range(&store, RangeField::Population, 80_000_000, 130_000_000);
//! assert_eq!(mid.len(), 2);
//! ```
use super::country::{Country, RangeField, fold};
use super::store::RecordStore;
use indexmap::IndexMap;

/// Countries whose name contains `term`, ignoring case.
pub fn search<'a>(store: &'a RecordStore, term: &str) -> Vec<&'a Country> {
    search_positions(store, term)
        .into_iter()
        .filter_map(|i| store.get(i))
        .collect()
}

/// Positions in the store of every [`search`] hit.
pub fn search_positions(store: &RecordStore, term: &str) -> Vec<usize> {
    let term = term.to_lowercase();
    store
        .countries()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.name.to_lowercase().contains(&term))
        .map(|(i, _)| i)
        .collect()
}

/// Outcome of resolving a name (or part of it) to a single country.
#[derive(Debug, PartialEq, Eq)]
pub enum Selection {
    NotFound,
    Single(usize),
    /// More than one hit. Holds the candidate store positions in order; the
    /// caller must disambiguate with [`Selection::pick`].
    Ambiguous(Vec<usize>),
}

impl Selection {
    /// Resolves a 1-based choice among ambiguous candidates.
    pub fn pick(&self, choice: usize) -> Option<usize> {
        match self {
            Selection::Ambiguous(candidates) => {
                choice.checked_sub(1).and_then(|i| candidates.get(i)).copied()
            }
            Selection::Single(index) if choice == 1 => Some(*index),
            _ => None,
        }
    }
}

pub fn select_by_name(store: &RecordStore, term: &str) -> Selection {
    let mut hits = search_positions(store, term);
    match hits.len() {
        0 => Selection::NotFound,
        1 => Selection::Single(hits.remove(0)),
        _ => Selection::Ambiguous(hits),
    }
}

pub fn filter_by_continent<'a>(store: &'a RecordStore, continent: &str) -> Vec<&'a Country> {
    let wanted = continent.to_lowercase();
    store
        .into_iter()
        .filter(|c| c.continent.to_lowercase() == wanted)
        .collect()
}

/// Countries with `field` inside the closed interval `[min, max]`.
pub fn filter_by_range(
    store: &RecordStore,
    field: RangeField,
    min: u64,
    max: u64,
) -> Vec<&Country> {
    store
        .into_iter()
        .filter(|c| (min..=max).contains(&c.value_of(field)))
        .collect()
}

/// Same as [`filter_by_range`] with the field given by name. Anything other
/// than `population` or `area` matches nothing.
pub fn filter_by_range_name<'a>(
    store: &'a RecordStore,
    field: &str,
    min: u64,
    max: u64,
) -> Vec<&'a Country> {
    match field.parse::<RangeField>() {
        Ok(field) => filter_by_range(store, field, min, max),
        Err(_) => Vec::new(),
    }
}

/// Aggregate figures over a non-empty store.
#[derive(Debug, PartialEq)]
pub struct Statistics<'a> {
    pub most_populated: &'a Country,
    pub least_populated: &'a Country,
    pub mean_population: f64,
    pub mean_area: f64,
    /// Continent (as stored, case-sensitive) to count, in first-appearance order.
    pub continents: IndexMap<String, usize>,
}

/// Computes [`Statistics`], or `None` if the store holds no records.
///
/// Ties on population resolve to the earliest record in store order.
pub fn statistics(store: &RecordStore) -> Option<Statistics<'_>> {
    let mut countries = store.into_iter();
    let first = countries.next()?;

    let mut most = first;
    let mut least = first;
    let mut population_sum = first.population as f64;
    let mut area_sum = first.area as f64;
    let mut continents: IndexMap<String, usize> = IndexMap::new();
    continents.insert(first.continent.clone(), 1);

    for country in countries {
        if country.population > most.population {
            most = country;
        }
        if country.population < least.population {
            least = country;
        }
        population_sum += country.population as f64;
        area_sum += country.area as f64;
        *continents.entry(country.continent.clone()).or_insert(0) += 1;
    }

    let total = store.len() as f64;
    Some(Statistics {
        most_populated: most,
        least_populated: least,
        mean_population: population_sum / total,
        mean_area: area_sum / total,
        continents,
    })
}

/// Continent names are compared after trimming and lowercasing.
pub fn distinct_continents(store: &RecordStore) -> Vec<&str> {
    let mut seen: IndexMap<String, &str> = IndexMap::new();
    for country in store {
        seen.entry(fold(&country.continent))
            .or_insert(country.continent.as_str());
    }
    seen.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed_countries;

    fn seed() -> RecordStore {
        RecordStore::from_loaded(seed_countries())
    }

    fn names(found: &[&Country]) -> Vec<String> {
        found.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_query_search_seed_an() {
        // argentina, japón and brasil never have "a" followed by "n".
        let store = seed();
        assert_eq!(names(&search(&store, "an")), vec!["Alemania"]);
    }

    #[test]
    fn test_query_search_is_case_insensitive() {
        let store = seed();
        assert_eq!(names(&search(&store, "BRA")), vec!["Brasil"]);
        assert_eq!(names(&search(&store, "A")).len(), 4);
        assert!(search(&store, "xyz").is_empty());
    }

    #[test]
    fn test_query_search_handles_accents() {
        let store = seed();
        assert_eq!(names(&search(&store, "PÓN")), vec!["Japón"]);
    }

    #[test]
    fn test_query_select_by_name() {
        let store = seed();
        assert_eq!(select_by_name(&store, "zzz"), Selection::NotFound);
        assert_eq!(select_by_name(&store, "japón"), Selection::Single(1));

        assert_eq!(select_by_name(&store, "ar"), Selection::Single(0));
        assert_eq!(select_by_name(&store, "an"), Selection::Single(3));
        assert_eq!(
            select_by_name(&store, "N"),
            Selection::Ambiguous(vec![0, 1, 3])
        );
    }

    #[test]
    fn test_query_selection_pick() {
        let store = seed();
        assert_eq!(select_by_name(&store, "il").pick(1), Some(2));
        assert_eq!(select_by_name(&store, "il").pick(2), None);

        let selection = select_by_name(&store, "a");
        assert_eq!(selection.pick(1), Some(0));
        assert_eq!(selection.pick(4), Some(3));
        assert_eq!(selection.pick(0), None);
        assert_eq!(selection.pick(5), None);
    }

    #[test]
    fn test_query_filter_by_continent() {
        let store = seed();
        assert_eq!(
            names(&filter_by_continent(&store, "américa")),
            vec!["Argentina", "Brasil"]
        );
        assert!(filter_by_continent(&store, "Oceanía").is_empty());
    }

    #[test]
    fn test_query_filter_by_population_range() {
        let store = seed();
        let found = filter_by_range(&store, RangeField::Population, 80000000, 130000000);
        assert_eq!(names(&found), vec!["Japón", "Alemania"]);
    }

    #[test]
    fn test_query_filter_by_range_is_inclusive() {
        let store = seed();
        let found = filter_by_range(&store, RangeField::Area, 357022, 377975);
        assert_eq!(names(&found), vec!["Japón", "Alemania"]);
        assert!(filter_by_range(&store, RangeField::Area, 10, 1).is_empty());
    }

    #[test]
    fn test_query_filter_by_range_unknown_field() {
        let store = seed();
        assert!(filter_by_range_name(&store, "name", 0, u64::MAX).is_empty());
        assert_eq!(filter_by_range_name(&store, "area", 0, u64::MAX).len(), 4);
    }

    #[test]
    fn test_query_statistics_seed() {
        let store = seed();
        let stats = statistics(&store).unwrap();
        assert_eq!(stats.most_populated.name, "Brasil");
        assert_eq!(stats.most_populated.population, 213993437);
        assert_eq!(stats.least_populated.name, "Argentina");
        assert_eq!(stats.least_populated.population, 45376763);

        let continents: Vec<(&str, usize)> = stats
            .continents
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(continents, vec![("América", 2), ("Asia", 1), ("Europa", 1)]);

        let expected_population = (45376763.0 + 125800000.0 + 213993437.0 + 83149300.0) / 4.0;
        assert!((stats.mean_population - expected_population).abs() < 1e-6);
        let expected_area = (2780400.0 + 377975.0 + 8515767.0 + 357022.0) / 4.0;
        assert!((stats.mean_area - expected_area).abs() < 1e-6);
    }

    #[test]
    fn test_query_statistics_two_countries() {
        let store = RecordStore::from_loaded(vec![
            Country::new("Japón", 125800000, 377975, "Asia"),
            Country::new("Brasil", 213993437, 8515767, "América"),
        ]);
        let stats = statistics(&store).unwrap();
        assert_eq!(stats.most_populated.name, "Brasil");
        assert_eq!(stats.least_populated.name, "Japón");
    }

    #[test]
    fn test_query_statistics_ties_take_first() {
        let store = RecordStore::from_loaded(vec![
            Country::new("A", 5, 1, "X"),
            Country::new("B", 5, 1, "x"),
        ]);
        let stats = statistics(&store).unwrap();
        assert_eq!(stats.most_populated.name, "A");
        assert_eq!(stats.least_populated.name, "A");
        assert_eq!(stats.continents.len(), 2);
    }

    #[test]
    fn test_query_statistics_empty() {
        assert!(statistics(&RecordStore::new()).is_none());
    }

    #[test]
    fn test_query_distinct_continents() {
        let store = seed();
        assert_eq!(distinct_continents(&store), vec!["América", "Asia", "Europa"]);
    }
}
