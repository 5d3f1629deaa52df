//! # Interactive Session
//!
//! The menu loop that owns the [`RecordStore`] for the lifetime of the
//! program and dispatches each menu choice to the record, query and storage
//! layers.
//!
//! ## Exit policy
//!
//! - **Exit** asks whether to save first.
//! - An interrupt (Ctrl+C) or the end of input saves the store to the current
//!   data path without asking, then stops the loop. A failed save is logged
//!   and the loop still stops.
//! - A data file that exists but couldn't be loaded is never replaced without
//!   asking. Unattended saves go to a `.recovered.csv` file beside it.
//!
//! Both cases are reported to the caller as an [`Outcome`].
//!
//! ## Example
//! ```rust,no_run
//! use countrydesk::config::Config;
//! use countrydesk::session::Session;
//! use countrydesk::utils::{StdinSource, Terminal};
//!
//! # async fn run() -> Result<(), countrydesk::utils::TerminalErrors> {
//! let terminal = Terminal::new(StdinSource::spawn());
//! let mut session = Session::open(terminal, Config::default()).await?;
//! let outcome = session.run().await;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
pub mod menu;
pub use menu::MenuOption;

use crate::{
    config::{Config, SeedPolicy},
    records::{Country, RangeField, RecordStore, Selection, SortField, SortOrder, query},
    storage::{self, LoadErrors, SaveErrors},
    utils::{LineSource, Sanitize, Terminal, TerminalErrors},
};
use std::path::{Path, PathBuf};

/// How a session ended.
#[derive(Debug)]
pub enum Outcome {
    /// The user picked Exit.
    Exited { saved: bool },
    /// Input stopped (Ctrl+C, end of input or a read failure) and the store
    /// was saved without asking.
    Stopped { cause: TerminalErrors, saved: bool },
}

enum Flow {
    Continue,
    Exit { saved: bool },
}

pub struct Session<S> {
    terminal: Terminal<S>,
    store: RecordStore,
    config: Config,
    /// Data file that exists on disk but failed to load.
    unloaded: Option<PathBuf>,
}

impl<S: LineSource> Session<S> {
    pub fn new(terminal: Terminal<S>, store: RecordStore, config: Config) -> Session<S> {
        Session {
            terminal,
            store,
            config,
            unloaded: None,
        }
    }

    /// Loads the configured data file, offering the seed dataset when it
    /// doesn't exist.
    ///
    /// A declined seed, a failed seed write or an unreadable file all leave
    /// the session with an empty store. An unreadable file is also kept out
    /// of reach of later saves until the user agrees to replace it.
    ///
    /// # Errors
    /// Only input errors while asking about the seed dataset.
    pub async fn open(terminal: Terminal<S>, config: Config) -> Result<Session<S>, TerminalErrors> {
        let mut session = Session::new(terminal, RecordStore::new(), config);
        session.load().await?;
        Ok(session)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn data_path(&self) -> &Path {
        &self.config.data_path
    }

    /// Runs the menu loop until the user exits or input stops.
    pub async fn run(&mut self) -> Outcome {
        loop {
            match self.step().await {
                Ok(Flow::Continue) => continue,
                Ok(Flow::Exit { saved }) => {
                    println!("Exiting...");
                    return Outcome::Exited { saved };
                }
                Err(cause) => {
                    if let TerminalErrors::Io(e) = &cause {
                        tracing::error!(error = %e, "Couldn't read input");
                    }
                    println!("{}. Saving and exiting.", cause);
                    let saved = self.save_now();
                    return Outcome::Stopped { cause, saved };
                }
            }
        }
    }

    async fn load(&mut self) -> Result<(), TerminalErrors> {
        let path = self.config.data_path.clone();
        let report = match storage::load(&path) {
            Ok(report) => report,
            Err(LoadErrors::NotFound(_)) => {
                println!("File {} not found.", path.display());
                if !self.offer_seed().await? {
                    println!("No data loaded, starting with an empty list.");
                    return Ok(());
                }
                if let Err(e) = storage::write_seed(&path) {
                    println!("{}", e);
                    println!("Starting with an empty list.");
                    return Ok(());
                }
                match storage::load(&path) {
                    Ok(report) => report,
                    Err(e) => {
                        tracing::error!(error = %e, "Couldn't reload seed dataset");
                        println!("{}", e);
                        return Ok(());
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Couldn't load data file");
                println!("{}", e);
                println!(
                    "Starting with an empty list. {} won't be overwritten without asking.",
                    path.display()
                );
                self.unloaded = Some(path);
                return Ok(());
            }
        };

        println!(
            "Loaded {} countries from {} ({} skipped, {} warnings).",
            report.countries.len(),
            path.display(),
            report.skipped(),
            report.warnings.len()
        );
        self.store = RecordStore::from_loaded(report.countries);
        Ok(())
    }

    async fn offer_seed(&mut self) -> Result<bool, TerminalErrors> {
        match self.config.seed {
            SeedPolicy::Always => Ok(true),
            SeedPolicy::Never => Ok(false),
            SeedPolicy::Ask => {
                self.terminal
                    .confirm("Create a sample file with 4 countries? (y/n): ")
                    .await
            }
        }
    }

    async fn step(&mut self) -> Result<Flow, TerminalErrors> {
        menu::print_menu();
        let number = self
            .terminal
            .ask_between("Select an option (number): ", 1, MenuOption::ALL.len())
            .await?;
        let Some(option) = MenuOption::from_number(number) else {
            return Ok(Flow::Continue);
        };
        tracing::debug!(?option, "Menu selection");

        match option {
            MenuOption::List => self.list(),
            MenuOption::Add => self.add().await?,
            MenuOption::Update => self.update().await?,
            MenuOption::Search => self.search().await?,
            MenuOption::FilterByContinent => self.filter_by_continent().await?,
            MenuOption::FilterByPopulation => self.filter_by_range(RangeField::Population).await?,
            MenuOption::FilterByArea => self.filter_by_range(RangeField::Area).await?,
            MenuOption::Sort => self.sort().await?,
            MenuOption::Statistics => self.statistics(),
            MenuOption::Save => {
                self.save().await?;
            }
            MenuOption::Exit => {
                let saved = if self.terminal.confirm("Save before exiting? (y/n): ").await? {
                    self.save().await?
                } else {
                    false
                };
                return Ok(Flow::Exit { saved });
            }
        }
        Ok(Flow::Continue)
    }

    fn list(&self) {
        if self.store.is_empty() {
            println!("No countries loaded.");
            return;
        }
        println!("\nCountries:");
        for (i, country) in self.store.countries().iter().enumerate() {
            println!("{}. {}", i + 1, country);
        }
    }

    async fn add(&mut self) -> Result<(), TerminalErrors> {
        println!("\n--- Add Country ---");
        let name = self
            .terminal
            .ask("Name: ", &[Sanitize::NotEmpty, Sanitize::Unique(self.store.names())])
            .await?;
        let population = self.terminal.ask_u64("Population (integer): ").await?;
        let area = self.terminal.ask_u64("Area km² (integer): ").await?;
        let continent = self
            .terminal
            .ask("Continent: ", &[Sanitize::NotEmpty])
            .await?;

        match self
            .store
            .add(Country::new(&name, population, area, &continent))
        {
            Ok(()) => println!("Country '{}' added.", name),
            Err(e) => println!("{}", e),
        }
        Ok(())
    }

    async fn update(&mut self) -> Result<(), TerminalErrors> {
        println!("\n--- Update Country ---");
        let term = self
            .terminal
            .ask("Name (or part) of the country to update: ", &[Sanitize::NotEmpty])
            .await?;
        let Some(index) = self.select(&term).await? else {
            return Ok(());
        };
        let Some(current) = self.store.get(index).cloned() else {
            return Ok(());
        };

        println!(
            "Updating {}. Leave a field blank to keep its current value.",
            current.name
        );
        let population = self
            .terminal
            .ask_optional_u64(&format!("New population (current: {}): ", current.population))
            .await?;
        let area = self
            .terminal
            .ask_optional_u64(&format!("New area (current: {}): ", current.area))
            .await?;

        match self.store.update(index, population, area) {
            Ok(updated) => println!("Country '{}' updated.", updated.name),
            Err(e) => println!("{}", e),
        }
        Ok(())
    }

    /// Resolves `term` to one store position, asking the user to pick when
    /// several names match. A blank answer abandons the selection.
    async fn select(&mut self, term: &str) -> Result<Option<usize>, TerminalErrors> {
        let selection = query::select_by_name(&self.store, term);
        let candidates = match &selection {
            Selection::NotFound => {
                println!("Country not found.");
                return Ok(None);
            }
            Selection::Single(index) => return Ok(Some(*index)),
            Selection::Ambiguous(candidates) => candidates,
        };

        println!("Multiple matches found:");
        for (n, index) in candidates.iter().enumerate() {
            if let Some(country) = self.store.get(*index) {
                println!("{}. {}", n + 1, country.name);
            }
        }

        let filters = [Sanitize::IsBetween(1, candidates.len() as isize)];
        let choice = self
            .terminal
            .ask_optional("Select a number (blank to cancel): ", &filters)
            .await?;

        match choice.and_then(|c| c.parse::<usize>().ok()) {
            Some(choice) => Ok(selection.pick(choice)),
            None => {
                println!("Selection cancelled.");
                Ok(None)
            }
        }
    }

    async fn search(&mut self) -> Result<(), TerminalErrors> {
        let term = self
            .terminal
            .ask("Search term: ", &[Sanitize::NotEmpty])
            .await?;
        let found = query::search(&self.store, &term);
        if found.is_empty() {
            println!("No matches found.");
        }
        for country in found {
            println!("{}", country);
        }
        Ok(())
    }

    async fn filter_by_continent(&mut self) -> Result<(), TerminalErrors> {
        let known = query::distinct_continents(&self.store);
        if !known.is_empty() {
            println!("Continents: {}", known.join(", "));
        }
        let continent = self
            .terminal
            .ask("Continent: ", &[Sanitize::NotEmpty])
            .await?;

        let found = query::filter_by_continent(&self.store, &continent);
        if found.is_empty() {
            println!("No countries found for that continent.");
        }
        for country in found {
            println!("{} - {}", country.name, country.continent);
        }
        Ok(())
    }

    async fn filter_by_range(&mut self, field: RangeField) -> Result<(), TerminalErrors> {
        let min = self
            .terminal
            .ask_u64(&format!("Minimum {}: ", field))
            .await?;
        let max = self
            .terminal
            .ask_u64(&format!("Maximum {}: ", field))
            .await?;

        let found = query::filter_by_range(&self.store, field, min, max);
        if found.is_empty() {
            println!("No countries found in that range.");
        }
        for country in found {
            println!("{} - {}: {}", country.name, field, country.value_of(field));
        }
        Ok(())
    }

    async fn sort(&mut self) -> Result<(), TerminalErrors> {
        println!("Sort by:\n1. Name\n2. Population\n3. Area");
        let field = match self.terminal.ask_between("Select: ", 1, 3).await? {
            1 => SortField::Name,
            2 => SortField::Population,
            _ => SortField::Area,
        };
        let descending = self.terminal.confirm("Descending? (y/n): ").await?;

        self.store.sort(field, SortOrder::from_descending(descending));
        println!("List sorted by {}.", field);
        Ok(())
    }

    fn statistics(&self) {
        let Some(stats) = query::statistics(&self.store) else {
            println!("No countries to compute statistics.");
            return;
        };

        println!("\n--- Statistics ---");
        println!(
            "Most populated: {} ({})",
            stats.most_populated.name, stats.most_populated.population
        );
        println!(
            "Least populated: {} ({})",
            stats.least_populated.name, stats.least_populated.population
        );
        println!("Average population: {:.2}", stats.mean_population);
        println!("Average area: {:.2} km²", stats.mean_area);
        println!("Countries per continent:");
        for (continent, count) in &stats.continents {
            println!(" - {}: {}", continent, count);
        }
    }

    /// Saves to the data path. When the destination isn't writable, asks for
    /// another path until one works or the user leaves it blank. A successful
    /// alternate path becomes the new data path.
    ///
    /// When the data path holds a file that couldn't be loaded, asks before
    /// replacing it and offers an alternate path otherwise.
    async fn save(&mut self) -> Result<bool, TerminalErrors> {
        let mut path = self.config.data_path.clone();
        if self.unloaded.as_ref() == Some(&path) {
            println!(
                "{} couldn't be loaded, saving there replaces its contents.",
                path.display()
            );
            if !self.terminal.confirm("Overwrite it anyway? (y/n): ").await? {
                match self.ask_alternate().await? {
                    Some(alternate) => path = alternate,
                    None => return Ok(false),
                }
            }
        }

        loop {
            match storage::save(&path, self.store.countries()) {
                Ok(()) => {
                    println!("Saved {} countries to {}.", self.store.len(), path.display());
                    if self.unloaded.as_ref() == Some(&path) {
                        self.unloaded = None;
                    }
                    self.config.data_path = path;
                    return Ok(true);
                }
                Err(e @ SaveErrors::NotWritable { .. }) => {
                    println!("{}", e);
                    match self.ask_alternate().await? {
                        Some(alternate) => path = alternate,
                        None => return Ok(false),
                    }
                }
                Err(e) => {
                    println!("{}", e);
                    return Ok(false);
                }
            }
        }
    }

    async fn ask_alternate(&mut self) -> Result<Option<PathBuf>, TerminalErrors> {
        let answer = self
            .terminal
            .ask_optional("Alternate path (blank to cancel): ", &[])
            .await?;
        if answer.is_none() {
            println!("Save cancelled.");
        }
        Ok(answer.map(PathBuf::from))
    }

    /// Saves without asking anything, for interrupted sessions. A data file
    /// that failed to load is left alone and the store goes to
    /// [`recovery_path`] instead.
    fn save_now(&self) -> bool {
        let path = match &self.unloaded {
            Some(unloaded) if *unloaded == self.config.data_path => {
                let recovery = recovery_path(unloaded);
                tracing::warn!(
                    path = %unloaded.display(),
                    recovery = %recovery.display(),
                    "Data file wasn't loaded, saving beside it"
                );
                println!(
                    "{} wasn't loaded, saving to {} instead.",
                    unloaded.display(),
                    recovery.display()
                );
                recovery
            }
            _ => self.config.data_path.clone(),
        };

        match storage::save(&path, self.store.countries()) {
            Ok(()) => {
                println!("Saved {} countries to {}.", self.store.len(), path.display());
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Couldn't save on exit");
                println!("{}", e);
                false
            }
        }
    }
}

/// Sibling of `path` used when `path` itself must not be replaced,
/// `countries.csv` becomes `countries.recovered.csv`.
pub fn recovery_path(path: &Path) -> PathBuf {
    path.with_extension("recovered.csv")
}
