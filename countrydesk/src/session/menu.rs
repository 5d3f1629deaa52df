use std::fmt::Display;

/// Entries of the main menu, numbered from 1 in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    List,
    Add,
    Update,
    Search,
    FilterByContinent,
    FilterByPopulation,
    FilterByArea,
    Sort,
    Statistics,
    Save,
    Exit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 11] = [
        MenuOption::List,
        MenuOption::Add,
        MenuOption::Update,
        MenuOption::Search,
        MenuOption::FilterByContinent,
        MenuOption::FilterByPopulation,
        MenuOption::FilterByArea,
        MenuOption::Sort,
        MenuOption::Statistics,
        MenuOption::Save,
        MenuOption::Exit,
    ];

    /// Maps a 1-based menu number to its option.
    pub fn from_number(number: usize) -> Option<MenuOption> {
        number
            .checked_sub(1)
            .and_then(|i| MenuOption::ALL.get(i))
            .copied()
    }

    pub fn number(self) -> usize {
        MenuOption::ALL
            .iter()
            .position(|o| *o == self)
            .map_or(0, |i| i + 1)
    }
}

impl Display for MenuOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List => write!(f, "List countries"),
            Self::Add => write!(f, "Add country"),
            Self::Update => write!(f, "Update country"),
            Self::Search => write!(f, "Search country"),
            Self::FilterByContinent => write!(f, "Filter by continent"),
            Self::FilterByPopulation => write!(f, "Filter by population range"),
            Self::FilterByArea => write!(f, "Filter by area range"),
            Self::Sort => write!(f, "Sort countries"),
            Self::Statistics => write!(f, "Show statistics"),
            Self::Save => write!(f, "Save changes"),
            Self::Exit => write!(f, "Exit"),
        }
    }
}

pub(crate) fn print_menu() {
    println!("\n--- Main Menu ---");
    for option in MenuOption::ALL {
        println!("{}. {}", option.number(), option);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_numbers_round_trip() {
        assert_eq!(MenuOption::from_number(1), Some(MenuOption::List));
        assert_eq!(MenuOption::from_number(11), Some(MenuOption::Exit));
        assert_eq!(MenuOption::from_number(0), None);
        assert_eq!(MenuOption::from_number(12), None);
        assert_eq!(MenuOption::Statistics.number(), 9);
    }
}
