// Stat category table for a 9-category head-to-head basketball league.
//
// Category ids follow the Yahoo Fantasy stat numbering so stat lines coming
// from the data source can be keyed without translation.

use thiserror::Error;

/// A single stat category.
///
/// `inverted` marks categories where the lower value wins a matchup
/// (turnovers only). `tallied` distinguishes the nine scoring categories
/// from informational rows (made-shot counts) that appear in stat lines
/// but never count toward a win/loss tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: u32,
    pub name: &'static str,
    pub inverted: bool,
    pub tallied: bool,
}

/// Every category a stat line may carry, in display order.
pub const ALL_CATEGORIES: &[Category] = &[
    Category { id: 4, name: "FGM", inverted: false, tallied: false },
    Category { id: 5, name: "FG%", inverted: false, tallied: true },
    Category { id: 7, name: "FTM", inverted: false, tallied: false },
    Category { id: 8, name: "FT%", inverted: false, tallied: true },
    Category { id: 10, name: "3PM", inverted: false, tallied: true },
    Category { id: 12, name: "PTS", inverted: false, tallied: true },
    Category { id: 15, name: "REB", inverted: false, tallied: true },
    Category { id: 16, name: "AST", inverted: false, tallied: true },
    Category { id: 17, name: "STL", inverted: false, tallied: true },
    Category { id: 18, name: "BLK", inverted: false, tallied: true },
    Category { id: 19, name: "TOV", inverted: true, tallied: true },
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("stat category id {0} not found")]
    IdNotFound(u32),

    #[error("stat category {0:?} not found")]
    NameNotFound(String),
}

/// Look up a category by its stat id.
pub fn by_id(id: u32) -> Result<&'static Category, CategoryError> {
    ALL_CATEGORIES
        .iter()
        .find(|c| c.id == id)
        .ok_or(CategoryError::IdNotFound(id))
}

/// Look up a category by display name, case-insensitively.
pub fn by_name(name: &str) -> Result<&'static Category, CategoryError> {
    ALL_CATEGORIES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| CategoryError::NameNotFound(name.to_string()))
}

/// The nine categories that decide matchups, in display order.
pub fn scoring_categories() -> impl Iterator<Item = &'static Category> {
    ALL_CATEGORIES.iter().filter(|c| c.tallied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_scoring_categories() {
        assert_eq!(scoring_categories().count(), 9);
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in ALL_CATEGORIES.iter().enumerate() {
            for b in &ALL_CATEGORIES[i + 1..] {
                assert_ne!(a.id, b.id, "duplicate id {}", a.id);
            }
        }
    }

    #[test]
    fn only_turnovers_inverted() {
        let inverted: Vec<_> = ALL_CATEGORIES.iter().filter(|c| c.inverted).collect();
        assert_eq!(inverted.len(), 1);
        assert_eq!(inverted[0].name, "TOV");
        assert!(inverted[0].tallied);
    }

    #[test]
    fn informational_rows_not_tallied() {
        assert!(!by_id(4).unwrap().tallied);
        assert!(!by_id(7).unwrap().tallied);
    }

    #[test]
    fn by_name_is_case_insensitive() {
        assert_eq!(by_name("tov").unwrap().id, 19);
        assert_eq!(by_name("Fg%").unwrap().id, 5);
        assert_eq!(
            by_name("dunks"),
            Err(CategoryError::NameNotFound("dunks".into()))
        );
    }

    #[test]
    fn by_id_unknown() {
        assert_eq!(by_id(99), Err(CategoryError::IdNotFound(99)));
    }
}
