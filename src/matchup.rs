// Category matchup evaluation.
//
// Compares two or more teams across the scoring categories, tallying which
// categories each side wins, loses, and ties. Turnovers invert: the side
// with the lower value wins the category. The roll-up from per-category
// tallies to a whole-matchup win/loss/tie lives here too, and always reads
// the stored tallies rather than re-comparing values.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::category::Category;

// ---------------------------------------------------------------------------
// Stat lines and teams
// ---------------------------------------------------------------------------

/// A per-category numeric snapshot for one team or player over one period.
///
/// Values are parsed from the strings the data source reports, which are
/// already rounded to the source's display precision. Category comparisons
/// therefore use exact `f64` equality: an epsilon would merge values the
/// source itself considers distinct and under-detect ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatLine {
    values: BTreeMap<u32, f64>,
}

impl StatLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, f64)>) -> Self {
        StatLine {
            values: pairs.into_iter().collect(),
        }
    }

    pub fn set(&mut self, category_id: u32, value: f64) {
        self.values.insert(category_id, value);
    }

    pub fn get(&self, category_id: u32) -> Option<f64> {
        self.values.get(&category_id).copied()
    }

    /// Category ids present in this line, in ascending id order.
    pub fn category_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.values.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A fantasy team with its stat line for some week.
///
/// `key` is the data source's stable identifier; `name` is the display name
/// managers actually type in commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub name: String,
    pub key: String,
    pub stats: StatLine,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchupError {
    #[error("stat category {category} missing from {team}'s stat line")]
    CategoryNotPresent { category: &'static str, team: String },
}

// ---------------------------------------------------------------------------
// Pairwise comparison
// ---------------------------------------------------------------------------

/// Which categories one side of a pairing won, lost, and tied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySplit {
    pub won: BTreeSet<u32>,
    pub lost: BTreeSet<u32>,
    pub tied: BTreeSet<u32>,
}

impl CategorySplit {
    /// Whole-matchup result for the subject side: more categories won than
    /// lost is a win, fewer is a loss, equal is a tie.
    pub fn net(&self) -> MatchupResult {
        match self.won.len().cmp(&self.lost.len()) {
            std::cmp::Ordering::Greater => MatchupResult::Win,
            std::cmp::Ordering::Less => MatchupResult::Loss,
            std::cmp::Ordering::Equal => MatchupResult::Tie,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchupResult {
    Win,
    Loss,
    Tie,
}

/// Compare the subject's stat line against an opponent's across `categories`.
///
/// Equal values tie. Otherwise the higher value wins the category, except
/// for inverted categories (turnovers) where the lower value wins. Both
/// stat lines must cover the same period; this function only checks that
/// every requested category is present on both sides. On a missing
/// category the error's `team` field names the side (`subject` or
/// `opponent`); [`aggregate_one_vs_many`] rewrites it to the team name.
pub fn compare(
    subject: &StatLine,
    opponent: &StatLine,
    categories: &[Category],
) -> Result<CategorySplit, MatchupError> {
    let mut split = CategorySplit::default();

    for cat in categories {
        let a = value_for(subject, cat, "subject")?;
        let b = value_for(opponent, cat, "opponent")?;

        if a == b {
            split.tied.insert(cat.id);
        } else if (a > b) != cat.inverted {
            split.won.insert(cat.id);
        } else {
            split.lost.insert(cat.id);
        }
    }
    Ok(split)
}

fn value_for(line: &StatLine, cat: &Category, side: &str) -> Result<f64, MatchupError> {
    line.get(cat.id).ok_or(MatchupError::CategoryNotPresent {
        category: cat.name,
        team: side.to_string(),
    })
}

// ---------------------------------------------------------------------------
// One-vs-many aggregation
// ---------------------------------------------------------------------------

/// The outcome of one subject-vs-opponent pairing.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupOutcome {
    pub subject: Team,
    pub opponent: Team,
    pub split: CategorySplit,
}

/// Wins, losses, and ties across a set of matchup outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Record {
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
}

/// Compare the subject against every opponent independently.
///
/// Output order follows the input `opponents` order; no pairing shares
/// state with another.
pub fn aggregate_one_vs_many(
    subject: &Team,
    opponents: &[Team],
    categories: &[Category],
) -> Result<Vec<MatchupOutcome>, MatchupError> {
    let mut outcomes = Vec::with_capacity(opponents.len());
    for opponent in opponents {
        let split = compare(&subject.stats, &opponent.stats, categories).map_err(|e| match e {
            // Attribute the missing category to the actual team.
            MatchupError::CategoryNotPresent { category, team } => {
                MatchupError::CategoryNotPresent {
                    category,
                    team: if team == "subject" {
                        subject.name.clone()
                    } else {
                        opponent.name.clone()
                    },
                }
            }
        })?;
        outcomes.push(MatchupOutcome {
            subject: subject.clone(),
            opponent: opponent.clone(),
            split,
        });
    }
    Ok(outcomes)
}

/// Roll a list of outcomes up to a win/loss/tie record.
///
/// Classification reads each outcome's stored category tallies (via
/// [`CategorySplit::net`]); the underlying values are never re-compared.
pub fn overall_record(outcomes: &[MatchupOutcome]) -> Record {
    let mut record = Record::default();
    for outcome in outcomes {
        match outcome.split.net() {
            MatchupResult::Win => record.wins += 1,
            MatchupResult::Loss => record.losses += 1,
            MatchupResult::Tie => record.ties += 1,
        }
    }
    record
}

// ---------------------------------------------------------------------------
// Single-category ranking
// ---------------------------------------------------------------------------

/// Rank teams by one category's raw value, descending, stable on ties.
///
/// The raw value is used even for inverted categories: ranking reports
/// magnitude, not win-direction, so the team committing the most turnovers
/// ranks first under TOV.
pub fn rank_teams_by_category<'a>(
    teams: &'a [Team],
    category: &Category,
) -> Result<Vec<&'a Team>, MatchupError> {
    let mut ranked = Vec::with_capacity(teams.len());
    for team in teams {
        let value = team
            .stats
            .get(category.id)
            .ok_or(MatchupError::CategoryNotPresent {
                category: category.name,
                team: team.name.clone(),
            })?;
        ranked.push((value, team));
    }
    // sort_by is stable, so equal values keep their input order.
    ranked.sort_by(|(a, _), (b, _)| b.total_cmp(a));
    Ok(ranked.into_iter().map(|(_, team)| team).collect())
}
