// Data-source seam.
//
// The core never talks to the remote fantasy service directly; it consumes
// the read operations below through `FantasyProvider`. An adapter crate (or
// a scripted stand-in under test) implements the trait against the real
// service, holding the league key and credentials itself. Every operation
// may fail; the dispatcher renders failures into a reply and never retries.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::command::Period;
use crate::matchup::{StatLine, Team};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("team {0:?} not found")]
    TeamNotFound(String),

    #[error("player {0:?} not found")]
    PlayerNotFound(String),

    /// Anything that went wrong talking to the remote service. Surfaced
    /// verbatim in the error reply.
    #[error("{0}")]
    Remote(String),
}

// ---------------------------------------------------------------------------
// Domain records
// ---------------------------------------------------------------------------

/// One side of a scheduled matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupSide {
    pub name: String,
    pub key: String,
}

/// A single category won inside a matchup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatWinner {
    pub category_id: u32,
    pub winner_team_key: String,
}

/// A head-to-head matchup as reported on the league scoreboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub week: u32,
    pub team_a: MatchupSide,
    pub team_b: MatchupSide,
    pub stat_winners: Vec<StatWinner>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub rank: u32,
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player: String,
    /// The slot the player currently occupies (PG, UTIL, BN, ...).
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team: String,
    pub players: Vec<RosterEntry>,
}

/// A player's stat line over one period.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub player: String,
    pub period: Period,
    pub stats: StatLine,
}

/// One row of a top-N-by-category listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlayer {
    pub player: String,
    pub value: f64,
}

/// One row of a daily stat-leaders listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderEntry {
    pub player: String,
    pub position: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ownership {
    FreeAgent,
    /// On waivers until the given clear date.
    Waivers { until: NaiveDate },
    Owned { team: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerOwnership {
    pub player: String,
    pub status: Ownership,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Win,
    Loss,
    Tie,
    InProgress,
    NotStarted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub week: u32,
    pub opponent: String,
    pub result: GameResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSchedule {
    pub team: String,
    pub entries: Vec<ScheduleEntry>,
}

// ---------------------------------------------------------------------------
// The provider trait
// ---------------------------------------------------------------------------

/// Read operations against the fantasy data source.
///
/// `week: None` always means the service's current week. Implementations
/// resolve team and player names themselves and report unresolvable names
/// as [`ProviderError::TeamNotFound`] / [`ProviderError::PlayerNotFound`];
/// the core never guesses a name-to-key mapping.
#[async_trait]
pub trait FantasyProvider: Send + Sync {
    /// All matchups on the league scoreboard for a week.
    async fn scoreboard(&self, week: Option<u32>) -> Result<Vec<Matchup>, ProviderError>;

    /// League standings, ordered by rank.
    async fn standings(&self) -> Result<Vec<StandingsRow>, ProviderError>;

    /// A team's current roster.
    async fn roster(&self, team: &str) -> Result<TeamRoster, ProviderError>;

    /// A player's stat line for a period.
    async fn player_stats(&self, player: &str, period: Period)
        -> Result<PlayerStats, ProviderError>;

    /// Every team in the league with its stat line for a week.
    async fn team_stats(&self, week: Option<u32>) -> Result<Vec<Team>, ProviderError>;

    /// The top `count` free agents ranked by one category.
    async fn free_agents_by_stat(
        &self,
        category_id: u32,
        count: usize,
        period: Period,
    ) -> Result<Vec<RankedPlayer>, ProviderError>;

    /// Who owns a player (a team, waivers, or nobody).
    async fn player_ownership(&self, player: &str) -> Result<PlayerOwnership, ProviderError>;

    /// A team's season schedule with per-week results.
    async fn team_schedule(&self, team: &str) -> Result<TeamSchedule, ProviderError>;

    /// League-wide top `count` performers in one category on a single day.
    async fn stat_leaders(
        &self,
        date: NaiveDate,
        category_id: u32,
        count: usize,
    ) -> Result<Vec<LeaderEntry>, ProviderError>;
}
