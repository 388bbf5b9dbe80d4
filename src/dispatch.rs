// Command dispatch.
//
// Takes a parsed `Command`, performs the data-source reads it needs, runs
// the evaluator where required, and renders exactly one reply. Every error
// is converted to a reply here; nothing propagates past a single command,
// and no command's handling depends on a previous one.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use futures_util::future::try_join_all;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::category::{self, scoring_categories, Category, CategoryError};
use crate::command::{Command, Period};
use crate::config::Config;
use crate::matchup::{
    aggregate_one_vs_many, rank_teams_by_category, MatchupError, StatLine, Team,
};
use crate::provider::{FantasyProvider, ProviderError};
use crate::report::{self, HelpDocument};

/// A reply to send back on the originating channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    /// Rendered as a rich embed by the transport; used for `!help` only.
    Rich(HelpDocument),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error(transparent)]
    Matchup(#[from] MatchupError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("{0}")]
    BadArgument(String),
}

/// Stateless command executor. Holds the provider handle and the few knobs
/// that shape replies; nothing here survives a command.
pub struct Dispatcher {
    provider: Arc<dyn FantasyProvider>,
    prefix: String,
    free_agent_count: usize,
    leader_count: usize,
}

impl Dispatcher {
    pub fn new(config: &Config, provider: Arc<dyn FantasyProvider>) -> Self {
        Dispatcher {
            provider,
            prefix: config.bot.prefix.clone(),
            free_agent_count: config.bot.free_agent_count,
            leader_count: config.bot.leader_count,
        }
    }

    /// Handle one raw chat message.
    ///
    /// Returns `None` for messages that are not recognized commands (they
    /// get no reply at all). Every other path — success, usage error, or
    /// any failure during handling — produces exactly one reply.
    pub async fn handle_message(&self, text: &str) -> Option<Reply> {
        let command = match Command::parse(&self.prefix, text)? {
            Ok(command) => command,
            Err(usage) => {
                debug!("usage error for !{}", usage.command);
                return Some(Reply::Text(usage.to_string()));
            }
        };

        info!("dispatching {:?}", command);
        match self.run(command).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!("command failed: {e}");
                Some(Reply::Text(report::error_block(&e.to_string())))
            }
        }
    }

    async fn run(&self, command: Command) -> Result<Reply, DispatchError> {
        let text = match command {
            Command::Scoreboard { week } => {
                let matchups = self.provider.scoreboard(week).await?;
                report::scoreboard(&matchups)
            }
            Command::Standings => {
                let rows = self.provider.standings().await?;
                report::standings(&rows)
            }
            Command::Roster { team } => {
                let roster = self.provider.roster(&team).await?;
                report::roster(&roster)
            }
            Command::Stats { period, player } => {
                let stats = self.provider.player_stats(&player, period).await?;
                report::player_stats(&stats)
            }
            Command::Compare {
                period,
                player_a,
                player_b,
            } => self.compare_players(period, &player_a, &player_b).await?,
            Command::Analyze { period, stats } => self.analyze_free_agents(period, &stats).await?,
            Command::VsLeague { week, team } => self.vs_league(week, &team).await?,
            Command::Schedule { team } => {
                let schedule = self.provider.team_schedule(&team).await?;
                report::schedule(&schedule)
            }
            Command::Owner { players } => {
                let lookups = players.iter().map(|p| self.provider.player_ownership(p));
                let owners = try_join_all(lookups).await?;
                report::owners(&owners)
            }
            Command::Leaders { date } => self.leaders(date.as_deref()).await?,
            Command::HeadToHead {
                week,
                team_a,
                team_b,
            } => self.head_to_head(week, &team_a, &team_b).await?,
            Command::Ranks { week, stat } => {
                let cat = category::by_name(&stat)?;
                let teams = self.provider.team_stats(week).await?;
                let ranked = rank_teams_by_category(&teams, cat)?;
                report::ranks(cat, &ranked)
            }
            Command::Help => return Ok(Reply::Rich(report::help(&self.prefix))),
        };
        Ok(Reply::Text(text))
    }

    /// `!compare`: per-category differences (subject minus opponent) over
    /// the scoring categories. Both stat lines are fetched concurrently.
    async fn compare_players(
        &self,
        period: Period,
        player_a: &str,
        player_b: &str,
    ) -> Result<String, DispatchError> {
        let (a, b) = tokio::try_join!(
            self.provider.player_stats(player_a, period),
            self.provider.player_stats(player_b, period),
        )?;

        let mut diff = StatLine::new();
        for cat in scoring_categories() {
            let va = a.stats.get(cat.id).ok_or_else(|| {
                MatchupError::CategoryNotPresent {
                    category: cat.name,
                    team: a.player.clone(),
                }
            })?;
            let vb = b.stats.get(cat.id).ok_or_else(|| {
                MatchupError::CategoryNotPresent {
                    category: cat.name,
                    team: b.player.clone(),
                }
            })?;
            diff.set(cat.id, va - vb);
        }
        Ok(report::stats_diff(&a.player, &b.player, &diff))
    }

    /// `!analyze`: top free agents per requested stat. Every stat name is
    /// resolved before any fetch; fetches run concurrently and the output
    /// sections follow the request order.
    async fn analyze_free_agents(
        &self,
        period: Period,
        stats: &[String],
    ) -> Result<String, DispatchError> {
        let mut cats: Vec<&'static Category> = Vec::with_capacity(stats.len());
        for name in stats {
            cats.push(category::by_name(name.trim())?);
        }

        let fetches = cats
            .iter()
            .map(|c| self.provider.free_agents_by_stat(c.id, self.free_agent_count, period));
        let results = try_join_all(fetches).await?;

        let sections: Vec<_> = cats.into_iter().zip(results).collect();
        Ok(report::free_agents(&sections))
    }

    /// `!vs`: one team against every other team, one independent pairing
    /// each, all drawn from a single team-stats fetch so every side covers
    /// the same week.
    async fn vs_league(&self, week: Option<u32>, team: &str) -> Result<String, DispatchError> {
        let teams = self.provider.team_stats(week).await?;
        let subject = find_team(&teams, team)?.clone();
        let opponents: Vec<Team> = teams
            .iter()
            .filter(|t| t.key != subject.key)
            .cloned()
            .collect();

        let cats: Vec<Category> = scoring_categories().copied().collect();
        let outcomes = aggregate_one_vs_many(&subject, &opponents, &cats)?;
        Ok(report::vs_league(&outcomes))
    }

    /// `!h2h`: a single pairing between two named teams.
    async fn head_to_head(
        &self,
        week: Option<u32>,
        team_a: &str,
        team_b: &str,
    ) -> Result<String, DispatchError> {
        let teams = self.provider.team_stats(week).await?;
        let a = find_team(&teams, team_a)?.clone();
        let b = find_team(&teams, team_b)?.clone();

        let cats: Vec<Category> = scoring_categories().copied().collect();
        let mut outcomes = aggregate_one_vs_many(&a, std::slice::from_ref(&b), &cats)?;
        let split = outcomes.pop().map(|o| o.split).unwrap_or_default();
        Ok(report::head_to_head(&a, &b, &split))
    }

    /// `!leaders`: top daily performers for each scoring category, one
    /// independent fetch per category, sections in category display order.
    async fn leaders(&self, date: Option<&str>) -> Result<String, DispatchError> {
        let date = resolve_leaders_date(date)?;

        let cats: Vec<&'static Category> = scoring_categories().collect();
        let fetches = cats
            .iter()
            .map(|c| self.provider.stat_leaders(date, c.id, self.leader_count));
        let results = try_join_all(fetches).await?;

        let sections: Vec<_> = cats.into_iter().zip(results).collect();
        Ok(report::leaders(date, &sections))
    }
}

/// Resolve a team query against the fetched team list. Display names match
/// case-insensitively; the data source's stable key matches exactly.
fn find_team<'a>(teams: &'a [Team], query: &str) -> Result<&'a Team, DispatchError> {
    teams
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(query) || t.key == query)
        .ok_or_else(|| ProviderError::TeamNotFound(query.to_string()).into())
}

/// League days roll over on US Pacific time.
fn pacific_today() -> NaiveDate {
    (Utc::now().naive_utc() - Duration::hours(8)).date()
}

fn resolve_leaders_date(arg: Option<&str>) -> Result<NaiveDate, DispatchError> {
    match arg {
        None => Ok(pacific_today()),
        Some("yesterday") => Ok(pacific_today() - Duration::days(1)),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            DispatchError::BadArgument(format!("invalid date {s:?}, expected YYYY-MM-DD"))
        }),
    }
}
