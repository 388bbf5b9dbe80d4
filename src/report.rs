// Report rendering.
//
// One pure function per report kind. Every function takes already-fetched
// records and returns a single fenced fixed-width text block; none of them
// fetch, none of them fail. Callers substitute `error_block` themselves
// when a lookup failed upstream.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use crate::category::{Category, ALL_CATEGORIES};
use crate::command::Period;
use crate::matchup::{overall_record, CategorySplit, MatchupOutcome, StatLine, Team};
use crate::provider::{
    GameResult, LeaderEntry, Matchup, Ownership, PlayerOwnership, PlayerStats, RankedPlayer,
    StandingsRow, TeamRoster, TeamSchedule,
};

/// Roster slots in render order. Players sitting in a slot outside this
/// list are dropped from the rendered roster.
const POSITION_SLOTS: &[&str] = &[
    "PG", "SG", "G", "SF", "PF", "F", "C", "UTIL", "BN", "IL", "IL+",
];

// ---------------------------------------------------------------------------
// Small helpers
// ---------------------------------------------------------------------------

fn open_block() -> String {
    String::from("```\n")
}

fn close_block(mut out: String) -> String {
    out.push_str("```");
    out
}

fn push_header(out: &mut String, header: &str) {
    out.push_str(header);
    out.push('\n');
    out.push_str(&"-".repeat(header.len()));
    out.push('\n');
}

/// Render a stat value with the category's display precision: percentages
/// to three decimals, counting stats to one.
fn fmt_stat(cat: &Category, value: f64) -> String {
    match cat.name {
        "FG%" | "FT%" => format!("{value:.3}"),
        _ => format!("{value:.1}"),
    }
}

fn period_label(period: Period) -> &'static str {
    match period {
        Period::Season => "Season Average",
        Period::LastWeek => "Last Week Average",
        Period::LastMonth => "Last Month Average",
    }
}

/// Wrap any error message in the standard error block.
pub fn error_block(message: &str) -> String {
    format!("```\nError: {message}```")
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// The weekly scoreboard: each matchup as two lines of `Team (categories won)`.
pub fn scoreboard(matchups: &[Matchup]) -> String {
    let mut out = open_block();

    let Some(first) = matchups.first() else {
        out.push_str("No matchups found.\n");
        return close_block(out);
    };

    push_header(&mut out, &format!("Week {} Matchups", first.week));
    for m in matchups {
        let won_a = m
            .stat_winners
            .iter()
            .filter(|w| w.winner_team_key == m.team_a.key)
            .count();
        let won_b = m
            .stat_winners
            .iter()
            .filter(|w| w.winner_team_key == m.team_b.key)
            .count();
        let _ = writeln!(out, "{} ({})", m.team_a.name, won_a);
        let _ = writeln!(out, "{} ({})", m.team_b.name, won_b);
        out.push('\n');
    }
    close_block(out)
}

pub fn standings(rows: &[StandingsRow]) -> String {
    let mut out = open_block();
    push_header(&mut out, "Standings");
    for row in rows {
        let _ = writeln!(
            out,
            "{:>2}: {} ({}-{}-{})",
            row.rank, row.team, row.wins, row.losses, row.ties
        );
    }
    close_block(out)
}

/// A team's roster grouped by position slot, in fixed slot order.
pub fn roster(roster: &TeamRoster) -> String {
    let mut out = open_block();
    push_header(&mut out, &roster.team);
    for slot in POSITION_SLOTS {
        for entry in roster.players.iter().filter(|p| p.position == *slot) {
            let _ = writeln!(out, "{}: {}", slot, entry.player);
        }
    }
    close_block(out)
}

/// A single player's stat table for one period.
pub fn player_stats(stats: &PlayerStats) -> String {
    let mut out = open_block();
    push_header(
        &mut out,
        &format!("{} - {}", stats.player, period_label(stats.period)),
    );
    out.push('\n');
    for cat in ALL_CATEGORIES {
        if let Some(value) = stats.stats.get(cat.id) {
            let _ = writeln!(out, "{:<3}: {}", cat.name, fmt_stat(cat, value));
        }
    }
    close_block(out)
}

/// Per-category differences between two players (subject minus opponent).
pub fn stats_diff(player_a: &str, player_b: &str, diff: &StatLine) -> String {
    let mut out = open_block();
    push_header(&mut out, &format!("{player_a} / {player_b}"));
    out.push('\n');
    for cat in ALL_CATEGORIES.iter().filter(|c| c.tallied) {
        if let Some(value) = diff.get(cat.id) {
            let _ = writeln!(out, "{:<3}: {}", cat.name, fmt_stat(cat, value));
        }
    }
    close_block(out)
}

/// Top free agents per requested category, sections in request order.
pub fn free_agents(sections: &[(&'static Category, Vec<RankedPlayer>)]) -> String {
    let mut out = open_block();
    for (i, (cat, players)) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(cat.name);
        out.push('\n');
        out.push_str(&"-".repeat(20));
        out.push('\n');
        for player in players {
            let _ = writeln!(out, "{} ({})", player.player, fmt_stat(cat, player.value));
        }
    }
    close_block(out)
}

/// One team's matchup results against every other team, with a total record.
pub fn vs_league(outcomes: &[MatchupOutcome]) -> String {
    let mut out = open_block();

    let Some(first) = outcomes.first() else {
        out.push_str("No opponents found.\n");
        return close_block(out);
    };

    push_header(&mut out, &format!("{} vs. The League", first.subject.name));
    out.push('\n');
    for outcome in outcomes {
        let _ = writeln!(out, "{} ({})", outcome.subject.name, outcome.split.won.len());
        let _ = writeln!(out, "{} ({})", outcome.opponent.name, outcome.split.lost.len());
        out.push('\n');
    }

    let record = overall_record(outcomes);
    let _ = write!(
        out,
        "Total: {}-{}-{}",
        record.wins, record.losses, record.ties
    );
    close_block(out)
}

/// Side-by-side category values for two teams, with the subject's record.
pub fn head_to_head(team_a: &Team, team_b: &Team, split: &CategorySplit) -> String {
    let mut out = open_block();
    push_header(&mut out, &format!("H2H: {} vs {}", team_a.name, team_b.name));
    out.push('\n');
    for cat in ALL_CATEGORIES {
        if let (Some(a), Some(b)) = (team_a.stats.get(cat.id), team_b.stats.get(cat.id)) {
            let _ = writeln!(
                out,
                "{:<3}: {:>8} | {}",
                cat.name,
                fmt_stat(cat, a),
                fmt_stat(cat, b)
            );
        }
    }
    let _ = write!(
        out,
        "\nTotal: {}-{}-{}",
        split.won.len(),
        split.lost.len(),
        split.tied.len()
    );
    close_block(out)
}

/// A team's season schedule. Completed weeks show the result, the week in
/// progress shows the opponent starred, upcoming weeks show it plain.
pub fn schedule(schedule: &TeamSchedule) -> String {
    let mut out = open_block();
    push_header(&mut out, &format!("{} Schedule", schedule.team));
    out.push('\n');

    let (mut wins, mut losses, mut ties) = (0, 0, 0);
    for entry in &schedule.entries {
        match entry.result {
            GameResult::Win => {
                wins += 1;
                let _ = writeln!(out, "{:>2}: {} (W)", entry.week, entry.opponent);
            }
            GameResult::Loss => {
                losses += 1;
                let _ = writeln!(out, "{:>2}: {} (L)", entry.week, entry.opponent);
            }
            GameResult::Tie => {
                ties += 1;
                let _ = writeln!(out, "{:>2}: {} (T)", entry.week, entry.opponent);
            }
            GameResult::InProgress => {
                let _ = writeln!(out, "{:>2}: *{}*", entry.week, entry.opponent);
            }
            GameResult::NotStarted => {
                let _ = writeln!(out, "{:>2}: {}", entry.week, entry.opponent);
            }
        }
    }
    let _ = write!(out, "\nTotal: {wins}-{losses}-{ties}");
    close_block(out)
}

/// Current ownership for each requested player, in request order.
pub fn owners(players: &[PlayerOwnership]) -> String {
    let mut out = open_block();
    for ownership in players {
        let _ = write!(out, "{}: ", ownership.player);
        match &ownership.status {
            Ownership::FreeAgent => out.push_str("Free Agent"),
            Ownership::Waivers { until } => {
                let _ = write!(out, "Waivers ({})", until.format("%a %m/%d"));
            }
            Ownership::Owned { team } => out.push_str(team),
        }
        out.push_str("\n\n");
    }
    close_block(out)
}

/// Daily stat leaders per category, sections in category display order.
pub fn leaders(date: NaiveDate, sections: &[(&'static Category, Vec<LeaderEntry>)]) -> String {
    let mut out = open_block();
    push_header(&mut out, &format!("{} Stat Leaders", date.format("%Y-%m-%d")));
    out.push('\n');
    for (cat, entries) in sections {
        out.push_str(cat.name);
        out.push('\n');
        out.push_str(&"-".repeat(25));
        out.push('\n');
        for entry in entries {
            let _ = writeln!(
                out,
                "{} - {} ({})",
                entry.player,
                entry.position,
                fmt_stat(cat, entry.value)
            );
        }
        out.push('\n');
    }
    close_block(out)
}

/// League teams ranked by one category's raw value.
pub fn ranks(category: &Category, ranked: &[&Team]) -> String {
    let mut out = open_block();
    for (i, team) in ranked.iter().enumerate() {
        let value = team
            .stats
            .get(category.id)
            .map(|v| fmt_stat(category, v))
            .unwrap_or_default();
        let _ = writeln!(out, "{:>2}: {} - {}", i + 1, team.name, value);
    }
    close_block(out)
}

// ---------------------------------------------------------------------------
// Help document
// ---------------------------------------------------------------------------

/// The one structured (non-plain-text) reply: transports render it as a
/// rich embed rather than a code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpDocument {
    pub title: String,
    pub description: String,
    pub fields: Vec<HelpField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpField {
    pub name: String,
    pub value: String,
}

impl HelpDocument {
    /// JSON form for transports that build rich embeds from structured
    /// data. Serializing this type cannot fail.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

pub fn help(prefix: &str) -> HelpDocument {
    let field = |name: &str, value: &str| HelpField {
        name: format!("{prefix}{name}"),
        value: value.to_string(),
    };
    HelpDocument {
        title: "Fantasy League Assistant".to_string(),
        description: "Commands for head-to-head category leagues".to_string(),
        fields: vec![
            field("help", "Returns this message."),
            field(
                "scoreboard [week]",
                "Returns the scoreboard for the given week. If no week is provided, returns the current scoreboard.",
            ),
            field("standings", "Returns the current league standings."),
            field("roster <team>", "Returns the roster of the given team."),
            field(
                "stats <period> <player>",
                "Returns the stats of the requested player. <period> must be one of season|week|month.",
            ),
            field(
                "compare <period> <player1>/<player2>",
                "Returns the difference in stats between the two players. <period> must be one of season|week|month.",
            ),
            field(
                "analyze <period> <stat1>,<stat2>,...",
                "Returns the top free agents for each stat. <period> must be one of season|week|month.",
            ),
            field(
                "vs [week] <team>",
                "Returns the given team's matchup results against every other team in the league. If no week is provided, the current week is used.",
            ),
            field("schedule <team>", "Returns the season schedule of the given team."),
            field(
                "owner <player1>,<player2>,...",
                "Returns the current owner of each player.",
            ),
            field(
                "leaders [date]",
                "Returns the stat category leaders for a day. <date> is YYYY-MM-DD or 'yesterday'; defaults to today.",
            ),
            field(
                "h2h [week] <team1>/<team2>",
                "Returns the matchup result between the two teams for the given week. If no week is provided, the current week is used.",
            ),
            field(
                "ranks [week] <stat>",
                "Returns the team ranking for the given stat. If no week is provided, the current week is used.",
            ),
        ],
    }
}
