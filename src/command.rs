// Message tokenizing and command parsing.
//
// Incoming chat text is split into a keyword plus positional arguments and
// an optional free-text tail. Each recognized keyword maps to a `Command`
// variant carrying its parsed, typed arguments; the per-keyword tail/arity
// rules live in `Command::parse` so the rest of the crate never sees raw
// message text.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Split a raw message into argument tokens.
///
/// Strips `prefix` from the front of `raw`, then splits the remainder on
/// runs of whitespace. With `tail_index: None` the whitespace tokens are
/// returned as-is. With `tail_index: Some(n)` the first `n` tokens are kept
/// verbatim and the remaining tokens are rejoined with single spaces into a
/// free-text tail, which becomes one final token when `tail_sep` is empty
/// or is split on `tail_sep` into multiple trailing tokens otherwise.
///
/// When `n` is at or past the end of the token list the tail is empty, and
/// an empty tail still produces exactly one empty-string token — callers
/// treat that as a missing argument in their own arity check.
///
/// Pure: identical inputs always produce identical output.
pub fn tokenize(prefix: &str, raw: &str, tail_index: Option<usize>, tail_sep: &str) -> Vec<String> {
    let rest = raw.strip_prefix(prefix).unwrap_or(raw);
    let fields: Vec<&str> = rest.split_whitespace().collect();

    let Some(ind) = tail_index else {
        return fields.into_iter().map(str::to_string).collect();
    };

    let ind = ind.min(fields.len());
    let mut args: Vec<String> = fields[..ind].iter().map(|s| s.to_string()).collect();

    let tail = fields[ind..].join(" ");
    if tail_sep.is_empty() {
        args.push(tail);
    } else {
        args.extend(tail.split(tail_sep).map(str::to_string));
    }
    args
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// The time window a stat line covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Season averages.
    Season,
    /// Averages over the last seven days.
    LastWeek,
    /// Averages over the last thirty days.
    LastMonth,
}

impl FromStr for Period {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "season" => Ok(Period::Season),
            "week" => Ok(Period::LastWeek),
            "month" => Ok(Period::LastMonth),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Period::Season => "season",
            Period::LastWeek => "last week",
            Period::LastMonth => "last month",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A recognized command whose arguments passed the keyword's shape check.
///
/// `week: None` means the current week; the data source resolves which week
/// that is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scoreboard { week: Option<u32> },
    Standings,
    Roster { team: String },
    Stats { period: Period, player: String },
    Compare { period: Period, player_a: String, player_b: String },
    Analyze { period: Period, stats: Vec<String> },
    VsLeague { week: Option<u32>, team: String },
    Schedule { team: String },
    Owner { players: Vec<String> },
    Leaders { date: Option<String> },
    HeadToHead { week: Option<u32>, team_a: String, team_b: String },
    Ranks { week: Option<u32>, stat: String },
    Help,
}

/// A recognized keyword whose arguments failed the shape check.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Error: invalid !{command} usage. See !help for usage.")]
pub struct UsageError {
    pub command: &'static str,
}

fn usage(command: &'static str) -> Result<Command, UsageError> {
    Err(UsageError { command })
}

impl Command {
    /// Parse a raw chat message.
    ///
    /// Returns `None` when the message does not start with `prefix` followed
    /// by a recognized keyword (such messages get no reply at all),
    /// `Some(Err(_))` when the keyword is recognized but the arguments fail
    /// its arity/shape check, and `Some(Ok(_))` otherwise.
    pub fn parse(prefix: &str, text: &str) -> Option<Result<Command, UsageError>> {
        let body = text.strip_prefix(prefix)?;
        let keyword = body.split_whitespace().next()?;
        let head = format!("{prefix}{keyword}");

        let parsed = match keyword {
            "scoreboard" => parse_scoreboard(&head, text),
            "standings" => parse_bare(&head, text, "standings", Command::Standings),
            "roster" => parse_single_name(&head, text, "roster", |team| Command::Roster { team }),
            "stats" => parse_stats(&head, text),
            "compare" => parse_compare(&head, text),
            "analyze" => parse_analyze(&head, text),
            "vs" => parse_week_then_name(&head, text, "vs", |week, team| Command::VsLeague {
                week,
                team,
            }),
            "schedule" => {
                parse_single_name(&head, text, "schedule", |team| Command::Schedule { team })
            }
            "owner" => parse_owner(&head, text),
            "leaders" => parse_leaders(&head, text),
            "h2h" => parse_h2h(&head, text),
            "ranks" => parse_week_then_name(&head, text, "ranks", |week, stat| Command::Ranks {
                week,
                stat,
            }),
            "help" => parse_bare(&head, text, "help", Command::Help),
            _ => return None,
        };
        Some(parsed)
    }
}

/// `!scoreboard [week]`
fn parse_scoreboard(head: &str, text: &str) -> Result<Command, UsageError> {
    let args = tokenize(head, text, None, "");
    match args.as_slice() {
        [] => Ok(Command::Scoreboard { week: None }),
        [week] => match week.parse::<u32>() {
            Ok(w) => Ok(Command::Scoreboard { week: Some(w) }),
            Err(_) => usage("scoreboard"),
        },
        _ => usage("scoreboard"),
    }
}

/// A keyword that takes no arguments at all.
fn parse_bare(
    head: &str,
    text: &str,
    name: &'static str,
    command: Command,
) -> Result<Command, UsageError> {
    if tokenize(head, text, None, "").is_empty() {
        Ok(command)
    } else {
        usage(name)
    }
}

/// A keyword whose entire tail is a single team name.
fn parse_single_name(
    head: &str,
    text: &str,
    name: &'static str,
    build: impl FnOnce(String) -> Command,
) -> Result<Command, UsageError> {
    let mut args = tokenize(head, text, Some(0), "");
    match args.pop() {
        Some(tail) if !tail.is_empty() && args.is_empty() => Ok(build(tail)),
        _ => usage(name),
    }
}

/// `!stats <period> <player>`
fn parse_stats(head: &str, text: &str) -> Result<Command, UsageError> {
    let args = tokenize(head, text, Some(1), "");
    match args.as_slice() {
        [period, player] if !player.is_empty() => match period.parse() {
            Ok(period) => Ok(Command::Stats {
                period,
                player: player.clone(),
            }),
            Err(()) => usage("stats"),
        },
        _ => usage("stats"),
    }
}

/// `!compare <period> <playerA>/<playerB>`
fn parse_compare(head: &str, text: &str) -> Result<Command, UsageError> {
    let args = tokenize(head, text, Some(1), "/");
    match args.as_slice() {
        [period, a, b] if !a.is_empty() && !b.is_empty() => match period.parse() {
            Ok(period) => Ok(Command::Compare {
                period,
                player_a: a.clone(),
                player_b: b.clone(),
            }),
            Err(()) => usage("compare"),
        },
        _ => usage("compare"),
    }
}

/// `!analyze <period> <stat1>,<stat2>,...`
fn parse_analyze(head: &str, text: &str) -> Result<Command, UsageError> {
    let args = tokenize(head, text, Some(1), ",");
    match args.split_first() {
        Some((period, stats)) if !stats.is_empty() && stats.iter().all(|s| !s.is_empty()) => {
            match period.parse() {
                Ok(period) => Ok(Command::Analyze {
                    period,
                    stats: stats.to_vec(),
                }),
                Err(()) => usage("analyze"),
            }
        }
        _ => usage("analyze"),
    }
}

/// `!owner <player1>,<player2>,...`
fn parse_owner(head: &str, text: &str) -> Result<Command, UsageError> {
    let players = tokenize(head, text, Some(0), ",");
    if players.iter().all(|p| !p.is_empty()) && !players.is_empty() {
        Ok(Command::Owner { players })
    } else {
        usage("owner")
    }
}

/// `!leaders [date]` — date is `YYYY-MM-DD` or `yesterday`; validation of
/// the date string itself happens at dispatch time.
fn parse_leaders(head: &str, text: &str) -> Result<Command, UsageError> {
    let args = tokenize(head, text, None, "");
    match args.as_slice() {
        [] => Ok(Command::Leaders { date: None }),
        [date] => Ok(Command::Leaders {
            date: Some(date.clone()),
        }),
        _ => usage("leaders"),
    }
}

/// Shared shape for `!vs [week] <name>` and `!ranks [week] <name>`: the
/// first token counts as a week only when it parses as an integer,
/// otherwise it is part of the name.
fn parse_week_then_name(
    head: &str,
    text: &str,
    name: &'static str,
    build: impl FnOnce(Option<u32>, String) -> Command,
) -> Result<Command, UsageError> {
    let (week, rest) = split_leading_week(tokenize(head, text, None, ""));
    if rest.is_empty() {
        usage(name)
    } else {
        Ok(build(week, rest))
    }
}

/// `!h2h [week] <teamA>/<teamB>`
fn parse_h2h(head: &str, text: &str) -> Result<Command, UsageError> {
    let (week, rest) = split_leading_week(tokenize(head, text, None, ""));
    let teams: Vec<&str> = rest.split('/').collect();
    match teams.as_slice() {
        [a, b] if !a.is_empty() && !b.is_empty() => Ok(Command::HeadToHead {
            week,
            team_a: a.to_string(),
            team_b: b.to_string(),
        }),
        _ => usage("h2h"),
    }
}

/// Pop an optional leading integer week off a token list and rejoin the
/// remainder with single spaces.
fn split_leading_week(args: Vec<String>) -> (Option<u32>, String) {
    match args.split_first() {
        Some((first, rest)) => match first.parse::<u32>() {
            Ok(week) => (Some(week), rest.join(" ")),
            Err(_) => (None, args.join(" ")),
        },
        None => (None, String::new()),
    }
}
