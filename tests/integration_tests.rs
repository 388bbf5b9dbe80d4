// End-to-end tests: raw chat text in, rendered reply out, over a scripted
// in-memory provider. These exercise the tokenizer, command parsing, the
// dispatcher's fetch-and-format paths, the matchup evaluator, and the chat
// loop together.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::mpsc;

use courtside::bot::{self, ChatMessage, Outbound};
use courtside::command::Period;
use courtside::config::{load_config_from_str, Config};
use courtside::dispatch::{Dispatcher, Reply};
use courtside::matchup::{StatLine, Team};
use courtside::provider::*;

// ===========================================================================
// Scripted provider
// ===========================================================================

/// Fixed-data provider. Call counters let tests assert how many fetches a
/// command actually performed.
#[derive(Default)]
struct ScriptedProvider {
    player_stats_calls: AtomicUsize,
}

/// A full nine-category line with fixed values except points and turnovers.
fn team_line(pts: f64, tov: f64) -> StatLine {
    StatLine::from_pairs([
        (5, 0.471),
        (8, 0.802),
        (10, 11.0),
        (12, pts),
        (15, 40.0),
        (16, 22.0),
        (17, 6.0),
        (18, 4.0),
        (19, tov),
    ])
}

fn league_teams() -> Vec<Team> {
    vec![
        Team {
            name: "Ball Hogs".into(),
            key: "nba.l.7.t.1".into(),
            stats: team_line(100.0, 10.0),
        },
        Team {
            name: "Dunk City".into(),
            key: "nba.l.7.t.2".into(),
            stats: team_line(100.0, 14.0),
        },
        Team {
            name: "Swish Kebabs".into(),
            key: "nba.l.7.t.3".into(),
            stats: team_line(90.0, 16.0),
        },
    ]
}

fn jokic_line() -> StatLine {
    StatLine::from_pairs([
        (5, 0.583),
        (8, 0.820),
        (10, 1.1),
        (12, 26.4),
        (15, 12.3),
        (16, 9.0),
        (17, 1.3),
        (18, 0.9),
        (19, 3.0),
    ])
}

fn doncic_line() -> StatLine {
    StatLine::from_pairs([
        (5, 0.487),
        (8, 0.786),
        (10, 3.1),
        (12, 33.0),
        (15, 9.2),
        (16, 9.8),
        (17, 1.4),
        (18, 0.5),
        (19, 4.1),
    ])
}

#[async_trait]
impl FantasyProvider for ScriptedProvider {
    async fn scoreboard(&self, week: Option<u32>) -> Result<Vec<Matchup>, ProviderError> {
        if week == Some(99) {
            return Err(ProviderError::Remote(
                "scoreboard temporarily unavailable".into(),
            ));
        }
        Ok(vec![Matchup {
            week: week.unwrap_or(5),
            team_a: MatchupSide {
                name: "Ball Hogs".into(),
                key: "nba.l.7.t.1".into(),
            },
            team_b: MatchupSide {
                name: "Dunk City".into(),
                key: "nba.l.7.t.2".into(),
            },
            stat_winners: vec![
                StatWinner { category_id: 12, winner_team_key: "nba.l.7.t.1".into() },
                StatWinner { category_id: 15, winner_team_key: "nba.l.7.t.2".into() },
                StatWinner { category_id: 19, winner_team_key: "nba.l.7.t.1".into() },
            ],
        }])
    }

    async fn standings(&self) -> Result<Vec<StandingsRow>, ProviderError> {
        Ok(vec![
            StandingsRow { rank: 1, team: "Ball Hogs".into(), wins: 40, losses: 20, ties: 3 },
            StandingsRow { rank: 2, team: "Dunk City".into(), wins: 35, losses: 25, ties: 3 },
        ])
    }

    async fn roster(&self, team: &str) -> Result<TeamRoster, ProviderError> {
        if !team.eq_ignore_ascii_case("ball hogs") {
            return Err(ProviderError::TeamNotFound(team.to_string()));
        }
        Ok(TeamRoster {
            team: "Ball Hogs".into(),
            players: vec![
                RosterEntry { player: "Bench Guy".into(), position: "BN".into() },
                RosterEntry { player: "Floor General".into(), position: "PG".into() },
                RosterEntry { player: "Towel Waver".into(), position: "MASCOT".into() },
            ],
        })
    }

    async fn player_stats(
        &self,
        player: &str,
        period: Period,
    ) -> Result<PlayerStats, ProviderError> {
        self.player_stats_calls.fetch_add(1, Ordering::SeqCst);
        // Name search is lenient about surrounding whitespace, like the
        // real service's player search.
        let (name, stats) = match player.trim().to_ascii_lowercase().as_str() {
            "nikola jokic" => ("Nikola Jokic", jokic_line()),
            "luka doncic" => ("Luka Doncic", doncic_line()),
            _ => return Err(ProviderError::PlayerNotFound(player.to_string())),
        };
        Ok(PlayerStats {
            player: name.into(),
            period,
            stats,
        })
    }

    async fn team_stats(&self, _week: Option<u32>) -> Result<Vec<Team>, ProviderError> {
        Ok(league_teams())
    }

    async fn free_agents_by_stat(
        &self,
        category_id: u32,
        count: usize,
        _period: Period,
    ) -> Result<Vec<RankedPlayer>, ProviderError> {
        Ok((0..count.min(2))
            .map(|i| RankedPlayer {
                player: format!("FA-{category_id}-{i}"),
                value: 20.0 - i as f64,
            })
            .collect())
    }

    async fn player_ownership(&self, player: &str) -> Result<PlayerOwnership, ProviderError> {
        let status = match player.trim().to_ascii_lowercase().as_str() {
            "nikola jokic" => Ownership::Owned { team: "Ball Hogs".into() },
            "bones hyland" => Ownership::Waivers {
                until: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            },
            "deep cut" => Ownership::FreeAgent,
            _ => return Err(ProviderError::PlayerNotFound(player.to_string())),
        };
        Ok(PlayerOwnership {
            player: player.to_string(),
            status,
        })
    }

    async fn team_schedule(&self, team: &str) -> Result<TeamSchedule, ProviderError> {
        Ok(TeamSchedule {
            team: team.to_string(),
            entries: vec![
                ScheduleEntry { week: 1, opponent: "Dunk City".into(), result: GameResult::Win },
                ScheduleEntry {
                    week: 2,
                    opponent: "Swish Kebabs".into(),
                    result: GameResult::InProgress,
                },
            ],
        })
    }

    async fn stat_leaders(
        &self,
        _date: NaiveDate,
        category_id: u32,
        _count: usize,
    ) -> Result<Vec<LeaderEntry>, ProviderError> {
        Ok(vec![LeaderEntry {
            player: format!("Leader-{category_id}"),
            position: "C".into(),
            value: 30.0,
        }])
    }
}

// ===========================================================================
// Test helpers
// ===========================================================================

fn test_config() -> Config {
    load_config_from_str(
        r#"
        [league]
        game_key = "nba"
        league_id = 7
        "#,
    )
    .unwrap()
}

fn dispatcher() -> (Arc<ScriptedProvider>, Dispatcher) {
    let provider = Arc::new(ScriptedProvider::default());
    let dispatcher = Dispatcher::new(&test_config(), provider.clone());
    (provider, dispatcher)
}

/// Run one message through the dispatcher and expect a plain-text reply.
async fn text_reply(dispatcher: &Dispatcher, message: &str) -> String {
    match dispatcher.handle_message(message).await {
        Some(Reply::Text(body)) => body,
        other => panic!("expected text reply for {message:?}, got {other:?}"),
    }
}

// ===========================================================================
// Dispatch scenarios
// ===========================================================================

#[tokio::test]
async fn unrecognized_messages_get_no_reply() {
    let (_, dispatcher) = dispatcher();
    assert!(dispatcher.handle_message("just chatting").await.is_none());
    assert!(dispatcher.handle_message("!flexes").await.is_none());
}

#[tokio::test]
async fn malformed_command_gets_a_usage_line() {
    let (_, dispatcher) = dispatcher();
    assert_eq!(
        text_reply(&dispatcher, "!stats").await,
        "Error: invalid !stats usage. See !help for usage."
    );
}

#[tokio::test]
async fn unresolvable_player_gets_one_error_block_and_one_fetch() {
    let (provider, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!stats week giannis").await;
    assert!(reply.starts_with("```\nError:"), "not an error block: {reply}");
    assert!(reply.contains("giannis"));
    assert_eq!(provider.player_stats_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn remote_failure_is_surfaced_verbatim() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!scoreboard 99").await;
    assert_eq!(reply, "```\nError: scoreboard temporarily unavailable```");
}

#[tokio::test]
async fn scoreboard_reports_category_counts() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!scoreboard").await;
    assert!(reply.contains("Week 5 Matchups"));
    assert!(reply.contains("Ball Hogs (2)"));
    assert!(reply.contains("Dunk City (1)"));
}

#[tokio::test]
async fn standings_lists_ranked_teams() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!standings").await;
    assert!(reply.contains(" 1: Ball Hogs (40-20-3)"));
    assert!(reply.contains(" 2: Dunk City (35-25-3)"));
}

#[tokio::test]
async fn roster_drops_unknown_position_slots() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!roster Ball Hogs").await;
    assert!(reply.contains("PG: Floor General"));
    assert!(reply.contains("BN: Bench Guy"));
    assert!(!reply.contains("Towel Waver"));
}

#[tokio::test]
async fn stats_renders_player_table() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!stats season nikola jokic").await;
    assert!(reply.contains("Nikola Jokic - Season Average"));
    assert!(reply.contains("FG%: 0.583"));
    assert!(reply.contains("PTS: 26.4"));
}

#[tokio::test]
async fn compare_diffs_subject_minus_opponent() {
    let (provider, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!compare season nikola jokic/luka doncic").await;
    assert!(reply.contains("Nikola Jokic / Luka Doncic"));
    assert!(reply.contains("FG%: 0.096"));
    assert!(reply.contains("PTS: -6.6"));
    assert!(reply.contains("TOV: -1.1"));
    assert_eq!(provider.player_stats_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn analyze_sections_follow_request_order() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!analyze week tov,pts").await;
    let tov = reply.find("TOV\n").expect("TOV section missing");
    let pts = reply.find("PTS\n").expect("PTS section missing");
    assert!(tov < pts, "sections out of request order");
    assert!(reply.contains("FA-19-0 (20.0)"));
    assert!(reply.contains("FA-12-0 (20.0)"));
}

#[tokio::test]
async fn analyze_rejects_unknown_stat() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!analyze week dunks").await;
    assert!(reply.contains("Error:"));
    assert!(reply.contains("dunks"));
}

#[tokio::test]
async fn vs_league_totals_independent_pairings() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!vs Ball Hogs").await;
    assert!(reply.contains("Ball Hogs vs. The League"));
    // Beats Dunk City on turnovers alone, beats Swish Kebabs on points and
    // turnovers.
    assert!(reply.contains("Total: 2-0-0"));
}

#[tokio::test]
async fn h2h_turnover_edge_decides_otherwise_tied_matchup() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!h2h Ball Hogs/Dunk City").await;
    assert!(reply.contains("H2H: Ball Hogs vs Dunk City"));
    assert!(reply.contains("TOV:     10.0 | 14.0"));
    assert!(reply.contains("Total: 1-0-8"));
}

#[tokio::test]
async fn h2h_unknown_team_is_named_in_the_error() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!h2h Ball Hogs/Nobody Here").await;
    assert_eq!(reply, "```\nError: team \"Nobody Here\" not found```");
}

#[tokio::test]
async fn ranks_uses_raw_magnitude_even_for_turnovers() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!ranks tov").await;
    let first = reply.find("Swish Kebabs").expect("missing team");
    let last = reply.find("Ball Hogs").expect("missing team");
    assert!(first < last);
    assert!(reply.contains(" 1: Swish Kebabs - 16.0"));
    assert!(reply.contains(" 3: Ball Hogs - 10.0"));
}

#[tokio::test]
async fn owner_lists_each_player_in_request_order() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!owner nikola jokic,deep cut").await;
    let jokic = reply.find("nikola jokic: Ball Hogs").expect("owned row missing");
    let fa = reply.find("Free Agent").expect("free-agent row missing");
    assert!(jokic < fa);
}

#[tokio::test]
async fn schedule_shows_results_and_in_progress() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!schedule Ball Hogs").await;
    assert!(reply.contains(" 1: Dunk City (W)"));
    assert!(reply.contains(" 2: *Swish Kebabs*"));
    assert!(reply.contains("Total: 1-0-0"));
}

#[tokio::test]
async fn leaders_covers_all_nine_categories() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!leaders 2026-01-05").await;
    assert!(reply.contains("2026-01-05 Stat Leaders"));
    for id in [5, 8, 10, 12, 15, 16, 17, 18, 19] {
        assert!(reply.contains(&format!("Leader-{id}")), "missing leaders for stat {id}");
    }
}

#[tokio::test]
async fn leaders_rejects_garbage_dates() {
    let (_, dispatcher) = dispatcher();
    let reply = text_reply(&dispatcher, "!leaders someday").await;
    assert!(reply.contains("Error:"));
    assert!(reply.contains("someday"));
}

#[tokio::test]
async fn help_is_a_rich_document() {
    let (_, dispatcher) = dispatcher();
    match dispatcher.handle_message("!help").await {
        Some(Reply::Rich(doc)) => {
            assert_eq!(doc.fields.len(), 13);
            assert!(doc.fields.iter().any(|f| f.name == "!compare <period> <player1>/<player2>"));
        }
        other => panic!("expected rich help reply, got {other:?}"),
    }
}

// ===========================================================================
// Chat loop
// ===========================================================================

#[tokio::test]
async fn chat_loop_ignores_self_and_replies_on_the_right_channel() {
    let (_, dispatcher) = dispatcher();
    let (in_tx, in_rx) = mpsc::channel(16);
    let (out_tx, mut out_rx) = mpsc::channel(16);

    let loop_handle = tokio::spawn(bot::run(dispatcher, in_rx, out_tx));

    // Our own message: dropped even though it looks like a command.
    in_tx
        .send(ChatMessage {
            sender_is_self: true,
            channel: "general".into(),
            text: "!standings".into(),
        })
        .await
        .unwrap();
    // Not a command: dropped.
    in_tx
        .send(ChatMessage {
            sender_is_self: false,
            channel: "general".into(),
            text: "who wants to trade?".into(),
        })
        .await
        .unwrap();
    // A real command on another channel.
    in_tx
        .send(ChatMessage {
            sender_is_self: false,
            channel: "stats-corner".into(),
            text: "!standings".into(),
        })
        .await
        .unwrap();
    drop(in_tx);

    loop_handle.await.unwrap().unwrap();

    let mut replies = Vec::new();
    while let Some(reply) = out_rx.recv().await {
        replies.push(reply);
    }
    assert_eq!(replies.len(), 1);
    match &replies[0] {
        Outbound::Text { channel, body } => {
            assert_eq!(channel, "stats-corner");
            assert!(body.contains("Standings"));
        }
        other => panic!("expected text outbound, got {other:?}"),
    }
}
