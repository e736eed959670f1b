//! Pure extraction from Yahoo Fantasy response documents. Nothing here does
//! IO; every function takes the decoded JSON and pulls out what it can,
//! dropping records that are too incomplete to use downstream.

use serde_json::Value;

use crate::types::{PlayoffMatchup, RosterPlayer, StandingEntry, TeamStub};

use super::tree::{as_f64_lenient, as_str_nonempty, as_u64_lenient, counted_items, find_field};

fn league(doc: &Value) -> Option<&Value> {
    doc.get("fantasy_content")?.get("league")
}

/// Final standings out of a `league/{key}/standings` response, sorted by
/// rank (1 = champion). None when the document has no standings at all.
pub fn parse_standings(doc: &Value) -> Option<Vec<StandingEntry>> {
    let teams = find_field(find_field(league(doc)?, "standings")?, "teams")?;

    let mut rows = Vec::new();
    for (i, item) in counted_items(teams).enumerate() {
        let Some(team) = item.get("team") else { continue };
        let Some(info) = team.get(0) else { continue };

        let rank = team
            .get(2)
            .and_then(|v| v.get("team_standings"))
            .and_then(|v| v.get("rank"))
            .and_then(as_u64_lenient)
            .map(|r| r as u32)
            .unwrap_or(i as u32 + 1);

        rows.push(StandingEntry {
            rank,
            name: find_field(info, "name")
                .and_then(as_str_nonempty)
                .map(String::from),
            manager: manager_nickname(info),
            logo_url: logo_url(info),
        });
    }
    rows.sort_by_key(|r| r.rank);
    Some(rows)
}

/// Team keys, names and managers out of a `league/{key}/teams` response.
/// Rows missing a key or name cannot be fetched or joined and are dropped.
pub fn parse_team_keys(doc: &Value) -> Option<Vec<TeamStub>> {
    let teams = find_field(league(doc)?, "teams")?;

    let mut stubs = Vec::new();
    for item in counted_items(teams) {
        let Some(team) = item.get("team") else { continue };
        let Some(info) = team.get(0) else { continue };
        let team_key = find_field(info, "team_key").and_then(as_str_nonempty);
        let name = find_field(info, "name").and_then(as_str_nonempty);
        let (Some(team_key), Some(name)) = (team_key, name) else {
            continue;
        };
        stubs.push(TeamStub {
            team_key: team_key.to_string(),
            name: name.to_string(),
            manager: manager_nickname(info),
        });
    }
    Some(stubs)
}

/// Players out of a `team/{key}/roster` response. The players collection
/// sits under a "0" coverage wrapper on current responses and directly
/// under `roster` on older ones.
pub fn parse_roster(doc: &Value) -> Option<Vec<RosterPlayer>> {
    let roster = find_field(doc.get("fantasy_content")?.get("team")?, "roster")?;
    let players = roster
        .get("0")
        .and_then(|cov| cov.get("players"))
        .or_else(|| roster.get("players"))?;

    let mut out = Vec::new();
    for item in counted_items(players) {
        let Some(player) = item.get("player") else { continue };
        // player[0] is the fragment list, except on responses that skip
        // that level of nesting.
        let info = match player.get(0) {
            Some(first) if first.is_array() => first,
            _ => player,
        };

        let Some(name) = player_name(info) else { continue };

        out.push(RosterPlayer {
            player_id: find_field(info, "player_id")
                .and_then(as_u64_lenient)
                .map(|id| id as u32),
            name,
            position: find_field(info, "primary_position")
                .and_then(as_str_nonempty)
                .or_else(|| find_field(info, "display_position").and_then(as_str_nonempty))
                .map(String::from),
            jersey_number: find_field(info, "uniform_number")
                .and_then(as_str_nonempty)
                .map(String::from),
        });
    }
    Some(out)
}

/// The week the playoff bracket begins, out of a `league/{key}/settings`
/// response. None means the season has no derivable bracket.
pub fn parse_playoff_start_week(doc: &Value) -> Option<u32> {
    let settings = find_field(league(doc)?, "settings")?;
    find_field(settings, "playoff_start_week")
        .and_then(as_u64_lenient)
        .map(|w| w as u32)
}

/// Playoff matchups out of one week's `scoreboard;week=` response.
/// Consolation matchups are third-place noise and dropped, as is anything
/// without exactly two sides. A winner is only declared when both totals
/// are present and strictly unequal, so a real 0.0 still counts as played.
pub fn parse_week_matchups(doc: &Value, week: u32, playoff_start: u32) -> Vec<PlayoffMatchup> {
    let Some(matchups) = league(doc)
        .and_then(|l| find_field(l, "scoreboard"))
        .and_then(|sb| sb.get("0"))
        .and_then(|sb| sb.get("matchups"))
    else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for item in counted_items(matchups) {
        let Some(matchup) = item.get("matchup") else { continue };
        let is_playoff = matchup.get("is_playoffs").and_then(Value::as_str) == Some("1");
        let is_consolation = matchup.get("is_consolation").and_then(Value::as_str) == Some("1");
        if !is_playoff || is_consolation {
            continue;
        }
        let Some(teams) = matchup.get("0").and_then(|m| m.get("teams")) else {
            continue;
        };

        let mut sides = Vec::new();
        for entry in counted_items(teams) {
            let Some(team) = entry.get("team") else { continue };
            let name = team
                .get(0)
                .and_then(|info| find_field(info, "name"))
                .and_then(as_str_nonempty)
                .map(String::from);
            let score = team
                .get(1)
                .and_then(|p| p.get("team_points"))
                .and_then(|p| p.get("total"))
                .and_then(as_f64_lenient);
            sides.push((name, score));
        }
        if sides.len() != 2 {
            continue;
        }
        let mut sides = sides.into_iter();
        let (Some((name_a, score_a)), Some((name_b, score_b))) = (sides.next(), sides.next())
        else {
            continue;
        };

        let winner = match (score_a, score_b) {
            (Some(a), Some(b)) if a > b => name_a.clone(),
            (Some(a), Some(b)) if b > a => name_b.clone(),
            _ => None,
        };

        out.push(PlayoffMatchup {
            week,
            round: week.saturating_sub(playoff_start) + 1,
            teams: [name_a, name_b],
            scores: [score_a, score_b],
            winner,
        });
    }
    out
}

/// One row per league visible to the signed-in account, out of a
/// `users;use_login=1/games;game_codes=nhl/leagues` response.
#[derive(Debug, Clone)]
pub struct LeagueListing {
    pub season: String,
    pub game_key: String,
    pub league_key: String,
    pub league_id: String,
    pub name: String,
}

pub fn parse_user_leagues(doc: &Value) -> Vec<LeagueListing> {
    let Some(games) = doc
        .get("fantasy_content")
        .and_then(|fc| fc.get("users"))
        .and_then(|u| u.get("0"))
        .and_then(|u| u.get("user"))
        .and_then(|u| find_field(u, "games"))
    else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for item in counted_items(games) {
        let Some(game) = item.get("game") else { continue };
        let season = find_field(game, "season").and_then(as_str_nonempty).unwrap_or("?");
        let game_key = find_field(game, "game_key").and_then(as_str_nonempty).unwrap_or("?");
        let Some(leagues) = find_field(game, "leagues") else { continue };

        for entry in counted_items(leagues) {
            let Some(league) = entry.get("league") else { continue };
            let field = |key: &str| {
                find_field(league, key)
                    .and_then(as_str_nonempty)
                    .unwrap_or("?")
                    .to_string()
            };
            out.push(LeagueListing {
                season: season.to_string(),
                game_key: game_key.to_string(),
                league_key: field("league_key"),
                league_id: field("league_id"),
                name: field("name"),
            });
        }
    }
    out
}

/// Player's name from a fragment list: `name.full`, else first and last
/// joined. None when nothing usable is present.
fn player_name(info: &Value) -> Option<String> {
    let name = find_field(info, "name")?;
    if let Some(full) = name.get("full").and_then(as_str_nonempty) {
        return Some(full.to_string());
    }
    let first = name.get("first").and_then(as_str_nonempty).unwrap_or("");
    let last = name.get("last").and_then(as_str_nonempty).unwrap_or("");
    let joined = format!("{first} {last}");
    let joined = joined.trim();
    (!joined.is_empty()).then(|| joined.to_string())
}

/// First listed manager's nickname from a team info fragment list.
fn manager_nickname(info: &Value) -> Option<String> {
    find_field(info, "managers")
        .and_then(|m| find_field(m, "manager"))
        .and_then(|m| m.get("nickname"))
        .and_then(as_str_nonempty)
        .map(String::from)
}

fn logo_url(info: &Value) -> Option<String> {
    find_field(info, "team_logos")
        .and_then(|l| find_field(l, "team_logo"))
        .and_then(|l| l.get("url"))
        .and_then(as_str_nonempty)
        .map(String::from)
}
