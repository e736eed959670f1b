mod config;
mod derive;
mod error;
mod logo;
mod output;
mod types;
mod yahoo;

use std::path::Path;

use serde_json::Value;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, FRANCHISE_MIN_SEASONS, PLAYOFF_WEEK_SPAN, SEASONS};
use crate::error::{AppError, Result};
use crate::logo::{colors, download};
use crate::output::LeagueDoc;
use crate::types::{FranchiseStreak, LeagueHistory, PlayoffMatchup, SeasonSummary, StandingEntry};
use crate::yahoo::{extract, league_key, Session};

#[tokio::main]
async fn main() {
    let cfg = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    // --- OAuth session ---
    let mut session = Session::new(&cfg)?;
    session.authenticate().await?;

    if cfg.list_leagues {
        return list_leagues(&mut session).await;
    }

    // --- Season loop ---
    let mut history = LeagueHistory::new();
    for &(season, game_key, league_id) in SEASONS {
        fetch_season(&mut session, &mut history, season, game_key, league_id).await?;
    }

    // --- Logos and colors ---
    hydrate_logos(&cfg, &mut history).await?;

    // --- Derived views and output ---
    let franchise_players = derive::franchise_streaks(&history);
    log_results(&history, &franchise_players);

    let doc = LeagueDoc::assemble(&history, franchise_players);
    output::write_json(&cfg.output_path, &doc)?;
    info!("League data saved to {}", cfg.output_path);
    info!("Logos saved to {}/", cfg.logos_dir);

    Ok(())
}

/// One API document. Fetch trouble degrades to None so a bad season or team
/// does not abort the whole run; auth failures stay fatal.
async fn get_degraded(session: &mut Session, endpoint: &str) -> Result<Option<Value>> {
    match session.get(endpoint).await {
        Ok(doc) => Ok(doc),
        Err(AppError::Auth(e)) => Err(AppError::Auth(e)),
        Err(e) => {
            warn!("{endpoint}: {e}");
            Ok(None)
        }
    }
}

/// Fetch one season end to end: standings, playoff bracket, then every
/// team's roster.
async fn fetch_season(
    session: &mut Session,
    history: &mut LeagueHistory,
    season: &str,
    game_key: &str,
    league_id: &str,
) -> Result<()> {
    info!("=== {season} (game {game_key}, league {league_id}) ===");
    let key = league_key(game_key, league_id);

    let standings = match get_degraded(session, &format!("league/{key}/standings")).await? {
        Some(doc) => extract::parse_standings(&doc).unwrap_or_default(),
        None => Vec::new(),
    };
    if standings.is_empty() {
        warn!("Could not fetch data for {season} (league may not exist for this season)");
        return Ok(());
    }

    if let Some(champion) = standings.first() {
        info!(
            "Champion: {} ({})",
            champion.name.as_deref().unwrap_or("?"),
            champion.manager.as_deref().unwrap_or("?"),
        );
    }

    let playoffs = fetch_playoffs(session, &key).await?;
    match &playoffs {
        Some(matchups) => {
            for m in matchups {
                info!(
                    "  round {} (week {}): {} vs {} -> {}",
                    m.round,
                    m.week,
                    m.teams[0].as_deref().unwrap_or("?"),
                    m.teams[1].as_deref().unwrap_or("?"),
                    m.winner.as_deref().unwrap_or("undecided"),
                );
            }
        }
        None => info!("No playoff data available for {season}"),
    }

    history.record_summary(summarize_season(season, &standings, playoffs));
    history.record_standings(season, &standings);

    // Rosters
    let stubs = match get_degraded(session, &format!("league/{key}/teams")).await? {
        Some(doc) => extract::parse_team_keys(&doc).unwrap_or_default(),
        None => Vec::new(),
    };
    for stub in stubs {
        let roster = match get_degraded(session, &format!("team/{}/roster", stub.team_key)).await? {
            Some(doc) => extract::parse_roster(&doc).unwrap_or_default(),
            None => Vec::new(),
        };
        if roster.is_empty() {
            warn!("  {}: no roster data", stub.name);
            continue;
        }
        info!(
            "  {} ({}): {} players",
            stub.name,
            stub.manager.as_deref().unwrap_or("?"),
            roster.len(),
        );
        history.record_roster(season, &stub.name, roster);
    }

    Ok(())
}

/// Probe the playoff weeks and collect the bracket. None when the season
/// has no playoff start week or the probed weeks held no matchups.
async fn fetch_playoffs(session: &mut Session, key: &str) -> Result<Option<Vec<PlayoffMatchup>>> {
    let start = match get_degraded(session, &format!("league/{key}/settings")).await? {
        Some(doc) => extract::parse_playoff_start_week(&doc),
        None => None,
    };
    let Some(start) = start else {
        return Ok(None);
    };

    let mut matchups = Vec::new();
    for week in start..start + PLAYOFF_WEEK_SPAN {
        let endpoint = format!("league/{key}/scoreboard;week={week}");
        if let Some(doc) = get_degraded(session, &endpoint).await? {
            matchups.extend(extract::parse_week_matchups(&doc, week, start));
        }
    }
    Ok((!matchups.is_empty()).then_some(matchups))
}

fn summarize_season(
    season: &str,
    standings: &[StandingEntry],
    playoffs: Option<Vec<PlayoffMatchup>>,
) -> SeasonSummary {
    let champion = standings.first();
    let runner_up = standings.get(1);
    SeasonSummary {
        season: season.to_string(),
        champion_team: champion.and_then(|c| c.name.clone()),
        champion_owner: champion.and_then(|c| c.manager.clone()),
        runner_up_team: runner_up.and_then(|r| r.name.clone()),
        runner_up_owner: runner_up.and_then(|r| r.manager.clone()),
        playoffs,
    }
}

/// Download every team's logo and extract its palette, recording both on
/// the team records.
async fn hydrate_logos(cfg: &Config, history: &mut LeagueHistory) -> Result<()> {
    info!("Downloading logos and extracting colors...");
    let client = download::client()?;
    for (name, record) in history.teams.iter_mut() {
        record.logo_file =
            download::download_logo(&client, &cfg.logos_dir, name, record.logo_url.as_deref())
                .await;
        record.colors = record
            .logo_file
            .as_deref()
            .and_then(|file| colors::extract_logo_colors(&Path::new(&cfg.logos_dir).join(file)));
        if let Some(palette) = &record.colors {
            info!("  {name}: {}", palette.join(", "));
        }
    }
    Ok(())
}

/// Print every NHL league the signed-in account can see. This is how the
/// league id for a new season gets found after the yearly renewal.
async fn list_leagues(session: &mut Session) -> Result<()> {
    let Some(doc) = session
        .get("users;use_login=1/games;game_codes=nhl/leagues")
        .await?
    else {
        warn!("Could not fetch the league listing");
        return Ok(());
    };

    let listings = extract::parse_user_leagues(&doc);
    info!("{} leagues visible to this account:", listings.len());
    for l in &listings {
        info!(
            "  {} {}: league_id={} league_key={} (game {})",
            l.season, l.name, l.league_id, l.league_key, l.game_key,
        );
    }
    Ok(())
}

fn log_results(history: &LeagueHistory, franchise_players: &[FranchiseStreak]) {
    info!("--- Teams ---");
    for (name, record) in &history.teams {
        info!(
            "{name} ({}) [{}]",
            record.owner.as_deref().unwrap_or("?"),
            record.logo_file.as_deref().unwrap_or("no logo"),
        );
    }

    info!("--- Champions ---");
    for summary in &history.summaries {
        info!(
            "{}: {} ({})",
            summary.season,
            summary.champion_team.as_deref().unwrap_or("?"),
            summary.champion_owner.as_deref().unwrap_or("?"),
        );
        if let Some(final_match) = final_matchup(summary) {
            info!(
                "  final: {} ({}) vs {} ({})",
                final_match.teams[0].as_deref().unwrap_or("?"),
                fmt_score(final_match.scores[0]),
                final_match.teams[1].as_deref().unwrap_or("?"),
                fmt_score(final_match.scores[1]),
            );
        }
    }

    info!("--- Franchise players ({FRANCHISE_MIN_SEASONS}+ consecutive seasons) ---");
    for fp in franchise_players {
        let span = match (fp.seasons.first(), fp.seasons.last()) {
            (Some(first), Some(last)) => format!("{first} to {last}"),
            _ => String::new(),
        };
        info!(
            "{} ({}) on {}: {} years, ~{} games [{span}]",
            fp.player,
            fp.position.as_deref().unwrap_or("?"),
            fp.team,
            fp.years,
            fp.games,
        );
    }
    info!("Total franchise players: {}", franchise_players.len());
}

/// The highest-round matchup of a season's bracket. The first one wins when
/// the final round spans several probed weeks.
fn final_matchup(summary: &SeasonSummary) -> Option<&PlayoffMatchup> {
    let playoffs = summary.playoffs.as_ref()?;
    let max_round = playoffs.iter().map(|m| m.round).max()?;
    playoffs.iter().find(|m| m.round == max_round)
}

fn fmt_score(score: Option<f64>) -> String {
    score.map(|s| s.to_string()).unwrap_or_else(|| "?".to_string())
}
