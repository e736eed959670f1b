use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Per-season fetch results
// ---------------------------------------------------------------------------

/// One row of a season's final standings, sorted by rank (1 = champion).
#[derive(Debug, Clone)]
pub struct StandingEntry {
    /// Rank reported by the API, or the row position when absent.
    pub rank: u32,
    pub name: Option<String>,
    pub manager: Option<String>,
    pub logo_url: Option<String>,
}

/// A team reference with enough identity to fetch its roster.
#[derive(Debug, Clone)]
pub struct TeamStub {
    pub team_key: String,
    pub name: String,
    pub manager: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterPlayer {
    pub player_id: Option<u32>,
    pub name: String,
    pub position: Option<String>,
    pub jersey_number: Option<String>,
}

/// One playoff (non-consolation) matchup from a probed week.
#[derive(Debug, Clone, Serialize)]
pub struct PlayoffMatchup {
    pub week: u32,
    /// 1-based round within the bracket: week - playoff_start_week + 1.
    pub round: u32,
    pub teams: [Option<String>; 2],
    pub scores: [Option<f64>; 2],
    /// Set only when both scores are present and strictly unequal.
    pub winner: Option<String>,
}

/// Champion/runner-up summary for one completed season.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonSummary {
    pub season: String,
    pub champion_team: Option<String>,
    pub champion_owner: Option<String>,
    pub runner_up_team: Option<String>,
    pub runner_up_owner: Option<String>,
    pub playoffs: Option<Vec<PlayoffMatchup>>,
}

// ---------------------------------------------------------------------------
// Accumulated league history
// ---------------------------------------------------------------------------

/// Everything known about one team across all seasons. Keyed by team NAME in
/// the history maps, so a renamed team fragments into two records.
#[derive(Debug, Clone, Default)]
pub struct TeamRecord {
    /// Manager nickname from the first season the team appears in.
    pub owner: Option<String>,
    /// Most recent non-empty logo URL seen across the seasons.
    pub logo_url: Option<String>,
    pub logo_file: Option<String>,
    pub colors: Option<Vec<String>>,
    pub seasons: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerRecord {
    /// Seasons rostered, per team name.
    pub teams: BTreeMap<String, Vec<String>>,
    /// Position from the first sighting.
    pub position: Option<String>,
    pub player_id: Option<u32>,
    /// Most recent non-empty jersey number.
    pub jersey_number: Option<String>,
}

/// A player who spent a long consecutive run on one team.
#[derive(Debug, Clone, Serialize)]
pub struct FranchiseStreak {
    pub player: String,
    pub team: String,
    /// The consecutive run itself, in chronological order.
    pub seasons: Vec<String>,
    pub years: usize,
    pub games: u32,
    pub position: Option<String>,
    pub player_id: Option<u32>,
    pub jersey_number: Option<String>,
    pub team_colors: Option<Vec<String>>,
}

/// Mutable accumulator threaded through the season loop. All maps are
/// BTreeMaps so the serialized output is stable between runs.
#[derive(Debug, Default)]
pub struct LeagueHistory {
    pub teams: BTreeMap<String, TeamRecord>,
    pub summaries: Vec<SeasonSummary>,
    /// Season -> team names in standings order.
    pub season_rosters: BTreeMap<String, Vec<String>>,
    /// Season -> team name -> roster.
    pub team_rosters: BTreeMap<String, BTreeMap<String, Vec<RosterPlayer>>>,
    pub players: BTreeMap<String, PlayerRecord>,
}

impl LeagueHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one season's standings into the team records. Entries without a
    /// name cannot join name-keyed history and are dropped.
    pub fn record_standings(&mut self, season: &str, standings: &[StandingEntry]) {
        let order = self.season_rosters.entry(season.to_string()).or_default();
        for entry in standings {
            let Some(name) = entry.name.as_deref() else {
                continue;
            };
            order.push(name.to_string());

            let record = self.teams.entry(name.to_string()).or_insert_with(|| TeamRecord {
                owner: entry.manager.clone(),
                ..TeamRecord::default()
            });
            if entry.logo_url.is_some() {
                record.logo_url = entry.logo_url.clone();
            }
            record.seasons.push(season.to_string());
        }
    }

    pub fn record_summary(&mut self, summary: SeasonSummary) {
        self.summaries.push(summary);
    }

    /// Fold one team's roster for one season into the player records.
    pub fn record_roster(&mut self, season: &str, team_name: &str, roster: Vec<RosterPlayer>) {
        for player in &roster {
            let record = self.players.entry(player.name.clone()).or_insert_with(|| PlayerRecord {
                position: player.position.clone(),
                player_id: player.player_id,
                ..PlayerRecord::default()
            });
            if player.jersey_number.is_some() {
                record.jersey_number = player.jersey_number.clone();
            }
            record
                .teams
                .entry(team_name.to_string())
                .or_default()
                .push(season.to_string());
        }
        self.team_rosters
            .entry(season.to_string())
            .or_default()
            .insert(team_name.to_string(), roster);
    }
}
