//! Assembly and serialization of the final league history document.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Result;
use crate::types::{FranchiseStreak, LeagueHistory, PlayerRecord, RosterPlayer, SeasonSummary};

/// One team in the output document. `logo` is the downloaded filename, not
/// the remote URL.
#[derive(Debug, Serialize)]
pub struct TeamSummary {
    pub name: String,
    pub owner: Option<String>,
    pub logo: Option<String>,
    pub colors: Option<Vec<String>>,
    pub seasons: Vec<String>,
}

/// The full document the site consumes. Key order and nesting are part of
/// the contract.
#[derive(Debug, Serialize)]
pub struct LeagueDoc {
    pub teams: Vec<TeamSummary>,
    pub seasons: Vec<SeasonSummary>,
    pub season_rosters: BTreeMap<String, Vec<String>>,
    pub team_rosters: BTreeMap<String, BTreeMap<String, Vec<RosterPlayer>>>,
    pub franchise_players: Vec<FranchiseStreak>,
    pub player_history: BTreeMap<String, PlayerRecord>,
}

impl LeagueDoc {
    /// The team list comes out sorted by name; the maps are already ordered.
    pub fn assemble(history: &LeagueHistory, franchise_players: Vec<FranchiseStreak>) -> Self {
        let teams = history
            .teams
            .iter()
            .map(|(name, record)| TeamSummary {
                name: name.clone(),
                owner: record.owner.clone(),
                logo: record.logo_file.clone(),
                colors: record.colors.clone(),
                seasons: record.seasons.clone(),
            })
            .collect();

        Self {
            teams,
            seasons: history.summaries.clone(),
            season_rosters: history.season_rosters.clone(),
            team_rosters: history.team_rosters.clone(),
            franchise_players,
            player_history: history.players.clone(),
        }
    }
}

/// Pretty-print a document to disk.
pub fn write_json<T: Serialize>(path: &str, doc: &T) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(doc)?)?;
    Ok(())
}
