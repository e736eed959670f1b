//! Franchise-player derivation: who stayed on one roster long enough to
//! count as part of the furniture.

use crate::config::{FRANCHISE_MIN_SEASONS, GAMES_PER_SEASON};
use crate::types::{FranchiseStreak, LeagueHistory};

/// Longest run of season labels with consecutive start years, returned in
/// chronological order. When two runs tie, the earlier one wins. Labels
/// whose start year does not parse are ignored.
pub fn longest_consecutive_run(seasons: &[String]) -> Vec<String> {
    let mut dated: Vec<(i32, &String)> = seasons
        .iter()
        .filter_map(|s| start_year(s).map(|y| (y, s)))
        .collect();
    dated.sort_by_key(|(year, _)| *year);

    let mut best: Vec<&String> = Vec::new();
    let mut current: Vec<&String> = Vec::new();
    let mut prev_year = None;

    for (year, label) in dated {
        match prev_year {
            Some(prev) if year == prev + 1 => current.push(label),
            _ => {
                if current.len() > best.len() {
                    best = std::mem::take(&mut current);
                }
                current = vec![label];
            }
        }
        prev_year = Some(year);
    }
    if current.len() > best.len() {
        best = current;
    }

    best.into_iter().cloned().collect()
}

/// Every (player, team) pair whose longest consecutive run reaches the
/// franchise threshold, ordered by streak length descending and player name
/// ascending. Games played are estimated at a full NHL schedule per season.
pub fn franchise_streaks(history: &LeagueHistory) -> Vec<FranchiseStreak> {
    let mut streaks = Vec::new();

    for (player_name, record) in &history.players {
        for (team_name, seasons) in &record.teams {
            let run = longest_consecutive_run(seasons);
            let years = run.len();
            if years < FRANCHISE_MIN_SEASONS {
                continue;
            }
            streaks.push(FranchiseStreak {
                player: player_name.clone(),
                team: team_name.clone(),
                seasons: run,
                years,
                games: years as u32 * GAMES_PER_SEASON,
                position: record.position.clone(),
                player_id: record.player_id,
                jersey_number: record.jersey_number.clone(),
                team_colors: history.teams.get(team_name).and_then(|t| t.colors.clone()),
            });
        }
    }

    streaks.sort_by(|a, b| b.years.cmp(&a.years).then_with(|| a.player.cmp(&b.player)));
    streaks
}

/// Start year of a "2015-16" style label.
fn start_year(label: &str) -> Option<i32> {
    label.split('-').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RosterPlayer, TeamRecord};

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn season_span(from: i32, to: i32) -> Vec<String> {
        (from..to).map(|y| format!("{y}-{:02}", (y + 1) % 100)).collect()
    }

    fn skater(name: &str) -> RosterPlayer {
        RosterPlayer {
            player_id: Some(1),
            name: name.to_string(),
            position: Some("C".to_string()),
            jersey_number: Some("19".to_string()),
        }
    }

    #[test]
    fn run_stops_at_a_gap() {
        let run = longest_consecutive_run(&labels(&["2015-16", "2016-17", "2018-19"]));
        assert_eq!(run, labels(&["2015-16", "2016-17"]));
    }

    #[test]
    fn tie_keeps_the_earlier_run() {
        let run = longest_consecutive_run(&labels(&[
            "2012-13", "2013-14", "2016-17", "2017-18",
        ]));
        assert_eq!(run, labels(&["2012-13", "2013-14"]));
    }

    #[test]
    fn later_longer_run_displaces_earlier_shorter_one() {
        let run = longest_consecutive_run(&labels(&[
            "2012-13", "2015-16", "2016-17", "2017-18",
        ]));
        assert_eq!(run, labels(&["2015-16", "2016-17", "2017-18"]));
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let run = longest_consecutive_run(&labels(&["2016-17", "2014-15", "2015-16"]));
        assert_eq!(run, labels(&["2014-15", "2015-16", "2016-17"]));
    }

    #[test]
    fn unparsable_labels_are_ignored() {
        let run = longest_consecutive_run(&labels(&["junk", "2015-16", "2016-17"]));
        assert_eq!(run, labels(&["2015-16", "2016-17"]));
        assert!(longest_consecutive_run(&labels(&["junk"])).is_empty());
        assert!(longest_consecutive_run(&[]).is_empty());
    }

    #[test]
    fn century_rollover_labels_parse() {
        let span = season_span(1998, 2001);
        assert_eq!(span, labels(&["1998-99", "1999-00", "2000-01"]));
        assert_eq!(longest_consecutive_run(&span).len(), 3);
    }

    #[test]
    fn ten_consecutive_seasons_qualify_nine_do_not() {
        let mut history = LeagueHistory::new();
        for season in season_span(2012, 2022) {
            history.record_roster(&season, "Ice Pilots", vec![skater("Tenured")]);
        }
        for season in season_span(2012, 2021) {
            history.record_roster(&season, "Ice Pilots", vec![skater("Almost")]);
        }

        let streaks = franchise_streaks(&history);
        assert_eq!(streaks.len(), 1);
        assert_eq!(streaks[0].player, "Tenured");
        assert_eq!(streaks[0].years, 10);
        assert_eq!(streaks[0].games, 820);
        assert_eq!(streaks[0].seasons.first().map(String::as_str), Some("2012-13"));
        assert_eq!(streaks[0].seasons.last().map(String::as_str), Some("2021-22"));
    }

    #[test]
    fn interrupted_decade_does_not_qualify() {
        let mut history = LeagueHistory::new();
        for season in season_span(2012, 2017) {
            history.record_roster(&season, "Ice Pilots", vec![skater("Wanderer")]);
        }
        // missed 2017-18, came back for five more
        for season in season_span(2018, 2023) {
            history.record_roster(&season, "Ice Pilots", vec![skater("Wanderer")]);
        }
        assert!(franchise_streaks(&history).is_empty());
    }

    #[test]
    fn streaks_sort_by_years_then_player() {
        let mut history = LeagueHistory::new();
        for season in season_span(2010, 2022) {
            history.record_roster(&season, "Ice Pilots", vec![skater("Zeta")]);
        }
        for season in season_span(2012, 2022) {
            history.record_roster(&season, "Polar Kings", vec![skater("Beta"), skater("Alpha")]);
        }

        let streaks = franchise_streaks(&history);
        let order: Vec<&str> = streaks.iter().map(|s| s.player.as_str()).collect();
        assert_eq!(order, vec!["Zeta", "Alpha", "Beta"]);
    }

    #[test]
    fn team_colors_come_from_the_team_record() {
        let mut history = LeagueHistory::new();
        for season in season_span(2012, 2022) {
            history.record_roster(&season, "Ice Pilots", vec![skater("Tenured")]);
        }
        history.teams.insert(
            "Ice Pilots".to_string(),
            TeamRecord {
                colors: Some(vec!["#0000c8".to_string()]),
                ..TeamRecord::default()
            },
        );

        let streaks = franchise_streaks(&history);
        assert_eq!(
            streaks[0].team_colors.as_deref(),
            Some(&["#0000c8".to_string()][..])
        );
    }
}
