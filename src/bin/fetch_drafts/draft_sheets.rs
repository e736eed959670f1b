//! Google Sheets export fetching and parsing for the draft spreadsheet.
//!
//! Each draft year lives on its own tab with an "Entry Draft" block split
//! into two labeled rounds, optionally followed by a free agent draft this
//! tool does not cover. A separate tab tracks prospect protections.

use std::collections::BTreeMap;
use std::io::Read;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Sheet registry
// ---------------------------------------------------------------------------

/// The league's draft spreadsheet.
pub const SPREADSHEET_ID: &str = "1hySqKud8A6cqEZrYBmPjUGWngEvv6H4-6f1j4ZiAFFs";

/// Draft year tabs by gid, found by inspecting the spreadsheet.
pub const DRAFT_SHEETS: &[(&str, &str)] = &[
    ("2017", "0"),
    ("2018", "160005617"),
    ("2019", "396125050"),
    ("2020", "2114444838"),
    ("2021", "93631678"),
    ("2022", "485319108"),
    ("2023", "1264216592"),
    ("2024", "1497614364"),
    ("2025", "762784180"),
];

/// Prospect protection tab.
pub const PROSPECTS_GID: &str = "1885725030";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("failed to fetch sheet gid={gid}: {source}")]
    Fetch { gid: String, source: reqwest::Error },

    #[error("sheet gid={gid} returned HTTP {status}")]
    Status { gid: String, status: u16 },

    #[error("CSV error in sheet gid={gid}: {source}")]
    Csv { gid: String, source: csv::Error },

    #[error("failed to write {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("failed to serialize draft data: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Output document types
// ---------------------------------------------------------------------------

/// One entry draft pick. `from_team` is only set when the slot came from
/// another team; `traded_to` when the drafted player moved on afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pick {
    pub pick: u32,
    pub team: String,
    pub from_team: Option<String>,
    pub player: String,
    pub traded_to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EntryDraft {
    pub round_1: Vec<Pick>,
    pub round_2: Vec<Pick>,
}

/// One year's parsed draft tab.
#[derive(Debug, Clone, Serialize)]
pub struct DraftYear {
    pub year: String,
    pub entry_draft: EntryDraft,
}

/// A prospect whose rights a team holds until the given year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prospect {
    pub player: String,
    pub rights_expire: String,
}

/// The combined document written to draft_data.json.
#[derive(Debug, Serialize)]
pub struct DraftDoc {
    pub drafts: BTreeMap<String, DraftYear>,
    pub prospects: BTreeMap<String, Vec<Prospect>>,
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

fn export_url(gid: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{SPREADSHEET_ID}/export?format=csv&gid={gid}")
}

/// Download one tab as CSV text. The export endpoint redirects a couple of
/// times before serving the file; reqwest follows those by default.
pub async fn fetch_sheet(client: &reqwest::Client, gid: &str) -> Result<String, SheetError> {
    let response = client.get(export_url(gid)).send().await.map_err(|e| SheetError::Fetch {
        gid: gid.to_string(),
        source: e,
    })?;
    if !response.status().is_success() {
        return Err(SheetError::Status {
            gid: gid.to_string(),
            status: response.status().as_u16(),
        });
    }
    response.text().await.map_err(|e| SheetError::Fetch {
        gid: gid.to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Draft tab parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    None,
    Round1,
    Round2,
}

/// Parse one draft year tab. Section labels steer the row loop; everything
/// from the "Free Agent" label on is a different draft format and ends the
/// parse.
pub fn parse_draft_sheet<R: Read>(rdr: R, year: &str) -> Result<DraftYear, csv::Error> {
    let rows = read_rows(rdr)?;

    let mut entry_draft = EntryDraft::default();
    let mut section = Section::None;

    for row in &rows {
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let first = row.first().map(|c| c.trim().to_lowercase()).unwrap_or_default();

        if first.contains("entry draft") {
            continue;
        } else if first.contains("round 1") {
            section = Section::Round1;
            continue;
        } else if first.contains("round 2") {
            section = Section::Round2;
            continue;
        } else if first.contains("free agent") {
            break;
        }

        let picks = match section {
            Section::Round1 => &mut entry_draft.round_1,
            Section::Round2 => &mut entry_draft.round_2,
            Section::None => continue,
        };
        if let Some(pick) = parse_pick_row(row) {
            picks.push(pick);
        }
    }

    Ok(DraftYear {
        year: year.to_string(),
        entry_draft,
    })
}

/// One numbered pick row: pick, team, slot origin, player, traded-to. Rows
/// whose origin column reads yes/no are free agent rows that leaked into
/// the entry section and are dropped.
fn parse_pick_row(row: &[String]) -> Option<Pick> {
    let pick = pick_number(row.first()?)?;

    let cell = |i: usize| row.get(i).map(|c| c.trim()).unwrap_or("");
    let team = cell(1);
    let from_team = cell(2);
    let player = cell(3);

    if matches!(from_team.to_lowercase().as_str(), "yes" | "no") {
        return None;
    }

    // Some years keep the traded-to column one further right, with "x" or
    // "-" as keep markers.
    let traded_to = [cell(4), cell(5)]
        .into_iter()
        .find(|c| !c.is_empty() && *c != "x" && *c != "-")
        .map(String::from);

    Some(Pick {
        pick,
        team: team.to_string(),
        from_team: (!from_team.is_empty() && from_team != team).then(|| from_team.to_string()),
        player: player.to_string(),
        traded_to,
    })
}

/// The pick number, only when the cell is purely digits. Labels, blanks and
/// decimals all mark the row as a non-pick.
fn pick_number(cell: &str) -> Option<u32> {
    let cell = cell.trim();
    if cell.is_empty() || !cell.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    cell.parse().ok()
}

// ---------------------------------------------------------------------------
// Prospect tab parsing
// ---------------------------------------------------------------------------

/// Parse the prospect protection tab. Team names sit on a header row, data
/// rows carry one prospect per team column, and "bis September ..." marker
/// rows set the rights expiry for the rows that follow. Rows above the
/// first marker have no expiry and are dropped.
pub fn parse_prospect_sheet<R: Read>(
    rdr: R,
) -> Result<BTreeMap<String, Vec<Prospect>>, csv::Error> {
    let rows = read_rows(rdr)?;

    let mut prospects: BTreeMap<String, Vec<Prospect>> = BTreeMap::new();
    let mut teams: Option<Vec<Option<String>>> = None;
    let mut current_expiry: Option<String> = None;

    for row in &rows {
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let first = row.first().map(|c| c.trim()).unwrap_or_default();

        if teams.is_none() && row.len() > 1 {
            let is_header = row
                .iter()
                .map(|c| c.to_lowercase())
                .any(|c| c.contains("snipers") || c.contains("monkeys"));
            if is_header {
                // Column positions matter: a blank header cell drops that
                // column instead of shifting its neighbors over.
                teams = Some(
                    row[1..]
                        .iter()
                        .map(|c| {
                            let c = c.trim();
                            (!c.is_empty()).then(|| c.to_string())
                        })
                        .collect(),
                );
                continue;
            }
        }

        let first_lower = first.to_lowercase();
        if first_lower.contains("bis") || first_lower.contains("september") {
            if let Some(year) = find_year(first) {
                current_expiry = Some(year);
            }
            continue;
        }

        let (Some(teams), Some(expiry)) = (teams.as_ref(), current_expiry.as_ref()) else {
            continue;
        };
        for (i, cell) in row.iter().skip(1).enumerate() {
            let player = cell.trim();
            if player.is_empty() {
                continue;
            }
            let Some(Some(team)) = teams.get(i) else { continue };
            prospects.entry(team.clone()).or_default().push(Prospect {
                player: player.to_string(),
                rights_expire: expiry.clone(),
            });
        }
    }

    Ok(prospects)
}

/// First four-digit year of this century in the text.
fn find_year(text: &str) -> Option<String> {
    text.as_bytes()
        .windows(4)
        .find(|w| w[0] == b'2' && w[1] == b'0' && w[2].is_ascii_digit() && w[3].is_ascii_digit())
        .map(|w| String::from_utf8_lossy(w).into_owned())
}

fn read_rows<R: Read>(rdr: R) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(String::from).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_sections_collect_numbered_picks() {
        let csv_data = "\
Entry Draft 2019,,,,
Round 1 (Picks 1-12),,,,
Pick,Team,From,Player,Traded
1,Snipers,,Jack Hughes,
2,Monkeys,Snipers,Kaapo Kakko,x
Round 2,,,,
13,Bears,,Trevor Zegras,Lions
Free Agent Draft,,,,
99,Ghosts,,Nobody,
";
        let draft = parse_draft_sheet(csv_data.as_bytes(), "2019").unwrap();
        assert_eq!(draft.year, "2019");

        let r1 = &draft.entry_draft.round_1;
        assert_eq!(r1.len(), 2);
        assert_eq!(r1[0].pick, 1);
        assert_eq!(r1[0].team, "Snipers");
        assert_eq!(r1[0].from_team, None);
        assert_eq!(r1[0].player, "Jack Hughes");
        assert_eq!(r1[0].traded_to, None);
        assert_eq!(r1[1].from_team.as_deref(), Some("Snipers"));
        assert_eq!(r1[1].traded_to, None);

        let r2 = &draft.entry_draft.round_2;
        assert_eq!(r2.len(), 1);
        assert_eq!(r2[0].pick, 13);
        assert_eq!(r2[0].traded_to.as_deref(), Some("Lions"));
    }

    #[test]
    fn free_agent_label_ends_the_parse() {
        let csv_data = "\
Round 1,,,
1,Snipers,,Someone
Free Agent Draft,,,
Round 2,,,
13,Bears,,Other Guy
";
        let draft = parse_draft_sheet(csv_data.as_bytes(), "2020").unwrap();
        assert_eq!(draft.entry_draft.round_1.len(), 1);
        assert!(draft.entry_draft.round_2.is_empty());
    }

    #[test]
    fn from_team_null_when_blank_or_same_as_team() {
        let csv_data = "\
Round 1,,,
1,Snipers,Snipers,Player A
2,Bears,Lions,Player B
3,Bears,,Player C
";
        let draft = parse_draft_sheet(csv_data.as_bytes(), "2021").unwrap();
        let r1 = &draft.entry_draft.round_1;
        assert_eq!(r1[0].from_team, None);
        assert_eq!(r1[1].from_team.as_deref(), Some("Lions"));
        assert_eq!(r1[2].from_team, None);
    }

    #[test]
    fn yes_no_origin_rows_are_free_agent_leakage() {
        let csv_data = "\
Round 1,,,
1,Snipers,Yes,Player A
2,Bears,no,Player B
3,Lions,,Player C
";
        let draft = parse_draft_sheet(csv_data.as_bytes(), "2017").unwrap();
        let r1 = &draft.entry_draft.round_1;
        assert_eq!(r1.len(), 1);
        assert_eq!(r1[0].player, "Player C");
    }

    #[test]
    fn traded_column_falls_back_one_right() {
        let csv_data = "\
Round 1,,,,,
1,A,,P1,,Bears
2,A,,P2,x,Lions
3,A,,P3,-,
4,A,,P4,Wolves,Ignored
";
        let draft = parse_draft_sheet(csv_data.as_bytes(), "2022").unwrap();
        let r1 = &draft.entry_draft.round_1;
        assert_eq!(r1[0].traded_to.as_deref(), Some("Bears"));
        assert_eq!(r1[1].traded_to.as_deref(), Some("Lions"));
        assert_eq!(r1[2].traded_to, None);
        assert_eq!(r1[3].traded_to.as_deref(), Some("Wolves"));
    }

    #[test]
    fn rows_outside_any_section_are_ignored() {
        let csv_data = "\
1,Snipers,,Too Early
Round 1,,,
2,Bears,,Counted
not a number,Bears,,Skipped
";
        let draft = parse_draft_sheet(csv_data.as_bytes(), "2018").unwrap();
        let r1 = &draft.entry_draft.round_1;
        assert_eq!(r1.len(), 1);
        assert_eq!(r1[0].player, "Counted");
    }

    #[test]
    fn prospect_columns_map_by_position() {
        let csv_data = "\
Prospect Protection,,,
,Snipers,,Monkeys
bis September 2024,,,
,Player A,Orphan Guy,Player B
";
        let prospects = parse_prospect_sheet(csv_data.as_bytes()).unwrap();
        assert_eq!(prospects.len(), 2);
        assert_eq!(
            prospects["Snipers"],
            vec![Prospect {
                player: "Player A".to_string(),
                rights_expire: "2024".to_string()
            }]
        );
        assert_eq!(prospects["Monkeys"][0].player, "Player B");
        // the column under the blank header has no team to land on
        assert!(prospects.values().flatten().all(|p| p.player != "Orphan Guy"));
    }

    #[test]
    fn rows_before_first_expiry_marker_are_dropped() {
        let csv_data = "\
,Snipers,Monkeys
,Early Guy,
bis September 2025,,
,Late Guy,
";
        let prospects = parse_prospect_sheet(csv_data.as_bytes()).unwrap();
        assert_eq!(prospects["Snipers"].len(), 1);
        assert_eq!(prospects["Snipers"][0].player, "Late Guy");
        assert_eq!(prospects["Snipers"][0].rights_expire, "2025");
    }

    #[test]
    fn expiry_marker_updates_the_rows_that_follow() {
        let csv_data = "\
,Snipers,Monkeys
bis September 2024,,
,First Guy,
bis September 2026,,
,Second Guy,Third Guy
";
        let prospects = parse_prospect_sheet(csv_data.as_bytes()).unwrap();
        let snipers = &prospects["Snipers"];
        assert_eq!(snipers[0].rights_expire, "2024");
        assert_eq!(snipers[1].rights_expire, "2026");
        assert_eq!(prospects["Monkeys"][0].rights_expire, "2026");
    }

    #[test]
    fn marker_without_year_keeps_the_previous_expiry() {
        let csv_data = "\
,Snipers,Monkeys
bis September 2024,,
bis sometime,,
,Still Old Year,
";
        let prospects = parse_prospect_sheet(csv_data.as_bytes()).unwrap();
        assert_eq!(prospects["Snipers"][0].rights_expire, "2024");
    }

    #[test]
    fn find_year_scans_anywhere_in_the_label() {
        assert_eq!(find_year("bis September 2024").as_deref(), Some("2024"));
        assert_eq!(find_year("2031 (bis)").as_deref(), Some("2031"));
        assert_eq!(find_year("no year here"), None);
        assert_eq!(find_year("19 99"), None);
    }

    #[test]
    fn draft_doc_serializes_with_stable_keys() {
        let mut drafts = BTreeMap::new();
        drafts.insert(
            "2019".to_string(),
            DraftYear {
                year: "2019".to_string(),
                entry_draft: EntryDraft {
                    round_1: vec![Pick {
                        pick: 1,
                        team: "Snipers".to_string(),
                        from_team: None,
                        player: "Jack Hughes".to_string(),
                        traded_to: None,
                    }],
                    round_2: Vec::new(),
                },
            },
        );
        let mut prospects = BTreeMap::new();
        prospects.insert(
            "Snipers".to_string(),
            vec![Prospect {
                player: "Player A".to_string(),
                rights_expire: "2024".to_string(),
            }],
        );

        let doc = DraftDoc { drafts, prospects };
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["drafts"]["2019"]["entry_draft"]["round_1"][0]["pick"], 1);
        assert_eq!(v["drafts"]["2019"]["entry_draft"]["round_1"][0]["from_team"], serde_json::Value::Null);
        assert_eq!(v["prospects"]["Snipers"][0]["rights_expire"], "2024");
    }
}
