mod draft_sheets;

use std::collections::BTreeMap;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use draft_sheets::{
    fetch_sheet, parse_draft_sheet, parse_prospect_sheet, DraftDoc, DraftYear, Prospect,
    SheetError, DRAFT_SHEETS, PROSPECTS_GID,
};

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&log_level))
        .init();

    if let Err(e) = run().await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), SheetError> {
    let output_path =
        std::env::var("DRAFT_OUTPUT_FILE").unwrap_or_else(|_| "draft_data.json".to_string());
    let client = reqwest::Client::new();

    // --- Draft year tabs ---
    let mut drafts = BTreeMap::new();
    for &(year, gid) in DRAFT_SHEETS {
        info!("Fetching {year} draft (gid={gid})...");
        match fetch_year(&client, year, gid).await {
            Ok(draft) => {
                info!(
                    "  round 1: {} picks, round 2: {} picks",
                    draft.entry_draft.round_1.len(),
                    draft.entry_draft.round_2.len(),
                );
                drafts.insert(year.to_string(), draft);
            }
            Err(e) => warn!("  {year}: {e}"),
        }
    }

    // --- Prospect protection tab ---
    // A bad year above degrades to a gap in the output; without prospect
    // data the document is not worth writing at all.
    info!("Fetching prospect data (gid={PROSPECTS_GID})...");
    let prospects = fetch_prospects(&client).await?;
    for (team, players) in &prospects {
        info!("  {team}: {} prospects", players.len());
    }

    // --- Output ---
    let doc = DraftDoc { drafts, prospects };
    let json = serde_json::to_string_pretty(&doc)?;
    std::fs::write(&output_path, json).map_err(|e| SheetError::Io {
        path: output_path.clone(),
        source: e,
    })?;
    info!("Draft data saved to {output_path}");

    Ok(())
}

async fn fetch_year(
    client: &reqwest::Client,
    year: &str,
    gid: &str,
) -> Result<DraftYear, SheetError> {
    let body = fetch_sheet(client, gid).await?;
    parse_draft_sheet(body.as_bytes(), year).map_err(|e| SheetError::Csv {
        gid: gid.to_string(),
        source: e,
    })
}

async fn fetch_prospects(
    client: &reqwest::Client,
) -> Result<BTreeMap<String, Vec<Prospect>>, SheetError> {
    let body = fetch_sheet(client, PROSPECTS_GID).await?;
    parse_prospect_sheet(body.as_bytes()).map_err(|e| SheetError::Csv {
        gid: PROSPECTS_GID.to_string(),
        source: e,
    })
}
