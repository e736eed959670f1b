//! Team logo downloads. Filenames are slugs of the team name, so the logo
//! directory doubles as a cache: a file that already exists is never
//! re-fetched.

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::Result;

/// Per-request ceiling for logo fetches. Logos are small; anything slower
/// is a stuck connection.
const DOWNLOAD_TIMEOUT_SECS: u64 = 10;

pub fn client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .build()?)
}

/// Download `logo_url` into `dir` as "<slug>.png" and return the filename.
/// None means the team keeps no logo: no URL, a failed download, or an
/// unwritable directory. Failures never end the run.
pub async fn download_logo(
    client: &reqwest::Client,
    dir: &str,
    team_name: &str,
    logo_url: Option<&str>,
) -> Option<String> {
    let url = logo_url?;
    let filename = format!("{}.png", slugify(team_name));
    let path = Path::new(dir).join(&filename);

    if path.exists() {
        info!("Logo exists: {filename}");
        return Some(filename);
    }

    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!("Cannot create logo dir {dir}: {e}");
        return None;
    }

    let resp = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            warn!("Error downloading logo for {team_name}: {e}");
            return None;
        }
    };
    if resp.status() != reqwest::StatusCode::OK {
        warn!("Failed to download logo for {team_name}: {}", resp.status());
        return None;
    }
    let bytes = match resp.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Error downloading logo for {team_name}: {e}");
            return None;
        }
    };

    match std::fs::write(&path, &bytes) {
        Ok(()) => {
            info!("Downloaded: {filename}");
            Some(filename)
        }
        Err(e) => {
            warn!("Cannot write {}: {e}", path.display());
            None
        }
    }
}

/// Filesystem-safe slug: lowercased, punctuation dropped, runs of spaces
/// and hyphens collapsed to one hyphen, edges trimmed. Only whitespace and
/// hyphens act as separators; other punctuation vanishes without a trace.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else if ch.is_whitespace() || ch == '-' {
            pending_separator = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_collapse_separators_and_drop_punctuation() {
        assert_eq!(slugify("The Ice Pilots!"), "the-ice-pilots");
        assert_eq!(slugify("A  --  B"), "a-b");
        assert_eq!(slugify("don't"), "dont");
        assert_eq!(slugify("a.b"), "ab");
        assert_eq!(slugify("- edge case -"), "edge-case");
        assert_eq!(slugify("Låkeland Öilers"), "låkeland-öilers");
        assert_eq!(slugify("***"), "");
    }

    #[tokio::test]
    async fn existing_file_short_circuits_without_network() {
        let dir = std::env::temp_dir().join("lakeland-logo-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cached-team.png");
        std::fs::write(&path, b"not really a png").unwrap();

        // The URL is unroutable; reaching the network would fail the test.
        let client = client().unwrap();
        let got = download_logo(
            &client,
            dir.to_str().unwrap(),
            "Cached Team",
            Some("http://192.0.2.1/never-fetched.png"),
        )
        .await;
        assert_eq!(got.as_deref(), Some("cached-team.png"));
    }

    #[tokio::test]
    async fn missing_url_is_none() {
        let client = client().unwrap();
        let got = download_logo(&client, "/tmp", "Whoever", None).await;
        assert_eq!(got, None);
    }
}
