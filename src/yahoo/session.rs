//! OAuth2 session against the Yahoo Fantasy API: token persistence, the
//! manual out-of-band authorization flow, and authenticated GETs with a
//! single refresh-and-retry on 401.

use std::io::Write;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{Config, API_BASE_URL, AUTH_URL, OAUTH_SCOPE, REDIRECT_URI, TOKEN_URL};
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
struct Credentials {
    #[serde(default)]
    client_id: String,
    #[serde(default)]
    client_secret: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

pub struct Session {
    client: reqwest::Client,
    credentials: Credentials,
    token_path: String,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl Session {
    /// Load credentials and any previously saved token. Missing or
    /// incomplete credentials end the run with setup instructions; a
    /// missing or unreadable token file just means authenticating fresh.
    pub fn new(cfg: &Config) -> Result<Self> {
        let credentials = load_credentials(&cfg.credentials_path)?;

        let (access_token, refresh_token) = match std::fs::read_to_string(&cfg.token_path) {
            Ok(raw) => match serde_json::from_str::<StoredToken>(&raw) {
                Ok(token) => (token.access_token, token.refresh_token),
                Err(e) => {
                    warn!("Ignoring malformed token file {}: {e}", cfg.token_path);
                    (None, None)
                }
            },
            Err(_) => (None, None),
        };

        Ok(Self {
            client: reqwest::Client::new(),
            credentials,
            token_path: cfg.token_path.clone(),
            access_token,
            refresh_token,
        })
    }

    /// Make sure the session holds a working access token: reuse the saved
    /// one if the API still accepts it, refresh it if possible, otherwise
    /// walk the user through the authorization-code flow.
    pub async fn authenticate(&mut self) -> Result<()> {
        if self.access_token.is_some() {
            if self.probe_token().await {
                info!("Using existing token");
                return Ok(());
            }
            if self.refresh_token.is_some() && self.refresh().await? {
                info!("Token refreshed");
                return Ok(());
            }
        }
        self.interactive_auth().await
    }

    /// GET a Fantasy API endpoint as JSON. A 401 gets one token refresh and
    /// retry; a second rejection means the authorization is gone and the
    /// run cannot continue. Any other non-200 is logged and reported as
    /// absent so one bad season does not end the run.
    pub async fn get(&mut self, endpoint: &str) -> Result<Option<Value>> {
        let mut resp = self.request(endpoint).await?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            if !self.refresh().await? {
                return Err(AppError::Auth(
                    "access token expired and refresh failed".to_string(),
                ));
            }
            resp = self.request(endpoint).await?;
            if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
                return Err(AppError::Auth(
                    "access token rejected after refresh".to_string(),
                ));
            }
        }

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            warn!("API error {status} on {endpoint}: {body}");
            return Ok(None);
        }

        let doc: Value = resp.json().await?;
        Ok(Some(doc))
    }

    async fn request(&self, endpoint: &str) -> Result<reqwest::Response> {
        let Some(token) = self.access_token.as_deref() else {
            return Err(AppError::Auth("not authenticated".to_string()));
        };
        let url = format!("{API_BASE_URL}/{endpoint}");
        Ok(self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("format", "json")])
            .send()
            .await?)
    }

    /// Cheap validity check for a stored token.
    async fn probe_token(&self) -> bool {
        let Some(token) = self.access_token.as_deref() else {
            return false;
        };
        let url = format!("{API_BASE_URL}/users;use_login=1/games;game_keys=nhl");
        match self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(&[("format", "json")])
            .send()
            .await
        {
            Ok(resp) => resp.status() == reqwest::StatusCode::OK,
            Err(_) => false,
        }
    }

    /// Trade the refresh token for a new access token. False means Yahoo
    /// declined; transport failures bubble up.
    async fn refresh(&mut self) -> Result<bool> {
        let Some(refresh_token) = self.refresh_token.clone() else {
            return Ok(false);
        };

        let resp = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        if resp.status() != reqwest::StatusCode::OK {
            return Ok(false);
        }

        let token: Value = resp.json().await?;
        self.store_token(&token);
        Ok(true)
    }

    /// The out-of-band flow: the user authorizes in a browser, Yahoo shows
    /// a code on screen, and the code is pasted back here.
    async fn interactive_auth(&mut self) -> Result<()> {
        let auth_url = format!(
            "{AUTH_URL}?client_id={}&redirect_uri={REDIRECT_URI}&response_type=code&scope={OAUTH_SCOPE}",
            self.credentials.client_id
        );

        println!();
        println!("Please visit this URL to authorize:");
        println!();
        println!("{auth_url}");
        println!();
        open_browser(&auth_url);

        println!("After authorizing, Yahoo will show you a code.");
        print!("Paste the authorization code here: ");
        std::io::stdout().flush()?;

        let mut code = String::new();
        std::io::stdin().read_line(&mut code)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::Auth("no authorization code provided".to_string()));
        }

        let resp = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("redirect_uri", REDIRECT_URI),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if resp.status() != reqwest::StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!("token exchange failed: {body}")));
        }

        let token: Value = resp.json().await?;
        self.store_token(&token);
        info!("Authentication successful");
        Ok(())
    }

    /// Adopt a token response, keeping the old refresh token when the
    /// response omits one, and persist the result.
    fn store_token(&mut self, token: &Value) {
        self.access_token = token
            .get("access_token")
            .and_then(|v| v.as_str())
            .map(String::from);
        if let Some(rt) = token.get("refresh_token").and_then(|v| v.as_str()) {
            self.refresh_token = Some(rt.to_string());
        }
        if let Err(e) = self.save_token() {
            warn!("Failed to save token to {}: {e}", self.token_path);
        }
    }

    fn save_token(&self) -> Result<()> {
        let doc = StoredToken {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        };
        std::fs::write(&self.token_path, serde_json::to_string_pretty(&doc)?)?;
        Ok(())
    }
}

fn load_credentials(path: &str) -> Result<Credentials> {
    let creds = match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str::<Credentials>(&raw)?,
        Err(_) => Credentials { client_id: String::new(), client_secret: String::new() },
    };

    if creds.client_id.is_empty() || creds.client_secret.is_empty() {
        println!();
        println!("Yahoo API credentials not found!");
        println!();
        println!("Create {path} with:");
        println!("{{");
        println!("  \"client_id\": \"YOUR_CLIENT_ID\",");
        println!("  \"client_secret\": \"YOUR_CLIENT_SECRET\"");
        println!("}}");
        println!();
        println!("Get these from: https://developer.yahoo.com/apps/");
        println!();
        return Err(AppError::Config(format!(
            "credentials missing or incomplete in {path}"
        )));
    }
    Ok(creds)
}

/// Best effort; the printed URL is the real contract.
fn open_browser(url: &str) {
    let cmd = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
    let _ = std::process::Command::new(cmd)
        .arg(url)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn();
}
