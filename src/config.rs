pub const AUTH_URL: &str = "https://api.login.yahoo.com/oauth2/request_auth";
pub const TOKEN_URL: &str = "https://api.login.yahoo.com/oauth2/get_token";
pub const API_BASE_URL: &str = "https://fantasysports.yahooapis.com/fantasy/v2";

/// Out-of-band redirect: Yahoo displays the authorization code on screen
/// for the user to paste back instead of redirecting to a callback URL.
pub const REDIRECT_URI: &str = "oob";

/// Read-only fantasy sports scope.
pub const OAUTH_SCOPE: &str = "fspt-r";

/// Every Lakeland Cup season: (label, Yahoo game key, league id).
/// The game key changes each year; the league id is reassigned at renewal,
/// so both are needed to build a league key ("{game_key}.l.{league_id}").
pub const SEASONS: &[(&str, &str, &str)] = &[
    ("2012-13", "303", "13567"),
    ("2013-14", "321", "11723"),
    ("2014-15", "341", "11755"),
    ("2015-16", "352", "15201"),
    ("2016-17", "363", "4692"),
    ("2017-18", "376", "10917"),
    ("2018-19", "386", "3405"),
    ("2019-20", "396", "1915"),
    ("2020-21", "403", "6608"),
    ("2021-22", "411", "30458"),
    ("2022-23", "419", "1720"),
    ("2023-24", "427", "5333"),
    ("2024-25", "453", "4440"),
];

/// Weeks probed for playoff matchups, starting at playoff_start_week.
/// The playoff bracket has never run longer than this.
pub const PLAYOFF_WEEK_SPAN: u32 = 4;

/// Minimum consecutive seasons on one team to qualify as a franchise player.
pub const FRANCHISE_MIN_SEASONS: usize = 10;

/// NHL regular-season length, used to estimate games per fantasy season.
pub const GAMES_PER_SEASON: u32 = 82;

#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth client credentials JSON (YAHOO_CREDENTIALS_FILE).
    pub credentials_path: String,
    /// Cached access/refresh token JSON (YAHOO_TOKEN_FILE).
    pub token_path: String,
    /// Directory for downloaded team logos (LOGOS_DIR).
    pub logos_dir: String,
    /// Where the league history document is written (LEAGUE_OUTPUT_FILE).
    pub output_path: String,
    pub log_level: String,
    /// List every league visible to the signed-in account, then exit
    /// without fetching anything (LIST_LEAGUES=1).
    pub list_leagues: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            credentials_path: std::env::var("YAHOO_CREDENTIALS_FILE")
                .unwrap_or_else(|_| "yahoo_credentials.json".to_string()),
            token_path: std::env::var("YAHOO_TOKEN_FILE")
                .unwrap_or_else(|_| "yahoo_token.json".to_string()),
            logos_dir: std::env::var("LOGOS_DIR")
                .unwrap_or_else(|_| "public/images/teams".to_string()),
            output_path: std::env::var("LEAGUE_OUTPUT_FILE")
                .unwrap_or_else(|_| "league_data.json".to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            list_leagues: std::env::var("LIST_LEAGUES")
                .map(|v| v == "1")
                .unwrap_or(false),
        }
    }
}
