pub mod extract;
pub mod session;
pub mod tree;

pub use session::Session;

/// League key the way the API spells it.
pub fn league_key(game_key: &str, league_id: &str) -> String {
    format!("{game_key}.l.{league_id}")
}
