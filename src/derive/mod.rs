pub mod streaks;

pub use streaks::franchise_streaks;
