// Library root: Sleeper API access, the local player cache and conversion
// into the analysis input.

pub mod api;
pub mod cache;
pub mod client;
pub mod convert;
pub mod source;

pub use cache::PlayerCache;
pub use client::{SleeperClient, SleeperError, DEFAULT_TIMEOUT, SLEEPER_API_URL};
pub use source::{fetch_snapshot, LeagueSource, SeasonSnapshot, WeekResponse};
