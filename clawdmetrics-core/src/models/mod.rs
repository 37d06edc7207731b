pub mod grant;
pub mod leaderboard;
pub mod stats;

pub use grant::{PkceGrant, PLACEHOLDER_CODE_VERIFIER};
pub use leaderboard::LeaderboardEntry;
pub use stats::StatsPayload;
