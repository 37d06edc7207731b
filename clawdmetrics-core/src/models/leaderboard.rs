use serde::Deserialize;

/// One row returned by the `get_leaderboard` edge function.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub score: i64,
    pub rank: u32,
}
