pub mod cipher;
pub mod leaderboard;
pub mod profile;
pub mod progress;
pub mod session;
