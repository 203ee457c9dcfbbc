/// Persistent per-player progress record.
///
/// Serialized as camelCase JSON inside the obfuscated blob:
/// `{"identity":"...","level":3,"totalScore":1200,"lossCount":1}`.

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub identity: String,
    pub level: u32,
    /// Lifetime score. A sloppy win can subtract more than it adds,
    /// so this is signed and never clamped.
    pub total_score: i64,
    /// Consecutive losses at the current level, 0..=2 at rest.
    /// The third loss resets the whole profile instead.
    pub loss_count: u32,
}

impl PlayerProfile {
    /// Default profile for a (possibly new) identity: level 1, no
    /// score, no losses.
    pub fn new(identity: impl Into<String>) -> Self {
        PlayerProfile {
            identity: identity.into(),
            level: 1,
            total_score: 0,
            loss_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = PlayerProfile::new("ada");
        assert_eq!(p.identity, "ada");
        assert_eq!(p.level, 1);
        assert_eq!(p.total_score, 0);
        assert_eq!(p.loss_count, 0);
    }

    #[test]
    fn blob_keys_are_camel_case() {
        let json = serde_json::to_string(&PlayerProfile::new("ada")).unwrap();
        assert!(json.contains("\"totalScore\""));
        assert!(json.contains("\"lossCount\""));
    }
}
