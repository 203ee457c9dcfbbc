/// Session records: who is logged in, and until when.
///
/// Two obfuscated records next to the progress blob:
///   `user.dat`           holds the identity string
///   `expirationTime.dat` holds the epoch-millisecond expiry as a string
///
/// A session is valid iff both records decode and `now < expiry`.
/// Login stamps a 24-hour expiry; anything stale or unreadable is
/// cleared on the next read. The core never checks credentials:
/// whoever types an identity is that player.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::store::cipher::XorCipher;

const USER_KEY: &str = "user";
const EXPIRATION_KEY: &str = "expirationTime";

/// Session lifetime from login, in milliseconds (24 hours).
pub const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

pub struct SessionStore {
    dir: PathBuf,
    cipher: XorCipher,
}

impl SessionStore {
    pub fn new(data_dir: &Path, cipher: XorCipher) -> Self {
        SessionStore { dir: data_dir.to_path_buf(), cipher }
    }

    /// Start a session for `identity`, valid for 24 hours.
    pub fn login(&self, identity: &str) {
        let expiry = Utc::now().timestamp_millis() + SESSION_TTL_MS;
        self.write_record(USER_KEY, identity);
        self.write_record(EXPIRATION_KEY, &expiry.to_string());
    }

    /// The logged-in identity, if the session is still valid.
    /// Expired or unreadable records are removed.
    pub fn current_identity(&self) -> Option<String> {
        self.identity_at(Utc::now().timestamp_millis())
    }

    pub fn logout(&self) {
        let _ = fs::remove_file(self.record_path(USER_KEY));
        let _ = fs::remove_file(self.record_path(EXPIRATION_KEY));
    }

    // Validity check against an explicit clock, so tests control time.
    fn identity_at(&self, now_ms: i64) -> Option<String> {
        let identity = self.read_record(USER_KEY);
        let expiry = self
            .read_record(EXPIRATION_KEY)
            .and_then(|text| text.parse::<i64>().ok());

        match (identity, expiry) {
            (Some(identity), Some(expiry)) if now_ms < expiry => Some(identity),
            _ => {
                self.logout();
                None
            }
        }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.dat"))
    }

    fn read_record(&self, key: &str) -> Option<String> {
        let blob = fs::read(self.record_path(key)).ok()?;
        self.cipher.decode(&blob).ok()
    }

    fn write_record(&self, key: &str, value: &str) {
        let path = self.record_path(key);
        if let Err(e) = fs::write(&path, self.cipher.encode(value)) {
            eprintln!("Warning: could not write {}: {e}", path.display());
        }
    }
}
