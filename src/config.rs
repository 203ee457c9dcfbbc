/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Missing file or missing keys fall back to defaults, with one
/// exception: an explicitly EMPTY cipher secret is a fatal error.
/// The XOR codec is undefined without a secret, so we refuse to start
/// rather than write garbage saves.

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    /// Shared secret for the save-file codec. Never empty.
    pub secret: String,
    /// Directory holding the progress blob and session records.
    pub data_dir: PathBuf,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    cipher: TomlCipher,
    #[serde(default)]
    storage: TomlStorage,
}

#[derive(Deserialize, Debug)]
struct TomlCipher {
    #[serde(default = "default_secret")]
    secret: String,
}

#[derive(Deserialize, Debug, Default)]
struct TomlStorage {
    /// Absolute or relative override for the data directory.
    /// Empty = auto-detect (exe dir if writable, else user data dir).
    #[serde(default)]
    data_dir: String,
}

fn default_secret() -> String {
    "tileshift-local-secret".into()
}

impl Default for TomlCipher {
    fn default() -> Self {
        TomlCipher { secret: default_secret() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    pub fn load() -> Result<Self> {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        if toml_cfg.cipher.secret.is_empty() {
            bail!("config.toml sets an empty cipher secret; saved data needs a non-empty secret");
        }

        let data_dir = if toml_cfg.storage.data_dir.is_empty() {
            default_data_dir()
        } else {
            PathBuf::from(&toml_cfg.storage.data_dir)
        };
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;

        Ok(GameConfig {
            secret: toml_cfg.cipher.secret,
            data_dir,
        })
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so data is found relative to the real binary.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

/// Exe directory when writable (portable installs), otherwise the
/// per-user data directory.
fn default_data_dir() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            let probe = parent.join(".write_test_tileshift");
            if std::fs::write(&probe, "").is_ok() {
                let _ = std::fs::remove_file(&probe);
                return parent.to_path_buf();
            }
        }
    }

    if let Some(dirs) = ProjectDirs::from("", "", "tileshift") {
        return dirs.data_dir().to_path_buf();
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
