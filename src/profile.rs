use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8790";

/// User/project context referenced by the mentor session and the gateway
/// configuration. Lives in `~/.morshed/profile.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub startup_name: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub gateway_url: Option<String>,
}

impl UserProfile {
    /// Endpoint of the generation service. The environment variable wins
    /// over the profile, which wins over the local default.
    pub fn gateway_url(&self) -> String {
        std::env::var("MORSHED_GATEWAY_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.gateway_url.clone())
            .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string())
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn profile_dir() -> PathBuf {
    home_dir().join(".morshed")
}

fn profile_path() -> PathBuf {
    profile_dir().join("profile.json")
}

fn read_profile_file(path: &Path) -> Result<UserProfile, String> {
    let data = fs::read(path).map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    serde_json::from_slice(&data)
        .map_err(|err| format!("failed to parse {}: {err}", path.display()))
}

/// Loads the stored profile, falling back to defaults when the file is
/// missing or unreadable. Problems are logged, never fatal.
pub fn load() -> UserProfile {
    let path = profile_path();
    if !path.exists() {
        // Seed an editable file on first run.
        let profile = UserProfile::default();
        if let Err(err) = save(&profile) {
            tracing::debug!(error = %err, "could not seed profile file");
        }
        return profile;
    }
    match read_profile_file(&path) {
        Ok(profile) => profile,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring unreadable profile");
            UserProfile::default()
        }
    }
}

/// Persists the profile with a write-then-rename so a crash mid-save never
/// leaves a truncated file behind.
pub fn save(profile: &UserProfile) -> io::Result<()> {
    let dir = profile_dir();
    fs::create_dir_all(&dir)?;

    let final_path = profile_path();
    let tmp_path = dir.join("profile.json.tmp");
    let bytes = serde_json::to_vec_pretty(profile)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;

    fs::write(&tmp_path, bytes)?;
    match fs::rename(&tmp_path, &final_path) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if final_path.exists() {
                fs::remove_file(&final_path)?;
                fs::rename(&tmp_path, &final_path)?;
                Ok(())
            } else {
                Err(rename_err)
            }
        }
    }
}
