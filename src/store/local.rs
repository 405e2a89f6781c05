//! Durable local storage for the reader profile.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::models::UserProfile;

pub const DEFAULT_PROFILE_ID: &str = "dailybread-profile";

/// Key-value file store holding one JSON profile record.
///
/// The record lives at `{data_dir}/{profile_id}.json`.
#[derive(Debug, Clone)]
pub struct ProfileStorage {
    data_dir: PathBuf,
    profile_id: String,
}

impl ProfileStorage {
    pub fn new(data_dir: PathBuf, profile_id: impl Into<String>) -> Self {
        Self {
            data_dir,
            profile_id: profile_id.into(),
        }
    }

    /// Storage using the default profile identifier.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self::new(data_dir, DEFAULT_PROFILE_ID)
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.profile_id))
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Reads the stored profile.
    ///
    /// Returns `Ok(None)` if no record exists.
    pub fn read(&self) -> Result<Option<UserProfile>, StorageError> {
        let path = self.path();
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(|e| StorageError::ParseError(path, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(path, e)),
        }
    }

    /// Reads the stored profile, substituting defaults on any failure.
    pub fn load_profile(&self) -> UserProfile {
        match self.read() {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                tracing::debug!("No profile at {}, using defaults", self.path().display());
                UserProfile::default()
            }
            Err(e) => {
                tracing::warn!("{}; using default profile", e);
                UserProfile::default()
            }
        }
    }

    /// Writes the profile, replacing the previous record in one rename.
    pub fn write(&self, profile: &UserProfile) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| StorageError::IoError(self.data_dir.clone(), e))?;

        let path = self.path();
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(profile).map_err(StorageError::SerializeError)?;

        fs::write(&tmp, bytes).map_err(|e| StorageError::IoError(tmp.clone(), e))?;
        fs::rename(&tmp, &path).map_err(|e| StorageError::IoError(path, e))?;

        Ok(())
    }
}

/// Errors that can occur reading or writing the profile record.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// Stored record is not a valid profile.
    ParseError(PathBuf, serde_json::Error),
    /// Profile could not be encoded.
    SerializeError(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            StorageError::ParseError(path, e) => {
                write!(f, "Failed to parse profile {}: {}", path.display(), e)
            }
            StorageError::SerializeError(e) => write!(f, "Failed to encode profile: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::IoError(_, e) => Some(e),
            StorageError::ParseError(_, e) => Some(e),
            StorageError::SerializeError(e) => Some(e),
        }
    }
}
