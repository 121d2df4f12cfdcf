//! Flat-file credential persistence.
//!
//! The store holds exactly one record: the consumer key pair plus the
//! access token pair produced by the three-legged flow. It is read once at
//! process start and written once, at the end of a successful flow.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Credential persistence errors.
///
/// Absence of the file is deliberately distinct from unreadable contents:
/// the first means "run `x-ads auth login`", the second means the file was
/// corrupted or hand-edited badly.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No credential file exists yet.
    #[error("no credentials found at {0} (run the auth flow first)")]
    NotFound(PathBuf),

    /// The file exists but is not a valid credential record.
    #[error("invalid credential file {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },

    /// Filesystem failure.
    #[error("credential store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The durable OAuth 1.0a token set.
///
/// All four values are opaque strings, non-empty once the auth flow has
/// completed. Never mutated except by re-running the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    /// True when every field is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.consumer_key.is_empty()
            && !self.consumer_secret.is_empty()
            && !self.access_token.is_empty()
            && !self.access_token_secret.is_empty()
    }
}

const KEYS: [&str; 4] = [
    "consumer_key",
    "consumer_secret",
    "access_token",
    "access_token_secret",
];

/// File-backed credential store, one `key=value` pair per line.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if a credential file exists (it may still be invalid).
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load and validate the stored record.
    pub fn load(&self) -> Result<Credentials, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut fields = [None, None, None, None];
        for (lineno, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(StoreError::Invalid {
                    path: self.path.clone(),
                    reason: format!("line {} is not key=value", lineno + 1),
                });
            };
            if let Some(i) = KEYS.iter().position(|k| *k == key.trim()) {
                fields[i] = Some(value.trim().to_string());
            }
        }

        let mut take = |i: usize| -> Result<String, StoreError> {
            match fields[i].take() {
                Some(v) if !v.is_empty() => Ok(v),
                _ => Err(StoreError::Invalid {
                    path: self.path.clone(),
                    reason: format!("missing or empty {}", KEYS[i]),
                }),
            }
        };

        Ok(Credentials {
            consumer_key: take(0)?,
            consumer_secret: take(1)?,
            access_token: take(2)?,
            access_token_secret: take(3)?,
        })
    }

    /// Persist the full record, atomically replacing any previous one.
    pub fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let body = format!(
            "consumer_key={}\nconsumer_secret={}\naccess_token={}\naccess_token_secret={}\n",
            credentials.consumer_key,
            credentials.consumer_secret,
            credentials.access_token,
            credentials.access_token_secret,
        );

        // Write to a sibling temp file, then rename over the target.
        let tmp = self.path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(body.as_bytes())?;
            file.sync_all()?;
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Credentials {
        Credentials {
            consumer_key: "ck".into(),
            consumer_secret: "cs".into(),
            access_token: "at".into(),
            access_token_secret: "ats".into(),
        }
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials"));

        store.save(&sample()).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, sample());
        assert!(loaded.is_complete());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials"));

        assert!(matches!(store.load(), Err(StoreError::NotFound(_))));
        assert!(!store.exists());
    }

    #[test]
    fn garbage_contents_are_invalid_not_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials");
        fs::write(&path, "this is not a credential record").unwrap();

        let store = CredentialStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Invalid { .. })));
    }

    #[test]
    fn partial_record_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials");
        fs::write(&path, "consumer_key=ck\nconsumer_secret=cs\n").unwrap();

        let store = CredentialStore::new(&path);
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Invalid { .. }));
        assert!(err.to_string().contains("access_token"));
    }

    #[test]
    fn empty_value_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials");
        fs::write(
            &path,
            "consumer_key=ck\nconsumer_secret=\naccess_token=at\naccess_token_secret=ats\n",
        )
        .unwrap();

        let store = CredentialStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Invalid { .. })));
    }

    #[test]
    fn comments_and_blank_lines_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials");
        fs::write(
            &path,
            "# x-ads credentials\n\nconsumer_key=ck\nconsumer_secret=cs\naccess_token=at\naccess_token_secret=ats\n",
        )
        .unwrap();

        let store = CredentialStore::new(&path);
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn save_replaces_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials"));

        store.save(&sample()).unwrap();
        let mut updated = sample();
        updated.access_token = "at2".into();
        updated.access_token_secret = "ats2".into();
        store.save(&updated).unwrap();

        assert_eq!(store.load().unwrap(), updated);
    }
}
