//! Cascade manifest and integrity verification.
//!
//! Face/eye region detection runs on pretrained cascade classifier files
//! that must exist on disk before a detector backend can be constructed.
//! This crate owns that one-time setup concern: a TOML manifest lists the
//! expected cascade files with their SHA-256 digests, and verification
//! confirms every file is present and unmodified. Per-frame processing
//! never touches any of this.
//!
//! Manifest format:
//!
//! ```toml
//! [[cascade]]
//! name = "haarcascade_frontalface_alt.xml"
//! sha256 = "…64 hex chars…"
//! kind = "face"
//!
//! [[cascade]]
//! name = "haarcascade_eye_tree_eyeglasses.xml"
//! sha256 = "…"
//! kind = "eye"
//! ```

use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cascade file not found: {name} ({path})")]
    MissingCascade { name: String, path: PathBuf },

    #[error("failed to open cascade file: {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read cascade file: {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "cascade checksum mismatch for {name} ({path})\n  expected: {expected}\n  got:      {got}"
    )]
    ChecksumMismatch {
        name: String,
        path: PathBuf,
        expected: String,
        got: String,
    },
}

/// One expected cascade file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CascadeFile {
    /// File name inside the cascade directory.
    pub name: String,
    /// Expected SHA-256 hex digest.
    pub sha256: String,
    /// What the cascade detects ("face", "eye", …). Informational only.
    #[serde(default)]
    pub kind: Option<String>,
}

/// The set of cascade files a deployment expects.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CascadeManifest {
    #[serde(rename = "cascade", default)]
    pub cascades: Vec<CascadeFile>,
}

impl CascadeManifest {
    /// Load and parse a manifest from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = fs::read_to_string(path).map_err(|source| ManifestError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ManifestError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a manifest from an in-memory TOML string.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Verify that every listed cascade exists in `dir` with a matching
    /// digest. Stops at the first failure.
    pub fn verify_dir(&self, dir: &Path) -> Result<(), ManifestError> {
        for cascade in &self.cascades {
            let path = dir.join(&cascade.name);
            verify_file_sha256(&cascade.name, &path, &cascade.sha256)?;
        }
        Ok(())
    }
}

/// Compute SHA-256 hex digest of a file, streaming.
pub fn sha256_file_hex(path: &Path) -> Result<String, ManifestError> {
    let mut file = fs::File::open(path).map_err(|source| ManifestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = file.read(&mut buf).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Verify a single cascade file against an expected digest.
pub fn verify_file_sha256(
    name: &str,
    path: &Path,
    expected_sha256: &str,
) -> Result<(), ManifestError> {
    if !path.exists() {
        return Err(ManifestError::MissingCascade {
            name: name.to_string(),
            path: path.to_path_buf(),
        });
    }

    let digest = sha256_file_hex(path)?;
    if !digest.eq_ignore_ascii_case(expected_sha256) {
        return Err(ManifestError::ChecksumMismatch {
            name: name.to_string(),
            path: path.to_path_buf(),
            expected: expected_sha256.to_string(),
            got: digest,
        });
    }

    Ok(())
}

/// Default cascade directory: `$PALPEBRA_CASCADE_DIR`, else
/// `$XDG_DATA_HOME/palpebra/cascades` (falling back to
/// `~/.local/share/palpebra/cascades`).
pub fn default_cascade_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PALPEBRA_CASCADE_DIR") {
        return PathBuf::from(dir);
    }
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local/share")
        })
        .join("palpebra/cascades")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "palpebra-models-test-{tag}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_cascade(dir: &Path, name: &str, contents: &[u8]) -> String {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        sha256_file_hex(&path).unwrap()
    }

    #[test]
    fn parse_accepts_well_formed_manifest() {
        let manifest = CascadeManifest::parse(
            r#"
            [[cascade]]
            name = "haarcascade_frontalface_alt.xml"
            sha256 = "00"
            kind = "face"

            [[cascade]]
            name = "haarcascade_eye_tree_eyeglasses.xml"
            sha256 = "11"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.cascades.len(), 2);
        assert_eq!(manifest.cascades[0].kind.as_deref(), Some("face"));
        assert_eq!(manifest.cascades[1].kind, None);
    }

    #[test]
    fn parse_rejects_missing_sha256() {
        let err = CascadeManifest::parse(
            r#"
            [[cascade]]
            name = "face.xml"
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn verify_rejects_missing_cascade() {
        let dir = temp_dir("missing");
        let manifest = CascadeManifest {
            cascades: vec![CascadeFile {
                name: "nope.xml".to_string(),
                sha256: "00".to_string(),
                kind: None,
            }],
        };

        let err = manifest.verify_dir(&dir).unwrap_err();
        assert!(matches!(err, ManifestError::MissingCascade { .. }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn verify_rejects_checksum_mismatch() {
        let dir = temp_dir("mismatch");
        write_cascade(&dir, "face.xml", b"<cascade/>");
        let manifest = CascadeManifest {
            cascades: vec![CascadeFile {
                name: "face.xml".to_string(),
                sha256: "00".to_string(),
                kind: None,
            }],
        };

        let err = manifest.verify_dir(&dir).unwrap_err();
        assert!(matches!(err, ManifestError::ChecksumMismatch { .. }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn verify_accepts_matching_digests() {
        let dir = temp_dir("match");
        let face_digest = write_cascade(&dir, "face.xml", b"<cascade kind='face'/>");
        let eye_digest = write_cascade(&dir, "eye.xml", b"<cascade kind='eye'/>");
        let manifest = CascadeManifest {
            cascades: vec![
                CascadeFile {
                    name: "face.xml".to_string(),
                    sha256: face_digest,
                    kind: Some("face".to_string()),
                },
                CascadeFile {
                    name: "eye.xml".to_string(),
                    sha256: eye_digest,
                    kind: Some("eye".to_string()),
                },
            ],
        };

        manifest.verify_dir(&dir).unwrap();

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn verify_accepts_uppercase_expected_digest() {
        let dir = temp_dir("case");
        let digest = write_cascade(&dir, "face.xml", b"<cascade/>");
        verify_file_sha256("face.xml", &dir.join("face.xml"), &digest.to_uppercase()).unwrap();

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_reports_unreadable_manifest() {
        let err = CascadeManifest::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ManifestError::ManifestRead { .. }));
    }
}
