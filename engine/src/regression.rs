//! Golden frame hashes for headless rendering tests.
//!
//! A golden file stores one sha256 per rendered frame. Missing goldens are written on first
//! run; `SKILLTREE_UPDATE_GOLDENS=1` rewrites existing ones and `SKILLTREE_REQUIRE_GOLDENS=1`
//! turns a missing golden into a failure (for CI).

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Accepts `1/true/yes/on` (case-insensitive).
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

pub fn update_goldens_enabled() -> bool {
    env_flag("SKILLTREE_UPDATE_GOLDENS")
}

/// What to do with a golden file that is missing or differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GoldenMode {
    /// Write missing goldens, compare existing ones.
    #[default]
    WriteMissing,
    /// Rewrite unconditionally.
    Update,
    /// Compare only; a missing golden is an error.
    Require,
}

impl GoldenMode {
    pub fn from_env() -> Self {
        if update_goldens_enabled() {
            GoldenMode::Update
        } else if env_flag("SKILLTREE_REQUIRE_GOLDENS") {
            GoldenMode::Require
        } else {
            GoldenMode::WriteMissing
        }
    }
}

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[macro_export]
macro_rules! regression_golden_path {
    ($name:expr) => {{
        let base = $crate::regression::sanitize_filename($name);
        ::std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("goldens")
            .join(format!("{base}.json"))
    }};
}

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rgba);
    hex::encode(hasher.finalize())
}

#[derive(Debug, thiserror::Error)]
pub enum GoldenError {
    #[error("golden missing at {path} (run once with SKILLTREE_UPDATE_GOLDENS=1 and commit it)")]
    Missing { path: PathBuf },
    #[error("golden io failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("golden json invalid at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "golden metadata mismatch at {path}: expected {expected}, got {actual} (set SKILLTREE_UPDATE_GOLDENS=1 to rewrite)"
    )]
    Metadata {
        path: PathBuf,
        expected: String,
        actual: String,
    },
    #[error(
        "golden mismatch at {path} (frame {frame}): expected {expected}, got {actual} (set SKILLTREE_UPDATE_GOLDENS=1 to rewrite)"
    )]
    Frame {
        path: PathBuf,
        frame: usize,
        expected: String,
        actual: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameHashGolden {
    pub version: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub hash_alg: String,
    /// One hash per rendered frame.
    pub hashes: Vec<String>,
}

impl FrameHashGolden {
    pub fn new(name: impl Into<String>, width: u32, height: u32, hashes: Vec<String>) -> Self {
        Self {
            version: 1,
            name: name.into(),
            width,
            height,
            hash_alg: "sha256".to_string(),
            hashes,
        }
    }

    fn metadata(&self) -> String {
        format!(
            "v{} alg={} {}x{} frames={}",
            self.version,
            self.hash_alg,
            self.width,
            self.height,
            self.hashes.len()
        )
    }
}

pub fn load_golden_json(path: impl AsRef<Path>) -> Result<FrameHashGolden, GoldenError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| GoldenError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| GoldenError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_golden_json(
    path: impl AsRef<Path>,
    golden: &FrameHashGolden,
) -> Result<(), GoldenError> {
    let path = path.as_ref();
    let io_err = |source| GoldenError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let text = serde_json::to_string_pretty(golden).map_err(|source| GoldenError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let mut file = fs::File::create(path).map_err(io_err)?;
    file.write_all(text.as_bytes()).map_err(io_err)?;
    file.write_all(b"\n").map_err(io_err)
}

pub fn assert_or_update_golden_json(
    path: impl AsRef<Path>,
    golden: &FrameHashGolden,
    mode: GoldenMode,
) -> Result<(), GoldenError> {
    let path = path.as_ref();
    let exists = path.exists();

    if !exists && mode == GoldenMode::Require {
        return Err(GoldenError::Missing {
            path: path.to_path_buf(),
        });
    }
    if mode == GoldenMode::Update || !exists {
        save_golden_json(path, golden)?;
        tracing::info!(
            path = %path.display(),
            created = !exists,
            "wrote golden frame hashes"
        );
        return Ok(());
    }

    let expected = load_golden_json(path)?;
    if expected.metadata() != golden.metadata() {
        return Err(GoldenError::Metadata {
            path: path.to_path_buf(),
            expected: expected.metadata(),
            actual: golden.metadata(),
        });
    }

    for (frame, (a, b)) in expected.hashes.iter().zip(&golden.hashes).enumerate() {
        if a != b {
            return Err(GoldenError::Frame {
                path: path.to_path_buf(),
                frame,
                expected: a.clone(),
                actual: b.clone(),
            });
        }
    }
    Ok(())
}

/// Hashes each frame produced by `render` and checks them against the golden at `path`.
pub fn assert_or_update_golden_hashes<I, Render>(
    name: &str,
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    frames: I,
    mut render: Render,
) -> Result<FrameHashGolden, GoldenError>
where
    I: IntoIterator,
    Render: FnMut(I::Item, &mut [u8]),
{
    let len = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    let mut buf = vec![0u8; len];
    let hashes = frames
        .into_iter()
        .map(|frame| {
            buf.iter_mut().for_each(|b| *b = 0);
            render(frame, &mut buf);
            rgba_sha256_hex(&buf)
        })
        .collect();

    let golden = FrameHashGolden::new(name, width, height, hashes);
    assert_or_update_golden_json(path, &golden, GoldenMode::from_env())?;
    Ok(golden)
}
