//! Content fingerprinting
//!
//! Digests are computed from the full byte content of a file. Metadata is
//! never consulted.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use sha2::{Digest as _, Sha256};

use crate::core::models::{ContentFingerprint, Digest, RelativePath};

/// Hash the full content of `path`
///
/// # Errors
///
/// Returns the underlying I/O error if the file is missing or unreadable.
pub fn fingerprint(path: &Path) -> io::Result<Digest> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(Digest::from_hasher(hasher))
}

/// Fingerprint `file` and pair it with its path relative to `root`
///
/// # Errors
///
/// Fails if the file lies outside `root` or cannot be read.
pub fn fingerprint_file(root: &Path, file: &Path) -> io::Result<ContentFingerprint> {
    let relative = RelativePath::from_root(root, file).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is outside {}", file.display(), root.display()),
        )
    })?;
    Ok(ContentFingerprint::new(relative, fingerprint(file)?))
}

/// Fingerprint many files in parallel
///
/// Files that cannot be read are logged and left out of the map.
#[must_use]
pub fn fingerprint_all<'a>(
    root: &Path,
    files: impl IntoParallelIterator<Item = &'a PathBuf>,
) -> BTreeMap<RelativePath, Digest> {
    files
        .into_par_iter()
        .filter_map(|file| match fingerprint_file(root, file) {
            Ok(fp) => Some((fp.path, fp.digest)),
            Err(e) => {
                log::warn!("cannot fingerprint {}: {e}", file.display());
                None
            },
        })
        .collect()
}
