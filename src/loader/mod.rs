//! Configuration document loading.
//!
//! [`Catalog::load`] resolves a configuration name or path against a small
//! search path, parses the document and commits its entries into the
//! catalog's descriptor tables. Loading is deliberately not transactional:
//! entries committed before an aborting element stay committed, so callers
//! can assemble a catalog incrementally from partial documents and decide
//! themselves how to react to a failed load.

mod error;
mod parse;
mod xml;


use std::path::{Path, PathBuf};

use tracing::debug;

pub use error::LoadError;

use crate::catalog::Catalog;

/// Default configuration extension appended to bare names.
const CFG_EXTENSION: &str = ".cfg";

/// Install-time configuration directory; overridable through the
/// environment for relocated installations.
const CFG_DIR_ENV: &str = "SYMCAT_CFG_DIR";
const CFG_DIR_DEFAULT: &str = "cfg";

impl Catalog {
    /// Load a configuration document.
    ///
    /// A relative, extensionless `path` gets `.cfg` appended. Relative
    /// paths are tried as given, then against the install-time
    /// configuration directory and the directories derived from the
    /// running executable's location. Re-loading an already-loaded
    /// absolute path is a no-op returning `Ok`.
    ///
    /// Loading is not transactional: elements committed before an
    /// aborting element remain committed.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let is_absolute = path.is_absolute();

        let mut filename = path.to_path_buf();
        if !is_absolute && filename.extension().is_none() {
            filename = PathBuf::from(format!("{}{CFG_EXTENSION}", filename.display()));
        }

        let resolved = resolve(&filename, is_absolute).ok_or(LoadError::FileNotFound)?;
        let absolute = resolved
            .canonicalize()
            .unwrap_or_else(|_| resolved.clone());
        let absolute = absolute.to_string_lossy().into_owned();

        let content = std::fs::read(&resolved).map_err(|_| LoadError::FileNotFound)?;
        let root = xml::parse_document(&content)?;

        if self.files.contains(&absolute) {
            debug!(path = %absolute, "configuration already loaded, skipping");
            return Ok(());
        }

        parse::load_document(self, &root)?;
        self.files.insert(absolute);
        Ok(())
    }

    /// Load a configuration document from already-read XML text.
    ///
    /// No search-path resolution and no duplicate-load bookkeeping; the
    /// same non-transactional commit semantics as [`Catalog::load`].
    pub fn load_str(&mut self, xml: &str) -> Result<(), LoadError> {
        let root = xml::parse_document(xml.as_bytes())?;
        parse::load_document(self, &root)
    }
}

// Candidate directories for a relative configuration path, probed in
// order: the file as given, the install-time directory, then directories
// derived from the executable's location.
fn resolve(filename: &Path, is_absolute: bool) -> Option<PathBuf> {
    debug!(path = %filename.display(), "looking for configuration");
    if filename.is_file() {
        return Some(filename.to_path_buf());
    }
    if is_absolute {
        return None;
    }

    let mut folders: Vec<PathBuf> = Vec::new();
    folders.push(
        std::env::var_os(CFG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CFG_DIR_DEFAULT)),
    );
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        folders.push(exe_dir.join(CFG_DIR_DEFAULT));
        folders.push(exe_dir);
    }

    for folder in folders {
        let candidate = folder.join(filename);
        debug!(path = %candidate.display(), "looking for configuration");
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}
