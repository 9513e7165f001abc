//! Reading and writing gettext PO catalogs.
//!
//! The resolver never touches files directly; it works on a [`Catalog`]
//! obtained through a [`CatalogStore`]. [`PoFile`] is the on-disk store.

pub mod parser;
pub mod writer;

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::errors::CatalogError;

pub use parser::parse;
pub use writer::to_po_string;

/// Narrow load/write interface over a catalog format.
pub trait CatalogStore {
    /// Load a catalog. Fails on unreadable or malformed input.
    fn load(&self, path: &Path) -> Result<Catalog, CatalogError>;

    /// Write a catalog. Either the whole file is written or none of it.
    fn write(&self, catalog: &Catalog, path: &Path) -> Result<(), CatalogError>;
}

/// PO files on the local filesystem (UTF-8).
#[derive(Debug, Clone, Copy, Default)]
pub struct PoFile;

impl CatalogStore for PoFile {
    fn load(&self, path: &Path) -> Result<Catalog, CatalogError> {
        info!(path = %path.display(), "loading catalog");
        let text = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let catalog = parse(&text, path)?;
        debug!(
            entries = catalog.len(),
            header = catalog.header.is_some(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    fn write(&self, catalog: &Catalog, path: &Path) -> Result<(), CatalogError> {
        info!(path = %path.display(), entries = catalog.len(), "writing catalog");
        let text = to_po_string(catalog);

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CatalogError::io(path, e))?;
        tmp.write_all(text.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| CatalogError::io(path, e))?;

        // Keep the permissions of a file we are replacing.
        if let Ok(meta) = std::fs::metadata(path) {
            if let Err(e) = tmp.as_file().set_permissions(meta.permissions()) {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "could not keep permissions of the replaced catalog"
                );
            }
        }

        tmp.persist(path).map_err(|e| CatalogError::io(path, e.error))?;
        debug!(bytes = text.len(), "catalog written");
        Ok(())
    }
}
