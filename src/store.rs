//! On-disk bundle layout.
//!
//! ```text
//! <dest_root>/<pdf stem>/bundle.json
//! <dest_root>/<pdf stem>/docs/0001-despacho.txt
//! <dest_root>/<pdf stem>/docs/0002-aviso.txt
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::Bundle;
use crate::render::{from_json, to_json, JsonFormat};

/// Name of the bundle file inside a bundle directory.
pub const BUNDLE_FILE: &str = "bundle.json";

/// Directory holding one body file per doc.
pub const DOCS_DIR: &str = "docs";

/// Directory a bundle is stored in under `dest_root`.
pub fn bundle_dir<P: AsRef<Path>>(bundle: &Bundle, dest_root: P) -> Result<PathBuf> {
    let stem = Path::new(&bundle.pdf_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| Error::Other(format!("cannot derive a folder from '{}'", bundle.pdf_name)))?;
    Ok(dest_root.as_ref().join(stem))
}

/// Write a bundle and its doc bodies; returns the bundle directory.
///
/// The `docs/` directory is rebuilt on every save, so the tree always
/// mirrors the last bundle written.
pub fn save_bundle<P: AsRef<Path>>(bundle: &Bundle, dest_root: P) -> Result<PathBuf> {
    let root = bundle_dir(bundle, dest_root)?;
    let docs_dir = root.join(DOCS_DIR);
    if docs_dir.exists() {
        fs::remove_dir_all(&docs_dir)?;
    }
    fs::create_dir_all(&docs_dir)?;

    fs::write(root.join(BUNDLE_FILE), to_json(bundle, JsonFormat::Pretty)?)?;
    for (idx, doc) in bundle.docs.iter().enumerate() {
        let name = format!("{:04}-{}.txt", idx + 1, doc.tipo);
        fs::write(docs_dir.join(name), &doc.body_text)?;
    }

    log::debug!("Saved {} docs to {}", bundle.len(), root.display());
    Ok(root)
}

/// Load a bundle from a `bundle.json` file or a bundle directory.
pub fn load_bundle<P: AsRef<Path>>(path: P) -> Result<Bundle> {
    let path = path.as_ref();
    let file = if path.is_dir() {
        path.join(BUNDLE_FILE)
    } else {
        path.to_path_buf()
    };
    from_json(&fs::read_to_string(file)?)
}
