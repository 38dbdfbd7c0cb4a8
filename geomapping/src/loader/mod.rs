//! Lecture des collections d'entrée

pub mod geojson;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use geomapping_core::Collection;

pub use self::geojson::load_collection;

/// Collection lue depuis un fichier, avec sa provenance
#[derive(Debug, Clone)]
pub struct LoadedCollection {
    pub path: PathBuf,

    /// Checksum blake3 du fichier (hex)
    pub checksum: String,

    pub collection: Collection,
}

/// Calcule le checksum blake3 d'un fichier
pub fn compute_file_checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 65536]; // 64KB buffer

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}
