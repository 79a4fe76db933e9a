use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lifexp_models::data_handling::{DataTable, DatasetCache};
use lifexp_models::io::read_table;

pub fn validate_tsv_or_csv_file(path: &str) -> Result<()> {
    let pb = PathBuf::from(path);

    let ext = pb
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("tsv") | Some("csv") => {}
        _ => anyhow::bail!("File must have a .tsv or .csv extension: {}", path),
    }

    if !pb.exists() {
        anyhow::bail!("File does not exist: {}", path);
    }

    Ok(())
}

/// Validate `path` and load it through `cache`, reading the file at most once.
pub fn load_dataset(cache: &mut DatasetCache, path: &str) -> Result<Arc<DataTable>> {
    validate_tsv_or_csv_file(path)?;
    cache.get_or_load(path, || read_table(path))
}

/// Write a rendered HTML page, creating the parent directory when needed.
pub fn write_html(path: &str, html: &str) -> Result<()> {
    let path = Path::new(path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("Failed to write: {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
