//! Document export: writes the paginated letter into the export directory.
//!
//! The file is named from the company and position, so exporting the same
//! letter twice rewrites the same artifact with the same bytes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};

use crate::export::{DocumentExporter, DocumentFields};
use crate::layout::{layout_letter, PageConfig};

pub struct FileDocumentExporter {
    dir: PathBuf,
    page_config: PageConfig,
}

impl FileDocumentExporter {
    pub fn new(dir: impl Into<PathBuf>, page_config: PageConfig) -> Self {
        Self {
            dir: dir.into(),
            page_config,
        }
    }

    pub fn path_for(&self, fields: &DocumentFields) -> PathBuf {
        self.dir.join(document_file_name(fields))
    }

    async fn write(&self, fields: &DocumentFields) -> Result<(PathBuf, usize)> {
        let letter = layout_letter(fields, &self.page_config);
        let path = self.path_for(fields);

        write_atomically(&self.dir, &path, letter.render()).await?;
        Ok((path, letter.page_count()))
    }
}

#[async_trait]
impl DocumentExporter for FileDocumentExporter {
    async fn export_document(&self, fields: &DocumentFields) {
        match self.write(fields).await {
            Ok((path, pages)) => info!("Exported {pages}-page letter to {}", path.display()),
            Err(e) => warn!("Document export failed: {e:#}"),
        }
    }
}

async fn write_atomically(dir: &Path, path: &Path, contents: String) -> Result<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let tmp = path.with_extension("txt.partial");
    tokio::fs::write(&tmp, contents)
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to move export into place at {}", path.display()))?;
    Ok(())
}

/// `Cover_Letter_<Company>_<Position>.txt`, with anything non-alphanumeric folded to `_`.
pub fn document_file_name(fields: &DocumentFields) -> String {
    format!(
        "Cover_Letter_{}_{}.txt",
        file_component(&fields.company_name, "Company"),
        file_component(&fields.position, "Position")
    )
}

fn file_component(value: &str, fallback: &str) -> String {
    let folded: String = value
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    let collapsed = folded
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if collapsed.is_empty() {
        fallback.to_string()
    } else {
        collapsed
    }
}
