//! `w2m extract <path>` – dump document fields as a table.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use w2m_core::config::W2mConfig;
use w2m_core::document::{self, TableFormat};

pub fn run_extract(cfg: &W2mConfig, cwd: &Path, path: &Path, output: &str, json: bool) -> Result<()> {
    let fields = cfg.field_descriptors()?;
    let rows = document::extract_path(path, cwd, &fields)?;
    let format = if json { TableFormat::Json } else { TableFormat::Tsv };

    if output == "-" {
        let stdout = io::stdout();
        document::write_table(&mut stdout.lock(), &rows, format)?;
    } else {
        let file = File::create(output).with_context(|| format!("create {}", output))?;
        let mut out = BufWriter::new(file);
        document::write_table(&mut out, &rows, format)?;
        out.flush().with_context(|| format!("write {}", output))?;
    }
    tracing::info!(documents = rows.len(), "extract finished");
    Ok(())
}
