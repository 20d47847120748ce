//! `w2m update <input>` – write `<path>-new.md` for every row of the input table.

use anyhow::{Context, Result};
use std::path::Path;
use w2m_core::config::W2mConfig;
use w2m_core::document;

pub fn run_update(cfg: &W2mConfig, cwd: &Path, input: &Path) -> Result<()> {
    let text = std::fs::read_to_string(input).with_context(|| format!("read {}", input.display()))?;
    let records = document::parse_update_table(&text)?;
    if records.is_empty() {
        println!("No rows in {}.", input.display());
        return Ok(());
    }
    let fields = cfg.field_descriptors()?;
    for path in document::update_records(&records, cwd, &fields)? {
        let shown = path.strip_prefix(cwd).unwrap_or(&path);
        println!("updated {}", shown.display());
    }
    Ok(())
}
