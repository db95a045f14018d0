//! Statement scripts
//!
//! Writes a generated statement list to a `.sql` file that can be piped
//! into the `mysql` client later.

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Render statements one per line, each terminated with `;`
pub fn render_script(statements: &[String]) -> String {
    statements
        .iter()
        .map(|statement| format!("{};\n", statement))
        .collect()
}

/// Write the statements to a timestamped file in `directory`
pub fn write_script(directory: &Path, statements: &[String]) -> Result<PathBuf> {
    fs::create_dir_all(directory)?;

    let filename = format!("{}_schema_diff.sql", generate_script_id());
    let path = directory.join(filename);
    fs::write(&path, render_script(statements))?;

    tracing::info!(path = %path.display(), statements = statements.len(), "Wrote statement script");
    Ok(path)
}

/// Generate a script ID based on timestamp
fn generate_script_id() -> String {
    Utc::now().format("%Y%m%d%H%M%S").to_string()
}
