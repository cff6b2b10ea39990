//! Clipboard integration.

use crate::error::Result;
use crate::projection::ProjectedTable;
use arboard::Clipboard;

/// Copy text to clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    tracing::debug!("Copied {} bytes to clipboard", text.len());
    Ok(())
}

/// Copy a projected table as tab-separated text, ready to paste into a spreadsheet.
pub fn copy_table(table: &ProjectedTable) -> Result<()> {
    copy_to_clipboard(&table.to_tsv())
}
