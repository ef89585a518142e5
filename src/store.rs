//! Flat-file persistence for address lists and screening results.
//!
//! Address lists come in two shapes, chosen by file extension:
//! - `.json`: a pretty-printed array of `{ "address", "label" }` objects.
//! - `.txt`: an optional `address  label` header followed by one
//!   `<address>  <label>` line per wallet.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::types::{AddressItem, ScreenResult};

/// Header line written at the top of text address lists.
pub const TEXT_HEADER: &str = "address  label";

/// Supported address list formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    Json,
    Text,
}

impl ListFormat {
    /// Format implied by the path's extension, if supported.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            Some("txt") => Some(Self::Text),
            _ => None,
        }
    }
}

/// True for regular files with a supported address list extension.
pub fn is_address_file(path: &Path) -> bool {
    path.is_file() && ListFormat::from_path(path).is_some()
}

/// Read an address list, picking the parser by extension.
pub fn read_address_file(path: &Path) -> Result<Vec<AddressItem>> {
    let format = list_format(path)?;
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    match format {
        ListFormat::Json => {
            // Channels without labelled wallets may have been saved as `null`.
            let items: Option<Vec<AddressItem>> = serde_json::from_str(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            Ok(items.unwrap_or_default())
        }
        ListFormat::Text => Ok(parse_text_list(&contents)),
    }
}

/// Write an address list in the format implied by the path's extension.
pub fn write_address_file(path: &Path, items: &[AddressItem]) -> Result<()> {
    match list_format(path)? {
        ListFormat::Json => write_json(path, items),
        ListFormat::Text => {
            let rows = items.iter().map(|i| (i.address.as_str(), i.label.as_str()));
            write_text(path, rows)
        }
    }
}

/// Parse the text list format.
///
/// The first line is treated as a header when it contains a double space.
/// Remaining lines are split on whitespace; the first field is the address
/// and the rest, joined by single spaces, is the label. Lines with fewer
/// than two fields are ignored.
pub fn parse_text_list(contents: &str) -> Vec<AddressItem> {
    let mut lines = contents.lines().peekable();
    if lines.peek().is_some_and(|first| first.contains("  ")) {
        lines.next();
    }

    lines
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let address = fields.next()?;
            let label = fields.collect::<Vec<_>>().join(" ");
            if label.is_empty() {
                return None;
            }
            Some(AddressItem {
                address: address.to_string(),
                label,
            })
        })
        .collect()
}

/// Read consolidated results.
pub fn read_results(path: &Path) -> Result<Vec<ScreenResult>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

/// Write consolidated results as pretty JSON.
pub fn write_results(path: &Path, results: &[ScreenResult]) -> Result<()> {
    write_json(path, results)
}

/// Write `address  label` rows under the text header, creating the parent
/// directory if needed.
pub fn write_text_report<'a, I>(path: &Path, rows: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    write_text(path, rows)
}

fn list_format(path: &Path) -> Result<ListFormat> {
    match ListFormat::from_path(path) {
        Some(format) => Ok(format),
        None => bail!("unsupported file format: {}", path.display()),
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let contents = serde_json::to_string_pretty(value).context("failed to serialize JSON")?;
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn write_text<'a, I>(path: &Path, rows: I) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut contents = String::from(TEXT_HEADER);
    contents.push('\n');
    for (address, label) in rows {
        contents.push_str(address);
        contents.push_str("  ");
        contents.push_str(label);
        contents.push('\n');
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
