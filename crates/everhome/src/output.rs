//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Render a tri-state reading, colored when enabled.
pub fn tri_state(value: Option<bool>, on: &str, off: &str, color: bool) -> String {
    match (value, color) {
        (Some(true), true) => on.green().to_string(),
        (Some(false), true) => off.dimmed().to_string(),
        (None, true) => "unknown".yellow().to_string(),
        (Some(true), false) => on.to_owned(),
        (Some(false), false) => off.to_owned(),
        (None, false) => "unknown".to_owned(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: builds rows with `to_row`
/// - `json` / `json-compact` / `yaml`: serializes the original data
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => render_yaml(data)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item views are
/// key/value listings rather than tables.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => render_yaml(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Validation {
        field: "output".into(),
        reason: format!("YAML serialization failed: {e}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(serde::Serialize)]
    struct Item {
        id: &'static str,
        on: bool,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: String,
    }

    fn items() -> Vec<Item> {
        vec![Item { id: "1", on: true }, Item { id: "2", on: false }]
    }

    fn row(item: &Item) -> Row {
        Row {
            id: item.id.to_owned(),
        }
    }

    #[test]
    fn plain_lists_ids() {
        let out = render_list(&OutputFormat::Plain, &items(), row, |i| i.id.into()).unwrap();
        assert_eq!(out, "1\n2");
    }

    #[test]
    fn compact_json_is_one_line() {
        let out = render_list(&OutputFormat::JsonCompact, &items(), row, |i| i.id.into()).unwrap();
        assert_eq!(out, r#"[{"id":"1","on":true},{"id":"2","on":false}]"#);
    }

    #[test]
    fn table_has_header() {
        let out = render_list(&OutputFormat::Table, &items(), row, |i| i.id.into()).unwrap();
        assert!(out.contains("ID"));
        assert!(out.contains('2'));
    }

    #[test]
    fn tri_state_without_color() {
        assert_eq!(tri_state(Some(true), "open", "closed", false), "open");
        assert_eq!(tri_state(None, "open", "closed", false), "unknown");
    }
}
