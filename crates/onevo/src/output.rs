//! Output rendering: tables, JSON, YAML, and plain text.

use std::io::IsTerminal;

use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliResult;

/// Whether color output should be used for the current invocation.
pub fn should_color(opts: &GlobalOpts) -> bool {
    match opts.color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Render a list of records in the requested format.
///
/// `plain` extracts the scripting-friendly value (usually the id) for
/// one-per-line output.
pub fn render_list<T, F>(opts: &GlobalOpts, rows: &[T], plain: F) -> CliResult
where
    T: Tabled + Serialize,
    F: Fn(&T) -> String,
{
    match opts.output {
        OutputFormat::Table => {
            if rows.is_empty() {
                if !opts.quiet {
                    println!("(no results)");
                }
                return Ok(());
            }
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::JsonCompact => println!("{}", serde_json::to_string(rows)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(rows)?),
        OutputFormat::Plain => {
            for row in rows {
                println!("{}", plain(row));
            }
        }
    }
    Ok(())
}

/// Render a single record. Table mode uses a two-column field/value
/// layout built by the caller.
pub fn render_single<T: Serialize>(
    opts: &GlobalOpts,
    record: &T,
    fields: &[(&str, String)],
) -> CliResult {
    match opts.output {
        OutputFormat::Table => {
            let mut table = tabled::builder::Builder::default();
            for (name, value) in fields {
                table.push_record([(*name).to_owned(), value.clone()]);
            }
            let mut table = table.build();
            table.with(Style::rounded());
            println!("{table}");
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::JsonCompact => println!("{}", serde_json::to_string(record)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(record)?),
        OutputFormat::Plain => {
            for (name, value) in fields {
                println!("{name}\t{value}");
            }
        }
    }
    Ok(())
}

/// Format an optional value for table cells.
pub fn opt(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

/// Format an optional timestamp as a date for table cells.
pub fn opt_date(value: Option<&chrono::DateTime<chrono::Utc>>) -> String {
    value.map_or_else(|| "-".to_owned(), |t| t.format("%Y-%m-%d").to_string())
}

/// Format a price in dollars.
pub fn price(value: f64) -> String {
    format!("${value:.2}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn opt_substitutes_dash() {
        assert_eq!(opt(None), "-");
        assert_eq!(opt(Some("x")), "x");
    }

    #[test]
    fn price_formats_two_decimals() {
        assert_eq!(price(29.0), "$29.00");
        assert_eq!(price(12.5), "$12.50");
    }
}
