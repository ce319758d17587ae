//! Rendering of a character sheet for the terminal.

use std::fmt::Write as _;

use anyhow::Result;
use attribute_core::{AttributeKind, AttributeRecord, CharacterAttributes};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per attribute
    #[default]
    Table,
    /// Persisted records as JSON
    Json,
}

pub fn render(sheet: &CharacterAttributes, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(table(sheet)),
        OutputFormat::Json => {
            let records: Vec<AttributeRecord> = sheet.records();
            Ok(serde_json::to_string_pretty(&records)?)
        }
    }
}

fn table(sheet: &CharacterAttributes) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<12} {:>6} {:>6} {:>6}  {}",
        "attribute", "base", "mod", "final", "current"
    );
    for view in sheet.iter() {
        let current = match (view.kind(), view.current_value()) {
            (AttributeKind::Resource, Some(current)) => {
                format!("{}/{} ({:.0}%)", current, view.final_value(), view.current_ratio() * 100.0)
            }
            _ => String::from("-"),
        };
        let _ = writeln!(
            out,
            "{:<12} {:>6} {:>6} {:>6}  {}",
            view.name(),
            view.base_value(),
            view.modifier(),
            view.final_value(),
            current
        );
    }
    out
}
