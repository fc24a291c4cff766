use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Print a JSON document. `json` keeps the compact form; `table` lists one
/// row per leaf field.
pub fn print_document(value: &Value, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{value}"),
        OutputFormat::Pretty => println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        ),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (field, leaf) in leaf_rows(value) {
                table.add_row(vec![field, leaf]);
            }
            println!("{table}");
        }
    }
}

fn leaf_rows(value: &Value) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    collect_leaves(String::new(), value, &mut rows);
    rows
}

fn collect_leaves(prefix: String, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_leaves(path, child, rows);
            }
        }
        Value::String(text) => rows.push((field_name(prefix), text.clone())),
        other => rows.push((field_name(prefix), other.to_string())),
    }
}

fn field_name(path: String) -> String {
    if path.is_empty() {
        "value".to_string()
    } else {
        path
    }
}
