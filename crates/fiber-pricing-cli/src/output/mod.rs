pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
///
/// A bare string is a document the command already rendered (the DRE
/// spreadsheet export) and is printed as-is.
pub fn format_output(format: &OutputFormat, value: &Value) {
    if let Value::String(rendered) = value {
        print!("{rendered}");
        return;
    }

    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => {
            if let Err(e) = csv_out::print_csv(value) {
                eprintln!("CSV output error: {}", e);
            }
        }
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}
