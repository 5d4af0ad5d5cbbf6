//! File export (JSON, CSV) and JSON import of build documents.

use crate::core::build::Build;
use crate::core::category::Category;
use crate::core::error;
use crate::core::output::{format_currency, format_weight};
use crate::core::store::BuildStore;
use std::fs;
use std::path::PathBuf;

pub const CSV_HEADER: [&str; 6] = ["Category", "Component", "Description", "Cost", "Weight", "Specs"];

#[derive(Copy, Clone, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ExportCli {
    #[clap(long, value_enum, default_value = "json")]
    pub format: ExportFormat,
    /// Write to this path. `-` prints to stdout; omitted derives a file name
    /// from the build name.
    #[clap(long)]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct ImportCli {
    /// Build document (JSON) to load.
    pub path: PathBuf,
}

pub fn run_export_cli(store: &BuildStore, cli: ExportCli) -> Result<(), error::QuadcalcError> {
    let body = match cli.format {
        ExportFormat::Json => export_json(store)?,
        ExportFormat::Csv => export_csv(store),
    };
    let path = match cli.out {
        Some(p) if p.as_os_str() == "-" => {
            println!("{}", body);
            return Ok(());
        }
        Some(p) => p,
        None => PathBuf::from(export_file_name(store.name(), cli.format)),
    };
    fs::write(&path, body)?;
    tracing::info!("Exported '{}' to {}", store.name(), path.display());
    println!("Wrote {}", path.display());
    Ok(())
}

pub fn run_import_cli(store: &mut BuildStore, cli: ImportCli) -> Result<(), error::QuadcalcError> {
    let text = fs::read_to_string(&cli.path)?;
    let build = import_json(store, &text)?;
    println!(
        "Imported '{}' ({} parts)",
        store.name(),
        crate::core::metrics::filled_count(&build.components)
    );
    Ok(())
}

/// The exported build document, pretty-printed.
pub fn export_json(store: &BuildStore) -> Result<String, error::QuadcalcError> {
    Ok(serde_json::to_string_pretty(&store.export_build())?)
}

fn csv_cell(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

fn csv_row<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .map(|c| csv_cell(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parts list with one row per registered category and a summary block.
pub fn export_csv(store: &BuildStore) -> String {
    let slots = store.components();
    let mut rows = vec![csv_row(&CSV_HEADER)];
    for category in Category::ALL {
        let row = match slots.get(category) {
            Some(c) => vec![
                category.label().to_string(),
                c.name.clone(),
                c.description.clone().unwrap_or_default(),
                format_currency(c.cost),
                format_weight(c.weight),
                c.flattened_specs("; "),
            ],
            None => vec![
                category.label().to_string(),
                "(empty)".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ],
        };
        rows.push(csv_row(&row));
    }
    rows.push(String::new());
    rows.push(csv_row(&[
        "TOTAL".to_string(),
        String::new(),
        String::new(),
        format_currency(Some(store.total_cost())),
        format_weight(Some(store.total_weight())),
        String::new(),
    ]));
    rows.push(csv_row(&["Build Name", store.name()]));
    rows.push(csv_row(&[
        "Parts".to_string(),
        format!("{} / {}", store.filled_count(), Category::ALL.len()),
    ]));
    rows.join("\n")
}

/// `<name>.<ext>` with every non-alphanumeric character replaced by `_`.
pub fn export_file_name(build_name: &str, format: ExportFormat) -> String {
    let stem: String = build_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}.{}", stem, format.extension())
}

/// Parse a build document and load it. On any parse failure the store is
/// left untouched.
pub fn import_json(store: &mut BuildStore, text: &str) -> Result<Build, error::QuadcalcError> {
    let build: Build = serde_json::from_str(text).map_err(|e| {
        tracing::warn!("Rejected build import: {}", e);
        error::QuadcalcError::InvalidImport(format!("Invalid JSON file: {}", e))
    })?;
    store.load_build(&build);
    Ok(build)
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "export",
        "version": "0.1.0",
        "description": "Build document export (JSON, CSV) and JSON import",
        "commands": [
            { "name": "export", "parameters": ["format", "out?"] },
            { "name": "import", "parameters": ["path"] }
        ],
        "csv_header": CSV_HEADER
    })
}
