//! QuadCalc: a local-first FPV quadcopter build planner.
//!
//! A build is fourteen fixed component slots (frame, motors, propellers,
//! battery, flight controller, ...). The build store owns that slot map,
//! records undo/redo snapshots for every user edit, and autosaves a debounced
//! draft into a small ring so the working build survives restarts.
//! Everything else is derived on read: cost and weight totals, thrust-to-weight,
//! a flight-time estimate, and the compatibility alerts produced by a
//! declarative table of pairwise rules.
//!
//! # Architecture
//!
//! ## Single mutation path
//!
//! All slot-map changes route through one private entry point on
//! [`core::store::BuildStore`], tagged as either a user edit or history replay.
//! Only user edits snapshot history and arm the autosave.
//!
//! ## Storage
//!
//! Persistence goes through the [`core::kv::KeyValueStore`] seam: an SQLite
//! key-value table under the data directory for the CLI, an in-memory map for
//! tests. Drafts, saved builds and custom presets are JSON documents under
//! fixed keys.
//!
//! ## Plugins
//!
//! - `saved_builds`: user-named saves with generated ids
//! - `presets`: embedded stock catalog plus custom presets
//! - `export`: JSON/CSV export and JSON import
//! - `assistant`: plain-text build context and tool calls for a chat model
//! - `wiring`: wiring hints for filled slot pairs
//!
//! # Examples
//!
//! ```bash
//! quadcalc set frame --preset frame-5in-freestyle
//! quadcalc set motors --file my_motor.json
//! quadcalc check
//! quadcalc builds save --name "Freestyle 5"
//! quadcalc export --format csv
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: entity model, build store, metrics and compatibility engine
//! - [`plugins`]: persistence-backed features and collaborator surfaces

pub mod core;
pub mod plugins;

use crate::core::category::{self, Category};
use crate::core::compat::{CategoryStatus, Severity};
use crate::core::component::Component;
use crate::core::config;
use crate::core::db::SqliteKv;
use crate::core::error;
use crate::core::output::{OutputFormat, format_currency, format_flight_time, format_twr, format_weight};
use crate::core::store::BuildStore;
use crate::core::time::SystemClock;
use plugins::{assistant, export, presets, saved_builds, wiring};

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "quadcalc",
    version = env!("CARGO_PKG_VERSION"),
    about = "Plan an FPV quadcopter build and check part compatibility"
)]
struct Cli {
    /// Directory holding quadcalc.db and quadcalc.toml.
    #[clap(long, global = true, default_value = ".quadcalc")]
    data_dir: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct FormatArgs {
    #[clap(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(clap::Args, Debug)]
struct SetCli {
    /// Category key, e.g. `frame` or `vtxAntenna`.
    category: String,
    /// Stock or custom preset id.
    #[clap(long, conflicts_with = "file", required_unless_present = "file")]
    preset: Option<String>,
    /// Component JSON file.
    #[clap(long)]
    file: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct CheckCli {
    #[clap(long, value_enum, default_value = "text")]
    format: OutputFormat,
    /// Fail when any error-severity alert fires.
    #[clap(long)]
    strict: bool,
}

#[derive(clap::Args, Debug)]
struct SchemaCli {
    /// Optional: filter by subsystem name
    #[clap(long)]
    subsystem: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current build, metrics and alerts
    #[clap(name = "show", visible_alias = "s")]
    Show(FormatArgs),

    /// Put a component into a slot
    #[clap(name = "set")]
    Set(SetCli),

    /// Empty a slot
    #[clap(name = "clear")]
    Clear {
        category: String,
    },

    /// Empty every slot and reset the build name
    #[clap(name = "reset")]
    Reset,

    /// Rename the current build
    #[clap(name = "rename")]
    Rename {
        name: String,
    },

    /// Run the compatibility rules
    #[clap(name = "check", visible_alias = "c")]
    Check(CheckCli),

    /// Saved builds
    #[clap(name = "builds", visible_alias = "b")]
    Builds(saved_builds::BuildsCli),

    /// Write the build to a file
    #[clap(name = "export")]
    Export(export::ExportCli),

    /// Load a build document
    #[clap(name = "import")]
    Import(export::ImportCli),

    /// Stock and custom presets
    #[clap(name = "presets", visible_alias = "p")]
    Presets(presets::PresetsCli),

    /// Print the plain-text build summary used as assistant context
    #[clap(name = "context")]
    Context,

    /// Apply an assistant tool call from a JSON file
    #[clap(name = "tool")]
    Tool {
        path: PathBuf,
    },

    /// Print command and storage schemas
    #[clap(name = "schema")]
    Schema(SchemaCli),
}

pub fn run() -> Result<(), error::QuadcalcError> {
    let cli = Cli::parse();

    if let Command::Schema(schema_cli) = &cli.command {
        print_schema(schema_cli.subsystem.as_deref())?;
        return Ok(());
    }

    let config = config::load_config(&cli.data_dir)?;
    let kv = SqliteKv::open(&cli.data_dir)?;
    tracing::debug!("Using {}", kv.path().display());
    let mut store = BuildStore::new(Box::new(kv), Box::new(SystemClock), config);

    let result = dispatch(&mut store, cli.command);
    // Persist whatever the command changed, even if it failed part-way.
    store.flush_autosave();
    result
}

fn dispatch(store: &mut BuildStore, command: Command) -> Result<(), error::QuadcalcError> {
    match command {
        Command::Show(args) => show(store, args.format)?,
        Command::Set(set_cli) => set(store, set_cli)?,
        Command::Clear { category } => {
            let slot = store.clear_component_by_key(&category);
            println!("Cleared {}", slot_label(slot.as_str()));
        }
        Command::Reset => {
            store.clear_all();
            println!("Build reset");
        }
        Command::Rename { name } => {
            store.set_name(name);
            println!("Renamed to '{}'", store.name());
        }
        Command::Check(check_cli) => check(store, check_cli)?,
        Command::Builds(builds_cli) => saved_builds::run_builds_cli(store, builds_cli)?,
        Command::Export(export_cli) => export::run_export_cli(store, export_cli)?,
        Command::Import(import_cli) => export::run_import_cli(store, import_cli)?,
        Command::Presets(presets_cli) => presets::run_presets_cli(store, presets_cli)?,
        Command::Context => println!("{}", assistant::build_context(store)),
        Command::Tool { path } => {
            let raw = fs::read_to_string(&path)?;
            let note = assistant::apply_tool_call_json(store, &raw);
            println!("{}", serde_json::to_string(&note)?);
            if !note.ok {
                return Err(error::QuadcalcError::ValidationError(note.message));
            }
        }
        Command::Schema(schema_cli) => print_schema(schema_cli.subsystem.as_deref())?,
    }
    Ok(())
}

fn slot_label(key: &str) -> String {
    category::label_for(key)
        .map(str::to_string)
        .unwrap_or_else(|| key.to_string())
}

fn set(store: &mut BuildStore, set_cli: SetCli) -> Result<(), error::QuadcalcError> {
    let component = match (&set_cli.preset, &set_cli.file) {
        (Some(id), _) => {
            let category: Category = set_cli
                .category
                .parse()
                .map_err(error::QuadcalcError::ValidationError)?;
            presets::find_preset(store.kv(), category, id).ok_or_else(|| {
                error::QuadcalcError::NotFound(format!("preset '{}' in {}", id, category))
            })?
        }
        (None, Some(path)) => {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str::<Component>(&raw)?
        }
        (None, None) => {
            return Err(error::QuadcalcError::ValidationError(
                "one of --preset or --file is required".to_string(),
            ));
        }
    };
    let slot = store.set_component_by_key(&set_cli.category, &component);
    if Category::from_key(slot.as_str()).is_none() {
        eprintln!(
            "{} '{}' is not a registered category; stored but never checked",
            "warning:".yellow().bold(),
            slot.as_str()
        );
    }
    println!("{}: {}", slot_label(slot.as_str()), component.name);
    Ok(())
}

fn status_marker(status: CategoryStatus) -> colored::ColoredString {
    match status {
        CategoryStatus::Empty => "·".dimmed(),
        CategoryStatus::Ok => "✓".green(),
        CategoryStatus::Warning => "!".yellow().bold(),
        CategoryStatus::Error => "✗".red().bold(),
    }
}

fn severity_tag(severity: Severity) -> colored::ColoredString {
    let tag = format!("[{}]", severity.as_str().to_uppercase());
    match severity {
        Severity::Error => tag.red().bold(),
        Severity::Warning => tag.yellow().bold(),
        Severity::Info => tag.cyan(),
    }
}

fn show(store: &BuildStore, format: OutputFormat) -> Result<(), error::QuadcalcError> {
    let evaluation = store.evaluation();
    let metrics = store.metrics();
    let hints = wiring::hints_for(store.components());

    if format == OutputFormat::Json {
        let statuses: serde_json::Map<String, serde_json::Value> = Category::ALL
            .iter()
            .map(|c| {
                let status = crate::core::compat::engine::status_from_alerts(
                    store.components(),
                    &evaluation.alerts,
                    *c,
                );
                (c.key().to_string(), serde_json::json!(status))
            })
            .collect();
        let out = serde_json::json!({
            "name": store.name(),
            "components": store.components(),
            "metrics": metrics,
            "compatibilityScore": evaluation.score(),
            "alerts": evaluation.alerts,
            "status": statuses,
            "wiring": hints,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", store.name().bold().underline());
    for c in Category::ALL {
        let status =
            crate::core::compat::engine::status_from_alerts(store.components(), &evaluation.alerts, c);
        match store.get(c) {
            Some(comp) => println!(
                "  {} {:<18} {:<32} {:>8} {:>9}",
                status_marker(status),
                c.label(),
                comp.name,
                format_currency(comp.cost),
                format_weight(comp.weight)
            ),
            None => println!(
                "  {} {:<18} {}",
                status_marker(status),
                c.label(),
                "(not selected)".dimmed()
            ),
        }
    }
    println!();
    println!(
        "  Parts {} / {}   Cost {}   Weight {}   TWR {}   Flight {}",
        metrics.filled_count,
        metrics.slot_count,
        format_currency(Some(metrics.total_cost)),
        format_weight(Some(metrics.total_weight)),
        format_twr(metrics.thrust_to_weight_ratio),
        format_flight_time(metrics.estimated_flight_time)
    );
    println!("  Compatibility {}%", evaluation.score());
    for alert in &evaluation.alerts {
        println!("  {} {}: {}", severity_tag(alert.severity), alert.name, alert.message);
    }
    if !hints.is_empty() {
        println!();
        println!("{}", "Wiring".bold());
        for h in hints {
            println!(
                "  {} + {}: {}",
                h.categories[0].label(),
                h.categories[1].label(),
                h.hint
            );
        }
    }
    Ok(())
}

fn check(store: &BuildStore, check_cli: CheckCli) -> Result<(), error::QuadcalcError> {
    let evaluation = store.evaluation();
    match check_cli.format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "compatibilityScore": evaluation.score(),
                "applicable": evaluation.applicable,
                "passing": evaluation.passing,
                "alerts": evaluation.alerts,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!(
                "Compatibility {}% ({} of {} applicable rules pass)",
                evaluation.score(),
                evaluation.passing,
                evaluation.applicable
            );
            for alert in &evaluation.alerts {
                println!("{} {}: {}", severity_tag(alert.severity), alert.name, alert.message);
                println!("    {}", alert.explanation.dimmed());
            }
        }
    }
    let errors = evaluation
        .alerts
        .iter()
        .filter(|a| a.severity == Severity::Error)
        .count();
    if check_cli.strict && errors > 0 {
        return Err(error::QuadcalcError::ValidationError(format!(
            "{} compatibility error(s)",
            errors
        )));
    }
    Ok(())
}

fn print_schema(subsystem: Option<&str>) -> Result<(), error::QuadcalcError> {
    let mut schemas = std::collections::BTreeMap::new();
    schemas.insert("builds", saved_builds::schema());
    schemas.insert("presets", presets::schema());
    schemas.insert("export", export::schema());
    schemas.insert("assistant", assistant::schema());
    schemas.insert("store", crate::core::store::schema());

    let output = match subsystem {
        Some(sub) => schemas
            .get(sub)
            .cloned()
            .ok_or_else(|| error::QuadcalcError::NotFound(format!("subsystem '{}'", sub)))?,
        None => serde_json::json!({
            "schema_version": "1.0.0",
            "categories": category::registry(),
            "subsystems": schemas,
        }),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
