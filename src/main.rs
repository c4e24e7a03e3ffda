//! Skein CLI - playbook DSL formatting, checking and projection

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use skein::ast::{Document, SUBPLAYBOOK_KINDS};
use skein::dsl::{normalize, parse, serialize};
use skein::error::FixSuggestion;
use skein::graph::{project, ViewMode};
use skein::layout::{auto_layout, JsonFileLayoutStore, LayoutStore, PositionMap};
use skein::resolver::{resolve_reference, FsCatalog};

#[derive(Parser)]
#[command(name = "skein")]
#[command(about = "Skein - playbook DSL sync tooling")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a playbook file to canonical text
    Fmt {
        /// Path to the playbook YAML file
        file: PathBuf,

        /// Rewrite the file in place instead of printing
        #[arg(short, long)]
        write: bool,
    },

    /// Parse a playbook and report structural problems
    Check {
        /// Path to the playbook YAML file
        file: PathBuf,

        /// Catalog root for resolving referenced playbooks
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// Project a playbook into a view and print it as JSON
    Graph {
        /// Path to the playbook YAML file
        file: PathBuf,

        /// View to derive: step-graph, flowchart or petri
        #[arg(short, long, default_value = "step-graph")]
        view: ViewMode,

        /// Layout file with stored positions
        #[arg(short, long)]
        layout: Option<PathBuf>,
    },

    /// Compute an auto layout and persist it to a layout file
    Layout {
        /// Path to the playbook YAML file
        file: PathBuf,

        /// Layout file to write positions into
        #[arg(short, long, default_value = "layout.json")]
        layout: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Fmt { file, write } => run_fmt(&file, write),
        Commands::Check { file, catalog } => run_check(&file, catalog.as_deref()),
        Commands::Graph { file, view, layout } => run_graph(&file, view, layout.as_deref()),
        Commands::Layout { file, layout } => run_layout(&file, &layout),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let Some(engine_err) = e.downcast_ref::<skein::EngineError>() {
                if let Some(suggestion) = engine_err.fix_suggestion() {
                    eprintln!("{} {}", "Hint:".yellow().bold(), suggestion);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn load_document(file: &std::path::Path) -> anyhow::Result<Document> {
    let text = fs::read_to_string(file)?;
    let mut document = parse(&text).map_err(skein::EngineError::from)?;
    normalize(&mut document);
    Ok(document)
}

fn run_fmt(file: &std::path::Path, write: bool) -> anyhow::Result<ExitCode> {
    let document = load_document(file)?;
    let text = serialize(&document).map_err(skein::EngineError::from)?;
    if write {
        fs::write(file, &text)?;
        eprintln!("{} {}", "Formatted".green().bold(), file.display());
    } else {
        print!("{text}");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_check(file: &std::path::Path, catalog: Option<&std::path::Path>) -> anyhow::Result<ExitCode> {
    let document = load_document(file)?;
    let mut warnings = 0usize;

    // Dangling arcs: reported, never pruned here
    for step in &document.workflow {
        for arc in step.arcs() {
            if document.step(&arc.step).is_none() {
                warnings += 1;
                println!(
                    "{} step '{}' has an arc to missing step '{}'",
                    "warning:".yellow().bold(),
                    step.step,
                    arc.step
                );
            }
        }
    }

    // Referenced playbooks, when a catalog root is given
    if let Some(root) = catalog {
        let checker = FsCatalog::scan(root);
        let current_path = document.layout_key().to_string();
        for step in &document.workflow {
            let tasks = step
                .tool
                .as_ref()
                .map(|t| t.to_kind_list())
                .unwrap_or_default();
            for task in tasks {
                if !SUBPLAYBOOK_KINDS.contains(&task.kind.as_str()) {
                    continue;
                }
                let Some(reference) = task
                    .extra
                    .get(serde_yaml::Value::from("path"))
                    .and_then(|v| v.as_str())
                else {
                    continue;
                };
                if resolve_reference(reference, &current_path, &checker).is_none() {
                    warnings += 1;
                    println!(
                        "{} step '{}' references playbook '{}' not found in catalog",
                        "warning:".yellow().bold(),
                        step.step,
                        reference
                    );
                }
            }
        }
    }

    println!(
        "{} {} steps, {} warnings",
        "Checked".green().bold(),
        document.workflow.len(),
        warnings
    );
    Ok(if warnings == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_graph(
    file: &std::path::Path,
    view: ViewMode,
    layout: Option<&std::path::Path>,
) -> anyhow::Result<ExitCode> {
    let document = load_document(file)?;
    let positions = layout
        .map(JsonFileLayoutStore::new)
        .and_then(|store| store.get(document.layout_key()))
        .unwrap_or_default();
    let graph = project(&document, &positions, view);
    println!("{}", serde_json::to_string_pretty(&graph)?);
    Ok(ExitCode::SUCCESS)
}

fn run_layout(file: &std::path::Path, layout: &std::path::Path) -> anyhow::Result<ExitCode> {
    let document = load_document(file)?;
    let positions: PositionMap = auto_layout(&document);
    let mut store = JsonFileLayoutStore::new(layout);
    store.set(document.layout_key(), &positions);
    eprintln!(
        "{} {} positions for '{}' into {}",
        "Wrote".green().bold(),
        positions.len(),
        document.layout_key(),
        layout.display()
    );
    Ok(ExitCode::SUCCESS)
}
