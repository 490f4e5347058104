/*!
# jdt-treegen CLI

Converts native Java syntax tree dumps (JSON) into canonical trees, exports
the entity type registry, and prints per-type statistics.
*/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

use jdt_treegen::cli_common::{self, OutputWriter, Statistics};
use jdt_treegen::{
    registry_table, CanonicalTree, EntityType, LineIndex, NativeDocument, OutputFormat, TreeGenConfig,
    TreeGenError, TreeGenerator,
};

#[derive(Parser)]
#[command(
    name = "jdt-treegen",
    version = env!("CARGO_PKG_VERSION"),
    about = "Canonical tree generator for structural diffing of Java sources"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert native tree dumps (files or directories of *.json)
    Convert {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file for a single input, output directory otherwise (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (json, text); overrides the config file
        #[arg(short = 'f', long)]
        format: Option<OutputFormat>,

        /// Path to a TOML or YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Export the entity type registry
    Types {
        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,
    },

    /// Per-type node counts of one converted unit
    Stats {
        input: PathBuf,

        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli_common::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Convert { inputs, output, format, config } => convert_command(&inputs, output.as_deref(), format, config.as_deref()),
        Commands::Types { format } => types_command(format),
        Commands::Stats { input, format } => stats_command(&input, format),
    }
}

fn convert_command(inputs: &[PathBuf], output: Option<&Path>, format: Option<OutputFormat>, config: Option<&Path>) -> Result<()> {
    let mut config = match config {
        Some(path) => TreeGenConfig::from_file(path)?,
        None => TreeGenConfig::default(),
    };
    if let Some(format) = format {
        config.output.format = format;
    }

    let files = cli_common::collect_json_inputs(inputs)?;
    if files.is_empty() {
        cli_common::print_warning("No native tree dumps found");
        return Ok(());
    }
    let single = files.len() == 1 && inputs.len() == 1 && inputs[0].is_file();
    if let (Some(dir), false) = (output, single) {
        cli_common::ensure_dir_exists(dir)?;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Failed to set progress style")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Converting {} file(s)...", files.len()));

    let start = Instant::now();
    let generator = TreeGenerator::new(config);
    let results = generator.generate_files(&files);
    pb.finish_and_clear();

    let mut failed = 0;
    let mut stdout = OutputWriter::stdout(generator.config().output.format).with_pretty(generator.config().output.pretty);
    for (path, result) in results {
        match result {
            Ok(tree) => {
                let rendered = render(&tree, generator.config())?;
                match output {
                    Some(out) if single => write_file(out, &rendered)?,
                    Some(dir) => write_file(&dir.join(output_name(&path, generator.config().output.format)), &rendered)?,
                    None => {
                        if files.len() > 1 && generator.config().output.format == OutputFormat::Text {
                            stdout.write_header(&path.display().to_string())?;
                        }
                        stdout.write_text(&rendered)?;
                    }
                }
            }
            Err(e) => {
                failed += 1;
                cli_common::print_error(&describe_failure(&path, &e));
            }
        }
    }
    stdout.flush()?;

    let elapsed = cli_common::format_duration(start.elapsed());
    info!("Conversion finished in {}", elapsed);
    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed to convert", failed, files.len());
    }
    cli_common::print_success(&format!("Converted {} file(s) in {}", files.len(), elapsed));
    Ok(())
}

fn render(tree: &CanonicalTree, config: &TreeGenConfig) -> Result<String> {
    let positions = config.output.include_positions;
    Ok(match config.output.format {
        OutputFormat::Text => tree.to_tree_string(positions),
        OutputFormat::Json => {
            let mut json = if config.output.pretty {
                serde_json::to_string_pretty(&tree.json(positions))?
            } else {
                serde_json::to_string(&tree.json(positions))?
            };
            json.push('\n');
            json
        }
    })
}

fn output_name(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("unit");
    match format {
        OutputFormat::Json => PathBuf::from(format!("{stem}.tree.json")),
        OutputFormat::Text => PathBuf::from(format!("{stem}.tree.txt")),
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// `path:line:col: message` when the error carries a source offset.
fn describe_failure(path: &Path, err: &TreeGenError) -> String {
    let location = err.offset().and_then(|offset| {
        let json = std::fs::read_to_string(path).ok()?;
        let doc: NativeDocument = serde_json::from_str(&json).ok()?;
        LineIndex::new(&doc.source).locate(offset)
    });
    match location {
        Some(lc) => format!("{}:{}: {}", path.display(), lc, err),
        None => format!("{}: {}", path.display(), err),
    }
}

fn types_command(format: OutputFormat) -> Result<()> {
    let mut out = OutputWriter::stdout(format).with_pretty(true);
    match format {
        OutputFormat::Json => out.write_object(&registry_table())?,
        OutputFormat::Text => {
            let rows = registry_table()
                .into_iter()
                .map(|e| vec![e.name, e.legacy_code.to_string(), e.is_valid_change.to_string()])
                .collect();
            out.write_table(&["name", "legacy_code", "valid_change"], rows)?;
        }
    }
    out.flush()
}

fn stats_command(input: &Path, format: OutputFormat) -> Result<()> {
    cli_common::validate_path(input, "Input")?;
    let start = Instant::now();
    let tree = TreeGenerator::default()
        .generate_file(input)
        .map_err(|e| anyhow::anyhow!(describe_failure(input, &e)))?;

    let mut categories: Vec<(String, usize)> = EntityType::ALL
        .iter()
        .zip(tree.type_histogram())
        .filter(|(_, count)| *count > 0)
        .map(|(t, count)| (t.name().to_string(), count))
        .collect();
    categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let stats = Statistics {
        total: tree.len(),
        synthetic: tree.synthetic_count(),
        categories,
        duration: Some(cli_common::format_duration(start.elapsed())),
    };
    let mut out = OutputWriter::stdout(format).with_pretty(true);
    stats.write(&mut out)?;
    out.flush()
}
