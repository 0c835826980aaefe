//! lcgm-core - growth-mixture model evaluation CLI
//!
//! Loads a fitted parameter file and:
//! - Scores subjects into latent groups (posterior membership)
//! - Prints fitted and collapsed trajectories
//! - Validates parameter files and emits JSON Schemas

use clap::{Args, Parser, Subcommand};
use lcgm_config::{
    load_params, resolve_params_path, ConfigError, LoadedParams, CONFIG_SCHEMA_VERSION,
};
use lcgm_core::exit_codes::ExitCode;
use lcgm_core::log_event;
use lcgm_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogLevel, Stage,
};
use lcgm_core::output::{
    render_snapshot_summary, CollapseReport, CollapsedLine, OutputFormat, PosteriorReport,
    SubjectEntry, TrajectoryReport,
};
use lcgm_core::schema::{available_schemas, generate_all_schemas, generate_schema};
use lcgm_core::{Model, ModelError, SubjectRecord};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Evaluate fitted latent-class growth-mixture models
#[derive(Parser)]
#[command(name = "lcgm-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Parameter file (falls back to LCGM_PARAMS, LCGM_CONFIG_DIR, ~/.config/lcgm)
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Posterior group membership for each subject in a JSON file
    Posterior(PosteriorArgs),

    /// Fitted trajectory of one group and outcome
    Trajectory(TrajectoryArgs),

    /// Average group trajectories into super-groups
    Collapse(CollapseArgs),

    /// Load and validate the parameter file
    Check,

    /// Print JSON Schemas for inputs and outputs
    Schema(SchemaArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct PosteriorArgs {
    /// JSON file with one subject record or an array of them
    #[arg(long)]
    subjects: PathBuf,
}

#[derive(Args, Debug)]
struct TrajectoryArgs {
    /// Group index
    #[arg(long)]
    group: usize,

    /// Outcome index
    #[arg(long)]
    outcome: usize,
}

#[derive(Args, Debug)]
struct CollapseArgs {
    /// Outcome index
    #[arg(long)]
    outcome: usize,

    /// Groupings: members separated by ',', groupings by ';' (e.g. "0,1;2")
    #[arg(long, value_parser = parse_groupings)]
    groupings: Groupings,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// Type name (prints every schema when omitted)
    name: Option<String>,

    /// List available schema types
    #[arg(long)]
    list: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct Groupings(Vec<Vec<usize>>);

fn parse_groupings(raw: &str) -> Result<Groupings, String> {
    raw.split(';')
        .map(|grouping| {
            grouping
                .split(',')
                .map(str::trim)
                .filter(|member| !member.is_empty())
                .map(|member| {
                    member
                        .parse::<usize>()
                        .map_err(|e| format!("invalid group index '{member}': {e}"))
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Groupings)
}

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read subjects from {path}: {source}")]
    SubjectsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid subject JSON in {path}: {source}")]
    SubjectsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("unknown schema type '{0}' (see `lcgm-core schema --list`)")]
    UnknownSchema(String),

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{failed} of {total} subjects could not be scored")]
    SubjectsFailed { failed: usize, total: usize },
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Config(ConfigError::IoError { .. }) => ExitCode::IoError,
            CliError::Config(_) => ExitCode::ConfigError,
            CliError::SubjectsIo { .. } => ExitCode::IoError,
            CliError::SubjectsParse { .. } => ExitCode::InputError,
            CliError::Model(ModelError::InvalidParams(_)) => ExitCode::ConfigError,
            CliError::Model(ModelError::DegenerateLikelihood { .. }) => ExitCode::InputError,
            CliError::Model(_) => ExitCode::ArgsError,
            CliError::UnknownSchema(_) => ExitCode::ArgsError,
            CliError::Serialize(_) => ExitCode::InternalError,
            CliError::SubjectsFailed { .. } => ExitCode::InputError,
        }
    }
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version also arrive here, on stdout
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, None));

    let ctx = LogContext::new(generate_run_id());
    log_event!(ctx, DEBUG, event_names::RUN_STARTED, Stage::Init, "run started");

    let result = match &cli.command {
        Commands::Posterior(args) => run_posterior(&cli.global, &ctx, args),
        Commands::Trajectory(args) => run_trajectory(&cli.global, &ctx, args),
        Commands::Collapse(args) => run_collapse(&cli.global, &ctx, args),
        Commands::Check => run_check(&cli.global, &ctx),
        Commands::Schema(args) => run_schema(&cli.global, args),
        Commands::Version => print_version(&cli.global),
    };

    let exit_code = match result {
        Ok(()) => ExitCode::Clean,
        Err(err) => output_error(&cli.global, &ctx, &err),
    };
    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Report,
        "run finished",
        exit_code = exit_code.as_i32()
    );

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn load_model(global: &GlobalOpts, ctx: &LogContext) -> Result<(Model, LoadedParams), CliError> {
    let (path, source) =
        resolve_params_path(global.params.as_deref()).ok_or(ConfigError::Unresolved)?;
    let loaded = match load_params(&path, source) {
        Ok(loaded) => loaded,
        Err(err) => {
            log_event!(
                ctx,
                ERROR,
                event_names::PARAMS_INVALID,
                Stage::Load,
                err.to_string(),
                path = tracing::field::display(path.display())
            );
            return Err(err.into());
        }
    };
    let model = Model::from_document(&loaded.document)?;

    log_event!(
        ctx,
        INFO,
        event_names::PARAMS_LOADED,
        Stage::Load,
        "parameters loaded",
        source = tracing::field::display(source),
        params_hash = loaded.snapshot.short_id(),
        n_groups = model.n_groups(),
        n_outcomes = model.n_outcomes()
    );
    Ok((model, loaded))
}

fn read_subjects(path: &Path) -> Result<Vec<SubjectRecord>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::SubjectsIo {
        path: path.to_path_buf(),
        source: e,
    })?;
    let parse_err = |e: serde_json::Error| CliError::SubjectsParse {
        path: path.to_path_buf(),
        source: e,
    };
    let value: serde_json::Value = serde_json::from_str(&content).map_err(parse_err)?;
    if value.is_array() {
        serde_json::from_value(value).map_err(parse_err)
    } else {
        serde_json::from_value(value)
            .map(|record| vec![record])
            .map_err(parse_err)
    }
}

fn run_posterior(global: &GlobalOpts, ctx: &LogContext, args: &PosteriorArgs) -> Result<(), CliError> {
    let (model, loaded) = load_model(global, ctx)?;
    let records = read_subjects(&args.subjects)?;

    let entries: Vec<SubjectEntry> = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let subject_ctx = ctx.with_subject_id(
                record
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("#{index}")),
            );
            let result = model.evaluate_subject(record);
            match &result {
                Ok(scored) => {
                    log_event!(
                        subject_ctx,
                        DEBUG,
                        event_names::SUBJECT_SCORED,
                        Stage::Posterior,
                        "subject scored",
                        modal_group = scored.result.modal_group,
                        overflow_guarded = scored.result.overflow_guarded
                    );
                }
                Err(err) => {
                    log_event!(
                        subject_ctx,
                        WARN,
                        event_names::SUBJECT_FAILED,
                        Stage::Posterior,
                        err.to_string(),
                        code = err.code()
                    );
                }
            }
            SubjectEntry::from_result(index, record.id.as_deref(), result)
        })
        .collect();

    let group_labels = (0..model.n_groups())
        .map(|g| model.params().group_label(g))
        .collect();
    let report = PosteriorReport::new(ctx.run_id.clone(), loaded.snapshot, group_labels, entries);

    match global.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Summary => println!("{}", report.render_summary()),
    }

    if report.failed > 0 {
        return Err(CliError::SubjectsFailed {
            failed: report.failed,
            total: report.subjects.len(),
        });
    }
    Ok(())
}

fn run_trajectory(global: &GlobalOpts, ctx: &LogContext, args: &TrajectoryArgs) -> Result<(), CliError> {
    let (model, _) = load_model(global, ctx)?;
    let values = model.fitted_trajectory(args.group, args.outcome)?;
    let report = TrajectoryReport {
        group: args.group,
        group_label: model.params().group_label(args.group),
        outcome: args.outcome,
        outcome_name: model.params().outcome_name(args.outcome),
        times: model.times().to_vec(),
        values,
    };

    match global.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Summary => println!("{}", report.render_summary()),
    }
    Ok(())
}

fn run_collapse(global: &GlobalOpts, ctx: &LogContext, args: &CollapseArgs) -> Result<(), CliError> {
    let (model, _) = load_model(global, ctx)?;
    let groupings = &args.groupings.0;
    let collapsed = model.collapsed_trajectories(args.outcome, groupings)?;
    let report = CollapseReport {
        outcome: args.outcome,
        outcome_name: model.params().outcome_name(args.outcome),
        times: model.times().to_vec(),
        lines: collapsed
            .into_iter()
            .map(|(grouping, values)| CollapsedLine {
                grouping,
                members: groupings[grouping].clone(),
                values,
            })
            .collect(),
    };

    match global.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Summary => println!("{}", report.render_summary()),
    }
    Ok(())
}

fn run_check(global: &GlobalOpts, ctx: &LogContext) -> Result<(), CliError> {
    let (_, loaded) = load_model(global, ctx)?;
    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "status": "valid",
            "run_id": ctx.run_id,
            "params": loaded.snapshot,
        }))?,
        OutputFormat::Summary => println!("{}", render_snapshot_summary(&loaded.snapshot)),
    }
    Ok(())
}

fn run_schema(global: &GlobalOpts, args: &SchemaArgs) -> Result<(), CliError> {
    if args.list {
        match global.format {
            OutputFormat::Json => {
                let list: Vec<_> = available_schemas()
                    .into_iter()
                    .map(|(name, description)| {
                        serde_json::json!({ "name": name, "description": description })
                    })
                    .collect();
                print_json(&list)?;
            }
            OutputFormat::Summary => {
                for (name, description) in available_schemas() {
                    println!("{name:<18} {description}");
                }
            }
        }
        return Ok(());
    }

    match &args.name {
        Some(name) => {
            let schema =
                generate_schema(name).ok_or_else(|| CliError::UnknownSchema(name.clone()))?;
            print_json(&schema)
        }
        None => print_json(&generate_all_schemas()),
    }
}

fn print_version(global: &GlobalOpts) -> Result<(), CliError> {
    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "lcgm_core_version": env!("CARGO_PKG_VERSION"),
            "params_schema_version": CONFIG_SCHEMA_VERSION,
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        })),
        OutputFormat::Summary => {
            println!("lcgm-core {}", env!("CARGO_PKG_VERSION"));
            println!("params schema version: {}", CONFIG_SCHEMA_VERSION);
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Report an error on stderr in the selected format.
fn output_error(global: &GlobalOpts, ctx: &LogContext, error: &CliError) -> ExitCode {
    let exit_code = error.exit_code();
    let detail_code = match error {
        CliError::Model(err) => Some(err.code()),
        CliError::Config(ConfigError::Validation(err)) => Some(err.code()),
        _ => None,
    };

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "status": "error",
                "run_id": ctx.run_id,
                "error": {
                    "exit_code": exit_code.as_i32(),
                    "code_name": exit_code.code_name(),
                    "code": detail_code,
                    "message": error.to_string(),
                }
            });
            match serde_json::to_string_pretty(&response) {
                Ok(text) => eprintln!("{text}"),
                Err(_) => eprintln!("error: {error}"),
            }
        }
        OutputFormat::Summary => eprintln!("[{}] error: {}", ctx.run_id, error),
    }

    exit_code
}
