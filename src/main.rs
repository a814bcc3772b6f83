//! tabclean - Clean and convert tabular data

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rustc_hash::FxHashSet;
use tracing::{debug, error, info};

use tabclean::clean::CleaningStep;
use tabclean::config::{Config, ExportFormat, ReportFormat};
use tabclean::output::{FileReport, FileStatus, JsonOutput, Status, TerminalOutput};
use tabclean::parser::UploadedFile;
use tabclean::session::Session;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliExportFormat {
    Csv,
    Excel,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(f: CliExportFormat) -> Self {
        match f {
            CliExportFormat::Csv => ExportFormat::Csv,
            CliExportFormat::Excel => ExportFormat::Excel,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliReportFormat {
    Terminal,
    Json,
}

impl From<CliReportFormat> for ReportFormat {
    fn from(f: CliReportFormat) -> Self {
        match f {
            CliReportFormat::Terminal => ReportFormat::Terminal,
            CliReportFormat::Json => ReportFormat::Json,
        }
    }
}

/// Clean and convert tabular data (CSV, Excel)
#[derive(Parser, Debug)]
#[command(name = "tabclean")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV or Excel files to process
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Remove exact-duplicate rows
    #[arg(long)]
    dedupe: bool,

    /// Fill missing numeric values with the column mean
    #[arg(long)]
    fill_missing: bool,

    /// Column(s) to keep, in order (comma-separated); default keeps all
    #[arg(short, long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// A column to keep, taken verbatim (repeatable; for names containing commas)
    #[arg(long = "column", value_name = "NAME", conflicts_with = "columns")]
    column: Vec<String>,

    /// Show a bar chart of the first two numeric columns
    #[arg(long)]
    chart: bool,

    /// Export format
    #[arg(short = 't', long = "to", value_enum, default_value = "csv")]
    format: CliExportFormat,

    /// Directory for exported files
    #[arg(short, long, default_value = "converted")]
    output_dir: PathBuf,

    /// Preview only, do not write exported files
    #[arg(long)]
    no_export: bool,

    /// Rows shown in each preview (0 disables previews)
    #[arg(long, default_value_t = 5)]
    preview_rows: usize,

    /// Report format on stdout
    #[arg(long, value_enum, default_value = "terminal")]
    report: CliReportFormat,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(all_ok) => {
            if all_ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1) // Some files failed
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Initialize the tracing subscriber; logs go to stderr.
/// A JSON report carries its own warnings and errors, so logging is off unless RUST_LOG asks.
fn init_logging(level: &str, quiet: bool, report: ReportFormat) {
    use tracing_subscriber::EnvFilter;

    let effective_level = match report {
        ReportFormat::Json => "off",
        ReportFormat::Terminal if quiet => "error",
        ReportFormat::Terminal => level,
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.quiet, cli.report.into());

    let mut config = Config::new(cli.files)
        .with_remove_duplicates(cli.dedupe)
        .with_fill_missing(cli.fill_missing)
        .with_show_chart(cli.chart)
        .with_format(cli.format.into())
        .with_output_dir(cli.output_dir)
        .with_no_export(cli.no_export)
        .with_preview_rows(cli.preview_rows)
        .with_report_format(cli.report.into());
    // `--columns ""` selects nothing
    if let Some(columns) = cli.columns {
        config = config.with_columns(columns.into_iter().filter(|c| !c.is_empty()).collect());
    } else if !cli.column.is_empty() {
        config = config.with_columns(cli.column);
    }

    if !config.no_export {
        std::fs::create_dir_all(&config.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                config.output_dir.display()
            )
        })?;
    }

    let mut terminal = match config.report_format {
        ReportFormat::Terminal => Some(TerminalOutput::new()),
        ReportFormat::Json => None,
    };

    let mut session = Session::new();
    let mut reports = Vec::with_capacity(config.inputs.len());
    let mut written = FxHashSet::default();

    // Each file stands alone: a failure is reported and the rest continue
    for path in &config.inputs {
        let report = match process_file(&mut session, path, &config, &mut written, terminal.as_mut()) {
            Ok(report) => report,
            Err(e) => {
                error!(file = %path.display(), "{:#}", e);
                if let Some(t) = terminal.as_mut() {
                    t.write_status(Status::Error, &format!("{}: {:#}", path.display(), e))?;
                }
                FileReport::failed(path.display().to_string(), e)
            }
        };
        reports.push(report);
    }

    if config.report_format == ReportFormat::Json {
        let mut stdout = std::io::stdout();
        JsonOutput::new().render(&reports, &mut stdout)?;
    }

    Ok(reports.iter().all(FileReport::is_ok))
}

fn process_file(
    session: &mut Session,
    path: &Path,
    config: &Config,
    written: &mut FxHashSet<PathBuf>,
    mut terminal: Option<&mut TerminalOutput>,
) -> Result<FileReport> {
    let upload = UploadedFile::from_path(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let name = upload.name.clone();

    let id = session.upload_with_options(upload, &config.file_options)?;
    let state = session
        .get(id)
        .context("uploaded file missing from session")?;
    let view = session.view(id)?;

    let preview_rows = config.preview_rows;

    if let Some(t) = terminal.as_deref_mut() {
        if !state.source().is_empty() {
            t.write_preview(&format!("{} - Preview", name), state.source(), preview_rows)?;
        }
        if let Some(warning) = state.warning() {
            t.write_status(Status::Warning, warning)?;
        }

        for step in state.steps() {
            let message = match step {
                CleaningStep::RemoveDuplicates => format!(
                    "Duplicates removed ({} rows)",
                    view.report.duplicates_removed
                ),
                CleaningStep::FillMissing => format!(
                    "Missing values filled with mean ({} cells)",
                    view.report.cells_filled()
                ),
            };
            t.write_status(Status::Success, &message)?;
        }
        if !state.steps().is_empty() {
            t.write_preview(&format!("{} - Cleaned", name), &view.cleaned, preview_rows)?;
        }

        if state.selection().is_some() {
            t.write_preview(&format!("{} - Selected Columns", name), &view.table, preview_rows)?;
        }

        if let Some(ref chart) = view.chart {
            t.write_title(&format!("{} - Chart", name))?;
            t.write_chart(chart)?;
        }
    }

    if state.show_chart() && view.chart.is_none() {
        debug!(file = %name, "no numeric columns to chart");
    }

    let mut report = FileReport {
        file: name.clone(),
        status: FileStatus::Ok,
        warning: state.warning().map(str::to_string),
        error: None,
        rows_in: state.source().row_count(),
        columns_in: state.source().column_count(),
        rows_out: view.table.row_count(),
        columns: view.table.column_names(),
        cleaning: (!view.report.steps.is_empty()).then(|| view.report.clone()),
        chart: view.chart.clone(),
        output: None,
        mime: None,
    };

    if !config.no_export {
        let artifact = session
            .export(id)
            .with_context(|| format!("Failed to export {}", name))?;
        let out_path = config.output_dir.join(artifact.file_name());

        if is_same_file(&out_path, path) {
            bail!(
                "Refusing to overwrite input file {} (choose another --output-dir)",
                path.display()
            );
        }

        // Inputs sharing a stem map to the same artifact name
        if written.contains(&out_path) {
            bail!(
                "Output {} was already written for an earlier input; not overwriting it",
                out_path.display()
            );
        }

        std::fs::write(&out_path, artifact.bytes())
            .with_context(|| format!("Failed to write {}", out_path.display()))?;
        written.insert(out_path.clone());
        info!(file = %name, output = %out_path.display(), "exported");

        if let Some(t) = terminal.as_deref_mut() {
            t.write_status(
                Status::Success,
                &format!(
                    "Processing complete for {} -> {} ({})",
                    name,
                    out_path.display(),
                    artifact.mime()
                ),
            )?;
        }

        report.output = Some(out_path.display().to_string());
        report.mime = Some(artifact.mime().to_string());
    }

    session.remove(id);

    Ok(report)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
