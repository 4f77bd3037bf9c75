//! Analyze Command
//!
//! Snapshot a local checkout (or load a prepared profiler input), run the
//! assessment pipeline and emit the report.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::analyzer::SnapshotBuilder;
use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::pipeline::report::Report;
use crate::pipeline::{AssessmentPipeline, ChangeRequest, ProfilerInput};
use crate::types::{Result, ResultExt, SprintError, enum_to_str};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Summary,
}

impl std::str::FromStr for OutputFormat {
    type Err = SprintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "summary" | "text" => Ok(Self::Summary),
            other => Err(SprintError::InvalidInput(format!(
                "Invalid format '{}'. Valid values: json, summary",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Local checkout to snapshot
    pub path: Option<PathBuf>,
    /// Prepared profiler input (JSON) used instead of a checkout
    pub input: Option<PathBuf>,
    pub title: String,
    pub description: Option<String>,
    pub description_file: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub quiet: bool,
}

pub fn run(options: AnalyzeOptions) -> Result<()> {
    let config = ConfigLoader::resolve(options.config.as_deref())?;
    let input = load_input(&options, &config.analysis)?;

    let description = match (&options.description, &options.description_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context_fn(|| format!("reading description from {}", path.display()))?,
        (None, None) => String::new(),
    };
    let request = ChangeRequest::new(options.title.clone(), description);

    let report = AssessmentPipeline::new(&config).run(&input, &request.text());
    let out = output_for(&options);

    if let Some(path) = &options.output {
        write_json(&report, path)?;
        out.success(&format!("Report written to {}", path.display()));
    }

    match options.format {
        OutputFormat::Json if options.output.is_none() => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Json => {}
        OutputFormat::Summary => print_summary(&report, &out),
    }

    Ok(())
}

/// Console sink for status lines and the summary; `--quiet` silences both
fn output_for(options: &AnalyzeOptions) -> Output {
    Output::new().quiet(options.quiet)
}

fn load_input(options: &AnalyzeOptions, analysis: &crate::config::AnalysisConfig) -> Result<ProfilerInput> {
    if let Some(path) = &options.input {
        let raw = fs::read_to_string(path)?;
        let input: ProfilerInput = serde_json::from_str(&raw)?;
        info!(path = %path.display(), files = input.files.len(), "Loaded profiler input");
        return Ok(input);
    }

    let root = options
        .path
        .as_deref()
        .unwrap_or_else(|| Path::new("."));
    SnapshotBuilder::new(root).with_config(analysis).build()
}

fn write_json(report: &Report, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}

fn print_summary(report: &Report, out: &Output) {
    out.header("Change-Impact Assessment");
    out.field("Analysis", &report.analysis_id[..report.analysis_id.len().min(12)]);
    out.field("Project type", &report.project_type.to_string());
    out.field("Generated", &report.generated_at.to_rfc3339());

    for section in &report.sections {
        out.section(&format!("{}. {}", section.sequence, section.title));
        for paragraph in &section.content.paragraphs {
            out.paragraph(paragraph);
        }
        for table in &section.content.tables {
            out.table(table);
        }
        for diagram in &section.content.diagrams {
            out.info(&format!(
                "{} diagram: {} (see JSON output)",
                enum_to_str(&diagram.kind),
                diagram.title
            ));
        }
    }

    if report.has_diagnostics() {
        out.warning("Some stages recovered from internal faults; results are partial");
    }
}
