//! bbcanvas - Blackboard export to Canvas import planner

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bbcanvas::canvas::{
    BlackboardHtml, CanvasClient, CanvasConfig, CoursePages, DryRun, parse_course_ref,
};
use bbcanvas::import::Summary;
use bbcanvas::{
    Error, ImportConfig, ImportedManifest, ReportSink, Result, UnknownHandlerPolicy,
    import_and_report, to_xml,
};

#[derive(Parser)]
#[command(name = "bbcanvas")]
#[command(version, about = "Classify a Blackboard course export for import into Canvas", long_about = None)]
#[command(after_help = "EXAMPLES:
    bbcanvas ./export --dry-run                    Preview the annotated manifest
    bbcanvas ./export --format summary             Count items per Canvas type
    bbcanvas ./export --course https://school.instructure.com/courses/1127
                                                   Create document pages in course 1127")]
struct Cli {
    /// Directory holding the extracted export (imsmanifest.xml, res*.dat)
    #[arg(value_name = "WORKING_DIR")]
    working_dir: PathBuf,

    /// Canvas course id or course URL
    #[arg(short, long)]
    course: Option<String>,

    /// TOML file with import settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Canvas instance URL, e.g. https://school.instructure.com
    #[arg(long, env = "CANVAS_INSTANCE_URL")]
    canvas_url: Option<String>,

    /// Canvas API access token
    #[arg(long, env = "CANVAS_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Classify only; do not create pages in Canvas
    #[arg(long)]
    dry_run: bool,

    /// How to print the annotated manifest
    #[arg(short, long, value_enum, default_value_t = PreviewFormat::Xml)]
    format: PreviewFormat,

    /// What to do with unrecognized content handlers
    #[arg(long, value_enum)]
    unknown_handler: Option<UnknownHandlerPolicy>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PreviewFormat {
    Xml,
    Json,
    Summary,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut sink = TerminalSink {
        format: cli.format,
        config: ImportConfig::default(),
    };

    let (config, course_id, mut pages) = match prepare(&cli) {
        Ok(setup) => setup,
        Err(e) => {
            sink.report_error(&e);
            return ExitCode::FAILURE;
        }
    };
    sink.config = config.clone();

    if import_and_report(&config, &course_id, pages.as_mut(), &BlackboardHtml, &mut sink) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve settings and pick the page backend.
fn prepare(cli: &Cli) -> Result<(ImportConfig, String, Box<dyn CoursePages>)> {
    let mut config = match &cli.config {
        Some(path) => ImportConfig::from_file(path)?,
        None => ImportConfig::default(),
    };
    config.working_dir = cli.working_dir.clone();
    if let Some(policy) = cli.unknown_handler {
        config.unknown_handler = policy;
    }

    let course_id = cli.course.as_deref().map(parse_course_ref).transpose()?;

    let pages: Box<dyn CoursePages> = match (&cli.token, cli.dry_run) {
        (Some(token), false) => {
            if course_id.is_none() {
                return Err(Error::Config(
                    "--course is required to create pages in Canvas".to_string(),
                ));
            }
            let base_url = cli.canvas_url.clone().ok_or_else(|| {
                Error::Config("--canvas-url (or CANVAS_INSTANCE_URL) is required".to_string())
            })?;
            Box::new(CanvasClient::new(CanvasConfig::new(base_url, token.clone()))?)
        }
        _ => {
            info!("dry run: document pages will be built but not sent");
            Box::new(DryRun::new())
        }
    };

    Ok((
        config,
        course_id.unwrap_or_else(|| "preview".to_string()),
        pages,
    ))
}

struct TerminalSink {
    format: PreviewFormat,
    config: ImportConfig,
}

impl ReportSink for TerminalSink {
    fn fatal(&mut self, title: &str, lines: &[String]) {
        eprintln!("error: {title}");
        for line in lines {
            eprintln!("  {line}");
        }
    }

    fn preview(&mut self, manifest: &ImportedManifest) {
        match self.format {
            PreviewFormat::Xml => print!("{}", to_xml(&manifest.document)),
            PreviewFormat::Json => {
                let outline = manifest.outline(&self.config);
                match serde_json::to_string_pretty(&outline) {
                    Ok(json) => println!("{json}"),
                    Err(e) => eprintln!("error: could not serialize outline: {e}"),
                }
            }
            PreviewFormat::Summary => {
                let summary = Summary::from_outline(&manifest.outline(&self.config));
                println!("Items: {}", summary.total());
                for (ty, count) in &summary.by_type {
                    println!("  {:<14} {count}", ty.as_str());
                }
                if summary.unannotated > 0 {
                    println!("  {:<14} {}", "(unannotated)", summary.unannotated);
                }
                println!("Pages created: {}", manifest.pages_created);
            }
        }
    }
}
