//! gazette CLI - official-gazette structure recovery tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use gazette::events::Verbosity;
use gazette::pipeline::ISSUE_TEXT_FILE;
use gazette::{
    parse_publication_date, pdf_name_for, render, save_bundle, Bundle, ExtractedText,
    HeaderPurity, JsonFormat, OrphanPolicy, Pipeline, PipelineOptions, RunRequest, TypePosition,
};

#[derive(Parser)]
#[command(name = "gazette")]
#[command(version)]
#[command(about = "Split official-gazette text into linked per-document records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Link the Sumário and body of one text file
    Link {
        /// Input text file, one line per source line
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputKind,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// PDF name used in doc ids (derived from the path if not specified)
        #[arg(long)]
        pdf_name: Option<String>,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Process every `<stem>/completo.txt` under an input root
    Extract {
        /// Directory holding one folder per issue
        #[arg(long, env = "GAZETTE_INPUT_ROOT", default_value = "output")]
        input_root: PathBuf,

        /// Directory bundles are written to
        #[arg(long, env = "GAZETTE_OUTPUT_ROOT", default_value = "extracted")]
        output_root: PathBuf,

        /// Process issues one at a time
        #[arg(long)]
        sequential: bool,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct PolicyArgs {
    /// What to do with body documents the Sumário does not list
    #[arg(long, value_enum, env = "GAZETTE_ORPHANS", default_value = "drop")]
    orphans: OrphanMode,

    /// Whether text after a header's type/number/year disqualifies it
    #[arg(long, value_enum, env = "GAZETTE_HEADER_PURITY", default_value = "loose")]
    header_purity: PurityMode,

    /// Where the document type must appear on an item or header line
    #[arg(long, value_enum, env = "GAZETTE_TYPE_POSITION", default_value = "leading")]
    type_position: PositionMode,

    /// Maximum title lines captured per Sumário item
    #[arg(long, value_name = "LINES")]
    title_cap: Option<usize>,

    /// Issue publication date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    publication_date: Option<String>,

    /// Pipeline event level
    #[arg(long, value_enum, env = "GAZETTE_EVENTS", default_value = "info")]
    events: EventLevel,
}

impl PolicyArgs {
    fn options(&self) -> PipelineOptions {
        PipelineOptions::new()
            .with_orphans(self.orphans.into())
            .with_header_purity(self.header_purity.into())
            .with_type_position(self.type_position.into())
            .with_title_line_cap(self.title_cap)
            .with_verbosity(self.events.into())
    }

    fn publication_date(&self) -> gazette::Result<Option<chrono::NaiveDate>> {
        self.publication_date
            .as_deref()
            .map(parse_publication_date)
            .transpose()
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    /// Bundle JSON
    Json,
    /// Human-readable report
    Text,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OrphanMode {
    /// Drop them
    Drop,
    /// Keep them as fallback docs
    Fallback,
}

impl From<OrphanMode> for OrphanPolicy {
    fn from(mode: OrphanMode) -> Self {
        match mode {
            OrphanMode::Drop => OrphanPolicy::Drop,
            OrphanMode::Fallback => OrphanPolicy::Fallback,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PurityMode {
    /// Any trailing text is allowed
    Loose,
    /// Only punctuation may follow
    Strict,
}

impl From<PurityMode> for HeaderPurity {
    fn from(mode: PurityMode) -> Self {
        match mode {
            PurityMode::Loose => HeaderPurity::Loose,
            PurityMode::Strict => HeaderPurity::Strict,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PositionMode {
    /// First content on the line
    Leading,
    /// Anywhere on the line
    Anywhere,
}

impl From<PositionMode> for TypePosition {
    fn from(mode: PositionMode) -> Self {
        match mode {
            PositionMode::Leading => TypePosition::Leading,
            PositionMode::Anywhere => TypePosition::Anywhere,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum EventLevel {
    /// No events
    Quiet,
    /// Run summaries and warnings
    Info,
    /// Every item, slice and link
    Debug,
}

impl From<EventLevel> for Verbosity {
    fn from(level: EventLevel) -> Self {
        match level {
            EventLevel::Quiet => Verbosity::Quiet,
            EventLevel::Info => Verbosity::Info,
            EventLevel::Debug => Verbosity::Debug,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Link {
            input,
            output,
            format,
            compact,
            pdf_name,
            policy,
        }) => cmd_link(
            &input,
            output.as_deref(),
            format,
            compact,
            pdf_name,
            &policy,
        ),
        Some(Commands::Extract {
            input_root,
            output_root,
            sequential,
            policy,
        }) => cmd_extract(&input_root, &output_root, sequential, &policy),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: gazette <COMMAND>".yellow());
            println!("       gazette --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_link(
    input: &Path,
    output: Option<&Path>,
    format: OutputKind,
    compact: bool,
    pdf_name: Option<String>,
    policy: &PolicyArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = Pipeline::new().with_options(policy.options());
    let text = ExtractedText::read(input)?;
    let pdf_name = pdf_name.unwrap_or_else(|| pdf_name_for(input));
    let bundle = pipeline.run(
        &text,
        &pdf_name,
        &input.to_string_lossy(),
        policy.publication_date()?,
    )?;

    report_issues(&bundle);

    let rendered = match format {
        OutputKind::Json if compact => render::to_json(&bundle, JsonFormat::Compact)?,
        OutputKind::Json => render::to_json(&bundle, JsonFormat::Pretty)?,
        OutputKind::Text => render::to_text(&bundle),
    };

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn cmd_extract(
    input_root: &Path,
    output_root: &Path,
    sequential: bool,
    policy: &PolicyArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_root)?;

    let mut issue_dirs: Vec<PathBuf> = fs::read_dir(input_root)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_dir() && p.join(ISSUE_TEXT_FILE).is_file())
        .collect();
    issue_dirs.sort();
    log::debug!("Found {} issue folders", issue_dirs.len());

    if issue_dirs.is_empty() {
        println!(
            "{} no */{} under {}",
            "Nothing to do:".yellow(),
            ISSUE_TEXT_FILE,
            input_root.display()
        );
        return Ok(());
    }

    let publication_date = policy.publication_date()?;
    let mut failed = 0usize;
    let mut requests = Vec::with_capacity(issue_dirs.len());
    for dir in &issue_dirs {
        match RunRequest::from_issue_dir(dir) {
            Ok(request) => requests.push(request.with_publication_date(publication_date)),
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", "Skipped".red(), dir.display(), e);
            }
        }
    }

    let pb = ProgressBar::new(requests.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    pb.set_message("Linking...");
    let options = policy.options().with_parallel(!sequential);
    let results = Pipeline::new().with_options(options).run_batch(&requests);

    let mut processed = 0usize;
    for (request, result) in requests.iter().zip(results) {
        pb.set_message(request.pdf_name.clone());
        match result {
            Ok(bundle) => {
                pb.suspend(|| report_issues(&bundle));
                match save_bundle(&bundle, output_root) {
                    Ok(_) => processed += 1,
                    Err(e) => {
                        failed += 1;
                        pb.suspend(|| {
                            eprintln!("{} {}: {}", "Save failed".red(), request.pdf_name, e)
                        });
                    }
                }
            }
            Err(e) => {
                failed += 1;
                pb.suspend(|| eprintln!("{} {}: {}", "Failed".red(), request.pdf_name, e));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} issues into {}",
        "Processed".green().bold(),
        processed,
        output_root.display()
    );
    if failed > 0 {
        return Err(format!("{} issues failed", failed).into());
    }
    Ok(())
}

fn report_issues(bundle: &Bundle) {
    let issues = bundle.validate();
    if !issues.is_empty() {
        eprintln!(
            "{} [{}] {}",
            "Warnings".yellow(),
            bundle.pdf_name,
            issues.join("; ")
        );
    }
}

fn cmd_version() {
    println!("{} {}", "gazette".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Official-gazette structure recovery tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUE: &str = "Sumário\n\
        CÂMARA MUNICIPAL DE LISBOA\n\
        Despacho 10/2025\n\
        texto.\n\
        \n\
        CÂMARA MUNICIPAL DE LISBOA\n\
        Despacho 10/2025\n\
        corpo do despacho.";

    fn policy() -> PolicyArgs {
        PolicyArgs {
            orphans: OrphanMode::Drop,
            header_purity: PurityMode::Loose,
            type_position: PositionMode::Leading,
            title_cap: None,
            publication_date: Some("2025-01-02".to_string()),
            events: EventLevel::Quiet,
        }
    }

    #[test]
    fn test_extract_writes_bundles() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let issue = input.path().join("dr-2025-001");
        fs::create_dir_all(&issue).unwrap();
        fs::write(issue.join(ISSUE_TEXT_FILE), ISSUE).unwrap();
        fs::create_dir_all(input.path().join("sem-texto")).unwrap();

        cmd_extract(input.path(), output.path(), true, &policy()).unwrap();

        let bundle = gazette::load_bundle(output.path().join("dr-2025-001")).unwrap();
        assert_eq!(bundle.docs[0].id, "despacho-10-2025@dr-2025-001.pdf");
        assert!(output
            .path()
            .join("dr-2025-001/docs/0001-despacho.txt")
            .is_file());
        assert!(!output.path().join("sem-texto").exists());
    }

    #[test]
    fn test_extract_continues_after_save_failure() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        for stem in ["dr-2025-001", "dr-2025-002"] {
            let issue = input.path().join(stem);
            fs::create_dir_all(&issue).unwrap();
            fs::write(issue.join(ISSUE_TEXT_FILE), ISSUE).unwrap();
        }
        // A plain file where the first bundle directory should go.
        fs::write(output.path().join("dr-2025-001"), "").unwrap();

        let err = cmd_extract(input.path(), output.path(), true, &policy()).unwrap_err();
        assert_eq!(err.to_string(), "1 issues failed");

        let bundle = gazette::load_bundle(output.path().join("dr-2025-002")).unwrap();
        assert_eq!(bundle.docs[0].id, "despacho-10-2025@dr-2025-002.pdf");
    }

    #[test]
    fn test_invalid_publication_date() {
        let mut args = policy();
        args.publication_date = Some("ontem".to_string());
        assert!(args.publication_date().is_err());
    }
}
