//! bible-reader CLI
//!
//! Reads a plain-text scripture compilation, lets you jump to a verse or
//! read on from where you stopped, and remembers your place between runs.

use anyhow::{Context, Result};
use bible_reader_core::{
    format_outline, format_verse, load_document, output::format_verse_ansi, Cursor, Document,
    LoadedDocument, NavigationError, NumberRemover, OutputFormat, ProgressStore, ReaderConfig,
    ReadingSession, RolloverPolicy,
};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Command line scripture reader
#[derive(Parser)]
#[command(name = "bible-reader")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read a plain-text bible verse by verse and resume where you left off")]
#[command(long_about = r#"
bible-reader: Plain-Text Scripture Reader

Loads a scripture text where a short line without digits names a book,
a line like "제1장" starts a chapter, and a line starting with a number
is a verse. Lines that fit none of these are ignored; verses that appear
before any book or chapter are skipped and reported.

Examples:
  bible-reader -d 개역개정.txt                   # Interactive menu
  bible-reader -d 개역개정.txt show 창세기 1 1     # Show one verse and save the position
  bible-reader -d 개역개정.txt next              # Continue from the saved position
  bible-reader -d 개역개정.txt outline -f summary
  bible-reader strip-numbers ./books --dry-run   # Preview removing "01_" prefixes
"#)]
pub struct Args {
    /// Subcommand to run (default: interactive menu)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Scripture text file (UTF-8)
    #[arg(short, long, global = true)]
    pub document: Option<PathBuf>,

    /// File holding the saved reading position
    #[arg(long, global = true)]
    pub progress: Option<PathBuf>,

    /// How "next" moves past the end of a chapter
    #[arg(long, value_enum, global = true)]
    pub rollover: Option<RolloverArg>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub plain: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Interactive menu: jump, next, save, quit
    Read,

    /// Show one verse and make it the current position
    Show {
        /// Book name, e.g. 창세기
        book: String,

        /// Chapter number
        chapter: u32,

        /// Verse number
        verse: u32,

        /// Do not save the position afterwards
        #[arg(long)]
        no_save: bool,
    },

    /// Show the verse after the saved position
    Next {
        /// Do not save the position afterwards
        #[arg(long)]
        no_save: bool,
    },

    /// Print the saved position
    Position,

    /// Print the structure of the document
    Outline {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Summary)]
        format: OutputFormatArg,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Strip leading numbers from file names in a directory
    StripNumbers {
        /// Directory to process
        dir: PathBuf,

        /// Only this file
        #[arg(long)]
        file: Option<String>,

        /// File name pattern
        #[arg(long, default_value = "*.txt")]
        pattern: String,

        /// Show what would be renamed without renaming
        #[arg(long)]
        dry_run: bool,
    },
}

/// Output format argument
#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Ansi,
    Summary,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Ansi => OutputFormat::Ansi,
            OutputFormatArg::Summary => OutputFormat::Summary,
        }
    }
}

/// Rollover policy argument
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum RolloverArg {
    Count,
    NextKey,
}

impl From<RolloverArg> for RolloverPolicy {
    fn from(arg: RolloverArg) -> Self {
        match arg {
            RolloverArg::Count => RolloverPolicy::Count,
            RolloverArg::NextKey => RolloverPolicy::NextKey,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let color = !args.plain && atty::is(atty::Stream::Stdout);
    if !color {
        colored::control::set_override(false);
    }

    match &args.command {
        Some(Commands::Read) | None => run_read(&args, color),
        Some(Commands::Show {
            book,
            chapter,
            verse,
            no_save,
        }) => run_show(&args, &Cursor::new(book.clone(), *chapter, *verse), *no_save, color),
        Some(Commands::Next { no_save }) => run_next(&args, *no_save, color),
        Some(Commands::Position) => {
            let config = build_config(&args)?;
            print_position(&config, &mut io::stdout())
        }
        Some(Commands::Outline { format, output }) => {
            run_outline(&args, format.clone().into(), output.as_deref())
        }
        Some(Commands::StripNumbers {
            dir,
            file,
            pattern,
            dry_run,
        }) => strip_numbers(dir, file.as_deref(), pattern, *dry_run, &mut io::stdout()),
    }
}

/// Log to stderr; RUST_LOG overrides the default level
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Build configuration from the config file and flags
fn build_config(args: &Args) -> Result<ReaderConfig> {
    let mut config = match &args.config {
        Some(path) => ReaderConfig::from_toml_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => ReaderConfig::default(),
    };

    if let Some(document) = &args.document {
        config = config.with_document(document.clone());
    }
    if let Some(progress) = &args.progress {
        config = config.with_progress_file(progress.clone());
    }
    if let Some(rollover) = args.rollover {
        config = config.with_rollover(rollover.into());
    }

    debug!(?config, "configuration");
    Ok(config)
}

/// Load the document, with a spinner when verbose
fn load(config: &ReaderConfig, verbose: bool) -> Result<LoadedDocument> {
    let spinner = if verbose && atty::is(atty::Stream::Stderr) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Invalid spinner template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Loading {}...", config.document.display()));
        Some(pb)
    } else {
        None
    };

    let loaded = load_document(config).context("Failed to load document")?;

    if let Some(ref pb) = spinner {
        pb.finish_with_message(format!(
            "Loaded {} books, {} verses in {}ms",
            loaded.document.book_count(),
            loaded.document.total_verses(),
            loaded.metadata.parse_duration_ms
        ));
    }

    if !loaded.diagnostics.is_empty() {
        eprintln!(
            "{}",
            format!(
                "{} line(s) skipped while parsing; run `outline` for details",
                loaded.diagnostics.len()
            )
            .yellow()
        );
    }

    Ok(loaded)
}

fn render_verse(cursor: &Cursor, text: &str, color: bool) -> String {
    if color {
        format_verse_ansi(cursor, text)
    } else {
        format_verse(cursor, text)
    }
}

fn open_session<'d>(document: &'d Document, config: &ReaderConfig) -> ReadingSession<'d> {
    ReadingSession::new(
        document,
        ProgressStore::new(&config.progress_file),
        config.rollover,
    )
}

fn run_read(args: &Args, color: bool) -> Result<()> {
    let config = build_config(args)?;
    let loaded = load(&config, args.verbose)?;
    let mut session = open_session(&loaded.document, &config);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    run_menu(&mut session, &mut input, &mut out, color)
}

/// Interactive menu loop; returns on "4" or end of input
fn run_menu<R: BufRead, W: Write>(
    session: &mut ReadingSession<'_>,
    input: &mut R,
    out: &mut W,
    color: bool,
) -> Result<()> {
    match session.restore() {
        Ok(Some(saved)) => {
            let when = saved
                .saved_at
                .map(|t| format!(" (saved {})", t.format("%Y-%m-%d %H:%M")))
                .unwrap_or_default();
            writeln!(out, "Last read: {}{}", saved.cursor.to_string().bold(), when)?;
        }
        Ok(None) => {}
        Err(e) => writeln!(out, "{} {}", "Could not restore position:".red(), e)?,
    }

    loop {
        writeln!(out, "\n{}", "=== Bible Reader ===".bold())?;
        writeln!(out, "1. Read a verse")?;
        writeln!(out, "2. Next verse")?;
        writeln!(out, "3. Save position")?;
        writeln!(out, "4. Quit")?;

        let Some(choice) = prompt(input, out, "\nSelect (1-4): ")? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                let Some(book) = prompt(input, out, "Book (e.g. 창세기): ")? else {
                    break;
                };
                let Some(chapter) = prompt_number(input, out, "Chapter: ")? else {
                    continue;
                };
                let Some(verse) = prompt_number(input, out, "Verse: ")? else {
                    continue;
                };
                match session.jump_to(&book, chapter, verse) {
                    Ok(text) => writeln!(out, "\n{}", render_verse(session.position(), text, color))?,
                    Err(e) => writeln!(out, "{}", e.to_string().red())?,
                }
            }
            "2" => match session.advance() {
                Ok(text) => writeln!(out, "\n{}", render_verse(session.position(), text, color))?,
                Err(NavigationError::EndOfBook { book, .. }) => {
                    writeln!(out, "{}", format!("That was the last verse of {}.", book).yellow())?
                }
                Err(e) => writeln!(out, "{}", e.to_string().red())?,
            },
            "3" => match session.save() {
                Ok(saved) => writeln!(out, "Position saved: {}", saved.cursor)?,
                Err(e) => writeln!(out, "{} {}", "Could not save position:".red(), e)?,
            },
            "4" => break,
            _ => writeln!(out, "Invalid choice, please pick 1-4.")?,
        }
    }

    writeln!(out, "Goodbye.")?;
    Ok(())
}

/// Print a prompt and read one trimmed line; `None` at end of input
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{}", label)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompt for a positive number; `None` on end of input or a bad number
fn prompt_number<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Option<u32>> {
    let Some(answer) = prompt(input, out, label)? else {
        return Ok(None);
    };
    match answer.parse::<u32>() {
        Ok(n) => Ok(Some(n)),
        Err(_) => {
            writeln!(out, "{}", format!("Not a number: {:?}", answer).red())?;
            Ok(None)
        }
    }
}

fn run_show(args: &Args, target: &Cursor, no_save: bool, color: bool) -> Result<()> {
    let config = build_config(args)?;
    let loaded = load(&config, args.verbose)?;
    show_verse(&loaded.document, &config, target, !no_save, color, &mut io::stdout())
}

/// Jump to `target`, print it and optionally save it as the position
fn show_verse<W: Write>(
    document: &Document,
    config: &ReaderConfig,
    target: &Cursor,
    save: bool,
    color: bool,
    out: &mut W,
) -> Result<()> {
    let mut session = open_session(document, config);

    let text = session.jump_to(&target.book, target.chapter, target.verse)?;
    writeln!(out, "{}", render_verse(session.position(), text, color))?;

    if save {
        session.save().context("Failed to save position")?;
    }
    Ok(())
}

fn run_next(args: &Args, no_save: bool, color: bool) -> Result<()> {
    let config = build_config(args)?;
    let loaded = load(&config, args.verbose)?;
    next_verse(&loaded.document, &config, !no_save, color, &mut io::stdout())
}

/// Advance from the saved position; fails when nothing is saved
fn next_verse<W: Write>(
    document: &Document,
    config: &ReaderConfig,
    save: bool,
    color: bool,
    out: &mut W,
) -> Result<()> {
    let mut session = open_session(document, config);

    if session
        .restore()
        .context("Failed to restore position")?
        .is_none()
    {
        anyhow::bail!(
            "No saved position in {}; start with `show BOOK CHAPTER VERSE`",
            config.progress_file.display()
        );
    }

    let text = session.advance()?;
    writeln!(out, "{}", render_verse(session.position(), text, color))?;

    if save {
        session.save().context("Failed to save position")?;
    }
    Ok(())
}

fn print_position<W: Write>(config: &ReaderConfig, out: &mut W) -> Result<()> {
    let store = ProgressStore::new(&config.progress_file);

    match store.load().context("Failed to read saved position")? {
        Some(saved) => {
            writeln!(out, "{}", saved.cursor)?;
            if let Some(at) = saved.saved_at {
                writeln!(out, "saved {}", at.format("%Y-%m-%d %H:%M:%S"))?;
            }
        }
        None => writeln!(out, "No saved position.")?,
    }
    Ok(())
}

fn run_outline(args: &Args, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let config = build_config(args)?;
    let loaded = load(&config, args.verbose)?;
    write_outline(&loaded, format, output, &mut io::stdout())
}

fn write_outline<W: Write>(
    loaded: &LoadedDocument,
    format: OutputFormat,
    path: Option<&Path>,
    out: &mut W,
) -> Result<()> {
    let rendered = format_outline(&loaded.outline(), format)?;
    write_output(&rendered, path, out)
}

/// Rename matching files; fails if any single rename failed
fn strip_numbers<W: Write>(
    dir: &Path,
    file: Option<&str>,
    pattern: &str,
    dry_run: bool,
    out: &mut W,
) -> Result<()> {
    let remover = NumberRemover::new(dir)?
        .with_pattern(pattern)?
        .with_dry_run(dry_run);

    let results = match file {
        Some(name) => vec![remover.process_file(name)],
        None => {
            if remover.list_files().is_empty() {
                writeln!(out, "No files matching {} in {}", pattern, dir.display())?;
                return Ok(());
            }
            remover.process_all()
        }
    };

    let mut failures = 0;
    for result in &results {
        match result {
            Ok(outcome) => writeln!(out, "{}{}", if dry_run { "[dry run] " } else { "" }, outcome)?,
            Err(e) => {
                failures += 1;
                eprintln!("{}", e.to_string().red());
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} file(s) could not be renamed", failures, results.len());
    }
    Ok(())
}

fn write_output<W: Write>(output: &str, path: Option<&Path>, out: &mut W) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, output).context("Failed to write output file")?;
    } else {
        writeln!(out, "{}", output)?;
    }
    Ok(())
}
