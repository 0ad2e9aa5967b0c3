use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use parc_core::{
    batch_search,
    config::Config,
    export::{self, ExportFormat, ExportSheet},
    headline, search, MatchMode, SearchOptions, TableProvider,
};
use parc_sources::open_source;

#[derive(Parser)]
#[command(name = "parc", about = "Parc lookup: HME ↔ RZB fleet codes, plates and serial numbers")]
struct Cli {
    /// Fleet table to load (xlsx, xlsm, xlsb, xls, ods, csv or txt).
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Worksheet name (workbooks only).
    #[arg(long, global = true)]
    sheet: Option<String>,

    /// Zero-based row holding the headers.
    #[arg(long, global = true)]
    header_row: Option<usize>,

    /// TUI: write debug logs to /tmp/parc-debug.log. Headless: log at debug level.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Interactive lookup (the default).
    Tui,
    /// Look up one query and print the matching rows.
    Lookup {
        /// Query words, joined with spaces.
        #[arg(required = true)]
        query: Vec<String>,
        /// Print `LABEL;VALUE` per result instead of the full rows.
        #[arg(long, conflicts_with = "format")]
        headline: bool,
        #[command(flatten)]
        opts: QueryArgs,
    },
    /// Look up every line of a file (or stdin with `-`).
    Batch {
        #[arg(default_value = "-")]
        file: PathBuf,
        #[command(flatten)]
        opts: QueryArgs,
    },
}

#[derive(Args)]
struct QueryArgs {
    /// Match whole fields instead of substrings.
    #[arg(long)]
    exact: bool,
    /// Also match serial numbers.
    #[arg(long)]
    serials: bool,
    #[arg(long, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,
}

impl QueryArgs {
    fn options(&self, config: &Config) -> SearchOptions {
        let mut options = config.search.options();
        if self.exact {
            options.mode = MatchMode::Exact;
        }
        options.include_serials |= self.serials;
        options
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let headless = matches!(cli.command, Some(Cmd::Lookup { .. } | Cmd::Batch { .. }));
    init_logging(cli.debug, headless)?;

    let mut config = Config::load().context("loading config")?;
    if let Some(path) = cli.source {
        config.source.path = path;
    }
    if let Some(sheet) = cli.sheet {
        config.source.sheet = sheet;
    }
    if let Some(row) = cli.header_row {
        config.source.header_row = row;
    }

    let source = open_source(&config.source)?;
    let source_path = source.path().to_path_buf();
    let provider = TableProvider::load(source)
        .with_context(|| format!("loading {}", source_path.display()))?;

    match cli.command.unwrap_or(Cmd::Tui) {
        Cmd::Tui => {
            parc_tui::run(config, provider, Some(&source_path))?;
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Lookup { query, headline, opts } => lookup(&config, &provider, &query.join(" "), headline, &opts),
        Cmd::Batch { file, opts } => batch(&config, &provider, &file, &opts),
    }
}

fn lookup(
    config: &Config,
    provider: &TableProvider,
    query: &str,
    as_headline: bool,
    opts: &QueryArgs,
) -> anyhow::Result<ExitCode> {
    let snapshot = provider.snapshot();
    let found = search(&snapshot.table, query, opts.options(config));
    if found.is_empty() {
        eprintln!("no result for {query:?}");
        return Ok(ExitCode::FAILURE);
    }

    let mut out = io::stdout().lock();
    if as_headline {
        let kind = config.classify.rules()?.classify(query);
        for record in &found {
            let h = headline(record, kind);
            writeln!(out, "{};{}", h.label, h.value)?;
        }
    } else {
        let sheet = ExportSheet::from_results(&snapshot.table, &found);
        export::write(&mut out, opts.format, &sheet)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn batch(
    config: &Config,
    provider: &TableProvider,
    file: &std::path::Path,
    opts: &QueryArgs,
) -> anyhow::Result<ExitCode> {
    let lines: Vec<String> = if file.as_os_str() == "-" {
        io::stdin().lock().lines().collect::<io::Result<_>>()?
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("reading {}", file.display()))?
            .lines()
            .map(str::to_string)
            .collect()
    };

    let snapshot = provider.snapshot();
    let outcome = batch_search(&snapshot.table, &lines, opts.options(config));
    let sheet = ExportSheet::from_batch(&snapshot.table, &outcome);
    export::write(io::stdout().lock(), opts.format, &sheet)?;

    if !outcome.not_found.is_empty() {
        eprintln!("not found ({}):", outcome.not_found.len());
        for item in &outcome.not_found {
            eprintln!("  {item}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn init_logging(debug: bool, headless: bool) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    if headless {
        let default = if debug { "debug" } else { "warn" };
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(
                EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(default)),
            )
            .init();
    } else if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/parc-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("parc debug log started, tail -f /tmp/parc-debug.log");
    }
    Ok(())
}
