//! listing-picker: pick files from an HTML directory listing and pull them.

mod logging;
mod report;
mod sections;

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use engine_logging::{engine_error, engine_info};
use picker_core::{
    PickerConfig, RawOptions, OPT_FORMAT, OPT_IGNORE_LINK_PATHS, OPT_LOCAL, OPT_NO_ERROR,
    OPT_NO_PROXY, OPT_ORDER, OPT_PICK, OPT_URL, OPT_USE_TEXT,
};
use picker_engine::{
    FetchSettings, HttpRetriever, LogProgressSink, Picker, ReqwestFetcher, Retriever, RunContext,
    RunReport, Verbosity, WgetRetriever,
};

/// Pick files out of an HTML directory listing and download them.
#[derive(Parser, Debug)]
#[command(name = "listing-picker", version)]
struct Cli {
    /// More detail in the log
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Everything, including per-link traces
    #[arg(long, global = true)]
    debug: bool,

    /// Warnings and errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pick from one listing described by flags
    #[command(alias = "download")]
    Pull {
        #[command(flatten)]
        pick: PickArgs,
        #[command(flatten)]
        run: RunArgs,
    },

    /// Run the named sections of a RON file, in name order
    Sections {
        file: PathBuf,
        /// Run only this section (repeatable)
        #[arg(long)]
        only: Vec<String>,
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args, Debug)]
struct PickArgs {
    /// Directory listing to read
    #[arg(long)]
    url: String,
    /// Glob with {tag} fields, e.g. pkg-{version}.tar.gz
    #[arg(long)]
    format: Option<String>,
    /// <small->large|large->small>[:field,...]
    #[arg(long)]
    order: Option<String>,
    /// Pick directive such as first:1 or item:version=1.0 (repeatable)
    #[arg(long)]
    pick: Vec<String>,
    /// Match on the anchor text instead of the href
    #[arg(long)]
    use_text: bool,
    /// Match on the last path segment only
    #[arg(long)]
    ignore_link_paths: bool,
    /// Succeed even when nothing is picked
    #[arg(long)]
    no_error: bool,
    /// Ignore proxy settings from the environment
    #[arg(long)]
    no_proxy: bool,
    /// Directory to land the files in
    #[arg(long)]
    local: Option<PathBuf>,
}

impl PickArgs {
    fn to_options(&self) -> RawOptions {
        let mut options = RawOptions::new().with(OPT_URL, self.url.as_str());
        if let Some(format) = &self.format {
            options.set(OPT_FORMAT, format.as_str());
        }
        if let Some(order) = &self.order {
            options.set(OPT_ORDER, order.as_str());
        }
        if !self.pick.is_empty() {
            options.set(OPT_PICK, self.pick.join("\n"));
        }
        for (name, enabled) in [
            (OPT_USE_TEXT, self.use_text),
            (OPT_IGNORE_LINK_PATHS, self.ignore_link_paths),
            (OPT_NO_ERROR, self.no_error),
            (OPT_NO_PROXY, self.no_proxy),
        ] {
            if enabled {
                options.set(name, "True");
            }
        }
        if let Some(local) = &self.local {
            options.set(OPT_LOCAL, local.display().to_string());
        }
        options
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Download with wget instead of in-process
    #[arg(long)]
    wget: bool,
    /// Show what would be pulled without downloading
    #[arg(long)]
    dry_run: bool,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
    /// Output directory when no `local` option is given
    #[arg(long, default_value = "results")]
    results: PathBuf,
}

impl Cli {
    fn verbosity(&self) -> Verbosity {
        if self.debug {
            Verbosity::Debug
        } else if self.verbose {
            Verbosity::Verbose
        } else if self.quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(logging::level_for(cli.quiet, cli.verbose, cli.debug));

    match execute(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            engine_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every requested run succeeded.
async fn execute(cli: &Cli) -> Result<bool> {
    let verbosity = cli.verbosity();
    let mut stdout = io::stdout();

    match &cli.command {
        Command::Pull { pick, run } => {
            let report = pull(&pick.to_options(), run, verbosity).await?;
            if run.json {
                report::write_json(&mut stdout, &report)?;
            } else {
                report::write_lines(&mut stdout, &report)?;
            }
            Ok(true)
        }
        Command::Sections { file, only, run } => {
            let all = sections::load_sections(file)?;
            let selected = sections::select_sections(&all, only)?;

            let mut reports = BTreeMap::new();
            let mut failed = 0;
            for (name, options) in selected {
                engine_info!("[{}] starting", name);
                match pull(options, run, verbosity).await {
                    Ok(report) => {
                        if !run.json {
                            report::write_lines(&mut stdout, &report)?;
                        }
                        reports.insert(name.to_string(), report);
                    }
                    Err(err) => {
                        engine_error!("[{}] failed: {:#}", name, err);
                        failed += 1;
                    }
                }
            }
            if run.json {
                report::write_sections_json(&mut stdout, &reports)?;
            }
            if failed > 0 {
                engine_error!("{} section(s) failed", failed);
            }
            Ok(failed == 0)
        }
    }
}

async fn pull(options: &RawOptions, run: &RunArgs, verbosity: Verbosity) -> Result<RunReport> {
    let config = PickerConfig::from_options(options).context("invalid options")?;
    let use_proxy = config.use_proxy;
    let ctx = RunContext::new(config, &run.results).dry_run(run.dry_run);

    let fetcher = ReqwestFetcher::new(FetchSettings::default().with_proxy(use_proxy));
    let retriever: Box<dyn Retriever> = if run.wget {
        Box::new(WgetRetriever::new(use_proxy, verbosity))
    } else {
        Box::new(HttpRetriever::new(
            FetchSettings::for_downloads().with_proxy(use_proxy),
        ))
    };
    let sink = LogProgressSink;

    let report = Picker::new(&fetcher, &*retriever, &sink)
        .run(&ctx)
        .await?;
    Ok(report)
}
