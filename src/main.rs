use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use colored::Colorize;

use pwsearch::assembler::assemble;
use pwsearch::batch_fetcher::BatchFetcher;
use pwsearch::browser;
use pwsearch::client::WikiClient;
use pwsearch::config::{CONFIG, Config};
use pwsearch::data_models::Identifier;
use pwsearch::render;

#[derive(Debug, Parser)]
#[command(name = "pwsearch", version, about = "Command-line search for PwnWiki")]
struct Cli {
    /// Maximum number of page lookups in flight
    #[arg(long, global = true, value_name = "N")]
    concurrency: Option<usize>,
    /// Per-request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,
    /// Wiki root URL (without /api.php)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    /// -v no longer prints the version as older pwsearch releases did; use -V/--version
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the wiki by keywords
    Search {
        #[arg(required = true)]
        keywords: Vec<String>,
        /// Maximum number of results to show
        #[arg(short = 'r', long = "max", visible_alias = "results", default_value_t = 20)]
        max: usize,
        /// Look up every hit and print a table of page details
        #[arg(long)]
        table: bool,
    },
    /// Open a page in the browser
    #[command(group(ArgGroup::new("page").required(true).args(["pageid", "title"])))]
    Open {
        #[arg(long)]
        pageid: Option<u64>,
        #[arg(long)]
        title: Option<String>,
        /// Print the page URL instead of launching a browser
        #[arg(long)]
        print: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> Config {
    let mut config = CONFIG.clone();
    if let Some(n) = cli.concurrency {
        config.max_concurrency = n;
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    config
}

async fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli);
    let client = WikiClient::new(&config).context("invalid configuration")?;

    match cli.command {
        Commands::Search {
            keywords,
            max,
            table,
        } => {
            let results = client
                .search(&keywords, max)
                .await
                .context("search failed")?;

            if results.is_empty() {
                render::print_no_results(&keywords);
                return Ok(());
            }

            if !table {
                render::print_search_results(&results, |title| client.canonical_url(title));
                return Ok(());
            }

            let ids: Vec<Identifier> = results
                .iter()
                .map(|r| Identifier::Title(r.title.clone()))
                .collect();
            let fetcher = BatchFetcher::new(&client, config.max_concurrency);
            let details = fetcher
                .fetch_many(&ids)
                .await
                .context("fetching page details failed")?;
            render::print_table(&assemble(&ids, &details));
        }
        Commands::Open {
            pageid,
            title,
            print,
        } => {
            let identifier = Identifier::from_parts(pageid, title)?;
            let detail = client
                .fetch_one(&identifier)
                .await
                .with_context(|| format!("could not look up page {identifier}"))?;

            if print {
                println!("{}", detail.canonical_url);
            } else {
                println!("Opening {} ({})", detail.plain_title.bold(), detail.canonical_url);
                browser::open_url(&detail.canonical_url)?;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_defaults_to_twenty_results() {
        let cli = Cli::try_parse_from(["pwsearch", "search", "log4j", "rce"]).unwrap();
        match cli.command {
            Commands::Search {
                keywords,
                max,
                table,
            } => {
                assert_eq!(keywords, vec!["log4j", "rce"]);
                assert_eq!(max, 20);
                assert!(!table);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn open_requires_exactly_one_identifier() {
        assert!(Cli::try_parse_from(["pwsearch", "open"]).is_err());
        assert!(
            Cli::try_parse_from(["pwsearch", "open", "--pageid", "3", "--title", "X"]).is_err()
        );
        assert!(Cli::try_parse_from(["pwsearch", "open", "--title", "X"]).is_ok());
    }

    #[test]
    fn verbose_help_points_to_version_flag() {
        let command = Cli::command();
        let verbose = command
            .get_arguments()
            .find(|a| a.get_id() == "verbose")
            .unwrap();
        let help = verbose.get_help().unwrap().to_string();
        assert!(help.contains("-V/--version"), "help was {help:?}");

        let err = Cli::try_parse_from(["pwsearch", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn global_flags_override_config() {
        let cli = Cli::try_parse_from([
            "pwsearch",
            "search",
            "xss",
            "--concurrency",
            "3",
            "--timeout",
            "2",
            "--base-url",
            "http://127.0.0.1:9",
        ])
        .unwrap();
        let config = resolve_config(&cli);
        assert_eq!(config.max_concurrency, 3);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.base_url, "http://127.0.0.1:9");
    }
}
