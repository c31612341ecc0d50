use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sb_cli::commands::{categories, list, summary};
use sb_cli::{Cli, Commands, Config};
use sb_core::{QuerySpec, RecordSource, Session, SortKey};
use sb_ledger::{RpcLedger, SnapshotSource};

/// Opens the snapshot file when given, otherwise the configured RPC node.
fn open_source(cli: &Cli, config: &Config) -> Result<Box<dyn RecordSource>> {
    if let Some(path) = &cli.snapshot {
        let source = SnapshotSource::open(path)
            .with_context(|| format!("failed to open snapshot {}", path.display()))?;
        return Ok(Box::new(source));
    }

    let ledger = RpcLedger::new(
        config.rpc_url.clone(),
        &config.contract_address,
        config.request_timeout(),
    )
    .context("failed to create ledger client")?;
    Ok(Box::new(ledger))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let source = open_source(&cli, &config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let mut session = Session::new(config.session_config());
    let mut stdout = std::io::stdout().lock();

    match command {
        Commands::Categories { json } => {
            let names = runtime
                .block_on(source.list_categories())
                .context("failed to load categories from the ledger")?;
            categories::run(&mut stdout, &names, *json)?;
        }
        Commands::Summary { json } => {
            runtime
                .block_on(session.reload(&*source))
                .context("failed to load stakers data from the ledger")?;
            summary::run(&mut stdout, &session.summary(), *json)?;
        }
        Commands::List {
            category,
            min_days,
            sort,
            page,
            json,
        } => {
            let report = runtime
                .block_on(session.reload(&*source))
                .context("failed to load stakers data from the ledger")?;
            if !report.warnings.is_empty() {
                tracing::warn!(dropped = report.warnings.len(), "some staked items were skipped");
            }

            session.apply(QuerySpec {
                category: category.clone(),
                min_elapsed_days: *min_days,
                sort: SortKey::parse_or_default(sort),
            });
            session.go_to(*page);
            list::run(&mut stdout, &session.current_page(), session.spec(), *json)?;
        }
    }

    stdout.flush()?;
    Ok(())
}
