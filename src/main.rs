use anyhow::Context;
use clap::Parser;
use mysql_branching::cli::{dispatch_or_notice, Cli};
use mysql_branching::MySqlSession;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_tracing(level: Option<&str>) -> anyhow::Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).context("invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    init_tracing(cli.log_level.as_deref())?;

    // No URL means no session; the command reports that itself.
    let mut session = match cli.url.as_deref() {
        Some(url) => Some(
            MySqlSession::connect(url, Duration::from_secs(cli.connect_timeout))
                .context("failed to connect")?,
        ),
        None => None,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch_or_notice(&cli.command, session.as_mut(), cli.format, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
