use cli::shell::{self, Command};
use memdev::{Config, Transport, UnitTable};
use std::io::{self, BufRead, Write};
use tracing::info;

fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => Ok(Config::from_json(&std::fs::read(path)?)?),
        None => Ok(Config::from_env()?),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = load_config()?;
    let transport = Transport::new(UnitTable::new(&config)?);
    info!(units = ?transport.table().names(), "units ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        match shell::parse(&line?) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => writeln!(stdout, "{}", shell::execute(&transport, &command))?,
            Ok(None) => {}
            Err(e) => writeln!(stdout, "error: {e}")?,
        }
    }

    info!("shutting down");
    Ok(())
}
