use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use usage_dashboard::config::Config;
use usage_dashboard::display::{self, format_number};
use usage_dashboard::{logging, server, UsageAnalyzer};

#[derive(Parser)]
#[command(name = "usage-dashboard")]
#[command(about = "Token usage dashboard for Codex and Claude session logs")]
#[command(version)]
struct Cli {
    /// Path to a config file (default: ./usage-dashboard.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard and the /recalc endpoint (default)
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,
        /// Bind port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Recalculate once and rewrite the dashboard file
    Recalc {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Print a usage report without touching the dashboard
    Report {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    fn json_output(&self) -> bool {
        match self {
            Commands::Serve { .. } => false,
            Commands::Recalc { json } | Commands::Report { json } => *json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    });
    let json = command.json_output();

    let mut config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => handle_error(e, json),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    let _log_guard = match logging::init_logging(&config.logging, &config.paths.log_directory) {
        Ok(guard) => guard,
        Err(e) => handle_error(e, json),
    };

    let result = match command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            match config.validate() {
                Ok(()) => server::serve(config).await,
                Err(e) => Err(e),
            }
        }
        Commands::Recalc { json } => run_recalc(config, json),
        Commands::Report { json } => {
            let analyzer = UsageAnalyzer::new(config.paths);
            let report = analyzer.build_report(Local::now().date_naive());
            display::print_report(&report, json);
            Ok(())
        }
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => handle_error(e, json),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_with_file(path),
        None => Config::load(),
    }
}

fn run_recalc(config: Config, json: bool) -> Result<()> {
    let analyzer = UsageAnalyzer::new(config.paths);
    let response = analyzer.recalc_dashboard(Local::now().date_naive())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!(
            "{} Dashboard updated: {} tokens YTD across {} days ({} sessions)",
            "✅".bright_green(),
            format_number(response.ytd_total_tokens).bright_green().bold(),
            response.days_with_usage.to_string().bright_white().bold(),
            response.sessions.to_string().bright_white()
        );
    }
    Ok(())
}

fn handle_error(e: anyhow::Error, json: bool) -> ! {
    if json {
        println!("{}", serde_json::json!({ "error": format!("{e:#}") }));
    } else {
        eprintln!("Error: {:#}", e);
    }
    process::exit(1);
}
