//! promptlift - rewrite UI-generation prompts against a style guide
//!
//! Uses a hosted model when an API key is configured and falls back to
//! local heuristics whenever the model can't deliver.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use promptlift_adapters::config::{setup_api_key_interactive, Config, API_KEY_ENV};
use promptlift_app::{logging, output, server, startup};
use promptlift_engine::Optimizer;
use std::io::{IsTerminal, Read};
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(
    name = "promptlift",
    about = "Optimize prompts for UI generation tools",
    version
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Optimize one prompt and print the result
    Optimize {
        /// Prompt text (read from stdin when omitted)
        prompt: Option<String>,

        /// Skip the model and use local heuristics only
        #[arg(long)]
        local: bool,

        /// Print the result record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the local HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Show the prompt style guide
    Guide {
        #[arg(long)]
        json: bool,
    },

    /// Store the API key in the credential store
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let serving = matches!(cli.command, Command::Serve { .. });
    logging::init(logging::default_directive(cli.verbose, serving));

    match cli.command {
        Command::Optimize {
            prompt,
            local,
            json,
        } => optimize(prompt, local, json).await,
        Command::Serve { host, port } => serve(host, port).await,
        Command::Guide { json } => guide(json),
        Command::Setup => setup(),
    }
}

fn read_prompt(arg: Option<String>) -> Result<String> {
    let prompt = match arg {
        Some(prompt) => prompt,
        None => {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                bail!("prompt is required (pass it as an argument or pipe it on stdin)");
            }
            let mut buf = String::new();
            stdin
                .read_to_string(&mut buf)
                .context("Failed to read prompt from stdin")?;
            buf
        }
    };

    if prompt.trim().is_empty() {
        bail!("prompt is required");
    }
    Ok(prompt)
}

async fn optimize(prompt: Option<String>, local: bool, json: bool) -> Result<()> {
    let prompt = read_prompt(prompt)?;

    let (optimizer, startup_fallback) = if local {
        (Optimizer::local_only(), None)
    } else {
        startup::optimizer_for(&Config::load())
    };

    // Ctrl-C abandons the model call and still prints the local result
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let outcome = optimizer.optimize_with_cancel(&prompt, &cancel).await;
    interrupt.abort();

    if let Some(fallback) = outcome.fallback.as_ref().or(startup_fallback.as_ref()) {
        eprintln!("{}", output::fallback_note(fallback));
    }

    if json {
        let encoded =
            serde_json::to_string_pretty(&outcome.result).context("Failed to encode result")?;
        println!("{}", encoded);
    } else {
        print!("{}", output::render_result(&outcome.result));
    }
    Ok(())
}

async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = Config::load();
    let port = match port {
        Some(port) => port,
        None => config.port()?,
    };
    let host = host.unwrap_or_else(|| config.host.clone());
    let (optimizer, startup_fallback) = startup::optimizer_for(&config);
    if let Some(fallback) = &startup_fallback {
        eprintln!("{}", output::fallback_note(fallback));
    }

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutting down");
            on_signal.cancel();
        }
    });

    println!("Starting local API server on http://{}:{}", host, port);
    println!("  GET  /health");
    println!("  POST /api/optimize");
    println!("  GET  /api/guide");

    server::run_server(&host, port, optimizer, config.request_timeout(), shutdown).await
}

fn guide(json: bool) -> Result<()> {
    let guide = promptlift_core::guide::guide();
    if json {
        let encoded = serde_json::to_string_pretty(&guide).context("Failed to encode guide")?;
        println!("{}", encoded);
    } else {
        print!("{}", output::render_guide(&guide));
    }
    Ok(())
}

/// Set up the API key interactively, then confirm it resolves.
fn setup() -> Result<()> {
    setup_api_key_interactive()?;

    let resolved = Config::load();
    match resolved.key_source() {
        Some(source) => {
            println!("  + API key verified and ready to use (from {}).", source.label());
            Ok(())
        }
        None => {
            eprintln!();
            eprintln!("  ! Warning: API key was saved but cannot be read back.");
            eprintln!("  Workaround: Set the {} environment variable:", API_KEY_ENV);
            eprintln!("    export {}=\"your-key-here\"", API_KEY_ENV);
            eprintln!();
            bail!("API key verification failed")
        }
    }
}
