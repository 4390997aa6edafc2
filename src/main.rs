// src/main.rs

use std::io::{Read, Write};
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use leetcoach::{Config, SolveError, TranslateQuery, Translator};

#[derive(Parser, Debug)]
#[command(
    name = "leetcoach",
    version,
    about = "Solve a LeetCode problem through an OpenAI-compatible chat backend"
)]
struct Cli {
    /// Problem statement, problem URL, problem number, or keyword.
    /// Reads stdin when omitted.
    query: Vec<String>,

    /// Disable live output streaming
    #[arg(long)]
    no_stream: bool,

    /// Skip the remote problem lookup and treat the input as a full statement
    #[arg(long)]
    no_fetch: bool,

    /// Model override
    #[arg(long, env = "LEETCOACH_MODEL")]
    model: Option<String>,

    /// Verbose diagnostics on stderr
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if cli.no_stream {
        config.stream = false;
    }
    if cli.no_fetch {
        config.fetch_problems = false;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }
    if cli.debug {
        config.debug = true;
    }

    let filter = if config.debug {
        EnvFilter::new("leetcoach=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let text = if cli.query.is_empty() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        cli.query.join(" ")
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received, aborting request");
                cancel.cancel();
            }
        });
    }

    let streaming = config.stream;
    let query = TranslateQuery {
        text,
        cancel: cancel.clone(),
        on_stream: if streaming {
            // The callback carries the cumulative text; only the unseen
            // suffix goes to the terminal.
            let printed = Mutex::new(0usize);
            Some(Box::new(move |partial: &str| {
                let mut done = printed.lock().unwrap();
                print!("{}", &partial[*done..]);
                let _ = std::io::stdout().flush();
                *done = partial.len();
            }))
        } else {
            None
        },
    };

    let outcome = async {
        let translator = Translator::new(config)?;
        translator.translate(query).await
    }
    .await;

    match outcome {
        Ok(result) => {
            if streaming {
                println!();
            } else {
                println!("{}", result.paragraphs.join("\n\n"));
            }
            Ok(())
        }
        Err(SolveError::Cancelled) => std::process::exit(130),
        Err(err) => {
            let record = err.to_record();
            eprintln!("error: {}", record.message);
            if !record.detail.is_empty() {
                eprintln!("  {}", record.detail);
            }
            if let Some(link) = record.help_link {
                eprintln!("  see {link}");
            }
            std::process::exit(1);
        }
    }
}
