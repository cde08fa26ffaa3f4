use anyhow::{Context, Result};
use battlemap_generator::app::App;
use clap::Parser;
use std::io::Read;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "battlemap-generator")]
#[command(about = "Generate top-down tabletop RPG battle maps from a description")]
struct CliArgs {
    /// Battle map description. Read from stdin when omitted.
    #[arg(value_name = "PROMPT")]
    prompt: Option<String>,

    /// Print the summary and URL as JSON.
    #[arg(long)]
    json: bool,

    /// Print the condensed summary before the URL.
    #[arg(long)]
    show_summary: bool,
}

fn read_prompt(arg: Option<String>, mut stdin: impl Read) -> Result<String> {
    match arg {
        Some(prompt) => Ok(prompt),
        None => {
            let mut prompt = String::new();
            stdin
                .read_to_string(&mut prompt)
                .context("Failed to read prompt from stdin")?;
            Ok(prompt.trim_end_matches(['\r', '\n']).to_string())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "battlemap_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting battlemap-generator");

    let args = CliArgs::parse();
    let prompt = read_prompt(args.prompt, std::io::stdin())?;

    let app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    match app.run(&prompt).await {
        Some(battlemap) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&battlemap)?);
            } else {
                if args.show_summary {
                    println!("{}", battlemap.summary);
                }
                println!("{}", battlemap.url);
            }
            info!("Generation completed successfully");
            Ok(())
        }
        None => {
            error!("No battle map was generated");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{read_prompt, CliArgs};
    use clap::Parser;

    #[test]
    fn test_parse_prompt_and_flags() {
        let args = CliArgs::parse_from(["battlemap-generator", "a dragon lair", "--json"]);
        assert_eq!(args.prompt.as_deref(), Some("a dragon lair"));
        assert!(args.json);
        assert!(!args.show_summary);
    }

    #[test]
    fn test_prompt_argument_wins_over_stdin() {
        let prompt = read_prompt(Some("from args".to_string()), "from stdin".as_bytes()).unwrap();
        assert_eq!(prompt, "from args");
    }

    #[test]
    fn test_prompt_read_from_stdin() {
        let prompt = read_prompt(None, "a flooded mine\n".as_bytes()).unwrap();
        assert_eq!(prompt, "a flooded mine");
    }
}
