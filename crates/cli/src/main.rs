use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tourism_agents::PublicApiAgent;
use tourism_core::{extract_place, extract_place_or_input};
use tourism_observability::{init_tracing, AppMetrics};
use tourism_tools::{Toolbox, ToolsConfig};

#[derive(Debug, Parser)]
#[command(name = "tourism")]
#[command(about = "Weather and attractions for places named in plain English")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show which place name would be looked up for a query.
    Extract {
        text: String,
        /// Print the string handed to geocoding, falling back to the input.
        #[arg(long)]
        or_input: bool,
    },
    /// Answer one query against the public APIs.
    Ask { text: String },
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("tourism_cli");
    let cli = Cli::parse();

    match cli.command {
        Command::Extract { text, or_input } => {
            if or_input {
                println!("{}", extract_place_or_input(&text));
            } else {
                let payload = match extract_place(&text) {
                    Some(candidate) => serde_json::json!({
                        "place": candidate.name,
                        "stage": candidate.stage,
                    }),
                    None => serde_json::json!({ "place": null }),
                };
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
        }
        Command::Ask { text } => {
            let agent = build_agent()?;
            let answer = agent.answer(&text).await?;
            println!("{}", serde_json::to_string_pretty(&answer)?);
        }
        Command::Chat => run_chat(build_agent()?).await?,
    }

    Ok(())
}

async fn run_chat(agent: PublicApiAgent) -> Result<()> {
    println!("Tourism chat mode. Ask about a place, type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        if message.is_empty() {
            continue;
        }

        let answer = agent.answer(message).await?;

        println!();
        if let Some(notice) = &answer.notice {
            println!("{notice}");
        }
        if let Some(weather) = &answer.weather {
            println!("{weather}");
        }
        if let Some(places) = &answer.places {
            println!("{places}");
        }
        if answer.notice.is_none() && answer.weather.is_none() && answer.places.is_none() {
            println!("No information found for {}.", answer.place_name);
        }
        println!();
    }

    Ok(())
}

fn build_agent() -> Result<PublicApiAgent> {
    let config = ToolsConfig::from_env().context("invalid upstream configuration")?;
    let toolbox = Toolbox::from_config(&config).context("failed to build upstream clients")?;
    Ok(PublicApiAgent::from_toolbox(toolbox, AppMetrics::shared()))
}
