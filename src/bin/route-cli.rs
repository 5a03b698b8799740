use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use mvc_router::config::load_config;
use mvc_router::routing::{parse_verb, Router};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect the route table of an mvc-router configuration", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every compiled route in precedence order
    List,
    /// Show which controller and action a request would reach
    Match {
        /// HTTP verb, e.g. GET
        verb: String,
        /// Request path, e.g. /notes/7
        url: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let router = Router::from_config(&config.routes)?;

    match cli.command {
        Commands::List => {
            let rows: Vec<_> = router
                .routes()
                .map(|route| {
                    json!({
                        "path": route.spec,
                        "pattern": route.source,
                        "verb": route.verb.as_str(),
                        "controller": route.target.controller.to_string(),
                        "action": route.target.action.to_string(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Commands::Match { verb, url } => {
            let verb = parse_verb(&verb)?;
            let url = if url.starts_with('/') { url } else { format!("/{}", url) };

            match router.match_and_parse(&url, &verb)? {
                Some(matched) => {
                    let args = Router::clean_arguments(&matched.args);
                    let out = json!({
                        "controller": matched.controller,
                        "action": matched.action,
                        "args": matched.args,
                        "cleaned": args,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                None => {
                    eprintln!("No route matches {} {}", verb, url);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
