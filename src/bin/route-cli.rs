use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use http_dispatch::config::load_config;
use http_dispatch::lifecycle::build_route_source;
use http_dispatch::routing::{ConventionMapper, RouteSource, Router, VerbFilter};

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Inspect the routes of an http-dispatch configuration", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "dispatch.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and list rules in evaluation order
    Check,
    /// Show the target a request would resolve to
    Resolve {
        verb: String,
        path: String,
    },
    /// Show the method the path convention derives for a path
    Convention { path: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            let config = load_config(&cli.config)?;
            let source = build_route_source(&config.routing)?;
            print_json(&describe(&source))?;
        }
        Commands::Resolve { verb, path } => {
            let config = load_config(&cli.config)?;
            let source = build_route_source(&config.routing)?;
            let router = Router::resolve(&source, &verb.to_ascii_uppercase(), &path);
            match router.target() {
                Some(target) => print_json(&serde_json::to_value(target)?)?,
                None => println!("no match"),
            }
        }
        Commands::Convention { path } => {
            println!("{}", ConventionMapper::method_for(&path));
        }
    }

    Ok(())
}

fn describe(source: &RouteSource) -> Value {
    match source {
        RouteSource::Convention(mapper) => json!({
            "strategy": "convention",
            "controller": mapper.controller(),
        }),
        RouteSource::Table(table) => {
            let rules: Vec<Value> = table
                .rules()
                .iter()
                .enumerate()
                .map(|(index, rule)| {
                    let verbs = match &rule.verbs {
                        VerbFilter::Any => vec!["*".to_string()],
                        VerbFilter::Only(verbs) => verbs.clone(),
                    };
                    json!({
                        "index": index,
                        "verbs": verbs,
                        "pattern": rule.pattern.as_str(),
                        "valid": rule.pattern.is_valid(),
                        "handler": rule.target.handler,
                        "method": rule.target.method,
                        "args": rule.target.args,
                    })
                })
                .collect();
            json!({ "strategy": "table", "rules": rules })
        }
    }
}

fn print_json(value: &Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
