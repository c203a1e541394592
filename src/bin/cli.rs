//! Permadash CLI
//!
//! Command-line interface for Permadash:
//! - Build queries locally or run them through the API
//! - Inspect credit timelines and delegation breakdowns
//! - Browse configured process ids
//! - Generate a config file

use clap::{Args, Parser, Subcommand};
use permadash::query::{add_tag, build_query, Field, QueryFields, QueryFilters, Tag};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "permadash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Permaweb dashboard: queries, credit timelines and delegations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8082", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build or run a transaction query
    Query {
        #[command(subcommand)]
        action: QueryAction,
    },

    /// Show the credit timeline for a payment method
    Credits {
        /// Payment method id
        payment_method: String,
        /// Ignore the 24h cache and refetch
        #[arg(short, long)]
        refresh: bool,
    },

    /// Show delegation totals and one project's delegators
    Delegations {
        /// Project to break down (default: first project)
        #[arg(short, long)]
        project: Option<String>,
        /// Reload delegation data first
        #[arg(short, long)]
        refresh: bool,
    },

    /// List configured process ids
    ProcessIds,

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum QueryAction {
    /// Print the query without running it
    Build(QueryArgs),
    /// Run the query through the API server
    Run(QueryArgs),
}

#[derive(Args)]
pub struct QueryArgs {
    /// Transaction id
    #[arg(long)]
    id: Option<String>,
    /// Owner address
    #[arg(long)]
    owner: Option<String>,
    /// Recipient address
    #[arg(long)]
    recipient: Option<String>,
    /// Tag filter in name=value format
    #[arg(short = 'T', long = "tag")]
    tags: Vec<String>,
    /// Maximum results (0 = no limit)
    #[arg(short, long, default_value = "0")]
    limit: i64,
    /// Fields to leave out (owner, recipient, tags, block, data, fee, quantity)
    #[arg(short = 'x', long, value_delimiter = ',')]
    exclude: Vec<String>,
}

impl QueryArgs {
    fn to_form(&self) -> Result<(QueryFilters, QueryFields), Box<dyn std::error::Error>> {
        let mut tags: Vec<Tag> = Vec::new();
        for tag in &self.tags {
            let added = tag
                .split_once('=')
                .map(|(name, value)| add_tag(&mut tags, name.trim(), value.trim()))
                .unwrap_or(false);
            if !added {
                return Err(format!("Invalid tag: {}. Use name=value", tag).into());
            }
        }

        let filters = QueryFilters {
            id: self.id.clone().unwrap_or_default(),
            owner: self.owner.clone().unwrap_or_default(),
            recipient: self.recipient.clone().unwrap_or_default(),
            tags,
        };

        let mut fields = QueryFields::default();
        for name in &self.exclude {
            fields.set(Field::from_str(name.trim())?, false);
        }

        Ok((filters, fields))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let json_output = cli.format == "json";

    match cli.command {
        Commands::Query {
            action: QueryAction::Build(args),
        } => {
            let (filters, fields) = args.to_form()?;
            let query = build_query(&filters, &fields, args.limit);

            if json_output {
                println!("{}", query.to_pretty_json()?);
            } else {
                print!("{}", query.to_graphql());
                let variables = query.variables();
                if !variables.is_empty() {
                    println!();
                    println!("Variables:");
                    println!("{}", serde_json::to_string_pretty(&variables)?);
                }
            }
        }

        Commands::Query {
            action: QueryAction::Run(args),
        } => {
            let (filters, fields) = args.to_form()?;
            let body = serde_json::json!({
                "filters": filters,
                "fields": fields,
                "limit": args.limit,
            });

            let data = fetch_json(
                client
                    .post(format!("{}/api/v1/query/execute", cli.api_url))
                    .json(&body),
            )
            .await?;

            if let Some(error) = data.get("error").and_then(|e| e.as_str()) {
                eprintln!("Query failed: {}", error);
                std::process::exit(1);
            }

            if json_output {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_transactions(&data);
            }
        }

        Commands::Credits {
            payment_method,
            refresh,
        } => {
            let view = if json_output { "json" } else { "table" };
            let data = fetch_json(
                client
                    .get(format!("{}/api/v1/credits/{}", cli.api_url, payment_method))
                    .query(&[("refresh", refresh.to_string()), ("format", view.to_string())]),
            )
            .await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_credits(&data);
            }
        }

        Commands::Delegations { project, refresh } => {
            if refresh {
                let result = fetch_json(
                    client.post(format!("{}/api/v1/delegations/refresh", cli.api_url)),
                )
                .await?;
                if !json_output {
                    println!(
                        "Refreshed {} accounts",
                        result["accounts"].as_u64().unwrap_or(0)
                    );
                    println!();
                }
            }

            let mut request = client.get(format!("{}/api/v1/delegations", cli.api_url));
            if let Some(project) = &project {
                request = request.query(&[("project", project)]);
            }
            let data = fetch_json(request).await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_delegations(&data);
            }
        }

        Commands::ProcessIds => {
            let data =
                fetch_json(client.get(format!("{}/api/v1/process-ids", cli.api_url))).await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_process_ids(&data);
            }
        }

        Commands::Status => {
            let response = client.get(format!("{}/health", cli.api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Permadash v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "Credits: {}",
                        health["credits"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "Delegations: {}",
                        health["delegations"].as_str().unwrap_or("unknown")
                    );

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Permadash API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the Permadash API server is running:");
                    eprintln!("  cargo run --bin permadash");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = permadash::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Send a request and decode the JSON body, exiting on HTTP errors
async fn fetch_json(
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let response = request.send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        eprintln!("Request failed ({}): {}", status, text);
        std::process::exit(1);
    }

    Ok(response.json().await?)
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn format_number(value: &serde_json::Value) -> String {
    value
        .as_f64()
        .map(|v| format!("{:.4}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn print_transactions(data: &serde_json::Value) {
    let edges = match data["data"]["transactions"]["edges"].as_array() {
        Some(e) if !e.is_empty() => e,
        _ => {
            println!("No transactions");
            return;
        }
    };

    println!("{:<45} {:<45} {:>10}", "ID", "Owner", "Height");
    println!("{}", "-".repeat(102));

    for edge in edges {
        let node = &edge["node"];
        println!(
            "{:<45} {:<45} {:>10}",
            node["id"].as_str().unwrap_or("-"),
            node["owner"]["address"].as_str().unwrap_or("-"),
            node["block"]["height"]
                .as_u64()
                .map(|h| h.to_string())
                .unwrap_or_else(|| "pending".to_string())
        );
    }

    if data["data"]["transactions"]["pageInfo"]["hasNextPage"].as_bool() == Some(true) {
        println!();
        println!("(more results available)");
    }
}

fn print_credits(data: &serde_json::Value) {
    println!(
        "Payment method: {} ({})",
        data["payment_method"].as_str().unwrap_or("-"),
        data["status"].as_str().unwrap_or("unknown")
    );
    if let Some(error) = data["error"].as_str() {
        println!("Last fetch failed: {}", error);
    }
    println!();

    let rows = match data["rows"].as_array() {
        Some(r) if !r.is_empty() => r,
        _ => {
            println!("No credit notices");
            return;
        }
    };

    println!(
        "{:<26} {:>16} {:>16}  {}",
        "Date", "Amount", "Cumulative", "Source"
    );
    println!("{}", "-".repeat(80));

    for row in rows {
        println!(
            "{:<26} {:>16} {:>16}  {}",
            row["date"].as_str().unwrap_or("-"),
            format_number(&row["amount"]),
            format_number(&row["cumulative_amount"]),
            row["source"].as_str().unwrap_or("-")
        );
    }
}

fn print_delegations(data: &serde_json::Value) {
    let projects = data["projects"].as_array().cloned().unwrap_or_default();

    if projects.is_empty() {
        println!("No delegations");
        return;
    }

    println!("{:<45} {:>16}", "Project", "Delegated (AR)");
    println!("{}", "-".repeat(62));
    for project in &projects {
        println!(
            "{:<45} {:>16}",
            project["project_id"].as_str().unwrap_or("-"),
            format_number(&project["amount"])
        );
    }

    if let Some(selected) = data["selected"].as_str() {
        println!();
        println!("Delegators of {}:", selected);
        println!("{:<45} {:>16}", "Wallet", "Balance (AR)");
        println!("{}", "-".repeat(62));
        for delegator in data["delegators"].as_array().cloned().unwrap_or_default() {
            println!(
                "{:<45} {:>16}",
                delegator["wallet"].as_str().unwrap_or("-"),
                format_number(&delegator["balance"])
            );
        }
    }
}

fn print_process_ids(data: &serde_json::Value) {
    let groups = data["groups"].as_array().cloned().unwrap_or_default();

    if groups.is_empty() {
        println!("No process ids configured");
        return;
    }

    for group in groups {
        println!("{}", group["name"].as_str().unwrap_or("-"));
        for entry in group["ids"].as_array().cloned().unwrap_or_default() {
            println!(
                "  {:<40} {}",
                entry["name"].as_str().unwrap_or("-").replace(" > ", " › "),
                entry["value"].as_str().unwrap_or("-")
            );
        }
    }
}
