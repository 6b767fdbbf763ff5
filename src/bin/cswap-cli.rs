use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "cswap-cli")]
#[command(about = "Management CLI for the cswap DEX backend", long_about = None)]
struct Cli {
    #[arg(short, long, env = "CSWAP_URL", default_value = "http://localhost:8000")]
    url: String,

    /// Admin API key, sent as a bearer token.
    #[arg(short, long, env = "ADMIN_API_KEY")]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness and breaker states
    Health,
    /// Platform statistics
    Stats,
    /// Recent transactions, newest first
    Transactions {
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
        #[arg(short, long)]
        chain: Option<String>,
    },
    /// List pools
    Pools {
        #[arg(short, long)]
        chain: Option<String>,
    },
    /// Token price from the price feed
    Price { token: String },
    /// Submit a swap
    Swap {
        token_in: String,
        token_out: String,
        amount_in: String,
        #[arg(short, long)]
        chain: String,
        #[arg(short, long)]
        recipient: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);
    }

    let request = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)),
        Commands::Stats => client.get(format!("{}/api/admin/stats", base)).headers(headers),
        Commands::Transactions { limit, chain } => {
            let mut req = client
                .get(format!("{}/api/admin/transactions", base))
                .headers(headers)
                .query(&[("limit", limit.to_string())]);
            if let Some(chain) = chain {
                req = req.query(&[("chain", chain)]);
            }
            req
        }
        Commands::Pools { chain } => {
            let mut req = client.get(format!("{}/api/pools", base));
            if let Some(chain) = chain {
                req = req.query(&[("chain", chain)]);
            }
            req
        }
        Commands::Price { token } => client.get(format!("{}/api/price/{}", base, token)),
        Commands::Swap {
            token_in,
            token_out,
            amount_in,
            chain,
            recipient,
        } => client.post(format!("{}/api/swap", base)).json(&json!({
            "tokenIn": token_in,
            "tokenOut": token_out,
            "amountIn": amount_in,
            "chain": chain,
            "recipient": recipient,
        })),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: backend returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
