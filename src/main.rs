use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use censys_origin::client::BASE_URL;
use censys_origin::{CensysClient, CensysConfig, SearchError};

/// Find origin servers of a CDN-fronted domain through Censys certificate search
#[derive(Parser, Debug)]
#[command(name = "censys-origin", version)]
struct Args {
    /// The domain to scan
    domain: String,

    /// A file to output likely origin servers to
    #[arg(short, long = "output", value_name = "FILE")]
    output_file: Option<PathBuf>,

    /// Censys Personal Access Token
    #[arg(long, env = "CENSYS_API_KEY", hide_env_values = true)]
    censys_api_key: String,

    /// Certificate result pages to fetch (100 certificates each)
    #[arg(long, value_name = "N", default_value = "2")]
    pages: NonZeroUsize,

    /// Censys API root
    #[arg(long, value_name = "URL", env = "CENSYS_API_URL", default_value = BASE_URL)]
    censys_url: String,

    /// Proxy for Censys API requests (http://, https:// or socks5://)
    #[arg(long, value_name = "URL")]
    proxy: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "censys_origin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = CensysConfig {
        base_url: args.censys_url,
        proxy: args.proxy,
        ..Default::default()
    };
    let client = CensysClient::with_config(&args.censys_api_key, config)
        .unwrap_or_else(fail);

    eprintln!("[*] Retrieving certificates for {} from Censys...", args.domain);
    let fingerprints = client
        .fetch_certificate_fingerprints(&args.domain, args.pages.get())
        .await
        .unwrap_or_else(fail);

    if fingerprints.is_empty() {
        eprintln!("[-] No certificates found for {}. Exiting.", args.domain);
        process::exit(1);
    }
    eprintln!("[*] Found {} certificate(s)", fingerprints.len());

    eprintln!("[*] Looking for hosts presenting these certificates...");
    let ips = client.fetch_hosts(&fingerprints).await.unwrap_or_else(fail);

    if ips.is_empty() {
        eprintln!("[-] No hosts found presenting these certificates.");
    } else {
        eprintln!("[*] {} candidate origin server(s):", ips.len());
    }
    for ip in &ips {
        println!("{}", ip);
    }

    if let Some(path) = args.output_file {
        let mut contents = String::new();
        for ip in &ips {
            contents.push_str(ip);
            contents.push('\n');
        }
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write results to {}", path.display()))?;
        eprintln!("[*] Wrote {} candidate(s) to {}", ips.len(), path.display());
    }

    Ok(())
}

/// Report a search failure and end the run
fn fail<T>(err: SearchError) -> T {
    eprintln!("[-] {}", err);
    process::exit(1);
}
