use clap::{crate_version, Parser};
use std::error::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use keyshard::polynomial::Polynomial;
use keyshard::sss::{combine_shares, generate_refresh_key, refresh_share, split_secret};

#[derive(Debug, Parser)]
#[command(name = "keyshard")]
#[command(version = crate_version!())]
#[command(
    about = "KEYSHARD - split secrets into threshold shares",
    long_about = "keyshard splits a secret into shares using Shamir's Secret Sharing over GF(2^8), such that any threshold-sized subset of the shares rebuilds the secret and any smaller subset reveals nothing. Shares are printed hex-encoded, one per line; each one ends with the participant's coordinate byte. How shares reach their custodians is up to you: this tool never stores or transmits anything. Dealt shares can later be re-randomized in place with a refresh key without changing the secret they protect."
)]
enum CliArgument {
    /// Split a secret into shares.
    Split {
        /// Secret to split.
        #[clap(long)]
        secret: String,

        /// Share threshold.
        #[clap(long, short)]
        threshold: usize,

        /// Number of shares to generate.
        #[clap(long, short)]
        shares: usize,

        /// Print the shares as a JSON array instead of one per line
        #[clap(long, short)]
        json: bool,
    },

    /// Combine hex-encoded shares to rebuild a secret.
    Combine {
        /// Hex-encoded shares, at least two.
        shares: Vec<String>,
    },

    /// Generate a refresh key for shares of a given secret length.
    RefreshKey {
        /// Share threshold used at split time.
        #[clap(long, short)]
        threshold: usize,

        /// Secret length in bytes.
        #[clap(long, short)]
        size: usize,
    },

    /// Re-randomize hex-encoded shares with a refresh key, keeping the secret.
    Refresh {
        /// Refresh key as produced by refresh-key, JSON-encoded.
        #[clap(long, short)]
        key: String,

        /// Hex-encoded shares to refresh.
        shares: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    match CliArgument::parse() {
        CliArgument::Split {
            secret,
            threshold,
            shares,
            json,
        } => {
            debug!("splitting {} bytes into {} shares", secret.len(), shares);
            let matrix = split_secret(secret.as_bytes(), threshold, shares)?;
            let encoded: Vec<String> = matrix.iter().map(hex::encode).collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&encoded)?);
            } else {
                println!("✂️  split into {shares} shares, threshold {threshold}:");
                for share in &encoded {
                    println!("  {share}");
                }
            }
        }

        CliArgument::Combine { shares } => {
            let decoded = decode_shares(&shares)?;
            let secret = combine_shares(&decoded)?;

            println!("🔑 secret: {}", hex::encode(&secret));
            if let Ok(text) = String::from_utf8(secret.clone()) {
                println!("   utf-8:  {text}");
            }
        }

        CliArgument::RefreshKey { threshold, size } => {
            let refresh_key = generate_refresh_key(threshold, size)?;
            println!("{}", serde_json::to_string(&refresh_key)?);
        }

        CliArgument::Refresh { key, shares } => {
            let refresh_key: Vec<Polynomial> = serde_json::from_str(&key)?;
            let mut decoded = decode_shares(&shares)?;

            for share in decoded.iter_mut() {
                refresh_share(share, &refresh_key)?;
            }

            println!("🔄 refreshed {} shares:", decoded.len());
            for share in &decoded {
                println!("  {}", hex::encode(share));
            }
        }
    }

    Ok(())
}

fn decode_shares(shares: &[String]) -> Result<Vec<Vec<u8>>, Box<dyn Error>> {
    shares
        .iter()
        .map(|share| hex::decode(share).map_err(Into::into))
        .collect()
}
