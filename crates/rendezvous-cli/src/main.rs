//! Rendezvous protocol CLI
//!
//! Generates identities and builds or inspects rendezvous wire messages.

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rendezvous_crypto::{Signer, SigningKey};
use rendezvous_proto::clock::SystemClock;
use rendezvous_proto::framing::{decode_frame, encode_frame};
use rendezvous_proto::{
    AddrInfo, Message, Multiaddr, PROTOCOL_ID, PeerId, new_discover_request, new_register_request,
    unseal,
};
use std::path::{Path, PathBuf};
use zeroize::Zeroize;

use config::Config;

/// Build and inspect rendezvous protocol messages
#[derive(Parser)]
#[command(name = "rendezvous")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new identity keypair
    Keygen {
        /// Output file for private key
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a signed REGISTER request
    Register {
        /// Address to advertise (repeatable)
        #[arg(short, long = "addr", required = true)]
        addrs: Vec<String>,

        /// Namespace to register under
        #[arg(short, long)]
        namespace: Option<String>,

        /// Requested TTL in seconds
        #[arg(short, long)]
        ttl: Option<i64>,

        /// Private key file (overrides config)
        #[arg(short, long)]
        key: Option<PathBuf>,
    },

    /// Build a DISCOVER request
    Discover {
        /// Namespace to search
        #[arg(short, long)]
        namespace: Option<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Decode a hex-encoded frame and verify any peer records in it
    Decode {
        /// Hex-encoded frame
        #[arg(required = true)]
        frame: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load_or_default()?,
    };
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "debug"
        } else {
            config.logging.level.as_str()
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Keygen { output } => generate_keypair(output)?,
        Commands::Register {
            addrs,
            namespace,
            ttl,
            key,
        } => build_register(&config, addrs, namespace, ttl, key)?,
        Commands::Discover { namespace, limit } => {
            let namespace = namespace.unwrap_or_else(|| config.defaults.namespace.clone());
            let limit = limit.unwrap_or(config.defaults.limit);
            tracing::debug!("Building discover request ns='{}' limit={}", namespace, limit);
            print_frame(&new_discover_request(&namespace, limit))?;
        }
        Commands::Decode { frame } => decode(&frame)?,
    }

    Ok(())
}

/// Generate a new identity keypair
fn generate_keypair(output: Option<PathBuf>) -> anyhow::Result<()> {
    let signing_key = SigningKey::generate(&mut rand_core::OsRng);
    let public_key = signing_key.public_key();

    println!("Public key: {}", hex::encode(&public_key));
    println!("Peer ID:    {}", PeerId::from_public_key(&public_key));

    if let Some(output_path) = output {
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut private_bytes = signing_key.to_bytes();
        let written = std::fs::write(&output_path, private_bytes);
        private_bytes.zeroize();
        written?;

        println!("Private key saved to: {}", output_path.display());
    } else {
        println!("Private key not saved (use --output to save)");
    }

    Ok(())
}

fn load_signing_key(path: &Path) -> anyhow::Result<SigningKey> {
    let mut bytes = std::fs::read(path)
        .with_context(|| format!("failed to read private key {}", path.display()))?;
    let key = SigningKey::from_slice(&bytes);
    bytes.zeroize();
    Ok(key?)
}

fn build_register(
    config: &Config,
    addrs: Vec<String>,
    namespace: Option<String>,
    ttl: Option<i64>,
    key: Option<PathBuf>,
) -> anyhow::Result<()> {
    let key_path = key.unwrap_or_else(|| config.identity.private_key_file.clone());
    let signing_key = load_signing_key(&key_path)?;

    let addrs = addrs
        .iter()
        .map(|a| a.parse::<Multiaddr>())
        .collect::<Result<Vec<_>, _>>()?;
    let info = AddrInfo::new(PeerId::from_public_key(&signing_key.public_key()), addrs);

    let namespace = namespace.unwrap_or_else(|| config.defaults.namespace.clone());
    let ttl = ttl.unwrap_or(config.defaults.ttl);

    tracing::info!(
        "Registering {} under '{}' with {} addresses",
        info.id,
        namespace,
        info.addrs.len()
    );
    let message = new_register_request(&signing_key, &SystemClock, &namespace, &info, ttl)?;
    print_frame(&message)
}

fn print_frame(message: &Message) -> anyhow::Result<()> {
    let frame = encode_frame(message)?;
    tracing::debug!("{} frame is {} bytes", message.message_type(), frame.len());
    println!("{}", hex::encode(frame));
    Ok(())
}

fn decode(frame_hex: &str) -> anyhow::Result<()> {
    let bytes = hex::decode(frame_hex.trim()).context("frame is not valid hex")?;
    let (message, used) = decode_frame(&bytes)?.context("frame is truncated")?;
    if used != bytes.len() {
        tracing::warn!("Ignoring {} trailing bytes", bytes.len() - used);
    }

    println!("Protocol: {}", PROTOCOL_ID);
    println!("Type:     {}", message.message_type());

    match message {
        Message::Register(register) => {
            println!("Namespace: {}", register.ns.as_deref().unwrap_or("<default>"));
            println!("TTL:       {}", display_opt(register.ttl));
            match unseal(&register.peer) {
                Ok(info) => print_addr_info(&info),
                Err(e) => println!("Peer:      INVALID ({})", e),
            }
        }
        Message::Discover(discover) => {
            println!("Namespace: {}", discover.ns.as_deref().unwrap_or("<all>"));
            println!("Limit:     {}", display_opt(discover.limit));
        }
        Message::RegisterResponse(response) => {
            println!("Status:    {}", response.status);
            match response.into_result() {
                Ok(ttl) => println!("TTL:       {}", ttl),
                Err(e) => println!("Error:     {}", e),
            }
        }
        Message::DiscoverResponse(response) => {
            println!("Status:    {}", response.status);
            match response.into_result() {
                Ok(registrations) => {
                    println!("Registrations: {}", registrations.len());
                    for reg in &registrations {
                        println!();
                        println!("Namespace: {}", reg.ns);
                        println!("TTL:       {}", reg.ttl);
                        match reg.addr_info() {
                            Ok(info) => print_addr_info(&info),
                            Err(e) => println!("Peer:      INVALID ({})", e),
                        }
                    }
                }
                Err(e) => println!("Error:     {}", e),
            }
        }
    }

    Ok(())
}

fn print_addr_info(info: &AddrInfo) {
    println!("Peer:      {}", info.id);
    for addr in &info.addrs {
        println!("  {}", addr);
    }
}

fn display_opt(value: Option<i64>) -> String {
    value.map_or_else(|| "<unset>".to_string(), |v| v.to_string())
}
