use anyhow::Context;
use clap::{Parser, Subcommand};

use am550_rs::logging::log_warn;
use am550_rs::util::hex::decode_hex;
use am550_rs::{connect, init_logger, log_info, AesKey, MeterError, TelegramDecoder};

#[derive(Parser)]
#[command(name = "am550-cli")]
#[command(about = "CLI tool for AM550 smart meter telegrams")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream readings from the meter's serial interface as JSON lines
    Watch {
        port: String,
        /// 16-byte AES key, hex encoded
        #[arg(short, long)]
        key: String,
    },
    /// Decode a single hex-encoded telegram
    Decode {
        /// 16-byte AES key, hex encoded
        #[arg(short, long)]
        key: String,
        telegram: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch { port, key } => {
            let key = AesKey::from_hex(&key).context("invalid meter key")?;
            let mut meter = connect(&port, key)
                .await
                .with_context(|| format!("failed to open {port}"))?;
            log_info(&format!("Connected to meter on {port}"));

            loop {
                match meter.recv_reading().await {
                    Ok(reading) => println!("{}", serde_json::to_string(&reading)?),
                    Err(MeterError::Decode(e)) => log_warn(&format!("Telegram discarded: {e}")),
                    Err(e) => return Err(e).context("serial link failed"),
                }
            }
        }
        Commands::Decode { key, telegram } => {
            let key = AesKey::from_hex(&key).context("invalid meter key")?;
            let bytes = decode_hex(&telegram).context("invalid telegram hex")?;
            let reading = TelegramDecoder::new(key).decode(&bytes)?;
            println!("{}", serde_json::to_string(&reading)?);
        }
    }

    Ok(())
}
