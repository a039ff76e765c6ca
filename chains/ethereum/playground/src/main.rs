use eth_proof_client::{HttpTransport, ProofClient};
use eth_proof_types::BlockSelector;

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Wrapped Ether, slot zero holds the token name.
const WETH: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
const SLOT_ZERO: &str = "0x0";

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::FmtSubscriber::builder()
        .with_level(true)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let url = std::env::var("ETH_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
    tracing::info!("connecting to {url}");
    let client = ProofClient::new(HttpTransport::parse(&url)?);

    let proof = client.fetch(WETH, &[SLOT_ZERO], BlockSelector::Latest).await?;
    println!("proof: {}\n", serde_json::to_string_pretty(&proof)?);

    for entry in &proof.storage_proof {
        println!("storage[{:#x}] = {:#x} ({} nodes)", entry.key, entry.value, entry.proof.len());
    }
    println!("empty code: {}, empty storage: {}", proof.is_empty_code(), proof.is_empty_storage());
    Ok(())
}
