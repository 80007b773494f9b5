use alloy::primitives::{Bytes, U256};
use alloy::providers::ProviderBuilder;
use premint::authorization::is_valid_signature;
use premint::executor::{supports_premint_version, PremintExecutorReader};
use premint::{AddressBook, ChainConfig, ContractCreationConfig, PremintConfigAndVersion, PremintExecutor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let path = std::env::var("PREMINT_FILE").expect("PREMINT_FILE environment variable is required");
    let raw = std::fs::read_to_string(&path).expect("failed to read PREMINT_FILE");
    let body: serde_json::Value = serde_json::from_str(&raw).expect("PREMINT_FILE is not valid JSON");

    let collection: ContractCreationConfig =
        serde_json::from_value(body["collection"].clone()).expect("invalid collection");
    let version = body["premintConfigVersion"]
        .as_str()
        .expect("premintConfigVersion must be a string");
    let premint = PremintConfigAndVersion::from_parts(version, body["premintConfig"].clone())
        .expect("invalid premint config");
    let signature: Bytes = body["signature"]
        .as_str()
        .expect("signature must be a hex string")
        .parse()
        .expect("invalid signature hex");

    let quantity: U256 = match std::env::var("QUANTITY") {
        Ok(val) => val.parse().expect("invalid QUANTITY -- must be a valid U256"),
        Err(_) => U256::from(1u64),
    };

    let config = ChainConfig::from_env(&AddressBook::with_defaults()).expect("invalid chain config");

    println!("Verifying premint...");
    println!("  Chain:    {}", config.chain_id);
    println!("  Executor: {}", config.addresses.premint_executor);
    println!("  Version:  {}", premint.version());
    println!("  Uid:      {}", premint.uid());

    let provider = ProviderBuilder::new().connect_http(config.rpc_url.parse().expect("invalid RPC_URL"));
    let executor = PremintExecutor::with_chain_config(provider, &config);

    let collection_address = executor
        .get_contract_address(&collection)
        .await
        .expect("failed to resolve collection address");
    println!("  Collection address: {collection_address}");

    let supported = supports_premint_version(&executor, premint.version(), collection_address)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read supported premint versions");
            false
        });
    if !supported {
        tracing::warn!(version = %premint.version(), "collection may not accept this premint version");
    }

    let result = is_valid_signature(&executor, &collection, &premint, &signature, config.chain_id)
        .await
        .expect("authorization check failed");

    match result.recovered_address {
        Some(signer) => println!("\nRecovered signer: {signer}"),
        None => println!("\nRecovered signer: <none>"),
    }
    println!("Authorized:       {}", result.is_authorized);

    if premint.is_deleted() {
        println!("Premint is marked deleted -- it cannot be executed.");
        return;
    }

    match executor.premint_costs(collection_address, &premint, quantity).await {
        Ok(costs) => {
            println!("\nCosts for {quantity} token(s):");
            println!("  Mint fee:   {}", costs.mint_fee);
            println!("  Token cost: {}", costs.token_purchase_cost);
            println!("  Total:      {}", costs.total_cost);
        }
        Err(e) => tracing::warn!(error = %e, "could not read premint mint fee"),
    }
}
