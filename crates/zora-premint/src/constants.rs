use std::collections::HashMap;

use alloy::primitives::{address, Address};

use crate::PremintError;

/// EIP-712 domain name used by the premint executor and 1155 contracts.
pub const PREMINTER_DOMAIN_NAME: &str = "Preminter";

/// Domain version of the original contract-and-token attestation.
pub const LEGACY_PREMINTER_DOMAIN_VERSION: &str = "0.0.1";

/// Zora Network mainnet chain ID.
pub const ZORA_CHAIN_ID: u64 = 7777777;

/// Zora Sepolia testnet chain ID.
pub const ZORA_SEPOLIA_CHAIN_ID: u64 = 999999999;

/// Base mainnet chain ID.
pub const BASE_CHAIN_ID: u64 = 8453;

/// Base Sepolia testnet chain ID.
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84532;

/// Ethereum mainnet chain ID.
pub const MAINNET_CHAIN_ID: u64 = 1;

/// Default RPC endpoint for Zora Network.
pub const RPC_URL: &str = "https://rpc.zora.energy";

/// Premint executor proxy, deployed at the same address on every supported chain.
pub const PREMINT_EXECUTOR: Address = address!("7777773606e7e46C8Ba8B98C08f5cD218e31d340");

/// Fixed price sale strategy, deployed at the same address on every supported chain.
pub const FIXED_PRICE_SALE_STRATEGY: Address =
    address!("04E2516A2c207E84a1839755675dfd8eF6302F0a");

/// Deployed protocol contracts on a single chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolAddresses {
    pub premint_executor: Address,
    pub fixed_price_sale_strategy: Address,
}

impl Default for ProtocolAddresses {
    fn default() -> Self {
        Self {
            premint_executor: PREMINT_EXECUTOR,
            fixed_price_sale_strategy: FIXED_PRICE_SALE_STRATEGY,
        }
    }
}

/// Per-chain protocol addresses. Built explicitly and handed to whichever
/// component needs a deployment address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    chains: HashMap<u64, ProtocolAddresses>,
}

impl AddressBook {
    /// An empty book. Every lookup fails until chains are inserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// The deterministic Zora deployments.
    pub fn with_defaults() -> Self {
        let mut book = Self::new();
        for chain_id in [
            ZORA_CHAIN_ID,
            ZORA_SEPOLIA_CHAIN_ID,
            BASE_CHAIN_ID,
            BASE_SEPOLIA_CHAIN_ID,
            MAINNET_CHAIN_ID,
        ] {
            book.insert(chain_id, ProtocolAddresses::default());
        }
        book
    }

    /// Add or replace the addresses for a chain.
    pub fn insert(&mut self, chain_id: u64, addresses: ProtocolAddresses) -> &mut Self {
        self.chains.insert(chain_id, addresses);
        self
    }

    /// Look up the addresses for a chain.
    pub fn get(&self, chain_id: u64) -> Result<ProtocolAddresses, PremintError> {
        self.chains.get(&chain_id).copied().ok_or_else(|| {
            PremintError::ConfigError(format!("no protocol addresses for chain {chain_id}"))
        })
    }

    pub fn chain_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.chains.keys().copied()
    }
}

/// Runtime chain configuration. Decouples the SDK from compile-time
/// deployment constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub rpc_url: String,
    pub addresses: ProtocolAddresses,
}

impl Default for ChainConfig {
    /// Defaults to Zora Network mainnet.
    fn default() -> Self {
        Self {
            chain_id: ZORA_CHAIN_ID,
            rpc_url: RPC_URL.to_string(),
            addresses: ProtocolAddresses::default(),
        }
    }
}

impl ChainConfig {
    /// Build a config for `chain_id` using the addresses recorded in `book`.
    pub fn for_chain(
        book: &AddressBook,
        chain_id: u64,
        rpc_url: impl Into<String>,
    ) -> Result<Self, PremintError> {
        Ok(Self {
            chain_id,
            rpc_url: rpc_url.into(),
            addresses: book.get(chain_id)?,
        })
    }

    /// Read the chain configuration from the environment.
    ///
    /// `CHAIN_ID` selects the entry in `book`; `RPC_URL`,
    /// `PREMINT_EXECUTOR_ADDRESS` and `FIXED_PRICE_SALE_STRATEGY_ADDRESS`
    /// override individual values.
    pub fn from_env(book: &AddressBook) -> Result<Self, PremintError> {
        let chain_id = match std::env::var("CHAIN_ID") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| PremintError::ConfigError(format!("invalid CHAIN_ID '{raw}': {e}")))?,
            Err(_) => ZORA_CHAIN_ID,
        };

        let rpc_url = std::env::var("RPC_URL").unwrap_or_else(|_| RPC_URL.to_string());
        let mut config = Self::for_chain(book, chain_id, rpc_url)?;

        if let Some(addr) = address_from_env("PREMINT_EXECUTOR_ADDRESS")? {
            config.addresses.premint_executor = addr;
        }
        if let Some(addr) = address_from_env("FIXED_PRICE_SALE_STRATEGY_ADDRESS")? {
            config.addresses.fixed_price_sale_strategy = addr;
        }

        Ok(config)
    }
}

fn address_from_env(key: &str) -> Result<Option<Address>, PremintError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<Address>()
            .map(Some)
            .map_err(|e| PremintError::ConfigError(format!("invalid {key} '{raw}': {e}"))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_book_covers_zora_chains() {
        let book = AddressBook::with_defaults();
        let zora = book.get(ZORA_CHAIN_ID).unwrap();
        assert_eq!(zora.premint_executor, PREMINT_EXECUTOR);
        assert!(book.get(ZORA_SEPOLIA_CHAIN_ID).is_ok());
        assert!(book.get(BASE_CHAIN_ID).is_ok());
    }

    #[test]
    fn test_unknown_chain_is_config_error() {
        let book = AddressBook::with_defaults();
        let err = book.get(31337).unwrap_err();
        assert!(matches!(err, PremintError::ConfigError(_)));
    }

    #[test]
    fn test_injected_addresses_override_defaults() {
        let local = ProtocolAddresses {
            premint_executor: Address::repeat_byte(0x11),
            fixed_price_sale_strategy: Address::repeat_byte(0x22),
        };
        let mut book = AddressBook::new();
        book.insert(31337, local);

        let config = ChainConfig::for_chain(&book, 31337, "http://localhost:8545").unwrap();
        assert_eq!(config.addresses, local);
        assert_eq!(config.chain_id, 31337);
    }
}
