//! Sale configuration defaults for new tokens.

use alloy::primitives::{Address, B256, U256};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::PremintError;

/// Minimum market size for timed sales, 200 mints worth of ETH.
pub const DEFAULT_MINIMUM_MARKET_ETH: U256 = U256::from_limbs([2_220_000_000_000_000, 0, 0, 0]);

/// Timed sale countdown, 24 hours.
pub const DEFAULT_MARKET_COUNTDOWN: u64 = 24 * 60 * 60;

/// Sale end used when none is given (uint64 max).
pub const SALE_END_FOREVER: u64 = u64::MAX;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedPriceParams {
    pub price_per_token: U256,
    #[serde(default)]
    pub sale_start: Option<u64>,
    #[serde(default)]
    pub sale_end: Option<u64>,
    #[serde(default)]
    pub max_tokens_per_address: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20Params {
    pub currency: Address,
    pub price_per_token: U256,
    #[serde(default)]
    pub sale_start: Option<u64>,
    #[serde(default)]
    pub sale_end: Option<u64>,
    #[serde(default)]
    pub max_tokens_per_address: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowListParams {
    pub presale_merkle_root: B256,
    #[serde(default)]
    pub sale_start: Option<u64>,
    #[serde(default)]
    pub sale_end: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedParams {
    #[serde(default)]
    pub erc20_name: Option<String>,
    #[serde(default)]
    pub erc20_symbol: Option<String>,
    #[serde(default)]
    pub sale_start: Option<u64>,
    #[serde(default)]
    pub market_countdown: Option<u64>,
    #[serde(default)]
    pub minimum_market_eth: Option<U256>,
}

/// Sale configuration as supplied by a creator. Unset fields get defaults.
///
/// Serialized with a `type` tag. When deserializing, a missing tag means a
/// fixed price sale if `pricePerToken` is non-zero and a timed sale otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum SalesConfigParams {
    #[serde(rename = "fixedPrice")]
    FixedPrice(FixedPriceParams),
    #[serde(rename = "erc20Mint")]
    Erc20(Erc20Params),
    #[serde(rename = "allowlistMint")]
    AllowList(AllowListParams),
    #[serde(rename = "timed")]
    Timed(TimedParams),
}

const SALE_TYPES: &[&str] = &["fixedPrice", "erc20Mint", "allowlistMint", "timed"];

impl<'de> Deserialize<'de> for SalesConfigParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.as_str(),
            Some(other) => {
                return Err(D::Error::custom(format!("invalid sale type {other}")));
            }
            None => untagged_sale_type(&value),
        };

        let parsed = match kind {
            "fixedPrice" => serde_json::from_value(value.clone()).map(Self::FixedPrice),
            "erc20Mint" => serde_json::from_value(value.clone()).map(Self::Erc20),
            "allowlistMint" => serde_json::from_value(value.clone()).map(Self::AllowList),
            "timed" => serde_json::from_value(value.clone()).map(Self::Timed),
            other => return Err(D::Error::unknown_variant(other, SALE_TYPES)),
        };
        parsed.map_err(D::Error::custom)
    }
}

fn untagged_sale_type(value: &Value) -> &'static str {
    let price = match value.get("pricePerToken") {
        Some(Value::Number(n)) => n.as_u64().map(U256::from),
        Some(Value::String(s)) => s.parse::<U256>().ok(),
        _ => None,
    };
    match price {
        Some(p) if !p.is_zero() => "fixedPrice",
        _ => "timed",
    }
}

/// Sale configuration with every field resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SalesConfig {
    #[serde(rename = "fixedPrice", rename_all = "camelCase")]
    FixedPrice {
        price_per_token: U256,
        sale_start: u64,
        sale_end: u64,
        max_tokens_per_address: u64,
    },
    #[serde(rename = "erc20Mint", rename_all = "camelCase")]
    Erc20 {
        currency: Address,
        price_per_token: U256,
        sale_start: u64,
        sale_end: u64,
        max_tokens_per_address: u64,
    },
    #[serde(rename = "allowlistMint", rename_all = "camelCase")]
    AllowList {
        presale_merkle_root: B256,
        sale_start: u64,
        sale_end: u64,
    },
    #[serde(rename = "timed", rename_all = "camelCase")]
    Timed {
        erc20_name: String,
        erc20_symbol: String,
        sale_start: u64,
        market_countdown: u64,
        minimum_market_eth: U256,
    },
}

/// Derive a ticker from a collection name: `$` followed by up to four
/// upper-case consonants and digits.
pub fn parse_name_into_symbol(name: &str) -> Result<String, PremintError> {
    if name.is_empty() {
        return Err(PremintError::ConfigError(
            "name must be provided to generate a symbol".to_string(),
        ));
    }

    let body: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| !matches!(c, 'A' | 'E' | 'I' | 'O' | 'U'))
        .take(4)
        .collect();

    if body.is_empty() {
        return Err(PremintError::ConfigError(
            "not enough valid characters to generate a symbol".to_string(),
        ));
    }

    Ok(format!("${body}"))
}

fn non_zero(value: Option<u64>) -> Option<u64> {
    value.filter(|v| *v != 0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Fill in defaults. No params at all means a timed sale named after the
/// contract.
pub fn sales_config_with_defaults(
    params: Option<SalesConfigParams>,
    contract_name: &str,
) -> Result<SalesConfig, PremintError> {
    let params = params.unwrap_or(SalesConfigParams::Timed(TimedParams::default()));

    Ok(match params {
        SalesConfigParams::FixedPrice(p) => SalesConfig::FixedPrice {
            price_per_token: p.price_per_token,
            sale_start: p.sale_start.unwrap_or(0),
            sale_end: p.sale_end.unwrap_or(SALE_END_FOREVER),
            max_tokens_per_address: p.max_tokens_per_address.unwrap_or(0),
        },
        SalesConfigParams::Erc20(p) => SalesConfig::Erc20 {
            currency: p.currency,
            price_per_token: p.price_per_token,
            sale_start: p.sale_start.unwrap_or(0),
            sale_end: p.sale_end.unwrap_or(SALE_END_FOREVER),
            max_tokens_per_address: p.max_tokens_per_address.unwrap_or(0),
        },
        SalesConfigParams::AllowList(p) => SalesConfig::AllowList {
            presale_merkle_root: p.presale_merkle_root,
            sale_start: p.sale_start.unwrap_or(0),
            sale_end: p.sale_end.unwrap_or(SALE_END_FOREVER),
        },
        SalesConfigParams::Timed(p) => {
            let erc20_name = non_empty(p.erc20_name).unwrap_or_else(|| contract_name.to_string());
            let erc20_symbol = match non_empty(p.erc20_symbol) {
                Some(symbol) => symbol,
                None => parse_name_into_symbol(&erc20_name)?,
            };
            SalesConfig::Timed {
                erc20_name,
                erc20_symbol,
                sale_start: p.sale_start.unwrap_or(0),
                market_countdown: non_zero(p.market_countdown).unwrap_or(DEFAULT_MARKET_COUNTDOWN),
                minimum_market_eth: p
                    .minimum_market_eth
                    .filter(|v| !v.is_zero())
                    .unwrap_or(DEFAULT_MINIMUM_MARKET_ETH),
            }
        }
    })
}
