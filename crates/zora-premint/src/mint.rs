//! Mint costs and mint transaction parameters for Zora 1155 and 721 tokens.

use alloy::primitives::{Address, Bytes, TxKind, U256, U512};
use alloy::providers::Provider;
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy::sol_types::{SolCall, SolValue};
use serde::{Deserialize, Serialize};

use crate::{ChainConfig, PremintError, IZora721, IZoraCreator1155};

/// Collection a mintable token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintableCollection {
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintContext {
    pub mint_context_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativePrice {
    /// Price per token in wei, as a decimal string.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintableCost {
    pub native_price: NativePrice,
}

/// A token as described by the Zora mintables API. Only the fields minting
/// depends on are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mintable {
    pub collection: MintableCollection,
    pub contract_address: Address,
    #[serde(default)]
    pub token_id: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub mint_context: Option<MintContext>,
    pub cost: MintableCost,
}

impl Mintable {
    /// Price per token in wei.
    pub fn price_per_token(&self) -> Result<U256, PremintError> {
        self.cost.native_price.raw.parse::<U256>().map_err(|e| {
            PremintError::MintError(format!(
                "invalid native price '{}': {e}",
                self.cost.native_price.raw
            ))
        })
    }

    pub fn token_id(&self) -> Result<U256, PremintError> {
        let raw = self
            .token_id
            .as_deref()
            .ok_or_else(|| PremintError::MintError("mintable has no token id".to_string()))?;
        raw.parse::<U256>()
            .map_err(|e| PremintError::MintError(format!("invalid token id '{raw}': {e}")))
    }
}

/// Token standard of a mintable, from its mint context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintContextType {
    /// `zora_create`: a 721 drop.
    ZoraCreate,
    /// `zora_create_1155`: a token on a 1155 collection.
    ZoraCreate1155,
}

impl MintContextType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ZoraCreate => "zora_create",
            Self::ZoraCreate1155 => "zora_create_1155",
        }
    }
}

/// Check that a mintable exists, is active and is of a supported type.
pub fn validate_mintable_and_get_context_type(
    mintable: Option<&Mintable>,
) -> Result<MintContextType, PremintError> {
    let mintable = mintable.ok_or_else(|| PremintError::MintError("no mintable found".to_string()))?;

    if !mintable.is_active {
        return Err(PremintError::InactiveMint(
            "minting token is inactive".to_string(),
        ));
    }

    let context = mintable
        .mint_context
        .as_ref()
        .ok_or_else(|| PremintError::MintError("no minting context data".to_string()))?;

    match context.mint_context_type.as_str() {
        "zora_create" => Ok(MintContextType::ZoraCreate),
        "zora_create_1155" => Ok(MintContextType::ZoraCreate1155),
        other => Err(PremintError::UnsupportedMintType(format!(
            "mintable type {other} is currently unsupported"
        ))),
    }
}

/// Fee, purchase cost and total for minting some quantity of a token, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintCosts {
    pub mint_fee: U256,
    pub token_purchase_cost: U256,
    pub total_cost: U256,
}

/// `fee = per_unit_fee * quantity`, `purchase = per_unit_price * quantity`,
/// `total = fee + purchase`.
///
/// Products and the sum are computed in 512 bits, so no intermediate value
/// wraps. A result that does not fit a `uint256` cannot be sent as a
/// transaction value and is reported as [`PremintError::CostOverflow`].
pub fn compute_mint_costs(
    per_unit_fee: U256,
    per_unit_price: U256,
    quantity: U256,
) -> Result<MintCosts, PremintError> {
    let quantity = U512::from(quantity);
    let fee = U512::from(per_unit_fee) * quantity;
    let purchase = U512::from(per_unit_price) * quantity;
    let total = fee + purchase;

    Ok(MintCosts {
        mint_fee: narrow(fee, "mint fee")?,
        token_purchase_cost: narrow(purchase, "token purchase cost")?,
        total_cost: narrow(total, "total cost")?,
    })
}

fn narrow(value: U512, what: &str) -> Result<U256, PremintError> {
    U256::checked_from_uint(value)
        .ok_or_else(|| PremintError::CostOverflow(format!("{what} {value} exceeds uint256")))
}

/// Per-token protocol fee of a 1155 collection.
pub async fn get_1155_mint_fee<P: Provider>(
    provider: &P,
    collection_address: Address,
) -> Result<U256, PremintError> {
    IZoraCreator1155::new(collection_address, provider)
        .mintFee()
        .call()
        .await
        .map_err(|e| PremintError::ChainError(format!("mintFee failed: {e}")))
}

/// Per-token protocol fee of a 721 drop.
pub async fn get_721_mint_fee<P: Provider>(
    provider: &P,
    contract_address: Address,
) -> Result<U256, PremintError> {
    let result = IZora721::new(contract_address, provider)
        .zoraFeeForAmount(U256::from(1u64))
        .call()
        .await
        .map_err(|e| PremintError::ChainError(format!("zoraFeeForAmount failed: {e}")))?;
    Ok(result._1)
}

pub async fn get_1155_mint_costs<P: Provider>(
    provider: &P,
    mintable: &Mintable,
    quantity: U256,
) -> Result<MintCosts, PremintError> {
    let fee = get_1155_mint_fee(provider, mintable.collection.address).await?;
    compute_mint_costs(fee, mintable.price_per_token()?, quantity)
}

pub async fn get_721_mint_costs<P: Provider>(
    provider: &P,
    mintable: &Mintable,
    quantity: U256,
) -> Result<MintCosts, PremintError> {
    let fee = get_721_mint_fee(provider, mintable.collection.address).await?;
    compute_mint_costs(fee, mintable.price_per_token()?, quantity)
}

/// Mint costs for any supported mintable.
pub async fn get_mint_costs<P: Provider>(
    provider: &P,
    mintable: &Mintable,
    quantity: U256,
) -> Result<MintCosts, PremintError> {
    match validate_mintable_and_get_context_type(Some(mintable))? {
        MintContextType::ZoraCreate1155 => get_1155_mint_costs(provider, mintable, quantity).await,
        MintContextType::ZoraCreate => get_721_mint_costs(provider, mintable, quantity).await,
    }
}

/// Caller-facing mint parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintArgs {
    pub quantity_to_mint: U256,
    pub mint_comment: Option<String>,
    pub mint_referral: Option<Address>,
    pub mint_to_address: Address,
}

/// A mint transaction ready to simulate or send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedMint {
    pub to: Address,
    pub from: Address,
    pub value: U256,
    pub input: Bytes,
    pub costs: MintCosts,
}

impl PreparedMint {
    pub fn into_transaction_request(self) -> TransactionRequest {
        TransactionRequest {
            from: Some(self.from),
            to: Some(TxKind::Call(self.to)),
            value: Some(self.value),
            input: TransactionInput::new(self.input),
            ..Default::default()
        }
    }
}

/// Calldata for the 1155 `mintWithRewards` through a fixed price minter.
/// The minter arguments are `abi.encode(address recipient, string comment)`.
pub fn mint_1155_calldata(minter: Address, token_id: U256, args: &MintArgs) -> Bytes {
    let comment = args.mint_comment.clone().unwrap_or_default();
    let minter_arguments = (args.mint_to_address, comment).abi_encode_params();

    IZoraCreator1155::mintWithRewardsCall {
        minter,
        tokenId: token_id,
        quantity: args.quantity_to_mint,
        minterArguments: minter_arguments.into(),
        mintReferral: args.mint_referral.unwrap_or(Address::ZERO),
    }
    .abi_encode()
    .into()
}

/// Calldata for the 721 `mintWithRewards`.
pub fn mint_721_calldata(args: &MintArgs) -> Bytes {
    IZora721::mintWithRewardsCall {
        recipient: args.mint_to_address,
        quantity: args.quantity_to_mint,
        comment: args.mint_comment.clone().unwrap_or_default(),
        mintReferral: args.mint_referral.unwrap_or(Address::ZERO),
    }
    .abi_encode()
    .into()
}

/// Build the mint transaction for `mintable`, priced from current contract
/// state. `fixed_price_minter` overrides the chain's default sale strategy for
/// 1155 tokens.
pub async fn prepare_mint<P: Provider>(
    provider: &P,
    config: &ChainConfig,
    minter_account: Address,
    mintable: &Mintable,
    args: &MintArgs,
    fixed_price_minter: Option<Address>,
) -> Result<PreparedMint, PremintError> {
    let context_type = validate_mintable_and_get_context_type(Some(mintable))?;

    let prepared = match context_type {
        MintContextType::ZoraCreate1155 => {
            let costs = get_1155_mint_costs(provider, mintable, args.quantity_to_mint).await?;
            let minter =
                fixed_price_minter.unwrap_or(config.addresses.fixed_price_sale_strategy);
            PreparedMint {
                to: mintable.collection.address,
                from: minter_account,
                value: costs.total_cost,
                input: mint_1155_calldata(minter, mintable.token_id()?, args),
                costs,
            }
        }
        MintContextType::ZoraCreate => {
            let costs = get_721_mint_costs(provider, mintable, args.quantity_to_mint).await?;
            PreparedMint {
                to: mintable.contract_address,
                from: minter_account,
                value: costs.total_cost,
                input: mint_721_calldata(args),
                costs,
            }
        }
    };

    tracing::debug!(
        to = %prepared.to,
        value = %prepared.value,
        mint_type = context_type.as_str(),
        "prepared mint"
    );
    Ok(prepared)
}
