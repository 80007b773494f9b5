//! The premint executor contract as a read collaborator.
//!
//! - [`PremintExecutorReader`]: the contract reads authorization depends on
//! - [`PremintExecutor`]: implementation over an alloy [`Provider`]
//! - [`premint_calldata`]: calldata for executing a signed premint

use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::Provider;
use alloy::sol_types::SolCall;

use crate::mint::{compute_mint_costs, MintCosts};
use crate::types::{v1, v2};
use crate::IZoraCreator1155PremintExecutor as Executor;
use crate::{
    ChainConfig, ContractCreationConfig, PremintConfigAndVersion, PremintConfigVersion,
    PremintError,
};

impl From<&ContractCreationConfig> for Executor::ContractCreationConfig {
    fn from(c: &ContractCreationConfig) -> Self {
        Self {
            contractAdmin: c.contractAdmin,
            contractURI: c.contractURI.clone(),
            contractName: c.contractName.clone(),
        }
    }
}

impl From<&v1::CreatorAttribution> for Executor::PremintConfig {
    fn from(c: &v1::CreatorAttribution) -> Self {
        let t = &c.tokenConfig;
        Self {
            tokenConfig: Executor::TokenCreationConfig {
                tokenURI: t.tokenURI.clone(),
                maxSupply: t.maxSupply,
                maxTokensPerAddress: t.maxTokensPerAddress,
                pricePerToken: t.pricePerToken,
                mintStart: t.mintStart,
                mintDuration: t.mintDuration,
                royaltyMintSchedule: t.royaltyMintSchedule,
                royaltyBPS: t.royaltyBPS,
                royaltyRecipient: t.royaltyRecipient,
                fixedPriceMinter: t.fixedPriceMinter,
            },
            uid: c.uid,
            version: c.version,
            deleted: c.deleted,
        }
    }
}

impl From<&v2::CreatorAttribution> for Executor::PremintConfigV2 {
    fn from(c: &v2::CreatorAttribution) -> Self {
        let t = &c.tokenConfig;
        Self {
            tokenConfig: Executor::TokenCreationConfigV2 {
                tokenURI: t.tokenURI.clone(),
                maxSupply: t.maxSupply,
                maxTokensPerAddress: t.maxTokensPerAddress,
                pricePerToken: t.pricePerToken,
                mintStart: t.mintStart,
                mintDuration: t.mintDuration,
                royaltyBPS: t.royaltyBPS,
                payoutRecipient: t.payoutRecipient,
                fixedPriceMinter: t.fixedPriceMinter,
                createReferral: t.createReferral,
            },
            uid: c.uid,
            version: c.version,
            deleted: c.deleted,
        }
    }
}

/// Read-only calls against the premint executor.
///
/// Each method is a single independent `eth_call`. Transport errors surface
/// as [`PremintError::ChainError`]; nothing is retried here.
pub trait PremintExecutorReader: Send + Sync {
    /// Deterministic address of the collection a creation config deploys to.
    fn get_contract_address(
        &self,
        collection: &ContractCreationConfig,
    ) -> impl std::future::Future<Output = Result<Address, PremintError>> + Send;

    /// Legacy V1 check. The executor re-hashes the premint itself and
    /// verifies `signature` against the collection admin and its roles.
    fn is_valid_signature_v1(
        &self,
        collection: &ContractCreationConfig,
        premint: &v1::CreatorAttribution,
        signature: &Bytes,
    ) -> impl std::future::Future<Output = Result<bool, PremintError>> + Send;

    /// Capability check: may `signer` create premints on `contract_address`
    /// given the admin named in its creation config.
    fn is_authorized_to_create_premint(
        &self,
        signer: Address,
        contract_admin: Address,
        contract_address: Address,
    ) -> impl std::future::Future<Output = Result<bool, PremintError>> + Send;

    /// Premint config versions the collection at `contract_address` accepts.
    fn supported_premint_signature_versions(
        &self,
        contract_address: Address,
    ) -> impl std::future::Future<Output = Result<Vec<String>, PremintError>> + Send;
}

/// Premint executor reached through an alloy provider.
pub struct PremintExecutor<P> {
    provider: P,
    address: Address,
}

impl<P> PremintExecutor<P> {
    pub fn new(provider: P, address: Address) -> Self {
        Self { provider, address }
    }

    /// Use the executor address from a chain configuration.
    pub fn with_chain_config(provider: P, config: &ChainConfig) -> Self {
        Self::new(provider, config.addresses.premint_executor)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P> PremintExecutor<P>
where
    P: Provider + Send + Sync,
{
    /// Per-token mint fee the executor charges when executing a premint.
    pub async fn mint_fee(&self, collection_address: Address) -> Result<U256, PremintError> {
        let contract = Executor::new(self.address, &self.provider);
        contract
            .mintFee(collection_address)
            .call()
            .await
            .map_err(|e| PremintError::ChainError(format!("mintFee failed: {e}")))
    }

    /// Cost of executing `premint` and minting `quantity` tokens.
    pub async fn premint_costs(
        &self,
        collection_address: Address,
        premint: &PremintConfigAndVersion,
        quantity: U256,
    ) -> Result<MintCosts, PremintError> {
        let fee = self.mint_fee(collection_address).await?;
        let price = match premint {
            PremintConfigAndVersion::V1(c) => U256::from(c.tokenConfig.pricePerToken),
            PremintConfigAndVersion::V2(c) => U256::from(c.tokenConfig.pricePerToken),
        };
        compute_mint_costs(fee, price, quantity)
    }
}

impl<P> PremintExecutorReader for PremintExecutor<P>
where
    P: Provider + Send + Sync,
{
    async fn get_contract_address(
        &self,
        collection: &ContractCreationConfig,
    ) -> Result<Address, PremintError> {
        let contract = Executor::new(self.address, &self.provider);
        contract
            .getContractAddress(collection.into())
            .call()
            .await
            .map_err(|e| PremintError::ChainError(format!("getContractAddress failed: {e}")))
    }

    async fn is_valid_signature_v1(
        &self,
        collection: &ContractCreationConfig,
        premint: &v1::CreatorAttribution,
        signature: &Bytes,
    ) -> Result<bool, PremintError> {
        let contract = Executor::new(self.address, &self.provider);
        let result = contract
            .isValidSignature(collection.into(), premint.into(), signature.clone())
            .call()
            .await
            .map_err(|e| PremintError::ChainError(format!("isValidSignature failed: {e}")))?;
        Ok(result.isValid)
    }

    async fn is_authorized_to_create_premint(
        &self,
        signer: Address,
        contract_admin: Address,
        contract_address: Address,
    ) -> Result<bool, PremintError> {
        let contract = Executor::new(self.address, &self.provider);
        contract
            .isAuthorizedToCreatePremint(signer, contract_admin, contract_address)
            .call()
            .await
            .map_err(|e| {
                PremintError::ChainError(format!("isAuthorizedToCreatePremint failed: {e}"))
            })
    }

    async fn supported_premint_signature_versions(
        &self,
        contract_address: Address,
    ) -> Result<Vec<String>, PremintError> {
        let contract = Executor::new(self.address, &self.provider);
        contract
            .supportedPremintSignatureVersions(contract_address)
            .call()
            .await
            .map_err(|e| {
                PremintError::ChainError(format!("supportedPremintSignatureVersions failed: {e}"))
            })
    }
}

/// Whether the collection at `contract_address` accepts premints of `version`.
pub async fn supports_premint_version<R: PremintExecutorReader>(
    reader: &R,
    version: PremintConfigVersion,
    contract_address: Address,
) -> Result<bool, PremintError> {
    let supported = reader
        .supported_premint_signature_versions(contract_address)
        .await?;
    Ok(supported.iter().any(|v| v == version.as_str()))
}

/// Mint parameters passed along when a premint is executed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MintArguments {
    pub mint_recipient: Address,
    pub mint_comment: String,
    pub mint_rewards_recipients: Vec<Address>,
}

impl From<&MintArguments> for Executor::MintArguments {
    fn from(args: &MintArguments) -> Self {
        Self {
            mintRecipient: args.mint_recipient,
            mintComment: args.mint_comment.clone(),
            mintRewardsRecipients: args.mint_rewards_recipients.clone(),
        }
    }
}

/// Calldata for `premintV1`/`premintV2`, selected by the config version.
pub fn premint_calldata(
    collection: &ContractCreationConfig,
    premint: &PremintConfigAndVersion,
    signature: Bytes,
    quantity_to_mint: U256,
    mint_arguments: &MintArguments,
) -> Bytes {
    let encoded = match premint {
        PremintConfigAndVersion::V1(c) => Executor::premintV1Call {
            contractConfig: collection.into(),
            premintConfig: c.into(),
            signature,
            quantityToMint: quantity_to_mint,
            mintArguments: mint_arguments.into(),
        }
        .abi_encode(),
        PremintConfigAndVersion::V2(c) => Executor::premintV2Call {
            contractConfig: collection.into(),
            premintConfig: c.into(),
            signature,
            quantityToMint: quantity_to_mint,
            mintArguments: mint_arguments.into(),
        }
        .abi_encode(),
    };
    encoded.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::U96;
    use alloy::sol_types::SolValue;

    fn collection() -> ContractCreationConfig {
        ContractCreationConfig {
            contractAdmin: Address::repeat_byte(0x0a),
            contractURI: "ipfs://collection".to_string(),
            contractName: "Collection".to_string(),
        }
    }

    fn v2_premint() -> v2::CreatorAttribution {
        v2::CreatorAttribution {
            tokenConfig: v2::TokenCreationConfig {
                tokenURI: "ipfs://token".to_string(),
                maxSupply: U256::from(1000u64),
                maxTokensPerAddress: 3,
                pricePerToken: U96::from(1_000u64),
                mintStart: 0,
                mintDuration: 0,
                royaltyBPS: 500,
                payoutRecipient: Address::repeat_byte(0x0b),
                fixedPriceMinter: Address::repeat_byte(0x0c),
                createReferral: Address::repeat_byte(0x0d),
            },
            uid: 9,
            version: 1,
            deleted: false,
        }
    }

    #[test]
    fn test_abi_struct_encodes_like_schema_struct() {
        // The ABI type and the EIP-712 type have identical layouts.
        let premint = v2_premint();
        let abi: Executor::PremintConfigV2 = (&premint).into();
        assert_eq!(abi.abi_encode(), premint.abi_encode());

        let c = collection();
        let abi_collection: Executor::ContractCreationConfig = (&c).into();
        assert_eq!(abi_collection.abi_encode(), c.abi_encode());
    }

    #[test]
    fn test_premint_calldata_selects_function_by_version() {
        let c = collection();
        let args = MintArguments {
            mint_recipient: Address::repeat_byte(0x0e),
            mint_comment: "gm".to_string(),
            mint_rewards_recipients: vec![Address::repeat_byte(0x0f)],
        };
        let v2 = PremintConfigAndVersion::V2(v2_premint());
        let data = premint_calldata(&c, &v2, Bytes::from(vec![1u8; 65]), U256::from(1u64), &args);
        assert_eq!(&data[..4], Executor::premintV2Call::SELECTOR.as_slice());

        let decoded = Executor::premintV2Call::abi_decode(&data).unwrap();
        assert_eq!(decoded.quantityToMint, U256::from(1u64));
        assert_eq!(decoded.premintConfig.uid, 9);
        assert_eq!(decoded.mintArguments.mintComment, "gm");
    }
}
