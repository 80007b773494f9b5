use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use crate::executor::PremintExecutorReader;
use crate::recover::{parse_signature, try_recover_premint_signer, SignerRecovery};
use crate::{ContractCreationConfig, PremintConfigAndVersion, PremintError};

/// Result of [`is_valid_signature`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsValidSignatureReturn {
    pub is_authorized: bool,
    /// Present whenever a signer was recovered, authorized or not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovered_address: Option<Address>,
}

impl IsValidSignatureReturn {
    fn unauthorized() -> Self {
        Self {
            is_authorized: false,
            recovered_address: None,
        }
    }
}

/// Ask the executor whether `signer` may create `premint` on the collection.
///
/// V1 configs go through the legacy `isValidSignature` check, which re-hashes
/// the config on-chain and ignores `signer`. V2 configs go through
/// `isAuthorizedToCreatePremint`, which ignores `signature`. The two checks are
/// not interchangeable.
pub async fn is_authorized_to_create_premint<R: PremintExecutorReader>(
    reader: &R,
    collection: &ContractCreationConfig,
    collection_address: Address,
    signer: Address,
    premint: &PremintConfigAndVersion,
    signature: &Bytes,
) -> Result<bool, PremintError> {
    match premint {
        PremintConfigAndVersion::V1(config) => {
            tracing::debug!(%collection_address, uid = config.uid, "checking v1 premint signature");
            reader
                .is_valid_signature_v1(collection, config, signature)
                .await
        }
        PremintConfigAndVersion::V2(config) => {
            tracing::debug!(%collection_address, %signer, uid = config.uid, "checking v2 premint authorization");
            reader
                .is_authorized_to_create_premint(signer, collection.contractAdmin, collection_address)
                .await
        }
    }
}

/// Recover the premint signer and check it is authorized.
///
/// The verifying contract is the collection's deterministic address, resolved
/// from `collection` through the executor. A signature that cannot be
/// recovered yields `is_authorized: false` with no address rather than an
/// error; malformed signatures are rejected before any contract call.
pub async fn is_valid_signature<R: PremintExecutorReader>(
    reader: &R,
    collection: &ContractCreationConfig,
    premint: &PremintConfigAndVersion,
    signature: &Bytes,
    chain_id: u64,
) -> Result<IsValidSignatureReturn, PremintError> {
    if let Err(e) = parse_signature(signature) {
        tracing::warn!(error = %e, "rejecting malformed premint signature");
        return Ok(IsValidSignatureReturn::unauthorized());
    }

    let collection_address = reader.get_contract_address(collection).await?;

    let signer = match try_recover_premint_signer(premint, signature, chain_id, collection_address)
    {
        SignerRecovery::Recovered(signer) => signer,
        SignerRecovery::Failed { .. } => return Ok(IsValidSignatureReturn::unauthorized()),
    };

    let is_authorized = is_authorized_to_create_premint(
        reader,
        collection,
        collection_address,
        signer,
        premint,
        signature,
    )
    .await?;

    Ok(IsValidSignatureReturn {
        is_authorized,
        recovered_address: Some(signer),
    })
}
