//! Premint signer recovery.
//!
//! Two paths that agree on identical inputs:
//! - from the premint config and signature ([`recover_premint_signer`])
//! - from the fields of an on-chain `CreatorAttribution` event
//!   ([`recover_creator_from_creator_attribution`]), which only carries the
//!   pre-hashed struct, so the digest is rebuilt from its parts

use std::borrow::Cow;

use alloy::primitives::{keccak256, Address, Bytes, Signature, B256, U256};
use alloy::sol_types::Eip712Domain;
use serde::{Deserialize, Serialize};

use crate::eip712::premint_signing_hash;
use crate::{IZoraCreator1155, PremintConfigAndVersion, PremintError};

/// EIP-191 prefix for structured data (`0x19` version byte `0x01`).
pub const EIP712_PREFIX: [u8; 2] = [0x19, 0x01];

/// secp256k1 curve order N / 2. The contracts use OpenZeppelin's ECDSA, which
/// rejects s above this (EIP-2).
const SECP256K1_N_DIV_2: U256 = U256::from_limbs([
    0xDFE92F46681B20A0,
    0x5D576E7357A4501D,
    0xFFFFFFFFFFFFFFFF,
    0x7FFFFFFFFFFFFFFF,
]);

/// Parse a 65-byte `r ‖ s ‖ v` signature.
pub fn parse_signature(signature: &[u8]) -> Result<Signature, PremintError> {
    if signature.len() != 65 {
        return Err(PremintError::SignatureError(format!(
            "signature must be 65 bytes, got {}",
            signature.len()
        )));
    }

    let sig = Signature::from_raw(signature)
        .map_err(|e| PremintError::SignatureError(format!("invalid signature: {e}")))?;

    if sig.s() > SECP256K1_N_DIV_2 {
        return Err(PremintError::SignatureError(
            "high-s signature rejected (EIP-2 malleability)".to_string(),
        ));
    }

    Ok(sig)
}

/// Recover the signer of a prehashed EIP-712 digest.
pub fn recover_signer_from_digest(digest: B256, signature: &[u8]) -> Result<Address, PremintError> {
    let sig = parse_signature(signature)?;
    sig.recover_address_from_prehash(&digest)
        .map_err(|e| PremintError::SignatureError(format!("recovery failed: {e}")))
}

/// Recover the address that signed `premint` for the collection at
/// `verifying_contract` on `chain_id`.
pub fn recover_premint_signer(
    premint: &PremintConfigAndVersion,
    signature: &[u8],
    chain_id: u64,
    verifying_contract: Address,
) -> Result<Address, PremintError> {
    let digest = premint_signing_hash(premint, chain_id, verifying_contract);
    recover_signer_from_digest(digest, signature)
}

/// Outcome of a recovery attempt that must not fail the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerRecovery {
    Recovered(Address),
    Failed { reason: String },
}

impl SignerRecovery {
    pub fn address(&self) -> Option<Address> {
        match self {
            Self::Recovered(addr) => Some(*addr),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }
}

impl From<Result<Address, PremintError>> for SignerRecovery {
    fn from(result: Result<Address, PremintError>) -> Self {
        match result {
            Ok(addr) => Self::Recovered(addr),
            Err(e) => Self::Failed {
                reason: e.to_string(),
            },
        }
    }
}

/// Like [`recover_premint_signer`], but reports failure as a value.
pub fn try_recover_premint_signer(
    premint: &PremintConfigAndVersion,
    signature: &[u8],
    chain_id: u64,
    verifying_contract: Address,
) -> SignerRecovery {
    let recovery: SignerRecovery =
        recover_premint_signer(premint, signature, chain_id, verifying_contract).into();
    if let SignerRecovery::Failed { reason } = &recovery {
        tracing::warn!(
            version = %premint.version(),
            uid = premint.uid(),
            %reason,
            "premint signer recovery failed"
        );
    }
    recovery
}

/// Fields of the `CreatorAttribution` event emitted by a 1155 contract when a
/// premint is executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorAttributionEvent {
    pub struct_hash: B256,
    pub domain_name: String,
    pub version: String,
    pub creator: Address,
    pub signature: Bytes,
}

impl From<IZoraCreator1155::CreatorAttribution> for CreatorAttributionEvent {
    fn from(event: IZoraCreator1155::CreatorAttribution) -> Self {
        Self {
            struct_hash: event.structHash,
            domain_name: event.domainName,
            version: event.version,
            creator: event.creator,
            signature: event.signature,
        }
    }
}

/// `keccak256(0x1901 ‖ domainSeparator ‖ structHash)` with the domain rebuilt
/// from its emitted parts.
pub fn creator_attribution_digest(
    domain_name: &str,
    version: &str,
    chain_id: u64,
    verifying_contract: Address,
    struct_hash: B256,
) -> B256 {
    let domain = Eip712Domain {
        name: Some(Cow::Owned(domain_name.to_string())),
        version: Some(Cow::Owned(version.to_string())),
        chain_id: Some(U256::from(chain_id)),
        verifying_contract: Some(verifying_contract),
        salt: None,
    };

    let mut preimage = [0u8; 66];
    preimage[..2].copy_from_slice(&EIP712_PREFIX);
    preimage[2..34].copy_from_slice(domain.separator().as_slice());
    preimage[34..].copy_from_slice(struct_hash.as_slice());
    keccak256(preimage)
}

/// Recover the signer behind a `CreatorAttribution` event emitted by
/// `token_contract` on `chain_id`.
pub fn recover_creator_from_creator_attribution(
    event: &CreatorAttributionEvent,
    chain_id: u64,
    token_contract: Address,
) -> Result<Address, PremintError> {
    let digest = creator_attribution_digest(
        &event.domain_name,
        &event.version,
        chain_id,
        token_contract,
        event.struct_hash,
    );
    recover_signer_from_digest(digest, &event.signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_order_constant() {
        // N = 2 * (N / 2) + 1
        let n = U256::from_str_radix(
            "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
            16,
        )
        .unwrap();
        assert_eq!(SECP256K1_N_DIV_2, n >> 1);
    }

    #[test]
    fn test_parse_signature_length() {
        for len in [0usize, 1, 64, 66, 130] {
            let err = parse_signature(&vec![1u8; len]).unwrap_err();
            assert!(matches!(err, PremintError::SignatureError(_)), "len {len}");
        }
    }

    #[test]
    fn test_signer_recovery_from_result() {
        let ok: SignerRecovery = Ok(Address::repeat_byte(0x05)).into();
        assert_eq!(ok.address(), Some(Address::repeat_byte(0x05)));
        assert!(ok.is_recovered());

        let failed: SignerRecovery =
            Err(PremintError::SignatureError("bad".to_string())).into();
        assert_eq!(failed.address(), None);
        assert!(!failed.is_recovered());
    }

    #[test]
    fn test_digest_prefix_layout() {
        let struct_hash = B256::repeat_byte(0x42);
        let contract = Address::repeat_byte(0x01);
        let digest = creator_attribution_digest("Preminter", "2", 7777777, contract, struct_hash);

        let domain = crate::eip712::premint_domain(
            crate::PremintConfigVersion::V2,
            7777777,
            contract,
        );
        let mut manual = Vec::new();
        manual.extend_from_slice(&[0x19, 0x01]);
        manual.extend_from_slice(domain.separator().as_slice());
        manual.extend_from_slice(struct_hash.as_slice());
        assert_eq!(digest, keccak256(manual));
    }
}
