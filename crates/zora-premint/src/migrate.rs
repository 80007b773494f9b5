use alloy::primitives::Address;

use crate::types::{v1, v2};

/// Convert a V1 premint config to the V2 schema.
///
/// `royaltyRecipient` becomes `payoutRecipient` and `createReferral` is taken
/// from the caller (zero address when `None`). `royaltyMintSchedule` has no V2
/// counterpart and is dropped; that loss is intended.
pub fn migrate_premint_config_to_v2(
    premint: &v1::CreatorAttribution,
    create_referral: Option<Address>,
) -> v2::CreatorAttribution {
    let t = &premint.tokenConfig;
    v2::CreatorAttribution {
        tokenConfig: v2::TokenCreationConfig {
            tokenURI: t.tokenURI.clone(),
            maxSupply: t.maxSupply,
            maxTokensPerAddress: t.maxTokensPerAddress,
            pricePerToken: t.pricePerToken,
            mintStart: t.mintStart,
            mintDuration: t.mintDuration,
            royaltyBPS: t.royaltyBPS,
            payoutRecipient: t.royaltyRecipient,
            fixedPriceMinter: t.fixedPriceMinter,
            createReferral: create_referral.unwrap_or(Address::ZERO),
        },
        uid: premint.uid,
        version: premint.version,
        deleted: premint.deleted,
    }
}
