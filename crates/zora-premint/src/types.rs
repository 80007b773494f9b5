//! Versioned premint schemas.
//!
//! Each schema version lives in its own namespace because the EIP-712 type
//! names (`CreatorAttribution`, `TokenCreationConfig`) are the same in every
//! version. The names are part of the type hash, so they must match the
//! contract exactly even though the field lists differ.

use std::fmt;
use std::str::FromStr;

use alloy::sol;
use serde::{Deserialize, Serialize};

use crate::PremintError;

sol! {
    /// Identifies who may deploy and administer a collection contract.
    #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct ContractCreationConfig {
        address contractAdmin;
        string contractURI;
        string contractName;
    }
}

/// Version 1 premint schema. The royalty recipient doubles as payout recipient.
pub mod v1 {
    use alloy::sol;
    use serde::{Deserialize, Serialize};

    sol! {
        #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
        struct TokenCreationConfig {
            string tokenURI;
            uint256 maxSupply;
            uint64 maxTokensPerAddress;
            uint96 pricePerToken;
            uint64 mintStart;
            uint64 mintDuration;
            uint32 royaltyMintSchedule;
            uint32 royaltyBPS;
            address royaltyRecipient;
            address fixedPriceMinter;
        }

        /// A premint config. `uid` scopes replacement: a signature with the same
        /// uid and a higher `version` supersedes an earlier one.
        #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
        struct CreatorAttribution {
            TokenCreationConfig tokenConfig;
            uint32 uid;
            uint32 version;
            bool deleted;
        }
    }
}

/// Version 2 premint schema with an explicit payout recipient and create referral.
pub mod v2 {
    use alloy::sol;
    use serde::{Deserialize, Serialize};

    sol! {
        #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
        struct TokenCreationConfig {
            string tokenURI;
            uint256 maxSupply;
            uint64 maxTokensPerAddress;
            uint96 pricePerToken;
            uint64 mintStart;
            uint64 mintDuration;
            uint32 royaltyBPS;
            address payoutRecipient;
            address fixedPriceMinter;
            address createReferral;
        }

        #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
        struct CreatorAttribution {
            TokenCreationConfig tokenConfig;
            uint32 uid;
            uint32 version;
            bool deleted;
        }
    }
}

/// The original unversioned contract-and-token attestation.
pub mod legacy {
    use alloy::sol;
    use serde::{Deserialize, Serialize};

    sol! {
        #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
        struct ContractCreationConfig {
            address contractAdmin;
            string contractURI;
            string contractName;
        }

        #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
        struct TokenCreationConfig {
            string tokenURI;
            uint256 maxSupply;
            uint64 maxTokensPerAddress;
            uint96 pricePerToken;
            uint64 saleDuration;
            uint32 royaltyMintSchedule;
            uint32 royaltyBPS;
            address royaltyRecipient;
        }

        #[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
        struct ContractAndToken {
            ContractCreationConfig contractConfig;
            TokenCreationConfig tokenConfig;
            uint256 uid;
        }
    }

    impl From<&super::ContractCreationConfig> for ContractCreationConfig {
        fn from(c: &super::ContractCreationConfig) -> Self {
            Self {
                contractAdmin: c.contractAdmin,
                contractURI: c.contractURI.clone(),
                contractName: c.contractName.clone(),
            }
        }
    }
}

/// Rust type of the `uint96` token price fields.
pub type U96 = alloy::primitives::Uint<96, 2>;

/// Premint config schema version, carried on the wire as `"1"` or `"2"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PremintConfigVersion {
    #[serde(rename = "1")]
    V1,
    #[serde(rename = "2")]
    V2,
}

impl PremintConfigVersion {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "1",
            Self::V2 => "2",
        }
    }
}

impl fmt::Display for PremintConfigVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PremintConfigVersion {
    type Err = PremintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Self::V1),
            "2" => Ok(Self::V2),
            other => Err(PremintError::InvalidVersion(format!(
                "'{other}' (expected \"1\" or \"2\")"
            ))),
        }
    }
}

/// A premint config tagged with its schema version.
///
/// Serialized as `{"premintConfigVersion": "1", "premintConfig": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "premintConfigVersion", content = "premintConfig")]
pub enum PremintConfigAndVersion {
    #[serde(rename = "1")]
    V1(v1::CreatorAttribution),
    #[serde(rename = "2")]
    V2(v2::CreatorAttribution),
}

impl PremintConfigAndVersion {
    /// Build from an untyped version tag and config payload. The version is
    /// validated before the payload is looked at.
    pub fn from_parts(
        version: &str,
        premint_config: serde_json::Value,
    ) -> Result<Self, PremintError> {
        let version: PremintConfigVersion = version.parse()?;
        Ok(match version {
            PremintConfigVersion::V1 => Self::V1(serde_json::from_value(premint_config)?),
            PremintConfigVersion::V2 => Self::V2(serde_json::from_value(premint_config)?),
        })
    }

    pub fn version(&self) -> PremintConfigVersion {
        match self {
            Self::V1(_) => PremintConfigVersion::V1,
            Self::V2(_) => PremintConfigVersion::V2,
        }
    }

    pub fn uid(&self) -> u32 {
        match self {
            Self::V1(c) => c.uid,
            Self::V2(c) => c.uid,
        }
    }

    pub fn is_deleted(&self) -> bool {
        match self {
            Self::V1(c) => c.deleted,
            Self::V2(c) => c.deleted,
        }
    }
}

impl From<v1::CreatorAttribution> for PremintConfigAndVersion {
    fn from(c: v1::CreatorAttribution) -> Self {
        Self::V1(c)
    }
}

impl From<v2::CreatorAttribution> for PremintConfigAndVersion {
    fn from(c: v2::CreatorAttribution) -> Self {
        Self::V2(c)
    }
}
