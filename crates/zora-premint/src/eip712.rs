//! EIP-712 typed data for premint signatures.
//!
//! Provides:
//! - The hard-coded type tables for each schema ([`V1_TYPES`], [`V2_TYPES`],
//!   [`CONTRACT_AND_TOKEN_TYPES`])
//! - Domain construction ([`premint_domain`])
//! - Typed-data builders ([`premint_typed_data`], [`contract_and_token_typed_data`])
//! - Digest helpers ([`premint_signing_hash`], [`premint_struct_hash`])

use std::borrow::Cow;
use std::collections::BTreeSet;

use alloy::dyn_abi::TypedData;
use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::{Eip712Domain, SolStruct};
use serde_json::{json, Map, Value};

use crate::types::{legacy, v1, v2, ContractCreationConfig};
use crate::{
    PremintConfigAndVersion, PremintConfigVersion, PremintError,
    LEGACY_PREMINTER_DOMAIN_VERSION, PREMINTER_DOMAIN_NAME,
};

/// Primary type of every versioned premint signature.
pub const CREATOR_ATTRIBUTION: &str = "CreatorAttribution";

/// Primary type of the legacy contract-and-token attestation.
pub const CONTRACT_AND_TOKEN: &str = "ContractAndToken";

/// One member of an EIP-712 struct type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypedField {
    pub name: &'static str,
    pub ty: &'static str,
}

const fn field(name: &'static str, ty: &'static str) -> TypedField {
    TypedField { name, ty }
}

/// Struct name to ordered member list. Member order is part of the hash.
pub type TypeTable = &'static [(&'static str, &'static [TypedField])];

pub const EIP712_DOMAIN_FIELDS: &[TypedField] = &[
    field("name", "string"),
    field("version", "string"),
    field("chainId", "uint256"),
    field("verifyingContract", "address"),
];

const CREATOR_ATTRIBUTION_FIELDS: &[TypedField] = &[
    field("tokenConfig", "TokenCreationConfig"),
    field("uid", "uint32"),
    field("version", "uint32"),
    field("deleted", "bool"),
];

pub const V1_TYPES: TypeTable = &[
    (CREATOR_ATTRIBUTION, CREATOR_ATTRIBUTION_FIELDS),
    (
        "TokenCreationConfig",
        &[
            field("tokenURI", "string"),
            field("maxSupply", "uint256"),
            field("maxTokensPerAddress", "uint64"),
            field("pricePerToken", "uint96"),
            field("mintStart", "uint64"),
            field("mintDuration", "uint64"),
            field("royaltyMintSchedule", "uint32"),
            field("royaltyBPS", "uint32"),
            field("royaltyRecipient", "address"),
            field("fixedPriceMinter", "address"),
        ],
    ),
];

pub const V2_TYPES: TypeTable = &[
    (CREATOR_ATTRIBUTION, CREATOR_ATTRIBUTION_FIELDS),
    (
        "TokenCreationConfig",
        &[
            field("tokenURI", "string"),
            field("maxSupply", "uint256"),
            field("maxTokensPerAddress", "uint64"),
            field("pricePerToken", "uint96"),
            field("mintStart", "uint64"),
            field("mintDuration", "uint64"),
            field("royaltyBPS", "uint32"),
            field("payoutRecipient", "address"),
            field("fixedPriceMinter", "address"),
            field("createReferral", "address"),
        ],
    ),
];

pub const CONTRACT_AND_TOKEN_TYPES: TypeTable = &[
    (
        CONTRACT_AND_TOKEN,
        &[
            field("contractConfig", "ContractCreationConfig"),
            field("tokenConfig", "TokenCreationConfig"),
            field("uid", "uint256"),
        ],
    ),
    (
        "ContractCreationConfig",
        &[
            field("contractAdmin", "address"),
            field("contractURI", "string"),
            field("contractName", "string"),
        ],
    ),
    (
        "TokenCreationConfig",
        &[
            field("tokenURI", "string"),
            field("maxSupply", "uint256"),
            field("maxTokensPerAddress", "uint64"),
            field("pricePerToken", "uint96"),
            field("saleDuration", "uint64"),
            field("royaltyMintSchedule", "uint32"),
            field("royaltyBPS", "uint32"),
            field("royaltyRecipient", "address"),
        ],
    ),
];

/// The type table for a schema version.
pub fn types_for(version: PremintConfigVersion) -> TypeTable {
    match version {
        PremintConfigVersion::V1 => V1_TYPES,
        PremintConfigVersion::V2 => V2_TYPES,
    }
}

fn fields_of(table: TypeTable, name: &str) -> Option<&'static [TypedField]> {
    table.iter().find(|(n, _)| *n == name).map(|(_, fields)| *fields)
}

fn collect_dependencies(table: TypeTable, name: &str, found: &mut BTreeSet<&'static str>) {
    let Some(fields) = fields_of(table, name) else {
        return;
    };
    for f in fields {
        let base = f.ty.trim_end_matches("[]");
        if let Some((dep, _)) = table.iter().find(|(n, _)| *n == base) {
            if found.insert(*dep) {
                collect_dependencies(table, dep, found);
            }
        }
    }
}

fn encode_struct(name: &str, fields: &[TypedField]) -> String {
    let members: Vec<String> = fields.iter().map(|f| format!("{} {}", f.ty, f.name)).collect();
    format!("{name}({})", members.join(","))
}

/// EIP-712 `encodeType` for `primary`: the primary struct followed by every
/// referenced struct in alphabetical order. `None` if `primary` is not in `table`.
pub fn encode_type(table: TypeTable, primary: &str) -> Option<String> {
    let primary_fields = fields_of(table, primary)?;
    let mut deps = BTreeSet::new();
    collect_dependencies(table, primary, &mut deps);
    deps.remove(primary);

    let mut out = encode_struct(primary, primary_fields);
    for dep in deps {
        if let Some(fields) = fields_of(table, dep) {
            out.push_str(&encode_struct(dep, fields));
        }
    }
    Some(out)
}

/// Build the premint EIP-712 domain. The domain version is the schema version.
pub fn premint_domain(
    version: PremintConfigVersion,
    chain_id: u64,
    verifying_contract: Address,
) -> Eip712Domain {
    domain(version.as_str(), chain_id, verifying_contract)
}

fn domain(version: &'static str, chain_id: u64, verifying_contract: Address) -> Eip712Domain {
    Eip712Domain {
        name: Some(Cow::Borrowed(PREMINTER_DOMAIN_NAME)),
        version: Some(Cow::Borrowed(version)),
        chain_id: Some(U256::from(chain_id)),
        verifying_contract: Some(verifying_contract),
        salt: None,
    }
}

/// The message being signed, one variant per type table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedMessage {
    V1(v1::CreatorAttribution),
    V2(v2::CreatorAttribution),
    ContractAndToken(legacy::ContractAndToken),
}

impl TypedMessage {
    /// `hashStruct(message)`; the value the contracts emit as `structHash`.
    pub fn struct_hash(&self) -> B256 {
        match self {
            Self::V1(m) => m.eip712_hash_struct(),
            Self::V2(m) => m.eip712_hash_struct(),
            Self::ContractAndToken(m) => m.eip712_hash_struct(),
        }
    }

    /// Message in `eth_signTypedData_v4` JSON form. Integers are decimal
    /// strings so `uint96` and `uint256` values survive JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Self::V1(m) => {
                let t = &m.tokenConfig;
                json!({
                    "tokenConfig": {
                        "tokenURI": t.tokenURI,
                        "maxSupply": t.maxSupply.to_string(),
                        "maxTokensPerAddress": t.maxTokensPerAddress.to_string(),
                        "pricePerToken": t.pricePerToken.to_string(),
                        "mintStart": t.mintStart.to_string(),
                        "mintDuration": t.mintDuration.to_string(),
                        "royaltyMintSchedule": t.royaltyMintSchedule.to_string(),
                        "royaltyBPS": t.royaltyBPS.to_string(),
                        "royaltyRecipient": t.royaltyRecipient,
                        "fixedPriceMinter": t.fixedPriceMinter,
                    },
                    "uid": m.uid.to_string(),
                    "version": m.version.to_string(),
                    "deleted": m.deleted,
                })
            }
            Self::V2(m) => {
                let t = &m.tokenConfig;
                json!({
                    "tokenConfig": {
                        "tokenURI": t.tokenURI,
                        "maxSupply": t.maxSupply.to_string(),
                        "maxTokensPerAddress": t.maxTokensPerAddress.to_string(),
                        "pricePerToken": t.pricePerToken.to_string(),
                        "mintStart": t.mintStart.to_string(),
                        "mintDuration": t.mintDuration.to_string(),
                        "royaltyBPS": t.royaltyBPS.to_string(),
                        "payoutRecipient": t.payoutRecipient,
                        "fixedPriceMinter": t.fixedPriceMinter,
                        "createReferral": t.createReferral,
                    },
                    "uid": m.uid.to_string(),
                    "version": m.version.to_string(),
                    "deleted": m.deleted,
                })
            }
            Self::ContractAndToken(m) => {
                let c = &m.contractConfig;
                let t = &m.tokenConfig;
                json!({
                    "contractConfig": {
                        "contractAdmin": c.contractAdmin,
                        "contractURI": c.contractURI,
                        "contractName": c.contractName,
                    },
                    "tokenConfig": {
                        "tokenURI": t.tokenURI,
                        "maxSupply": t.maxSupply.to_string(),
                        "maxTokensPerAddress": t.maxTokensPerAddress.to_string(),
                        "pricePerToken": t.pricePerToken.to_string(),
                        "saleDuration": t.saleDuration.to_string(),
                        "royaltyMintSchedule": t.royaltyMintSchedule.to_string(),
                        "royaltyBPS": t.royaltyBPS.to_string(),
                        "royaltyRecipient": t.royaltyRecipient,
                    },
                    "uid": m.uid.to_string(),
                })
            }
        }
    }
}

/// A complete signing payload: domain, types, primary type and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremintTypedData {
    pub domain: Eip712Domain,
    pub types: TypeTable,
    pub primary_type: &'static str,
    pub message: TypedMessage,
}

impl PremintTypedData {
    /// The EIP-712 digest a wallet signs.
    pub fn signing_hash(&self) -> B256 {
        match &self.message {
            TypedMessage::V1(m) => m.eip712_signing_hash(&self.domain),
            TypedMessage::V2(m) => m.eip712_signing_hash(&self.domain),
            TypedMessage::ContractAndToken(m) => m.eip712_signing_hash(&self.domain),
        }
    }

    pub fn struct_hash(&self) -> B256 {
        self.message.struct_hash()
    }

    /// The payload as `eth_signTypedData_v4` JSON.
    pub fn to_json(&self) -> Value {
        let mut types = Map::new();
        types.insert("EIP712Domain".to_string(), fields_json(EIP712_DOMAIN_FIELDS));
        for (name, fields) in self.types {
            types.insert((*name).to_string(), fields_json(fields));
        }

        json!({
            "types": types,
            "primaryType": self.primary_type,
            "domain": {
                "name": self.domain.name.as_deref(),
                "version": self.domain.version.as_deref(),
                "chainId": self.domain.chain_id.map(|id| id.saturating_to::<u64>()),
                "verifyingContract": self.domain.verifying_contract,
            },
            "message": self.message.to_json(),
        })
    }

    /// The payload as a dynamically typed [`TypedData`], for wallets and
    /// signers that take the JSON form.
    pub fn to_typed_data(&self) -> Result<TypedData, PremintError> {
        Ok(serde_json::from_value(self.to_json())?)
    }
}

fn fields_json(fields: &[TypedField]) -> Value {
    Value::Array(
        fields
            .iter()
            .map(|f| json!({ "name": f.name, "type": f.ty }))
            .collect(),
    )
}

/// Build the typed data for a versioned premint config.
///
/// `verifying_contract` is the address of the 1155 collection the premint
/// will create (or already created).
pub fn premint_typed_data(
    premint: &PremintConfigAndVersion,
    chain_id: u64,
    verifying_contract: Address,
) -> PremintTypedData {
    let version = premint.version();
    let message = match premint {
        PremintConfigAndVersion::V1(c) => TypedMessage::V1(c.clone()),
        PremintConfigAndVersion::V2(c) => TypedMessage::V2(c.clone()),
    };

    PremintTypedData {
        domain: premint_domain(version, chain_id, verifying_contract),
        types: types_for(version),
        primary_type: CREATOR_ATTRIBUTION,
        message,
    }
}

/// Build the typed data from an untyped version tag and JSON config.
/// Fails with [`PremintError::InvalidVersion`] for any version other than
/// `"1"` or `"2"`.
pub fn premint_typed_data_from_parts(
    version: &str,
    premint_config: Value,
    chain_id: u64,
    verifying_contract: Address,
) -> Result<PremintTypedData, PremintError> {
    let premint = PremintConfigAndVersion::from_parts(version, premint_config)?;
    Ok(premint_typed_data(&premint, chain_id, verifying_contract))
}

/// Typed data for the legacy contract-and-token attestation.
pub fn contract_and_token_typed_data(
    contract_config: &ContractCreationConfig,
    token_config: legacy::TokenCreationConfig,
    uid: U256,
    chain_id: u64,
    verifying_contract: Address,
) -> PremintTypedData {
    PremintTypedData {
        domain: domain(LEGACY_PREMINTER_DOMAIN_VERSION, chain_id, verifying_contract),
        types: CONTRACT_AND_TOKEN_TYPES,
        primary_type: CONTRACT_AND_TOKEN,
        message: TypedMessage::ContractAndToken(legacy::ContractAndToken {
            contractConfig: contract_config.into(),
            tokenConfig: token_config,
            uid,
        }),
    }
}

/// EIP-712 digest of a premint config for a given chain and collection.
pub fn premint_signing_hash(
    premint: &PremintConfigAndVersion,
    chain_id: u64,
    verifying_contract: Address,
) -> B256 {
    let domain = premint_domain(premint.version(), chain_id, verifying_contract);
    match premint {
        PremintConfigAndVersion::V1(c) => c.eip712_signing_hash(&domain),
        PremintConfigAndVersion::V2(c) => c.eip712_signing_hash(&domain),
    }
}

/// `hashStruct` of a premint config, independent of chain and contract.
pub fn premint_struct_hash(premint: &PremintConfigAndVersion) -> B256 {
    match premint {
        PremintConfigAndVersion::V1(c) => c.eip712_hash_struct(),
        PremintConfigAndVersion::V2(c) => c.eip712_hash_struct(),
    }
}
