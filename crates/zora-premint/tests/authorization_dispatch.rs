use std::sync::Mutex;

use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use premint::eip712::premint_signing_hash;
use premint::executor::supports_premint_version;
use premint::migrate::migrate_premint_config_to_v2;
use premint::types::{v1, U96};
use premint::{
    is_authorized_to_create_premint, is_valid_signature, ContractCreationConfig,
    IsValidSignatureReturn, PremintConfigAndVersion, PremintConfigVersion, PremintError,
    PremintExecutorReader, ZORA_CHAIN_ID,
};

const COLLECTION_ADDRESS: Address = Address::repeat_byte(0xc0);

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    GetContractAddress,
    IsValidSignatureV1 { uid: u32 },
    IsAuthorizedToCreatePremint { signer: Address, contract_admin: Address, contract_address: Address },
    SupportedVersions(Address),
}

/// Executor stand-in that records every read and answers from fixed values.
struct RecordingReader {
    calls: Mutex<Vec<Call>>,
    authorized: bool,
    versions: Vec<String>,
}

impl RecordingReader {
    fn new(authorized: bool) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            authorized,
            versions: vec!["1".to_string(), "2".to_string()],
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PremintExecutorReader for RecordingReader {
    async fn get_contract_address(
        &self,
        _collection: &ContractCreationConfig,
    ) -> Result<Address, PremintError> {
        self.record(Call::GetContractAddress);
        Ok(COLLECTION_ADDRESS)
    }

    async fn is_valid_signature_v1(
        &self,
        _collection: &ContractCreationConfig,
        premint: &v1::CreatorAttribution,
        _signature: &Bytes,
    ) -> Result<bool, PremintError> {
        self.record(Call::IsValidSignatureV1 { uid: premint.uid });
        Ok(self.authorized)
    }

    async fn is_authorized_to_create_premint(
        &self,
        signer: Address,
        contract_admin: Address,
        contract_address: Address,
    ) -> Result<bool, PremintError> {
        self.record(Call::IsAuthorizedToCreatePremint {
            signer,
            contract_admin,
            contract_address,
        });
        Ok(self.authorized)
    }

    async fn supported_premint_signature_versions(
        &self,
        contract_address: Address,
    ) -> Result<Vec<String>, PremintError> {
        self.record(Call::SupportedVersions(contract_address));
        Ok(self.versions.clone())
    }
}

/// Reader whose every call fails like an unreachable RPC node.
struct FailingReader;

impl PremintExecutorReader for FailingReader {
    async fn get_contract_address(
        &self,
        _collection: &ContractCreationConfig,
    ) -> Result<Address, PremintError> {
        Err(PremintError::ChainError("connection refused".to_string()))
    }

    async fn is_valid_signature_v1(
        &self,
        _collection: &ContractCreationConfig,
        _premint: &v1::CreatorAttribution,
        _signature: &Bytes,
    ) -> Result<bool, PremintError> {
        Err(PremintError::ChainError("connection refused".to_string()))
    }

    async fn is_authorized_to_create_premint(
        &self,
        _signer: Address,
        _contract_admin: Address,
        _contract_address: Address,
    ) -> Result<bool, PremintError> {
        Err(PremintError::ChainError("connection refused".to_string()))
    }

    async fn supported_premint_signature_versions(
        &self,
        _contract_address: Address,
    ) -> Result<Vec<String>, PremintError> {
        Err(PremintError::ChainError("connection refused".to_string()))
    }
}

fn creator() -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(0x24)).unwrap()
}

fn collection(admin: Address) -> ContractCreationConfig {
    ContractCreationConfig {
        contractAdmin: admin,
        contractURI: "ipfs://collection".to_string(),
        contractName: "Testing Collection".to_string(),
    }
}

fn v1_config() -> v1::CreatorAttribution {
    v1::CreatorAttribution {
        tokenConfig: v1::TokenCreationConfig {
            tokenURI: "ipfs://token".to_string(),
            maxSupply: U256::from(10u64),
            maxTokensPerAddress: 1,
            pricePerToken: U96::ZERO,
            mintStart: 0,
            mintDuration: 0,
            royaltyMintSchedule: 0,
            royaltyBPS: 100,
            royaltyRecipient: Address::repeat_byte(0x01),
            fixedPriceMinter: Address::repeat_byte(0x02),
        },
        uid: 5,
        version: 1,
        deleted: false,
    }
}

fn sign(signer: &PrivateKeySigner, premint: &PremintConfigAndVersion) -> Bytes {
    let digest = premint_signing_hash(premint, ZORA_CHAIN_ID, COLLECTION_ADDRESS);
    Bytes::from(signer.sign_hash_sync(&digest).unwrap().as_bytes().to_vec())
}

#[tokio::test]
async fn test_v1_uses_legacy_signature_check_only() {
    let reader = RecordingReader::new(true);
    let admin = Address::repeat_byte(0xad);
    let premint = PremintConfigAndVersion::V1(v1_config());

    let ok = is_authorized_to_create_premint(
        &reader,
        &collection(admin),
        COLLECTION_ADDRESS,
        Address::repeat_byte(0x99),
        &premint,
        &Bytes::from(vec![0u8; 65]),
    )
    .await
    .unwrap();

    assert!(ok);
    assert_eq!(reader.calls(), vec![Call::IsValidSignatureV1 { uid: 5 }]);
}

#[tokio::test]
async fn test_v2_uses_capability_check_with_contract_admin() {
    let reader = RecordingReader::new(false);
    let admin = Address::repeat_byte(0xad);
    let signer = Address::repeat_byte(0x99);
    let premint = PremintConfigAndVersion::V2(migrate_premint_config_to_v2(&v1_config(), None));

    let ok = is_authorized_to_create_premint(
        &reader,
        &collection(admin),
        COLLECTION_ADDRESS,
        signer,
        &premint,
        &Bytes::new(),
    )
    .await
    .unwrap();

    assert!(!ok);
    assert_eq!(
        reader.calls(),
        vec![Call::IsAuthorizedToCreatePremint {
            signer,
            contract_admin: admin,
            contract_address: COLLECTION_ADDRESS,
        }]
    );
}

#[tokio::test]
async fn test_valid_signature_reports_recovered_address() {
    let reader = RecordingReader::new(true);
    let signer = creator();
    let premint = PremintConfigAndVersion::V2(migrate_premint_config_to_v2(
        &v1_config(),
        Some(Address::repeat_byte(0x77)),
    ));
    let signature = sign(&signer, &premint);

    let result = is_valid_signature(
        &reader,
        &collection(signer.address()),
        &premint,
        &signature,
        ZORA_CHAIN_ID,
    )
    .await
    .unwrap();

    assert_eq!(
        result,
        IsValidSignatureReturn {
            is_authorized: true,
            recovered_address: Some(signer.address()),
        }
    );
    assert_eq!(
        reader.calls(),
        vec![
            Call::GetContractAddress,
            Call::IsAuthorizedToCreatePremint {
                signer: signer.address(),
                contract_admin: signer.address(),
                contract_address: COLLECTION_ADDRESS,
            },
        ]
    );
}

#[tokio::test]
async fn test_unauthorized_signer_still_reports_address() {
    let reader = RecordingReader::new(false);
    let signer = creator();
    let premint = PremintConfigAndVersion::V1(v1_config());
    let signature = sign(&signer, &premint);

    let result = is_valid_signature(
        &reader,
        &collection(Address::repeat_byte(0xad)),
        &premint,
        &signature,
        ZORA_CHAIN_ID,
    )
    .await
    .unwrap();

    assert!(!result.is_authorized);
    assert_eq!(result.recovered_address, Some(signer.address()));
}

#[tokio::test]
async fn test_malformed_signature_is_unauthorized_without_calls() {
    let reader = RecordingReader::new(true);
    let premint = PremintConfigAndVersion::V1(v1_config());

    let result = is_valid_signature(
        &reader,
        &collection(Address::repeat_byte(0xad)),
        &premint,
        &Bytes::from(vec![0xab; 20]),
        ZORA_CHAIN_ID,
    )
    .await
    .unwrap();

    assert_eq!(
        result,
        IsValidSignatureReturn {
            is_authorized: false,
            recovered_address: None,
        }
    );
    assert!(reader.calls().is_empty());
}

#[tokio::test]
async fn test_chain_errors_propagate() {
    let signer = creator();
    let premint = PremintConfigAndVersion::V1(v1_config());
    let signature = sign(&signer, &premint);

    let err = is_valid_signature(
        &FailingReader,
        &collection(signer.address()),
        &premint,
        &signature,
        ZORA_CHAIN_ID,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PremintError::ChainError(_)));
}

#[tokio::test]
async fn test_supports_premint_version() {
    let mut reader = RecordingReader::new(true);
    assert!(supports_premint_version(&reader, PremintConfigVersion::V2, COLLECTION_ADDRESS)
        .await
        .unwrap());

    reader.versions = vec!["1".to_string()];
    assert!(!supports_premint_version(&reader, PremintConfigVersion::V2, COLLECTION_ADDRESS)
        .await
        .unwrap());
    assert!(supports_premint_version(&reader, PremintConfigVersion::V1, COLLECTION_ADDRESS)
        .await
        .unwrap());
}

#[test]
fn test_unknown_version_is_rejected_before_parsing_config() {
    let err = PremintConfigAndVersion::from_parts("3", serde_json::json!({ "garbage": true }))
        .unwrap_err();
    assert!(matches!(err, PremintError::InvalidVersion(_)));
}
