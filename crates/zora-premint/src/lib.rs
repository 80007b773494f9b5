//! Client SDK for Zora premints.
//!
//! A premint is a creator's EIP-712 signature authorizing creation of a 1155
//! token (and, if needed, its collection) that anyone can later execute
//! on-chain.
//!
//! # Pipeline
//!
//! - **Typed data** ([`eip712`]): versioned signing payloads
//! - **Recovery** ([`recover`]): signer from a signature or from a
//!   `CreatorAttribution` event
//! - **Authorization** ([`authorization`]): asks the premint executor whether
//!   the signer may create the premint
//! - **Migration** ([`migrate`]): V1 configs to the V2 schema
//! - **Minting** ([`mint`]): mint costs and mint transaction parameters
//!
//! # Quick example
//!
//! ```no_run
//! use alloy::primitives::Address;
//! use premint::{eip712, recover, PremintConfigAndVersion};
//!
//! # fn run(premint: PremintConfigAndVersion, signature: &[u8], collection: Address) {
//! let typed = eip712::premint_typed_data(&premint, premint::ZORA_CHAIN_ID, collection);
//! let digest = typed.signing_hash();
//!
//! let signer = recover::recover_premint_signer(&premint, signature, premint::ZORA_CHAIN_ID, collection);
//! # }
//! ```

// Core types
pub mod constants;
pub mod error;
pub mod types;

// Signing payloads and recovery
pub mod eip712;
pub mod migrate;
pub mod recover;

// On-chain collaborators
pub mod authorization;
pub mod executor;
pub mod mint;
pub mod sales_config;

use alloy::sol;

// Premint executor, laid out as the deployed ABI. Struct names here only
// affect Rust naming; the EIP-712 types live in `types`.
sol! {
    #[sol(rpc)]
    interface IZoraCreator1155PremintExecutor {
        struct ContractCreationConfig {
            address contractAdmin;
            string contractURI;
            string contractName;
        }

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

        struct PremintConfig {
            TokenCreationConfig tokenConfig;
            uint32 uid;
            uint32 version;
            bool deleted;
        }

        struct TokenCreationConfigV2 {
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

        struct PremintConfigV2 {
            TokenCreationConfigV2 tokenConfig;
            uint32 uid;
            uint32 version;
            bool deleted;
        }

        struct MintArguments {
            address mintRecipient;
            string mintComment;
            address[] mintRewardsRecipients;
        }

        struct PremintResult {
            address contractAddress;
            uint256 tokenId;
            bool createdNewContract;
        }

        function getContractAddress(ContractCreationConfig calldata contractConfig) external view returns (address);

        function isValidSignature(
            ContractCreationConfig calldata contractConfig,
            PremintConfig calldata premintConfig,
            bytes calldata signature
        ) external view returns (bool isValid, address contractAddress, address recoveredSigner);

        function isAuthorizedToCreatePremint(
            address signer,
            address premintContractConfigContractAdmin,
            address contractAddress
        ) external view returns (bool isAuthorized);

        function supportedPremintSignatureVersions(address contractAddress) external view returns (string[] memory);

        function mintFee(address collectionAddress) external view returns (uint256);

        function premintV1(
            ContractCreationConfig calldata contractConfig,
            PremintConfig calldata premintConfig,
            bytes calldata signature,
            uint256 quantityToMint,
            MintArguments calldata mintArguments
        ) external payable returns (PremintResult memory result);

        function premintV2(
            ContractCreationConfig calldata contractConfig,
            PremintConfigV2 calldata premintConfig,
            bytes calldata signature,
            uint256 quantityToMint,
            MintArguments calldata mintArguments
        ) external payable returns (PremintResult memory result);
    }
}

// Zora 1155 collection contract.
sol! {
    #[sol(rpc)]
    interface IZoraCreator1155 {
        event CreatorAttribution(bytes32 structHash, string domainName, string version, address creator, bytes signature);

        function mintFee() external view returns (uint256);

        function mintWithRewards(
            address minter,
            uint256 tokenId,
            uint256 quantity,
            bytes calldata minterArguments,
            address mintReferral
        ) external payable;
    }
}

// Zora 721 drop contract.
sol! {
    #[sol(rpc)]
    interface IZora721 {
        function mintWithRewards(address recipient, uint256 quantity, string calldata comment, address mintReferral) external payable returns (uint256);

        function zoraFeeForAmount(uint256 amount) external view returns (address, uint256);
    }
}

// Re-exports
pub use constants::*;
pub use error::PremintError;
pub use types::{ContractCreationConfig, PremintConfigAndVersion, PremintConfigVersion};

pub use authorization::{is_authorized_to_create_premint, is_valid_signature, IsValidSignatureReturn};
pub use executor::{PremintExecutor, PremintExecutorReader};
pub use mint::{compute_mint_costs, MintCosts};
pub use recover::{CreatorAttributionEvent, SignerRecovery};
