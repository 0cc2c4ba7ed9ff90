//! Blockchain gateway.
//!
//! Read-side access to the deployed NFT contract (`ownerOf`, `tokenURI`)
//! over JSON-RPC, metadata resolution for both direct HTTP URLs and
//! `ipfs://` URIs, and the pluggable [`MintSubmitter`] interface whose
//! confirmations drive the mint request state machine.

pub mod metadata;
pub mod minter;
pub mod rpc;

pub use metadata::{resolve_metadata_url, MetadataFetcher, NftAttribute, NftMetadata};
pub use minter::{HttpMintSubmitter, MintConfirmation, MintSubmitter};
pub use rpc::{ChainConfig, ChainError, ContractReader};
