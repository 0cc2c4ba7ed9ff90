//! JSON-RPC reads against the deployed NFT contract.
//!
//! Only the two view functions the platform needs are wired: `ownerOf`
//! and `tokenURI`. Calls are plain `eth_call` requests with hand-encoded
//! selectors; no wallet or signing is involved on the read path.

use std::time::Duration;

use serde::Deserialize;

/// Blockchain connection settings.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Deployed contract address (`0x`-prefixed).
    pub contract_address: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ChainConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `CHAIN_RPC_URL`        | `http://localhost:8545`  |
    /// | `NFT_CONTRACT_ADDRESS` | zero address             |
    /// | `CHAIN_TIMEOUT_SECS`   | `30`                     |
    pub fn from_env() -> Self {
        Self {
            rpc_url: std::env::var("CHAIN_RPC_URL")
                .unwrap_or_else(|_| "http://localhost:8545".into()),
            contract_address: std::env::var("NFT_CONTRACT_ADDRESS")
                .unwrap_or_else(|_| format!("0x{}", "0".repeat(40))),
            timeout_secs: std::env::var("CHAIN_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }
}

/// Errors from the blockchain boundary.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The node returned a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The call result could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<ChainError> for metamind_core::error::CoreError {
    fn from(err: ChainError) -> Self {
        metamind_core::error::CoreError::Infrastructure(err.to_string())
    }
}

/// Function selector for `ownerOf(uint256)`.
const SELECTOR_OWNER_OF: &str = "6352211e";

/// Function selector for `tokenURI(uint256)`.
const SELECTOR_TOKEN_URI: &str = "c87b56dd";

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Read-only client for the NFT contract.
pub struct ContractReader {
    client: reqwest::Client,
    config: ChainConfig,
}

impl ContractReader {
    /// Create a reader. The underlying `reqwest::Client` carries the
    /// configured timeout on every request.
    pub fn new(config: ChainConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// Current owner of a token, as a `0x`-prefixed address.
    pub async fn owner_of(&self, token_id: u64) -> Result<String, ChainError> {
        let result = self
            .eth_call(encode_call(SELECTOR_OWNER_OF, token_id))
            .await?;
        decode_address(&result)
    }

    /// Metadata URI of a token.
    pub async fn token_uri(&self, token_id: u64) -> Result<String, ChainError> {
        let result = self
            .eth_call(encode_call(SELECTOR_TOKEN_URI, token_id))
            .await?;
        decode_string(&result)
    }

    /// Issue an `eth_call` against the contract, returning the raw hex
    /// result.
    async fn eth_call(&self, data: String) -> Result<String, ChainError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [
                { "to": self.config.contract_address, "data": data },
                "latest",
            ],
        });

        let response: RpcResponse = self
            .client
            .post(&self.config.rpc_url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(ChainError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        response
            .result
            .ok_or_else(|| ChainError::Decode("RPC response carried no result".into()))
    }
}

/// ABI-encode a single-`uint256` call: selector plus the token id padded
/// to 32 bytes.
fn encode_call(selector: &str, token_id: u64) -> String {
    format!("0x{selector}{token_id:064x}")
}

/// Decode an ABI-encoded `address` return value (one 32-byte word, the
/// address in the low 20 bytes).
fn decode_address(result: &str) -> Result<String, ChainError> {
    let word = result.trim_start_matches("0x");
    if word.len() != 64 {
        return Err(ChainError::Decode(format!(
            "Expected a 32-byte word, got {} hex chars",
            word.len()
        )));
    }
    Ok(format!("0x{}", &word[24..]))
}

/// Decode an ABI-encoded `string` return value (offset word, length word,
/// then UTF-8 data).
fn decode_string(result: &str) -> Result<String, ChainError> {
    let bytes = hex::decode(result.trim_start_matches("0x"))
        .map_err(|e| ChainError::Decode(format!("Invalid hex: {e}")))?;

    let word_at = |pos: usize| -> Result<usize, ChainError> {
        let word = bytes
            .get(pos..pos + 32)
            .ok_or_else(|| ChainError::Decode("Truncated ABI word".into()))?;
        let mut value = 0usize;
        for &b in &word[24..] {
            value = (value << 8) | b as usize;
        }
        Ok(value)
    };

    let offset = word_at(0)?;
    let len = word_at(offset)?;
    let data = bytes
        .get(offset + 32..offset + 32 + len)
        .ok_or_else(|| ChainError::Decode("Truncated string data".into()))?;

    String::from_utf8(data.to_vec()).map_err(|e| ChainError::Decode(format!("Invalid UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_call_pads_token_id() {
        assert_eq!(
            encode_call(SELECTOR_OWNER_OF, 1),
            "0x6352211e0000000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn decode_address_takes_low_twenty_bytes() {
        let word = format!("0x{}{}", "0".repeat(24), "ab".repeat(20));
        assert_eq!(decode_address(&word).unwrap(), format!("0x{}", "ab".repeat(20)));
    }

    #[test]
    fn decode_address_rejects_short_word() {
        assert!(matches!(
            decode_address("0xdeadbeef"),
            Err(ChainError::Decode(_))
        ));
    }

    #[test]
    fn decode_string_round_trip() {
        // offset = 0x20, length = 13, data = "ipfs://abc123" padded to 32.
        let text = b"ipfs://abc123";
        let mut blob = Vec::new();
        blob.extend_from_slice(&[0u8; 24]);
        blob.extend_from_slice(&(32u64.to_be_bytes()));
        blob.extend_from_slice(&[0u8; 24]);
        blob.extend_from_slice(&(text.len() as u64).to_be_bytes());
        blob.extend_from_slice(text);
        blob.resize(blob.len().next_multiple_of(32), 0);

        let encoded = format!("0x{}", hex::encode(blob));
        assert_eq!(decode_string(&encoded).unwrap(), "ipfs://abc123");
    }

    #[test]
    fn decode_string_rejects_truncated_blob() {
        assert!(matches!(
            decode_string("0x0000"),
            Err(ChainError::Decode(_))
        ));
    }
}
