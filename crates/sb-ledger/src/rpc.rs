//! JSON-RPC client for the staking contract.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy::primitives::{Address, U256, hex};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sb_core::{EntityKey, RecordSource, SourceError, SubRecord};

use crate::contract::{self, IStaking};
use crate::{Clock, LedgerError, SystemClock};

/// Staking contract reached through an Ethereum-style JSON-RPC node.
///
/// Every [`RecordSource`] call is a single `eth_call` against the latest
/// block. Nothing is cached between calls.
pub struct RpcLedger {
    http: reqwest::Client,
    endpoint: String,
    contract: Address,
    clock: Arc<dyn Clock>,
    next_id: AtomicU64,
}

impl fmt::Debug for RpcLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcLedger")
            .field("endpoint", &self.endpoint)
            .field("contract", &self.contract.to_string())
            .finish_non_exhaustive()
    }
}

fn parse_address(s: &str) -> Result<Address, LedgerError> {
    s.parse()
        .map_err(|_| LedgerError::InvalidAddress(s.to_string()))
}

impl RpcLedger {
    /// Creates a client for `contract` behind `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an http(s) URL, the contract
    /// address is malformed, or the HTTP client fails to build.
    pub fn new(endpoint: impl Into<String>, contract: &str, timeout: Duration) -> Result<Self, LedgerError> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(LedgerError::InvalidEndpoint {
                reason: "endpoint cannot be empty",
            });
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(LedgerError::InvalidEndpoint {
                reason: "endpoint must be an http or https URL",
            });
        }
        let contract = parse_address(contract)?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LedgerError::ClientBuild)?;

        Ok(Self {
            http,
            endpoint,
            contract,
            clock: Arc::new(SystemClock),
            next_id: AtomicU64::new(1),
        })
    }

    /// Replaces the clock used to compute elapsed time.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    async fn call<C: SolCall>(&self, call: C) -> Result<C::Return, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = build_call_request(id, self.contract, hex::encode_prefixed(call.abi_encode()));
        tracing::debug!(id, function = C::SIGNATURE, "eth_call");

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(match parse_rpc_response(&body) {
                Err(err @ LedgerError::Rpc { .. }) => err,
                _ => LedgerError::InvalidResponse(format!("status {status}: {body}")),
            });
        }

        let result = parse_rpc_response(&body)?;
        let data = hex::decode(&result)
            .map_err(|err| LedgerError::InvalidResponse(format!("result is not hex: {err}")))?;
        Ok(C::abi_decode_returns(&data)?)
    }

    async fn staked_records(&self, key: &EntityKey) -> Result<Vec<SubRecord>, LedgerError> {
        let staker = parse_address(key.as_str())?;
        let reply = self.call(IStaking::getStakedNFTsCall { staker }).await?;
        let now = self.clock.now();
        Ok(contract::staked_tokens(reply)?
            .into_iter()
            .map(|token| SubRecord::observed(token.token_id, token.token_type, token.stake_time, now))
            .collect())
    }
}

#[async_trait]
impl RecordSource for RpcLedger {
    async fn list_categories(&self) -> Result<Vec<String>, SourceError> {
        self.call(IStaking::getAvailableNFTTypesCall {})
            .await
            .map_err(|e| e.into_source_error("list_categories"))
    }

    async fn count_entities(&self) -> Result<u64, SourceError> {
        const OP: &str = "count_entities";
        let total = self
            .call(IStaking::getTotalStakersCall {})
            .await
            .map_err(|e| e.into_source_error(OP))?;
        contract::narrow_u64(total).ok_or_else(|| SourceError::Malformed {
            operation: OP,
            message: format!("staker count {total} out of range"),
        })
    }

    async fn list_entity_keys(&self, page: u64, limit: u64) -> Result<Vec<EntityKey>, SourceError> {
        const OP: &str = "list_entity_keys";
        let addresses = self
            .call(IStaking::getStakersCall {
                page: U256::from(page),
                limit: U256::from(limit),
            })
            .await
            .map_err(|e| e.into_source_error(OP))?;
        addresses
            .into_iter()
            .map(|address| {
                EntityKey::new(address.to_string()).map_err(|e| SourceError::Malformed {
                    operation: OP,
                    message: e.to_string(),
                })
            })
            .collect()
    }

    async fn fetch_sub_records(&self, key: &EntityKey) -> Result<Vec<SubRecord>, SourceError> {
        self.staked_records(key)
            .await
            .map_err(|e| e.into_source_error("fetch_sub_records"))
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: (CallParams, &'static str),
}

#[derive(Debug, Serialize)]
struct CallParams {
    to: String,
    data: String,
}

fn build_call_request(id: u64, contract: Address, data: String) -> RpcRequest {
    RpcRequest {
        jsonrpc: "2.0",
        id,
        method: "eth_call",
        params: (
            CallParams {
                to: contract.to_string(),
                data,
            },
            "latest",
        ),
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Extracts the `result` hex string from a JSON-RPC response body.
fn parse_rpc_response(body: &str) -> Result<String, LedgerError> {
    let response: RpcResponse =
        serde_json::from_str(body).map_err(|err| LedgerError::InvalidResponse(err.to_string()))?;
    if let Some(error) = response.error {
        return Err(LedgerError::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    response
        .result
        .ok_or_else(|| LedgerError::InvalidResponse("missing result".to_string()))
}
