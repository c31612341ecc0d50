//! Staking contract interface.
//!
//! Calls are encoded and decoded with `alloy` sol types. Token ids and stake
//! times are `uint256` on chain; tokens whose values do not fit the record
//! types are skipped with a warning rather than failing the whole staker.

use alloy::primitives::U256;
use alloy::sol;

use crate::LedgerError;

sol! {
    /// Read-only view of the NFT staking contract.
    interface IStaking {
        function getTotalStakers() external view returns (uint256);
        function getStakers(uint256 page, uint256 limit) external view returns (address[]);
        function getStakedNFTs(address staker)
            external
            view
            returns (uint256[] tokenIds, string[] tokenTypes, uint256[] stakeTimes);
        function getAvailableNFTTypes() external view returns (string[]);
    }
}

/// One staked token with its values narrowed to record types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakedToken {
    pub token_id: u64,
    pub token_type: String,
    pub stake_time: i64,
}

/// Narrows a `uint256` to `u64`, or `None` if it does not fit.
pub fn narrow_u64(value: U256) -> Option<u64> {
    u64::try_from(value).ok()
}

/// Zips the parallel arrays returned by `getStakedNFTs`.
///
/// Arrays of different lengths make the reply invalid. Tokens whose id does
/// not fit in `u64`, or whose stake time does not fit in `i64`, are skipped.
pub fn staked_tokens(
    reply: IStaking::getStakedNFTsReturn,
) -> Result<Vec<StakedToken>, LedgerError> {
    let IStaking::getStakedNFTsReturn {
        tokenIds: ids,
        tokenTypes: types,
        stakeTimes: times,
    } = reply;

    if ids.len() != types.len() || ids.len() != times.len() {
        return Err(LedgerError::InvalidResponse(format!(
            "getStakedNFTs array lengths differ: {} ids, {} types, {} times",
            ids.len(),
            types.len(),
            times.len()
        )));
    }

    let mut tokens = Vec::with_capacity(ids.len());
    for ((id, token_type), time) in ids.into_iter().zip(types).zip(times) {
        let Some(token_id) = narrow_u64(id) else {
            tracing::warn!(%id, "skipping token with out-of-range id");
            continue;
        };
        let Some(stake_time) = narrow_u64(time).and_then(|t| i64::try_from(t).ok()) else {
            tracing::warn!(token_id, %time, "skipping token with out-of-range stake time");
            continue;
        };
        tokens.push(StakedToken {
            token_id,
            token_type,
            stake_time,
        });
    }
    Ok(tokens)
}
