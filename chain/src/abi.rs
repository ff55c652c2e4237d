//! Minimal ABI encoding/decoding for the vouch contract surface.
//!
//! Covers exactly what the engine calls: fixed-word arguments (addresses,
//! bytes32), a dynamic `bytes` return, and small unsigned returns. Selectors
//! and event topics are Keccak-256 of the Solidity signature.

use sha3::{Digest, Keccak256};

use ohana_types::Address;

use crate::error::ChainError;

/// Keccak-256 digest.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data));
    out
}

/// First four bytes of the signature hash — the function selector.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Full signature hash — topic0 of the corresponding event.
pub fn event_topic(signature: &str) -> [u8; 32] {
    keccak256(signature.as_bytes())
}

/// Encode an address as a left-padded 32-byte word.
pub fn encode_address(addr: &Address) -> [u8; 32] {
    addr.to_topic()
}

/// Build calldata: selector followed by fixed 32-byte argument words.
pub fn call_data(signature: &str, words: &[[u8; 32]]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 32 * words.len());
    data.extend_from_slice(&selector(signature));
    for word in words {
        data.extend_from_slice(word);
    }
    data
}

/// Decode a `uint8` return: the last byte of the first 32-byte word.
pub fn decode_u8(ret: &[u8]) -> Result<u8, ChainError> {
    if ret.len() < 32 {
        return Err(ChainError::network(format!(
            "return data too short for uint8: {} bytes",
            ret.len()
        )));
    }
    Ok(ret[31])
}

/// Decode an unsigned return that fits in `u128` (the fee fits comfortably).
pub fn decode_u128(ret: &[u8]) -> Result<u128, ChainError> {
    if ret.len() < 32 {
        return Err(ChainError::network(format!(
            "return data too short for uint: {} bytes",
            ret.len()
        )));
    }
    if ret[..16].iter().any(|&b| b != 0) {
        return Err(ChainError::network("uint return overflows u128"));
    }
    let mut buf = [0u8; 16];
    buf.copy_from_slice(&ret[16..32]);
    Ok(u128::from_be_bytes(buf))
}

/// Decode a dynamic `bytes` return: offset word, length word, payload.
pub fn decode_dyn_bytes(ret: &[u8]) -> Result<Vec<u8>, ChainError> {
    if ret.len() < 32 {
        return Err(ChainError::network("bytes return missing offset word"));
    }
    let offset = word_as_usize(&ret[..32])?;
    let len_end = offset
        .checked_add(32)
        .ok_or_else(|| ChainError::network("bytes offset overflow"))?;
    if ret.len() < len_end {
        return Err(ChainError::network("bytes return missing length word"));
    }
    let length = word_as_usize(&ret[offset..len_end])?;
    let data_end = len_end
        .checked_add(length)
        .ok_or_else(|| ChainError::network("bytes length overflow"))?;
    if ret.len() < data_end {
        return Err(ChainError::network(format!(
            "bytes return truncated: expected {length} payload bytes"
        )));
    }
    Ok(ret[len_end..data_end].to_vec())
}

fn word_as_usize(word: &[u8]) -> Result<usize, ChainError> {
    if word[..24].iter().any(|&b| b != 0) {
        return Err(ChainError::network("ABI word exceeds usize range"));
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[24..32]);
    Ok(u64::from_be_bytes(buf) as usize)
}
