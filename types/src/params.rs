//! Protocol constants shared across the engine.

/// Maximum number of recent blocks scanned for creation events.
///
/// Known limitation: relationships created before this window are invisible
/// to discovery even when still active on-chain. Unbounded log scans are
/// unbounded cost; deployments can widen the window through engine config.
pub const DISCOVERY_WINDOW_BLOCKS: u64 = 100_000;

/// Solidity signature of the relationship creation event. Both address
/// parameters are indexed: topic1 = target, topic2 = voucher.
pub const VOUCH_CREATED_SIGNATURE: &str = "VouchRequested(address,address)";

/// Well-known ERC725Y storage slot holding the profile document reference
/// (keccak256 of "LSP3Profile").
pub const PROFILE_STORAGE_KEY: [u8; 32] = [
    0x5e, 0xf8, 0x3a, 0xd9, 0x55, 0x90, 0x33, 0xe6, 0xe9, 0x41, 0xdb, 0x7d, 0x7c, 0x49, 0x5a,
    0xcd, 0xce, 0x61, 0x63, 0x47, 0xd2, 0x8e, 0x90, 0xc7, 0xce, 0x47, 0xcb, 0xfc, 0xfc, 0xad,
    0x3b, 0xc5,
];

/// Byte length of the verifiable-URI header preceding the UTF-8 payload in
/// the profile storage value (format id + hash method + hash).
pub const PROFILE_VALUE_HEADER_LEN: usize = 40;

/// URI scheme marking a content-addressed profile document or image.
pub const IPFS_SCHEME: &str = "ipfs://";

/// Default HTTP gateway for content-addressed fetches.
pub const DEFAULT_IPFS_GATEWAY: &str = "https://api.universalprofile.cloud/ipfs/";

/// Attempts for transient read operations before the failure is final.
pub const MAX_READ_ATTEMPTS: u32 = 3;

/// Base delay for linear retry backoff, in milliseconds (1x, 2x, 3x).
pub const RETRY_BASE_DELAY_MS: u64 = 1_000;
