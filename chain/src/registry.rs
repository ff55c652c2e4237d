//! Typed wrapper over the vouch registry contract.

use std::sync::Arc;

use ohana_types::params::{PROFILE_STORAGE_KEY, VOUCH_CREATED_SIGNATURE};
use ohana_types::{Address, VouchStatus};

use crate::abi;
use crate::client::{ChainClient, LogFilter, TransactionRequest, TxReceipt};
use crate::error::ChainError;

const FEE_SIG: &str = "fee()";
const GET_VOUCH_SIG: &str = "getVouch(address,address)";
const VOUCH_SIG: &str = "vouch(address)";
const ACCEPT_SIG: &str = "acceptVouch(address)";
const DENY_SIG: &str = "denyVouch(address)";
const CANCEL_SIG: &str = "cancelVouch(address)";
const GET_DATA_SIG: &str = "getData(bytes32)";

/// The vouch registry contract, bound to a chain client.
///
/// One typed method per item of the contract surface; all ABI plumbing stays
/// behind this wrapper.
#[derive(Clone)]
pub struct VouchRegistry {
    client: Arc<dyn ChainClient>,
    address: Address,
}

impl VouchRegistry {
    pub fn new(client: Arc<dyn ChainClient>, address: Address) -> Self {
        Self { client, address }
    }

    /// The registry contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The underlying chain client.
    pub fn client(&self) -> &Arc<dyn ChainClient> {
        &self.client
    }

    /// Current vouch fee in wei.
    pub async fn fee(&self) -> Result<u128, ChainError> {
        let ret = self
            .client
            .call(self.address, abi::call_data(FEE_SIG, &[]))
            .await?;
        abi::decode_u128(&ret)
    }

    /// Authoritative live status for a relationship pair.
    ///
    /// An out-of-range status code decodes to `None` with a warning rather
    /// than failing the read; one malformed pair must not abort a whole
    /// synchronization pass.
    pub async fn get_vouch(
        &self,
        target: Address,
        voucher: Address,
    ) -> Result<VouchStatus, ChainError> {
        let data = abi::call_data(
            GET_VOUCH_SIG,
            &[abi::encode_address(&target), abi::encode_address(&voucher)],
        );
        let ret = self.client.call(self.address, data).await?;
        let code = abi::decode_u8(&ret)?;
        Ok(VouchStatus::from_code(code).unwrap_or_else(|| {
            tracing::warn!(%target, %voucher, code, "unknown vouch status code, treating as None");
            VouchStatus::None
        }))
    }

    /// Submit a payable `vouch(target)` with the given fee attached.
    pub async fn vouch(
        &self,
        from: Address,
        target: Address,
        fee_wei: u128,
    ) -> Result<TxReceipt, ChainError> {
        self.submit(from, VOUCH_SIG, target, fee_wei).await
    }

    /// Accept a pending vouch from `voucher`.
    pub async fn accept_vouch(&self, from: Address, voucher: Address) -> Result<TxReceipt, ChainError> {
        self.submit(from, ACCEPT_SIG, voucher, 0).await
    }

    /// Deny a pending vouch from `voucher`.
    pub async fn deny_vouch(&self, from: Address, voucher: Address) -> Result<TxReceipt, ChainError> {
        self.submit(from, DENY_SIG, voucher, 0).await
    }

    /// Cancel a vouch previously given to `target`.
    pub async fn cancel_vouch(&self, from: Address, target: Address) -> Result<TxReceipt, ChainError> {
        self.submit(from, CANCEL_SIG, target, 0).await
    }

    async fn submit(
        &self,
        from: Address,
        signature: &str,
        arg: Address,
        value: u128,
    ) -> Result<TxReceipt, ChainError> {
        let tx = TransactionRequest {
            from,
            to: self.address,
            data: abi::call_data(signature, &[abi::encode_address(&arg)]),
            value,
        };
        self.client.send_transaction(tx).await
    }

    /// Topic0 of the relationship creation event.
    pub fn creation_topic() -> [u8; 32] {
        abi::event_topic(VOUCH_CREATED_SIGNATURE)
    }

    /// Filter for creation events over `[from_block, latest]`.
    ///
    /// `None` for target or voucher is the match-any wildcard on that
    /// indexed position.
    pub fn creation_filter(
        &self,
        target: Option<Address>,
        voucher: Option<Address>,
        from_block: u64,
    ) -> LogFilter {
        LogFilter {
            address: self.address,
            from_block,
            to_block: None,
            topics: vec![
                Some(Self::creation_topic()),
                target.map(|a| a.to_topic()),
                voucher.map(|a| a.to_topic()),
            ],
        }
    }
}

/// Read the raw profile storage value from a contract-backed identity
/// (`getData(bytes32)` on the well-known profile slot).
pub async fn profile_data(
    client: &dyn ChainClient,
    address: Address,
) -> Result<Vec<u8>, ChainError> {
    let data = abi::call_data(GET_DATA_SIG, &[PROFILE_STORAGE_KEY]);
    let ret = client.call(address, data).await?;
    abi::decode_dyn_bytes(&ret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_filter_places_roles_on_indexed_topics() {
        let registry = VouchRegistry::new(
            std::sync::Arc::new(crate::rpc::RpcClient::new("http://localhost:8545").unwrap()),
            Address::new([0xcc; 20]),
        );
        let local = Address::new([0x01; 20]);

        let received = registry.creation_filter(Some(local), None, 100);
        assert_eq!(received.topics[0], Some(VouchRegistry::creation_topic()));
        assert_eq!(received.topics[1], Some(local.to_topic()));
        assert_eq!(received.topics[2], None);
        assert_eq!(received.from_block, 100);
        assert_eq!(received.to_block, None);

        let given = registry.creation_filter(None, Some(local), 100);
        assert_eq!(given.topics[1], None);
        assert_eq!(given.topics[2], Some(local.to_topic()));
    }
}
