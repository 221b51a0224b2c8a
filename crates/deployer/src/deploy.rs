use {
    crate::artifact::ContractFactory,
    alloy::{
        network::{Ethereum, ReceiptResponse, TransactionBuilder},
        primitives::{Address, TxHash},
        providers::{PendingTransactionBuilder, PendingTransactionError, Provider},
        rpc::types::{TransactionReceipt, TransactionRequest},
        transports::TransportError,
    },
    ethrpc::{AlloyProvider, alloy::errors},
};

/// Outcome of a successful deployment. Reported once, never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployment {
    pub contract: String,
    pub address: Address,
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to query the chain id ({})", errors::classify(.0))]
    ChainId(#[source] TransportError),
    #[error("node serves chain {actual} but chain {expected} was expected")]
    ChainIdMismatch { expected: u64, actual: u64 },
    #[error("failed to submit the deployment transaction ({})", errors::classify(.0))]
    Submit(#[source] TransportError),
    #[error("failed to confirm deployment transaction {hash}")]
    Confirmation {
        hash: TxHash,
        #[source]
        source: PendingTransactionError,
    },
    #[error("deployment transaction {0} reverted")]
    Reverted(TxHash),
    #[error("receipt of deployment transaction {0} has no contract address")]
    MissingContractAddress(TxHash),
}

impl Error {
    /// The transport error behind this failure, if any.
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Error::ChainId(err) | Error::Submit(err) => Some(err),
            Error::Confirmation {
                source: PendingTransactionError::TransportError(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}

/// Makes sure the provider talks to the expected chain before anything gets
/// signed.
pub async fn check_chain_id(provider: &AlloyProvider, expected: u64) -> Result<(), Error> {
    let actual = provider.get_chain_id().await.map_err(Error::ChainId)?;
    if actual != expected {
        return Err(Error::ChainIdMismatch { expected, actual });
    }
    tracing::debug!(chain_id = actual, "connected to expected chain");
    Ok(())
}

/// Sends the creation transaction of `factory` from the default signer of
/// the provider's wallet and waits until it is included in a block.
pub async fn deploy(
    provider: &AlloyProvider,
    factory: &ContractFactory,
) -> Result<Deployment, Error> {
    let pending = submit(provider, factory).await?;
    let hash = *pending.tx_hash();
    let receipt = pending
        .get_receipt()
        .await
        .map_err(|source| Error::Confirmation { hash, source })?;
    deployment(factory, &receipt)
}

async fn submit(
    provider: &AlloyProvider,
    factory: &ContractFactory,
) -> Result<PendingTransactionBuilder<Ethereum>, Error> {
    let tx = TransactionRequest::default().with_deploy_code(factory.bytecode.clone());
    let pending = provider
        .send_transaction(tx)
        .await
        .map_err(Error::Submit)?;
    tracing::info!(
        contract = %factory.name,
        hash = ?pending.tx_hash(),
        "deployment transaction submitted"
    );
    Ok(pending)
}

/// Turns the receipt of a creation transaction into the deployment report.
fn deployment(
    factory: &ContractFactory,
    receipt: &TransactionReceipt,
) -> Result<Deployment, Error> {
    let hash = receipt.transaction_hash;
    if !receipt.status() {
        return Err(Error::Reverted(hash));
    }
    let address = receipt
        .contract_address()
        .ok_or(Error::MissingContractAddress(hash))?;
    tracing::info!(
        contract = %factory.name,
        %address,
        block = ?receipt.block_number,
        gas_used = receipt.gas_used,
        "deployment confirmed"
    );

    Ok(Deployment {
        contract: factory.name.clone(),
        address,
        transaction_hash: hash,
        block_number: receipt.block_number,
        gas_used: receipt.gas_used,
    })
}
