pub mod errors;
mod instrumentation;
pub mod wallet;

use {
    crate::AlloyProvider,
    alloy::{
        network::EthereumWallet,
        providers::{Provider, ProviderBuilder},
        rpc::client::ClientBuilder,
    },
    instrumentation::LoggingLayer,
    url::Url,
};

/// Creates a read-only provider talking to the node at `url`. Every request
/// is logged with the given label.
pub fn provider(url: &Url, label: &str) -> AlloyProvider {
    let rpc = ClientBuilder::default()
        .layer(LoggingLayer {
            label: label.into(),
        })
        .http(url.clone());
    ProviderBuilder::new().connect_client(rpc).erased()
}

/// Creates a provider that signs and fills (nonce, gas, chain id) outgoing
/// transactions with the signers of `wallet`.
pub fn provider_with_wallet(url: &Url, label: &str, wallet: EthereumWallet) -> AlloyProvider {
    let rpc = ClientBuilder::default()
        .layer(LoggingLayer {
            label: label.into(),
        })
        .http(url.clone());
    ProviderBuilder::new()
        .wallet(wallet)
        .connect_client(rpc)
        .erased()
}
