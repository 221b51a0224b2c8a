use alloy::{
    network::EthereumWallet,
    primitives::Address,
    signers::local::PrivateKeySigner,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no signing credentials configured")]
    NoCredentials,
    /// The key itself is never part of the message.
    #[error("credential #{index} is not a valid secp256k1 private key")]
    InvalidKey { index: usize },
}

/// Parses hex encoded private keys (with or without `0x` prefix) into
/// signers.
pub fn signers<I, S>(keys: I) -> Result<Vec<PrivateKeySigner>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .enumerate()
        .map(|(index, key)| {
            key.as_ref()
                .trim()
                .parse::<PrivateKeySigner>()
                .map_err(|_| Error::InvalidKey { index })
        })
        .collect()
}

/// Builds a wallet holding all given signers. The first one is the default
/// signer, i.e. the one that sends transactions without an explicit `from`.
pub fn from_signers(signers: Vec<PrivateKeySigner>) -> Result<(EthereumWallet, Address), Error> {
    let mut signers = signers.into_iter();
    let first = signers.next().ok_or(Error::NoCredentials)?;
    let default_signer = first.address();
    let mut wallet = EthereumWallet::new(first);
    for signer in signers {
        wallet.register_signer(signer);
    }
    Ok((wallet, default_signer))
}
