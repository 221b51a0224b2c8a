use {
    alloy::signers::local::PrivateKeySigner,
    ethrpc::alloy::wallet,
    std::fmt::{self, Display, Formatter},
    url::Url,
};

pub const ETHER_MAIN: &str = "etherMain";
pub const SEPOLIA: &str = "sepolia";
pub const MUMBAI: &str = "mumbai";
pub const LOCAL: &str = "local";

/// RPC endpoint of a development node running on this machine.
pub const LOCAL_URL: &str = "http://localhost:8545/";

/// Public development keys of accounts #0 and #1 derived from the
/// `test test ... junk` mnemonic that Hardhat and Anvil fund on startup.
/// They are not secrets.
pub const LOCAL_ACCOUNTS: [&str; 2] = [
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
];

/// Where a value of a profile came from. Used to tell the operator which
/// variable to set when the value is missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Origin {
    /// Read from the named environment variable.
    Env(String),
    /// Written directly into the configuration.
    #[default]
    Literal,
}

impl Origin {
    fn hint(&self) -> String {
        match self {
            Origin::Env(var) => format!(" (set {var})"),
            Origin::Literal => String::new(),
        }
    }
}

/// A named network as written in the configuration. Fields may be missing;
/// they are only checked once the profile gets selected for a deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkProfile {
    pub name: String,
    pub url: Option<String>,
    pub url_origin: Origin,
    pub accounts: Vec<String>,
    pub accounts_origin: Origin,
    /// Chain the node is expected to serve.
    pub chain_id: Option<u64>,
}

/// A profile that passed validation and can be deployed to.
#[derive(Debug)]
pub struct Network {
    pub name: String,
    pub url: Url,
    pub signers: Vec<PrivateKeySigner>,
    pub chain_id: Option<u64>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown network `{name}`, configured networks: {known}")]
    UnknownNetwork { name: String, known: String },
    #[error("network `{network}` has no RPC URL{}", .origin.hint())]
    MissingUrl { network: String, origin: Origin },
    #[error("network `{network}` has an invalid RPC URL{}", .origin.hint())]
    InvalidUrl {
        network: String,
        origin: Origin,
        #[source]
        source: url::ParseError,
    },
    #[error("network `{network}` has no signing credentials{}", .origin.hint())]
    NoCredentials { network: String, origin: Origin },
    #[error("network `{network}` has invalid signing credentials{}", .origin.hint())]
    InvalidCredentials {
        network: String,
        origin: Origin,
        #[source]
        source: wallet::Error,
    },
}

impl NetworkProfile {
    /// Builds a profile whose URL and single account are read from the
    /// given environment variables. Unset or empty variables leave the
    /// corresponding field empty.
    pub fn from_env(
        name: &str,
        url_var: &str,
        key_var: &str,
        env: &impl Fn(&str) -> Option<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            url: lookup(env, url_var),
            url_origin: Origin::Env(url_var.to_string()),
            accounts: lookup(env, key_var).into_iter().collect(),
            accounts_origin: Origin::Env(key_var.to_string()),
            chain_id: None,
        }
    }

    /// The development node profile with its hard-coded endpoint and keys.
    pub fn local() -> Self {
        Self {
            name: LOCAL.to_string(),
            url: Some(LOCAL_URL.to_string()),
            url_origin: Origin::Literal,
            accounts: LOCAL_ACCOUNTS.iter().map(|key| key.to_string()).collect(),
            accounts_origin: Origin::Literal,
            chain_id: None,
        }
    }

    /// Checks that the profile can be used for a deployment: the URL is set
    /// and valid and there is at least one well formed private key.
    pub fn validate(&self) -> Result<Network, Error> {
        let raw_url = self.url.as_deref().ok_or_else(|| Error::MissingUrl {
            network: self.name.clone(),
            origin: self.url_origin.clone(),
        })?;
        let url = raw_url.parse().map_err(|source| Error::InvalidUrl {
            network: self.name.clone(),
            origin: self.url_origin.clone(),
            source,
        })?;
        if self.accounts.is_empty() {
            return Err(Error::NoCredentials {
                network: self.name.clone(),
                origin: self.accounts_origin.clone(),
            });
        }
        let signers =
            wallet::signers(&self.accounts).map_err(|source| Error::InvalidCredentials {
                network: self.name.clone(),
                origin: self.accounts_origin.clone(),
                source,
            })?;

        Ok(Network {
            name: self.name.clone(),
            url,
            signers,
            chain_id: self.chain_id,
        })
    }
}

impl Display for NetworkProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // Remote RPC URLs usually embed provider API keys.
        let url = match (&self.url, &self.url_origin) {
            (None, _) => "None",
            (Some(url), Origin::Literal) => url.as_str(),
            (Some(_), Origin::Env(_)) => "SECRET",
        };
        write!(f, "url: {url}, accounts: {}", self.accounts.len())?;
        if let Some(chain_id) = self.chain_id {
            write!(f, ", chain_id: {chain_id}")?;
        }
        Ok(())
    }
}

pub(crate) fn lookup(env: &impl Fn(&str) -> Option<String>, var: &str) -> Option<String> {
    env(var).filter(|value| !value.trim().is_empty())
}
