//! Compiled contract artifacts as written by Hardhat (`artifacts/`) or
//! Foundry (`out/`), and the lookup of an artifact by contract name.

use {
    crate::config::compiler::{CompilerSettings, Optimizer},
    alloy::{json_abi::JsonAbi, primitives::Bytes},
    serde::Deserialize,
    std::{
        fmt::{self, Display, Formatter},
        path::{Path, PathBuf},
    },
    walkdir::WalkDir,
};

/// Everything needed to create an instance of a contract.
#[derive(Clone, Debug)]
pub struct ContractFactory {
    pub name: String,
    pub abi: JsonAbi,
    /// Creation (init) code.
    pub bytecode: Bytes,
    /// Only present in artifacts that embed the solc metadata.
    pub compiler: Option<CompilerMetadata>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerMetadata {
    /// Full version string, e.g. `0.8.17+commit.8df45f5f`.
    pub version: String,
    pub optimizer: Option<Optimizer>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("artifacts directory {0:?} does not exist, compile the contracts first")]
    MissingArtifacts(PathBuf),
    #[error("I/O error while reading {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no artifact found for contract `{0}`")]
    NotFound(String),
    #[error("contract name `{name}` is ambiguous, use a fully qualified name: {candidates:?}")]
    Ambiguous {
        name: String,
        candidates: Vec<PathBuf>,
    },
    #[error("malformed artifact {path:?}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("bytecode of `{0}` references libraries that were not linked")]
    UnlinkedLibraries(String),
    #[error("bytecode of `{name}` is not valid hex: {reason}")]
    InvalidBytecode { name: String, reason: String },
    #[error("`{0}` is abstract or an interface and cannot be deployed")]
    NotDeployable(String),
    #[error("constructor of `{name}` expects {count} argument(s) but none can be passed")]
    ConstructorArguments { name: String, count: usize },
    #[error("`{name}` was compiled with {found} but the configuration expects {expected}")]
    CompilerMismatch {
        name: String,
        expected: String,
        found: String,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: Option<String>,
    #[serde(default)]
    abi: JsonAbi,
    bytecode: RawBytecode,
    /// Foundry writes the metadata as an object, plain solc output as a JSON
    /// encoded string.
    metadata: Option<serde_json::Value>,
}

/// Hardhat stores the code as a hex string, solc and Foundry wrap it in an
/// object next to link references and source maps.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

#[derive(Deserialize)]
struct Metadata {
    compiler: MetadataCompiler,
    #[serde(default)]
    settings: MetadataSettings,
}

#[derive(Deserialize)]
struct MetadataCompiler {
    version: String,
}

#[derive(Default, Deserialize)]
struct MetadataSettings {
    optimizer: Option<MetadataOptimizer>,
}

#[derive(Deserialize)]
struct MetadataOptimizer {
    enabled: Option<bool>,
    runs: Option<u32>,
}

fn compiler_metadata(metadata: serde_json::Value) -> Option<CompilerMetadata> {
    let metadata: Metadata = match metadata {
        serde_json::Value::String(json) => serde_json::from_str(&json),
        object => serde_json::from_value(object),
    }
    .inspect_err(|err| tracing::debug!(?err, "ignoring undecodable artifact metadata"))
    .ok()?;
    let optimizer = metadata.settings.optimizer.and_then(|optimizer| {
        Some(Optimizer {
            enabled: optimizer.enabled?,
            runs: optimizer.runs?,
        })
    });
    Some(CompilerMetadata {
        version: metadata.compiler.version,
        optimizer,
    })
}

impl ContractFactory {
    /// Finds and parses the artifact of `name` below `artifacts`. `name` is
    /// either a bare contract name (`POANFT`) or a fully qualified one
    /// (`contracts/POANFT.sol:POANFT`).
    pub fn load(artifacts: &Path, name: &str) -> Result<Self, Error> {
        let path = find(artifacts, name)?;
        tracing::debug!(?path, "using artifact");
        let json = std::fs::read_to_string(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        let contract = name.rsplit_once(':').map_or(name, |(_, contract)| contract);
        Self::from_json(contract, &json).map_err(|err| match err {
            Error::Malformed { source, .. } => Error::Malformed { path, source },
            err => err,
        })
    }

    /// Parses artifact JSON. The contract name recorded in the artifact wins
    /// over `name`.
    pub fn from_json(name: &str, json: &str) -> Result<Self, Error> {
        let raw: RawArtifact = serde_json::from_str(json).map_err(|source| Error::Malformed {
            path: PathBuf::new(),
            source,
        })?;
        let name = raw.contract_name.unwrap_or_else(|| name.to_string());

        let code = match raw.bytecode {
            RawBytecode::Hex(code) | RawBytecode::Object { object: code } => code,
        };
        let code = code.trim();
        if code.contains("__$") {
            return Err(Error::UnlinkedLibraries(name));
        }
        let bytecode: Bytes = code.parse().map_err(|err| Error::InvalidBytecode {
            name: name.clone(),
            reason: format!("{err}"),
        })?;
        if bytecode.is_empty() {
            return Err(Error::NotDeployable(name));
        }

        let count = raw
            .abi
            .constructor
            .as_ref()
            .map_or(0, |constructor| constructor.inputs.len());
        if count > 0 {
            return Err(Error::ConstructorArguments { name, count });
        }

        Ok(Self {
            name,
            abi: raw.abi,
            bytecode,
            compiler: raw.metadata.and_then(compiler_metadata),
        })
    }

    /// Checks that the artifact was built with the configured compiler
    /// settings. Artifacts that carry no metadata (Hardhat) always pass.
    pub fn check_compiler(&self, settings: &CompilerSettings) -> Result<(), Error> {
        let Some(compiler) = &self.compiler else {
            tracing::debug!(contract = %self.name, "artifact has no compiler metadata");
            return Ok(());
        };
        let version_matches = settings.matches_version(&compiler.version);
        let optimizer_matches = compiler
            .optimizer
            .is_none_or(|optimizer| same_optimizer(&optimizer, &settings.optimizer));
        if version_matches && optimizer_matches {
            return Ok(());
        }
        Err(Error::CompilerMismatch {
            name: self.name.clone(),
            expected: settings.to_string(),
            found: compiler.to_string(),
        })
    }
}

impl Display for CompilerMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.optimizer {
            Some(optimizer) => write!(f, "solc {} ({optimizer})", self.version),
            None => write!(f, "solc {}", self.version),
        }
    }
}

fn same_optimizer(a: &Optimizer, b: &Optimizer) -> bool {
    // solc ignores `runs` while the optimizer is off.
    a.enabled == b.enabled && (!a.enabled || a.runs == b.runs)
}

fn find(artifacts: &Path, name: &str) -> Result<PathBuf, Error> {
    if !artifacts.is_dir() {
        return Err(Error::MissingArtifacts(artifacts.to_path_buf()));
    }

    let (source, contract) = match name.rsplit_once(':') {
        Some((source, contract)) => (Some(Path::new(source)), contract),
        None => (None, name),
    };
    let file_name = format!("{contract}.json");

    // Hardhat mirrors the source tree below the artifacts directory.
    if let Some(source) = source {
        let exact = artifacts.join(source).join(&file_name);
        if exact.is_file() {
            return Ok(exact);
        }
    }

    let mut candidates = collect(artifacts, &file_name)?;
    // Foundry only keeps the file name of the source.
    if let Some(source_file) = source.and_then(Path::file_name) {
        candidates.retain(|path| path.parent().and_then(Path::file_name) == Some(source_file));
    }
    candidates.sort();

    match candidates.len() {
        0 => Err(Error::NotFound(name.to_string())),
        1 => Ok(candidates.remove(0)),
        _ => Err(Error::Ambiguous {
            name: name.to_string(),
            candidates,
        }),
    }
}

/// All files named `file_name` below `artifacts`.
fn collect(artifacts: &Path, file_name: &str) -> Result<Vec<PathBuf>, Error> {
    WalkDir::new(artifacts)
        .into_iter()
        // Compiler inputs and outputs, not contracts.
        .filter_entry(|entry| !(entry.file_type().is_dir() && entry.file_name() == "build-info"))
        .filter_map(|entry| match entry {
            Ok(entry) if !entry.file_type().is_dir() && entry.file_name() == file_name => {
                Some(Ok(entry.into_path()))
            }
            Ok(_) => None,
            Err(err) => Some(Err(Error::Io {
                path: err.path().unwrap_or(artifacts).to_path_buf(),
                source: err.into(),
            })),
        })
        .collect()
}
