use alloy::transports::{RpcError, TransportError};

/// Coarse classification of a failed RPC interaction, used to tell an
/// operator where to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never got an answer (DNS, refused connection, TLS, HTTP
    /// status).
    Unreachable,
    /// The node answered with a JSON-RPC error that carries no revert data,
    /// e.g. insufficient funds or a nonce that is too low.
    Rejected,
    /// Executing the transaction reverted.
    Reverted,
    /// Anything else (malformed responses, serialization).
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Unreachable => "node unreachable",
            Self::Rejected => "rejected by node",
            Self::Reverted => "execution reverted",
            Self::Other => "unexpected node response",
        })
    }
}

pub fn classify(err: &TransportError) -> ErrorKind {
    match err {
        RpcError::Transport(_) => ErrorKind::Unreachable,
        RpcError::ErrorResp(payload) => {
            // Reverts with empty revert data still show up as "revert data"
            // being present, so this check must not decode the data.
            let no_revert_data = payload.as_revert_data().is_none();
            tracing::debug!(?payload, %no_revert_data, "transport rpc error");
            if no_revert_data {
                ErrorKind::Rejected
            } else {
                ErrorKind::Reverted
            }
        }
        _ => ErrorKind::Other,
    }
}

/// Returns whether the node could not be reached at all.
pub fn is_connection_error(err: &TransportError) -> bool {
    classify(err) == ErrorKind::Unreachable
}

/// Returns whether the node answered but refused the request.
pub fn is_node_error(err: &TransportError) -> bool {
    classify(err) == ErrorKind::Rejected
}
