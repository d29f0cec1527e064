use thiserror::Error;

/// Failure taxonomy for the harness.
///
/// Every on-chain failure is fatal: the harness performs no retries,
/// because state-mutating chain calls are not safely retryable without
/// re-validating nonces and balances. Errors propagate to the scenario
/// binary, which reports them and exits non-zero.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid impersonation address '{0}'")]
    InvalidAddress(String),

    #[error("Chain call failed ({context}): {reason}")]
    ChainCall { context: String, reason: String },

    #[error("Gas estimation failed ({context}): {reason}")]
    Estimation { context: String, reason: String },
}

impl HarnessError {
    /// A reverted or rejected query/transaction, carrying the remote
    /// error text verbatim.
    pub fn chain(context: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ChainCall {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    pub fn estimation(context: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Estimation {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_error_carries_context_and_reason() {
        let err = HarnessError::chain("vault.deposit", "execution reverted: TRANSFER_FROM_FAILED");
        assert_eq!(
            err.to_string(),
            "Chain call failed (vault.deposit): execution reverted: TRANSFER_FROM_FAILED"
        );
    }

    #[test]
    fn estimation_error_is_distinct_from_chain_call() {
        let est = HarnessError::estimation("teller.bulkWithdraw", "gas required exceeds allowance");
        assert!(matches!(est, HarnessError::Estimation { .. }));
    }
}
