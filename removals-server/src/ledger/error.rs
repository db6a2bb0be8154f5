//! Order ledger error types.

/// Errors from the durable order ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Startup scan found unreadable or corrupt trailing state.
    ///
    /// Fatal: the process must not serve traffic with an ambiguous id
    /// counter.
    #[error("ledger recovery failed: {message}")]
    Recovery { message: String },

    /// Appending a record failed after its id was issued.
    ///
    /// The id is consumed and will not be reissued; the caller decides
    /// whether to retry or escalate.
    #[error("failed to persist order {order_id}: {message}")]
    Persistence { order_id: u64, message: String },

    /// The ledger file could not be created or opened.
    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the header record failed.
    #[error("ledger write error: {0}")]
    Csv(#[from] csv::Error),
}
