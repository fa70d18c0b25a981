use thiserror::Error;

/// Failures surfaced by the task store.
///
/// Unknown ids, unmatched voice titles and unrecognized utterances are
/// deliberately *not* errors; they resolve to no-ops or response strings.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed creation input: empty title or an inverted time window.
    #[error("invalid task: {0}")]
    Validation(String),

    /// The durable surface rejected a write.
    #[error("failed to persist task data: {source}")]
    Persistence {
        #[from]
        source: std::io::Error,
    },
}
