use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimulationError {
    /// The plan yielded an action outside the recognized vocabulary. Carries
    /// the offending raw value. Fatal to the driver that dequeued it.
    #[error("Malformed insertion plan action: {0:?}")]
    MalformedPlan(serde_yaml::Value),

    /// A replayed run produced a different state digest than expected.
    #[error("State hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
