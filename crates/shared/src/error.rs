use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed server frame: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("roster must contain at least one suspect")]
    EmptyRoster,
    #[error("suspect #{position} has a blank name")]
    BlankSuspectName { position: usize },
    #[error("invalid choice '{input}': enter a number between 1 and {max}")]
    InvalidChoice { input: String, max: usize },
}
