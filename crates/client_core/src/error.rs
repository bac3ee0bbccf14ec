use shared::{
    domain::Screen,
    error::{ProtocolError, ValidationError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("server url '{url}' is not usable: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to connect websocket {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("connection to the game server is closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("no accusation is in progress")]
    NoAccusationOpen,
    #[error("not available on the {screen:?} screen")]
    NotInGame { screen: Screen },
}
