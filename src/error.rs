use std::fmt;


// Client and server disagree about the protocol. Never recovered from: the offending message is
// dropped and the error is surfaced to the front-end.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ProtocolError {
    // Not a JSON object, no string `type`, or payload does not match the variant.
    Decode(String),
    UnsupportedEventType(String),
    // The server confirmed game creation without telling us which game.
    MissingJoinId,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Decode(message) => write!(f, "Cannot decode server event: {message}"),
            ProtocolError::UnsupportedEventType(tag) => {
                write!(f, "Unsupported event type: {tag}.")
            }
            ProtocolError::MissingJoinId => write!(f, "Server sent \"init\" without a join ID"),
        }
    }
}

impl std::error::Error for ProtocolError {}
