use crate::{Generation, SearchRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a validated search.
    SearchSubmitted(SearchRequest),
    /// User asked for a clean slate.
    ResetClicked,
    /// Raw payload decoded from the event stream of `generation`.
    StreamPayload {
        generation: Generation,
        payload: String,
    },
    /// The stream of `generation` closed normally.
    StreamFinished { generation: Generation },
    /// The stream of `generation` failed at the transport level.
    StreamFailed {
        generation: Generation,
        message: String,
    },
    NoOp,
}
