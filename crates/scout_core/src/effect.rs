use crate::{Generation, SearchRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the search request and stream its events tagged with `generation`.
    OpenStream {
        generation: Generation,
        request: SearchRequest,
    },
    /// Stop reading the stream of `generation`.
    CancelStream { generation: Generation },
}
