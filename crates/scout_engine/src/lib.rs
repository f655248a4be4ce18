//! Job scout engine: event stream decoding and the streaming search client.
mod engine;
mod frame;
mod stream;
mod types;
mod utf8;

pub use engine::EngineHandle;
pub use frame::{FrameDecoder, DATA_PREFIX, DONE_SENTINEL, FRAME_DELIMITER};
pub use stream::{
    ChannelPayloadSink, PayloadSink, ReqwestSearchStreamer, SearchSettings, SearchStreamer,
};
pub use types::{
    EngineEvent, EngineStopped, FailureKind, Generation, StreamError, StreamSummary,
};
pub use utf8::Utf8ChunkDecoder;
