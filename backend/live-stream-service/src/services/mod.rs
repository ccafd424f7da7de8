//! Service layer for the live-stream broker

pub mod live_stream;

pub use live_stream::LiveStreamService;
