//! Request and Response models for the cache HTTP API

pub mod requests;
pub mod responses;

pub use requests::{validate_key, PutRequest, MAX_KEY_LENGTH};
pub use responses::{
    CountResponse, EntryResponse, ExistsResponse, HealthResponse, MessageResponse, StatsResponse,
    ValueResponse,
};
