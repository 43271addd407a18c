//! Core data types for the Saga interactive narrative service.
//!
//! This crate provides the data types shared by the model driver, the
//! narrative engine and the HTTP surface: role-tagged chat messages, the
//! generation request/response pair, and the structured story turn.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod message;
mod request;
mod role;
mod story;

pub use message::Message;
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateRequestBuilderError, GenerateResponse,
    GenerateResponseBuilder, GenerateResponseBuilderError, TokenUsage,
};
pub use role::Role;
pub use story::{CHOICE_COUNT, StoryResponse};
