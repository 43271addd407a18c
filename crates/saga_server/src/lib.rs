//! HTTP API for Saga narrative sessions.
//!
//! | method   | path            | body         | response                         |
//! |----------|-----------------|--------------|----------------------------------|
//! | `POST`   | `/story`        | `{theme}`    | `{narrative, choices}`           |
//! | `POST`   | `/story/choice` | `{choice}`   | `{narrative, choices}`           |
//! | `GET`    | `/story`        |              | session snapshot                 |
//! | `DELETE` | `/story`        |              | 204                              |
//! | `GET`    | `/health`       |              | `{status, provider, model, ...}` |
//!
//! Sessions are addressed by the `x-session-id` header. `POST /story`
//! generates one when it is absent and every story response echoes it.
//!
//! Errors are `{"error": "..."}`: 400 for invalid input, 409 for a session
//! that is not started or already concluded, 502 when the model call fails.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod error;
mod server;

pub use api::{ApiState, ChoiceRequest, SESSION_HEADER, StartRequest, create_router};
pub use error::ApiError;
pub use server::serve;
