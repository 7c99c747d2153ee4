//! Agent Forge HTTP API.
//!
//! Axum server exposing the agent-builder pipeline under `/api`:
//!
//! | Method | Path                | Description |
//! |--------|---------------------|-------------|
//! | `GET`  | `/api/health`       | Credential and settings probe. |
//! | `GET`  | `/api/sample-prompts` | Example agent descriptions. |
//! | `POST` | `/api/parse`        | Free text → structured agent profile. |
//! | `POST` | `/api/deploy`       | Start an asynchronous deployment. |
//! | `GET`  | `/api/status/{id}`  | Poll one deployment. |
//! | `POST` | `/api/test`         | Query a completed deployment. |

pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{build_router, serve};
pub use state::{AppState, CredentialProbe};
