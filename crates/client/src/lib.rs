//! # Datamonster Client
//!
//! Talks to the settlement API on behalf of an editing session:
//! - **Transport**: [`Transport`] trait with an HTTP implementation carrying the session cookie
//! - **API**: typed calls for settlements, survivors and the glossary
//! - **Editors**: optimistic creates, confirm-then-reload edits, one submission in flight

pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

pub use api::DatamonsterApi;
pub use config::ClientConfig;
pub use editor::{EditOutcome, SettlementEditor, SurvivorEditor};
pub use error::{ClientError, ClientResult};
pub use session::{SessionContext, SESSION_COOKIE};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
