//! Errors that can occur when talking to the remote service.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response (DNS, TLS, connection reset...)
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with something other than 200
    #[error("Unexpected status {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The body was not the JSON we expected
    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    /// The response decoded but lacked a key the operation needs
    #[error("Missing \"{path}\" in response from {operation}")]
    MissingField { operation: String, path: String },

    /// GraphQL reported errors and no data
    #[error("{operation} failed: {messages}")]
    GraphQl { operation: String, messages: String },

    /// A required named query is not in the catalog
    #[error("Query {0} is not in the query catalog")]
    MissingQuery(String),

    /// The query directory could not be read
    #[error("Failed to read queries from {path}: {source}")]
    Queries {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured header value cannot be sent (e.g. a cookie with a newline)
    #[error("Invalid value for header {0}")]
    InvalidHeader(String),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
