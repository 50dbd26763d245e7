use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("application default credentials unavailable: {0}")]
    Auth(#[from] gcp_auth::Error),

    #[error("invalid endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API Error {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode protobuf response: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("service error {code}: {message}")]
    Service { code: i32, message: String },

    #[error("service returned no response for the image")]
    EmptyResponse,
}
