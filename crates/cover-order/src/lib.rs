//! Print order submission
//!
//! A finished cover is sent once, as base64 JPEG inside a JSON body, to an
//! HTTP endpoint that forwards it to the print shop. There is no automatic
//! retry: a failed attempt is reported and the caller decides.

mod client;
mod types;

pub use client::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Order rejected: {0}")]
    Rejected(String),
    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Nothing to submit: the image is empty")]
    EmptyImage,
}

pub type Result<T> = std::result::Result<T, OrderError>;
