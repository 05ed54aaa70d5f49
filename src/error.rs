// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, result};

use thiserror::Error;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("HTTP transport error: {0}")]
    Http(reqwest::Error),
    #[error("JSON format error: {0}")]
    Json(serde_json::Error),
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed with status {status}")]
    RequestFailed { status: u16 },
    #[error("the stored session is no longer valid")]
    AuthenticationFailed,
    #[error("no credentials are available; log in first")]
    NoCredentials,
    #[error("server error: {message}")]
    DomainFailure { message: String },
    #[error("server reported success but did not return the expected data")]
    MissingData,
    #[error("storage error: {0}")]
    Storage(#[from] Storage),
    #[error("password entry error: {0}")]
    Password(#[from] Password),
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Io(value.into()),
            _ => Self::Json(value),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Io(value.into())
    }
}

#[derive(Error, Debug)]
pub(crate) enum Storage {
    #[error("persisted session record is malformed: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub(crate) enum Password {
    #[error("password entries did not match")]
    Mismatch,
}
