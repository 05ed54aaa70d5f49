// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    client,
    error::{Error, Result},
};

/// The uniform response shape returned by every protected endpoint:
/// `{success, data?, error?, message?}`.
///
/// `success == true` means `data` (possibly absent) is valid; `success ==
/// false` means `error` (or `message`) carries the user-facing failure reason
/// and `data` must be ignored.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub(crate) struct Envelope<T> {
    pub(crate) success: bool,
    pub(crate) data: Option<T>,
    pub(crate) error: Option<String>,
    pub(crate) message: Option<String>,
}

impl<T> Envelope<T> {
    pub(crate) fn into_result(self) -> Result<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(Error::DomainFailure {
                message: self
                    .error
                    .or(self.message)
                    .unwrap_or_else(|| "the server reported a failure".to_owned()),
            })
        }
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Decodes an envelope whose payload is mandatory (create/update
    /// operations return the affected entity).
    pub(crate) fn required(response: &client::Response) -> Result<T> {
        response
            .json::<Self>()?
            .into_result()?
            .ok_or(Error::MissingData)
    }
}

impl<T: DeserializeOwned + Default> Envelope<T> {
    /// Decodes an envelope whose payload may be absent on success; list
    /// operations treat a missing `data` as an empty collection, not an error.
    pub(crate) fn or_default(response: &client::Response) -> Result<T> {
        Ok(response
            .json::<Self>()?
            .into_result()?
            .unwrap_or_default())
    }
}

/// Decodes an envelope carrying no payload of interest. An entirely empty
/// body is accepted as success for servers that respond 2xx without one.
pub(crate) fn ack(response: &client::Response) -> Result<()> {
    if response.body.is_empty() {
        return Ok(());
    }
    let _ = response
        .json::<Envelope<serde_json::Value>>()?
        .into_result()?;
    Ok(())
}
