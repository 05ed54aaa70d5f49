// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use secrecy::{ExposeSecret as _, SecretString};
use sha2::{Digest as _, Sha256};
use tokio::task;

use crate::error::Result;

/// Computes the lowercase hex SHA-256 digest of the password. Only the digest
/// ever leaves the process; salting and server-side rehashing remain the
/// server's responsibility.
pub(crate) fn hash_password(password: &SecretString) -> String {
    hex::encode(Sha256::digest(password.expose_secret().as_bytes()))
}

#[async_trait]
pub(crate) trait Prompt: Send + Sync {
    async fn prompt(&self, message: &str) -> Result<SecretString>;
}

#[async_trait]
impl<T: Prompt + ?Sized> Prompt for Box<T> {
    async fn prompt(&self, message: &str) -> Result<SecretString> {
        (**self).prompt(message).await
    }
}

pub(crate) struct TerminalPrompt;

#[async_trait]
impl Prompt for TerminalPrompt {
    async fn prompt(&self, message: &str) -> Result<SecretString> {
        let message = format!("{message}: ");
        Ok(task::spawn_blocking(move || {
            rpassword::prompt_password(message).map(SecretString::new)
        })
        .await??)
    }
}
