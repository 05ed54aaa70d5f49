// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{
    api::{self, Executor as _},
    client::Transport,
    error::{Error, Result},
};

use super::Context;

/// Show the profile of the logged-in user (or any user by name).
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The username to look up; defaults to the current session's user.
    username: Option<String>,
}

#[async_trait]
impl super::Command for Command {
    async fn execute<T: Transport>(self, ctx: &Context<T>) -> Result<()> {
        let username = match self.username {
            Some(username) => username,
            None => {
                let store = ctx.client.session().lock().await;
                store
                    .user()
                    .map(|user| user.username.clone())
                    .ok_or(Error::NoCredentials)?
            }
        };

        let profile = api::GetUserProfile { username }.execute(&ctx.client).await?;
        super::print_table(&[profile]);
        Ok(())
    }
}
