// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::warn;

use crate::{
    api,
    client::Transport,
    error::Result,
    password::Prompt as _,
};

use super::Context;

/// Log in and store the session token.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The username to authenticate as.
    username: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute<T: Transport>(self, ctx: &Context<T>) -> Result<()> {
        let password = ctx.prompt.prompt(ctx.t("login.password-prompt")).await?;
        api::sign_in(&ctx.client, &self.username, password).await?;

        {
            let store = ctx.client.session().lock().await;
            if !store.is_persistent() {
                warn!("The session is held in memory only and will be forgotten at exit");
            }
        }

        println!("{}", ctx.t("login.success"));
        Ok(())
    }
}
