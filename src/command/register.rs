// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use secrecy::ExposeSecret as _;

use crate::{
    api::{self, Executor as _},
    client::Transport,
    error::{self, Result},
    password::Prompt as _,
};

use super::Context;

/// Create a new account.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The username to register.
    username: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute<T: Transport>(self, ctx: &Context<T>) -> Result<()> {
        let password = ctx.prompt.prompt(ctx.t("register.password-prompt")).await?;
        let confirmation = ctx.prompt.prompt(ctx.t("register.confirm-prompt")).await?;
        if password.expose_secret() != confirmation.expose_secret() {
            return Err(error::Password::Mismatch.into());
        }

        let message = api::Register {
            username: self.username,
            password,
        }
        .execute(&ctx.client)
        .await?;

        println!(
            "{}",
            message.as_deref().unwrap_or_else(|| ctx.t("register.success"))
        );
        Ok(())
    }
}
