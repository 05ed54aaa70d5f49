// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::warn;

use crate::{
    api::{self, Executor as _},
    client::Transport,
    error::Result,
};

use super::Context;

/// Log out and discard the stored session.
#[derive(Debug, Parser)]
pub(crate) struct Command {}

#[async_trait]
impl super::Command for Command {
    async fn execute<T: Transport>(self, ctx: &Context<T>) -> Result<()> {
        // The server call is best-effort; local teardown happens no matter
        // what it returns.
        let remote = api::Logout.execute(&ctx.client).await;

        {
            let mut store = ctx.client.session().lock().await;
            store.clear_auth().await?;
        }

        if let Err(e) = remote {
            warn!("{}: {}", ctx.t("logout.server-warning"), e);
        }

        println!("{}", ctx.t("logout.success"));
        Ok(())
    }
}
