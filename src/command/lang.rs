// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{client::Transport, error::Result, model::lang::Lang};

use super::Context;

/// Set the preferred display language.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The language to use from now on.
    #[clap(value_enum)]
    language: Lang,
}

#[async_trait]
impl super::Command for Command {
    async fn execute<T: Transport>(self, ctx: &Context<T>) -> Result<()> {
        {
            let mut store = ctx.client.session().lock().await;
            store.set_lang(self.language).await?;
        }

        // Confirm in the language that was just selected, not the one the
        // invocation started with.
        println!(
            "{}",
            ctx.translations.lookup("lang.updated", self.language)
        );
        Ok(())
    }
}
