// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{
    api::{self, Executor as _},
    client::Transport,
    error::Result,
};

use super::Context;

/// Find items by title across all boxes.
#[derive(Debug, Parser)]
pub(crate) struct Command {
    /// The item title to look for.
    title: String,
}

#[async_trait]
impl super::Command for Command {
    async fn execute<T: Transport>(self, ctx: &Context<T>) -> Result<()> {
        let items = api::FindItems { title: self.title }.execute(&ctx.client).await?;
        if items.is_empty() {
            println!("{}", ctx.t("search.empty"));
        } else {
            super::print_table(&items);
        }
        Ok(())
    }
}
