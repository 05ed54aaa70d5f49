// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Subcommand;

use crate::{
    api::{self, Executor as _},
    client::Transport,
    error::Result,
};

use super::Context;

/// Manage the labels items can carry.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List all labels.
    List,
    /// Create a new label.
    Add {
        /// The name of the new label.
        name: String,
        /// A display color such as `#3b82f6`; the server picks one if
        /// omitted.
        #[clap(short, long)]
        color: Option<String>,
    },
    /// Change a label's name or color.
    Update {
        /// The id of the label to update.
        id: u64,
        #[clap(short, long)]
        name: Option<String>,
        #[clap(short, long)]
        color: Option<String>,
    },
    /// Delete a label.
    Rm {
        /// The id of the label to delete.
        id: u64,
    },
}

#[async_trait]
impl super::Command for Command {
    async fn execute<T: Transport>(self, ctx: &Context<T>) -> Result<()> {
        match self {
            Self::List => {
                let labels = api::GetLabels.execute(&ctx.client).await?;
                if labels.is_empty() {
                    println!("{}", ctx.t("labels.empty"));
                } else {
                    super::print_table(&labels);
                }
            }
            Self::Add { name, color } => {
                let added = api::CreateLabel { name, color }.execute(&ctx.client).await?;
                println!("{}", ctx.t("labels.added"));
                super::print_table(&[added]);
            }
            Self::Update { id, name, color } => {
                let updated = api::UpdateLabel { id, name, color }.execute(&ctx.client).await?;
                println!("{}", ctx.t("labels.updated"));
                super::print_table(&[updated]);
            }
            Self::Rm { id } => {
                api::DeleteLabel { id }.execute(&ctx.client).await?;
                println!("{}", ctx.t("labels.removed"));
            }
        }
        Ok(())
    }
}
