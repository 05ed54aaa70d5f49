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

/// Manage your boxes.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List all boxes.
    List,
    /// Create a new box.
    Create {
        /// The title of the new box.
        title: String,
        /// An optional free-form description.
        #[clap(short, long)]
        description: Option<String>,
    },
    /// Change a box's title or description.
    Update {
        /// The id of the box to update.
        id: u64,
        #[clap(short, long)]
        title: Option<String>,
        #[clap(short, long)]
        description: Option<String>,
    },
    /// Delete a box.
    Rm {
        /// The id of the box to delete.
        id: u64,
    },
}

#[async_trait]
impl super::Command for Command {
    async fn execute<T: Transport>(self, ctx: &Context<T>) -> Result<()> {
        match self {
            Self::List => {
                let boxes = api::GetBoxes.execute(&ctx.client).await?;
                if boxes.is_empty() {
                    println!("{}", ctx.t("boxes.empty"));
                } else {
                    super::print_table(&boxes);
                }
            }
            Self::Create { title, description } => {
                let created = api::CreateBox { title, description }
                    .execute(&ctx.client)
                    .await?;
                println!("{}", ctx.t("boxes.created"));
                super::print_table(&[created]);
            }
            Self::Update {
                id,
                title,
                description,
            } => {
                let updated = api::UpdateBox {
                    id,
                    title,
                    description,
                }
                .execute(&ctx.client)
                .await?;
                println!("{}", ctx.t("boxes.updated"));
                super::print_table(&[updated]);
            }
            Self::Rm { id } => {
                api::DeleteBox { id }.execute(&ctx.client).await?;
                println!("{}", ctx.t("boxes.deleted"));
            }
        }
        Ok(())
    }
}
