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

/// Manage the items inside a box.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List the items in a box.
    List {
        /// The id of the box.
        box_id: u64,
    },
    /// Add an item to a box.
    Add {
        /// The id of the box to add to.
        box_id: u64,
        /// The title of the new item.
        title: String,
        /// How many of the item the box holds.
        #[clap(short, long)]
        quantity: Option<u32>,
        /// Label ids to attach to the item.
        #[clap(short, long)]
        label: Vec<u64>,
    },
    /// Change an item's title or quantity.
    Update {
        /// The id of the box holding the item.
        box_id: u64,
        /// The id of the item to update.
        item_id: u64,
        #[clap(short, long)]
        title: Option<String>,
        #[clap(short, long)]
        quantity: Option<u32>,
    },
    /// Remove an item from a box.
    Rm {
        /// The id of the box holding the item.
        box_id: u64,
        /// The id of the item to remove.
        item_id: u64,
    },
}

#[async_trait]
impl super::Command for Command {
    async fn execute<T: Transport>(self, ctx: &Context<T>) -> Result<()> {
        match self {
            Self::List { box_id } => {
                let items = api::GetItems { box_id }.execute(&ctx.client).await?;
                if items.is_empty() {
                    println!("{}", ctx.t("items.empty"));
                } else {
                    super::print_table(&items);
                }
            }
            Self::Add {
                box_id,
                title,
                quantity,
                label,
            } => {
                let added = api::CreateItem {
                    box_id,
                    title,
                    quantity,
                    labels: label,
                }
                .execute(&ctx.client)
                .await?;
                println!("{}", ctx.t("items.added"));
                super::print_table(&[added]);
            }
            Self::Update {
                box_id,
                item_id,
                title,
                quantity,
            } => {
                let updated = api::UpdateItem {
                    box_id,
                    item_id,
                    title,
                    quantity,
                }
                .execute(&ctx.client)
                .await?;
                println!("{}", ctx.t("items.updated"));
                super::print_table(&[updated]);
            }
            Self::Rm { box_id, item_id } => {
                api::DeleteItem { box_id, item_id }.execute(&ctx.client).await?;
                println!("{}", ctx.t("items.removed"));
            }
        }
        Ok(())
    }
}
