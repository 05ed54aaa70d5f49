// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use tabled::{settings::Style, Table, Tabled};

use crate::{
    client::{self, Transport},
    error::Result,
    i18n,
    model::lang::Lang,
    password,
};

pub(crate) mod boxes;
pub(crate) mod items;
pub(crate) mod labels;
pub(crate) mod lang;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod register;
pub(crate) mod search;
pub(crate) mod whoami;

/// Everything a command needs: the API client (which owns the shared session
/// store), the translation table, the resolved display language, and a way
/// to ask for passwords.
pub(crate) struct Context<T> {
    pub(crate) client: client::Client<T>,
    pub(crate) translations: i18n::Translations,
    pub(crate) language: Lang,
    pub(crate) prompt: Box<dyn password::Prompt>,
}

impl<T> Context<T> {
    /// Localized text for a string id, degrading to the id itself.
    pub(crate) fn t<'ctx>(&'ctx self, id: &'ctx str) -> &'ctx str {
        self.translations.lookup(id, self.language)
    }
}

#[async_trait]
pub(crate) trait Command {
    async fn execute<T: Transport>(self, ctx: &Context<T>) -> Result<()>;
}

pub(crate) fn print_table<R: Tabled>(rows: &[R]) {
    println!("{}", Table::new(rows).with(Style::rounded()));
}
