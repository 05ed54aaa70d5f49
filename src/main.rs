// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod api;
mod bootstrap;
mod client;
mod command;
mod error;
mod i18n;
mod metadata;
mod model;
mod password;
mod session;
mod storage;

use std::{path::PathBuf, process, sync::Arc};

use async_trait::async_trait;
use clap::{Parser, Subcommand, ValueEnum};
use client::Transport;
use error::Result;
use log::{error, warn};
use model::lang::Lang;
use tokio::sync::Mutex;
use url::Url;

#[derive(Debug, Subcommand)]
enum Command {
    Login(command::login::Command),
    Register(command::register::Command),
    Logout(command::logout::Command),
    Whoami(command::whoami::Command),
    #[command(subcommand)]
    Boxes(command::boxes::Command),
    #[command(subcommand)]
    Items(command::items::Command),
    #[command(subcommand)]
    Labels(command::labels::Command),
    Search(command::search::Command),
    Lang(command::lang::Command),
}

#[async_trait]
impl command::Command for Command {
    async fn execute<T: Transport>(self, ctx: &command::Context<T>) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.execute(ctx).await,
            Self::Register(cmd) => cmd.execute(ctx).await,
            Self::Logout(cmd) => cmd.execute(ctx).await,
            Self::Whoami(cmd) => cmd.execute(ctx).await,
            Self::Boxes(cmd) => cmd.execute(ctx).await,
            Self::Items(cmd) => cmd.execute(ctx).await,
            Self::Labels(cmd) => cmd.execute(ctx).await,
            Self::Search(cmd) => cmd.execute(ctx).await,
            Self::Lang(cmd) => cmd.execute(ctx).await,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StorageKind {
    /// A JSON record in the platform data directory.
    File,
    /// A cookie-jar text file, matching the browser deployment's cookies.
    Cookies,
    /// No persistence; the session is forgotten at exit.
    Memory,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The base URL of the inventory server.
    #[arg(long, env = "KARTON_URL", default_value = metadata::DEFAULT_BASE_URL, value_parser = Url::parse)]
    url: Url,

    /// Where to keep the session between runs.
    #[arg(long, env = "KARTON_STORAGE", value_enum, default_value_t = StorageKind::File)]
    storage: StorageKind,

    /// Display language for this invocation, overriding the saved
    /// preference.
    #[arg(long, env = "KARTON_LANG", value_enum)]
    language: Option<Lang>,

    /// A browser-style Cookie header to bootstrap the session from instead
    /// of the persisted record.
    #[arg(long, env = "KARTON_COOKIE")]
    cookie: Option<String>,

    /// A translation table to use instead of the built-in one.
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    strings: Option<PathBuf>,

    /// Skip the session liveness check performed at startup.
    #[arg(long)]
    no_validate_session: bool,

    #[clap(subcommand)]
    command: Command,
}

fn get_session_storage(kind: StorageKind) -> Box<dyn storage::Storage<session::Data>> {
    match kind {
        StorageKind::File => {
            if let Some(file_storage) = storage::File::new("session.json") {
                return Box::new(file_storage);
            }
            warn!("We need to fall back to in-memory storage because no data directory is available");
        }
        StorageKind::Cookies => {
            if let Some(jar) = storage::CookieJar::new("cookies.txt") {
                return Box::new(jar);
            }
            warn!("We need to fall back to in-memory storage because no data directory is available");
        }
        StorageKind::Memory => {}
    }

    Box::new(storage::Memory::<session::Data>::new())
}

async fn run(args: Args) -> Result<()> {
    let session = Arc::new(Mutex::new(session::Store::new(get_session_storage(
        args.storage,
    ))));
    let client = client::Client::new(args.url.clone(), client::Http::new()?, Arc::clone(&session));

    let translations = match args.strings.as_deref() {
        Some(path) => i18n::Translations::load(path),
        None => i18n::Translations::builtin(),
    };

    let server_context = args
        .cookie
        .as_deref()
        .map(|header| bootstrap::RequestContext::from_cookie_header(Some(header)));

    let outcome = bootstrap::hydrate(
        &client,
        server_context.as_ref(),
        !args.no_validate_session,
    )
    .await?;

    let language = match args.language {
        Some(language) => language,
        None => session.lock().await.lang().unwrap_or_default(),
    };

    if outcome == bootstrap::Outcome::LoginRequired {
        eprintln!("{}", translations.lookup("session.expired", language));
    }

    let ctx = command::Context {
        client,
        translations,
        language,
        prompt: Box::new(password::TerminalPrompt),
    };
    command::Command::execute(args.command, &ctx).await
}

#[tokio::main]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("KARTON_LOG", "warn")
        .write_style("KARTON_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
