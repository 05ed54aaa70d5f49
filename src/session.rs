// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

//! The single writable source of truth for the current session: the bearer
//! token, the cached user profile, and the language preference, kept in sync
//! with whichever persistence backend was selected at startup.

use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    error::Result,
    model::{lang::Lang, UserProfile},
    storage,
};

pub(crate) type Shared = Arc<Mutex<Store>>;

/// The persisted record. Field names match the keys the original deployment
/// used in client-side storage.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub(crate) struct Data {
    #[serde(rename = "auth_token")]
    token: Option<String>,
    #[serde(rename = "current_user")]
    user: Option<UserProfile>,
    lang: Option<Lang>,
}

impl Data {
    pub(crate) fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_owned()),
            ..Self::default()
        }
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub(crate) const fn lang(&self) -> Option<Lang> {
        self.lang
    }

    pub(crate) fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub(crate) fn set_user(&mut self, user: Option<UserProfile>) {
        self.user = user;
    }

    pub(crate) fn set_lang(&mut self, lang: Option<Lang>) {
        self.lang = lang;
    }
}

pub(crate) struct Store {
    data: Data,
    hydration_complete: bool,
    storage: Box<dyn storage::Storage<Data>>,
}

impl Store {
    pub(crate) fn new(storage: Box<dyn storage::Storage<Data>>) -> Self {
        Self {
            data: Data::default(),
            hydration_complete: false,
            storage,
        }
    }

    /// Reads the cold-start record from the persistence backend. The result
    /// feeds [`Store::apply`]; it does not touch the in-memory copy.
    pub(crate) async fn load_persisted(&mut self) -> Result<Option<Data>> {
        self.storage.get().await
    }

    /// Replaces the in-memory copy wholesale with the bootstrap record. An
    /// absent token must land as `None` so no stale value from a previous
    /// session survives.
    pub(crate) fn apply(&mut self, data: Data) {
        self.data = data;
    }

    /// Flips the gate the derived authenticated signal reads. Called exactly
    /// once, after the initial values are applied; later calls are ignored.
    pub(crate) fn set_hydration_complete(&mut self) {
        if self.hydration_complete {
            warn!("Hydration was already marked complete");
            return;
        }
        self.hydration_complete = true;
    }

    pub(crate) const fn hydration_complete(&self) -> bool {
        self.hydration_complete
    }

    /// Whether the selected backend outlives the process.
    pub(crate) fn is_persistent(&self) -> bool {
        self.storage.is_persistent()
    }

    /// `true` iff a token is present and hydration has completed. Before the
    /// gate flips this always reads `false`, so nothing acts on a guess.
    pub(crate) fn is_authenticated(&self) -> bool {
        self.hydration_complete && self.data.token.is_some()
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.data.token()
    }

    pub(crate) fn user(&self) -> Option<&UserProfile> {
        self.data.user()
    }

    pub(crate) const fn lang(&self) -> Option<Lang> {
        self.data.lang()
    }

    pub(crate) async fn set_token(&mut self, token: Option<String>) -> Result<()> {
        self.data.token = token;
        self.persist().await
    }

    pub(crate) async fn set_user(&mut self, user: Option<UserProfile>) -> Result<()> {
        self.data.user = user;
        self.persist().await
    }

    pub(crate) async fn set_lang(&mut self, lang: Lang) -> Result<()> {
        self.data.lang = Some(lang);
        self.persist().await
    }

    /// Clears the token and the profile together, in memory and in
    /// persistence. A partial clear that leaves a stale profile behind a
    /// missing token is a defect, so both always go at once. The language
    /// preference survives.
    pub(crate) async fn clear_auth(&mut self) -> Result<()> {
        self.data.token = None;
        self.data.user = None;
        if self.data == Data::default() {
            self.storage.clear().await
        } else {
            self.persist().await
        }
    }

    /// Writes the in-memory copy through to the persistence backend.
    pub(crate) async fn persist(&mut self) -> Result<()> {
        self.storage.update(&self.data).await
    }
}
