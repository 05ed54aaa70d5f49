// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

//! Session and locale bootstrap: the per-request cookie context and the
//! one-shot startup sequence that reconciles the persisted record with the
//! in-memory store before anything reads the authenticated signal.

use log::warn;

use crate::{
    api::{self, Executor as _},
    client::{Client, Transport},
    error::Result,
    model::lang::Lang,
    session, storage,
};

const LANG_COOKIE: &str = "language";
const TOKEN_COOKIE: &str = "jwt";

/// Request-scoped values seeded from cookies before a request is routed.
/// The JWT is opaque here; nothing validates its signature or expiry. An
/// invalid or missing language falls back to English.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RequestContext {
    pub(crate) language: Lang,
    pub(crate) token: Option<String>,
}

impl RequestContext {
    pub(crate) fn from_cookie_header(header: Option<&str>) -> Self {
        let mut language = Lang::default();
        let mut token = None;

        for (name, value) in header.into_iter().flat_map(storage::split_pairs) {
            match name {
                LANG_COOKIE => {
                    if let Some(lang) = Lang::parse(value) {
                        language = lang;
                    }
                }
                TOKEN_COOKIE => {
                    if !value.is_empty() {
                        token = Some(value.to_owned());
                    }
                }
                _ => {}
            }
        }

        Self { language, token }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Ready,
    /// The stored session failed its liveness check and was torn down; the
    /// user has to log in again.
    LoginRequired,
}

/// The one-time startup sequence: load the cold-start record, replace the
/// in-memory copy (an absent token lands as an explicit `None`), flip the
/// hydration gate, then optionally validate the session with an eager
/// profile fetch. Nothing else may read `is_authenticated` until this
/// returns.
///
/// When a server-detected [`RequestContext`] is supplied, its values win
/// over the persisted record, and the two copies are converged immediately.
pub(crate) async fn hydrate<T: Transport>(
    client: &Client<T>,
    server: Option<&RequestContext>,
    validate: bool,
) -> Result<Outcome> {
    {
        let mut store = client.session().lock().await;
        let persisted = store.load_persisted().await?.unwrap_or_default();
        match server {
            Some(context) => {
                let mut data = session::Data::default();
                data.set_lang(Some(context.language));
                data.set_token(context.token.clone());
                // The cached profile only survives alongside a token; a
                // profile with no token is exactly the partial state the
                // store is meant to rule out.
                if context.token.is_some() {
                    data.set_user(persisted.user().cloned());
                }
                store.apply(data);
                store.persist().await?;
            }
            None => store.apply(persisted),
        }
        store.set_hydration_complete();
    }

    if !validate {
        return Ok(Outcome::Ready);
    }

    let cached_username = {
        let store = client.session().lock().await;
        if !store.is_authenticated() {
            return Ok(Outcome::Ready);
        }
        store.user().map(|user| user.username.clone())
    };

    // Best-effort liveness check: an expired token drops the user to login
    // instead of failing later with a broken session. Without a cached
    // username there is nothing to fetch, so the token rides until its first
    // protected call.
    let Some(username) = cached_username else {
        return Ok(Outcome::Ready);
    };

    match (api::GetUserProfile { username }.execute(client)).await {
        Ok(profile) => {
            let mut store = client.session().lock().await;
            store.set_user(Some(profile)).await?;
            Ok(Outcome::Ready)
        }
        Err(e) => {
            warn!("The stored session failed validation: {}", e);
            let mut store = client.session().lock().await;
            store.clear_auth().await?;
            Ok(Outcome::LoginRequired)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        client::testing::{json_response, unhydrated_client},
        model::UserProfile,
    };

    use super::*;

    #[test]
    fn missing_header_defaults_to_english_and_no_token() {
        let ctx = RequestContext::from_cookie_header(None);
        assert_eq!(
            ctx,
            RequestContext {
                language: Lang::En,
                token: None,
            }
        );
    }

    #[test]
    fn cookies_seed_language_and_token() {
        let ctx = RequestContext::from_cookie_header(Some("language=fr; jwt=abc.def"));
        assert_eq!(ctx.language, Lang::Fr);
        assert_eq!(ctx.token.as_deref(), Some("abc.def"));
    }

    #[test]
    fn legacy_language_casing_is_accepted() {
        let ctx = RequestContext::from_cookie_header(Some("language=Fr"));
        assert_eq!(ctx.language, Lang::Fr);
    }

    #[test]
    fn invalid_language_falls_back_to_english() {
        let ctx = RequestContext::from_cookie_header(Some("language=tlh; jwt="));
        assert_eq!(ctx.language, Lang::En);
        assert_eq!(ctx.token, None);
    }

    #[tokio::test]
    async fn hydration_applies_the_persisted_record_before_the_gate() -> Result<()> {
        let client = unhydrated_client(vec![]);
        {
            // Seed the persisted record, then drop the in-memory copy to
            // simulate a cold start.
            let mut store = client.session().lock().await;
            store.set_token(Some("abc".to_owned())).await?;
            store.set_lang(Lang::Fr).await?;
            store.apply(session::Data::default());
            assert!(!store.is_authenticated());
        }

        let outcome = hydrate(&client, None, false).await?;
        assert_eq!(outcome, Outcome::Ready);

        let store = client.session().lock().await;
        assert!(store.is_authenticated());
        assert_eq!(store.token(), Some("abc"));
        assert_eq!(store.lang(), Some(Lang::Fr));
        Ok(())
    }

    #[tokio::test]
    async fn a_dead_session_is_torn_down_and_reported() -> Result<()> {
        let client = unhydrated_client(vec![json_response(401, "")]);
        {
            let mut store = client.session().lock().await;
            store.set_token(Some("expired".to_owned())).await?;
            store.set_user(Some(UserProfile::named("alice"))).await?;
        }

        let outcome = hydrate(&client, None, true).await?;
        assert_eq!(outcome, Outcome::LoginRequired);

        let mut store = client.session().lock().await;
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
        assert!(!store.is_authenticated());
        assert_eq!(store.load_persisted().await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn a_live_session_refreshes_the_cached_profile() -> Result<()> {
        let client = unhydrated_client(vec![json_response(
            200,
            r#"{"success":true,"data":{"username":"alice","id":3}}"#,
        )]);
        {
            let mut store = client.session().lock().await;
            store.set_token(Some("abc".to_owned())).await?;
            store.set_user(Some(UserProfile::named("alice"))).await?;
        }

        let outcome = hydrate(&client, None, true).await?;
        assert_eq!(outcome, Outcome::Ready);

        let store = client.session().lock().await;
        assert!(store.is_authenticated());
        assert_eq!(store.user().and_then(|user| user.id), Some(3));
        Ok(())
    }

    #[tokio::test]
    async fn server_cookies_override_the_persisted_record() -> Result<()> {
        let client = unhydrated_client(vec![]);
        {
            let mut store = client.session().lock().await;
            store.set_token(Some("stale".to_owned())).await?;
            store.set_user(Some(UserProfile::named("alice"))).await?;
            store.set_lang(Lang::En).await?;
            store.apply(session::Data::default());
        }

        let context = RequestContext {
            language: Lang::Fr,
            token: Some("fresh".to_owned()),
        };
        let outcome = hydrate(&client, Some(&context), false).await?;
        assert_eq!(outcome, Outcome::Ready);

        let mut store = client.session().lock().await;
        assert_eq!(store.token(), Some("fresh"));
        assert_eq!(store.lang(), Some(Lang::Fr));
        // The cached profile rides along with the new token.
        assert_eq!(
            store.user().map(|user| user.username.as_str()),
            Some("alice")
        );

        let persisted = store.load_persisted().await?.expect("persisted record");
        assert_eq!(persisted.token(), Some("fresh"));
        assert_eq!(persisted.lang(), Some(Lang::Fr));
        Ok(())
    }

    #[tokio::test]
    async fn a_tokenless_server_context_drops_the_cached_profile() -> Result<()> {
        let client = unhydrated_client(vec![]);
        {
            let mut store = client.session().lock().await;
            store.set_token(Some("stale".to_owned())).await?;
            store.set_user(Some(UserProfile::named("alice"))).await?;
            store.apply(session::Data::default());
        }

        let context = RequestContext {
            language: Lang::En,
            token: None,
        };
        let outcome = hydrate(&client, Some(&context), false).await?;
        assert_eq!(outcome, Outcome::Ready);

        let mut store = client.session().lock().await;
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
        assert!(!store.is_authenticated());

        let persisted = store.load_persisted().await?.expect("persisted record");
        assert_eq!(persisted.token(), None);
        assert_eq!(persisted.user(), None);
        Ok(())
    }

    #[tokio::test]
    async fn hydration_without_a_record_leaves_the_session_empty() -> Result<()> {
        let client = unhydrated_client(vec![]);
        let outcome = hydrate(&client, None, true).await?;
        assert_eq!(outcome, Outcome::Ready);

        let store = client.session().lock().await;
        assert!(store.hydration_complete());
        assert!(!store.is_authenticated());
        assert!(client.transport().sent().is_empty());
        Ok(())
    }
}
