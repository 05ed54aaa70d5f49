// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

//! The two request disciplines of the API client. Unprotected requests go out
//! as-is; protected requests fail closed without a stored token and tear the
//! session down centrally on a 401.

use async_trait::async_trait;
use log::{debug, error};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    error::{Error, Result},
    metadata, session,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Clone, Debug)]
pub(crate) struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Option<serde_json::Value>,
    pub(crate) bearer: Option<String>,
}

impl Request {
    pub(crate) fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    pub(crate) fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Response {
    pub(crate) status: u16,
    pub(crate) body: Vec<u8>,
}

impl Response {
    pub(crate) fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub(crate) fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[async_trait]
pub(crate) trait Transport: Send + Sync {
    async fn send(&self, base: &Url, request: Request) -> Result<Response>;
}

/// Joins a request path onto the base URL, keeping any path prefix the base
/// carries. A plain `Url::join` would let the absolute request path replace
/// the base path, so `https://example.com/api` would lose its `/api`.
fn join_url(base: &Url, path: &str) -> Result<Url> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        base.set_path(&format!("{}/", base.path()));
    }
    Ok(base.join(path.trim_start_matches('/'))?)
}

pub(crate) struct Http {
    inner: reqwest::Client,
}

impl Http {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            inner: reqwest::Client::builder()
                .user_agent(metadata::CLIENT_USER_AGENT.as_str())
                .build()?,
        })
    }
}

#[async_trait]
impl Transport for Http {
    async fn send(&self, base: &Url, request: Request) -> Result<Response> {
        let url = join_url(base, &request.path)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.inner.request(method, url);
        if let Some(token) = request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(Response { status, body })
    }
}

pub(crate) struct Client<T> {
    base: Url,
    transport: T,
    session: session::Shared,
}

impl<T: Transport> Client<T> {
    pub(crate) fn new(base: Url, transport: T, session: session::Shared) -> Self {
        Self {
            base,
            transport,
            session,
        }
    }

    pub(crate) fn session(&self) -> &session::Shared {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// A plain HTTP call; any non-2xx response fails with the HTTP status.
    pub(crate) async fn unprotected(&self, mut request: Request) -> Result<Response> {
        request.bearer = None;
        debug!("Sending unprotected request to {}", request.path);
        let response = self.transport.send(&self.base, request).await?;
        Self::checked(response)
    }

    /// A call requiring the stored bearer credential. Fails immediately with
    /// no network traffic when none is stored. A 401 invalidates the stored
    /// session before surfacing.
    pub(crate) async fn protected(&self, mut request: Request) -> Result<Response> {
        let token = {
            let store = self.session.lock().await;
            store.token().map(str::to_owned)
        }
        .ok_or(Error::NoCredentials)?;

        request.bearer = Some(token);
        debug!("Sending protected request to {}", request.path);
        let response = self.transport.send(&self.base, request).await?;

        if response.status == 401 {
            let mut store = self.session.lock().await;
            if let Err(e) = store.clear_auth().await {
                error!("We could not tear down the rejected session: {}", e);
            }
            return Err(Error::AuthenticationFailed);
        }

        Self::checked(response)
    }

    fn checked(response: Response) -> Result<Response> {
        if response.is_success() {
            Ok(response)
        } else {
            Err(Error::RequestFailed {
                status: response.status,
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex as StdMutex},
    };

    use tokio::sync::Mutex;

    use crate::storage;

    use super::*;

    pub(crate) struct FakeTransport {
        responses: StdMutex<VecDeque<Response>>,
        requests: StdMutex<Vec<Request>>,
    }

    impl FakeTransport {
        pub(crate) fn new(responses: Vec<Response>) -> Self {
            Self {
                responses: StdMutex::new(responses.into()),
                requests: StdMutex::new(Vec::new()),
            }
        }

        pub(crate) fn sent(&self) -> Vec<Request> {
            self.requests.lock().expect("request log").clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&self, _base: &Url, request: Request) -> Result<Response> {
            self.requests.lock().expect("request log").push(request);
            Ok(self
                .responses
                .lock()
                .expect("response queue")
                .pop_front()
                .expect("a scripted response for every request"))
        }
    }

    pub(crate) fn json_response(status: u16, body: &str) -> Response {
        Response {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    pub(crate) fn unhydrated_client(responses: Vec<Response>) -> Client<FakeTransport> {
        let session = Arc::new(Mutex::new(session::Store::new(Box::new(storage::Memory::<
            session::Data,
        >::new()))));
        Client::new(
            Url::parse("http://server.test").expect("test base URL"),
            FakeTransport::new(responses),
            session,
        )
    }

    pub(crate) async fn hydrated_client(responses: Vec<Response>) -> Client<FakeTransport> {
        let client = unhydrated_client(responses);
        {
            let mut store = client.session().lock().await;
            store.apply(session::Data::default());
            store.set_hydration_complete();
        }
        client
    }
}

#[cfg(test)]
mod tests {
    use self::testing::{hydrated_client, json_response};
    use super::*;

    #[test]
    fn a_path_prefixed_base_url_is_preserved() -> Result<()> {
        let base = Url::parse("https://example.com/api")?;
        assert_eq!(
            join_url(&base, "/login")?.as_str(),
            "https://example.com/api/login"
        );
        let bare = Url::parse("http://localhost:8080")?;
        assert_eq!(
            join_url(&bare, "/api/boxes")?.as_str(),
            "http://localhost:8080/api/boxes"
        );

        let trailing = Url::parse("https://example.com/api/")?;
        assert_eq!(
            join_url(&trailing, "/login")?.as_str(),
            "https://example.com/api/login"
        );
        Ok(())
    }

    #[tokio::test]
    async fn protected_without_credentials_never_reaches_the_network() {
        let client = hydrated_client(vec![]).await;

        let result = client
            .protected(Request::new(Method::Get, "/api/boxes"))
            .await;
        assert!(matches!(result, Err(Error::NoCredentials)));
        assert!(client.transport().sent().is_empty());
    }

    #[tokio::test]
    async fn unauthorized_clears_the_stored_token() -> Result<()> {
        let client = hydrated_client(vec![json_response(401, "")]).await;
        client
            .session()
            .lock()
            .await
            .set_token(Some("stale".to_owned()))
            .await?;

        let result = client
            .protected(Request::new(Method::Get, "/api/boxes"))
            .await;
        assert!(matches!(result, Err(Error::AuthenticationFailed)));

        let store = client.session().lock().await;
        assert_eq!(store.token(), None);
        assert!(!store.is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn other_failures_carry_the_status_and_leave_state_alone() -> Result<()> {
        let client = hydrated_client(vec![json_response(500, "")]).await;
        client
            .session()
            .lock()
            .await
            .set_token(Some("abc".to_owned()))
            .await?;

        let result = client
            .protected(Request::new(Method::Get, "/api/boxes"))
            .await;
        assert!(matches!(
            result,
            Err(Error::RequestFailed { status: 500 })
        ));

        let store = client.session().lock().await;
        assert_eq!(store.token(), Some("abc"));
        assert!(store.is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn unprotected_maps_non_success_to_request_failed() {
        let client = hydrated_client(vec![json_response(503, "")]).await;

        let result = client
            .unprotected(Request::new(Method::Post, "/login"))
            .await;
        assert!(matches!(
            result,
            Err(Error::RequestFailed { status: 503 })
        ));
    }

    #[tokio::test]
    async fn protected_attaches_the_bearer_token() -> Result<()> {
        let client = hydrated_client(vec![json_response(200, r#"{"success":true}"#)]).await;
        client
            .session()
            .lock()
            .await
            .set_token(Some("abc".to_owned()))
            .await?;

        let _ = client
            .protected(Request::new(Method::Get, "/api/labels"))
            .await?;

        let sent = client.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].bearer.as_deref(), Some("abc"));
        Ok(())
    }
}
