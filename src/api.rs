// SPDX-FileCopyrightText: 2025-2026 Karton Developers
//
// SPDX-License-Identifier: Apache-2.0

//! One typed operation per server endpoint. Each operation builds its wire
//! request and decodes the response envelope; the request disciplines
//! themselves live in [`crate::client`].

use async_trait::async_trait;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;

use crate::{
    client::{self, Method, Transport},
    error::{Error, Result},
    model::{
        envelope::{self, Envelope},
        BoxModel, ItemModel, LabelModel, UserProfile,
    },
    password,
};

#[async_trait]
pub(crate) trait Executor: Sized + Send {
    type Response: Send;

    fn request(self) -> Result<client::Request>;

    fn protected() -> bool {
        true
    }

    fn decode(response: &client::Response) -> Result<Self::Response>;

    async fn execute<T: Transport>(self, client: &client::Client<T>) -> Result<Self::Response> {
        let request = self.request()?;
        let response = if Self::protected() {
            client.protected(request).await?
        } else {
            client.unprotected(request).await?
        };
        Self::decode(&response)
    }
}

/// `POST /login`. The password is hashed before it is placed in the body; the
/// plaintext never goes on the wire. Some server revisions return the token
/// bare, others wrapped in the envelope, so both shapes are accepted.
pub(crate) struct Login {
    pub(crate) username: String,
    pub(crate) password: SecretString,
}

#[derive(Deserialize)]
struct TokenData {
    token: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LoginReply {
    Bare { token: String },
    Enveloped(Envelope<TokenData>),
}

impl Executor for Login {
    type Response = String;

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(Method::Post, "/login").with_body(json!({
            "username": self.username,
            "password": password::hash_password(&self.password),
        })))
    }

    fn protected() -> bool {
        false
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        match response.json::<LoginReply>()? {
            LoginReply::Bare { token } => Ok(token),
            LoginReply::Enveloped(envelope) => Ok(envelope
                .into_result()?
                .ok_or(Error::MissingData)?
                .token),
        }
    }
}

/// `POST /register`. Returns the server's welcome message, if it sent one.
pub(crate) struct Register {
    pub(crate) username: String,
    pub(crate) password: SecretString,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RegisterReply {
    Enveloped(Envelope<serde_json::Value>),
    Bare { message: Option<String> },
}

impl Executor for Register {
    type Response = Option<String>;

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(Method::Post, "/register").with_body(json!({
            "username": self.username,
            "password": password::hash_password(&self.password),
        })))
    }

    fn protected() -> bool {
        false
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        match response.json::<RegisterReply>()? {
            RegisterReply::Enveloped(envelope) => {
                let message = envelope.message.clone();
                let _ = envelope.into_result()?;
                Ok(message)
            }
            RegisterReply::Bare { message } => Ok(message),
        }
    }
}

/// `POST /logout`. Best-effort on the server side; local teardown is the
/// caller's guaranteed step.
pub(crate) struct Logout;

impl Executor for Logout {
    type Response = ();

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(Method::Post, "/logout"))
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        envelope::ack(response)
    }
}

/// `GET /api/user/:username`.
pub(crate) struct GetUserProfile {
    pub(crate) username: String,
}

impl Executor for GetUserProfile {
    type Response = UserProfile;

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(
            Method::Get,
            format!("/api/user/{}", self.username),
        ))
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        Envelope::required(response)
    }
}

pub(crate) struct GetBoxes;

impl Executor for GetBoxes {
    type Response = Vec<BoxModel>;

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(Method::Get, "/api/boxes"))
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        Envelope::or_default(response)
    }
}

pub(crate) struct CreateBox {
    pub(crate) title: String,
    pub(crate) description: Option<String>,
}

impl Executor for CreateBox {
    type Response = BoxModel;

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(Method::Post, "/api/boxes").with_body(json!({
            "title": self.title,
            "description": self.description,
        })))
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        Envelope::required(response)
    }
}

pub(crate) struct UpdateBox {
    pub(crate) id: u64,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
}

impl Executor for UpdateBox {
    type Response = BoxModel;

    fn request(self) -> Result<client::Request> {
        let mut body = serde_json::Map::new();
        if let Some(title) = self.title {
            let _ = body.insert("title".to_owned(), title.into());
        }
        if let Some(description) = self.description {
            let _ = body.insert("description".to_owned(), description.into());
        }
        Ok(
            client::Request::new(Method::Put, format!("/api/boxes/{}", self.id))
                .with_body(body.into()),
        )
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        Envelope::required(response)
    }
}

pub(crate) struct DeleteBox {
    pub(crate) id: u64,
}

impl Executor for DeleteBox {
    type Response = ();

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(
            Method::Delete,
            format!("/api/boxes/{}", self.id),
        ))
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        envelope::ack(response)
    }
}

pub(crate) struct GetItems {
    pub(crate) box_id: u64,
}

impl Executor for GetItems {
    type Response = Vec<ItemModel>;

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(
            Method::Get,
            format!("/api/boxes/{}/items", self.box_id),
        ))
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        Envelope::or_default(response)
    }
}

pub(crate) struct CreateItem {
    pub(crate) box_id: u64,
    pub(crate) title: String,
    pub(crate) quantity: Option<u32>,
    pub(crate) labels: Vec<u64>,
}

impl Executor for CreateItem {
    type Response = ItemModel;

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(
            Method::Post,
            format!("/api/boxes/{}/items", self.box_id),
        )
        .with_body(json!({
            "title": self.title,
            "quantity": self.quantity,
            "labels": self.labels,
        })))
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        Envelope::required(response)
    }
}

pub(crate) struct UpdateItem {
    pub(crate) box_id: u64,
    pub(crate) item_id: u64,
    pub(crate) title: Option<String>,
    pub(crate) quantity: Option<u32>,
}

impl Executor for UpdateItem {
    type Response = ItemModel;

    fn request(self) -> Result<client::Request> {
        let mut body = serde_json::Map::new();
        if let Some(title) = self.title {
            let _ = body.insert("title".to_owned(), title.into());
        }
        if let Some(quantity) = self.quantity {
            let _ = body.insert("quantity".to_owned(), quantity.into());
        }
        Ok(client::Request::new(
            Method::Put,
            format!("/api/boxes/{}/items/{}", self.box_id, self.item_id),
        )
        .with_body(body.into()))
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        Envelope::required(response)
    }
}

pub(crate) struct DeleteItem {
    pub(crate) box_id: u64,
    pub(crate) item_id: u64,
}

impl Executor for DeleteItem {
    type Response = ();

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(
            Method::Delete,
            format!("/api/boxes/{}/items/{}", self.box_id, self.item_id),
        ))
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        envelope::ack(response)
    }
}

/// `GET /api/boxes/items/:title`, the cross-box item lookup.
pub(crate) struct FindItems {
    pub(crate) title: String,
}

impl Executor for FindItems {
    type Response = Vec<ItemModel>;

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(
            Method::Get,
            format!("/api/boxes/items/{}", self.title),
        ))
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        Envelope::or_default(response)
    }
}

pub(crate) struct GetLabels;

impl Executor for GetLabels {
    type Response = Vec<LabelModel>;

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(Method::Get, "/api/labels"))
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        Envelope::or_default(response)
    }
}

pub(crate) struct CreateLabel {
    pub(crate) name: String,
    pub(crate) color: Option<String>,
}

impl Executor for CreateLabel {
    type Response = LabelModel;

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(Method::Post, "/api/labels").with_body(json!({
            "name": self.name,
            "color": self.color,
        })))
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        Envelope::required(response)
    }
}

pub(crate) struct UpdateLabel {
    pub(crate) id: u64,
    pub(crate) name: Option<String>,
    pub(crate) color: Option<String>,
}

impl Executor for UpdateLabel {
    type Response = LabelModel;

    fn request(self) -> Result<client::Request> {
        let mut body = serde_json::Map::new();
        if let Some(name) = self.name {
            let _ = body.insert("name".to_owned(), name.into());
        }
        if let Some(color) = self.color {
            let _ = body.insert("color".to_owned(), color.into());
        }
        Ok(
            client::Request::new(Method::Put, format!("/api/labels/{}", self.id))
                .with_body(body.into()),
        )
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        Envelope::required(response)
    }
}

pub(crate) struct DeleteLabel {
    pub(crate) id: u64,
}

impl Executor for DeleteLabel {
    type Response = ();

    fn request(self) -> Result<client::Request> {
        Ok(client::Request::new(
            Method::Delete,
            format!("/api/labels/{}", self.id),
        ))
    }

    fn decode(response: &client::Response) -> Result<Self::Response> {
        envelope::ack(response)
    }
}

/// Runs the login operation and records the resulting session: token and a
/// minimal profile, both through the store so persistence converges.
pub(crate) async fn sign_in<T: Transport>(
    client: &client::Client<T>,
    username: &str,
    password: SecretString,
) -> Result<()> {
    let token = Login {
        username: username.to_owned(),
        password,
    }
    .execute(client)
    .await?;

    let mut store = client.session().lock().await;
    store.set_token(Some(token)).await?;
    store.set_user(Some(UserProfile::named(username))).await
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use crate::client::testing::{hydrated_client, json_response};

    use super::*;

    #[tokio::test]
    async fn login_sends_the_password_digest_and_stores_the_token() -> Result<()> {
        let client = hydrated_client(vec![json_response(
            200,
            r#"{"success":true,"data":{"token":"abc"}}"#,
        )])
        .await;

        sign_in(
            &client,
            "alice",
            SecretString::new("secret".to_owned()),
        )
        .await?;

        let sent = client.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, "/login");
        let body = sent[0].body.as_ref().expect("login body");
        assert_eq!(body["username"], "alice");
        assert_eq!(
            body["password"],
            // SHA-256 of "secret".
            "2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b"
        );

        let store = client.session().lock().await;
        assert_eq!(store.token(), Some("abc"));
        assert!(store.is_authenticated());
        assert_eq!(store.user().map(|user| user.username.as_str()), Some("alice"));
        Ok(())
    }

    #[tokio::test]
    async fn login_accepts_a_bare_token_reply() -> Result<()> {
        let client = hydrated_client(vec![json_response(200, r#"{"token":"xyz"}"#)]).await;

        let token = Login {
            username: "alice".to_owned(),
            password: SecretString::new("secret".to_owned()),
        }
        .execute(&client)
        .await?;
        assert_eq!(token, "xyz");
        Ok(())
    }

    #[tokio::test]
    async fn failed_login_surfaces_the_server_message() {
        let client = hydrated_client(vec![json_response(
            200,
            r#"{"success":false,"error":"bad credentials"}"#,
        )])
        .await;

        let result = Login {
            username: "alice".to_owned(),
            password: SecretString::new("nope".to_owned()),
        }
        .execute(&client)
        .await;
        match result {
            Err(Error::DomainFailure { message }) => assert_eq!(message, "bad credentials"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn listing_boxes_with_null_data_yields_an_empty_collection() -> Result<()> {
        let client = hydrated_client(vec![json_response(200, r#"{"success":true,"data":null}"#)])
            .await;
        client
            .session()
            .lock()
            .await
            .set_token(Some("abc".to_owned()))
            .await?;

        let boxes = GetBoxes.execute(&client).await?;
        assert!(boxes.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn creating_a_duplicate_item_is_a_domain_failure() -> Result<()> {
        let client = hydrated_client(vec![json_response(
            200,
            r#"{"success":false,"error":"duplicate title"}"#,
        )])
        .await;
        client
            .session()
            .lock()
            .await
            .set_token(Some("abc".to_owned()))
            .await?;

        let result = CreateItem {
            box_id: 1,
            title: "screwdriver".to_owned(),
            quantity: Some(2),
            labels: vec![],
        }
        .execute(&client)
        .await;
        match result {
            Err(Error::DomainFailure { message }) => assert_eq!(message, "duplicate title"),
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn updating_a_label_sends_only_the_changed_fields() -> Result<()> {
        let client = hydrated_client(vec![json_response(
            200,
            r##"{"success":true,"data":{"id":9,"name":"tools","color":"#3b82f6"}}"##,
        )])
        .await;
        client
            .session()
            .lock()
            .await
            .set_token(Some("abc".to_owned()))
            .await?;

        let updated = UpdateLabel {
            id: 9,
            name: Some("tools".to_owned()),
            color: None,
        }
        .execute(&client)
        .await?;
        assert_eq!(updated.name, "tools");

        let sent = client.transport().sent();
        assert_eq!(sent[0].method, Method::Put);
        assert_eq!(sent[0].path, "/api/labels/9");
        let body = sent[0].body.as_ref().expect("update body");
        assert_eq!(body["name"], "tools");
        assert!(body.get("color").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn operations_address_the_expected_paths() -> Result<()> {
        let item = r#"{"success":true,"data":{"id":7,"title":"screws"}}"#;
        let client = hydrated_client(vec![
            json_response(200, r#"{"success":true,"data":[]}"#),
            json_response(200, item),
            json_response(200, r#"{"success":true}"#),
        ])
        .await;
        client
            .session()
            .lock()
            .await
            .set_token(Some("abc".to_owned()))
            .await?;

        let _ = GetItems { box_id: 4 }.execute(&client).await?;
        let _ = UpdateItem {
            box_id: 4,
            item_id: 7,
            title: Some("screws".to_owned()),
            quantity: None,
        }
        .execute(&client)
        .await?;
        DeleteLabel { id: 9 }.execute(&client).await?;

        let paths: Vec<_> = client
            .transport()
            .sent()
            .into_iter()
            .map(|request| request.path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "/api/boxes/4/items".to_owned(),
                "/api/boxes/4/items/7".to_owned(),
                "/api/labels/9".to_owned(),
            ]
        );
        Ok(())
    }
}
