use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    config,
    error::{Error, Result},
    types::{ApiErrorResponse, Token},
};

/// The credential of a logged-in user.
///
/// Created at login (or loaded from the credential store), dropped at logout.
/// The token is opaque and never refreshed: an expired token only shows up
/// as [`Error::Unauthorized`] on the next call.
#[derive(Debug, Clone)]
pub struct Session {
    access_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl From<&Token> for Session {
    fn from(token: &Token) -> Self {
        Session::new(token.access_token.clone())
    }
}

/// HTTP transport to the Spotify Web API.
///
/// Every request gets `Authorization: Bearer <token>` when a [`Session`] was
/// injected. Without one the request goes out unauthenticated and Spotify
/// answers 401. Nothing is retried.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base_url: String,
    session: Option<Session>,
}

impl Transport {
    pub fn new(base_url: impl Into<String>, session: Option<Session>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Transport against the configured `SPOTIFY_API_URL`.
    pub fn from_config(session: Option<Session>) -> Self {
        Self::new(config::spotify_apiurl(), session)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "spotify request");

        let builder = self.client.request(method, url);
        match &self.session {
            Some(session) => builder.bearer_auth(session.access_token()),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::decode(response).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        Self::decode(response).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.request(Method::PUT, path).json(body).send().await?;
        Self::decode(response).await
    }

    /// DELETE with a JSON body, as used by the playlist tracks endpoint.
    pub async fn delete_with_body<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .request(Method::DELETE, path)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// DELETE whose answer carries no body worth reading.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        Self::check(response).await.map(|_| ())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            debug!("spotify rejected the access token");
            return Err(Error::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|e| e.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        Err(Error::Remote { status, message })
    }
}
