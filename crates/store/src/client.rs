//! Thin HTTP layer over the Up API: bearer-token GETs, one tag-attach POST,
//! and translation of unsuccessful responses into the error taxonomy.

use api_types::account::AccountResource;
use api_types::category::CategoryResource;
use api_types::tag::{TagAttachBody, TagResource};
use api_types::transaction::TransactionResource;
use api_types::{ErrorResponse, ListResponse};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::{ErrorDetail, Result, StoreError};

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        // A trailing slash keeps Url::join from eating the last path segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url =
            Url::parse(&normalized).map_err(|err| StoreError::InvalidUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    pub async fn accounts(&self, token: &str) -> Result<ListResponse<AccountResource>> {
        let url = self.endpoint("accounts")?;
        self.get_json(url, token).await
    }

    pub async fn categories(&self, token: &str) -> Result<ListResponse<CategoryResource>> {
        let url = self.endpoint("categories")?;
        self.get_json(url, token).await
    }

    pub async fn tags(&self, token: &str) -> Result<ListResponse<TagResource>> {
        let url = self.endpoint("tags")?;
        self.get_json(url, token).await
    }

    /// First transactions page for an account, at a fixed page size.
    pub async fn transactions_first_page(
        &self,
        token: &str,
        account_id: &str,
        page_size: u32,
    ) -> Result<ListResponse<TransactionResource>> {
        let mut url = self.endpoint(&format!("accounts/{account_id}/transactions"))?;
        url.query_pairs_mut()
            .append_pair("page[size]", &page_size.to_string());
        self.get_json(url, token).await
    }

    /// Follows an opaque `links.next` cursor URL.
    pub async fn transactions_page(
        &self,
        token: &str,
        next_url: &str,
    ) -> Result<ListResponse<TransactionResource>> {
        let url = Url::parse(next_url).map_err(|err| StoreError::InvalidUrl(err.to_string()))?;
        self.get_json(url, token).await
    }

    /// Attaches one tag to one transaction.
    pub async fn add_tag(&self, token: &str, transaction_id: &str, tag_id: &str) -> Result<()> {
        let url = self.endpoint(&format!("transactions/{transaction_id}/relationships/tags"))?;
        tracing::debug!(%url, tag_id, "POST");
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&TagAttachBody::single(tag_id))
            .send()
            .await?;
        Self::successful(response).await?;
        Ok(())
    }

    /// One GET, no retry; unsuccessful responses become typed errors.
    async fn get_json<T: DeserializeOwned>(&self, url: Url, token: &str) -> Result<T> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let response = Self::successful(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Passes successful responses through; everything else is translated to
    /// [`StoreError::Auth`] (401) or [`StoreError::Api`], carrying the first
    /// structured error object from the body when one can be parsed.
    async fn successful(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|body| body.errors.into_iter().next())
            .map(ErrorDetail::from)
            .unwrap_or_else(|| ErrorDetail::generic(status));

        if status == StatusCode::UNAUTHORIZED {
            Err(StoreError::Auth(detail))
        } else {
            Err(StoreError::Api(detail))
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| StoreError::InvalidUrl(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_onto_versioned_base() {
        let client = Client::new("https://api.up.com.au/api/v1").unwrap();
        assert_eq!(
            client.endpoint("accounts").unwrap().as_str(),
            "https://api.up.com.au/api/v1/accounts"
        );
        assert_eq!(
            client
                .endpoint("transactions/abc/relationships/tags")
                .unwrap()
                .as_str(),
            "https://api.up.com.au/api/v1/transactions/abc/relationships/tags"
        );
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(matches!(
            Client::new("not a url"),
            Err(StoreError::InvalidUrl(_))
        ));
    }

    fn response(status: u16, body: &str) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .body(body.to_string())
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn translates_401_into_auth_with_the_body_detail() {
        let body = r#"{"errors":[{"status":"401","title":"Not Authorized","detail":"The request was not authenticated."}]}"#;
        let err = Client::successful(response(401, body)).await.unwrap_err();

        assert!(err.is_auth());
        match err {
            StoreError::Auth(detail) => {
                assert_eq!(detail.status.as_deref(), Some("401"));
                assert_eq!(detail.title.as_deref(), Some("Not Authorized"));
            }
            other => panic!("expected Auth, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn translates_other_failures_into_api() {
        let body = r#"{"errors":[{"status":"500","title":"Internal Server Error","detail":"Something went wrong."}]}"#;
        let err = Client::successful(response(500, body)).await.unwrap_err();

        assert!(!err.is_auth());
        match err {
            StoreError::Api(detail) => {
                assert_eq!(detail.status.as_deref(), Some("500"));
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_error_body_falls_back_to_the_status_line() {
        let err = Client::successful(response(503, "<html>bad gateway</html>"))
            .await
            .unwrap_err();

        match err {
            StoreError::Api(detail) => {
                assert_eq!(detail, ErrorDetail::generic(StatusCode::SERVICE_UNAVAILABLE));
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn successful_responses_pass_through() {
        let passed = Client::successful(response(200, r#"{"data":[]}"#)).await;
        assert!(passed.is_ok());
    }
}
