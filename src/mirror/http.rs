//! HTTP implementation of the remote document store boundary.
//!
//! One document per (user, collection): `PUT` replaces it wholesale with
//! the `{content, updatedAt}` envelope, `GET` returns it or 404. No
//! partial updates, no field-level merge.

use async_trait::async_trait;

use super::{RemoteDocument, RemoteStore};
use crate::error::MirrorError;
use crate::types::Collection;

pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn document_url(&self, user: &str, collection: Collection) -> String {
        format!(
            "{}/users/{}/collections/{}",
            self.base_url,
            user,
            collection.remote_name()
        )
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn push(
        &self,
        user: &str,
        collection: Collection,
        doc: RemoteDocument,
    ) -> Result<(), MirrorError> {
        let resp = self
            .client
            .put(self.document_url(user, collection))
            .json(&doc)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(MirrorError::Api {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn pull(
        &self,
        user: &str,
        collection: Collection,
    ) -> Result<Option<RemoteDocument>, MirrorError> {
        let resp = self
            .client
            .get(self.document_url(user, collection))
            .send()
            .await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(MirrorError::Api {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(Some(resp.json().await?))
    }
}
