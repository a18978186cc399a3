// CouchDB repository implementation
use crate::application::customer_repository::{
    CustomerRepository, RepositoryError, RepositoryResult,
};
use crate::domain::customer::{CustomerRecord, CustomerSummary};
use crate::infrastructure::config::StoreSettings;
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct CouchRepository {
    client: reqwest::Client,
    host: String,
    database: String,
    credentials: Option<(String, Option<String>)>,
    page_size: usize,
}

/// A customer as stored: the record plus CouchDB's bookkeeping fields
#[derive(Debug, Serialize, Deserialize)]
struct CustomerDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_rev", default, skip_serializing_if = "Option::is_none")]
    rev: Option<String>,
    #[serde(flatten)]
    record: CustomerRecord,
}

#[derive(Debug, Serialize)]
struct FindRequest<'a> {
    selector: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [&'a str]>,
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    bookmark: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FindResponse<T> {
    docs: Vec<T>,
    #[serde(default)]
    bookmark: Option<String>,
    #[serde(default)]
    warning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RevisionOnly {
    #[serde(rename = "_rev")]
    rev: String,
}

impl CouchRepository {
    pub fn new(settings: &StoreSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: settings.url.trim_end_matches('/').to_string(),
            database: settings.database.clone(),
            credentials: settings
                .username
                .clone()
                .map(|user| (user, settings.password.clone())),
            page_size: settings.page_size.max(1),
        }
    }

    fn database_url(&self) -> String {
        format!("{}/{}", self.host, urlencoding::encode(&self.database))
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.database_url(), urlencoding::encode(id))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, password)) => request.basic_auth(user, password.as_ref()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> RepositoryResult<Response> {
        self.authorize(request)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> RepositoryResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| RepositoryError::Protocol(format!("Failed to parse CouchDB response: {}", e)))
    }

    async fn unexpected(response: Response) -> RepositoryError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.is_server_error() {
            RepositoryError::Unavailable(format!("CouchDB returned {}: {}", status, body))
        } else {
            RepositoryError::Protocol(format!("CouchDB returned {}: {}", status, body))
        }
    }

    /// Page through `_find` with bookmarks until a short page comes back
    async fn find_all<T: DeserializeOwned>(
        &self,
        fields: Option<&[&str]>,
    ) -> RepositoryResult<Vec<T>> {
        let url = format!("{}/_find", self.database_url());
        let mut docs = Vec::new();
        let mut bookmark = None;

        loop {
            let body = FindRequest {
                selector: serde_json::json!({ "licensePlate": { "$exists": true } }),
                fields,
                limit: self.page_size,
                bookmark: bookmark.take(),
            };

            let response = self.send(self.client.post(&url).json(&body)).await?;
            if !response.status().is_success() {
                return Err(Self::unexpected(response).await);
            }

            let page: FindResponse<T> = Self::read_json(response).await?;
            if let Some(warning) = &page.warning {
                tracing::debug!("CouchDB _find warning: {}", warning);
            }

            let page_len = page.docs.len();
            docs.extend(page.docs);
            if page_len < self.page_size || page.bookmark.is_none() {
                break;
            }
            bookmark = page.bookmark;
        }

        tracing::debug!("Fetched {} documents from {}", docs.len(), self.database);
        Ok(docs)
    }

    async fn current_revision(&self, id: &str) -> RepositoryResult<Option<String>> {
        let response = self.send(self.client.get(self.document_url(id))).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let doc: RevisionOnly = Self::read_json(response).await?;
                Ok(Some(doc.rev))
            }
            _ => Err(Self::unexpected(response).await),
        }
    }

    async fn put_document(&self, document: &CustomerDocument) -> RepositoryResult<()> {
        let response = self
            .send(self.client.put(self.document_url(&document.id)).json(document))
            .await?;
        match response.status() {
            StatusCode::CONFLICT => Err(RepositoryError::Conflict(document.id.clone())),
            status if status.is_success() => Ok(()),
            _ => Err(Self::unexpected(response).await),
        }
    }
}

#[async_trait]
impl CustomerRepository for CouchRepository {
    async fn list_summaries(&self) -> RepositoryResult<Vec<CustomerSummary>> {
        self.find_all(Some(&CustomerSummary::FIELDS)).await
    }

    async fn list_customers(&self) -> RepositoryResult<Vec<CustomerRecord>> {
        self.find_all(None).await
    }

    async fn get_customer(&self, license_plate: &str) -> RepositoryResult<Option<CustomerRecord>> {
        let response = self
            .send(self.client.get(self.document_url(license_plate)))
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let doc: CustomerDocument = Self::read_json(response).await?;
                Ok(Some(doc.record))
            }
            _ => Err(Self::unexpected(response).await),
        }
    }

    async fn insert_customer(&self, record: &CustomerRecord) -> RepositoryResult<()> {
        // PUT without _rev only succeeds for a new id
        self.put_document(&CustomerDocument {
            id: record.license_plate.clone(),
            rev: None,
            record: record.clone(),
        })
        .await
    }

    async fn update_customer(&self, record: &CustomerRecord) -> RepositoryResult<()> {
        let rev = self
            .current_revision(&record.license_plate)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(record.license_plate.clone()))?;

        self.put_document(&CustomerDocument {
            id: record.license_plate.clone(),
            rev: Some(rev),
            record: record.clone(),
        })
        .await
    }

    async fn delete_customer(&self, license_plate: &str) -> RepositoryResult<bool> {
        let Some(rev) = self.current_revision(license_plate).await? else {
            return Ok(false);
        };

        let response = self
            .send(
                self.client
                    .delete(self.document_url(license_plate))
                    .query(&[("rev", rev)]),
            )
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            _ => Err(Self::unexpected(response).await),
        }
    }
}
