use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response};
use serde::Deserialize;
use url::Url;

use super::NotesApi;
use crate::error::ApiError;
use crate::model::{Note, NoteDraft, NoteId, NotePage, NotePatch};

/// Paginated list response (`{ count, next, previous, results }`)
#[derive(Debug, Deserialize)]
struct PageResponse {
    count: u64,
    results: Vec<Note>,
}

/// `NotesApi` over HTTP/JSON, rooted at the service's `/api/` base URL.
pub struct HttpNotesApi {
    client: Client,
    base: Url,
}

impl HttpNotesApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self::with_client(Client::new(), parse_base_url(base_url)?))
    }

    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }
}

/// Parse a base URL, making sure relative joins land below it rather than
/// replacing its last segment.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Turn a non-2xx response into `ApiError::Server`, keeping the body for logs.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Server {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl NotesApi for HttpNotesApi {
    async fn list_page(&self, page: u32) -> Result<NotePage, ApiError> {
        let mut url = self.endpoint("notes/")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string());
        debug!("GET {}", url);

        let response = check(self.client.get(url).send().await?).await?;
        let body: PageResponse = response.json().await?;
        Ok(NotePage {
            items: body.results,
            total_count: body.count,
        })
    }

    async fn list_all(&self) -> Result<Vec<Note>, ApiError> {
        let url = self.endpoint("notes/")?;
        debug!("GET {}", url);

        let response = check(self.client.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, id: NoteId) -> Result<Note, ApiError> {
        let url = self.endpoint(&format!("notes/{}/", id))?;
        debug!("GET {}", url);

        let response = check(self.client.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn search(&self, query: &str) -> Result<Vec<Note>, ApiError> {
        let mut url = self.endpoint("notes/search/")?;
        url.query_pairs_mut().append_pair("q", query);
        debug!("GET {}", url);

        let response = check(self.client.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note, ApiError> {
        let url = self.endpoint("notes/")?;
        debug!("POST {}", url);

        let response = check(self.client.post(url).json(draft).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn update(&self, id: NoteId, patch: &NotePatch) -> Result<Note, ApiError> {
        let url = self.endpoint(&format!("notes/{}/", id))?;
        debug!("PUT {}", url);

        let response = check(self.client.put(url).json(patch).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, id: NoteId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("notes/{}/", id))?;
        debug!("DELETE {}", url);

        check(self.client.delete(url).send().await?).await?;
        Ok(())
    }

    async fn generate_batch(&self, count: u32) -> Result<(), ApiError> {
        let mut url = self.endpoint("notes/generate_dummy_data/")?;
        url.query_pairs_mut()
            .append_pair("count", &count.to_string());
        debug!("POST {}", url);

        check(self.client.post(url).send().await?).await?;
        Ok(())
    }
}
