use color_eyre::{eyre::eyre, Result};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::Config;
use crate::error::RemoteError;
use crate::notehub::api_types::remote_error;
use crate::notehub::types::{CreateNotePayload, DeleteNoteResponse, Note, PaginatedNotes};

const FETCH_FAILED: &str = "Failed to fetch notes";
const CREATE_FAILED: &str = "Failed to create note";
const DELETE_FAILED: &str = "Failed to delete note";

/// Remote operations the note collection depends on.
pub trait NoteService: Clone + Send + Sync + 'static {
  /// List one page of notes. An empty `search` means no filter.
  fn list_notes(
    &self,
    page: u32,
    per_page: u32,
    search: &str,
  ) -> impl Future<Output = Result<PaginatedNotes, RemoteError>> + Send;

  fn create_note(
    &self,
    payload: &CreateNotePayload,
  ) -> impl Future<Output = Result<Note, RemoteError>> + Send;

  fn delete_note(&self, id: u64) -> impl Future<Output = Result<DeleteNoteResponse, RemoteError>> + Send;
}

/// NoteHub REST API client
#[derive(Clone)]
pub struct NoteClient {
  http: reqwest::Client,
  base_url: Url,
  token: Option<String>,
}

impl NoteClient {
  pub fn new(config: &Config) -> Result<Self> {
    let base_url = Url::parse(&config.api_url)
      .map_err(|e| eyre!("Invalid API URL {}: {}", config.api_url, e))?;
    if base_url.cannot_be_a_base() {
      return Err(eyre!("Invalid API URL {}: not a base URL", config.api_url));
    }

    // Requests are still attempted, the server answers with an auth error
    let token = match config.api_token() {
      Ok(token) => Some(token),
      Err(e) => {
        warn!("{}", e);
        None
      }
    };

    let http = reqwest::Client::builder()
      .user_agent(concat!("notehub/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url,
      token,
    })
  }

  /// Base URL joined with path segments
  fn endpoint(&self, segments: &[&str]) -> Url {
    let mut url = self.base_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  /// Build a request with the bearer token attached
  fn request(&self, method: Method, url: Url) -> RequestBuilder {
    let req = self.http.request(method, url);
    match &self.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    }
  }

  fn list_request(&self, page: u32, per_page: u32, search: &str) -> RequestBuilder {
    let mut query = vec![("page", page.to_string()), ("perPage", per_page.to_string())];
    // An empty filter is left out entirely
    if !search.is_empty() {
      query.push(("search", search.to_string()));
    }
    self
      .request(Method::GET, self.endpoint(&["notes"]))
      .query(&query)
  }

  fn create_request(&self, payload: &CreateNotePayload) -> RequestBuilder {
    self
      .request(Method::POST, self.endpoint(&["notes"]))
      .json(payload)
  }

  fn delete_request(&self, id: u64) -> RequestBuilder {
    let id = id.to_string();
    self.request(Method::DELETE, self.endpoint(&["notes", &id]))
  }

  /// Send a request and decode its JSON body, logging any failure.
  async fn send<T: DeserializeOwned>(
    &self,
    request: RequestBuilder,
    fallback: &'static str,
  ) -> Result<T, RemoteError> {
    let response = request.send().await.map_err(|e| {
      error!("{}: {}", fallback, e);
      RemoteError::new(fallback)
    })?;

    let status = response.status();
    let body = response.bytes().await.map_err(|e| {
      error!("{}: failed to read response body: {}", fallback, e);
      RemoteError {
        status: Some(status.as_u16()),
        ..RemoteError::new(fallback)
      }
    })?;

    decode_response(status, &body, fallback).inspect_err(|err| {
      error!(status = err.status, "{}: {}", fallback, err.message);
      if let Some(validation) = &err.validation {
        error!("Validation details: {}", validation);
      }
    })
  }
}

/// Turn a status and raw body into the operation's result.
fn decode_response<T: DeserializeOwned>(
  status: StatusCode,
  body: &[u8],
  fallback: &str,
) -> Result<T, RemoteError> {
  if !status.is_success() {
    return Err(remote_error(status, body, fallback));
  }

  serde_json::from_slice(body).map_err(|e| {
    debug!("Undecodable response body: {}", e);
    RemoteError {
      status: Some(status.as_u16()),
      ..RemoteError::new(fallback)
    }
  })
}

impl NoteService for NoteClient {
  async fn list_notes(
    &self,
    page: u32,
    per_page: u32,
    search: &str,
  ) -> Result<PaginatedNotes, RemoteError> {
    debug!(page, per_page, search, "Listing notes");
    self
      .send(self.list_request(page, per_page, search), FETCH_FAILED)
      .await
  }

  async fn create_note(&self, payload: &CreateNotePayload) -> Result<Note, RemoteError> {
    self.send(self.create_request(payload), CREATE_FAILED).await
  }

  async fn delete_note(&self, id: u64) -> Result<DeleteNoteResponse, RemoteError> {
    self.send(self.delete_request(id), DELETE_FAILED).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::notehub::types::Tag;
  use reqwest::header::AUTHORIZATION;

  fn client(api_url: &str, token: Option<&str>) -> NoteClient {
    NoteClient {
      http: reqwest::Client::new(),
      base_url: Url::parse(api_url).unwrap(),
      token: token.map(String::from),
    }
  }

  #[test]
  fn test_list_request_omits_empty_search() {
    let req = client("https://example.test/api", Some("secret"))
      .list_request(2, 12, "")
      .build()
      .unwrap();

    assert_eq!(req.method(), Method::GET);
    assert_eq!(
      req.url().as_str(),
      "https://example.test/api/notes?page=2&perPage=12"
    );
    assert_eq!(req.headers()[AUTHORIZATION], "Bearer secret");
  }

  #[test]
  fn test_list_request_encodes_search() {
    let req = client("https://example.test/api/", None)
      .list_request(1, 12, "team sync")
      .build()
      .unwrap();

    assert_eq!(
      req.url().as_str(),
      "https://example.test/api/notes?page=1&perPage=12&search=team+sync"
    );
    assert!(req.headers().get(AUTHORIZATION).is_none());
  }

  #[test]
  fn test_create_request_sends_payload_as_json() {
    let payload = CreateNotePayload {
      title: "Buy milk".to_string(),
      content: "2 litres".to_string(),
      tag: Tag::Shopping,
    };
    let req = client("https://example.test/api", Some("t"))
      .create_request(&payload)
      .build()
      .unwrap();

    assert_eq!(req.method(), Method::POST);
    assert_eq!(req.url().path(), "/api/notes");
    let body = req.body().and_then(|b| b.as_bytes()).unwrap();
    let json: serde_json::Value = serde_json::from_slice(body).unwrap();
    assert_eq!(
      json,
      serde_json::json!({"title": "Buy milk", "content": "2 litres", "tag": "Shopping"})
    );
  }

  #[test]
  fn test_delete_request_targets_note() {
    let req = client("https://example.test/api", Some("t"))
      .delete_request(42)
      .build()
      .unwrap();

    assert_eq!(req.method(), Method::DELETE);
    assert_eq!(req.url().as_str(), "https://example.test/api/notes/42");
  }

  #[test]
  fn test_server_error_message_is_surfaced() {
    let result: Result<PaginatedNotes, _> = decode_response(
      StatusCode::INTERNAL_SERVER_ERROR,
      br#"{"message": "Server error"}"#,
      FETCH_FAILED,
    );
    let err = result.unwrap_err();
    assert_eq!(err.message, "Server error");
    assert_eq!(err.status, Some(500));
  }

  #[test]
  fn test_success_body_is_decoded() {
    let result: Result<DeleteNoteResponse, _> = decode_response(
      StatusCode::OK,
      br#"{"message": "Note deleted"}"#,
      DELETE_FAILED,
    );
    assert_eq!(result.unwrap().message, "Note deleted");
  }

  #[test]
  fn test_undecodable_success_body_uses_fallback() {
    let result: Result<Note, _> = decode_response(StatusCode::CREATED, b"{}", CREATE_FAILED);
    assert_eq!(result.unwrap_err().message, "Failed to create note");
  }

  #[tokio::test]
  async fn test_transport_failure_uses_fallback() {
    // Port 9 (discard) on localhost is not expected to accept connections
    let err = client("http://127.0.0.1:9/api", None)
      .list_notes(1, 12, "")
      .await
      .unwrap_err();
    assert_eq!(err.message, "Failed to fetch notes");
    assert_eq!(err.status, None);
  }
}
