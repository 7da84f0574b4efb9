//! REST implementation of `EntityService`
//!
//! | Operation | Request |
//! |-----------|---------|
//! | get       | `GET {collection}/{id}` |
//! | create    | `POST {collection}` |
//! | update    | `PUT {collection}/{id}` |
//! | remove    | `DELETE {collection}/{id}` |

mod client;

use std::marker::PhantomData;

use async_trait::async_trait;
use priority_editor_core::error::{CoreError, CoreResult, ServiceError, ServiceResult};
use priority_editor_core::traits::{EntityService, FormEntity};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::EditorConfig;
use client::HttpUtils;

/// `EntityService` over JSON REST
pub struct HttpEntityService<E> {
    client: reqwest::Client,
    collection_url: Url,
    _entity: PhantomData<fn() -> E>,
}

impl<E> HttpEntityService<E>
where
    E: FormEntity + Serialize + DeserializeOwned,
{
    /// Build a client from configuration
    pub fn new(config: &EditorConfig) -> CoreResult<Self> {
        let collection_url = config.collection_url()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CoreError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, collection_url))
    }

    /// Use an existing `reqwest::Client` (shared connection pool)
    #[must_use]
    pub fn with_client(client: reqwest::Client, collection_url: Url) -> Self {
        Self {
            client,
            collection_url,
            _entity: PhantomData,
        }
    }

    #[must_use]
    pub fn collection_url(&self) -> &str {
        self.collection_url.as_str()
    }

    /// `{collection}/{id}`
    #[must_use]
    pub fn item_url(&self, id: &E::Id) -> String {
        format!("{}/{id}", self.collection_url.as_str().trim_end_matches('/'))
    }

    fn resource_name(id: &E::Id) -> String {
        format!("{}/{id}", E::KIND)
    }

    async fn send_for_entity(
        &self,
        request: reqwest::RequestBuilder,
        method: &str,
        url: &str,
        resource: &str,
    ) -> ServiceResult<E> {
        let (status, body) = HttpUtils::execute_request(request, method, url).await?;
        HttpUtils::check_status(status, &body, resource)?;
        HttpUtils::parse_json(&body)
    }
}

#[async_trait]
impl<E> EntityService<E> for HttpEntityService<E>
where
    E: FormEntity + Serialize + DeserializeOwned,
{
    async fn get(&self, id: &E::Id) -> ServiceResult<E> {
        let url = self.item_url(id);
        self.send_for_entity(self.client.get(&url), "GET", &url, &Self::resource_name(id))
            .await
    }

    async fn create(&self, entity: &E) -> ServiceResult<E> {
        let url = self.collection_url.as_str();
        self.send_for_entity(self.client.post(url).json(entity), "POST", url, E::KIND)
            .await
    }

    async fn update(&self, entity: &E) -> ServiceResult<E> {
        let id = entity.id().ok_or_else(|| ServiceError::Rejected {
            status: 0,
            message: format!("cannot update a {} without an id", E::KIND),
        })?;
        let url = self.item_url(id);
        self.send_for_entity(
            self.client.put(&url).json(entity),
            "PUT",
            &url,
            &Self::resource_name(id),
        )
        .await
    }

    async fn remove(&self, id: &E::Id) -> ServiceResult<()> {
        let url = self.item_url(id);
        let (status, body) =
            HttpUtils::execute_request(self.client.delete(&url), "DELETE", &url).await?;
        HttpUtils::check_status(status, &body, &Self::resource_name(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use priority_editor_core::types::Priority;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn service(base_url: &str) -> HttpEntityService<Priority> {
        let config = EditorConfig {
            base_url: base_url.to_string(),
            ..EditorConfig::default()
        };
        HttpEntityService::new(&config).unwrap()
    }

    /// One-shot HTTP server: answers a single request with a canned response
    /// and hands back the raw request it received.
    struct StubServer {
        base_url: String,
        request: JoinHandle<String>,
    }

    impl StubServer {
        async fn respond(status: &'static str, body: &'static str) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let request = tokio::spawn(async move {
                let (mut stream, _) = listener.accept().await.unwrap();
                let request = read_request(&mut stream).await;
                let headers = if body.is_empty() {
                    String::new()
                } else {
                    format!(
                        "Content-Type: application/json\r\nContent-Length: {}\r\n",
                        body.len()
                    )
                };
                let response =
                    format!("HTTP/1.1 {status}\r\nConnection: close\r\n{headers}\r\n{body}");
                stream.write_all(response.as_bytes()).await.unwrap();
                stream.shutdown().await.unwrap();
                request
            });
            Self {
                base_url: format!("http://{addr}"),
                request,
            }
        }

        async fn received(self) -> String {
            self.request.await.unwrap()
        }
    }

    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + body_len {
                break;
            }
        }
        String::from_utf8(buf).unwrap()
    }

    fn body_json(request: &str) -> serde_json::Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn urls_follow_collection_layout() {
        let svc = service("http://localhost:8080/api/");
        assert_eq!(svc.collection_url(), "http://localhost:8080/api/priority");
        assert_eq!(svc.item_url(&7), "http://localhost:8080/api/priority/7");
    }

    #[tokio::test]
    async fn update_without_id_is_rejected_locally() {
        let svc = service("http://127.0.0.1:9");
        let result = svc.update(&Priority::new("orphan")).await;
        assert!(matches!(result, Err(ServiceError::Rejected { status: 0, .. })));
    }

    #[tokio::test]
    async fn get_fetches_item() {
        let stub = StubServer::respond("200 OK", r#"{"idPriority":7,"label":"High"}"#).await;
        let svc = service(&stub.base_url);

        let priority = svc.get(&7).await.unwrap();

        assert_eq!(priority, Priority::with_id(7, "High"));
        assert!(stub.received().await.starts_with("GET /priority/7 HTTP/1.1"));
    }

    #[tokio::test]
    async fn get_missing_item_is_not_found() {
        let stub =
            StubServer::respond("404 Not Found", r#"{"message":"no such priority"}"#).await;
        let svc = service(&stub.base_url);

        let err = svc.get(&7).await.unwrap_err();

        assert_eq!(
            err,
            ServiceError::NotFound {
                id: "priority/7".into()
            }
        );
        stub.received().await;
    }

    #[tokio::test]
    async fn create_posts_unpersisted_entity() {
        let stub =
            StubServer::respond("201 Created", r#"{"idPriority":7,"label":"Urgent"}"#).await;
        let svc = service(&stub.base_url);

        let created = svc.create(&Priority::new("Urgent")).await.unwrap();

        assert_eq!(created, Priority::with_id(7, "Urgent"));
        let request = stub.received().await;
        assert!(request.starts_with("POST /priority HTTP/1.1"));
        assert_eq!(
            body_json(&request),
            serde_json::json!({ "idPriority": null, "label": "Urgent" })
        );
    }

    #[tokio::test]
    async fn update_puts_to_item_url() {
        let stub = StubServer::respond("200 OK", r#"{"idPriority":7,"label":"Low"}"#).await;
        let svc = service(&stub.base_url);

        let updated = svc.update(&Priority::with_id(7, "Low")).await.unwrap();

        assert_eq!(updated, Priority::with_id(7, "Low"));
        let request = stub.received().await;
        assert!(request.starts_with("PUT /priority/7 HTTP/1.1"));
        assert_eq!(
            body_json(&request),
            serde_json::json!({ "idPriority": 7, "label": "Low" })
        );
    }

    #[tokio::test]
    async fn rejected_update_carries_server_message() {
        let stub =
            StubServer::respond("422 Unprocessable Entity", r#"{"message":"label taken"}"#).await;
        let svc = service(&stub.base_url);

        let err = svc.update(&Priority::with_id(7, "Low")).await.unwrap_err();

        assert_eq!(
            err,
            ServiceError::Rejected {
                status: 422,
                message: "label taken".into()
            }
        );
        stub.received().await;
    }

    #[tokio::test]
    async fn remove_accepts_no_content() {
        let stub = StubServer::respond("204 No Content", "").await;
        let svc = service(&stub.base_url);

        svc.remove(&7).await.unwrap();

        assert!(stub.received().await.starts_with("DELETE /priority/7 HTTP/1.1"));
    }

    #[tokio::test]
    async fn malformed_entity_body_is_parse_error() {
        let stub = StubServer::respond("200 OK", r#"{"unexpected":true"#).await;
        let svc = service(&stub.base_url);

        let err = svc.get(&7).await.unwrap_err();

        assert!(matches!(err, ServiceError::Parse(_)));
        stub.received().await;
    }
}
