//! HTTP implementation of the menu catalog port.
//!
//! Every response is decoded into the strict `MenuEntry` shape and sanitized
//! here, at the edge. A response that fails any check is rejected whole.

use std::time::Duration;

use async_trait::async_trait;
use menugate_core::{sanitize_catalog, CatalogError, MenuCatalog, MenuEntry};
use menugate_shared::config::ApiSettings;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::session::SessionToken;

const USER_MENUS_PATH: &str = "/menus/user";
const ADMIN_MENUS_PATH: &str = "/menus/admin";
const DISCOVER_MENUS_PATH: &str = "/menus/admin/fetch";

/// Response envelope used by the dashboard backend.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorBody {
    Detailed {
        #[serde(default)]
        code: Option<String>,
        message: String,
    },
    Plain(String),
}

impl ApiErrorBody {
    fn into_message(self) -> String {
        match self {
            ApiErrorBody::Detailed { code: Some(code), message } => format!("{code}: {message}"),
            ApiErrorBody::Detailed { code: None, message } => message,
            ApiErrorBody::Plain(message) => message,
        }
    }
}

#[derive(Clone)]
pub struct HttpMenuCatalog {
    client: Client,
    base_url: String,
    session: SessionToken,
}

impl HttpMenuCatalog {
    pub fn new(base_url: &str, timeout: Duration, session: SessionToken) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn from_settings(settings: &ApiSettings, session: SessionToken) -> Result<Self, CatalogError> {
        Self::new(&settings.base_url, settings.timeout(), session)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, CatalogError> {
        let request = match self.session.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("Menu catalog rejected credentials");
            return Err(CatalogError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        let envelope: ApiEnvelope<T> = serde_json::from_slice(&body)
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;

        if !envelope.success {
            let reason = envelope
                .error
                .map(ApiErrorBody::into_message)
                .or(envelope.message)
                .unwrap_or_else(|| "success=false".to_string());
            return Err(CatalogError::Rejected(reason));
        }

        envelope
            .data
            .ok_or_else(|| CatalogError::Malformed("response has no data".to_string()))
    }

    async fn fetch_catalog(&self, request: RequestBuilder) -> Result<Vec<MenuEntry>, CatalogError> {
        let entries: Vec<MenuEntry> = self.send(request).await?;
        let entries = sanitize_catalog(entries)?;
        debug!("Decoded {} menu entries", entries.len());
        Ok(entries)
    }
}

#[async_trait]
impl MenuCatalog for HttpMenuCatalog {
    async fn user_menus(&self) -> Result<Vec<MenuEntry>, CatalogError> {
        self.fetch_catalog(self.client.get(self.url(USER_MENUS_PATH)))
            .await
    }

    async fn admin_menus(&self) -> Result<Vec<MenuEntry>, CatalogError> {
        self.fetch_catalog(self.client.get(self.url(ADMIN_MENUS_PATH)))
            .await
    }

    async fn discover_menus(&self) -> Result<Vec<MenuEntry>, CatalogError> {
        self.fetch_catalog(self.client.post(self.url(DISCOVER_MENUS_PATH)))
            .await
    }

    async fn toggle_menu(&self, id: Uuid) -> Result<MenuEntry, CatalogError> {
        let url = self.url(&format!("{}/{}/toggle", ADMIN_MENUS_PATH, id));
        let entry: MenuEntry = self.send(self.client.patch(url)).await?;
        Ok(entry.sanitize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn catalog_for(server: &MockServer, token: Option<&str>) -> HttpMenuCatalog {
        HttpMenuCatalog::new(
            &server.uri(),
            Duration::from_secs(5),
            SessionToken::new(token.map(str::to_string)),
        )
        .unwrap()
    }

    fn entry_json(route: &str, parent: Option<&str>, enabled: bool) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "routePath": route,
            "displayName": route,
            "parentPath": parent,
            "isEnabled": enabled,
        })
    }

    #[tokio::test]
    async fn test_user_menus_decodes_and_sends_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menus/user"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    entry_json("/dashboard", None, true),
                    entry_json("analysis", None, true),
                    entry_json("analysis/market-news", Some("analysis"), false),
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let entries = catalog_for(&server, Some("secret")).user_menus().await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].route_path, "dashboard");
        assert!(!entries[2].is_enabled);
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menus/user"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = catalog_for(&server, Some("expired")).user_menus().await.unwrap_err();
        assert_eq!(err, CatalogError::Unauthorized);
    }

    #[tokio::test]
    async fn test_success_false_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menus/admin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "data": null,
                "error": { "code": "FORBIDDEN", "message": "admin only" }
            })))
            .mount(&server)
            .await;

        let err = catalog_for(&server, None).admin_menus().await.unwrap_err();
        assert_eq!(err, CatalogError::Rejected("FORBIDDEN: admin only".to_string()));
    }

    #[tokio::test]
    async fn test_malformed_shapes_rejected_whole() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menus/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    entry_json("dashboard", None, true),
                    { "routePath": "kyc", "isEnabled": "yes" }
                ]
            })))
            .mount(&server)
            .await;

        let err = catalog_for(&server, None).user_menus().await.unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_too_deep_entry_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menus/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [entry_json("a/b/c", None, true)]
            })))
            .mount(&server)
            .await;

        let err = catalog_for(&server, None).user_menus().await.unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_missing_data_and_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/menus/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/menus/admin/fetch"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let catalog = catalog_for(&server, None);
        assert!(matches!(
            catalog.user_menus().await.unwrap_err(),
            CatalogError::Malformed(_)
        ));
        assert_eq!(
            catalog.discover_menus().await.unwrap_err(),
            CatalogError::Http { status: 500, message: "boom".to_string() }
        );
    }

    #[tokio::test]
    async fn test_toggle_hits_entry_endpoint() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("PATCH"))
            .and(path(format!("/menus/admin/{}/toggle", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "id": id,
                    "routePath": "analysis",
                    "displayName": "Analysis",
                    "isEnabled": false
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let updated = catalog_for(&server, None).toggle_menu(id).await.unwrap();
        assert_eq!(updated.id, id);
        assert!(!updated.is_enabled);
    }

    #[tokio::test]
    async fn test_network_failure() {
        let catalog = HttpMenuCatalog::new(
            "http://127.0.0.1:9",
            Duration::from_millis(500),
            SessionToken::default(),
        )
        .unwrap();
        assert!(matches!(
            catalog.user_menus().await.unwrap_err(),
            CatalogError::Network(_)
        ));
    }
}
