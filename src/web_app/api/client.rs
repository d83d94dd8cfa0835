// web_app/api/client.rs - HTTP client for the catalog REST backend
//
// Thin wrapper around reqwest that speaks JSON, carries the session's CSRF token
// on mutating requests and turns every failure into an `ApiError`.
//
// Session state is never global: callers hand a `SessionContext` to every
// request-issuing call (or bind one with `ApiClient::catalog`).

use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE, SET_COOKIE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::config::ApiConfig;
use super::CatalogBackend;
use crate::web_app::error::ApiError;
use crate::web_app::model::{FilterCriteria, Product, ProductDraft, ProductId, ProductPage};

/// Name of the cookie the backend stores its CSRF token in
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the backend expects the CSRF token in
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Identity and credentials of the current application session
///
/// Lives as long as the admin UI session; cloned into each request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub username: Option<String>,
    pub authenticated: bool,
    csrf_token: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        SessionContext::default()
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    pub fn set_csrf_token(&mut self, token: Option<String>) {
        self.csrf_token = token;
    }

    pub fn sign_in(&mut self, username: impl Into<String>) {
        self.username = Some(username.into());
        self.authenticated = true;
    }

    pub fn sign_out(&mut self) {
        self.username = None;
        self.authenticated = false;
    }

    /// Pick up a fresh CSRF token from `Set-Cookie` response headers
    pub fn capture_csrf(&mut self, headers: &HeaderMap) {
        let token = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|cookie| cookie_value(cookie, CSRF_COOKIE));
        if let Some(token) = token {
            tracing::debug!("Captured CSRF token from response cookies");
            self.csrf_token = Some(token);
        }
    }

    /// Read the CSRF token from `document.cookie` (browser build only)
    pub fn refresh_csrf_from_browser(&mut self) {
        if let Some(token) = browser_cookie(CSRF_COOKIE) {
            self.csrf_token = Some(token);
        }
    }
}

/// Find `name=value` in a cookie string (`Cookie` header, `Set-Cookie` or `document.cookie`)
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

cfg_if::cfg_if! {
    if #[cfg(all(target_arch = "wasm32", feature = "hydrate"))] {
        fn browser_cookie(name: &str) -> Option<String> {
            use wasm_bindgen::JsCast;

            let document = web_sys::window()?.document()?;
            let cookies = document.dyn_into::<web_sys::HtmlDocument>().ok()?.cookie().ok()?;
            cookie_value(&cookies, name)
        }

        fn with_credentials(request: RequestBuilder) -> RequestBuilder {
            request.fetch_credentials_include()
        }

        fn build_http() -> Result<Client, ApiError> {
            Ok(Client::new())
        }
    } else if #[cfg(target_arch = "wasm32")] {
        fn browser_cookie(_name: &str) -> Option<String> {
            None
        }

        fn with_credentials(request: RequestBuilder) -> RequestBuilder {
            request.fetch_credentials_include()
        }

        fn build_http() -> Result<Client, ApiError> {
            Ok(Client::new())
        }
    } else {
        fn browser_cookie(_name: &str) -> Option<String> {
            None
        }

        // the cookie store already sends the session cookie
        fn with_credentials(request: RequestBuilder) -> RequestBuilder {
            request
        }

        fn build_http() -> Result<Client, ApiError> {
            Client::builder()
                .cookie_store(true)
                .build()
                .map_err(|e| ApiError::Transport(format!("could not build HTTP client: {e}")))
        }
    }
}

/// Shared HTTP client; cheap to clone
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Ok(ApiClient {
            http: build_http()?,
            config,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Bind this client to a session so it can serve as a `CatalogBackend`
    pub fn catalog(&self, session: &SessionContext) -> CatalogApi {
        CatalogApi {
            client: self.clone(),
            session: session.clone(),
        }
    }

    /// Start a request with JSON negotiation headers
    pub(crate) fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.config.url(path))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
    }

    /// Start a request that carries the session cookie
    pub(crate) fn credentialed(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        with_credentials(self.request(method, path))
    }

    /// Start a state-changing request: credentials included, CSRF header when known
    pub(crate) fn mutation(&self, method: reqwest::Method, path: &str, session: &SessionContext) -> RequestBuilder {
        let request = self.credentialed(method, path);
        match session.csrf_token() {
            Some(token) => request.header(CSRF_HEADER, token),
            None => request,
        }
    }

    pub async fn fetch_page(
        &self,
        session: &SessionContext,
        page: u32,
        filter: &FilterCriteria,
    ) -> Result<ProductPage, ApiError> {
        let mut query: Vec<(&str, String)> = vec![("page", page.to_string())];
        query.extend(filter.query_pairs());

        tracing::info!(
            "Fetching products page={} filter={:?} user={:?}",
            page,
            filter,
            session.username
        );
        let request = self.credentialed(reqwest::Method::GET, "/products/").query(&query);
        let page: ProductPage = send_json(request).await?;
        tracing::info!(
            "Fetched {} products (more: {})",
            page.results.len(),
            page.has_more()
        );
        Ok(page)
    }

    pub async fn create_product(&self, session: &SessionContext, draft: &ProductDraft) -> Result<Product, ApiError> {
        tracing::info!("Creating product '{}'", draft.name);
        let request = self
            .mutation(reqwest::Method::POST, "/products/", session)
            .json(draft);
        send_json(request).await
    }

    pub async fn update_product(
        &self,
        session: &SessionContext,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        tracing::info!("Updating product id={}", id);
        let request = self
            .mutation(reqwest::Method::PATCH, &format!("/products/{id}/"), session)
            .json(draft);
        send_json(request).await
    }

    pub async fn delete_product(&self, session: &SessionContext, id: ProductId) -> Result<(), ApiError> {
        tracing::info!("Deleting product id={}", id);
        let request = self.mutation(reqwest::Method::DELETE, &format!("/products/{id}/"), session);
        send_empty(request).await
    }
}

/// Send and decode a JSON body, mapping non-success statuses to `ApiError::Backend`
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = checked(request.send().await?).await?;
    decode(response).await
}

/// Send a request whose success body is irrelevant
pub(crate) async fn send_empty(request: RequestBuilder) -> Result<(), ApiError> {
    checked(request.send().await?).await.map(|_| ())
}

pub(crate) async fn checked(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = ApiError::from_response(status.as_u16(), &body);
    tracing::warn!("Backend rejected request: status={} message={}", status, err);
    Err(err)
}

pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        tracing::error!("Failed to decode backend response: {}", e);
        ApiError::Decode(e.to_string())
    })
}

/// An `ApiClient` bound to one session; implements `CatalogBackend`
#[derive(Clone, Debug)]
pub struct CatalogApi {
    client: ApiClient,
    session: SessionContext,
}

impl CatalogApi {
    pub fn session(&self) -> &SessionContext {
        &self.session
    }
}

impl CatalogBackend for CatalogApi {
    async fn fetch_page(&self, page: u32, filter: &FilterCriteria) -> Result<ProductPage, ApiError> {
        self.client.fetch_page(&self.session, page, filter).await
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.client.create_product(&self.session, draft).await
    }

    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.client.update_product(&self.session, id, draft).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.client.delete_product(&self.session, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_cookie_value() {
        let cookies = "sessionid=abc; csrftoken=tok123; theme=dark";
        assert_eq!(cookie_value(cookies, "csrftoken").as_deref(), Some("tok123"));
        assert_eq!(cookie_value(cookies, "missing"), None);
        assert_eq!(cookie_value("csrftoken=", "csrftoken"), None);
    }

    #[test]
    fn test_capture_csrf_from_set_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("sessionid=s1; Path=/; HttpOnly"));
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("csrftoken=fresh; expires=Tue, 01 Jan 2030 00:00:00 GMT; Path=/"),
        );

        let mut session = SessionContext::new();
        session.capture_csrf(&headers);
        assert_eq!(session.csrf_token(), Some("fresh"));
    }

    #[test]
    fn test_sign_in_and_out() {
        let mut session = SessionContext::new().with_csrf_token("t");
        session.sign_in("admin");
        assert!(session.authenticated);
        assert_eq!(session.username.as_deref(), Some("admin"));

        session.sign_out();
        assert!(!session.authenticated);
        assert!(session.username.is_none());
        assert_eq!(session.csrf_token(), Some("t"));
    }
}
