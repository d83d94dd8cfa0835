// common/fake_api.rs - In-process HTTP server speaking the catalog API
//
// Behaves like the real backend where the client cares:
// - GET /api/session/ sets the `csrftoken` cookie
// - POST /api/login/ sets `sessionid` and rotates the CSRF token
// - mutations without the current token in X-CSRFToken get a 403
// - /products/ is paginated (5 per page) with a `next` link and filters
//
// Every request is recorded so tests can look at what the client sent.

use std::collections::HashMap;
use std::sync::Mutex;

use actix_web::http::header::{COOKIE, SET_COOKIE};
use actix_web::http::Method;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use catalog_admin::fixtures::{CatalogFixture, SampleCatalog};
use catalog_admin::web_app::api::client::{cookie_value, CSRF_HEADER};
use catalog_admin::web_app::api::ApiConfig;
use catalog_admin::web_app::model::{parse_decimal, parse_integer, Credentials, FilterCriteria, Product, ProductDraft};
use serde_json::json;

pub const PAGE_SIZE: usize = 5;
pub const FIRST_TOKEN: &str = "tok-1";
pub const LOGIN_TOKEN: &str = "tok-2";
pub const PASSWORD: &str = "secret";
const SESSION_ID: &str = "sess-42";

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub csrf: Option<String>,
    pub session_cookie: bool,
}

pub struct FakeState {
    products: Mutex<Vec<Product>>,
    token: Mutex<String>,
    user: Mutex<Option<String>>,
    requests: Mutex<Vec<Recorded>>,
}

impl Default for FakeState {
    fn default() -> Self {
        FakeState {
            products: Mutex::new(SampleCatalog::products()),
            token: Mutex::new(FIRST_TOKEN.to_string()),
            user: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl FakeState {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.lock().unwrap().clone()
    }

    fn token(&self) -> String {
        self.token.lock().unwrap().clone()
    }
}

/// Start the server on an ephemeral port
pub async fn spawn_fake_api() -> anyhow::Result<(ApiConfig, web::Data<FakeState>)> {
    super::init_tracing();
    let state = web::Data::new(FakeState::default());
    let data = state.clone();

    let server = HttpServer::new(move || App::new().app_data(data.clone()).default_service(web::to(dispatch)))
        .workers(1)
        .bind(("127.0.0.1", 0))?;
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    Ok((ApiConfig::new(format!("http://{addr}")), state))
}

fn json_error(status: u16, body: serde_json::Value) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(status).unwrap();
    HttpResponse::build(status).json(body)
}

async fn dispatch(req: HttpRequest, body: web::Bytes, state: web::Data<FakeState>) -> HttpResponse {
    let csrf = req
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let session_cookie = req
        .headers()
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| cookie_value(cookies, "sessionid"))
        .is_some_and(|id| id == SESSION_ID);
    state.requests.lock().unwrap().push(Recorded {
        method: req.method().to_string(),
        path: req.path().to_string(),
        query: req.query_string().to_string(),
        csrf: csrf.clone(),
        session_cookie,
    });

    let method = req.method().clone();
    let segments: Vec<&str> = req.path().trim_matches('/').split('/').collect();

    if method != Method::GET && csrf.as_deref() != Some(state.token().as_str()) {
        return json_error(403, json!({ "detail": "CSRF Failed: CSRF token missing or incorrect." }));
    }

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["api", "session"]) => {
            let user = state.user.lock().unwrap().clone();
            HttpResponse::Ok()
                .append_header((SET_COOKIE, format!("csrftoken={}; Path=/", state.token())))
                .json(json!({ "isauthenticated": user.is_some() && session_cookie, "username": user }))
        }
        ("POST", ["api", "login"]) | ("POST", ["api", "register"]) => {
            let Ok(credentials) = serde_json::from_slice::<Credentials>(&body) else {
                return json_error(400, json!({ "detail": "Please provide username and password." }));
            };
            if credentials.password != PASSWORD {
                return json_error(400, json!({ "detail": "Invalid credentials." }));
            }
            *state.token.lock().unwrap() = LOGIN_TOKEN.to_string();
            *state.user.lock().unwrap() = Some(credentials.username.clone());
            HttpResponse::Ok()
                .append_header((SET_COOKIE, format!("sessionid={SESSION_ID}; Path=/; HttpOnly")))
                .append_header((SET_COOKIE, format!("csrftoken={LOGIN_TOKEN}; Path=/")))
                .json(json!({ "detail": "Successfully logged in." }))
        }
        ("POST", ["api", "logout"]) => {
            *state.user.lock().unwrap() = None;
            HttpResponse::Ok().json(json!({ "detail": "Successfully logged out." }))
        }
        ("GET", ["products"]) => list_products(&req, &state),
        ("POST", ["products"]) => {
            let Ok(draft) = serde_json::from_slice::<ProductDraft>(&body) else {
                return json_error(400, json!({ "price": ["A valid number is required."] }));
            };
            if draft.name.trim().is_empty() {
                return json_error(400, json!({ "name": ["This field may not be blank."] }));
            }
            let mut products = state.products.lock().unwrap();
            let id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
            let product = draft.with_id(id);
            products.push(product.clone());
            HttpResponse::Created().json(product)
        }
        ("PATCH", ["products", id]) => {
            let Ok(id) = id.parse::<i32>() else {
                return json_error(404, json!({ "detail": "Not found." }));
            };
            let Ok(draft) = serde_json::from_slice::<ProductDraft>(&body) else {
                return json_error(400, json!({ "detail": "Malformed request." }));
            };
            let mut products = state.products.lock().unwrap();
            match products.iter_mut().find(|p| p.id == id) {
                Some(slot) => {
                    *slot = draft.with_id(id);
                    HttpResponse::Ok().json(slot.clone())
                }
                None => json_error(404, json!({ "detail": "Not found." })),
            }
        }
        ("DELETE", ["products", id]) => {
            let id = id.parse::<i32>().unwrap_or(-1);
            let mut products = state.products.lock().unwrap();
            let before = products.len();
            products.retain(|p| p.id != id);
            if products.len() == before {
                json_error(404, json!({ "detail": "Not found." }))
            } else {
                HttpResponse::NoContent().finish()
            }
        }
        _ => json_error(404, json!({ "detail": "Not found." })),
    }
}

fn list_products(req: &HttpRequest, state: &FakeState) -> HttpResponse {
    let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();

    // lets tests provoke a server error with a non-JSON body
    if query.get("name").map(String::as_str) == Some("boom") {
        return HttpResponse::InternalServerError()
            .content_type("text/html")
            .body("<h1>Server Error (500)</h1>");
    }

    let decimal = |key: &'static str| query.get(key).and_then(|raw| parse_decimal(key, raw).ok());
    let integer = |key: &'static str| query.get(key).and_then(|raw| parse_integer(key, raw).ok());
    let criteria = FilterCriteria::default()
        .with_name(query.get("name").cloned().unwrap_or_default())
        .with_price_range(decimal("price_min"), decimal("price_max"))
        .with_stock_range(integer("stock_min"), integer("stock_max"));

    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let products = state.products.lock().unwrap();
    let matching: Vec<&Product> = products.iter().filter(|p| criteria.matches(p)).collect();

    let start = (page.max(1) - 1) * PAGE_SIZE;
    if page == 0 || (page > 1 && start >= matching.len()) {
        return json_error(404, json!({ "detail": "Invalid page." }));
    }
    let end = (start + PAGE_SIZE).min(matching.len());
    let next = (end < matching.len()).then(|| format!("http://testserver/products/?page={}", page + 1));

    HttpResponse::Ok().json(json!({
        "count": matching.len(),
        "next": next,
        "previous": null,
        "results": matching[start..end],
    }))
}
