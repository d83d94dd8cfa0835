// tests/client_http_tests.rs - ApiClient against a real HTTP server
//
// Runs the list controller over `CatalogApi` so the whole path is exercised:
// query string, JSON decoding, CSRF header on mutations and error extraction.
//
// Requires the `web` feature (actix-web server).

mod common;

use catalog_admin::web_app::api::{ApiClient, ApiConfig, CatalogBackend, SessionContext};
use catalog_admin::web_app::controller::{CatalogController, LoadOutcome};
use catalog_admin::web_app::error::{ApiError, CatalogError};
use catalog_admin::web_app::forms::ProductForm;
use catalog_admin::web_app::model::FilterCriteria;
use common::fake_api::{spawn_fake_api, FIRST_TOKEN};
use common::ids;
use rust_decimal::Decimal;

/// Client plus a session that already holds the CSRF cookie
async fn connected() -> anyhow::Result<(ApiClient, SessionContext, actix_web::web::Data<common::fake_api::FakeState>)> {
    let (config, state) = spawn_fake_api().await?;
    let client = ApiClient::new(config)?;
    let mut session = SessionContext::new();
    client.fetch_session(&mut session).await?;
    Ok((client, session, state))
}

#[actix_web::test]
async fn test_paginates_until_next_is_null() -> anyhow::Result<()> {
    let (client, session, state) = connected().await?;
    let backend = client.catalog(&session);
    let mut controller = CatalogController::new();

    for _ in 0..10 {
        if controller.load_next_page(&backend).await.is_none() {
            break;
        }
    }

    assert_eq!(ids(controller.products()), (1..=12).collect::<Vec<_>>());
    assert!(!controller.has_more());
    assert_eq!(controller.products()[1].price, Decimal::new(1299, 2));

    let pages: Vec<String> = state
        .requests()
        .into_iter()
        .filter(|r| r.path == "/products/")
        .map(|r| r.query)
        .collect();
    assert_eq!(pages, vec!["page=1", "page=2", "page=3"]);
    Ok(())
}

#[actix_web::test]
async fn test_filter_is_sent_as_query_parameters() -> anyhow::Result<()> {
    let (client, session, state) = connected().await?;
    let backend = client.catalog(&session);
    let mut controller = CatalogController::new();

    let criteria = FilterCriteria::default()
        .with_name("chair")
        .with_price_range(None, Some(Decimal::new(200, 0)));
    let outcome = controller.filter_by(&backend, criteria).await;

    assert!(matches!(outcome, LoadOutcome::Loaded { appended: 1, has_more: false, .. }));
    assert_eq!(ids(controller.products()), vec![7]);
    let last = state.requests().pop().unwrap();
    assert_eq!(last.query, "page=1&name=chair&price_max=200");
    Ok(())
}

#[actix_web::test]
async fn test_mutations_carry_csrf_token() -> anyhow::Result<()> {
    let (client, session, state) = connected().await?;
    assert_eq!(session.csrf_token(), Some(FIRST_TOKEN));
    let backend = client.catalog(&session);
    let mut controller = CatalogController::new();
    controller.load_next_page(&backend).await;

    let form = ProductForm {
        name: "Laptop Stand".to_string(),
        price: "39.90".to_string(),
        stock: "12".to_string(),
        image_url: "https://img.example/stand.png".to_string(),
    };
    let created = controller.save(&backend, &form, None).await?;
    assert_eq!(created.id, 13);
    assert_eq!(created.price, Decimal::new(3990, 2));
    assert_eq!(controller.products()[0].id, 13);

    controller.delete(&backend, 13).await?;
    assert!(!controller.contains(13));

    let mutations: Vec<_> = state.requests().into_iter().filter(|r| r.method != "GET").collect();
    assert_eq!(mutations.len(), 2);
    assert!(mutations.iter().all(|r| r.csrf.as_deref() == Some(FIRST_TOKEN)));
    Ok(())
}

#[actix_web::test]
async fn test_missing_csrf_token_is_rejected() -> anyhow::Result<()> {
    let (config, _state) = spawn_fake_api().await?;
    let client = ApiClient::new(config)?;
    // no session lookup, so no token
    let backend = client.catalog(&SessionContext::new());

    let err = backend.delete_product(1).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.to_string(), "CSRF Failed: CSRF token missing or incorrect.");
    Ok(())
}

#[actix_web::test]
async fn test_update_replaces_entry() -> anyhow::Result<()> {
    let (client, session, state) = connected().await?;
    let backend = client.catalog(&session);
    let mut controller = CatalogController::new();
    controller.load_next_page(&backend).await;

    let mut form = ProductForm::from_product(&controller.products()[2]);
    form.name = "Mechanical Keyboard TKL".to_string();
    controller.save(&backend, &form, Some(3)).await?;

    assert_eq!(ids(controller.products()), vec![1, 2, 3, 4, 5]);
    assert_eq!(controller.products()[2].name, "Mechanical Keyboard TKL");
    assert_eq!(state.products()[2].name, "Mechanical Keyboard TKL");
    Ok(())
}

#[actix_web::test]
async fn test_backend_errors_become_messages() -> anyhow::Result<()> {
    let (client, session, _state) = connected().await?;
    let backend = client.catalog(&session);
    let mut controller = CatalogController::new();

    let outcome = controller
        .filter_by(&backend, FilterCriteria::default().with_name("boom"))
        .await;
    assert_eq!(outcome, LoadOutcome::Failed("Request failed with status 500".to_string()));

    let form = ProductForm {
        name: "Ghost".to_string(),
        price: "1".to_string(),
        stock: "1".to_string(),
        image_url: "https://img.example/ghost.png".to_string(),
    };
    let result = controller.save(&backend, &form, Some(999)).await;
    assert!(matches!(
        result,
        Err(CatalogError::Api(ApiError::Backend { status: 404, .. }))
    ));
    assert_eq!(controller.error(), Some("Not found."));
    Ok(())
}

#[actix_web::test]
async fn test_unreachable_backend_is_a_transport_error() -> anyhow::Result<()> {
    // port 9 (discard) is closed on test machines
    let client = ApiClient::new(ApiConfig::new("http://127.0.0.1:9"))?;
    let backend = client.catalog(&SessionContext::new());
    let err = backend
        .fetch_page(1, &FilterCriteria::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    Ok(())
}
