// Catalog API smoke check
//
// Talks to the REST backend the same way the admin UI does:
//   1. GET /api/session/ (and log in when CATALOG_USERNAME/CATALOG_PASSWORD are set)
//   2. page through /products/ with the list controller
//   3. optionally apply a name filter given as the first argument
//
// Usage: cargo run --bin api_check --features cli-tools -- [name filter] [max pages]

use anyhow::{Context, Result};
use catalog_admin::web_app::api::{ApiClient, ApiConfig, SessionContext};
use catalog_admin::web_app::controller::{CatalogController, LoadOutcome};
use catalog_admin::web_app::model::{Credentials, FilterCriteria};
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_PAGES: u32 = 3;

fn main() -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut args = std::env::args().skip(1);
    let name_filter = args.next().filter(|name| !name.trim().is_empty());
    let max_pages = match args.next() {
        Some(raw) => raw.parse::<u32>().context("max pages must be a number")?,
        None => DEFAULT_MAX_PAGES,
    };

    let config = ApiConfig::from_env();
    println!("Checking catalog API at {}", config.base_url());
    let client = ApiClient::new(config)?;
    let mut session = SessionContext::new();

    // Session
    let info = client.fetch_session(&mut session).await.context("session lookup failed")?;
    println!(
        "✓ Session: authenticated={} csrf={}",
        info.isauthenticated,
        if session.csrf_token().is_some() { "yes" } else { "no" }
    );

    if let (Ok(username), Ok(password)) = (std::env::var("CATALOG_USERNAME"), std::env::var("CATALOG_PASSWORD")) {
        let credentials = Credentials { username, password };
        match client.login(&mut session, &credentials).await {
            Ok(()) => println!("✓ Logged in as {}", credentials.username),
            Err(e) => println!("✗ Login failed: {}", e),
        }
    }

    // Listing
    let backend = client.catalog(&session);
    let mut controller = CatalogController::new();
    if let Some(name) = name_filter {
        println!("\nFiltering by name containing '{}'", name);
        report(controller.filter_by(&backend, FilterCriteria::default().with_name(name)).await);
    } else {
        report(controller.load_next_page(&backend).await.context("first page was not requested")?);
    }

    while controller.has_more() && controller.cursor().page() < max_pages && controller.error().is_none() {
        match controller.load_next_page(&backend).await {
            Some(outcome) => report(outcome),
            None => break,
        }
    }

    println!("\nLoaded {} products:", controller.products().len());
    for product in controller.products() {
        println!(
            "  - #{:<5} {:<40} {:>10} stock {}",
            product.id, product.name, product.price, product.stock
        );
    }
    if controller.has_more() {
        println!("  ... more pages available");
    }

    match controller.error() {
        Some(message) => anyhow::bail!("listing failed: {message}"),
        None => Ok(()),
    }
}

fn report(outcome: LoadOutcome) {
    match outcome {
        LoadOutcome::Loaded { appended, has_more, .. } => {
            println!("✓ Page loaded: {} new products (more: {})", appended, has_more)
        }
        LoadOutcome::Failed(message) => println!("✗ Page failed: {}", message),
        LoadOutcome::Stale => println!("  (stale response ignored)"),
    }
}
