// ═══════════════════════════════════════════════════════════════════
// Web Tests: routes, pages, forms and error pages through the router
// ═══════════════════════════════════════════════════════════════════

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use metals_tracker_core::errors::CoreError;
use metals_tracker_core::models::asset::AssetType;
use metals_tracker_core::models::holding::NewHolding;
use metals_tracker_core::models::metal::Metal;
use metals_tracker_core::providers::registry::PriceProviderRegistry;
use metals_tracker_core::providers::traits::PriceProvider;
use metals_tracker_server::{app_router, build_state_with_registry, AppState, Config};

// ═══════════════════════════════════════════════════════════════════
// Mock Provider
// ═══════════════════════════════════════════════════════════════════

/// Gold at 12 USD/oz, silver at 0.5 USD/oz, USD → EUR at 1.0.
struct StaticQuotes {
    offline: bool,
}

#[async_trait]
impl PriceProvider for StaticQuotes {
    fn name(&self) -> &str {
        "Static quotes"
    }

    fn supported_asset_types(&self) -> Vec<AssetType> {
        vec![AssetType::Metal, AssetType::Fiat]
    }

    async fn get_current_price(&self, symbol: &str, currency: &str) -> Result<f64, CoreError> {
        if self.offline {
            return Err(CoreError::Network("offline".into()));
        }
        match (symbol, currency) {
            ("XAU", "USD") => Ok(12.0),
            ("XAG", "USD") => Ok(0.5),
            ("USD", "EUR") => Ok(1.0),
            _ => Err(CoreError::Api {
                provider: "Static quotes".into(),
                message: format!("no quote for {symbol}/{currency}"),
            }),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Harness
// ═══════════════════════════════════════════════════════════════════

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    _dir: TempDir,
}

fn spawn_app(offline: bool, dev_mode: bool) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("metals.db").to_string_lossy().into_owned();
    let config = Config::from_lookup(move |key| match key {
        "DATABASE_URL" => Some(db.clone()),
        "APP_ENV" if dev_mode => Some("development".into()),
        _ => None,
    })
    .unwrap();

    let registry = PriceProviderRegistry::new().with(Box::new(StaticQuotes { offline }));
    let state = build_state_with_registry(&config, registry).unwrap();
    let router = app_router(state.clone(), &config);

    TestApp {
        router,
        state,
        _dir: dir,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn location(headers: &HeaderMap) -> String {
    headers
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

async fn create_portfolio(app: &TestApp) -> Uuid {
    let (status, headers, _) = send(app, post_form("/p", "")).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let location = location(&headers);
    location.trim_start_matches("/p/").parse().unwrap()
}

fn add_holding(app: &TestApp, portfolio_id: Uuid, description: &str, quantity: f64, price: f64) -> Uuid {
    app.state
        .tracker
        .add_holding(
            portfolio_id,
            &NewHolding::new(description, Metal::Gold, quantity, price),
        )
        .unwrap()
        .id
}

// ═══════════════════════════════════════════════════════════════════
// Home & static
// ═══════════════════════════════════════════════════════════════════

mod home {
    use super::*;

    #[tokio::test]
    async fn home_page_renders() {
        let app = spawn_app(false, false);
        let (status, _, body) = send(&app, get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Precious Metals Tracker"));
        assert!(body.contains("Track your precious metal portfolio"));
        assert!(body.contains(r#"<form method="post" action="/p">"#));
    }

    #[tokio::test]
    async fn header_shows_current_prices() {
        let app = spawn_app(false, false);
        let (_, _, body) = send(&app, get("/")).await;

        assert!(body.contains("Gold: 12.00 €"));
        assert!(body.contains("Silver: 0.50 €"));
    }

    #[tokio::test]
    async fn home_page_survives_price_outage() {
        let app = spawn_app(true, false);
        let (status, _, body) = send(&app, get("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("Gold:"));
    }

    #[tokio::test]
    async fn dev_tools_only_in_development() {
        let app = spawn_app(false, false);
        let (_, _, body) = send(&app, get("/")).await;
        assert!(!body.contains("clear-portfolio-storage"));

        let app = spawn_app(false, true);
        let (_, _, body) = send(&app, get("/")).await;
        assert!(body.contains("clear-portfolio-storage"));
        assert!(body.contains("/static/js/dev-tools.js"));
    }

    #[tokio::test]
    async fn static_files_are_served() {
        let app = spawn_app(false, false);
        let (status, _, body) = send(&app, get("/static/js/portfolio.js")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("storePortfolioId"));
    }

    #[tokio::test]
    async fn unknown_route_renders_404_page() {
        let app = spawn_app(false, false);
        let (status, _, body) = send(&app, get("/does/not/exist")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Portfolios
// ═══════════════════════════════════════════════════════════════════

mod portfolios {
    use super::*;

    #[tokio::test]
    async fn create_redirects_to_new_portfolio() {
        let app = spawn_app(false, false);
        let id = create_portfolio(&app).await;

        assert!(app.state.tracker.get_portfolio(id).unwrap().is_some());
    }

    #[tokio::test]
    async fn create_accepts_trailing_slash() {
        let app = spawn_app(false, false);
        let (status, headers, _) = send(&app, post_form("/p/", "")).await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert!(location(&headers).starts_with("/p/"));
    }

    #[tokio::test]
    async fn each_create_is_a_new_portfolio() {
        let app = spawn_app(false, false);
        let first = create_portfolio(&app).await;
        let second = create_portfolio(&app).await;
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn empty_portfolio_page() {
        let app = spawn_app(false, false);
        let id = create_portfolio(&app).await;
        let (status, _, body) = send(&app, get(&format!("/p/{id}"))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Your portfolio"));
        assert!(body.contains("No holdings yet"));
        assert!(body.contains(&format!("storePortfolioId(\"{id}\")")));
    }

    #[tokio::test]
    async fn holdings_table_and_totals() {
        let app = spawn_app(false, false);
        let id = create_portfolio(&app).await;
        let holding_id = add_holding(&app, id, "Britannia", 2.0, 6.0);

        let (status, _, body) = send(&app, get(&format!("/p/{id}"))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("No holdings yet"));
        assert!(body.contains(&format!(
            r#"<td><a href="/p/{id}/holdings/{holding_id}/edit">Britannia</a></td>"#
        )));
        assert!(body.contains("<td>Gold</td>"));
        assert!(body.contains("<td>2.00</td>"));
        assert!(body.contains("<td>6.00 €</td>"));
        assert!(body.contains("<td>24.00 €</td>"));
        assert!(body.contains(r#"<td class="gain">+100.00%</td>"#));
        assert!(body.contains(r#"<td class="gain">+12.00 €</td>"#));
        assert!(body.contains(r#"<th colspan="4">Total</th>"#));
        assert!(body.contains("<th>24.00 €</th>"));
    }

    #[tokio::test]
    async fn loss_is_rendered_negative() {
        let app = spawn_app(false, false);
        let id = create_portfolio(&app).await;
        add_holding(&app, id, "Expensive bar", 1.0, 24.0);

        let (_, _, body) = send(&app, get(&format!("/p/{id}"))).await;

        assert!(body.contains(r#"<td class="loss">-50.00%</td>"#));
        assert!(body.contains(r#"<td class="loss">-12.00 €</td>"#));
    }

    #[tokio::test]
    async fn unknown_portfolio_is_404() {
        let app = spawn_app(false, false);
        let (status, _, body) = send(&app, get(&format!("/p/{}", Uuid::new_v4()))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));
    }

    #[tokio::test]
    async fn malformed_id_is_rejected() {
        let app = spawn_app(false, false);
        let (status, _, _) = send(&app, get("/p/not-a-uuid")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn price_outage_is_503() {
        let app = spawn_app(true, false);
        let portfolio = app.state.tracker.create_portfolio().unwrap();

        let (status, _, body) = send(&app, get(&format!("/p/{}", portfolio.id))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("Unable to fetch current metal prices"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Holdings
// ═══════════════════════════════════════════════════════════════════

mod holdings {
    use super::*;

    #[tokio::test]
    async fn new_holding_form() {
        let app = spawn_app(false, false);
        let id = create_portfolio(&app).await;
        let (status, _, body) = send(&app, get(&format!("/p/{id}/holdings/new"))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Add Holding"));
        assert!(body.contains(&format!(r#"action="/p/{id}/holdings""#)));
        assert!(body.contains(r#"<option value="Gold" selected>"#));
        assert!(!body.contains("Delete holding"));
    }

    #[tokio::test]
    async fn new_holding_form_for_unknown_portfolio_is_404() {
        let app = spawn_app(false, false);
        let uri = format!("/p/{}/holdings/new", Uuid::new_v4());
        let (status, _, _) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_holding_redirects_and_stores() {
        let app = spawn_app(false, false);
        let id = create_portfolio(&app).await;

        let (status, headers, _) = send(
            &app,
            post_form(
                &format!("/p/{id}/holdings"),
                "description=Maple+Leaf&metal=Silver&quantity=10&purchase_price=0.25",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location(&headers), format!("/p/{id}"));

        let portfolio = app.state.tracker.get_portfolio(id).unwrap().unwrap();
        assert_eq!(portfolio.holdings.len(), 1);
        let holding = &portfolio.holdings[0];
        assert_eq!(holding.description, "Maple Leaf");
        assert_eq!(holding.metal, Metal::Silver);
        assert_eq!(holding.quantity, 10.0);
        assert_eq!(holding.purchase_price, 0.25);
    }

    #[tokio::test]
    async fn invalid_holding_rerenders_form() {
        let app = spawn_app(false, false);
        let id = create_portfolio(&app).await;

        let (status, _, body) = send(
            &app,
            post_form(
                &format!("/p/{id}/holdings"),
                "description=Coin&metal=Silver&quantity=0&purchase_price=5",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Add Holding"));
        assert!(body.contains("Quantity must be a positive number"));
        assert!(body.contains(r#"value="Coin""#));
        assert!(body.contains(r#"<option value="Silver" selected>"#));
        assert!(app.state.tracker.get_portfolio(id).unwrap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_numeric_price_is_rejected() {
        let app = spawn_app(false, false);
        let id = create_portfolio(&app).await;

        let (status, _, body) = send(
            &app,
            post_form(
                &format!("/p/{id}/holdings"),
                "description=Coin&metal=Gold&quantity=1&purchase_price=cheap",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Purchase price must be a number"));
    }

    #[tokio::test]
    async fn create_holding_in_unknown_portfolio_is_404() {
        let app = spawn_app(false, false);
        let (status, _, _) = send(
            &app,
            post_form(
                &format!("/p/{}/holdings", Uuid::new_v4()),
                "description=Coin&metal=Gold&quantity=1&purchase_price=5",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn edit_form_is_prefilled() {
        let app = spawn_app(false, false);
        let id = create_portfolio(&app).await;
        let holding_id = add_holding(&app, id, "Britannia", 2.0, 6.5);

        let (status, _, body) =
            send(&app, get(&format!("/p/{id}/holdings/{holding_id}/edit"))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Edit Holding"));
        assert!(body.contains(r#"value="Britannia""#));
        assert!(body.contains(r#"value="2""#));
        assert!(body.contains(r#"value="6.5""#));
        assert!(body.contains(&format!(r#"action="/p/{id}/holdings/{holding_id}""#)));
        assert!(body.contains(&format!(r#"action="/p/{id}/holdings/{holding_id}/delete""#)));
    }

    #[tokio::test]
    async fn update_holding() {
        let app = spawn_app(false, false);
        let id = create_portfolio(&app).await;
        let holding_id = add_holding(&app, id, "Britannia", 2.0, 6.0);

        let (status, headers, _) = send(
            &app,
            post_form(
                &format!("/p/{id}/holdings/{holding_id}"),
                "description=Britannia+2024&metal=Gold&quantity=3&purchase_price=7",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location(&headers), format!("/p/{id}"));

        let holding = app
            .state
            .tracker
            .get_holding(id, holding_id)
            .unwrap()
            .unwrap();
        assert_eq!(holding.description, "Britannia 2024");
        assert_eq!(holding.quantity, 3.0);
        assert_eq!(holding.purchase_price, 7.0);
    }

    #[tokio::test]
    async fn invalid_update_keeps_holding() {
        let app = spawn_app(false, false);
        let id = create_portfolio(&app).await;
        let holding_id = add_holding(&app, id, "Britannia", 2.0, 6.0);

        let (status, _, body) = send(
            &app,
            post_form(
                &format!("/p/{id}/holdings/{holding_id}"),
                "description=&metal=Gold&quantity=3&purchase_price=7",
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Edit Holding"));
        assert!(body.contains("Description must not be empty"));

        let holding = app.state.tracker.get_holding(id, holding_id).unwrap().unwrap();
        assert_eq!(holding.description, "Britannia");
    }

    #[tokio::test]
    async fn delete_holding() {
        let app = spawn_app(false, false);
        let id = create_portfolio(&app).await;
        let holding_id = add_holding(&app, id, "Britannia", 2.0, 6.0);

        let (status, headers, _) = send(
            &app,
            post_form(&format!("/p/{id}/holdings/{holding_id}/delete"), ""),
        )
        .await;

        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location(&headers), format!("/p/{id}"));
        assert!(app.state.tracker.get_portfolio(id).unwrap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_holding_is_404() {
        let app = spawn_app(false, false);
        let id = create_portfolio(&app).await;
        let missing = Uuid::new_v4();

        let (status, _, _) = send(&app, get(&format!("/p/{id}/holdings/{missing}/edit"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = send(
            &app,
            post_form(
                &format!("/p/{id}/holdings/{missing}"),
                "description=Coin&metal=Gold&quantity=1&purchase_price=5",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = send(
            &app,
            post_form(&format!("/p/{id}/holdings/{missing}/delete"), ""),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn holding_is_scoped_to_its_portfolio() {
        let app = spawn_app(false, false);
        let owner = create_portfolio(&app).await;
        let other = create_portfolio(&app).await;
        let holding_id = add_holding(&app, owner, "Britannia", 1.0, 6.0);

        let (status, _, _) =
            send(&app, get(&format!("/p/{other}/holdings/{holding_id}/edit"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = send(
            &app,
            post_form(&format!("/p/{other}/holdings/{holding_id}/delete"), ""),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(app.state.tracker.get_holding(owner, holding_id).unwrap().is_some());
    }
}
