//! HTTP API routes
//!
//! Three route groups share one `AppState`:
//! - public: catalog browsing, auth, the snapshot-backed UI config, SSE
//! - user: cart, checkout, and payment confirmation (any valid JWT)
//! - admin: catalog/content/language management (JWT with `admin` role)

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod events;
pub mod health;
pub mod orders;
pub mod payments;
pub mod stripe_webhook;
pub mod ui_sections;

pub mod admin;

use axum::routing::{delete, get, patch, post, put};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{admin_auth_middleware, user_auth_middleware};
use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/admin/login", post(auth::admin_login))
        .route("/api/products", get(catalog::list_products))
        .route("/api/products/{id}", get(catalog::get_product))
        .route("/api/categories", get(catalog::list_categories))
        .route("/api/ui-sections", get(ui_sections::get_ui_sections))
        .route("/api/languages", get(ui_sections::list_active_languages))
        .route("/api/events", get(events::subscribe));

    // Stripe webhook needs the raw body for signature verification
    let webhook = Router::new().route("/api/stripe/webhook", post(stripe_webhook::handle_webhook));

    let user = Router::new()
        .route("/api/cart", get(cart::list).delete(cart::clear))
        .route("/api/cart/items", post(cart::add_item))
        .route(
            "/api/cart/items/{id}",
            patch(cart::set_quantity).delete(cart::remove_item),
        )
        .route("/api/orders", post(orders::create).get(orders::list_mine))
        .route("/api/orders/{id}", get(orders::get_mine))
        .route("/api/payments/confirm", post(payments::toss_confirm))
        .route("/api/payments/stripe/intent", post(payments::stripe_intent))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            user_auth_middleware,
        ));

    // Snapshot cache controls live outside /api/admin but are admin-guarded
    let cache_admin = Router::new()
        .route(
            "/api/cache/ui-sections",
            get(admin::cache::status)
                .post(admin::cache::regenerate)
                .delete(admin::cache::clear),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    let admin_routes = Router::new()
        .route(
            "/products",
            get(admin::catalog::list_products).post(admin::catalog::create_product),
        )
        .route(
            "/products/{id}",
            put(admin::catalog::update_product).delete(admin::catalog::delete_product),
        )
        .route(
            "/categories",
            get(admin::catalog::list_categories).post(admin::catalog::create_category),
        )
        .route(
            "/categories/{id}",
            put(admin::catalog::update_category).delete(admin::catalog::delete_category),
        )
        .route("/orders", get(admin::orders::list))
        .route("/orders/{id}", get(admin::orders::get))
        .route("/orders/{id}/status", patch(admin::orders::update_status))
        .route("/orders/{id}/payments", get(admin::orders::list_payments))
        .route("/payments/{id}/cancel", post(admin::orders::cancel_payment))
        .route(
            "/ui-sections",
            get(admin::ui_sections::list).post(admin::ui_sections::create),
        )
        .route("/ui-sections/order", put(admin::ui_sections::reorder))
        .route(
            "/ui-sections/{id}",
            put(admin::ui_sections::update).delete(admin::ui_sections::remove),
        )
        .route(
            "/ui-sections/{id}/visibility",
            patch(admin::ui_sections::set_visibility),
        )
        .route(
            "/languages",
            get(admin::languages::list).post(admin::languages::add),
        )
        .route("/languages/switch", post(admin::languages::switch))
        .route("/languages/{code}", delete(admin::languages::remove))
        .route(
            "/language-packs",
            get(admin::languages::list_pack_entries).post(admin::languages::upsert_pack_entry),
        )
        .route(
            "/language-packs/{id}",
            delete(admin::languages::delete_pack_entry),
        )
        .route("/events/recent", get(admin::cache::recent_events))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(webhook)
        .merge(user)
        .merge(cache_admin)
        .nest("/api/admin", admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
