use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use earnhub_backend::api;
use earnhub_backend::config::CONFIG;
use earnhub_backend::store::Store;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let store = Arc::new(Store::new(CONFIG.store.clone()));
    if let (Some(username), Some(hash)) = (&CONFIG.admin_username, &CONFIG.admin_password_hash) {
        store
            .seed_admin(username, hash)
            .await
            .expect("admin seed failed");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(api::auth::routes())
        .merge(api::tasks::routes())
        .merge(api::user::routes())
        .merge(api::referral::routes())
        .merge(api::withdraw::routes())
        .merge(api::admin::routes())
        .layer(cors)
        .with_state(store);

    let listener = TcpListener::bind(&CONFIG.bind_addr)
        .await
        .expect("bind failed");
    info!("server running at http://{}", CONFIG.bind_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
