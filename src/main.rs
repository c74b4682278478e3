use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use staffhub_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware, routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let public_routes = Router::new()
        .route("/health", get(routes::health::health))
        .route("/login", post(routes::auth::login))
        .route("/signup", post(routes::auth::signup));

    let protected_routes = Router::new()
        .route("/profile/:id", get(routes::profile::get_profile))
        .route(
            "/upload-profile-image",
            post(routes::profile::upload_profile_image),
        )
        .layer(axum::middleware::from_fn(
            middleware::auth::require_bearer_auth,
        ));

    // Body limit sits above the upload cap so oversize files surface as the
    // domain error rather than a framework rejection.
    let app = public_routes
        .merge(protected_routes)
        .with_state(app_state)
        .layer(middleware::cors::permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes + 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
