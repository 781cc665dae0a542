mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{AppConfig, Config};
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::auth::{routes as auth_routes, AuthService, TokenService};
use crate::features::identification::{
    routes as identification_routes, IdentificationService, PlantNetClient,
};
use crate::features::images::models::ImageSchema;
use crate::features::images::{routes as images_routes, ImageService};
use crate::features::subscribers::{routes as subscribers_routes, SubscriberService};
use crate::features::system::{routes as system_routes, SystemService};
use crate::modules::supabase::{ObjectStore, PostgrestClient, SupabaseStorageClient, TableStore};
use axum::{middleware::from_fn_with_state, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

struct AppServices {
    images: Arc<ImageService>,
    subscribers: Arc<SubscriberService>,
    auth: Arc<AuthService>,
    identification: Arc<IdentificationService>,
    system: Arc<SystemService>,
}

/// Every API route. Moderation and subscriber administration sit behind the
/// bearer-token middleware when `admin_auth_required` is set.
fn api_router(services: AppServices, app: &AppConfig) -> Router {
    let admin_routes = Router::new()
        .merge(images_routes::admin_routes(Arc::clone(&services.images)))
        .merge(subscribers_routes::admin_routes(Arc::clone(
            &services.subscribers,
        )));

    let admin_routes = if app.admin_auth_required {
        tracing::info!("Admin routes require a bearer token");
        admin_routes.route_layer(from_fn_with_state(
            Arc::clone(&services.auth),
            middleware::auth_middleware,
        ))
    } else {
        tracing::warn!("Admin routes are open (ADMIN_AUTH_REQUIRED=false)");
        admin_routes
    };

    let public_routes = Router::new()
        .merge(system_routes::routes(services.system))
        .merge(identification_routes::routes(
            services.identification,
            app.max_request_body_size,
        ))
        .merge(images_routes::public_routes(
            services.images,
            app.max_request_body_size,
        ))
        .merge(subscribers_routes::public_routes(services.subscribers))
        .merge(auth_routes::routes(services.auth));

    Router::new().merge(admin_routes).merge(public_routes)
}

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Supabase clients
    let table_store: Arc<dyn TableStore> = Arc::new(
        PostgrestClient::new(&config.supabase)
            .map_err(|e| anyhow::anyhow!("Failed to create PostgREST client: {}", e))?,
    );
    let storage_client = SupabaseStorageClient::new(&config.supabase)
        .map_err(|e| anyhow::anyhow!("Failed to create Storage client: {}", e))?;
    tracing::info!(
        "Supabase clients initialized for bucket: {}",
        storage_client.bucket_name()
    );
    let object_store: Arc<dyn ObjectStore> = Arc::new(storage_client);

    let store_connected = SystemService::probe(&table_store).await;
    if store_connected {
        tracing::info!("Supabase reachable");
    } else {
        tracing::warn!("Supabase probe failed, starting anyway");
    }

    let image_schema = ImageSchema::from_version(config.supabase.images_schema_version);
    tracing::info!("Image table schema handling: {:?}", image_schema);

    // Services
    let image_service = Arc::new(ImageService::new(
        Arc::clone(&table_store),
        Arc::clone(&object_store),
        image_schema,
    ));
    let subscriber_service = Arc::new(SubscriberService::new(Arc::clone(&table_store)));
    let token_service = Arc::new(TokenService::new(&config.auth));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&table_store),
        Arc::clone(&token_service),
    ));
    let identification_service = Arc::new(IdentificationService::new(
        PlantNetClient::new(&config.plant_id)
            .map_err(|e| anyhow::anyhow!("Failed to create PlantNet client: {}", e))?,
    ));
    let system_service = Arc::new(SystemService::new(
        config.frontend.clone(),
        store_connected,
    ));
    tracing::info!("Services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn_with_state(
                Arc::new(credentials),
                middleware::swagger_basic_auth,
            ))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    let app = Router::new()
        .merge(swagger)
        .merge(api_router(
            AppServices {
                images: image_service,
                subscribers: subscriber_service,
                auth: auth_service,
                identification: identification_service,
                system: system_service,
            },
            &config.app,
        ))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
