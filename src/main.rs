use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use profixer_backend::auth::jwt::TokenValidator;
use profixer_backend::cache::RedisCache;
use profixer_backend::config::AppConfig;
use profixer_backend::create_pool;
use profixer_backend::handlers;
use profixer_backend::payments::StripeClient;
use profixer_backend::realtime::RealtimeHub;
use profixer_backend::storage::StorageClient;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {e}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to database: {e}")))?;
    tracing::info!("Connected to Postgres");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .map_err(|e| std::io::Error::other(format!("Migrations failed: {e}")))?;
        tracing::info!("Migrations applied");
    }

    let redis_cache = RedisCache::new(&config.redis_url)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to Redis: {e}")))?;
    tracing::info!("Connected to Redis");

    let token_validator = TokenValidator::from_config(&config.supabase);
    if matches!(token_validator, TokenValidator::SharedSecret(_)) {
        tracing::info!("Validating access tokens with the shared HS256 secret");
    }

    let db_data = web::Data::new(db);
    let redis_data = web::Data::new(Arc::new(redis_cache));
    let validator_data = web::Data::new(token_validator);
    let hub_data = web::Data::new(RealtimeHub::new());
    let stripe_data = web::Data::new(StripeClient::new(&config.stripe));
    let storage_data = web::Data::new(StorageClient::new(&config.supabase));

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let frontend_url = config.frontend_url.clone();
    let config_data = web::Data::new(config);
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(redis_data.clone())
            .app_data(validator_data.clone())
            .app_data(hub_data.clone())
            .app_data(stripe_data.clone())
            .app_data(storage_data.clone())
            .app_data(config_data.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
