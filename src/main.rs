use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use tracing::info;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

use vacation::config::{Config, StoreBackend};
use vacation::db::{ensure_schema, init_db};
use vacation::docs::ApiDoc;
use vacation::routes;
use vacation::service::vacation::VacationService;
use vacation::store::{InMemoryVacationStore, MySqlVacationStore, VacationStore};
use vacation::telemetry;

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn VacationStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory vacation store");
            Ok(Arc::new(InMemoryVacationStore::new()))
        }
        StoreBackend::MySql => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = init_db(database_url)
                .await
                .context("Failed to connect to database")?;
            ensure_schema(&pool)
                .await
                .context("Failed to prepare vacations table")?;
            Ok(Arc::new(MySqlVacationStore::new(pool)))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let _guard = telemetry::init(&config)?;

    info!("Server starting...");

    let store = build_store(&config).await?;
    let service = Data::new(VacationService::new(store));
    let limiter = routes::limiter(&config)?;
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(service.clone())
            .configure(|cfg| routes::configure(cfg, limiter.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
