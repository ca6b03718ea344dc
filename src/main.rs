use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Compress, web, App, HttpServer};
use anyhow::Context;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi; // bring trait into scope for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

use ideas_explorer::settings::AppConfig;
use ideas_explorer::openapi::ApiDoc;
use ideas_explorer::repo::IdeaRepo;
use ideas_explorer::{config, AppState};

#[cfg(not(any(feature = "inmem-store", feature = "postgres-store")))]
compile_error!("enable the `inmem-store` or `postgres-store` feature");

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // .env is only picked up in debug builds; production sets the environment itself
    if cfg!(debug_assertions) {
        let _ = dotenv::dotenv();
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    info!("Bootstrapping ideas explorer");
    let cfg = AppConfig::from_env();
    info!("Frontend URL: {}", cfg.frontend_url.as_deref().unwrap_or("(none)"));

    let repo = build_repo(&cfg)?;
    let openapi = ApiDoc::openapi();
    let frontend_url = cfg.frontend_url.clone();

    let server = HttpServer::new(move || {
        let cors = {
            let mut c = Cors::default()
                // local dev servers for the dashboard
                .allowed_origin("http://localhost:5173")
                .allowed_origin("http://127.0.0.1:5173")
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allow_any_header()
                .allowed_methods(["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                .max_age(3600);
            if let Some(front) = &frontend_url {
                c = c.allowed_origin(front);
            }
            c
        };

        App::new()
            .wrap(TracingLogger::default())
            .wrap(Compress::default())
            .wrap(cors)
            .app_data(web::Data::new(AppState { repo: repo.clone() }))
            .configure(config)
            .service(SwaggerUi::new("/docs/{_:.*}").url("/docs/openapi.json", openapi.clone()))
    })
    .bind((cfg.bind_addr.as_str(), cfg.port))
    .with_context(|| format!("cannot bind {}:{}", cfg.bind_addr, cfg.port))?;

    info!("Listening on http://{}:{}", cfg.bind_addr, cfg.port);
    server.run().await?;
    Ok(())
}

#[cfg(feature = "postgres-store")]
fn build_repo(cfg: &AppConfig) -> anyhow::Result<Arc<dyn IdeaRepo>> {
    use ideas_explorer::repo::pg::PgRepo;
    use sqlx::postgres::PgPoolOptions;

    let db_url = cfg.database_url.as_deref().context("DATABASE_URL must be set for postgres-store")?;
    let pool = PgPoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .connect_lazy(db_url)
        .context("invalid DATABASE_URL")?;
    info!("Using Postgres repository backend");
    Ok(Arc::new(PgRepo::new(pool)))
}

#[cfg(all(feature = "inmem-store", not(feature = "postgres-store")))]
fn build_repo(cfg: &AppConfig) -> anyhow::Result<Arc<dyn IdeaRepo>> {
    use ideas_explorer::repo::inmem::InMemRepo;

    info!(data_dir = %cfg.data_dir.display(), "Using in-memory repository backend");
    let repo = InMemRepo::in_dir(&cfg.data_dir)
        .with_context(|| format!("cannot open idea snapshot in {}", cfg.data_dir.display()))?;
    Ok(Arc::new(repo))
}
