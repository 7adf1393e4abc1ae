use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, error::InternalError, web};
use anyhow::Context;
use tracing::info;

use dernek_portal::{config::AppConfig, database, routes, utils::helpers::ApiError};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().context("failed to read configuration")?;

    let pool = database::connection::establish(&config.database_url)
        .await
        .context("failed to connect to database")?;
    database::connection::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;
    database::seed::ensure_admin_user(&pool)
        .await
        .context("failed to seed admin user")?;

    info!("Starting server on {}:{}", config.host, config.port);

    let bind_addr = (config.host.clone(), config.port);
    let cors_origin = config.cors_origin.clone();

    HttpServer::new(move || {
        let cors = match cors_origin.as_deref() {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .supports_credentials(),
            None => Cors::permissive(),
        };

        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            InternalError::from_response(
                err,
                HttpResponse::BadRequest()
                    .json(ApiError::with_message("INVALID_JSON", "Geçersiz istek formatı")),
            )
            .into()
        });

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(json_config)
            .wrap(cors)
            .service(web::scope("/api").configure(routes::api::scoped_config))
    })
    .bind(bind_addr)?
    .run()
    .await?;

    info!("Server shutdown");
    Ok(())
}
