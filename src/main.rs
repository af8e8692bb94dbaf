use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use taskvault::auth::{AccountService, IdentityResolver, TokenCodec};
use taskvault::config::Config;
use taskvault::routes;
use taskvault::store::postgres::PgUserStore;
use taskvault::store::UserStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    // Missing required configuration is fatal here, before anything binds.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    // The auth core is constructed once and shared read-only by all workers:
    // the signing keys never change after startup, and the store handle is
    // injected rather than reached for globally.
    let store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool.clone()));
    let codec = TokenCodec::new(&config.jwt_secret);
    let account_service = web::Data::new(AccountService::new(
        store.clone(),
        codec.clone(),
        config.token_ttl,
        config.bcrypt_cost,
    ));
    let identity_resolver = web::Data::new(IdentityResolver::new(store, codec));

    log::info!("starting taskvault at {}", config.server_url());
    let bind_addr = (config.server_host.clone(), config.server_port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(account_service.clone())
            .app_data(identity_resolver.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .bind(bind_addr)?
    .run()
    .await
}
