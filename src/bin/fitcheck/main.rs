use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use env_logger::Env;
use fitcheck::app_config::AppConfig;
use fitcheck::db::{Gateway, MongoConnector};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_lib_mods();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    });

    let gateway = Data::new(Gateway::new(MongoConnector::new(
        config.database.uri(),
        config.database.name.clone(),
    )));

    // Connect eagerly so misconfiguration shows up in the startup log. The
    // server still starts; requests retry the connection.
    if gateway.get_handle().await.is_none() {
        log::warn!("Starting without a database connection");
    }

    let bind = (config.server.host.clone(), config.server.port);
    log::info!("Listening on {}:{}", bind.0, bind.1);
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(gateway.clone())
            .app_data(config.clone())
            .wrap(Logger::new("%a %r %s %Dms"))
            .configure(fitcheck::web::configure)
    })
    .bind(bind)?
    .run()
    .await
}

/// Initialize third party crates we rely on but don't have control over.
pub fn init_lib_mods() {
    // .env is loaded first so RUST_LOG may come from it.
    let dotenv = dotenv::dotenv();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(e) = dotenv {
        log::debug!("No .env file loaded: {}", e);
    }
}
