use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;

use backend::config::Config;
use backend::services;
use backend::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();
    let state = AppState::from_config(&config);

    if let Err(e) = state.db.init() {
        log::error!("failed to initialize database: {e}");
        return Err(std::io::Error::other(e.to_string()));
    }
    std::fs::create_dir_all(&state.upload_dir)?;

    info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(web::Data::new(state.clone()))
            .service(services::onboarding::configure_routes())
            .service(services::projects::configure_routes())
            .service(services::client_dashboard::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
