use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use taskmate::config::Config;
use taskmate::routes::{self, health};
use taskmate::{db, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let pool = db::create_pool(&config).await.map_err(|e| {
        log::error!("DB connection error: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;
    db::bootstrap(&pool).await.map_err(|e| {
        log::error!("Schema bootstrap failed: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e)
    })?;

    let state = web::Data::new(AppState::postgres(pool, &config));

    log::info!("Starting TaskMate server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
