use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use sales_tracker::config::ServerConfig;
use sales_tracker::db::{establish_connection_pool, run_migrations};
use sales_tracker::forecast::ForecastClient;
use sales_tracker::repository::DieselRepository;
use sales_tracker::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url, server_config.pool) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool, server_config.reset_database) {
        log::error!("{e}");
        std::process::exit(1);
    }
    let repo = DieselRepository::new(pool);

    let forecast_client = match ForecastClient::new(
        server_config.forecast_service_url.as_str(),
        server_config.forecast_timeout,
    ) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build forecast client: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "Serving on {}:{} (database {}, forecast service {}, {} price policy)",
        server_config.address,
        server_config.port,
        server_config.database_url,
        forecast_client.base_url(),
        server_config.price_policy
    );

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(forecast_client.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
