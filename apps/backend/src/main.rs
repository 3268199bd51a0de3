use actix_web::{web, App, HttpServer};
use backend::config::app::AppConfig;
use backend::infra::state::build_state;
use backend::middleware::request_trace::RequestTrace;
use backend::routes;
use backend::state::security_config::SecurityConfig;
use backend::telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "🚀 Starting Werewolf Backend on http://{}:{}",
        config.host, config.port
    );

    let app_state = match build_state()
        .with_database_url(config.database_url.clone())
        .with_security(SecurityConfig::new(config.jwt_secret.as_bytes()))
        .with_night_timeout(config.night_timeout)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    if app_state.db().is_some() {
        println!("✅ Database connected");
    } else {
        println!("ℹ️  No DATABASE_URL set, rooms are kept in memory");
    }

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
