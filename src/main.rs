use std::time::Duration;

use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, info};

use monpad_dashboard::config::AppConfig;
use monpad_dashboard::routes;
use monpad_dashboard::runtime::lifetime;
use monpad_dashboard::utils::{json_error_handler, query_error_handler};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    setup_panic!();
    let start_datetime = chrono::Utc::now();

    AppConfig::init().map_err(|e| std::io::Error::other(e.to_string()))?;
    let config = AppConfig::get();

    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.app.log_level))
        .with_writer(non_blocking_writer)
        .event_format(tracing_subscriber::fmt::format().with_level(true).with_ansi(true));

    if config.is_development() {
        tracing_builder.with_file(true).with_line_number(true).init();
    } else {
        tracing_builder.json().init();
    }

    info!(
        "{} {} starting",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| std::io::Error::other(e.format_simple()))?;
    let transport = startup.transport.clone();
    let cache = startup.cache.clone();

    debug!(
        "Upstream client ready in {} ms",
        chrono::Utc::now()
            .signed_duration_since(start_datetime)
            .num_milliseconds()
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(config.cors.max_age),
            )
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(web::Data::new(transport.clone()))
            .app_data(web::Data::new(cache.clone()))
            .configure(routes::configure_auth_routes)
            .configure(routes::configure_matrix_routes)
            .configure(routes::configure_parameter_routes)
            .configure(routes::configure_finalization_routes)
            .configure(routes::configure_week_routes)
            .configure(routes::configure_group_routes)
            .configure(routes::configure_student_routes)
            .configure(routes::configure_resource_routes)
            // 前端静态资源必须最后注册
            .configure(routes::configure_frontend_routes)
    })
    .keep_alive(Duration::from_secs(config.server.timeouts.keep_alive))
    .client_request_timeout(Duration::from_millis(config.server.timeouts.client_request))
    .client_disconnect_timeout(Duration::from_millis(
        config.server.timeouts.client_disconnect,
    ))
    .workers(config.server.workers);

    #[cfg(unix)]
    let server = match config.unix_socket_path() {
        Some(socket_path) => {
            info!("Listening on unix socket {}", socket_path);
            if std::path::Path::new(socket_path).exists() {
                std::fs::remove_file(socket_path)?;
            }
            server.bind_uds(socket_path)?
        }
        None => {
            let bind_address = config.server_bind_address();
            info!("Listening on http://{}", bind_address);
            server.bind(bind_address)?
        }
    };

    #[cfg(not(unix))]
    let server = {
        let bind_address = config.server_bind_address();
        info!("Listening on http://{}", bind_address);
        server.bind(bind_address)?
    };

    tokio::select! {
        res = server.run() => res?,
        _ = lifetime::shutdown::listen_for_shutdown() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
