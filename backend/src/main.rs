//! Users API entry-point: loads settings, connects to MySQL, wires the
//! application logger, and serves the REST endpoints with Swagger docs.

mod server;

use std::ffi::OsString;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use ortho_config::OrthoConfig;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use users_api::domain::LogMetadata;
use users_api::domain::ports::{AppLogger, AppLoggerExt, UserPersistenceError, UserRepository};
use users_api::inbound::http::routes::SWAGGER_PATH;
use users_api::inbound::http::state::HttpState;
use users_api::outbound::logging::{
    ConsoleSink, FanOutLogger, LogShippingError, LogtailConfig, LogtailSink,
};
use users_api::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig, PoolError};
use users_api::settings::{LogShippingSettings, SettingsError, StoreSettings};

use server::{ServerConfig, create_server};

const PROGRAM: &str = "users-api";
const LISTEN_PORT: u16 = 3000;
const SHIPPING_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Failures that abort startup.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("failed to load {section} settings: {message}")]
    LoadSettings {
        section: &'static str,
        message: String,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    LogShipping(#[from] LogShippingError),
    #[error("failed to connect to MySQL: {0}")]
    Connect(#[from] PoolError),
    #[error("failed to prepare users table: {0}")]
    Schema(#[from] UserPersistenceError),
    #[error("HTTP server failed: {0}")]
    Server(#[from] std::io::Error),
}

fn error_metadata(error: &dyn std::fmt::Display) -> LogMetadata {
    let mut metadata = LogMetadata::new();
    metadata.insert("error".to_owned(), error.to_string().into());
    metadata
}

fn build_logger(
    settings: &LogShippingSettings,
) -> Result<(FanOutLogger, Option<JoinHandle<()>>), StartupError> {
    let logger = FanOutLogger::new().with_sink(Arc::new(ConsoleSink::stdout()));
    let Some(token) = settings.token() else {
        warn!("LOGTAIL_TOKEN not set; remote log shipping disabled");
        return Ok((logger, None));
    };
    let config = LogtailConfig::new(settings.endpoint()?, token);
    info!(endpoint = %config.endpoint(), "shipping application logs to Logtail");
    let (sink, worker) = LogtailSink::spawn(config)?;
    Ok((logger.with_sink(Arc::new(sink)), Some(worker)))
}

async fn connect_store(
    settings: &StoreSettings,
    logger: &dyn AppLogger,
) -> Result<DieselUserRepository, StartupError> {
    let url = settings.database_url()?;
    let pool = match DbPool::new(PoolConfig::new(url.as_str())).await {
        Ok(pool) => pool,
        Err(error) => {
            logger.error("failed to connect to MySQL", error_metadata(&error));
            return Err(error.into());
        }
    };
    logger.info("connected to MySQL", LogMetadata::new());

    let repository = DieselUserRepository::new(pool);
    if let Err(error) = repository.ensure_schema().await {
        logger.error("failed to create users table", error_metadata(&error));
        return Err(error.into());
    }
    Ok(repository)
}

async fn serve(
    users: Arc<dyn UserRepository>,
    logger: Arc<dyn AppLogger>,
) -> Result<(), StartupError> {
    let bind_addr = SocketAddr::from(([0, 0, 0, 0], LISTEN_PORT));
    let state = HttpState::new(users).with_logger(logger.clone());
    let server = create_server(ServerConfig::new(bind_addr, state))?;

    logger.info(
        &format!("server running at http://localhost:{LISTEN_PORT}"),
        LogMetadata::new(),
    );
    logger.info(
        &format!("swagger at http://localhost:{LISTEN_PORT}{SWAGGER_PATH}"),
        LogMetadata::new(),
    );

    server.await?;
    Ok(())
}

async fn flush_log_shipping(worker: Option<JoinHandle<()>>) {
    let Some(worker) = worker else {
        return;
    };
    match tokio::time::timeout(SHIPPING_FLUSH_TIMEOUT, worker).await {
        Ok(Ok(())) => info!("log shipping drained"),
        Ok(Err(error)) => warn!(%error, "log shipping task failed"),
        Err(_) => warn!("log shipping did not drain before shutdown"),
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    let dotenv = dotenvy::dotenv();
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    if let Err(error) = dotenv {
        if !error.not_found() {
            warn!(%error, "failed to read .env file");
        }
    }

    let store_settings = StoreSettings::load_from_iter([OsString::from(PROGRAM)]).map_err(|e| {
        StartupError::LoadSettings {
            section: "MySQL",
            message: e.to_string(),
        }
    })?;
    let shipping_settings = LogShippingSettings::load_from_iter([OsString::from(PROGRAM)])
        .map_err(|e| StartupError::LoadSettings {
            section: "Logtail",
            message: e.to_string(),
        })?;
    info!(settings = ?store_settings, "store settings loaded");

    let (logger, shipping_worker) = build_logger(&shipping_settings)?;
    let logger: Arc<dyn AppLogger> = Arc::new(logger);

    let result = match connect_store(&store_settings, logger.as_ref()).await {
        Ok(repository) => serve(Arc::new(repository), logger.clone()).await,
        Err(error) => Err(error),
    };

    drop(logger);
    flush_log_shipping(shipping_worker).await;
    result
}
