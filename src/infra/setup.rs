use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::waitlist::{WaitlistRepoTrait, WaitlistUseCases},
    infra::{config::AppConfig, error::InfraError, migrations, postgres_persistence},
};
use secrecy::ExposeSecret;
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state(config: AppConfig) -> Result<AppState, InfraError> {
    let postgres_arc = Arc::new(
        postgres_persistence(
            config.database_url.expose_secret(),
            config.database_max_connections,
        )
        .await?,
    );

    if config.run_migrations {
        migrations::run(postgres_arc.pool()).await?;
    }

    let waitlist_use_cases =
        WaitlistUseCases::new(postgres_arc.clone() as Arc<dyn WaitlistRepoTrait>);

    Ok(AppState {
        config: Arc::new(config),
        waitlist_use_cases: Arc::new(waitlist_use_cases),
    })
}

pub fn init_tracing(config: &AppConfig) -> Result<(), InfraError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "waitlist_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don't show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs), only when LOG_FILE is set
    let json_layer = match &config.log_file {
        Some(path) => {
            let file = File::create(path).map_err(InfraError::LogFile)?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Arc::new(file))
                    .with_current_span(true)
                    .with_span_list(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
