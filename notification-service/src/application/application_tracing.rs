use super::ApplicationEnv;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Dependencies logging every frame or query at debug level
const NOISY_TARGETS: [&str; 4] = ["h2=info", "hyper=info", "tower=info", "sqlx=warn"];

///
/// Console output is filtered by `RUST_LOG` and defaults to DEBUG.
/// Log file is rotated every hour and always stores INFO and above.
///
pub fn setup_tracing(env: &ApplicationEnv) -> anyhow::Result<()> {
    let mut console_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env()?;
    for directive in NOISY_TARGETS {
        console_filter = console_filter.add_directive(directive.parse()?);
    }

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(console_filter);

    let file_appender = tracing_appender::rolling::hourly(&env.log_directory, &env.log_filename);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_filter(LevelFilter::INFO);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(())
}
