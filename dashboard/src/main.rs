use std::{io, process::ExitCode, sync::OnceLock};

use dashboard::{screen, Args, AsError as _, Config, Context, Service};
use service::infra::{api::Rest, storage::File};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::INFO)
                                >= *meta.level()
                })),
        )
        .init();

    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

async fn start() -> Result<(), u8> {
    let Args { config, command } = Args::parse().map_err(|e| {
        _ = e.print();
        u8::try_from(e.exit_code()).unwrap_or(2)
    })?;

    let config = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
        1
    })?;

    LOG_LEVEL
        .set(config.log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let notify = |e: dashboard::Error| {
        log::error!("{e}");
        if let Some(trace) = &e.backtrace {
            log::debug!("{trace}");
        }
        e.exit_code()
    };

    let service_config =
        service::Config::try_from(config.metrics).map_err(notify)?;
    let api = Rest::new(config.rest())
        .map_err(|e| notify(e.as_error()))?;
    let storage = File::new(config.storage.path.clone());
    let ctx = Context::new(Service::new(service_config, api, storage));

    let out = screen::run(&ctx, command).await.map_err(notify)?;
    print!("{out}");

    Ok(())
}
