use std::sync::atomic::{AtomicU32, Ordering};

use clap::Parser;
use music_forum::{in_memory, mongo, router, Config, PasswordService};
use tracing_subscriber::EnvFilter;

async fn async_main(config: Config) -> anyhow::Result<()> {
    let tokens = config.token_service();
    let passwords = PasswordService::default();

    let state = match &config.mongodb_uri {
        Some(uri) => {
            tracing::info!(database = %config.database, "using mongodb store");
            mongo(uri, &config.database, tokens, passwords).await?
        },
        None => {
            tracing::warn!("no MONGODB_URI given, data lives in memory only");
            in_memory(tokens, passwords)
        },
    };

    let state = state.with_internal_errors(config.expose_internal_errors());

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %config.bind, environment = ?config.environment, "listening");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("music_forum=debug,tower_http=debug")),
        )
        .init();

    let config = Config::parse();

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name_fn(|| {
            let num = NUM.fetch_add(1, Ordering::Relaxed);
            format!("music-forum-worker-{}", num)
        })
        .build()
    {
        Ok(r) => r,
        Err(e) => return eprintln!("cannot build runtime: {}", e),
    };

    if let Err(e) = rt.block_on(async_main(config)) {
        tracing::error!("server stopped: {:#}", e);
        std::process::exit(1);
    }
}

static NUM: AtomicU32 = AtomicU32::new(0);
