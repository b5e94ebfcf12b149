pub mod commands;
pub mod config;
pub mod debounce;
pub mod handlers;
pub mod server;
pub mod trace;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

use config::AppConfig;
use debounce::{DebounceStore, JoinRequestDebouncer, StoreSweeper};
use handlers::get_update_handler;
use std::{net::SocketAddr, sync::Arc};
use teloxide::{
    dispatching::Dispatcher,
    error_handlers::LoggingErrorHandler,
    types::{Update, UserId},
    update_listeners::webhooks,
    {dptree, prelude::*},
};
use tokio::{signal, sync::oneshot};
use trace::init_tracing;
use tracing::{error, info};

async fn shutdown_signal() {
    let ctrl = signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut term_stream =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(err) => {
                    error!("Failed to register SIGTERM handler: {}", err);
                    if let Err(e) = ctrl.await {
                        error!("Failed to listen for ctrl_c: {}", e);
                    }
                    return;
                }
            };

        tokio::select! {
            _ = ctrl => {},
            _ = term_stream.recv() => {},
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = ctrl.await {
            error!("Failed to listen for ctrl_c: {}", e);
        }
    }
}

// Join requests from one user are handled in order; different users run in parallel.
fn requester_key(update: &Update) -> Option<UserId> {
    update.from().map(|user| user.id)
}

pub async fn run() -> Result<(), BoxError> {
    init_tracing();

    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Err(Box::new(e) as BoxError);
        }
    };

    info!(
        "Starting bot (hosting = {}, debounce = {}s, greeting = {})",
        cfg.hosting,
        cfg.debounce_window.as_secs(),
        cfg.greeting_enabled
    );

    let bot = Bot::new(cfg.token.clone());

    let store = Arc::new(DebounceStore::new(cfg.debounce_window));
    let mut sweeper = StoreSweeper::spawn(Arc::clone(&store), cfg.debounce_window);
    let debouncer = Arc::new(JoinRequestDebouncer::new(
        bot.clone(),
        store,
        cfg.greeting(),
    ));

    let handler = get_update_handler();
    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![cfg.clone(), debouncer])
        .distribution_function(requester_key)
        .enable_ctrlc_handler()
        .build();

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));

    if !cfg.hosting {
        info!("Running in polling mode (local development).");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, server::build_router(None)).with_graceful_shutdown(
            async {
                let _ = stop_rx.await;
            },
        );
        let server_handle = tokio::spawn(async move {
            if let Err(e) = server.await {
                error!("Axum server error: {}", e);
            }
        });
        info!("Health endpoint listening on {}", addr);

        info!("Bot started");
        dispatcher.dispatch().await;
        info!("Dispatcher exited (polling mode).");

        let _ = stop_tx.send(());
        if let Err(e) = server_handle.await {
            error!("Server task join error: {}", e);
        }
        sweeper.shutdown().await;
        info!("Bot shutdown complete.");
        return Ok(());
    }

    // HOSTING == true path
    let webhook_url = match cfg.webhook_url.clone() {
        Some(url) => url,
        None => {
            error!("HOSTING=true but WEBHOOK_URL not provided");
            return Err(Box::new(config::ConfigError::MissingEnv("WEBHOOK_URL")) as BoxError);
        }
    };

    info!("Configuring webhook for URL: {}", webhook_url);

    let options = webhooks::Options::new(addr, webhook_url.clone());
    let (update_listener, stop_future, webhook_router) =
        match webhooks::axum_to_router(bot.clone(), options).await {
            Ok(v) => v,
            Err(e) => {
                error!("Failed to configure webhook: {}", e);
                return Err(Box::new(e) as BoxError);
            }
        };

    info!("Webhook configured");
    info!("Bot started");

    let app = server::build_router(Some(webhook_router));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app);

    let server_with_shutdown = server.with_graceful_shutdown(async {
        tokio::select! {
            _ = shutdown_signal() => {
                info!("Shutdown signal received (SIGINT/SIGTERM). Stopping listener & server.");
            }
            _ = stop_future => {
                info!("Listener stop_future resolved.");
            }
        }
    });

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server_with_shutdown.await {
            error!("Axum server error: {}", e);
        }
    });

    dispatcher
        .dispatch_with_listener(update_listener, LoggingErrorHandler::new())
        .await;

    if let Err(e) = server_handle.await {
        error!("Server task join error: {}", e);
    }

    sweeper.shutdown().await;
    info!("Bot shutdown complete.");
    Ok(())
}
