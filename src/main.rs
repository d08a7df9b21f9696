use hook_relay::application::context::AppContext;
use hook_relay::application::usecases::worker_loop::WorkerLoop;
use hook_relay::config;
use hook_relay::domain::workflows::routing::RoutingTable;
use hook_relay::infrastructure::db::postgres::PostgresDatabase;
use hook_relay::infrastructure::db::repositories::Repositories;
use hook_relay::infrastructure::transport::ReqwestTransport;
use hook_relay::interface::http;
use hook_relay::interface::http::state::AppState;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Step 1: Load configuration and initialize logging.
    let settings = config::load().expect("load config");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.observability.log_filter.clone())),
        )
        .init();

    // Step 2: Install the Prometheus recorder when metrics are enabled.
    let metrics_handle = if settings.observability.enable_metrics {
        Some(
            PrometheusBuilder::new()
                .install_recorder()
                .expect("install metrics recorder"),
        )
    } else {
        None
    };

    // Step 3: Connect to the database and build repositories.
    let db = Arc::new(
        PostgresDatabase::connect(&settings.db.url)
            .await
            .expect("connect database"),
    );
    db.migrate().await.expect("run migrations");
    let repos = Repositories::postgres(db);

    // Step 4: Assemble the shared application context.
    let routing = RoutingTable::from_settings(&settings);
    let transport = Arc::new(ReqwestTransport::new().expect("build http transport"));
    let ctx = Arc::new(AppContext::new(
        repos,
        transport,
        routing,
        settings.clone(),
    ));

    // Step 5: Start the delivery workers behind a shutdown signal.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut workers = Vec::with_capacity(settings.workers.count);
    for n in 0..settings.workers.count {
        workers.push(tokio::spawn(WorkerLoop::run(
            ctx.clone(),
            format!("worker-{n}"),
            shutdown_rx.clone(),
        )));
    }

    // Step 6: Build and serve the HTTP app.
    let state = AppState {
        ctx,
        settings: settings.clone(),
        metrics: metrics_handle,
    };
    let app = http::app(state);
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("bind server");
    info!(addr = %bind_addr, workers = settings.workers.count, "server_started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .expect("serve");

    // Step 7: Stop the workers and wait for them to drain.
    let _ = shutdown_tx.send(true);
    for worker in workers {
        let _ = worker.await;
    }
    info!("server_stopped");
}
