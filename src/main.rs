mod clients;
mod handlers;
mod middleware;
mod routes;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use hyper_util::service::TowerToHyperService;
use tokio_rustls::TlsAcceptor;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_stream::StreamExt;
use tower::Service;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clients::mongodb::MongoClient;
use types::tls::TlsConfig;
use types::{ApiKey, AppState};

/// Secure HTTP bridge exposing MongoDB over an authenticated REST API.
#[derive(Parser)]
#[command(name = "mongo-bridge", version, about)]
struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 80)]
    port: u16,

    /// Enable HTTPS
    #[arg(long)]
    ssl: bool,

    /// SSL certificate file
    #[arg(long, default_value = "cert.pem")]
    cert: String,

    /// SSL private key file
    #[arg(long, default_value = "key.pem")]
    key: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mongo_uri = std::env::var("MONGO_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let api_key = ApiKey::from_env_or_generate();

    let mongo = MongoClient::connect(&mongo_uri)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create MongoDB client: {}", e))?;

    tracing::info!("MongoDB URI: {}", mongo.uri());

    let app_state = AppState {
        mongo: Arc::new(mongo),
        api_key: Arc::new(api_key),
    };

    let app = routes::create_routes(app_state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from((cli.host.parse::<std::net::IpAddr>()?, cli.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    if cli.ssl {
        let tls_config = TlsConfig::new(&cli.cert, &cli.key);
        let rustls_config = tls_config
            .build_server_config()
            .map_err(|e| anyhow::anyhow!("Failed to build TLS config: {}", e))?;

        tracing::info!("MongoDB bridge listening on {} with TLS", addr);

        let tls_acceptor = TlsAcceptor::from(rustls_config);
        let mut tcp_stream = TcpListenerStream::new(listener);
        let make_service = app.into_make_service();

        loop {
            tokio::select! {
                incoming = tcp_stream.next() => {
                    let Some(stream) = incoming else {
                        continue;
                    };
                    let stream = match stream {
                        Ok(s) => s,
                        Err(e) => {
                            tracing::error!("Failed to accept connection: {}", e);
                            continue;
                        }
                    };

                    let tls_acceptor = tls_acceptor.clone();
                    let mut make_service = make_service.clone();
                    let remote_addr = stream.peer_addr().ok();

                    tokio::spawn(async move {
                        let tls_stream = match tls_acceptor.accept(stream).await {
                            Ok(s) => s,
                            Err(e) => {
                                tracing::error!("TLS handshake failed: {}", e);
                                return;
                            }
                        };

                        let tower_service = match make_service.call(remote_addr.as_ref()).await {
                            Ok(s) => s,
                            Err(_) => return,
                        };

                        let hyper_service = TowerToHyperService::new(tower_service);
                        let io = TokioIo::new(tls_stream);

                        if let Err(e) = Builder::new(TokioExecutor::new())
                            .serve_connection(io, hyper_service)
                            .await
                        {
                            tracing::error!("Error serving connection: {}", e);
                        }
                    });
                }
                _ = shutdown_signal() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }
    } else {
        tracing::info!("MongoDB bridge listening on {} (HTTP only)", addr);

        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async {
                shutdown_signal().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
