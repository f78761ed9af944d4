//! Payment notifier server.
//!
//! Relays payment confirmations received over HTTP to athletes on WhatsApp.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin notifier-server
//! cargo run --bin notifier-server -- --client dry-run --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use notifier_server::{
    config::{Args, ClientKind},
    domain::MessagingClient,
    infrastructure::{
        messaging_client::{BridgeClient, DryRunClient},
        qr::spawn_terminal_printer,
    },
    ui::{Server, signal::shutdown_signal},
    usecase::{GetConnectionStatusUseCase, SendPaymentNotificationUseCase, SessionManager},
};
use notifier_shared::logger::setup_logger;
use tokio::sync::{mpsc, oneshot};

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let clock = Arc::new(args.clock()?);

    // Initialize dependencies in order:
    // 1. MessagingClient
    // 2. SessionManager
    // 3. UseCases
    // 4. Server

    // 1. Create MessagingClient
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let client: Arc<dyn MessagingClient> = match args.client {
        ClientKind::Bridge => {
            tracing::info!("Using WhatsApp bridge at {}", args.bridge_url);
            Arc::new(BridgeClient::new(args.bridge_config(), event_tx)?)
        }
        ClientKind::DryRun => Arc::new(DryRunClient::new(event_tx)),
    };

    // 2. Start the SessionManager (owns the connection state)
    let (session_manager, session) =
        SessionManager::new(client.clone(), event_rx, args.reconnect_policy());
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let session_task = tokio::spawn(session_manager.run(shutdown_rx));
    let qr_printer = spawn_terminal_printer(session.clone());

    // 3. Create UseCases
    let send_payment_notification_usecase = Arc::new(SendPaymentNotificationUseCase::new(
        client,
        session.clone(),
        clock,
    ));
    let get_connection_status_usecase = Arc::new(GetConnectionStatusUseCase::new(session));

    // 4. Create and run the server
    let server = Server::new(
        send_payment_notification_usecase,
        get_connection_status_usecase,
    );
    let result = server.run(args.host, args.port, shutdown_signal()).await;

    // Release the messaging session before exiting
    let _ = shutdown_tx.send(());
    if let Err(e) = session_task.await {
        tracing::error!("Session manager task failed: {}", e);
    }
    qr_printer.abort();

    result
}
