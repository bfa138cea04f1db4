use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vehicle_vault::config::{database::DatabaseConfig, EnvironmentConfig};
use vehicle_vault::create_app;
use vehicle_vault::database::DatabaseConnection;
use vehicle_vault::services::email_service::{LogMailer, Mailer, SmtpMailer};
use vehicle_vault::services::reminder_scheduler::ReminderScheduler;
use vehicle_vault::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚗 VehicleVault - vehicle maintenance API");
    info!("=========================================");

    let config = EnvironmentConfig::from_env()?;
    info!("⚙️  Environment: {}", config.environment);
    if config.is_development() && config.cors_origins.is_empty() {
        warn!("🌍 CORS_ORIGINS not set, accepting any origin");
    }

    let db_config = DatabaseConfig::from_env()?;
    let db_connection = match DatabaseConnection::new(&db_config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error connecting to the database: {}", e);
            return Err(anyhow::anyhow!("Database error: {}", e));
        }
    };
    let pool = db_connection.pool().clone();

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            info!("📧 Sending email through {}", smtp.host);
            Arc::new(SmtpMailer::new(smtp)?)
        }
        None => {
            warn!("📧 SMTP not configured, emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let addr: SocketAddr = config.server_url().parse()?;
    let reminder_hour = config.reminder_hour;
    let app_state = AppState::new(pool, config, mailer);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler =
        ReminderScheduler::new(app_state.reminders.clone(), reminder_hour).spawn(shutdown_rx);

    let app = create_app(app_state);

    info!("🌐 Server listening on http://{}", addr);
    info!("🔍 Available endpoints:");
    info!("   GET  /health");
    info!("🔐 Auth:");
    info!("   POST /api/auth/register");
    info!("   POST /api/auth/login");
    info!("   GET  /api/auth/me");
    info!("   POST /api/auth/forgot-password");
    info!("   POST /api/auth/reset-password/:token");
    info!("🚗 Vehicles:");
    info!("   POST/GET /api/vehicles");
    info!("   GET/PUT/DELETE /api/vehicles/:id");
    info!("   POST /api/vehicles/set-preferred-center");
    info!("🔧 Services:");
    info!("   POST/GET /api/services/:vehicle_id");
    info!("   DELETE   /api/services/:id");
    info!("🔔 Reminders:");
    info!("   GET  /api/reminders");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Server error: {}", e);
    }

    shutdown_tx.send(true).ok();
    if let Err(e) = scheduler.await {
        error!("❌ Reminder scheduler task failed: {}", e);
    }

    info!("👋 Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 SIGTERM received, shutting down...");
        },
    }
}
