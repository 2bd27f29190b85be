use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, Level};

use lease_portal::{create_router, AppState, EnvironmentConfig};

/// How often expired sessions and OTP signups are swept out
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    let level = config.log_level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚗 Lease Portal gateway");
    info!("================================================");
    info!("🌍 Environment: {}", config.environment);
    if config.use_backend_api {
        info!("🔗 Backend API: {}", config.backend_base_url);
    } else {
        info!("💾 Backend API disabled, serving from the local store");
    }

    let state = match AppState::new(config.clone()).await {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Could not initialise the gateway: {}", e);
            return Err(anyhow::anyhow!("Startup failed: {}", e));
        }
    };

    let sessions = state.auth.sessions().clone();
    let otp = state.otp.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let removed = sessions.cleanup_expired().await;
            if removed > 0 {
                info!("🧹 Removed {} expired sessions", removed);
            }
            let abandoned = otp.cleanup_expired().await;
            if abandoned > 0 {
                info!("🧹 Dropped {} abandoned OTP signups", abandoned);
            }
        }
    });

    let app = create_router(state);
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Listening on http://{}", addr);
    info!("🔍 Endpoints:");
    info!("   GET  /health");
    info!("   /api/auth         login, logout, me, signup, verify-otp, resend-otp");
    info!("   /api/users        admin user management, own profile");
    info!("   /api/lease-requests");
    info!("   /api/quotations");
    info!("   /api/vehicles     registry lookup and saved vehicles");
    info!("   /api/dashboard    company, vendor and admin summaries");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Server error: {}", e);
        return Err(e.into());
    }

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
        _ = ctrl_c => info!("🛑 Ctrl+C received, shutting down..."),
        _ = terminate => info!("🛑 Terminate signal received, shutting down..."),
    }
}
