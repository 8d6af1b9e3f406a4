use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use rental_booking::config::environment::EnvironmentConfig;
use rental_booking::database;
use rental_booking::routes::build_router;
use rental_booking::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::default();

    // Configurar logging: verboso solo en desarrollo
    let log_level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("🚗 Vehicle Rental Booking API");
    info!("=============================");

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = database::run_migrations(&pool).await {
        error!("❌ Error ejecutando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }

    let addr: SocketAddr = config.server_url().parse()?;
    let app = build_router(AppState::new(pool, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚙 Catálogo:");
    info!("   GET  /api/vehicles - Listar vehículos (filtros: type, seats, min_price, max_price, city)");
    info!("   GET  /api/vehicles/:id - Detalle de vehículo");
    info!("📅 Reservas:");
    info!("   POST /api/bookings - Crear reserva");
    info!("   GET  /api/bookings - Mis reservas");
    info!("   GET  /api/bookings/:id - Detalle de reserva");
    info!("   POST /api/bookings/:id/cancel - Cancelar reserva");
    info!("   POST /api/bookings/:id/review - Reseñar reserva completada");
    info!("💳 Pagos:");
    info!("   POST /api/payments/checkout - Iniciar checkout");
    info!("   POST /api/payments/webhook - Webhook del proveedor de pagos");
    info!("👤 Usuarios:");
    info!("   POST /api/auth/register - Registro");
    info!("   GET  /api/auth/check-username - Disponibilidad de username");
    info!("   GET  /api/auth/me - Perfil actual");
    info!("   PUT  /api/auth/me - Actualizar perfil");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
