use anyhow::Result;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;

use fleet_booking::config::{DatabaseConfig, EnvironmentConfig, StorageBackend};
use fleet_booking::database::DatabaseConnection;
use fleet_booking::{create_app_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();
    let config = EnvironmentConfig::from_env()?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚚 Fleet Booking - Reservas de vehículos");
    info!("========================================");
    if config.is_development() {
        info!("🛠️ Entorno: {} (CORS: {:?})", config.environment, config.cors_origins);
    }

    // Inicializar persistencia
    let (app_state, db_connection) = match config.storage {
        StorageBackend::Postgres => {
            let url = config.database_url.clone().unwrap_or_default();
            let connection = match DatabaseConnection::connect(&DatabaseConfig::new(url)).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {:#}", e);
                    return Err(e);
                }
            };
            let state = AppState::with_postgres(config.clone(), connection.pool().clone());
            (state, Some(connection))
        }
        StorageBackend::Memory => {
            info!("🧠 Usando store en memoria (los datos no se persisten)");
            (AppState::in_memory(config.clone()), None)
        }
    };

    let app = create_app_router(app_state);

    let addr = config.server_url();

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    /api/ping - Health check");
    info!("🚗 Vehículos:");
    info!("   POST   /api/vehicles - Registrar vehículo");
    info!("   GET    /api/vehicles - Listar vehículos");
    info!("   GET    /api/vehicles/available - Buscar disponibilidad");
    info!("   DELETE /api/vehicles/:id - Eliminar vehículo");
    info!("📅 Reservas:");
    info!("   POST   /api/bookings - Crear reserva");
    info!("   GET    /api/bookings - Listar reservas recientes");
    info!("   DELETE /api/bookings/:id - Cancelar reserva");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
    }

    if let Some(connection) = db_connection {
        connection.close().await;
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
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
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal SIGTERM recibida, apagando servidor...");
        },
    }
}
