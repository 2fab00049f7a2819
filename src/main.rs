mod cache;
mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use cache::redis_client::RedisClient;
use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚗 Vehicle Rental - Motor de reservas e inspecciones");
    info!("====================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    // Inicializar Redis y cache
    let redis_url = std::env::var("REDIS_URL")
        .unwrap_or_else(|_| "redis://localhost:6379".to_string());

    let redis_config = cache::CacheConfig {
        redis_url,
        ..cache::CacheConfig::default()
    };

    let redis_client = match RedisClient::new(redis_config).await {
        Ok(client) => client,
        Err(e) => {
            error!("❌ Error conectando a Redis: {}", e);
            return Err(anyhow::anyhow!("Error de Redis: {}", e));
        }
    };

    // Crear router de la API
    let app_state = AppState::new(pool, EnvironmentConfig::default(), redis_client);

    // En producción el CORS se restringe a los orígenes configurados
    let cors = if app_state.config.is_production() {
        cors_middleware_with_origins(app_state.config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    let api_router = Router::new()
        .nest("/api/reservation", routes::reservation_routes::create_reservation_router())
        .nest("/api/inspection", routes::inspection_routes::create_inspection_router())
        .nest("/api/contract", routes::contract_routes::create_contract_router())
        .nest("/api/availability", routes::availability_routes::create_availability_router())
        .nest("/api/vehicle", routes::vehicle_routes::create_vehicle_router())
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth::auth_middleware,
        ));

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .merge(api_router)
        .layer(cors)
        .with_state(app_state);

    // Puerto del servidor
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("📅 Endpoints - Reservation:");
    info!("   POST /api/reservation - Crear reserva");
    info!("   GET  /api/reservation - Listar reservas del actor");
    info!("   GET  /api/reservation/:id - Detalle con inspecciones");
    info!("   POST /api/reservation/:id/confirm - Confirmar (propietario)");
    info!("   POST /api/reservation/:id/cancel - Cancelar (cualquier parte)");
    info!("🔎 Endpoints - Inspection:");
    info!("   GET  /api/inspection/:reservation_id - Inspecciones de la reserva");
    info!("   POST /api/inspection/:reservation_id/checkin - Entregar check-in");
    info!("   POST /api/inspection/:reservation_id/checkin/validate - Validar check-in");
    info!("   POST /api/inspection/:reservation_id/checkout - Entregar check-out");
    info!("   POST /api/inspection/:reservation_id/checkout/validate - Validar check-out (+litige)");
    info!("📝 Endpoints - Contract:");
    info!("   GET  /api/contract/:reservation_id - Estado del contrato");
    info!("   POST /api/contract/:reservation_id/sign - Firmar contrato");
    info!("🗓️ Endpoints - Availability:");
    info!("   GET  /api/availability/:vehicle_id/day/:date - Estado de un día");
    info!("   GET  /api/availability/:vehicle_id/calendar - Calendario mensual");
    info!("🚙 Endpoints - Vehicle:");
    info!("   GET  /api/vehicle - Vehículos del propietario");
    info!("   GET  /api/vehicle/:id - Obtener vehículo");
    info!("   POST /api/vehicle/:id/blocked-dates - Bloquear día");
    info!("   GET  /api/vehicle/:id/blocked-dates - Bloqueos del mes");
    info!("   DELETE /api/vehicle/blocked-dates/:id - Eliminar bloqueo");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "¡API de reservas de vehículos funcionando correctamente!",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
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
