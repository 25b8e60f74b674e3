//! Web服务器

use axum::{
    routing::{get, post},
    Router,
};
use pms_core::{PmsError, Result};
use pms_service::PatientService;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::handlers::{
    about, add, api_root, create_patient, health, sort_patients, view_patient, view_patients,
};

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, service: Arc<PatientService>) -> Self {
        Self {
            addr,
            app: create_app(service),
        }
    }

    pub async fn run(self) -> Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| PmsError::Internal(format!("Web server stopped unexpectedly: {}", e)))?;

        info!("Web server stopped");
        Ok(())
    }
}

/// 构建路由
pub fn create_app(service: Arc<PatientService>) -> Router {
    Router::new()
        .route("/", get(api_root))
        .route("/about", get(about))
        .route("/add", get(add))
        .route("/health", get(health))
        .route("/view", get(view_patients))
        .route("/patient/:patient_id", get(view_patient))
        .route("/sort", get(sort_patients))
        .route("/create", post(create_patient))
        .with_state(service)
        // 全局中间件
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("无法监听关闭信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到关闭信号");
}
