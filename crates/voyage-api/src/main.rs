//! 여행 예약 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 인증, 여행 상품/여행지 카탈로그, 예약, 결제 증빙 엔드포인트를 제공합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use voyage_api::repository::{MemoryCredentialStore, PgCredentialStore};
use voyage_api::routes::create_api_router;
use voyage_api::state::AppState;
use voyage_api::openapi::swagger_ui_router;
use voyage_core::config::{AppConfig, AuthConfig};
use voyage_core::logging::{init_logging, LogConfig};

/// AppState 초기화.
///
/// DATABASE_URL이 설정되어 있으면 PostgreSQL 자격증명 저장소와 연결 풀을
/// 사용하고, 없으면 인메모리 저장소로 동작합니다 (개발 전용 -
/// 카탈로그/예약 기능은 비활성화됩니다).
async fn create_app_state(config: &AppConfig) -> AppState {
    let Some(url) = &config.database.url else {
        warn!("DATABASE_URL not set, catalog/booking features will be disabled");
        warn!("Using in-memory credential store (development only)");
        return AppState::new(Arc::new(MemoryCredentialStore::new()), config.auth.clone());
    };

    match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
        .connect(url)
        .await
    {
        Ok(pool) => {
            info!("Connected to PostgreSQL successfully");

            if let Err(e) = sqlx::migrate!().run(&pool).await {
                error!(error = %e, "Failed to run database migrations");
            } else {
                info!("Database migrations applied");
            }

            let store = Arc::new(PgCredentialStore::new(pool.clone()));
            AppState::new(store, config.auth.clone()).with_db_pool(pool)
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            warn!("Falling back to in-memory credential store (data will not persist)");
            AppState::new(Arc::new(MemoryCredentialStore::new()), config.auth.clone())
        }
    }
}

/// CORS 미들웨어 구성.
///
/// CORS_ORIGINS 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
///
/// # 환경변수
///
/// - `CORS_ORIGINS`: 쉼표로 구분된 허용 origin 목록
///   예: `https://app.example.com,https://admin.example.com`
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            // 프로덕션: 특정 origin만 허용
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            // 개발: 모든 origin 허용
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
            axum::http::header::COOKIE,
        ])
        // 자격 증명(쿠키) 포함 허용 (CORS_ORIGINS 설정 시에만)
        .allow_credentials(std::env::var("CORS_ORIGINS").is_ok())
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(create_api_router(state))
        // OpenAPI 문서 및 Swagger UI
        .merge(swagger_ui_router())
        // 기타 미들웨어
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // 설정 로드 (파일이 없으면 기본값 + 환경 변수)
    let config = AppConfig::load_or_env("config/default.toml")?;

    // 로깅 초기화
    let format = config.logging.format.parse().unwrap_or_default();
    init_logging(LogConfig::new(&config.logging.level).with_format(format))?;

    info!("Starting Voyage API server...");

    if config.auth.jwt_secret == AuthConfig::default().jwt_secret {
        warn!("JWT_SECRET not set, using default (INSECURE for development only)");
    }

    let addr = config.server.socket_addr().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. API_HOST, API_PORT 환경변수를 확인하세요."
        );
        e
    })?;

    // AppState 생성 (DB 연결 및 저장소 선택 포함)
    let state = Arc::new(create_app_state(&config).await);

    info!(version = %state.version, "Application state initialized");
    info!(
        has_db = state.db_pool.is_some(),
        cookie_secure = state.cookie_secure(),
        "Service connections status"
    );

    let app = create_router(state);

    // 서버 시작
    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료를 시작합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
