//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness / readiness)
//! - `/api/auth` - 가입/로그인/토큰 갱신/로그아웃
//! - `/api/trips` - 여행 상품 (조회는 공개, 변경은 관리자)
//! - `/api/destinations` - 여행지 (조회는 공개, 변경은 관리자)
//! - `/api/bookings` - 예약 (인증 필요)
//! - `/api/payments` - 결제 증빙 (인증 필요, 검토는 관리자)
//! - `/api/admin` - 관리자 대시보드 및 운영 기능

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod destinations;
pub mod health;
pub mod payments;
pub mod trips;

pub use admin::{admin_router, DashboardStats};
pub use auth::{auth_router, AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
pub use bookings::{bookings_router, CreateBookingRequest};
pub use destinations::destinations_router;
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use payments::{payments_router, CreatePaymentRequest, UpdatePaymentStatusRequest};
pub use trips::trips_router;

use axum::http::StatusCode;
use axum::{Json, Router};
use std::sync::Arc;
use tracing::error;

use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
/// 보호 라우터는 내부에서 인증 게이트 미들웨어를 장착하므로
/// 상태를 인자로 받습니다.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // 인증 (게이트 없음)
        .nest("/api/auth", auth_router())
        // 카탈로그 및 예약/결제
        .nest("/api/trips", trips_router(state.clone()))
        .nest("/api/destinations", destinations_router(state.clone()))
        .nest("/api/bookings", bookings_router(state.clone()))
        .nest("/api/payments", payments_router(state.clone()))
        .nest("/api/admin", admin_router(state.clone()))
        .with_state(state)
}

/// 데이터베이스 풀이 필요한 핸들러용 헬퍼.
pub(crate) fn require_pool(
    state: &AppState,
) -> Result<&sqlx::PgPool, (StatusCode, Json<ApiErrorResponse>)> {
    state.db_pool.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiErrorResponse::simple(
                "DB_UNAVAILABLE",
                "데이터베이스가 설정되지 않았습니다",
            )),
        )
    })
}

/// 데이터베이스 에러를 응답으로 변환합니다. 내부 상세는 로그에만 남깁니다.
pub(crate) fn db_error(e: sqlx::Error) -> (StatusCode, Json<ApiErrorResponse>) {
    error!(error = %e, "database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiErrorResponse::new(
            "DB_ERROR",
            "데이터베이스 오류가 발생했습니다",
        )),
    )
}

/// 404 응답 헬퍼.
pub(crate) fn not_found(
    code: &'static str,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiErrorResponse::simple(code, message)),
    )
}
