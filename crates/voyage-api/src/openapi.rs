//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::routes::auth::RefreshRequest;
use crate::routes::{
    AuthResponse, ComponentHealth, ComponentStatus, HealthResponse, LoginRequest, MessageResponse,
    RegisterRequest,
};
use voyage_core::domain::{PublicUser, Role};

/// Voyage API 문서.
///
/// 인증 및 헬스 체크 엔드포인트와 공용 스키마를 포함하는
/// OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Voyage Travel Booking API",
        version = "0.1.0",
        description = r#"
# Voyage 여행 예약 REST API

사용자 인증, 여행 상품/여행지 카탈로그, 예약, 결제 증빙 관리를 위한 REST API입니다.

## 인증

보호된 엔드포인트는 JWT Bearer 토큰 인증이 필요합니다.
`Authorization: Bearer <token>` 헤더를 포함하세요.

액세스 토큰이 만료된 경우, 유효한 `refreshToken` 쿠키가 있으면 서버가
조용히 토큰을 갱신하고 새 액세스 토큰을 응답의 `Authorization` 헤더로
돌려줍니다. 클라이언트는 이 헤더를 읽어 토큰을 교체해야 합니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "Voyage Team", url = "https://github.com/user/voyage")
    ),
    servers(
        (url = "http://localhost:4000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 가입/로그인/토큰 갱신/로그아웃")
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::auth::logout,
    ),
    components(schemas(
        // ===== Health =====
        HealthResponse,
        ComponentHealth,
        ComponentStatus,
        // ===== Common =====
        ApiErrorResponse,
        // ===== Auth =====
        RegisterRequest,
        LoginRequest,
        RefreshRequest,
        AuthResponse,
        MessageResponse,
        PublicUser,
        Role,
    ))
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// `/swagger-ui`에서 UI를, `/api-docs/openapi.json`에서 스펙을 제공합니다.
pub fn swagger_ui_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
