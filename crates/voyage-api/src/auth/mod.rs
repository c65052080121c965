//! 인증 및 권한 부여.
//!
//! JWT 이중 토큰(액세스 + 리프레시) 인증을 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenCodec`]: 토큰 서명/검증 (엄격한 만료 검사, 시계 오차 허용 없음)
//! - [`AuthUser`] / [`AdminUser`]: 핸들러용 인증 추출기
//! - [`auth_gate`]: 보호 라우트 미들웨어 - 액세스 토큰 검증에 실패하면
//!   리프레시 쿠키로 조용한 갱신을 시도합니다
//! - 비밀번호 해싱/검증 함수 (Argon2id)
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! // 보호된 라우트에서 AuthUser 추출기 사용
//! async fn my_bookings(
//!     AuthUser { user_id, .. }: AuthUser,
//! ) -> impl IntoResponse {
//!     format!("bookings of user {}", user_id)
//! }
//! ```

mod cookie;
mod jwt;
mod middleware;
mod password;

pub use cookie::{
    clear_refresh_cookie, get_cookie, refresh_cookie, REFRESH_COOKIE_MAX_AGE_SECS,
    REFRESH_COOKIE_NAME,
};
pub use jwt::{Claims, TokenCodec, TokenPair};
pub use middleware::{auth_gate, AdminUser, AuthUser};
pub(crate) use middleware::with_cleared_cookie;
pub use password::{hash_password, verify_password, PasswordError};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ApiErrorResponse;

/// 인증 흐름 에러.
///
/// HTTP 경계에서 스펙의 에러 분류(400/401/403/500)로 매핑됩니다.
/// 쿠키 정리는 호출 지점에서 결정합니다 - 이 타입은 분류만 담당합니다.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// 이미 등록된 이메일로 가입 시도
    #[error("이미 사용 중인 이메일입니다")]
    EmailInUse,

    /// 로그인 실패 - 미등록 이메일과 비밀번호 불일치를 구분하지 않습니다
    #[error("이메일 또는 비밀번호가 올바르지 않습니다")]
    InvalidCredentials,

    /// 리프레시 쿠키 없음
    #[error("리프레시 토큰이 제공되지 않았습니다")]
    NoToken,

    /// 서명 불일치, 형식 오류 또는 만료
    #[error("유효하지 않은 토큰입니다")]
    InvalidToken,

    /// 토큰에 담긴 사용자가 더 이상 존재하지 않음
    #[error("사용자를 찾을 수 없습니다")]
    UserNotFound,

    /// 보호 라우트 접근 거부 (토큰 누락/형식 오류/갱신 불가)
    #[error("인증이 필요합니다: {0}")]
    Unauthenticated(String),

    /// 역할 불충분
    #[error("권한이 부족합니다")]
    Forbidden,

    /// 저장소/코덱 내부 실패 - "토큰을 믿지 않는다"가 아니라 "우리가 고장났다"
    #[error("인증 처리 중 내부 에러: {0}")]
    Internal(String),
}

impl AuthError {
    /// HTTP 상태 코드 매핑.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::EmailInUse => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::NoToken
            | AuthError::InvalidToken
            | AuthError::UserNotFound
            | AuthError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 에러 코드 문자열.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::EmailInUse => "EMAIL_IN_USE",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::NoToken => "NO_TOKEN",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::Unauthenticated(_) => "UNAUTHENTICATED",
            AuthError::Forbidden => "FORBIDDEN",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorResponse::simple(self.code(), self.to_string()));
        (self.status(), body).into_response()
    }
}
