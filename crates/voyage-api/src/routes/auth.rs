//! 인증 API 엔드포인트.
//!
//! 로그인/가입/토큰 갱신/로그아웃을 처리합니다. 서버 측 세션 테이블은
//! 없습니다 - "세션"은 살아있는 액세스 토큰과 리프레시 토큰의 쌍이며,
//! 상태는 전부 토큰 안에 인코딩됩니다.
//!
//! # 엔드포인트
//!
//! - `POST /api/auth/register` - 가입 (201, 리프레시 쿠키 설정)
//! - `POST /api/auth/login` - 로그인 (200, 리프레시 쿠키 설정)
//! - `POST /api/auth/refresh` - 토큰 갱신 (쿠키 회전)
//! - `POST /api/auth/logout` - 로그아웃 (쿠키 만료, 항상 성공)
//!
//! 리프레시 토큰이 검증에 성공하면 항상 액세스/리프레시 쌍을 모두 새로
//! 발급합니다 (사용할 때마다 회전).

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;
use validator::Validate;
use voyage_core::domain::{NewUser, PublicUser, Role, StoreError};

use crate::auth::{
    clear_refresh_cookie, get_cookie, hash_password, refresh_cookie, verify_password,
    with_cleared_cookie, AuthError, TokenPair, REFRESH_COOKIE_NAME,
};
use crate::error::ApiErrorResponse;
use crate::state::AppState;

// ==================== 요청 타입 ====================

/// 가입 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// 표시 이름
    #[validate(length(min = 1, message = "이름은 비워둘 수 없습니다"))]
    pub name: String,
    /// 이메일 (가입 후 변경 불가)
    #[validate(email(message = "이메일 형식이 올바르지 않습니다"))]
    pub email: String,
    /// 평문 비밀번호 (저장 전에 해싱됩니다)
    #[validate(length(min = 6, message = "비밀번호는 최소 6자 이상이어야 합니다"))]
    pub password: String,
    /// 로그인 유지 - 액세스 토큰 수명을 연장
    #[serde(default)]
    pub remember_me: bool,
}

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "이메일 형식이 올바르지 않습니다"))]
    pub email: String,
    #[validate(length(min = 6, message = "비밀번호는 최소 6자 이상이어야 합니다"))]
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// 토큰 갱신 요청 (본문은 선택적).
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub remember_me: bool,
}

// ==================== 응답 타입 ====================

/// 인증 성공 응답.
///
/// 리프레시 토큰은 본문에 넣지 않습니다 - HTTP-only 쿠키로만 전달됩니다.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: PublicUser,
}

/// 단순 메시지 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ==================== 핸들러 ====================

/// 토큰 쌍과 사용자 정보로 성공 응답을 만듭니다.
///
/// 리프레시 토큰은 쿠키로, 액세스 토큰은 본문으로 나갑니다.
fn auth_success(
    status: StatusCode,
    pair: &TokenPair,
    user: PublicUser,
    cookie_secure: bool,
) -> Response {
    let mut response = (
        status,
        Json(AuthResponse {
            access_token: pair.access_token.clone(),
            user,
        }),
    )
        .into_response();

    if let Ok(value) = HeaderValue::from_str(&refresh_cookie(&pair.refresh_token, cookie_secure)) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

/// 가입.
///
/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "가입 성공", body = AuthResponse),
        (status = 400, description = "검증 실패 또는 이메일 중복", body = ApiErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Response {
    if let Err(errors) = payload.validate() {
        info!(event = "register_validation_failed", "register rejected by validation");
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::from_validation(&errors)),
        )
            .into_response();
    }

    info!(event = "register_attempt", email = %payload.email, "register attempt");

    let password_hash = match hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "password hashing failed");
            return AuthError::Internal(e.to_string()).into_response();
        }
    };

    let user = match state
        .credential_store
        .create(NewUser {
            email: payload.email.clone(),
            password_hash,
            name: payload.name.clone(),
            role: Role::User,
        })
        .await
    {
        Ok(user) => user,
        Err(StoreError::EmailTaken) => {
            warn!(event = "register_failed", email = %payload.email, reason = "email_exists", "register failed");
            return AuthError::EmailInUse.into_response();
        }
        Err(e) => {
            error!(error = %e, "credential store failure during register");
            return AuthError::Internal(e.to_string()).into_response();
        }
    };

    let pair = match state
        .token_codec
        .issue_pair(user.id, user.role, payload.remember_me)
    {
        Ok(pair) => pair,
        Err(e) => return e.into_response(),
    };

    info!(
        event = "register_success",
        user_id = user.id,
        email = %user.email,
        role = %user.role,
        "register success"
    );

    auth_success(
        StatusCode::CREATED,
        &pair,
        PublicUser::from(user),
        state.cookie_secure(),
    )
}

/// 로그인.
///
/// 미등록 이메일과 비밀번호 불일치는 호출자에게 구분되지 않습니다.
/// 내부 로그에만 이유가 남습니다.
///
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = AuthResponse),
        (status = 401, description = "자격증명 불일치", body = ApiErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Response {
    if let Err(errors) = payload.validate() {
        info!(event = "login_validation_failed", "login rejected by validation");
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::from_validation(&errors)),
        )
            .into_response();
    }

    info!(event = "login_attempt", email = %payload.email, "login attempt");

    let user = match state.credential_store.find_by_email(&payload.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(event = "login_failed", email = %payload.email, reason = "user_not_found", "login failed");
            return AuthError::InvalidCredentials.into_response();
        }
        Err(e) => {
            error!(error = %e, "credential store failure during login");
            return AuthError::Internal(e.to_string()).into_response();
        }
    };

    if verify_password(&payload.password, &user.password_hash).is_err() {
        warn!(event = "login_failed", email = %payload.email, reason = "invalid_password", "login failed");
        return AuthError::InvalidCredentials.into_response();
    }

    let pair = match state
        .token_codec
        .issue_pair(user.id, user.role, payload.remember_me)
    {
        Ok(pair) => pair,
        Err(e) => return e.into_response(),
    };

    info!(
        event = "login_success",
        user_id = user.id,
        email = %user.email,
        role = %user.role,
        "login success"
    );

    auth_success(
        StatusCode::OK,
        &pair,
        PublicUser::from(user),
        state.cookie_secure(),
    )
}

/// 토큰 갱신.
///
/// 리프레시 쿠키를 검증하고 새 액세스/리프레시 쌍을 발급합니다 (회전).
/// 쿠키를 읽은 이후의 모든 실패는 쿠키를 정리한 뒤 에러를 돌려줍니다.
///
/// POST /api/auth/refresh
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "갱신 성공", body = AuthResponse),
        (status = 401, description = "토큰 없음/무효/사용자 미존재", body = ApiErrorResponse)
    )
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Option<Json<RefreshRequest>>,
) -> Response {
    let secure = state.cookie_secure();

    let Some(refresh_token) = get_cookie(&headers, REFRESH_COOKIE_NAME) else {
        warn!(event = "refresh_failed", reason = "no_token", "refresh failed");
        return AuthError::NoToken.into_response();
    };

    let user_id = match state
        .token_codec
        .verify(&refresh_token)
        .and_then(|claims| claims.user_id())
    {
        Ok(id) => id,
        Err(_) => {
            warn!(event = "refresh_failed", reason = "invalid_token", "refresh failed");
            return with_cleared_cookie(AuthError::InvalidToken.into_response(), secure);
        }
    };

    let user = match state.credential_store.find_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(event = "refresh_failed", reason = "user_not_found", user_id, "refresh failed");
            return with_cleared_cookie(AuthError::UserNotFound.into_response(), secure);
        }
        Err(e) => {
            error!(error = %e, "credential store failure during refresh");
            return with_cleared_cookie(AuthError::Internal(e.to_string()).into_response(), secure);
        }
    };

    let remember_me = payload.map(|Json(p)| p.remember_me).unwrap_or(false);
    let pair = match state.token_codec.issue_pair(user.id, user.role, remember_me) {
        Ok(pair) => pair,
        Err(e) => return with_cleared_cookie(e.into_response(), secure),
    };

    info!(event = "refresh_success", user_id = user.id, "refresh success");

    auth_success(
        StatusCode::OK,
        &pair,
        PublicUser::from(user),
        secure,
    )
}

/// 로그아웃.
///
/// 리프레시 쿠키를 무조건 만료시킵니다. 항상 성공합니다.
/// 액세스 토큰은 회수하지 않습니다 - 남은 수명 동안 계속 유효합니다.
///
/// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses((status = 200, description = "로그아웃 완료", body = MessageResponse))
)]
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    // 액세스 토큰이 제시되어 있으면 행위자 ID를 로그에 남긴다
    let user_id = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .and_then(|token| state.token_codec.verify(token).ok())
        .and_then(|claims| claims.user_id().ok());

    info!(event = "logout", user_id = ?user_id, "logout");

    let mut response = (
        StatusCode::OK,
        Json(MessageResponse {
            message: "로그아웃되었습니다".to_string(),
        }),
    )
        .into_response();

    if let Ok(value) = HeaderValue::from_str(&clear_refresh_cookie(state.cookie_secure())) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}
