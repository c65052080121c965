//! 보호 라우트 미들웨어 및 인증 추출기.
//!
//! 요청당 상태 기계:
//!
//! 1. `Authorization` 헤더 없음 → 401
//! 2. `Bearer <token>` 형식이 아님 → 401
//! 3. 액세스 토큰 검증 성공 → 요청 컨텍스트에 사용자 부착, 통과
//! 4. 검증 실패 → 리프레시 쿠키로 조용한 갱신 시도:
//!    쿠키 없음 → 401 (자격증명 저장소는 조회하지 않음),
//!    리프레시 무효 → 쿠키 정리 후 401,
//!    사용자 미존재 → 쿠키 정리 후 401,
//!    성공 → 새 토큰 쌍 발급, 회전된 쿠키와 새 `Authorization` 헤더를
//!    응답에 부착하고 통과
//! 5. 저장소/코덱 내부 실패 → 500
//!
//! 갱신 경로는 remember 플래그를 읽지 않으므로 새 액세스 토큰은 항상
//! 기본 수명입니다.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        header::{AUTHORIZATION, SET_COOKIE},
        request::Parts,
        HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};
use voyage_core::domain::Role;

use super::cookie::{clear_refresh_cookie, get_cookie, refresh_cookie, REFRESH_COOKIE_NAME};
use super::AuthError;
use crate::state::AppState;

/// 인증된 요청의 사용자 신원.
///
/// `auth_gate`가 요청 extension으로 삽입하며, 핸들러는 추출기로 꺼냅니다.
/// 공유 요청 객체에 가변 필드를 붙이는 대신 타입이 있는 컨텍스트 값을
/// 사용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: Role,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| AuthError::Unauthenticated("인증이 필요합니다".to_string()))
    }
}

/// 관리자 권한을 요구하는 추출기.
///
/// 역할 검사는 닫힌 열거형의 패턴 매칭으로만 수행합니다.
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.role {
            Role::Admin => Ok(AdminUser(user)),
            Role::User => Err(AuthError::Forbidden),
        }
    }
}

/// 보호 라우트 인증 게이트.
///
/// 액세스 토큰을 검증하고, 실패 시 리프레시 쿠키로 조용한 갱신을
/// 시도한 뒤에야 요청을 거부합니다.
pub async fn auth_gate(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
    else {
        return AuthError::Unauthenticated("토큰이 제공되지 않았습니다".to_string())
            .into_response();
    };

    let Some(token) = auth_header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
    else {
        return AuthError::Unauthenticated("잘못된 토큰 형식입니다".to_string()).into_response();
    };

    // 액세스 토큰이 유효하면 그대로 통과
    if let Ok(user) = state
        .token_codec
        .verify(token)
        .and_then(|claims| claims.user_id().map(|id| (id, claims.role)))
        .map(|(user_id, role)| AuthUser { user_id, role })
    {
        req.extensions_mut().insert(user);
        return next.run(req).await;
    }

    renew_and_continue(state, req, next).await
}

/// 조용한 갱신 경로.
async fn renew_and_continue(state: Arc<AppState>, mut req: Request, next: Next) -> Response {
    // 쿠키가 없으면 저장소 조회 없이 즉시 거부
    let Some(refresh_token) = get_cookie(req.headers(), REFRESH_COOKIE_NAME) else {
        return AuthError::Unauthenticated(
            "액세스 토큰이 만료되었고 리프레시 토큰이 없습니다".to_string(),
        )
        .into_response();
    };

    let user_id = match state
        .token_codec
        .verify(&refresh_token)
        .and_then(|claims| claims.user_id())
    {
        Ok(id) => id,
        Err(_) => {
            warn!("silent renewal failed: invalid refresh token");
            return with_cleared_cookie(
                AuthError::Unauthenticated("유효하지 않은 리프레시 토큰입니다".to_string())
                    .into_response(),
                state.cookie_secure(),
            );
        }
    };

    let user = match state.credential_store.find_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(user_id, "silent renewal failed: user not found");
            return with_cleared_cookie(
                AuthError::Unauthenticated("사용자를 찾을 수 없습니다".to_string())
                    .into_response(),
                state.cookie_secure(),
            );
        }
        Err(e) => {
            // 토큰 문제가 아니라 우리 쪽 장애 - 401이 아닌 500
            error!(error = %e, "credential store failure during silent renewal");
            return AuthError::Internal(e.to_string()).into_response();
        }
    };

    // 회전: 액세스와 리프레시를 모두 새로 발급 (갱신 경로는 기본 수명)
    let pair = match state.token_codec.issue_pair(user.id, user.role, false) {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = %e, "token issuance failure during silent renewal");
            return e.into_response();
        }
    };

    req.extensions_mut().insert(AuthUser {
        user_id: user.id,
        role: user.role,
    });

    let mut response = next.run(req).await;

    // 새 토큰을 응답에 부착 - 호출자는 응답 헤더에서 새 액세스 토큰을 읽는다
    if let Ok(value) = HeaderValue::from_str(&refresh_cookie(&pair.refresh_token, state.cookie_secure()))
    {
        response.headers_mut().append(SET_COOKIE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", pair.access_token)) {
        response.headers_mut().insert(AUTHORIZATION, value);
    }
    response
}

/// 응답에 리프레시 쿠키 만료 헤더를 추가합니다.
pub(crate) fn with_cleared_cookie(mut response: Response, secure: bool) -> Response {
    if let Ok(value) = HeaderValue::from_str(&clear_refresh_cookie(secure)) {
        response.headers_mut().append(SET_COOKIE, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryCredentialStore;
    use crate::state::AppState;
    use axum::{
        body::Body,
        http::{header::COOKIE, Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Json, Router,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;
    use voyage_core::config::AuthConfig;
    use voyage_core::domain::{CredentialStore, NewUser, StoreError, User};

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    /// find_by_id 호출 횟수를 기록하는 래퍼 저장소.
    struct CountingStore {
        inner: MemoryCredentialStore,
        lookups: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CredentialStore for CountingStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
            self.inner.find_by_email(email).await
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id(id).await
        }

        async fn create(&self, user: NewUser) -> Result<User, StoreError> {
            self.inner.create(user).await
        }
    }

    async fn whoami(user: AuthUser) -> Json<i64> {
        Json(user.user_id)
    }

    async fn admin_only(AdminUser(user): AdminUser) -> Json<i64> {
        Json(user.user_id)
    }

    fn protected_app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/protected", get(whoami))
            .route("/admin", get(admin_only))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_gate))
            .with_state(state)
    }

    fn test_state_with_store(store: Arc<dyn CredentialStore>) -> Arc<AppState> {
        let auth = AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            ..Default::default()
        };
        Arc::new(AppState::new(store, auth))
    }

    async fn seed_user(state: &AppState, role: Role) -> User {
        state
            .credential_store
            .create(NewUser {
                email: format!("{}@x.com", role),
                password_hash: "hash".to_string(),
                name: "A".to_string(),
                role,
            })
            .await
            .unwrap()
    }

    /// 만료된 액세스 토큰을 만드는 코덱 (같은 시크릿, 음수 수명).
    fn expired_codec() -> crate::auth::TokenCodec {
        crate::auth::TokenCodec::new(&AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            access_ttl_secs: -3600,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let state = test_state_with_store(Arc::new(MemoryCredentialStore::new()));
        let app = protected_app(state);

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_header_rejected() {
        let state = test_state_with_store(Arc::new(MemoryCredentialStore::new()));
        let app = protected_app(state);

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header(AUTHORIZATION, "Token abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_access_token_passes() {
        let state = test_state_with_store(Arc::new(MemoryCredentialStore::new()));
        let user = seed_user(&state, Role::User).await;
        let token = state
            .token_codec
            .issue_access(user.id, user.role, false)
            .unwrap();

        let app = protected_app(state);
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header(AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let id: i64 = serde_json::from_slice(&body).unwrap();
        assert_eq!(id, user.id);
    }

    #[tokio::test]
    async fn test_expired_token_without_refresh_rejects_without_store_lookup() {
        let store = Arc::new(CountingStore {
            inner: MemoryCredentialStore::new(),
            lookups: AtomicUsize::new(0),
        });
        let state = test_state_with_store(store.clone());
        let expired = expired_codec().issue_access(1, Role::User, false).unwrap();

        let app = protected_app(state);
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header(AUTHORIZATION, format!("Bearer {}", expired))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        // 리프레시 쿠키가 없으면 자격증명 저장소를 조회하지 않는다
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_expired_token_with_valid_refresh_renews() {
        let state = test_state_with_store(Arc::new(MemoryCredentialStore::new()));
        let user = seed_user(&state, Role::User).await;

        let expired_access = expired_codec()
            .issue_access(user.id, user.role, false)
            .unwrap();
        let refresh = state.token_codec.issue_refresh(user.id, user.role).unwrap();

        let app = protected_app(state.clone());
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header(AUTHORIZATION, format!("Bearer {}", expired_access))
                    .header(COOKIE, format!("refreshToken={}", refresh))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        // 응답 헤더에 새 액세스 토큰이 부착된다
        let new_auth = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .unwrap();
        let new_access = new_auth.strip_prefix("Bearer ").unwrap();
        assert_ne!(new_access, expired_access);
        let claims = state.token_codec.verify(new_access).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);

        // 리프레시 토큰도 회전된다
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .unwrap();
        assert!(set_cookie.starts_with("refreshToken="));
        assert!(!set_cookie.starts_with("refreshToken=;"));
    }

    #[tokio::test]
    async fn test_expired_token_with_invalid_refresh_clears_cookie() {
        let state = test_state_with_store(Arc::new(MemoryCredentialStore::new()));
        let expired = expired_codec().issue_access(1, Role::User, false).unwrap();

        let app = protected_app(state);
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header(AUTHORIZATION, format!("Bearer {}", expired))
                    .header(COOKIE, "refreshToken=garbage.token.value")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .unwrap();
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_refresh_for_deleted_user_rejected() {
        let state = test_state_with_store(Arc::new(MemoryCredentialStore::new()));
        let expired = expired_codec().issue_access(999, Role::User, false).unwrap();
        let refresh = state.token_codec.issue_refresh(999, Role::User).unwrap();

        let app = protected_app(state);
        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/protected")
                    .header(AUTHORIZATION, format!("Bearer {}", expired))
                    .header(COOKIE, format!("refreshToken={}", refresh))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .unwrap();
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_role_gate() {
        let state = test_state_with_store(Arc::new(MemoryCredentialStore::new()));
        let user = seed_user(&state, Role::User).await;
        let admin = seed_user(&state, Role::Admin).await;

        let user_token = state
            .token_codec
            .issue_access(user.id, user.role, false)
            .unwrap();
        let admin_token = state
            .token_codec
            .issue_access(admin.id, admin.role, false)
            .unwrap();

        let app = protected_app(state);

        let response = app
            .clone()
            .oneshot(
                HttpRequest::builder()
                    .uri("/admin")
                    .header(AUTHORIZATION, format!("Bearer {}", user_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/admin")
                    .header(AUTHORIZATION, format!("Bearer {}", admin_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
