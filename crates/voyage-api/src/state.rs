//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 모든 API 핸들러에서 공유되는 상태를 관리합니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.
//!
//! 전역 싱글턴 대신 프로세스 시작 시 명시적으로 구성하여 주입합니다.
//! 토큰은 자체 완결형이므로 서버 측 세션 테이블은 존재하지 않습니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use voyage_core::config::AuthConfig;
use voyage_core::domain::CredentialStore;

use crate::auth::TokenCodec;

/// 애플리케이션 공유 상태.
///
/// 이 구조체는 모든 API 핸들러에서 접근할 수 있는 공유 리소스를 포함합니다.
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
#[derive(Clone)]
pub struct AppState {
    /// 자격증명 저장소 - 인증 흐름의 유일한 사용자 레코드 접근 경로
    pub credential_store: Arc<dyn CredentialStore>,

    /// 토큰 코덱 - 서명 키와 수명 설정을 보유
    pub token_codec: Arc<TokenCodec>,

    /// 인증 설정 (쿠키 Secure 플래그 등)
    pub auth: AuthConfig,

    /// 데이터베이스 연결 풀 (카탈로그/예약/결제 저장소용)
    pub db_pool: Option<sqlx::PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: DateTime<Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    ///
    /// # 인자
    /// * `credential_store` - 자격증명 저장소 구현체
    /// * `auth` - 인증 설정 (토큰 코덱이 여기서 구성됩니다)
    pub fn new(credential_store: Arc<dyn CredentialStore>, auth: AuthConfig) -> Self {
        let token_codec = Arc::new(TokenCodec::new(&auth));
        Self {
            credential_store,
            token_codec,
            auth,
            db_pool: None,
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 데이터베이스 연결 풀 설정.
    pub fn with_db_pool(mut self, pool: sqlx::PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 리프레시 쿠키의 Secure 플래그 여부.
    pub fn cookie_secure(&self) -> bool {
        self.auth.cookie_secure
    }

    /// 서버 업타임 (초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").fetch_one(pool).await.is_ok(),
            None => false,
        }
    }
}

/// 테스트용 AppState 생성.
///
/// 인메모리 자격증명 저장소와 테스트 시크릿을 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use crate::repository::MemoryCredentialStore;

    let auth = AuthConfig {
        jwt_secret: "test-secret-key-for-jwt-testing-minimum-32-chars".to_string(),
        ..Default::default()
    };
    AppState::new(Arc::new(MemoryCredentialStore::new()), auth)
}
