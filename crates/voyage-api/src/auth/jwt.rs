//! JWT 토큰 처리.
//!
//! 액세스 토큰과 리프레시 토큰의 생성/검증 로직.
//! 두 토큰은 동일한 페이로드 형태를 공유하고 수명만 다릅니다.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use voyage_core::config::AuthConfig;
use voyage_core::domain::Role;

use super::AuthError;

/// JWT 페이로드.
///
/// 액세스 토큰과 리프레시 토큰이 같은 형태를 사용합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID
    pub sub: String,
    /// 사용자 역할
    pub role: Role,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 새로운 Claims 생성.
    fn new(user_id: i64, role: Role, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            role,
            iat: now,
            exp: now + ttl_secs,
        }
    }

    /// sub 필드의 사용자 ID 파싱.
    ///
    /// 숫자가 아닌 sub는 변조된 토큰으로 취급합니다.
    pub fn user_id(&self) -> Result<i64, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// 액세스 토큰 + 리프레시 토큰 쌍.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// JWT 서명/검증 코덱.
///
/// 프로세스 시작 시 설정에서 한 번 구성되어 `AppState`로 주입됩니다.
/// 만료 비교는 엄격합니다 - 시계 오차 허용(leeway)이 0이므로
/// `now >= exp`인 토큰은 즉시 거부됩니다.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    /// 액세스 토큰 기본 수명 (초)
    access_ttl_secs: i64,
    /// 연장 수명 (초) - 리프레시 토큰은 항상 이 수명을 사용
    remember_ttl_secs: i64,
}

impl TokenCodec {
    /// 인증 설정에서 코덱 생성.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            access_ttl_secs: config.access_ttl_secs,
            remember_ttl_secs: config.remember_ttl_secs,
        }
    }

    /// 액세스 토큰 발급.
    ///
    /// `remember`가 true면 연장 수명을, 아니면 기본 수명을 사용합니다.
    pub fn issue_access(
        &self,
        user_id: i64,
        role: Role,
        remember: bool,
    ) -> Result<String, AuthError> {
        let ttl = if remember {
            self.remember_ttl_secs
        } else {
            self.access_ttl_secs
        };
        self.issue(Claims::new(user_id, role, ttl))
    }

    /// 리프레시 토큰 발급.
    ///
    /// 액세스 토큰의 수명 선택과 무관하게 항상 연장 수명을 사용합니다.
    /// 짧은 액세스 토큰보다 오래 살아야 조용한 갱신이 가능합니다.
    pub fn issue_refresh(&self, user_id: i64, role: Role) -> Result<String, AuthError> {
        self.issue(Claims::new(user_id, role, self.remember_ttl_secs))
    }

    /// 액세스 + 리프레시 토큰 쌍 발급.
    pub fn issue_pair(
        &self,
        user_id: i64,
        role: Role,
        remember: bool,
    ) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.issue_access(user_id, role, remember)?,
            refresh_token: self.issue_refresh(user_id, role)?,
        })
    }

    /// 토큰 검증 및 페이로드 추출.
    ///
    /// 서명 불일치, 형식 오류, 만료 모두 `InvalidToken`으로 수렴합니다.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    fn issue(&self, claims: Claims) -> Result<String, AuthError> {
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("token encoding failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn test_codec() -> TokenCodec {
        TokenCodec::new(&AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let codec = test_codec();

        let token = codec.issue_access(42, Role::User, false).unwrap();
        assert!(!token.is_empty());

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn test_remember_me_extends_expiry() {
        let codec = test_codec();

        let short = codec.issue_access(1, Role::User, false).unwrap();
        let long = codec.issue_access(1, Role::User, true).unwrap();

        let short_claims = codec.verify(&short).unwrap();
        let long_claims = codec.verify(&long).unwrap();

        // 같은 발급 시각 기준으로 remember 토큰의 만료가 엄격히 더 늦어야 한다
        assert!(long_claims.exp > short_claims.exp);
    }

    #[test]
    fn test_refresh_token_always_long_lived() {
        let codec = test_codec();

        let pair = codec.issue_pair(7, Role::Admin, false).unwrap();
        let access = codec.verify(&pair.access_token).unwrap();
        let refresh = codec.verify(&pair.refresh_token).unwrap();

        // remember=false여도 리프레시 토큰은 연장 수명
        assert!(refresh.exp > access.exp);
        assert_eq!(refresh.role, Role::Admin);
        assert_eq!(refresh.sub, access.sub);
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            access_ttl_secs: -10,
            ..Default::default()
        };
        let codec = TokenCodec::new(&config);

        let token = codec.issue_access(1, Role::User, false).unwrap();
        let result = codec.verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let codec = test_codec();
        let token = codec.issue_access(1, Role::User, false).unwrap();

        // 페이로드 구간을 변조
        let mut parts: Vec<&str> = token.split('.').collect();
        let tampered_payload = "eyJzdWIiOiI5OTkifQ";
        parts[1] = tampered_payload;
        let tampered = parts.join(".");

        assert!(matches!(
            codec.verify(&tampered),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let codec = test_codec();
        let token = codec.issue_access(1, Role::User, false).unwrap();

        let other = TokenCodec::new(&AuthConfig {
            jwt_secret: "another-secret-key-for-testing-minimum-32-chars".to_string(),
            ..Default::default()
        });
        assert!(matches!(other.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let codec = test_codec();
        assert!(matches!(
            codec.verify("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(codec.verify(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_non_numeric_sub_rejected() {
        let claims = Claims {
            sub: "alice".to_string(),
            role: Role::User,
            iat: 0,
            exp: i64::MAX,
        };
        assert!(matches!(claims.user_id(), Err(AuthError::InvalidToken)));
    }
}
