//! 사용자 및 자격증명 저장소.
//!
//! 이 모듈은 다음을 정의합니다:
//! - `Role` - 사용자 역할 (닫힌 열거형, 문자열 비교 금지)
//! - `User` - 저장된 사용자 레코드 (비밀번호 해시 포함, 직렬화 불가)
//! - `PublicUser` - API 응답에 노출되는 공개 필드
//! - `CredentialStore` - 자격증명 저장소 추상화

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 사용자 역할.
///
/// 역할 검사는 항상 이 열거형의 패턴 매칭으로 수행합니다.
/// 대소문자를 구분하지 않는 문자열 비교는 정책 버그의 원인이 되므로
/// 문자열은 저장소 경계에서만 다룹니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx-support",
    sqlx(type_name = "user_role", rename_all = "lowercase")
)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum Role {
    /// 일반 사용자 - 예약/결제 생성 권한
    User,
    /// 관리자 - 카탈로그 및 결제 검토 권한
    Admin,
}

impl Role {
    /// 문자열에서 역할 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// 관리자 여부.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::User => "user",
            Role::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

/// 저장된 사용자 레코드.
///
/// 비밀번호 해시를 포함하므로 의도적으로 `Serialize`를 구현하지 않습니다.
/// API 응답에는 [`PublicUser`]를 사용합니다.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API 응답에 노출되는 사용자 공개 필드.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

/// 신규 사용자 생성 입력.
///
/// `password_hash`는 이미 해싱된 값이어야 합니다. 평문 비밀번호는
/// 이 타입에 닿기 전에 핸들러 계층에서 해싱됩니다.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
}

/// 자격증명 저장소 에러.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 이메일 중복 (create 시 원자적 존재 검사에서 발생)
    #[error("이미 사용 중인 이메일입니다")]
    EmailTaken,

    /// 백엔드 에러 (연결 실패, 쿼리 실패 등)
    #[error("저장소 백엔드 에러: {0}")]
    Backend(String),
}

/// 자격증명 저장소 추상화.
///
/// 인증 흐름이 사용자 레코드에 접근하는 유일한 통로입니다.
/// 이메일 조회는 저장된 값과의 대소문자 구분 일치로 동작합니다.
/// `create`의 존재-시-실패 원자성은 구현체가 보장합니다.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 이메일로 사용자 조회.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// ID로 사용자 조회.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// 사용자 생성. 이메일이 이미 존재하면 `StoreError::EmailTaken`.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("Admin"), Some(Role::Admin));
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");

        let parsed: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, Role::User);
    }

    #[test]
    fn test_role_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[test]
    fn test_public_user_excludes_password_hash() {
        let user = User {
            id: 1,
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            name: "A".to_string(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let public = PublicUser::from(&user);
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
        assert!(json.contains(r#""email":"a@x.com""#));
        assert!(json.contains(r#""role":"user""#));
    }
}
