//! 자격증명 저장소 구현.
//!
//! - [`PgCredentialStore`]: PostgreSQL 구현 (운영용)
//! - [`MemoryCredentialStore`]: 인메모리 구현 (DATABASE_URL 미설정 시
//!   개발 모드 및 테스트용)
//!
//! 이메일 중복 검사는 `INSERT .. ON CONFLICT DO NOTHING`으로 원자적으로
//! 수행합니다. 조회 후 삽입 방식은 동시 가입 요청에서 깨집니다.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use voyage_core::domain::{CredentialStore, NewUser, StoreError, User};

/// PostgreSQL 자격증명 저장소.
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// 연결 풀에서 저장소 생성.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(user.role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        created.ok_or(StoreError::EmailTaken)
    }
}

/// 사용자 집계 쿼리.
///
/// 인증 흐름 밖의 관리자 통계에서 사용합니다.
pub struct UserRepository;

impl UserRepository {
    /// 전체 사용자 수.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

/// 인메모리 자격증명 저장소.
///
/// 프로세스가 종료되면 데이터가 사라집니다. 데이터베이스 없이 서버를
/// 띄우는 개발 모드와 테스트에서 사용합니다.
pub struct MemoryCredentialStore {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self
            .users
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let users = self
            .users
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self
            .users
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        // 락 안에서 검사하므로 존재-시-실패가 원자적이다
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::EmailTaken);
        }

        let now = Utc::now();
        let created = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voyage_core::domain::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: "A".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_memory_store_create_and_find() {
        let store = MemoryCredentialStore::new();

        let user = store.create(new_user("a@x.com")).await.unwrap();
        assert_eq!(user.id, 1);

        let by_email = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);

        let by_id = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");

        assert!(store.find_by_email("b@x.com").await.unwrap().is_none());
        assert!(store.find_by_id(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_duplicate_email() {
        let store = MemoryCredentialStore::new();

        store.create(new_user("a@x.com")).await.unwrap();
        let result = store.create(new_user("a@x.com")).await;
        assert!(matches!(result, Err(StoreError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_memory_store_email_is_case_sensitive() {
        // 이메일 비교는 저장된 값과의 정확한 일치
        let store = MemoryCredentialStore::new();

        store.create(new_user("a@x.com")).await.unwrap();
        assert!(store.find_by_email("A@X.COM").await.unwrap().is_none());

        // 대소문자가 다른 이메일은 별도 계정으로 등록된다
        assert!(store.create(new_user("A@x.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_memory_store_ids_increment() {
        let store = MemoryCredentialStore::new();
        let first = store.create(new_user("a@x.com")).await.unwrap();
        let second = store.create(new_user("b@x.com")).await.unwrap();
        assert!(second.id > first.id);
    }
}
