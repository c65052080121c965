//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! TOML 파일 및 `VOYAGE__` 접두사의 환경 변수에서 로드할 수 있으며,
//! 파일이 없는 배포 환경을 위해 개별 환경 변수 오버라이드도 지원합니다.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::error::VoyageError;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 인증 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 에러를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// 연결 URL (미설정 시 인메모리 자격증명 저장소로 동작)
    #[serde(default)]
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connection_timeout_secs: 10,
        }
    }
}

/// 인증 설정.
///
/// 토큰 서명 키와 두 가지 토큰 수명을 정의합니다.
/// 액세스 토큰은 기본 수명을, "로그인 유지"(remember me) 요청 시에는
/// 연장 수명을 사용합니다. 리프레시 토큰은 항상 연장 수명을 사용합니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT 서명 비밀 키
    pub jwt_secret: String,
    /// 액세스 토큰 기본 수명 (초, 기본 1일)
    pub access_ttl_secs: i64,
    /// 연장 수명 (초, 기본 30일) - 리프레시 토큰 및 remember me 액세스 토큰
    pub remember_ttl_secs: i64,
    /// 리프레시 쿠키에 Secure 플래그를 설정할지 여부 (운영 환경에서 true)
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "dev-secret-key-change-in-production".to_string(),
            access_ttl_secs: 86_400,
            remember_ttl_secs: 2_592_000,
            cookie_secure: false,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, VoyageError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 4000)?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("VOYAGE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize::<AppConfig>()?)
    }

    /// 설정 파일이 있으면 로드하고, 없으면 기본값 + 환경 변수로 구성합니다.
    ///
    /// 컨테이너 배포처럼 파일 없이 환경 변수만으로 구동하는 경우를 지원합니다.
    pub fn load_or_env<P: AsRef<Path>>(path: P) -> Result<Self, VoyageError> {
        let mut config = if path.as_ref().exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// 개별 환경 변수 오버라이드를 적용합니다.
    ///
    /// `API_HOST`, `API_PORT`, `DATABASE_URL`, `JWT_SECRET`,
    /// `JWT_EXPIRES_IN_SECS`, `JWT_EXPIRES_IN_REMEMBER_SECS`, `COOKIE_SECURE`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("API_PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(ttl) = std::env::var("JWT_EXPIRES_IN_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.auth.access_ttl_secs = ttl;
        }
        if let Some(ttl) = std::env::var("JWT_EXPIRES_IN_REMEMBER_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.auth.remember_ttl_secs = ttl;
        }
        if let Ok(secure) = std::env::var("COOKIE_SECURE") {
            self.auth.cookie_secure = secure == "true" || secure == "1";
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.auth.access_ttl_secs, 86_400);
        assert_eq!(config.auth.remember_ttl_secs, 2_592_000);
        assert!(!config.auth.cookie_secure);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_remember_ttl_longer_than_access_ttl() {
        // 리프레시 토큰이 액세스 토큰보다 오래 살아야 조용한 갱신이 가능하다
        let config = AuthConfig::default();
        assert!(config.remember_ttl_secs > config.access_ttl_secs);
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig::default();
        let addr = server.socket_addr().unwrap();
        assert_eq!(addr.port(), 4000);
    }

    #[test]
    fn test_load_or_env_missing_file() {
        let config = AppConfig::load_or_env("does/not/exist.toml").unwrap();
        assert_eq!(config.server.port, 4000);
    }
}
