//! 여행 예약 시스템의 에러 타입.
//!
//! 이 모듈은 시스템 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum VoyageError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 저장소 에러
    #[error("저장소 에러: {0}")]
    Store(String),

    /// 인증 에러
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 도메인 작업을 위한 Result 타입.
pub type VoyageResult<T> = Result<T, VoyageError>;

impl VoyageError {
    /// 호출자 잘못으로 분류되는 에러인지 확인합니다.
    ///
    /// HTTP 경계에서 4xx로 매핑할지 판단할 때 사용합니다.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            VoyageError::Auth(_) | VoyageError::InvalidInput(_) | VoyageError::NotFound(_)
        )
    }
}

impl From<config::ConfigError> for VoyageError {
    fn from(err: config::ConfigError) -> Self {
        VoyageError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(VoyageError::Auth("bad token".to_string()).is_client_error());
        assert!(VoyageError::NotFound("trip 42".to_string()).is_client_error());
        assert!(!VoyageError::Store("connection refused".to_string()).is_client_error());
        assert!(!VoyageError::Internal("panic".to_string()).is_client_error());
    }

    #[test]
    fn test_error_display() {
        let err = VoyageError::Config("missing JWT_SECRET".to_string());
        assert_eq!(err.to_string(), "설정 에러: missing JWT_SECRET");
    }
}
