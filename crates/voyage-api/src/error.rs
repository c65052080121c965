//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// 통합 API 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "EMAIL_IN_USE",
///   "message": "이미 사용 중인 이메일입니다",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_CREDENTIALS", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 상세 정보 포함 에러 생성.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }

    /// 타임스탬프 없는 간단한 에러.
    pub fn simple(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: None,
        }
    }

    /// 요청 본문 검증 실패 에러.
    ///
    /// 필드별 위반 내역을 `details`에 담아 반환합니다.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let details = serde_json::to_value(errors).unwrap_or(Value::Null);
        Self::with_details("VALIDATION_FAILED", "요청 본문이 유효하지 않습니다", details)
    }

    /// 에러 코드 반환.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 에러 메시지 반환.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
///
/// # Example
///
/// ```ignore
/// async fn get_trip(
///     Path(id): Path<i64>,
///     State(state): State<Arc<AppState>>,
/// ) -> ApiResult<Json<Trip>> {
///     let trip = TripRepository::get(pool, id)
///         .await
///         .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiErrorResponse::new("DB_ERROR", e.to_string()))))?
///         .ok_or_else(|| (StatusCode::NOT_FOUND, Json(ApiErrorResponse::new("TRIP_NOT_FOUND", format!("Trip {} not found", id)))))?;
///
///     Ok(Json(trip))
/// }
/// ```
pub type ApiResult<T> = Result<T, (axum::http::StatusCode, axum::Json<ApiErrorResponse>)>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_api_error_response_new() {
        let error = ApiErrorResponse::new("TEST_ERROR", "Test message");
        assert_eq!(error.code, "TEST_ERROR");
        assert_eq!(error.message, "Test message");
        assert!(error.timestamp.is_some());
        assert!(error.details.is_none());
    }

    #[test]
    fn test_api_error_response_simple() {
        let error = ApiErrorResponse::simple("TEST_ERROR", "Test message");
        assert!(error.timestamp.is_none());
        assert!(error.details.is_none());
    }

    #[test]
    fn test_json_serialization_simple() {
        let error = ApiErrorResponse::simple("NOT_FOUND", "Resource not found");
        let json = serde_json::to_string(&error).unwrap();

        assert!(!json.contains("timestamp"));
        assert!(!json.contains("details"));
        assert!(json.contains(r#""code":"NOT_FOUND""#));
        assert!(json.contains(r#""message":"Resource not found""#));
    }

    #[test]
    fn test_from_validation() {
        #[derive(Validate)]
        struct Payload {
            #[validate(length(min = 6))]
            password: String,
        }

        let payload = Payload {
            password: "abc".to_string(),
        };
        let errors = payload.validate().unwrap_err();
        let error = ApiErrorResponse::from_validation(&errors);

        assert_eq!(error.code, "VALIDATION_FAILED");
        let details = error.details.unwrap();
        assert!(details.to_string().contains("password"));
    }
}
