//! 결제 증빙 기록 타입.
//!
//! 외부 결제 게이트웨이 연동 없이, 사용자가 제출한 결제 증빙을
//! 관리자가 수동으로 검토하는 방식입니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 결제 수단.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx-support",
    sqlx(type_name = "payment_method", rename_all = "snake_case")
)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum PaymentMethod {
    /// 현금
    Cash,
    /// 계좌 이체
    BankTransfer,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::BankTransfer => "bank_transfer",
        };
        write!(f, "{}", s)
    }
}

/// 결제 증빙의 검토 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx-support",
    sqlx(type_name = "payment_status", rename_all = "lowercase")
)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum PaymentStatus {
    /// 검토 대기
    Pending,
    /// 승인됨
    Confirmed,
    /// 반려됨
    Rejected,
}

impl PaymentStatus {
    /// 문자열에서 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(PaymentStatus::Pending),
            "confirmed" => Some(PaymentStatus::Confirmed),
            "rejected" => Some(PaymentStatus::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Confirmed => "confirmed",
            PaymentStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

/// 결제 증빙 레코드.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Payment {
    pub id: i64,
    pub user_id: i64,
    pub booking_id: i64,
    /// 제출된 금액. 예약 총액과 일치해야 접수됩니다.
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    /// 증빙 이미지 URL
    pub proof_image: Option<String>,
    pub status: PaymentStatus,
    /// 관리자 검토 메모
    pub admin_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_serialization() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"bank_transfer\""
        );
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash).unwrap(), "\"cash\"");
    }

    #[test]
    fn test_payment_status_parse() {
        assert_eq!(PaymentStatus::parse("confirmed"), Some(PaymentStatus::Confirmed));
        assert_eq!(PaymentStatus::parse("REJECTED"), Some(PaymentStatus::Rejected));
        assert_eq!(PaymentStatus::parse("paid"), None);
    }
}
