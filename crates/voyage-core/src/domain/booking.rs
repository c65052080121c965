//! 예약 타입 및 상태 전이 규칙.
//!
//! 이 모듈은 예약의 두 상태 축을 정의합니다:
//! - `BookingStatus` - 예약 자체의 상태 (pending → confirmed / cancelled)
//! - `PaymentState` - 예약 금액의 정산 상태 (pending → paid / refunded)
//!
//! 전이 규칙은 열거형 메서드로 고정되어 있으며, 핸들러는 이 메서드를
//! 통해서만 상태를 변경합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 예약 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx-support",
    sqlx(type_name = "booking_status", rename_all = "lowercase")
)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum BookingStatus {
    /// 접수됨 - 관리자 확정 대기
    Pending,
    /// 확정됨
    Confirmed,
    /// 취소됨 - 최종 상태
    Cancelled,
}

impl BookingStatus {
    /// 해당 상태로의 전이가 허용되는지 확인.
    ///
    /// `Cancelled`는 최종 상태이므로 어떤 상태로도 되돌릴 수 없습니다.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        match self {
            BookingStatus::Cancelled => next == BookingStatus::Cancelled,
            BookingStatus::Pending | BookingStatus::Confirmed => true,
        }
    }

    /// 취소 가능한 상태인지 확인.
    pub fn is_cancellable(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    /// 문자열에서 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// 예약 금액의 정산 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx-support",
    sqlx(type_name = "payment_state", rename_all = "lowercase")
)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum PaymentState {
    /// 미결제
    Pending,
    /// 결제 완료
    Paid,
    /// 환불됨
    Refunded,
}

impl PaymentState {
    /// 취소된 예약에서 허용되는 정산 상태인지 확인.
    ///
    /// 취소된 예약의 정산 상태는 `Refunded`로만 변경할 수 있습니다.
    pub fn allowed_after_cancellation(&self) -> bool {
        matches!(self, PaymentState::Refunded)
    }

    /// 문자열에서 파싱.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(PaymentState::Pending),
            "paid" => Some(PaymentState::Paid),
            "refunded" => Some(PaymentState::Refunded),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentState::Pending => "pending",
            PaymentState::Paid => "paid",
            PaymentState::Refunded => "refunded",
        };
        write!(f, "{}", s)
    }
}

/// 예약 엔티티.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub trip_id: i64,
    pub guests: i32,
    /// 예약 시점의 `trip.price * guests`
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub payment_state: PaymentState,
    pub booking_date: DateTime<Utc>,
    pub special_requirements: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// 취소 시 적용될 정산 상태를 계산합니다.
    ///
    /// 미결제 예약은 취소와 동시에 환불 처리되고,
    /// 이미 결제/환불된 예약은 정산 상태를 유지합니다.
    pub fn payment_state_on_cancel(&self) -> PaymentState {
        match self.payment_state {
            PaymentState::Pending => PaymentState::Refunded,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_booking(status: BookingStatus, payment_state: PaymentState) -> Booking {
        Booking {
            id: 1,
            user_id: 1,
            trip_id: 1,
            guests: 2,
            total_price: dec!(3000),
            status,
            payment_state,
            booking_date: Utc::now(),
            special_requirements: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_cancelled_is_terminal() {
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Cancelled.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn test_active_statuses_can_transition() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn test_is_cancellable() {
        assert!(BookingStatus::Pending.is_cancellable());
        assert!(BookingStatus::Confirmed.is_cancellable());
        assert!(!BookingStatus::Cancelled.is_cancellable());
    }

    #[test]
    fn test_payment_state_after_cancellation() {
        assert!(PaymentState::Refunded.allowed_after_cancellation());
        assert!(!PaymentState::Pending.allowed_after_cancellation());
        assert!(!PaymentState::Paid.allowed_after_cancellation());
    }

    #[test]
    fn test_payment_state_on_cancel() {
        // 미결제 → 환불, 결제 완료는 유지
        let pending = sample_booking(BookingStatus::Pending, PaymentState::Pending);
        assert_eq!(pending.payment_state_on_cancel(), PaymentState::Refunded);

        let paid = sample_booking(BookingStatus::Confirmed, PaymentState::Paid);
        assert_eq!(paid.payment_state_on_cancel(), PaymentState::Paid);
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!(BookingStatus::parse("Confirmed"), Some(BookingStatus::Confirmed));
        assert_eq!(BookingStatus::parse("unknown"), None);
        assert_eq!(BookingStatus::Cancelled.to_string(), "cancelled");
        assert_eq!(PaymentState::parse("refunded"), Some(PaymentState::Refunded));
        assert_eq!(PaymentState::Paid.to_string(), "paid");
    }
}
