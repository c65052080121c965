//! 관리자 API 엔드포인트.
//!
//! 전 엔드포인트가 인증 게이트 + 관리자 역할 검사를 거칩니다.
//!
//! # 엔드포인트
//!
//! - `GET /api/admin/stats` - 대시보드 통계
//! - `GET /api/admin/bookings` - 전체 예약 조회
//! - `PATCH /api/admin/bookings/{id}/status` - 예약 상태 변경
//! - `PATCH /api/admin/bookings/{id}/payment-status` - 정산 상태 변경
//! - `DELETE /api/admin/bookings/{id}` - 예약 삭제
//! - `GET /api/admin/payments` - 전체 결제 증빙 조회
//! - `GET /api/admin/payments/status/{status}` - 상태별 결제 증빙 조회
//! - `GET /api/admin/payments/stats` - 결제 통계

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get, patch},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use voyage_core::domain::{Booking, BookingStatus, Payment, PaymentState, PaymentStatus};

use super::{db_error, not_found, require_pool};
use crate::auth::{auth_gate, AdminUser};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::repository::{BookingRepository, PaymentRepository, TripRepository, UserRepository};
use crate::state::AppState;

// ==================== 요청/응답 타입 ====================

/// 예약 상태 변경 요청.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

/// 정산 상태 변경 요청.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingPaymentStateRequest {
    pub payment_status: PaymentState,
}

/// 대시보드 통계.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_trips: i64,
    pub total_bookings: i64,
    pub pending_bookings: i64,
    pub confirmed_bookings: i64,
    pub cancelled_bookings: i64,
    pub pending_payments: i64,
    pub confirmed_payments: i64,
    pub rejected_payments: i64,
    /// 승인된 결제 총액
    pub confirmed_revenue: Decimal,
}

/// 결제 통계.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStats {
    pub pending: i64,
    pub confirmed: i64,
    pub rejected: i64,
    pub confirmed_total: Decimal,
}

// ==================== 핸들러 ====================

/// 대시보드 통계 조회.
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<Json<DashboardStats>> {
    let pool = require_pool(&state)?;

    let total_users = UserRepository::count(pool).await.map_err(db_error)?;
    let total_trips = TripRepository::count(pool).await.map_err(db_error)?;
    let booking_counts = BookingRepository::count_by_status(pool)
        .await
        .map_err(db_error)?;
    let payment_counts = PaymentRepository::count_by_status(pool)
        .await
        .map_err(db_error)?;
    let confirmed_revenue = PaymentRepository::confirmed_total(pool)
        .await
        .map_err(db_error)?;

    let booking_count = |status: BookingStatus| {
        booking_counts
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap_or(0)
    };
    let payment_count = |status: PaymentStatus| {
        payment_counts
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap_or(0)
    };

    Ok(Json(DashboardStats {
        total_users,
        total_trips,
        total_bookings: booking_counts.iter().map(|c| c.count).sum(),
        pending_bookings: booking_count(BookingStatus::Pending),
        confirmed_bookings: booking_count(BookingStatus::Confirmed),
        cancelled_bookings: booking_count(BookingStatus::Cancelled),
        pending_payments: payment_count(PaymentStatus::Pending),
        confirmed_payments: payment_count(PaymentStatus::Confirmed),
        rejected_payments: payment_count(PaymentStatus::Rejected),
        confirmed_revenue,
    }))
}

/// 전체 예약 조회.
pub async fn list_all_bookings(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<Json<Vec<Booking>>> {
    let pool = require_pool(&state)?;
    let bookings = BookingRepository::list_all(pool).await.map_err(db_error)?;
    Ok(Json(bookings))
}

/// 예약 상태 변경.
///
/// 취소된 예약은 최종 상태이므로 다른 상태로 되돌릴 수 없습니다.
pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> ApiResult<Json<Booking>> {
    let pool = require_pool(&state)?;

    let booking = BookingRepository::get(pool, id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("BOOKING_NOT_FOUND", format!("예약 {}을 찾을 수 없습니다", id)))?;

    if !booking.status.can_transition_to(payload.status) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::simple(
                "INVALID_TRANSITION",
                "취소된 예약의 상태는 변경할 수 없습니다",
            )),
        ));
    }

    let updated = BookingRepository::update_status(pool, id, payload.status)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("BOOKING_NOT_FOUND", format!("예약 {}을 찾을 수 없습니다", id)))?;

    info!(
        booking_id = id,
        status = %payload.status,
        updated_by = admin.user_id,
        "booking status updated"
    );
    Ok(Json(updated))
}

/// 정산 상태 변경.
///
/// 취소된 예약의 정산 상태는 환불로만 변경할 수 있습니다.
pub async fn update_booking_payment_state(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateBookingPaymentStateRequest>,
) -> ApiResult<Json<Booking>> {
    let pool = require_pool(&state)?;

    let booking = BookingRepository::get(pool, id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("BOOKING_NOT_FOUND", format!("예약 {}을 찾을 수 없습니다", id)))?;

    if booking.status == BookingStatus::Cancelled
        && !payload.payment_status.allowed_after_cancellation()
    {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::simple(
                "INVALID_TRANSITION",
                "취소된 예약의 정산 상태는 환불로만 변경할 수 있습니다",
            )),
        ));
    }

    let updated = BookingRepository::update_payment_state(pool, id, payload.payment_status)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("BOOKING_NOT_FOUND", format!("예약 {}을 찾을 수 없습니다", id)))?;

    info!(
        booking_id = id,
        payment_state = %payload.payment_status,
        updated_by = admin.user_id,
        "booking payment state updated"
    );
    Ok(Json(updated))
}

/// 예약 삭제.
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let pool = require_pool(&state)?;
    let deleted = BookingRepository::delete(pool, id).await.map_err(db_error)?;
    if !deleted {
        return Err(not_found(
            "BOOKING_NOT_FOUND",
            format!("예약 {}을 찾을 수 없습니다", id),
        ));
    }

    info!(booking_id = id, deleted_by = admin.user_id, "booking deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 전체 결제 증빙 조회.
pub async fn list_all_payments(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<Json<Vec<Payment>>> {
    let pool = require_pool(&state)?;
    let payments = PaymentRepository::list_all(pool).await.map_err(db_error)?;
    Ok(Json(payments))
}

/// 상태별 결제 증빙 조회.
pub async fn payments_by_status(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
    Path(status): Path<String>,
) -> ApiResult<Json<Vec<Payment>>> {
    let status = PaymentStatus::parse(&status).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::simple(
                "INVALID_STATUS",
                format!("유효하지 않은 결제 상태입니다: {}", status),
            )),
        )
    })?;

    let pool = require_pool(&state)?;
    let payments = PaymentRepository::list_by_status(pool, status)
        .await
        .map_err(db_error)?;
    Ok(Json(payments))
}

/// 결제 통계 조회.
pub async fn payment_stats(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<Json<PaymentStats>> {
    let pool = require_pool(&state)?;

    let counts = PaymentRepository::count_by_status(pool)
        .await
        .map_err(db_error)?;
    let confirmed_total = PaymentRepository::confirmed_total(pool)
        .await
        .map_err(db_error)?;

    let count = |status: PaymentStatus| {
        counts
            .iter()
            .find(|c| c.status == status)
            .map(|c| c.count)
            .unwrap_or(0)
    };

    Ok(Json(PaymentStats {
        pending: count(PaymentStatus::Pending),
        confirmed: count(PaymentStatus::Confirmed),
        rejected: count(PaymentStatus::Rejected),
        confirmed_total,
    }))
}

/// 관리자 라우터 생성. 전 엔드포인트 인증 + 관리자 역할 필요.
pub fn admin_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/stats", get(dashboard_stats))
        .route("/bookings", get(list_all_bookings))
        .route("/bookings/{id}/status", patch(update_booking_status))
        .route(
            "/bookings/{id}/payment-status",
            patch(update_booking_payment_state),
        )
        .route("/bookings/{id}", delete(delete_booking))
        .route("/payments", get(list_all_payments))
        .route("/payments/status/{status}", get(payments_by_status))
        .route("/payments/stats", get(payment_stats))
        .route_layer(middleware::from_fn_with_state(state, auth_gate))
}
