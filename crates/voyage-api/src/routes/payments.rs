//! 결제 증빙 API 엔드포인트.
//!
//! 사용자가 결제 증빙을 제출하면 관리자가 수동으로 검토합니다.
//!
//! # 엔드포인트
//!
//! - `POST /api/payments` - 결제 증빙 제출
//! - `GET /api/payments/mine` - 내 결제 증빙 조회
//! - `GET /api/payments/booking/{bookingId}` - 예약별 결제 증빙 조회
//! - `PATCH /api/payments/{id}/status` - 검토 상태 변경 (관리자)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use voyage_core::domain::{Payment, PaymentMethod, PaymentStatus};

use super::{db_error, not_found, require_pool};
use crate::auth::{auth_gate, AdminUser, AuthUser};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::repository::{BookingRepository, NewPayment, PaymentRepository};
use crate::state::AppState;

/// 결제 증빙 제출 요청.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub booking_id: i64,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub proof_image: Option<String>,
}

/// 검토 상태 변경 요청 (관리자).
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
    #[serde(default)]
    pub admin_note: Option<String>,
}

/// 결제 증빙 제출.
///
/// 예약은 호출자 소유여야 하고, 금액은 예약 총액과 정확히 일치해야
/// 접수됩니다.
pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> ApiResult<(StatusCode, Json<Payment>)> {
    let pool = require_pool(&state)?;

    let booking = BookingRepository::get(pool, payload.booking_id)
        .await
        .map_err(db_error)?
        .filter(|b| b.user_id == user.user_id)
        .ok_or_else(|| {
            not_found(
                "BOOKING_NOT_FOUND",
                format!("예약 {}을 찾을 수 없습니다", payload.booking_id),
            )
        })?;

    if payload.amount != booking.total_price {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::simple(
                "INVALID_AMOUNT",
                "결제 금액이 예약 총액과 일치하지 않습니다",
            )),
        ));
    }

    let payment = PaymentRepository::create(
        pool,
        NewPayment {
            user_id: user.user_id,
            booking_id: booking.id,
            amount: payload.amount,
            payment_method: payload.payment_method,
            proof_image: payload.proof_image,
        },
    )
    .await
    .map_err(db_error)?;

    info!(
        payment_id = payment.id,
        user_id = user.user_id,
        booking_id = booking.id,
        "payment created"
    );
    Ok((StatusCode::CREATED, Json(payment)))
}

/// 내 결제 증빙 조회 (최신순).
pub async fn my_payments(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Payment>>> {
    let pool = require_pool(&state)?;
    let payments = PaymentRepository::list_by_user(pool, user.user_id)
        .await
        .map_err(db_error)?;
    Ok(Json(payments))
}

/// 예약별 결제 증빙 조회 (호출자 소유 범위).
pub async fn payments_by_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(booking_id): Path<i64>,
) -> ApiResult<Json<Vec<Payment>>> {
    let pool = require_pool(&state)?;
    let payments = PaymentRepository::list_by_booking(pool, booking_id, user.user_id)
        .await
        .map_err(db_error)?;
    Ok(Json(payments))
}

/// 검토 상태 변경 (관리자).
pub async fn update_payment_status(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePaymentStatusRequest>,
) -> ApiResult<Json<Payment>> {
    let pool = require_pool(&state)?;

    let existing = PaymentRepository::get(pool, id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("PAYMENT_NOT_FOUND", format!("결제 {}를 찾을 수 없습니다", id)))?;

    let payment = PaymentRepository::update_status(pool, id, payload.status, payload.admin_note)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("PAYMENT_NOT_FOUND", format!("결제 {}를 찾을 수 없습니다", id)))?;

    info!(
        payment_id = id,
        old_status = %existing.status,
        new_status = %payment.status,
        reviewed_by = admin.user_id,
        "payment status updated"
    );
    Ok(Json(payment))
}

/// 결제 라우터 생성. 전 엔드포인트 인증 필요.
pub fn payments_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_payment))
        .route("/mine", get(my_payments))
        .route("/booking/{bookingId}", get(payments_by_booking))
        .route("/{id}/status", patch(update_payment_status))
        .route_layer(middleware::from_fn_with_state(state, auth_gate))
}
