//! 예약 API 엔드포인트.
//!
//! 모든 예약 엔드포인트는 인증이 필요합니다.
//!
//! # 엔드포인트
//!
//! - `POST /api/bookings` - 예약 생성
//! - `GET /api/bookings` - 내 예약 조회
//! - `DELETE /api/bookings/{id}` - 예약 취소

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;
use voyage_core::domain::Booking;

use super::{db_error, not_found, require_pool};
use crate::auth::{auth_gate, AuthUser};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::repository::{BookingRepository, NewBooking, TripRepository};
use crate::state::AppState;

/// 예약 생성 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub trip_id: i64,
    #[validate(range(min = 1, message = "인원은 1명 이상이어야 합니다"))]
    pub guests: i32,
    #[serde(default)]
    pub special_requirements: Option<String>,
}

/// 예약 생성.
///
/// 총액은 예약 시점의 상품 가격 × 인원으로 계산되어 저장됩니다.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<Booking>)> {
    payload.validate().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::from_validation(&e)),
        )
    })?;

    let pool = require_pool(&state)?;

    let trip = TripRepository::get(pool, payload.trip_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| {
            not_found(
                "TRIP_NOT_FOUND",
                format!("여행 상품 {}을 찾을 수 없습니다", payload.trip_id),
            )
        })?;

    let booking = BookingRepository::create(
        pool,
        NewBooking {
            user_id: user.user_id,
            trip_id: trip.id,
            guests: payload.guests,
            total_price: trip.total_price(payload.guests),
            special_requirements: payload.special_requirements,
        },
    )
    .await
    .map_err(db_error)?;

    info!(
        booking_id = booking.id,
        user_id = user.user_id,
        trip_id = trip.id,
        guests = payload.guests,
        "booking created"
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

/// 내 예약 조회 (최신순).
pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<Json<Vec<Booking>>> {
    let pool = require_pool(&state)?;
    let bookings = BookingRepository::list_by_user(pool, user.user_id)
        .await
        .map_err(db_error)?;
    Ok(Json(bookings))
}

/// 예약 취소.
///
/// 소유자만 취소할 수 있습니다. 다른 사용자의 예약은 존재 여부를
/// 노출하지 않기 위해 404로 처리합니다. 미결제 예약은 취소와 동시에
/// 환불 처리됩니다.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Booking>> {
    let pool = require_pool(&state)?;

    let booking = BookingRepository::get(pool, id)
        .await
        .map_err(db_error)?
        .filter(|b| b.user_id == user.user_id)
        .ok_or_else(|| not_found("BOOKING_NOT_FOUND", format!("예약 {}을 찾을 수 없습니다", id)))?;

    if !booking.status.is_cancellable() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::simple(
                "ALREADY_CANCELLED",
                "이미 취소된 예약입니다",
            )),
        ));
    }

    let cancelled = BookingRepository::cancel(pool, id, booking.payment_state_on_cancel())
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("BOOKING_NOT_FOUND", format!("예약 {}을 찾을 수 없습니다", id)))?;

    info!(booking_id = id, user_id = user.user_id, "booking cancelled");
    Ok(Json(cancelled))
}

/// 예약 라우터 생성. 전 엔드포인트 인증 필요.
pub fn bookings_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(my_bookings).post(create_booking))
        .route("/{id}", delete(cancel_booking))
        .route_layer(middleware::from_fn_with_state(state, auth_gate))
}
