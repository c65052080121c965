//! 여행 상품 API 엔드포인트.
//!
//! # 엔드포인트
//!
//! - `GET /api/trips` - 전체 상품 조회 (공개)
//! - `GET /api/trips/{id}` - 상품 상세 조회 (공개)
//! - `POST /api/trips` - 상품 생성 (관리자)
//! - `PUT /api/trips/{id}` - 상품 수정 (관리자)
//! - `DELETE /api/trips/{id}` - 상품 삭제 (관리자)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tracing::info;
use validator::Validate;
use voyage_core::domain::Trip;

use super::{db_error, not_found, require_pool};
use crate::auth::{auth_gate, AdminUser};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::repository::{NewTrip, TripRepository, UpdateTrip};
use crate::state::AppState;

/// 전체 상품 조회 (출발일 오름차순).
pub async fn list_trips(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Trip>>> {
    let pool = require_pool(&state)?;
    let trips = TripRepository::list(pool).await.map_err(db_error)?;
    Ok(Json(trips))
}

/// 상품 상세 조회.
pub async fn get_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Trip>> {
    let pool = require_pool(&state)?;
    let trip = TripRepository::get(pool, id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("TRIP_NOT_FOUND", format!("여행 상품 {}을 찾을 수 없습니다", id)))?;
    Ok(Json(trip))
}

/// 상품 생성 (관리자).
pub async fn create_trip(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<NewTrip>,
) -> ApiResult<(StatusCode, Json<Trip>)> {
    payload.validate().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::from_validation(&e)),
        )
    })?;

    let pool = require_pool(&state)?;
    let trip = TripRepository::create(pool, payload, admin.user_id)
        .await
        .map_err(db_error)?;

    info!(trip_id = trip.id, created_by = admin.user_id, "trip created");
    Ok((StatusCode::CREATED, Json(trip)))
}

/// 상품 수정 (관리자).
pub async fn update_trip(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTrip>,
) -> ApiResult<Json<Trip>> {
    payload.validate().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::from_validation(&e)),
        )
    })?;

    let pool = require_pool(&state)?;
    let trip = TripRepository::update(pool, id, payload)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("TRIP_NOT_FOUND", format!("여행 상품 {}을 찾을 수 없습니다", id)))?;

    info!(trip_id = id, updated_by = admin.user_id, "trip updated");
    Ok(Json(trip))
}

/// 상품 삭제 (관리자).
pub async fn delete_trip(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let pool = require_pool(&state)?;
    let deleted = TripRepository::delete(pool, id).await.map_err(db_error)?;
    if !deleted {
        return Err(not_found(
            "TRIP_NOT_FOUND",
            format!("여행 상품 {}을 찾을 수 없습니다", id),
        ));
    }

    info!(trip_id = id, deleted_by = admin.user_id, "trip deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 여행 상품 라우터 생성.
///
/// 조회는 공개, 변경은 인증 게이트 + 관리자 검사를 거칩니다.
pub fn trips_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/", post(create_trip))
        .route("/{id}", put(update_trip).delete(delete_trip))
        .route_layer(middleware::from_fn_with_state(state, auth_gate));

    Router::new()
        .route("/", get(list_trips))
        .route("/{id}", get(get_trip))
        .merge(protected)
}
