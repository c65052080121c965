//! 여행지 API 엔드포인트.
//!
//! # 엔드포인트
//!
//! - `GET /api/destinations` - 전체 여행지 조회 (공개)
//! - `GET /api/destinations/{id}` - 여행지 상세 조회 (공개)
//! - `GET /api/destinations/{id}/trips` - 여행지의 상품 조회 (공개)
//! - `POST /api/destinations` - 여행지 생성 (관리자)
//! - `PUT /api/destinations/{id}` - 여행지 수정 (관리자)
//! - `DELETE /api/destinations/{id}` - 여행지 삭제 (관리자)

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
use voyage_core::domain::{Destination, Trip};

use super::{db_error, not_found, require_pool};
use crate::auth::{auth_gate, AdminUser};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::repository::{DestinationRepository, NewDestination, TripRepository, UpdateDestination};
use crate::state::AppState;

/// 전체 여행지 조회.
pub async fn list_destinations(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Destination>>> {
    let pool = require_pool(&state)?;
    let destinations = DestinationRepository::list(pool).await.map_err(db_error)?;
    Ok(Json(destinations))
}

/// 여행지 상세 조회.
pub async fn get_destination(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Destination>> {
    let pool = require_pool(&state)?;
    let destination = DestinationRepository::get(pool, id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| {
            not_found(
                "DESTINATION_NOT_FOUND",
                format!("여행지 {}를 찾을 수 없습니다", id),
            )
        })?;
    Ok(Json(destination))
}

/// 여행지에 속한 상품 조회.
pub async fn destination_trips(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Trip>>> {
    let pool = require_pool(&state)?;
    let trips = TripRepository::list_by_destination(pool, id)
        .await
        .map_err(db_error)?;
    Ok(Json(trips))
}

/// 여행지 생성 (관리자).
pub async fn create_destination(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<NewDestination>,
) -> ApiResult<(StatusCode, Json<Destination>)> {
    payload.validate().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::from_validation(&e)),
        )
    })?;

    let pool = require_pool(&state)?;
    let name = payload.name.clone();
    let destination = DestinationRepository::create(pool, payload)
        .await
        .map_err(db_error)?
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiErrorResponse::simple(
                    "DESTINATION_EXISTS",
                    format!("이미 등록된 여행지 이름입니다: {}", name),
                )),
            )
        })?;

    info!(
        destination_id = destination.id,
        created_by = admin.user_id,
        "destination created"
    );
    Ok((StatusCode::CREATED, Json(destination)))
}

/// 여행지 수정 (관리자).
pub async fn update_destination(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateDestination>,
) -> ApiResult<Json<Destination>> {
    payload.validate().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::from_validation(&e)),
        )
    })?;

    let pool = require_pool(&state)?;
    let destination = DestinationRepository::update(pool, id, payload)
        .await
        .map_err(db_error)?
        .ok_or_else(|| {
            not_found(
                "DESTINATION_NOT_FOUND",
                format!("여행지 {}를 찾을 수 없습니다", id),
            )
        })?;

    info!(destination_id = id, updated_by = admin.user_id, "destination updated");
    Ok(Json(destination))
}

/// 여행지 삭제 (관리자).
pub async fn delete_destination(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let pool = require_pool(&state)?;
    let deleted = DestinationRepository::delete(pool, id)
        .await
        .map_err(db_error)?;
    if !deleted {
        return Err(not_found(
            "DESTINATION_NOT_FOUND",
            format!("여행지 {}를 찾을 수 없습니다", id),
        ));
    }

    info!(destination_id = id, deleted_by = admin.user_id, "destination deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// 여행지 라우터 생성.
pub fn destinations_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/", post(create_destination))
        .route("/{id}", put(update_destination).delete(delete_destination))
        .route_layer(middleware::from_fn_with_state(state, auth_gate));

    Router::new()
        .route("/", get(list_destinations))
        .route("/{id}", get(get_destination))
        .route("/{id}/trips", get(destination_trips))
        .merge(protected)
}
