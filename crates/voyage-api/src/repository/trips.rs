//! 여행 상품 저장소.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};
use voyage_core::domain::Trip;

/// 가격이 양수인지 검증.
///
/// 참고: Option<Decimal> 필드에 사용 시 validator가 Some일 때만 호출하므로 &Decimal을 받음
fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("price_not_positive")
            .with_message("가격은 0보다 커야 합니다".into()))
    }
}

/// 신규 여행 상품 입력.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    #[validate(length(min = 1, message = "제목은 비워둘 수 없습니다"))]
    pub title: String,
    #[validate(length(min = 1, message = "설명은 비워둘 수 없습니다"))]
    pub description: String,
    #[validate(length(min = 1, message = "위치는 비워둘 수 없습니다"))]
    pub location: String,
    #[serde(default)]
    #[validate(url(message = "이미지 URL 형식이 올바르지 않습니다"))]
    pub image_url: Option<String>,
    pub start_date: DateTime<Utc>,
    #[validate(range(min = 1, message = "일정은 최소 1일 이상이어야 합니다"))]
    pub duration: i32,
    #[validate(custom(function = "validate_positive_price"))]
    pub price: Decimal,
    #[validate(range(min = 1, message = "최대 인원은 1명 이상이어야 합니다"))]
    pub capacity: i32,
    #[serde(default)]
    pub destination_id: Option<i64>,
}

/// 여행 상품 수정 입력. 지정된 필드만 갱신합니다.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTrip {
    #[serde(default)]
    #[validate(length(min = 1, message = "제목은 비워둘 수 없습니다"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "설명은 비워둘 수 없습니다"))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "위치는 비워둘 수 없습니다"))]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(url(message = "이미지 URL 형식이 올바르지 않습니다"))]
    pub image_url: Option<String>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(range(min = 1, message = "일정은 최소 1일 이상이어야 합니다"))]
    pub duration: Option<i32>,
    #[serde(default)]
    #[validate(custom(function = "validate_positive_price"))]
    pub price: Option<Decimal>,
    #[serde(default)]
    #[validate(range(min = 1, message = "최대 인원은 1명 이상이어야 합니다"))]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub destination_id: Option<i64>,
}

/// 여행 상품 저장소.
pub struct TripRepository;

impl TripRepository {
    /// 전체 상품 조회 (출발일 오름차순).
    pub async fn list(pool: &PgPool) -> Result<Vec<Trip>, sqlx::Error> {
        sqlx::query_as::<_, Trip>("SELECT * FROM trips ORDER BY start_date ASC")
            .fetch_all(pool)
            .await
    }

    /// 여행지에 속한 상품 조회.
    pub async fn list_by_destination(
        pool: &PgPool,
        destination_id: i64,
    ) -> Result<Vec<Trip>, sqlx::Error> {
        sqlx::query_as::<_, Trip>(
            "SELECT * FROM trips WHERE destination_id = $1 ORDER BY start_date ASC",
        )
        .bind(destination_id)
        .fetch_all(pool)
        .await
    }

    /// 단건 조회.
    pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Trip>, sqlx::Error> {
        sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 상품 생성.
    pub async fn create(
        pool: &PgPool,
        input: NewTrip,
        created_by_id: i64,
    ) -> Result<Trip, sqlx::Error> {
        sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (
                title, description, location, image_url,
                start_date, duration, price, capacity,
                destination_id, created_by_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.location)
        .bind(input.image_url.unwrap_or_default())
        .bind(input.start_date)
        .bind(input.duration)
        .bind(input.price)
        .bind(input.capacity)
        .bind(input.destination_id)
        .bind(created_by_id)
        .fetch_one(pool)
        .await
    }

    /// 상품 수정. 존재하지 않으면 None.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        input: UpdateTrip,
    ) -> Result<Option<Trip>, sqlx::Error> {
        sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                image_url = COALESCE($5, image_url),
                start_date = COALESCE($6, start_date),
                duration = COALESCE($7, duration),
                price = COALESCE($8, price),
                capacity = COALESCE($9, capacity),
                destination_id = COALESCE($10, destination_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.location)
        .bind(&input.image_url)
        .bind(input.start_date)
        .bind(input.duration)
        .bind(input.price)
        .bind(input.capacity)
        .bind(input.destination_id)
        .fetch_optional(pool)
        .await
    }

    /// 상품 삭제. 삭제된 행이 있으면 true.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trips WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// 전체 상품 수.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM trips")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
