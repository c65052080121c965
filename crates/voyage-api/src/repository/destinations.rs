//! 여행지 저장소.
//!
//! 여행지 이름은 유일합니다. 중복 검사는 `ON CONFLICT DO NOTHING`으로
//! 원자적으로 수행합니다.

use serde::Deserialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use validator::Validate;
use voyage_core::domain::Destination;

/// 신규 여행지 입력.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewDestination {
    #[validate(length(min = 1, message = "이름은 비워둘 수 없습니다"))]
    pub name: String,
    #[validate(length(min = 1, message = "설명은 비워둘 수 없습니다"))]
    pub description: String,
    #[validate(url(message = "이미지 URL 형식이 올바르지 않습니다"))]
    pub image_url: String,
    #[validate(length(min = 1, message = "국가는 비워둘 수 없습니다"))]
    pub country: String,
}

/// 여행지 수정 입력.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDestination {
    #[serde(default)]
    #[validate(length(min = 1, message = "이름은 비워둘 수 없습니다"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "설명은 비워둘 수 없습니다"))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(url(message = "이미지 URL 형식이 올바르지 않습니다"))]
    pub image_url: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "국가는 비워둘 수 없습니다"))]
    pub country: Option<String>,
}

/// 여행지 저장소.
pub struct DestinationRepository;

impl DestinationRepository {
    /// 전체 여행지 조회.
    pub async fn list(pool: &PgPool) -> Result<Vec<Destination>, sqlx::Error> {
        sqlx::query_as::<_, Destination>("SELECT * FROM destinations ORDER BY name")
            .fetch_all(pool)
            .await
    }

    /// 단건 조회.
    pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Destination>, sqlx::Error> {
        sqlx::query_as::<_, Destination>("SELECT * FROM destinations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 여행지 생성. 이름이 이미 존재하면 None.
    pub async fn create(
        pool: &PgPool,
        input: NewDestination,
    ) -> Result<Option<Destination>, sqlx::Error> {
        sqlx::query_as::<_, Destination>(
            r#"
            INSERT INTO destinations (name, description, image_url, country)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (name) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(&input.country)
        .fetch_optional(pool)
        .await
    }

    /// 여행지 수정. 존재하지 않으면 None.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        input: UpdateDestination,
    ) -> Result<Option<Destination>, sqlx::Error> {
        sqlx::query_as::<_, Destination>(
            r#"
            UPDATE destinations SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                country = COALESCE($5, country),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(&input.country)
        .fetch_optional(pool)
        .await
    }

    /// 여행지 삭제. 삭제된 행이 있으면 true.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM destinations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
