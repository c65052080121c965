//! 여행지 타입.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 여행지 엔티티.
///
/// 이름은 카탈로그 전체에서 유일합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Destination {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
