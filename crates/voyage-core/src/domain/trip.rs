//! 여행 상품(트립) 타입.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 여행 상품 엔티티.
///
/// 가격은 1인 기준이며, 예약 시 인원수와 곱해 총액을 계산합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Trip {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    /// 대표 이미지 URL (미지정 시 빈 문자열)
    pub image_url: String,
    pub start_date: DateTime<Utc>,
    /// 일정 길이 (일)
    pub duration: i32,
    /// 1인 가격
    pub price: Decimal,
    /// 최대 인원
    pub capacity: i32,
    pub destination_id: Option<i64>,
    pub created_by_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// 인원수에 대한 총액 계산.
    pub fn total_price(&self, guests: i32) -> Decimal {
        self.price * Decimal::from(guests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_trip(price: Decimal) -> Trip {
        Trip {
            id: 1,
            title: "Paris Adventure".to_string(),
            description: "Experience the best of Paris".to_string(),
            location: "Paris".to_string(),
            image_url: String::new(),
            start_date: Utc::now(),
            duration: 7,
            price,
            capacity: 10,
            destination_id: Some(1),
            created_by_id: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_total_price() {
        let trip = sample_trip(dec!(1500));
        assert_eq!(trip.total_price(1), dec!(1500));
        assert_eq!(trip.total_price(4), dec!(6000));
    }

    #[test]
    fn test_trip_json_is_camel_case() {
        let trip = sample_trip(dec!(100));
        let json = serde_json::to_string(&trip).unwrap();
        assert!(json.contains("imageUrl"));
        assert!(json.contains("startDate"));
        assert!(json.contains("createdById"));
    }
}
