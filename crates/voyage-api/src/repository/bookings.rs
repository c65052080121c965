//! 예약 저장소.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use voyage_core::domain::{Booking, BookingStatus, PaymentState};

/// 신규 예약 입력.
///
/// `total_price`는 핸들러가 예약 시점의 상품 가격으로 계산합니다.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: i64,
    pub trip_id: i64,
    pub guests: i32,
    pub total_price: Decimal,
    pub special_requirements: Option<String>,
}

/// 상태별 예약 수.
#[derive(Debug, Clone, FromRow)]
pub struct BookingStatusCount {
    pub status: BookingStatus,
    pub count: i64,
}

/// 예약 저장소.
pub struct BookingRepository;

impl BookingRepository {
    /// 예약 생성. 상태는 `pending`, 정산 상태는 `pending`으로 시작합니다.
    pub async fn create(pool: &PgPool, input: NewBooking) -> Result<Booking, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                user_id, trip_id, guests, total_price,
                status, payment_state, booking_date, special_requirements
            )
            VALUES ($1, $2, $3, $4, 'pending', 'pending', NOW(), $5)
            RETURNING *
            "#,
        )
        .bind(input.user_id)
        .bind(input.trip_id)
        .bind(input.guests)
        .bind(input.total_price)
        .bind(&input.special_requirements)
        .fetch_one(pool)
        .await
    }

    /// 사용자의 예약 조회 (최신순).
    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY booking_date DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// 전체 예약 조회 (최신순, 관리자용).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY booking_date DESC")
            .fetch_all(pool)
            .await
    }

    /// 단건 조회.
    pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 예약 취소. 상태와 정산 상태를 함께 갱신합니다.
    pub async fn cancel(
        pool: &PgPool,
        id: i64,
        payment_state: PaymentState,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'cancelled', payment_state = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payment_state)
        .fetch_optional(pool)
        .await
    }

    /// 예약 상태 변경.
    pub async fn update_status(
        pool: &PgPool,
        id: i64,
        status: BookingStatus,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    /// 정산 상태 변경.
    pub async fn update_payment_state(
        pool: &PgPool,
        id: i64,
        payment_state: PaymentState,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET payment_state = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payment_state)
        .fetch_optional(pool)
        .await
    }

    /// 예약 삭제 (관리자용). 삭제된 행이 있으면 true.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// 상태별 예약 수 집계.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<BookingStatusCount>, sqlx::Error> {
        sqlx::query_as::<_, BookingStatusCount>(
            "SELECT status, COUNT(*) as count FROM bookings GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }
}
