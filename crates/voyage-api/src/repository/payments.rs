//! 결제 증빙 저장소.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use voyage_core::domain::{Payment, PaymentMethod, PaymentStatus};

/// 신규 결제 증빙 입력.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: i64,
    pub booking_id: i64,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub proof_image: Option<String>,
}

/// 상태별 결제 수.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentStatusCount {
    pub status: PaymentStatus,
    pub count: i64,
}

/// 결제 증빙 저장소.
pub struct PaymentRepository;

impl PaymentRepository {
    /// 결제 증빙 생성. 상태는 `pending`으로 시작합니다.
    pub async fn create(pool: &PgPool, input: NewPayment) -> Result<Payment, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                user_id, booking_id, amount, payment_method, proof_image, status
            )
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING *
            "#,
        )
        .bind(input.user_id)
        .bind(input.booking_id)
        .bind(input.amount)
        .bind(input.payment_method)
        .bind(&input.proof_image)
        .fetch_one(pool)
        .await
    }

    /// 사용자의 결제 증빙 조회 (최신순).
    pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// 특정 예약의 결제 증빙 조회 (호출자 소유 범위).
    pub async fn list_by_booking(
        pool: &PgPool,
        booking_id: i64,
        user_id: i64,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE booking_id = $1 AND user_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(booking_id)
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// 전체 결제 증빙 조회 (관리자용).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
    }

    /// 상태로 필터링한 결제 증빙 조회 (관리자용).
    pub async fn list_by_status(
        pool: &PgPool,
        status: PaymentStatus,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// 단건 조회.
    pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 검토 상태 변경 (관리자 메모 포함). 존재하지 않으면 None.
    pub async fn update_status(
        pool: &PgPool,
        id: i64,
        status: PaymentStatus,
        admin_note: Option<String>,
    ) -> Result<Option<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments SET status = $2, admin_note = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(&admin_note)
        .fetch_optional(pool)
        .await
    }

    /// 승인된 결제 총액.
    pub async fn confirmed_total(pool: &PgPool) -> Result<Decimal, sqlx::Error> {
        let (total,): (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE status = 'confirmed'",
        )
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// 상태별 결제 수 집계.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<PaymentStatusCount>, sqlx::Error> {
        sqlx::query_as::<_, PaymentStatusCount>(
            "SELECT status, COUNT(*) as count FROM payments GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }
}
