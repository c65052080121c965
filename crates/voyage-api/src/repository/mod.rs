//! 데이터베이스 저장소.
//!
//! 각 엔티티의 영속성 연산을 담당합니다. 핸들러는 SQL을 직접 다루지
//! 않고 이 모듈의 저장소를 통해서만 데이터베이스에 접근합니다.

pub mod bookings;
pub mod destinations;
pub mod payments;
pub mod trips;
pub mod users;

pub use bookings::{BookingRepository, BookingStatusCount, NewBooking};
pub use destinations::{DestinationRepository, NewDestination, UpdateDestination};
pub use payments::{NewPayment, PaymentRepository, PaymentStatusCount};
pub use trips::{NewTrip, TripRepository, UpdateTrip};
pub use users::{MemoryCredentialStore, PgCredentialStore, UserRepository};
