//! # 도메인 엔티티
//!
//! 저장소에 그대로 직렬화되는 레코드입니다. 엔티티 사이의 관계는
//! 중첩 객체가 아닌 id 참조(`account_id`, `created_by`)로만 표현합니다.
//!
//! | 엔티티 | 소유자 | 삭제 방식 |
//! |--------|--------|-----------|
//! | [`Account`] | - | soft delete (`is_active = false`) |
//! | [`Auth`] | `account_id` | 계정과 함께 유지 |
//! | [`Profile`] | `account_id` | soft delete |
//! | [`Board`] | `created_by` (profile id) | hard delete |
//!
//! 타임스탬프는 epoch milliseconds 로 저장되어 정렬과 커서 비교가 단순합니다.

pub mod account;
pub mod auth;
pub mod board;
pub mod profile;

pub use account::*;
pub use auth::*;
pub use board::*;
pub use profile::*;

/// 새 엔티티 id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// 저장 정밀도(밀리초)로 자른 현재 시각
pub fn now() -> chrono::DateTime<chrono::Utc> {
    let current = chrono::Utc::now();
    chrono::DateTime::from_timestamp_millis(current.timestamp_millis()).unwrap_or(current)
}
