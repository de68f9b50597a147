//! 인증 코드와 저장소 키 생성

use rand::Rng;
use uuid::Uuid;

/// 가입 인증 코드 범위
pub const REGISTER_CODE_RANGE: std::ops::RangeInclusive<u32> = 111_111..=999_999;

/// 비밀번호 재설정 코드 유효시간(초)
pub const RESET_CODE_TTL_SECONDS: u64 = 300;

/// 6자리 가입 인증 코드
pub fn register_code() -> String {
    rand::thread_rng().gen_range(REGISTER_CODE_RANGE).to_string()
}

/// 20바이트 난수의 16진수 표현 (40자)
pub fn reset_code() -> String {
    let bytes: [u8; 20] = rand::random();
    hex::encode(bytes)
}

/// 프로필 이미지 오브젝트 키
pub fn profile_image_key() -> String {
    format!("profile-images/profile_{}", Uuid::new_v4())
}
