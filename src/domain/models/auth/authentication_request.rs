//! JWT 미들웨어 동작 옵션

/// 토큰 누락 시 처리 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Required,
    Optional,
}

/// 요구하는 토큰 종류
///
/// `Profile` 은 페이로드에 `role` 과 `name` 이 모두 있어야 통과합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenScope {
    Account,
    Profile,
}

impl TokenScope {
    pub fn is_strict(&self) -> bool {
        matches!(self, TokenScope::Profile)
    }
}
