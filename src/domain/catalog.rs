//! 도메인 열거형 카탈로그
//!
//! 저장소와 API 에서 모두 대문자 문자열(`"EMAIL"`, `"MEMBER"`, `"BUY"`)로 표현됩니다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 로그인 자격 증명 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthKind {
    Email,
    Kakao,
    Naver,
    Google,
    Facebook,
}

impl AuthKind {
    pub const SOCIAL: [AuthKind; 4] = [
        AuthKind::Kakao,
        AuthKind::Naver,
        AuthKind::Google,
        AuthKind::Facebook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthKind::Email => "EMAIL",
            AuthKind::Kakao => "KAKAO",
            AuthKind::Naver => "NAVER",
            AuthKind::Google => "GOOGLE",
            AuthKind::Facebook => "FACEBOOK",
        }
    }

    pub fn is_social(&self) -> bool {
        !matches!(self, AuthKind::Email)
    }
}

impl FromStr for AuthKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EMAIL" => Ok(AuthKind::Email),
            "KAKAO" => Ok(AuthKind::Kakao),
            "NAVER" => Ok(AuthKind::Naver),
            "GOOGLE" => Ok(AuthKind::Google),
            "FACEBOOK" => Ok(AuthKind::Facebook),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 프로필 역할
///
/// 선언 순서가 정렬 순서입니다 (`MEMBER < STAFF < MANAGER`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Member,
    Staff,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "MEMBER",
            Role::Staff => "STAFF",
            Role::Manager => "MANAGER",
        }
    }

    /// 계정당 생성 가능한 활성 프로필 수
    pub fn quota(&self) -> usize {
        match self {
            Role::Member => 2,
            Role::Staff => 1,
            Role::Manager => 1,
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MEMBER" => Ok(Role::Member),
            "STAFF" => Ok(Role::Staff),
            "MANAGER" => Ok(Role::Manager),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 게시글 카테고리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardCategory {
    Buy,
    Sell,
    Share,
}

impl BoardCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardCategory::Buy => "BUY",
            BoardCategory::Sell => "SELL",
            BoardCategory::Share => "SHARE",
        }
    }
}

impl FromStr for BoardCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(BoardCategory::Buy),
            "SELL" => Ok(BoardCategory::Sell),
            "SHARE" => Ok(BoardCategory::Share),
            _ => Err(()),
        }
    }
}

impl fmt::Display for BoardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 정렬 방향 (`ASC` | `DESC`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    #[default]
    Desc,
}

impl OrderType {
    /// MongoDB sort 방향 값
    pub fn direction(&self) -> i32 {
        match self {
            OrderType::Asc => 1,
            OrderType::Desc => -1,
        }
    }
}

impl FromStr for OrderType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(OrderType::Asc),
            "DESC" => Ok(OrderType::Desc),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_kind_round_trips_through_strings() {
        for kind in [AuthKind::Email, AuthKind::Kakao, AuthKind::Facebook] {
            assert_eq!(kind.as_str().parse::<AuthKind>(), Ok(kind));
        }
        assert!("email".parse::<AuthKind>().is_err());
        assert!(!AuthKind::Email.is_social());
        assert!(AuthKind::SOCIAL.iter().all(AuthKind::is_social));
    }

    #[test]
    fn test_role_quota_and_order() {
        assert_eq!(Role::Member.quota(), 2);
        assert_eq!(Role::Staff.quota(), 1);
        assert_eq!(Role::Manager.quota(), 1);
        assert!(Role::Member < Role::Staff && Role::Staff < Role::Manager);
    }

    #[test]
    fn test_enum_serde_uses_uppercase() {
        assert_eq!(serde_json::to_string(&BoardCategory::Share).unwrap(), "\"SHARE\"");
        assert_eq!(serde_json::to_string(&OrderType::Asc).unwrap(), "\"ASC\"");
        let role: Role = serde_json::from_str("\"MANAGER\"").unwrap();
        assert_eq!(role, Role::Manager);
    }
}
