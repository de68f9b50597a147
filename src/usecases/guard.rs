//! 입력 검증 도우미
//!
//! usecase 입력은 타입이 정해지지 않은 JSON 값으로 들어옵니다. [`Guard`] 는
//! 필수 여부와 타입을 순서대로 확인하고 첫 번째 위반만 메시지로 돌려줍니다.
//!
//! | 위반 | 메시지 |
//! |------|--------|
//! | 객체가 아님 | `` `input` is not object type. `` |
//! | 필드 없음 | `` `{key}` is required. `` |
//! | 문자열 아님 | `` `{key}` should be string type. `` |
//! | 불리언 아님 | `` `{key}` should be boolean type. `` |
//! | 허용되지 않은 값 | `` `{key}` is invalid. `` |
//!
//! 선택 필드는 없거나 `null` 이면 `None` 입니다.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::ValidationErrors;

use crate::domain::catalog::OrderType;

pub const PASSWORD_RULE: &str =
    "`password` must be between 8 and 20 in mixed a lowercase letter, a number and a symbol";

const PASSWORD_SYMBOLS: &str = "!@#$%^*+=-";

pub struct Guard<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> Guard<'a> {
    pub fn object(input: &'a Value) -> Result<Self, String> {
        input
            .as_object()
            .map(|object| Self { object })
            .ok_or_else(|| "`input` is not object type.".to_string())
    }

    fn present(&self, key: &str) -> Option<&'a Value> {
        self.object.get(key).filter(|value| !value.is_null())
    }

    pub fn string(&self, key: &str) -> Result<String, String> {
        self.optional_string(key)?
            .ok_or_else(|| format!("`{}` is required.", key))
    }

    pub fn optional_string(&self, key: &str) -> Result<Option<String>, String> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(format!("`{}` should be string type.", key)),
        }
    }

    pub fn optional_bool(&self, key: &str) -> Result<Option<bool>, String> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::Bool(value)) => Ok(Some(*value)),
            Some(_) => Err(format!("`{}` should be boolean type.", key)),
        }
    }

    /// 대문자 문자열 열거형 (`"EMAIL"`, `"MEMBER"` ...)
    pub fn enumeration<T: FromStr>(&self, key: &str) -> Result<T, String> {
        self.optional_enumeration(key)?
            .ok_or_else(|| format!("`{}` is required.", key))
    }

    pub fn optional_enumeration<T: FromStr>(&self, key: &str) -> Result<Option<T>, String> {
        match self.optional_string(key)? {
            None => Ok(None),
            Some(raw) => raw
                .parse::<T>()
                .map(Some)
                .map_err(|_| format!("`{}` is invalid.", key)),
        }
    }

    /// 값이 있으면 `allowed` 중 하나여야 함
    pub fn one_of(&self, key: &str, allowed: &[&str], message: &str) -> Result<Option<String>, String> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::String(value)) if allowed.contains(&value.as_str()) => Ok(Some(value.clone())),
            Some(_) => Err(message.to_string()),
        }
    }

    /// `orderType` (`ASC` | `DESC`, 기본 `DESC`)
    pub fn order_type(&self) -> Result<OrderType, String> {
        let raw = self.one_of("orderType", &["ASC", "DESC"], "`orderType` should be `ASC` or `DESC`.")?;
        Ok(raw.and_then(|raw| raw.parse().ok()).unwrap_or_default())
    }

    /// 중첩 객체를 serde 로 역직렬화
    pub fn optional_object<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, String> {
        match self.present(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|_| format!("`{}` is invalid.", key)),
        }
    }
}

/// 8-20자, 영문자, 숫자, 기호(`!@#$%^*+=-`)를 각각 하나 이상 포함
pub fn check_password(password: &str) -> Result<(), String> {
    let length = password.chars().count();
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    if (8..=20).contains(&length) && has_letter && has_digit && has_symbol {
        Ok(())
    } else {
        Err(PASSWORD_RULE.to_string())
    }
}

/// `validator` 결과에서 필드 이름순으로 첫 위반 메시지를 꺼냄
pub fn first_violation(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().collect();
    fields.sort();

    fields
        .into_iter()
        .filter_map(|field| {
            field_errors.get(field)?.first().map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("`{}` is invalid.", field))
            })
        })
        .next()
        .unwrap_or_else(|| "input is invalid.".to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use validator::Validate;

    use super::*;
    use crate::domain::catalog::{AuthKind, Role};

    #[test]
    fn test_non_object_input_is_rejected() {
        assert_eq!(
            Guard::object(&json!("nope")).err().unwrap(),
            "`input` is not object type."
        );
        assert!(Guard::object(&json!(null)).is_err());
    }

    #[test]
    fn test_required_and_type_messages() {
        let input = json!({ "email": 42, "nickname": null });
        let guard = Guard::object(&input).unwrap();

        assert_eq!(guard.string("password").unwrap_err(), "`password` is required.");
        assert_eq!(guard.string("email").unwrap_err(), "`email` should be string type.");
        assert_eq!(guard.optional_string("nickname").unwrap(), None);
    }

    #[test]
    fn test_enumeration_rejects_unknown_values() {
        let input = json!({ "auth_kind": "email", "role": "STAFF", "is_active": "yes" });
        let guard = Guard::object(&input).unwrap();

        assert_eq!(
            guard.enumeration::<AuthKind>("auth_kind").unwrap_err(),
            "`auth_kind` is invalid."
        );
        assert_eq!(guard.enumeration::<Role>("role").unwrap(), Role::Staff);
        assert_eq!(
            guard.optional_bool("is_active").unwrap_err(),
            "`is_active` should be boolean type."
        );
    }

    #[test]
    fn test_password_samples() {
        assert!(check_password("abcd1234!").is_ok());
        assert!(check_password("Zz9=Zz9=").is_ok());

        assert_eq!(check_password("abcd1234").unwrap_err(), PASSWORD_RULE);
        assert!(check_password("abcdefg!").is_err());
        assert!(check_password("1234567!").is_err());
        assert!(check_password("a1!").is_err());
        assert!(check_password("abcdefghij1234567890!").is_err());
        assert!(check_password("abcd1234?").is_err());
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "`b` should not be empty."))]
        b: String,
        #[validate(length(min = 1, message = "`a` should not be empty."))]
        a: String,
    }

    #[test]
    fn test_first_violation_is_deterministic() {
        let sample = Sample {
            b: String::new(),
            a: String::new(),
        };
        let errors = sample.validate().unwrap_err();
        assert_eq!(first_violation(&errors), "`a` should not be empty.");
    }
}
