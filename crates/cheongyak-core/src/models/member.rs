//! Member (my page) models.

use serde::{Deserialize, Serialize};

/// Profile data behind `GET /member/mypage`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mypage {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Interest regions as `"시/도 군/구"` strings.
    #[serde(rename = "interestLocals", default)]
    pub interest_locals: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mypage() {
        let json = r#"{"nickname": "hong", "interestLocals": ["서울특별시 강남구", "경기도 성남시"]}"#;
        let mypage: Mypage = serde_json::from_str(json).unwrap();
        assert_eq!(mypage.nickname.as_deref(), Some("hong"));
        assert_eq!(mypage.interest_locals.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_null_interest_locals() {
        let mypage: Mypage = serde_json::from_str(r#"{"interestLocals": null}"#).unwrap();
        assert!(mypage.interest_locals.is_none());
    }
}
