//! 게시글 관련 요청 DTO

use serde::Deserialize;

/// `GET /boards?orderKey=..&orderType=..&cursor=..&windowSize=..&category=..&id=..`
///
/// `id` 는 작성자(profile id) 필터입니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardListQuery {
    #[serde(rename = "orderKey")]
    pub order_key: Option<String>,

    #[serde(rename = "orderType")]
    pub order_type: Option<String>,

    pub cursor: Option<String>,

    #[serde(rename = "windowSize")]
    pub window_size: Option<String>,

    pub category: Option<String>,

    pub id: Option<String>,
}
