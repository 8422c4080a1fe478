use serde::{Deserialize, Serialize};

use crate::pagination::PageInfo;

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Success envelope shared by every endpoint: `{success, data, pagination?}`.
#[derive(Serialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageInfo>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data, pagination: None }
    }

    pub fn paged(data: T, pagination: PageInfo) -> Self {
        Self { success: true, data, pagination: Some(pagination) }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into(), id: None }
    }

    pub fn created(message: impl Into<String>, id: i32) -> Self {
        Self { success: true, message: message.into(), id: Some(id) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpaged_envelope_omits_pagination() {
        let v = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["data"], serde_json::json!([1, 2]));
        assert!(v.get("pagination").is_none());
    }

    #[test]
    fn paged_envelope_carries_page_info() {
        let info = PageInfo::new(2, 10, 25);
        let v = serde_json::to_value(ApiResponse::paged(Vec::<u8>::new(), info)).unwrap();
        assert_eq!(v["pagination"]["total_pages"], 3);
        assert_eq!(v["pagination"]["page"], 2);
    }
}
