use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: String,
    /// Important notices are rendered with extra prominence.
    pub is_important: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNoticeRequest {
    pub title: String,
    pub content: String,
    pub date: String,
    #[serde(default)]
    pub is_important: bool,
}
