use serde::Serialize;
use utoipa::ToSchema;

/// Display metadata read from the current page. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ArticleInfo {
    pub url: String,
    pub title: String,
    pub hostname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageClassification {
    pub is_news_article: bool,
    pub article_info: ArticleInfo,
}
