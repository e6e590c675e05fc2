//! Article, engagement and comment routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::errors::{actor, require_actor};
use crate::errors::DataError;
use crate::feed::View;
use crate::identity::EntityRef;
use crate::model::{
    Article, ArticlePatch, Comment, EnrichedArticle, EnrichedComment, NewArticle, NewComment,
};
use crate::service::ContentService;

type Shared = State<Arc<ContentService>>;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub view: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ArticleListResponse {
    pub articles: Vec<EnrichedArticle>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub content: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<EnrichedComment>,
    pub total: usize,
}

/// Create article and comment routes
pub fn article_routes(service: Arc<ContentService>) -> Router {
    Router::new()
        .route("/articles", get(list_articles_handler).post(create_article_handler))
        .route(
            "/articles/:reference",
            get(get_article_handler)
                .patch(update_article_handler)
                .delete(delete_article_handler),
        )
        .route("/articles/:reference/views", post(increment_views_handler))
        .route("/articles/:reference/like", post(toggle_like_handler))
        .route("/articles/:reference/bookmark", post(toggle_bookmark_handler))
        .route("/articles/:reference/likes", get(article_likes_handler))
        .route(
            "/articles/:reference/comments",
            get(list_comments_handler).post(create_comment_handler),
        )
        .route("/comments/:reference", delete(delete_comment_handler))
        .with_state(service)
}

// ==================
// Article Handlers
// ==================

async fn list_articles_handler(
    State(service): Shared,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<ArticleListResponse>, DataError> {
    let view = match query.view.as_deref() {
        Some(raw) => raw.parse::<View>()?,
        None => View::Public,
    };
    let viewer = actor(&headers);
    let articles = service.list_articles(view, viewer.as_deref()).await;

    Ok(Json(ArticleListResponse {
        total: articles.len(),
        articles,
    }))
}

async fn create_article_handler(
    State(service): Shared,
    headers: HeaderMap,
    Json(input): Json<NewArticle>,
) -> Result<(StatusCode, Json<Article>), DataError> {
    let author = require_actor(&headers)?;
    let article = service.create_article(input, &author).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

async fn get_article_handler(
    State(service): Shared,
    headers: HeaderMap,
    Path(reference): Path<String>,
) -> Result<Json<EnrichedArticle>, DataError> {
    let viewer = actor(&headers);
    let article = service
        .get_article(&EntityRef::parse(&reference), viewer.as_deref())
        .await?;
    Ok(Json(article))
}

async fn update_article_handler(
    State(service): Shared,
    headers: HeaderMap,
    Path(reference): Path<String>,
    Json(patch): Json<ArticlePatch>,
) -> Result<Json<Article>, DataError> {
    let actor = require_actor(&headers)?;
    let reference = EntityRef::parse(&reference);
    let current = service.get_entity(&reference).await?;
    if !current.is_owned_by(&actor) {
        return Err(DataError::forbidden("only the author may edit this article"));
    }
    Ok(Json(service.update_article(&reference, patch).await?))
}

async fn delete_article_handler(
    State(service): Shared,
    headers: HeaderMap,
    Path(reference): Path<String>,
) -> Result<StatusCode, DataError> {
    let actor = require_actor(&headers)?;
    let reference = EntityRef::parse(&reference);
    match service.get_entity(&reference).await {
        Ok(current) if !current.is_owned_by(&actor) => {
            return Err(DataError::forbidden("only the author may delete this article"))
        }
        Ok(_) => {}
        Err(DataError::NotFound(_)) => return Ok(StatusCode::NO_CONTENT),
        Err(e) => return Err(e),
    }
    service.delete_article(&reference).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn increment_views_handler(
    State(service): Shared,
    Path(reference): Path<String>,
) -> Result<StatusCode, DataError> {
    service.increment_views(&EntityRef::parse(&reference)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ==================
// Engagement Handlers
// ==================

async fn toggle_like_handler(
    State(service): Shared,
    headers: HeaderMap,
    Path(reference): Path<String>,
) -> Result<Json<ToggleResponse>, DataError> {
    let actor = require_actor(&headers)?;
    let active = service
        .toggle_like(&EntityRef::parse(&reference), &actor)
        .await?;
    Ok(Json(ToggleResponse { active }))
}

async fn toggle_bookmark_handler(
    State(service): Shared,
    headers: HeaderMap,
    Path(reference): Path<String>,
) -> Result<Json<ToggleResponse>, DataError> {
    let actor = require_actor(&headers)?;
    let active = service
        .toggle_bookmark(&EntityRef::parse(&reference), &actor)
        .await?;
    Ok(Json(ToggleResponse { active }))
}

async fn article_likes_handler(
    State(service): Shared,
    Path(reference): Path<String>,
) -> Result<Json<CountResponse>, DataError> {
    let count = service
        .get_article_likes(&EntityRef::parse(&reference))
        .await?;
    Ok(Json(CountResponse { count }))
}

// ==================
// Comment Handlers
// ==================

async fn list_comments_handler(
    State(service): Shared,
    Path(reference): Path<String>,
) -> Json<CommentListResponse> {
    let comments = service.list_comments(&EntityRef::parse(&reference)).await;
    Json(CommentListResponse {
        total: comments.len(),
        comments,
    })
}

async fn create_comment_handler(
    State(service): Shared,
    headers: HeaderMap,
    Path(reference): Path<String>,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), DataError> {
    let user_id = require_actor(&headers)?;
    let comment = service
        .create_comment(NewComment {
            article_ref: reference,
            user_id,
            content: request.content,
            parent_id: request.parent_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn delete_comment_handler(
    State(service): Shared,
    headers: HeaderMap,
    Path(reference): Path<String>,
) -> Result<StatusCode, DataError> {
    let actor = require_actor(&headers)?;
    let reference = EntityRef::parse(&reference);
    match service.get_comment(&reference).await {
        Ok(comment) if comment.user_id != actor => {
            return Err(DataError::forbidden("only the author may delete this comment"))
        }
        Ok(_) => {}
        Err(DataError::NotFound(_)) => return Ok(StatusCode::NO_CONTENT),
        Err(e) => return Err(e),
    }
    service.delete_comment(&reference).await?;
    Ok(StatusCode::NO_CONTENT)
}
