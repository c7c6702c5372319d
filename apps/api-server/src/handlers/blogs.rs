//! Post handlers.

use actix_web::{HttpResponse, web};

use blog_core::DomainError;
use blog_core::domain::{BlogDraft, BlogId};
use blog_shared::dto::SearchParams;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /posts
pub async fn create_blog(
    state: web::Data<AppState>,
    body: web::Json<BlogDraft>,
) -> AppResult<HttpResponse> {
    let blog = state.blogs.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(blog))
}

/// PATCH /posts/{id}
///
/// The id is checked before the body, so a bad id wins over a bad body.
pub async fn update_blog(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: Result<web::Json<BlogDraft>, actix_web::Error>,
) -> AppResult<HttpResponse> {
    let id: BlogId = path.parse()?;
    let draft = body.map_err(|_| DomainError::invalid_body())?.into_inner();

    let blog = state.blogs.update(id, draft).await?;
    Ok(HttpResponse::Ok().json(blog))
}

/// DELETE /posts/{id}
pub async fn delete_blog(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id: BlogId = path.parse()?;
    state.blogs.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /posts/{id}
pub async fn get_blog(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id: BlogId = path.parse()?;
    let blog = state.blogs.get(id).await?;
    Ok(HttpResponse::Ok().json(blog))
}

/// GET /posts?term=...
pub async fn list_blogs(
    state: web::Data<AppState>,
    query: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let blogs = state.blogs.list(query.term.as_deref()).await?;
    Ok(HttpResponse::Ok().json(blogs))
}
