// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the portfolio API.

use crate::auth::{AdminUser, IdentityVerifier};
use crate::config::Config;
use crate::content::Repository;
use crate::error::{AppError, ContactError};
use crate::metrics::{Metrics, SubmissionOutcome};
use crate::models::{
    BlogPost, BlogPostPatch, NewBlogPost, NewTestimonial, Testimonial, TestimonialPatch,
};
use crate::origin::OriginAddress;
use crate::pipeline::ContactPipeline;
use crate::submission::{ContactRequest, ContactResponse};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Shared application state.
pub struct AppState {
    pub pipeline: ContactPipeline,
    pub blog: Repository<BlogPost>,
    pub testimonials: Repository<Testimonial>,
    pub identity: Arc<dyn IdentityVerifier>,
    pub metrics: Metrics,
    pub config: Config,
}

impl AppState {
    fn expose_detail(&self) -> bool {
        self.config.environment.is_development()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Confirmation body for deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Prometheus scrape endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let body = state
        .metrics
        .render()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response())
}

/// Contact form submission.
///
/// Genuine and honeypot acceptances produce the same response.
pub async fn contact(
    State(state): State<Arc<AppState>>,
    OriginAddress(origin): OriginAddress,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactResponse>, ContactError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(%origin, error = %rejection.body_text(), "Malformed contact body");
        state.metrics.record(SubmissionOutcome::Invalid);
        ContactError::MalformedBody(rejection.body_text())
    })?;

    state.pipeline.submit(request, origin).await?;
    Ok(Json(ContactResponse::sent()))
}

// Blog posts

pub async fn list_blog_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BlogPost>>, AppError> {
    state
        .blog
        .list()
        .await
        .map(Json)
        .map_err(AppError::store("Failed to fetch blog posts", state.expose_detail()))
}

pub async fn get_blog_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BlogPost>, AppError> {
    state
        .blog
        .get(&id)
        .await
        .map_err(AppError::store("Failed to fetch blog post", state.expose_detail()))?
        .map(Json)
        .ok_or(AppError::NotFound("Blog post not found"))
}

pub async fn create_blog_post(
    State(state): State<Arc<AppState>>,
    AdminUser(user): AdminUser,
    payload: Result<Json<NewBlogPost>, JsonRejection>,
) -> Result<(StatusCode, Json<BlogPost>), AppError> {
    let Json(input) = payload.map_err(|r| AppError::BadRequest(r.body_text()))?;

    let (Some(title), Some(content)) = (non_empty(input.title), non_empty(input.content)) else {
        return Err(AppError::BadRequest(
            "Title and content are required".to_string(),
        ));
    };
    let author = non_empty(input.author).unwrap_or_else(|| user.username.clone());

    let post = state
        .blog
        .create(BlogPost::new(title, content, author))
        .await
        .map_err(AppError::store("Failed to create blog post", state.expose_detail()))?;

    info!(id = %post.id, user = %user.username, "Blog post created");
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_blog_post(
    State(state): State<Arc<AppState>>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
    payload: Result<Json<BlogPostPatch>, JsonRejection>,
) -> Result<Json<BlogPost>, AppError> {
    let Json(patch) = payload.map_err(|r| AppError::BadRequest(r.body_text()))?;

    let post = state
        .blog
        .update(&id, &patch)
        .await
        .map_err(AppError::store("Failed to update blog post", state.expose_detail()))?
        .ok_or(AppError::NotFound("Blog post not found"))?;

    info!(%id, user = %user.username, "Blog post updated");
    Ok(Json(post))
}

pub async fn delete_blog_post(
    State(state): State<Arc<AppState>>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .blog
        .delete(&id)
        .await
        .map_err(AppError::store("Failed to delete blog post", state.expose_detail()))?;

    info!(%id, user = %user.username, "Blog post deleted");
    Ok(Json(MessageResponse {
        message: "Blog post deleted",
    }))
}

// Testimonials

pub async fn list_testimonials(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Testimonial>>, AppError> {
    state
        .testimonials
        .list()
        .await
        .map(Json)
        .map_err(AppError::store("Failed to fetch testimonials", state.expose_detail()))
}

pub async fn get_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Testimonial>, AppError> {
    state
        .testimonials
        .get(&id)
        .await
        .map_err(AppError::store("Failed to fetch testimonial", state.expose_detail()))?
        .map(Json)
        .ok_or(AppError::NotFound("Testimonial not found"))
}

/// Public submission; new testimonials wait for approval.
pub async fn create_testimonial(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTestimonial>, JsonRejection>,
) -> Result<(StatusCode, Json<Testimonial>), AppError> {
    let Json(input) = payload.map_err(|r| AppError::BadRequest(r.body_text()))?;

    let (Some(author), Some(content)) = (non_empty(input.author), non_empty(input.content)) else {
        return Err(AppError::BadRequest(
            "Author and content are required".to_string(),
        ));
    };

    let testimonial = state
        .testimonials
        .create(Testimonial::new(author, content, input.title.unwrap_or_default()))
        .await
        .map_err(AppError::store("Failed to create testimonial", state.expose_detail()))?;

    info!(id = %testimonial.id, "Testimonial submitted");
    Ok((StatusCode::CREATED, Json(testimonial)))
}

pub async fn update_testimonial(
    State(state): State<Arc<AppState>>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
    payload: Result<Json<TestimonialPatch>, JsonRejection>,
) -> Result<Json<Testimonial>, AppError> {
    let Json(patch) = payload.map_err(|r| AppError::BadRequest(r.body_text()))?;

    let testimonial = state
        .testimonials
        .update(&id, &patch)
        .await
        .map_err(AppError::store("Failed to update testimonial", state.expose_detail()))?
        .ok_or(AppError::NotFound("Testimonial not found"))?;

    info!(%id, user = %user.username, approved = testimonial.approved, "Testimonial updated");
    Ok(Json(testimonial))
}

pub async fn delete_testimonial(
    State(state): State<Arc<AppState>>,
    AdminUser(user): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .testimonials
        .delete(&id)
        .await
        .map_err(AppError::store("Failed to delete testimonial", state.expose_detail()))?;

    info!(%id, user = %user.username, "Testimonial deleted");
    Ok(Json(MessageResponse {
        message: "Testimonial deleted",
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
