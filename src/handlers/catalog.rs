//! Catalog handlers for the selection screens

use crate::catalog::{self, Archetype, Color};
use crate::models::{ApiResponse, ArchetypeClass};
use axum::{extract::Query, http::StatusCode, Json};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ArchetypeQuery {
    pub class: Option<ArchetypeClass>,
}

/// List product archetypes, optionally only those of one class
pub async fn list_archetypes(
    Query(query): Query<ArchetypeQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<&'static Archetype>>>) {
    let archetypes = match query.class {
        Some(class) => catalog::archetypes_by_class(class).collect(),
        None => catalog::archetypes().iter().collect(),
    };
    (StatusCode::OK, Json(ApiResponse::success(archetypes)))
}

pub async fn list_colors() -> (StatusCode, Json<ApiResponse<&'static [Color]>>) {
    (StatusCode::OK, Json(ApiResponse::success(catalog::colors())))
}
