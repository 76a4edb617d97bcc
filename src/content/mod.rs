use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;

pub mod handlers;
pub mod model;
pub mod store;

use handlers::{create_item, delete_item, list_items, update_item};
use model::{Achievement, ContentRecord, Project, Skill};
use store::ContentStore;

/// Public, unauthenticated reads.
pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_items::<Project>))
        .route("/achievements", get(list_items::<Achievement>))
        .route("/skills", get(list_items::<Skill>))
}

/// Admin-gated mutations, one sub-router per collection.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .merge(collection_routes::<Project>("/admin/projects"))
        .merge(collection_routes::<Achievement>("/admin/achievements"))
        .merge(collection_routes::<Skill>("/admin/skills"))
}

fn collection_routes<T>(base: &str) -> Router<AppState>
where
    T: ContentRecord,
    Arc<ContentStore<T>>: FromRef<AppState>,
{
    Router::new()
        .route(base, post(create_item::<T>))
        .route(
            &format!("{base}/:id"),
            patch(update_item::<T>).delete(delete_item::<T>),
        )
}
