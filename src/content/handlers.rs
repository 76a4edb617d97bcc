use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{
    auth::extractors::AdminUser,
    content::{
        model::{ContentRecord, Validate},
        store::ContentStore,
    },
    error::ApiError,
    state::AppState,
};

#[instrument(skip_all, fields(kind = T::KIND))]
pub async fn list_items<T>(State(store): State<Arc<ContentStore<T>>>) -> Json<Vec<T>>
where
    T: ContentRecord,
    Arc<ContentStore<T>>: FromRef<AppState>,
{
    Json(store.list())
}

#[instrument(skip_all, fields(kind = T::KIND))]
pub async fn create_item<T>(
    AdminUser(admin): AdminUser,
    State(store): State<Arc<ContentStore<T>>>,
    Json(draft): Json<T::Draft>,
) -> Result<(StatusCode, Json<T>), ApiError>
where
    T: ContentRecord,
    Arc<ContentStore<T>>: FromRef<AppState>,
{
    draft.validate()?;
    let item = store.create(draft);
    info!(id = item.id(), admin = %admin.username, "content created");
    Ok((StatusCode::CREATED, Json(item)))
}

#[instrument(skip_all, fields(kind = T::KIND))]
pub async fn update_item<T>(
    AdminUser(admin): AdminUser,
    State(store): State<Arc<ContentStore<T>>>,
    Path(id): Path<i32>,
    Json(patch): Json<T::Patch>,
) -> Result<Json<T>, ApiError>
where
    T: ContentRecord,
    Arc<ContentStore<T>>: FromRef<AppState>,
{
    patch.validate()?;
    let item = store.update(id, patch).ok_or(ApiError::NotFound(T::KIND))?;
    info!(id, admin = %admin.username, "content updated");
    Ok(Json(item))
}

/// Delete mirrors the repository contract: removing a missing id is not an
/// error, the response just reports `deleted: false`.
#[instrument(skip_all, fields(kind = T::KIND))]
pub async fn delete_item<T>(
    AdminUser(admin): AdminUser,
    State(store): State<Arc<ContentStore<T>>>,
    Path(id): Path<i32>,
) -> Json<Value>
where
    T: ContentRecord,
    Arc<ContentStore<T>>: FromRef<AppState>,
{
    let deleted = store.delete(id);
    info!(id, deleted, admin = %admin.username, "content delete");
    Json(json!({ "deleted": deleted }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::model::{Skill, SkillDraft, SkillPatch};
    use crate::state::AppState;

    fn draft(name: &str, level: i32, order: i32) -> SkillDraft {
        SkillDraft {
            name: name.into(),
            level,
            category: "Languages".into(),
            order,
        }
    }

    fn admin(state: &AppState) -> AdminUser {
        let hash = crate::auth::password::hash_password("password-123").expect("hash");
        let user = state.users.create_admin("admin", &hash).expect("admin");
        AdminUser(user)
    }

    #[tokio::test]
    async fn create_validates_before_touching_the_store() {
        let state = AppState::fake();
        let err = create_item::<Skill>(
            admin(&state),
            State(state.skills.clone()),
            Json(draft("Rust", 101, 0)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(state.skills.list().is_empty());
    }

    #[tokio::test]
    async fn crud_roundtrip_through_the_handlers() {
        let state = AppState::fake();
        let gate = admin(&state);

        let (status, Json(created)) = create_item::<Skill>(
            AdminUser(gate.0.clone()),
            State(state.skills.clone()),
            Json(draft("Go", 80, 1)),
        )
        .await
        .expect("create");
        assert_eq!(status, StatusCode::CREATED);

        create_item::<Skill>(
            AdminUser(gate.0.clone()),
            State(state.skills.clone()),
            Json(draft("Rust", 70, 0)),
        )
        .await
        .expect("create second");

        let Json(listed) = list_items::<Skill>(State(state.skills.clone())).await;
        let names: Vec<_> = listed.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Rust", "Go"]);

        let Json(updated) = update_item::<Skill>(
            AdminUser(gate.0.clone()),
            State(state.skills.clone()),
            Path(created.id),
            Json(SkillPatch {
                level: Some(85),
                ..Default::default()
            }),
        )
        .await
        .expect("update");
        assert_eq!(updated.level, 85);

        let Json(body) = delete_item::<Skill>(
            AdminUser(gate.0.clone()),
            State(state.skills.clone()),
            Path(created.id),
        )
        .await;
        assert_eq!(body["deleted"], true);

        let Json(body) = delete_item::<Skill>(
            gate,
            State(state.skills.clone()),
            Path(created.id),
        )
        .await;
        assert_eq!(body["deleted"], false);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let state = AppState::fake();
        let err = update_item::<Skill>(
            admin(&state),
            State(state.skills.clone()),
            Path(999),
            Json(SkillPatch::default()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound("Skill")));
    }
}
