use serde::{de::DeserializeOwned, Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ApiError;

/// Payload validation, applied at the API boundary before any store call.
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

/// Common contract for the three portfolio collections. A record owns its
/// synthetic id, display order and creation timestamp; everything else is
/// variant-specific. Drafts and patches reject unknown fields outright, so
/// the immutable `id`/`created_at` can never arrive in a payload.
pub trait ContentRecord: Clone + Serialize + Send + Sync + 'static {
    /// Full payload accepted on create.
    type Draft: DeserializeOwned + Validate + Send + 'static;
    /// Partial payload accepted on update; absent fields keep their value.
    type Patch: DeserializeOwned + Validate + Send + 'static;

    /// Singular noun used in error messages.
    const KIND: &'static str;

    fn build(id: i32, created_at: OffsetDateTime, draft: Self::Draft) -> Self;
    fn apply(&mut self, patch: Self::Patch);
    fn id(&self) -> i32;
    fn order(&self) -> i32;
}

fn require(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn check_level(level: i32) -> Result<(), ApiError> {
    if !(0..=100).contains(&level) {
        return Err(ApiError::Validation(
            "level must be between 0 and 100".into(),
        ));
    }
    Ok(())
}

// --- Project ---

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub highlights: Option<Vec<String>>,
    pub order: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub highlights: Option<Vec<String>>,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub highlights: Option<Vec<String>>,
    pub order: Option<i32>,
}

impl Validate for ProjectDraft {
    fn validate(&self) -> Result<(), ApiError> {
        require("title", &self.title)?;
        require("description", &self.description)
    }
}

impl Validate for ProjectPatch {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            require("title", title)?;
        }
        if let Some(description) = &self.description {
            require("description", description)?;
        }
        Ok(())
    }
}

impl ContentRecord for Project {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    const KIND: &'static str = "Project";

    fn build(id: i32, created_at: OffsetDateTime, draft: ProjectDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            highlights: draft.highlights,
            order: draft.order,
            created_at,
        }
    }

    fn apply(&mut self, patch: ProjectPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(highlights) = patch.highlights {
            self.highlights = Some(highlights);
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn order(&self) -> i32 {
        self.order
    }
}

// --- Achievement ---

#[derive(Debug, Clone, Serialize)]
pub struct Achievement {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Free-form display date ("2023", "March 2024", ...), not parsed.
    pub date: String,
    pub order: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AchievementDraft {
    pub title: String,
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AchievementPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub order: Option<i32>,
}

impl Validate for AchievementDraft {
    fn validate(&self) -> Result<(), ApiError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        require("date", &self.date)
    }
}

impl Validate for AchievementPatch {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            require("title", title)?;
        }
        if let Some(description) = &self.description {
            require("description", description)?;
        }
        if let Some(date) = &self.date {
            require("date", date)?;
        }
        Ok(())
    }
}

impl ContentRecord for Achievement {
    type Draft = AchievementDraft;
    type Patch = AchievementPatch;

    const KIND: &'static str = "Achievement";

    fn build(id: i32, created_at: OffsetDateTime, draft: AchievementDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            order: draft.order,
            created_at,
        }
    }

    fn apply(&mut self, patch: AchievementPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn order(&self) -> i32 {
        self.order
    }
}

// --- Skill ---

#[derive(Debug, Clone, Serialize)]
pub struct Skill {
    pub id: i32,
    pub name: String,
    /// Proficiency 0..=100; out-of-range input is rejected, never clamped.
    pub level: i32,
    pub category: String,
    pub order: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillDraft {
    pub name: String,
    pub level: i32,
    pub category: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkillPatch {
    pub name: Option<String>,
    pub level: Option<i32>,
    pub category: Option<String>,
    pub order: Option<i32>,
}

impl Validate for SkillDraft {
    fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        require("category", &self.category)?;
        check_level(self.level)
    }
}

impl Validate for SkillPatch {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = &self.name {
            require("name", name)?;
        }
        if let Some(category) = &self.category {
            require("category", category)?;
        }
        if let Some(level) = self.level {
            check_level(level)?;
        }
        Ok(())
    }
}

impl ContentRecord for Skill {
    type Draft = SkillDraft;
    type Patch = SkillPatch;

    const KIND: &'static str = "Skill";

    fn build(id: i32, created_at: OffsetDateTime, draft: SkillDraft) -> Self {
        Self {
            id,
            name: draft.name,
            level: draft.level,
            category: draft.category,
            order: draft.order,
            created_at,
        }
    }

    fn apply(&mut self, patch: SkillPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(level) = patch.level {
            self.level = level;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }

    fn id(&self) -> i32 {
        self.id
    }

    fn order(&self) -> i32 {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn draft_requires_non_empty_strings() {
        let draft = ProjectDraft {
            title: "  ".into(),
            description: "something".into(),
            highlights: None,
            order: 0,
        };
        assert!(matches!(
            draft.validate().unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn skill_level_bounds_are_inclusive() {
        for level in [0, 50, 100] {
            let draft = SkillDraft {
                name: "Rust".into(),
                level,
                category: "Languages".into(),
                order: 0,
            };
            assert!(draft.validate().is_ok(), "level {level} should pass");
        }
        for level in [-1, 101] {
            let draft = SkillDraft {
                name: "Rust".into(),
                level,
                category: "Languages".into(),
                order: 0,
            };
            assert!(draft.validate().is_err(), "level {level} should fail");
        }
    }

    #[test]
    fn patch_fields_obey_the_same_rules() {
        let patch = SkillPatch {
            level: Some(101),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let patch = AchievementPatch {
            date: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        assert!(SkillPatch::default().validate().is_ok());
    }

    #[test]
    fn unknown_fields_are_rejected_not_dropped() {
        let err = serde_json::from_value::<SkillDraft>(json!({
            "name": "Rust",
            "level": 70,
            "category": "Languages",
            "bogus": true,
        }))
        .unwrap_err();
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn immutable_fields_cannot_ride_in_on_a_patch() {
        assert!(serde_json::from_value::<ProjectPatch>(json!({ "id": 5 })).is_err());
        assert!(
            serde_json::from_value::<ProjectPatch>(json!({ "created_at": "2024-01-01" })).is_err()
        );
    }

    #[test]
    fn apply_merges_only_provided_fields() {
        let mut project = Project::build(
            1,
            OffsetDateTime::UNIX_EPOCH,
            ProjectDraft {
                title: "Old title".into(),
                description: "Old description".into(),
                highlights: Some(vec!["kept".into()]),
                order: 3,
            },
        );
        project.apply(ProjectPatch {
            title: Some("New title".into()),
            ..Default::default()
        });
        assert_eq!(project.title, "New title");
        assert_eq!(project.description, "Old description");
        assert_eq!(project.highlights.as_deref(), Some(&["kept".to_string()][..]));
        assert_eq!(project.order, 3);
    }

    #[test]
    fn draft_defaults_apply() {
        let draft: ProjectDraft = serde_json::from_value(json!({
            "title": "T",
            "description": "D",
        }))
        .expect("deserialize");
        assert_eq!(draft.order, 0);
        assert!(draft.highlights.is_none());
    }
}
