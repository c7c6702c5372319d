//! Blog entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use blog_core::domain::{Blog, BlogId};
use blog_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub category: Option<String>,
    /// JSON array of strings, or NULL when the post has no tags.
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub tags: Option<Json>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Blog.
///
/// Fails when the stored tags are not a list of strings.
impl TryFrom<Model> for Blog {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let tags = model
            .tags
            .map(serde_json::from_value::<Vec<String>>)
            .transpose()
            .map_err(|e| RepoError::Decode(format!("tags of blog {}: {}", model.id, e)))?;

        Ok(Self {
            id: BlogId::from_uuid(model.id),
            title: model.title,
            content: model.content,
            category: model.category,
            tags,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

/// Conversion from Domain Blog to SeaORM ActiveModel.
impl From<&Blog> for ActiveModel {
    fn from(blog: &Blog) -> Self {
        Self {
            id: Set(blog.id.as_uuid()),
            title: Set(blog.title.clone()),
            content: Set(blog.content.clone()),
            category: Set(blog.category.clone()),
            tags: Set(blog.tags.clone().map(Json::from)),
            created_at: Set(blog.created_at.into()),
            updated_at: Set(blog.updated_at.into()),
        }
    }
}
