//! PostgreSQL post store.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgBinOper;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbConn, DbErr, EntityTrait, QueryFilter, Schema,
};

use blog_core::builder::{FieldUpdate, SearchFilter, UpdateSet};
use blog_core::domain::{Blog, BlogId};
use blog_core::error::RepoError;
use blog_core::ports::BlogRepository;

use super::connections::{self, DatabaseConfig};
use super::entity::blog::{self, Entity as BlogEntity};

/// Posts kept one row per document in the `blogs` table.
pub struct PostgresBlogRepository {
    pub(crate) db: DbConn,
}

impl PostgresBlogRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Connect to the configured database and make sure the table exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepoError> {
        let db = connections::connect(config).await.map_err(db_error)?;
        let repo = Self::new(db);
        repo.ensure_schema().await.map_err(db_error)?;
        Ok(repo)
    }

    /// Create the `blogs` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), DbErr> {
        let backend = self.db.get_database_backend();
        let mut stmt = Schema::new(backend).create_table_from_entity(BlogEntity);
        stmt.if_not_exists();

        self.db.execute(backend.build(&stmt)).await?;
        tracing::debug!("blogs table ready");
        Ok(())
    }
}

fn db_error(err: DbErr) -> RepoError {
    match &err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => RepoError::Connection(err.to_string()),
        DbErr::Json(_) | DbErr::Type(_) => RepoError::Decode(err.to_string()),
        _ => {
            let err_str = err.to_string();
            if err_str.contains("duplicate") || err_str.contains("unique") {
                RepoError::Constraint(err_str)
            } else {
                RepoError::Query(err_str)
            }
        }
    }
}

/// Case-insensitive POSIX match on title, content, or any tag.
///
/// Custom fragments take Postgres `$N` placeholders, numbered per fragment.
fn pattern_condition(pattern: &str) -> Condition {
    Condition::any()
        .add(Expr::col(blog::Column::Title).binary(PgBinOper::RegexCaseInsensitive, pattern))
        .add(Expr::col(blog::Column::Content).binary(PgBinOper::RegexCaseInsensitive, pattern))
        .add(Expr::cust_with_values(
            r#"EXISTS (SELECT 1 FROM jsonb_array_elements_text("tags") AS tag WHERE tag ~* $1)"#,
            [pattern],
        ))
}

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn insert_one(&self, blog: &Blog) -> Result<(), RepoError> {
        BlogEntity::insert(blog::ActiveModel::from(blog))
            .exec_without_returning(&self.db)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn update_one(&self, id: BlogId, update: &UpdateSet) -> Result<u64, RepoError> {
        let mut query = BlogEntity::update_many().filter(blog::Column::Id.eq(id.as_uuid()));

        for assignment in update.iter() {
            query = match assignment {
                FieldUpdate::Title(title) => {
                    query.col_expr(blog::Column::Title, Expr::value(title.clone()))
                }
                FieldUpdate::Content(content) => {
                    query.col_expr(blog::Column::Content, Expr::value(content.clone()))
                }
                FieldUpdate::Category(category) => {
                    query.col_expr(blog::Column::Category, Expr::value(category.clone()))
                }
                FieldUpdate::Tags(tags) => query.col_expr(
                    blog::Column::Tags,
                    Expr::value(serde_json::Value::from(tags.clone())),
                ),
                FieldUpdate::UpdatedAt(at) => query.col_expr(
                    blog::Column::UpdatedAt,
                    Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(*at)),
                ),
            };
        }

        let result = query.exec(&self.db).await.map_err(db_error)?;
        Ok(result.rows_affected)
    }

    async fn delete_one(&self, id: BlogId) -> Result<u64, RepoError> {
        let result = BlogEntity::delete_by_id(id.as_uuid())
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected)
    }

    async fn find_one(&self, id: BlogId) -> Result<Option<Blog>, RepoError> {
        BlogEntity::find_by_id(id.as_uuid())
            .one(&self.db)
            .await
            .map_err(db_error)?
            .map(Blog::try_from)
            .transpose()
    }

    async fn find_many(&self, filter: &SearchFilter) -> Result<Vec<Blog>, RepoError> {
        let mut select = BlogEntity::find();
        if let SearchFilter::Pattern(pattern) = filter {
            tracing::debug!(%pattern, "Searching blogs");
            select = select.filter(pattern_condition(pattern));
        }

        let rows = select.all(&self.db).await.map_err(db_error)?;
        rows.into_iter().map(Blog::try_from).collect()
    }
}
