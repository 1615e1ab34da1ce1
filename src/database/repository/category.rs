use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::manager::{escape_like, DatabaseError};
use crate::database::models::{Category, CategoryChanges, CategoryFilter, CategoryRow, NewCategory};
use crate::types::{PageRequest, Status};

const SELECT_CATEGORY: &str = r#"
    SELECT c.id, c.name, c.slug, c.description, c.image, c.status,
           c.parent_id, p.name AS parent_name, p.slug AS parent_slug,
           c.created_at, c.updated_at
    FROM categories c
    LEFT JOIN categories p ON p.id = c.parent_id
"#;

pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &CategoryFilter, page: &PageRequest) -> Result<Vec<Category>, DatabaseError> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_CATEGORY);
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY c.created_at DESC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = builder.build_query_as::<CategoryRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn count(&self, filter: &CategoryFilter) -> Result<i64, DatabaseError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM categories c");
        push_filter(&mut builder, filter);
        let (total,) = builder.build_query_as::<(i64,)>().fetch_one(&self.pool).await?;
        Ok(total)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Category>, DatabaseError> {
        let sql = format!("{} WHERE c.id = $1", SELECT_CATEGORY);
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Category::from))
    }

    pub async fn get(&self, id: Uuid) -> Result<Category, DatabaseError> {
        self.find(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Category not found".to_string()))
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM categories WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, new: &NewCategory) -> Result<Category, DatabaseError> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO categories (name, slug, description, image, status, parent_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&new.name)
        .bind(&new.slug)
        .bind(&new.description)
        .bind(&new.image)
        .bind(new.status)
        .bind(new.parent_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(%id, slug = %new.slug, "Created category");
        self.get(id).await
    }

    pub async fn update(&self, id: Uuid, changes: &CategoryChanges) -> Result<Category, DatabaseError> {
        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                image = CASE WHEN $6 THEN $7 ELSE image END,
                status = COALESCE($8, status),
                parent_id = $9,
                updated_at = now()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.slug)
        .bind(changes.description.is_some())
        .bind(changes.description.clone().flatten())
        .bind(changes.image.is_some())
        .bind(changes.image.clone().flatten())
        .bind(changes.status)
        .bind(changes.parent_id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(_) => self.get(id).await,
            None => Err(DatabaseError::NotFound("Category not found".to_string())),
        }
    }

    pub async fn set_status(&self, id: Uuid, status: Status) -> Result<Category, DatabaseError> {
        let result = sqlx::query("UPDATE categories SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Category not found".to_string()));
        }
        self.get(id).await
    }

    /// Collections and child categories pointing here are unlinked by the schema.
    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Category not found".to_string()));
        }
        tracing::info!(%id, "Deleted category");
        Ok(())
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &CategoryFilter) {
    builder.push(" WHERE TRUE");

    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(search));
        builder
            .push(" AND (c.name LIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.slug LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        builder.push(" AND c.status = ").push_bind(status);
    }
}
