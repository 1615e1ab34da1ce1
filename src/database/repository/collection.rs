use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::manager::{escape_like, DatabaseError};
use crate::database::models::{Collection, CollectionChanges, CollectionFilter, CollectionRow, NewCollection};
use crate::types::{PageRequest, Status};

const SELECT_COLLECTION: &str = r#"
    SELECT c.id, c.name, c.slug, c.description, c.image, c.featured, c.status,
           c.category_id, cat.name AS category_name, cat.slug AS category_slug,
           c.created_at, c.updated_at
    FROM collections c
    LEFT JOIN categories cat ON cat.id = c.category_id
"#;

pub struct CollectionRepository {
    pool: PgPool,
}

impl CollectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest first
    pub async fn list(&self, filter: &CollectionFilter, page: &PageRequest) -> Result<Vec<Collection>, DatabaseError> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_COLLECTION);
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY c.created_at DESC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = builder.build_query_as::<CollectionRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Collection::from).collect())
    }

    pub async fn count(&self, filter: &CollectionFilter) -> Result<i64, DatabaseError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM collections c");
        push_filter(&mut builder, filter);
        let (total,) = builder.build_query_as::<(i64,)>().fetch_one(&self.pool).await?;
        Ok(total)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Collection>, DatabaseError> {
        let sql = format!("{} WHERE c.id = $1", SELECT_COLLECTION);
        let row = sqlx::query_as::<_, CollectionRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Collection::from))
    }

    pub async fn get(&self, id: Uuid) -> Result<Collection, DatabaseError> {
        self.find(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Collection not found".to_string()))
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM collections WHERE slug = $1)")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn create(&self, new: &NewCollection) -> Result<Collection, DatabaseError> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO collections (name, slug, description, image, featured, status, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&new.name)
        .bind(&new.slug)
        .bind(&new.description)
        .bind(&new.image)
        .bind(new.featured)
        .bind(new.status)
        .bind(new.category_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(%id, slug = %new.slug, "Created collection");
        self.get(id).await
    }

    pub async fn update(&self, id: Uuid, changes: &CollectionChanges) -> Result<Collection, DatabaseError> {
        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE collections SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                image = CASE WHEN $6 THEN $7 ELSE image END,
                featured = COALESCE($8, featured),
                status = COALESCE($9, status),
                category_id = $10,
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
        .bind(changes.featured)
        .bind(changes.status)
        .bind(changes.category_id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(_) => self.get(id).await,
            None => Err(DatabaseError::NotFound("Collection not found".to_string())),
        }
    }

    pub async fn set_status(&self, id: Uuid, status: Status) -> Result<Collection, DatabaseError> {
        let result = sqlx::query("UPDATE collections SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Collection not found".to_string()));
        }
        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Collection not found".to_string()));
        }
        tracing::info!(%id, "Deleted collection");
        Ok(())
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &CollectionFilter) {
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
    if let Some(featured) = filter.featured {
        builder.push(" AND c.featured = ").push_bind(featured);
    }
    if let Some(status) = filter.status {
        builder.push(" AND c.status = ").push_bind(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_sql_only_includes_given_conditions() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM collections c");
        push_filter(&mut builder, &CollectionFilter::default());
        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM collections c WHERE TRUE");

        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM collections c");
        push_filter(
            &mut builder,
            &CollectionFilter {
                search: Some("sale".to_string()),
                featured: Some(true),
                status: Some(Status::Active),
            },
        );
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM collections c WHERE TRUE AND (c.name LIKE $1 OR c.slug LIKE $2) \
             AND c.featured = $3 AND c.status = $4"
        );
    }

    #[test]
    fn empty_search_is_ignored() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM collections c");
        push_filter(
            &mut builder,
            &CollectionFilter {
                search: Some(String::new()),
                ..CollectionFilter::default()
            },
        );
        assert_eq!(builder.sql(), "SELECT 1 FROM collections c WHERE TRUE");
    }
}
