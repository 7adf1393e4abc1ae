use crate::database::connection::DbPool;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum PostError {
    #[error("Post with ID {id} not found")]
    NotFound { id: Uuid },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub slug: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub slug: String,
    pub published: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<Option<String>>,
    pub slug: Option<String>,
    pub published: Option<bool>,
}

impl Post {
    pub async fn create(pool: &DbPool, post: CreatePost) -> Result<Self, sqlx::Error> {
        let now = Utc::now();

        let post = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (id, title, content, image, slug, published, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(post.title)
        .bind(post.content)
        .bind(post.image)
        .bind(post.slug)
        .bind(post.published)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(post)
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(post)
    }

    pub async fn find_by_slug(pool: &DbPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;

        Ok(post)
    }

    pub async fn find_published_by_slug(
        pool: &DbPool,
        slug: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let post =
            sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE slug = $1 AND published = TRUE")
                .bind(slug)
                .fetch_optional(pool)
                .await?;

        Ok(post)
    }

    pub async fn list(
        pool: &DbPool,
        published: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts
             WHERE ($1::BOOLEAN IS NULL OR published = $1)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(published)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    pub async fn count(pool: &DbPool, published: Option<bool>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM posts WHERE ($1::BOOLEAN IS NULL OR published = $1)",
        )
        .bind(published)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    pub async fn update(
        pool: &DbPool,
        id: Uuid,
        update_data: UpdatePost,
    ) -> Result<Self, PostError> {
        let existing = match Self::find_by_id(pool, id).await? {
            Some(post) => post,
            None => return Err(PostError::NotFound { id }),
        };

        let now = Utc::now();

        let updated_post = sqlx::query_as::<_, Post>(
            "UPDATE posts
             SET title = $2, content = $3, image = $4, slug = $5, published = $6, updated_at = $7
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(update_data.title.unwrap_or(existing.title))
        .bind(update_data.content.unwrap_or(existing.content))
        .bind(update_data.image.unwrap_or(existing.image))
        .bind(update_data.slug.unwrap_or(existing.slug))
        .bind(update_data.published.unwrap_or(existing.published))
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(updated_post)
    }

    pub async fn delete(pool: &DbPool, id: Uuid) -> Result<(), PostError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PostError::NotFound { id });
        }

        Ok(())
    }
}
