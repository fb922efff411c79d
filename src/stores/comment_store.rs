use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::errors::internal::{MemberError, PostError};
use crate::errors::InternalError;
use crate::types::db::{comment, post};
use crate::types::internal::Member;

/// Persistence for comments on posts
pub struct CommentStore {}

impl CommentStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Write a comment by `writer` on `post_id`, setting both sides of the association
    ///
    /// # Arguments
    /// * `conn` - Connection or open transaction to write on
    /// * `writer` - Saved member; receives the new comment id
    /// * `post_id` - Post being commented on; must exist
    /// * `content` - Non-blank comment body
    ///
    /// # Returns
    /// * `Ok(comment::Model)` - The stored comment
    /// * `Err(InternalError::Member(NotPersisted))` - `writer` has no id yet
    /// * `Err(InternalError::Post(PostNotFound))` - No post has `post_id`
    /// * `Err(InternalError::Post(ConstraintViolation))` - Blank content
    pub async fn write_comment(
        &self,
        conn: &impl ConnectionTrait,
        writer: &mut Member,
        post_id: i64,
        content: String,
    ) -> Result<comment::Model, InternalError> {
        let writer_id = writer.id().ok_or_else(|| MemberError::NotPersisted {
            username: writer.username().to_owned(),
        })?;

        if content.trim().is_empty() {
            return Err(PostError::constraint_violation("content", "must not be blank"));
        }

        let post_exists = post::Entity::find_by_id(post_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_comment_post", e))?
            .is_some();
        if !post_exists {
            return Err(PostError::post_not_found(post_id));
        }

        let now = Utc::now().timestamp();
        let comment = comment::ActiveModel {
            id: NotSet,
            writer_id: Set(writer_id),
            post_id: Set(post_id),
            content: Set(content),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_comment", e))?;

        writer.add_comment(&comment);
        tracing::debug!(comment_id = comment.id, post_id, writer_id, "Comment written");

        Ok(comment)
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        comment_id: i64,
    ) -> Result<Option<comment::Model>, InternalError> {
        comment::Entity::find_by_id(comment_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_comment_by_id", e))
    }

    /// Comments on `post_id` in the order they were written
    pub async fn find_by_post(
        &self,
        conn: &impl ConnectionTrait,
        post_id: i64,
    ) -> Result<Vec<comment::Model>, InternalError> {
        comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_comments_by_post", e))
    }
}

impl Default for CommentStore {
    fn default() -> Self {
        Self::new()
    }
}
