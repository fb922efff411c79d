use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use crate::errors::internal::{DatabaseError, MemberError, PostError};
use crate::errors::InternalError;
use crate::types::db::{comment, post};
use crate::types::internal::{Member, NewPost};

pub const MAX_TITLE_LENGTH: usize = 100;

/// Persistence for posts
///
/// Deleting a post also deletes its comments; deleting a writer goes through
/// `MemberStore::delete`.
pub struct PostStore {}

impl PostStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Write a post for `writer`, setting both sides of the association
    ///
    /// The row records `writer` as its writer and the post id is appended to
    /// the writer's owned list. `writer` must already be saved.
    ///
    /// # Arguments
    /// * `conn` - Connection or open transaction to write on
    /// * `writer` - Saved member; receives the new post id
    /// * `new_post` - Title (non-blank, at most 100 chars) and content
    ///
    /// # Returns
    /// * `Ok(post::Model)` - The stored post
    /// * `Err(InternalError::Member(NotPersisted))` - `writer` has no id yet
    /// * `Err(InternalError::Post(ConstraintViolation))` - Blank or over-long title
    pub async fn write_post(
        &self,
        conn: &impl ConnectionTrait,
        writer: &mut Member,
        new_post: NewPost,
    ) -> Result<post::Model, InternalError> {
        let writer_id = writer.id().ok_or_else(|| MemberError::NotPersisted {
            username: writer.username().to_owned(),
        })?;

        if new_post.title.trim().is_empty() {
            return Err(PostError::constraint_violation("title", "must not be blank"));
        }
        if new_post.title.chars().count() > MAX_TITLE_LENGTH {
            return Err(PostError::constraint_violation(
                "title",
                format!("must be at most {} characters", MAX_TITLE_LENGTH),
            ));
        }

        let now = Utc::now().timestamp();
        let post = post::ActiveModel {
            id: NotSet,
            writer_id: Set(writer_id),
            title: Set(new_post.title),
            content: Set(new_post.content),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_post", e))?;

        writer.add_post(&post);
        tracing::debug!(post_id = post.id, writer_id, "Post written");

        Ok(post)
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        post_id: i64,
    ) -> Result<Option<post::Model>, InternalError> {
        post::Entity::find_by_id(post_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_post_by_id", e))
    }

    /// Posts written by `writer_id`, oldest first
    pub async fn find_by_writer(
        &self,
        conn: &impl ConnectionTrait,
        writer_id: i64,
    ) -> Result<Vec<post::Model>, InternalError> {
        post::Entity::find()
            .filter(post::Column::WriterId.eq(writer_id))
            .order_by_asc(post::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_posts_by_writer", e))
    }

    /// Delete a post and every comment on it in one transaction
    ///
    /// The writer's in-memory post list is not updated; reload the member
    /// afterwards if it is still in use.
    ///
    /// # Errors
    /// * `PostError::PostNotFound` - No post has this id
    /// * `DatabaseError` - A step failed; the transaction is rolled back
    pub async fn delete<C>(&self, conn: &C, post_id: i64) -> Result<(), InternalError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = conn
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        comment::Entity::delete_many()
            .filter(comment::Column::PostId.eq(post_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_post_comments", e))?;

        let deleted = post::Entity::delete_by_id(post_id)
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_post", e))?;

        if deleted.rows_affected == 0 {
            return Err(PostError::post_not_found(post_id));
        }

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        Ok(())
    }
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::{CommentStore, MemberStore};
    use crate::test::utils::{new_member, new_post, setup_test_db};

    #[tokio::test]
    async fn test_write_post_sets_both_sides() {
        let db = setup_test_db().await;
        let mut writer = MemberStore::new().save(&db, new_member("writer")).await.unwrap();
        let store = PostStore::new();

        let post = store.write_post(&db, &mut writer, new_post("hello")).await.unwrap();

        assert_eq!(post.writer_id, writer.id().unwrap());
        assert_eq!(writer.post_list(), &[post.id]);
        assert_eq!(store.find_by_id(&db, post.id).await.unwrap(), Some(post));
    }

    #[tokio::test]
    async fn test_write_post_requires_saved_writer() {
        let db = setup_test_db().await;
        let mut transient = new_member("writer");

        let result = PostStore::new().write_post(&db, &mut transient, new_post("hello")).await;

        assert!(matches!(
            result,
            Err(InternalError::Member(MemberError::NotPersisted { .. }))
        ));
        assert!(transient.post_list().is_empty());
    }

    #[tokio::test]
    async fn test_write_post_rejects_blank_title() {
        let db = setup_test_db().await;
        let mut writer = MemberStore::new().save(&db, new_member("writer")).await.unwrap();

        let result = PostStore::new().write_post(&db, &mut writer, new_post(" ")).await;

        assert!(matches!(
            result,
            Err(InternalError::Post(PostError::ConstraintViolation { field: "title", .. }))
        ));
        assert!(writer.post_list().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_writer_lists_only_own_posts() {
        let db = setup_test_db().await;
        let members = MemberStore::new();
        let mut alice = members.save(&db, new_member("alice")).await.unwrap();
        let mut bob = members.save(&db, new_member("bob")).await.unwrap();
        let store = PostStore::new();

        store.write_post(&db, &mut alice, new_post("a1")).await.unwrap();
        store.write_post(&db, &mut bob, new_post("b1")).await.unwrap();
        store.write_post(&db, &mut alice, new_post("a2")).await.unwrap();

        let titles: Vec<_> = store
            .find_by_writer(&db, alice.id().unwrap())
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn test_delete_post_removes_its_comments() {
        let db = setup_test_db().await;
        let members = MemberStore::new();
        let mut alice = members.save(&db, new_member("alice")).await.unwrap();
        let mut bob = members.save(&db, new_member("bob")).await.unwrap();
        let posts = PostStore::new();
        let comments = CommentStore::new();

        let post = posts.write_post(&db, &mut alice, new_post("a1")).await.unwrap();
        let comment = comments
            .write_comment(&db, &mut bob, post.id, "nice post".to_string())
            .await
            .unwrap();

        posts.delete(&db, post.id).await.unwrap();

        assert!(posts.find_by_id(&db, post.id).await.unwrap().is_none());
        assert!(comments.find_by_id(&db, comment.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_post_delete_keeps_its_comments() {
        let db = setup_test_db().await;
        let members = MemberStore::new();
        let mut alice = members.save(&db, new_member("alice")).await.unwrap();
        let mut bob = members.save(&db, new_member("bob")).await.unwrap();
        let posts = PostStore::new();
        let comments = CommentStore::new();

        let post = posts.write_post(&db, &mut alice, new_post("a1")).await.unwrap();
        let comment = comments
            .write_comment(&db, &mut bob, post.id, "nice post".to_string())
            .await
            .unwrap();

        db.execute_unprepared(
            "CREATE TRIGGER reject_post_delete BEFORE DELETE ON posts \
             BEGIN SELECT RAISE(ABORT, 'post rows are locked'); END;",
        )
        .await
        .unwrap();

        let result = posts.delete(&db, post.id).await;

        assert!(matches!(
            result,
            Err(InternalError::Database(DatabaseError::Operation { operation: "delete_post", .. }))
        ));
        assert!(posts.find_by_id(&db, post.id).await.unwrap().is_some());
        assert!(comments.find_by_id(&db, comment.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_unknown_post() {
        let db = setup_test_db().await;

        let result = PostStore::new().delete(&db, 99).await;

        assert!(matches!(
            result,
            Err(InternalError::Post(PostError::PostNotFound { post_id: 99 }))
        ));
    }
}
