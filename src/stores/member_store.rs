use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::Query;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};

use crate::errors::internal::{DatabaseError, MemberError};
use crate::errors::InternalError;
use crate::types::db::{comment, member, post};
use crate::types::internal::Member;

/// Maximum length of username, name and nick name columns
pub const MAX_NAME_LENGTH: usize = 30;

/// Maximum length of the refresh token column
pub const MAX_REFRESH_TOKEN_LENGTH: usize = 1000;

/// Repository for the member aggregate
///
/// Every operation takes the connection to run on, so callers decide whether it
/// joins an open transaction. Loading a member also loads the ids of the posts
/// and comments it owns.
pub struct MemberStore {}

impl MemberStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Insert a transient member or update a persisted one
    ///
    /// Blank or over-long fields are rejected here as constraint violations;
    /// username uniqueness is left to the unique index, so two concurrent
    /// registrations of the same name fail on the second insert.
    ///
    /// # Arguments
    /// * `conn` - Connection or open transaction to write on
    /// * `member` - Aggregate to persist; its `id` decides insert vs update
    ///
    /// # Returns
    /// * `Ok(Member)` - The stored member with id and timestamps filled in
    /// * `Err(InternalError::Member(ConstraintViolation))` - Blank or over-long field
    /// * `Err(InternalError::Member(DuplicateUsername))` - Username already taken
    /// * `Err(InternalError::Member(MemberNotFound))` - Update of a row that no longer exists
    pub async fn save(
        &self,
        conn: &impl ConnectionTrait,
        member: Member,
    ) -> Result<Member, InternalError> {
        Self::check_constraints(&member)?;
        let now = Utc::now().timestamp();

        let model = match member.id() {
            None => {
                let new_member = member::ActiveModel {
                    id: NotSet,
                    username: Set(member.username().to_owned()),
                    password: Set(member.password().to_owned()),
                    name: Set(member.name().to_owned()),
                    nick_name: Set(member.nick_name().to_owned()),
                    age: Set(member.age()),
                    role: Set(member.role()),
                    refresh_token: Set(member.refresh_token().map(str::to_owned)),
                    created_at: Set(now),
                    updated_at: Set(now),
                };

                let model = new_member
                    .insert(conn)
                    .await
                    .map_err(|e| Self::map_write_error("insert_member", member.username(), e))?;
                tracing::debug!(member_id = model.id, username = %model.username, "Member inserted");
                model
            }
            Some(member_id) => {
                let changed_member = member::ActiveModel {
                    id: Unchanged(member_id),
                    username: Set(member.username().to_owned()),
                    password: Set(member.password().to_owned()),
                    name: Set(member.name().to_owned()),
                    nick_name: Set(member.nick_name().to_owned()),
                    age: Set(member.age()),
                    role: Set(member.role()),
                    refresh_token: Set(member.refresh_token().map(str::to_owned)),
                    created_at: NotSet,
                    updated_at: Set(now),
                };

                let model = changed_member.update(conn).await.map_err(|e| match e {
                    DbErr::RecordNotUpdated => MemberError::member_not_found(member_id),
                    e => Self::map_write_error("update_member", member.username(), e),
                })?;
                tracing::debug!(member_id, "Member updated");
                model
            }
        };

        Ok(Member::hydrate(
            model,
            member.post_list().to_vec(),
            member.comment_list().to_vec(),
        ))
    }

    /// Load a member and the ids of everything it owns
    ///
    /// # Returns
    /// * `Ok(Some(Member))` - Member found
    /// * `Ok(None)` - No member has this id
    /// * `Err(InternalError::Database(..))` - Query failed
    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        member_id: i64,
    ) -> Result<Option<Member>, InternalError> {
        let model = member::Entity::find_by_id(member_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_member_by_id", e))?;

        self.hydrate_optional(conn, model).await
    }

    /// Load the member registered as `username`
    ///
    /// Usernames are unique, so at most one member matches.
    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<Member>, InternalError> {
        let model = member::Entity::find()
            .filter(member::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_member_by_username", e))?;

        self.hydrate_optional(conn, model).await
    }

    /// Whether any member is registered as `username`
    ///
    /// # Arguments
    /// * `conn` - Connection to query on
    /// * `username` - Exact username, compared case-sensitively
    pub async fn exists_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<bool, InternalError> {
        let count = member::Entity::find()
            .filter(member::Column::Username.eq(username))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("exists_member_by_username", e))?;

        Ok(count > 0)
    }

    /// Load the member whose open session holds `refresh_token`
    pub async fn find_by_refresh_token(
        &self,
        conn: &impl ConnectionTrait,
        refresh_token: &str,
    ) -> Result<Option<Member>, InternalError> {
        let model = member::Entity::find()
            .filter(member::Column::RefreshToken.eq(refresh_token))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_member_by_refresh_token", e))?;

        self.hydrate_optional(conn, model).await
    }

    /// Load every member, ordered by id
    ///
    /// Owned post and comment ids are loaded with one query per table for the
    /// whole result, then grouped by writer.
    pub async fn find_all(&self, conn: &impl ConnectionTrait) -> Result<Vec<Member>, InternalError> {
        let models = member::Entity::find()
            .order_by_asc(member::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_all_members", e))?;

        let post_rows: Vec<(i64, i64)> = post::Entity::find()
            .select_only()
            .column(post::Column::WriterId)
            .column(post::Column::Id)
            .order_by_asc(post::Column::Id)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("load_all_member_posts", e))?;

        let comment_rows: Vec<(i64, i64)> = comment::Entity::find()
            .select_only()
            .column(comment::Column::WriterId)
            .column(comment::Column::Id)
            .order_by_asc(comment::Column::Id)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("load_all_member_comments", e))?;

        let mut post_lists = group_by_writer(post_rows);
        let mut comment_lists = group_by_writer(comment_rows);

        Ok(models
            .into_iter()
            .map(|model| {
                let post_list = post_lists.remove(&model.id).unwrap_or_default();
                let comment_list = comment_lists.remove(&model.id).unwrap_or_default();
                Member::hydrate(model, post_list, comment_list)
            })
            .collect())
    }

    /// Number of registered members
    pub async fn count(&self, conn: &impl ConnectionTrait) -> Result<u64, InternalError> {
        member::Entity::find()
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_members", e))
    }

    /// Delete a member together with everything it owns
    ///
    /// Runs in one transaction: the member's comments, other members' comments
    /// on the member's posts, the member's posts, then the member row. Nothing
    /// is removed if any step fails.
    ///
    /// # Errors
    /// * `MemberError::NotPersisted` - `member` was never saved
    /// * `MemberError::MemberNotFound` - The row is already gone
    /// * `DatabaseError` - A step failed; the transaction is rolled back
    pub async fn delete<C>(&self, conn: &C, member: &Member) -> Result<(), InternalError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let member_id = member.id().ok_or_else(|| MemberError::NotPersisted {
            username: member.username().to_owned(),
        })?;

        let txn = conn
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        // Kept as a subquery: bind parameters per statement are capped
        let owned_posts = Query::select()
            .column(post::Column::Id)
            .from(post::Entity)
            .and_where(post::Column::WriterId.eq(member_id))
            .to_owned();

        let comments = comment::Entity::delete_many()
            .filter(
                Condition::any()
                    .add(comment::Column::WriterId.eq(member_id))
                    .add(comment::Column::PostId.in_subquery(owned_posts)),
            )
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_owned_comments", e))?;

        let posts = post::Entity::delete_many()
            .filter(post::Column::WriterId.eq(member_id))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_owned_posts", e))?;

        let deleted = member::Entity::delete_by_id(member_id)
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("delete_member", e))?;

        if deleted.rows_affected == 0 {
            // Dropping the transaction rolls back the child deletes
            return Err(MemberError::member_not_found(member_id));
        }

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        tracing::debug!(
            member_id,
            posts = posts.rows_affected,
            comments = comments.rows_affected,
            "Member deleted with owned posts and comments"
        );

        Ok(())
    }

    async fn hydrate_optional(
        &self,
        conn: &impl ConnectionTrait,
        model: Option<member::Model>,
    ) -> Result<Option<Member>, InternalError> {
        match model {
            Some(model) => Ok(Some(self.hydrate(conn, model).await?)),
            None => Ok(None),
        }
    }

    async fn hydrate(
        &self,
        conn: &impl ConnectionTrait,
        model: member::Model,
    ) -> Result<Member, InternalError> {
        let post_list: Vec<i64> = post::Entity::find()
            .select_only()
            .column(post::Column::Id)
            .filter(post::Column::WriterId.eq(model.id))
            .order_by_asc(post::Column::Id)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("load_member_posts", e))?;

        let comment_list: Vec<i64> = comment::Entity::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::WriterId.eq(model.id))
            .order_by_asc(comment::Column::Id)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("load_member_comments", e))?;

        Ok(Member::hydrate(model, post_list, comment_list))
    }

    fn check_constraints(member: &Member) -> Result<(), InternalError> {
        check_text("username", member.username(), MAX_NAME_LENGTH)?;
        check_text("name", member.name(), MAX_NAME_LENGTH)?;
        check_text("nick_name", member.nick_name(), MAX_NAME_LENGTH)?;

        if let Some(token) = member.refresh_token() {
            if token.chars().count() > MAX_REFRESH_TOKEN_LENGTH {
                return Err(MemberError::constraint_violation(
                    "refresh_token",
                    format!("must be at most {} characters", MAX_REFRESH_TOKEN_LENGTH),
                ));
            }
        }

        Ok(())
    }

    fn map_write_error(operation: &'static str, username: &str, err: DbErr) -> InternalError {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                tracing::debug!(username, "Rejected duplicate username");
                MemberError::duplicate_username(username)
            }
            _ => InternalError::database(operation, err),
        }
    }
}

impl Default for MemberStore {
    fn default() -> Self {
        Self::new()
    }
}

/// `(writer_id, id)` rows into id lists per writer, keeping row order
fn group_by_writer(rows: Vec<(i64, i64)>) -> HashMap<i64, Vec<i64>> {
    let mut lists: HashMap<i64, Vec<i64>> = HashMap::new();
    for (writer_id, id) in rows {
        lists.entry(writer_id).or_default().push(id);
    }
    lists
}

/// Non-blank, at most `max_length` characters
pub(crate) fn check_text(field: &'static str, value: &str, max_length: usize) -> Result<(), InternalError> {
    if value.trim().is_empty() {
        return Err(MemberError::constraint_violation(field, "must not be blank"));
    }
    if value.chars().count() > max_length {
        return Err(MemberError::constraint_violation(
            field,
            format!("must be at most {} characters", max_length),
        ));
    }
    Ok(())
}
