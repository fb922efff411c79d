use sea_orm::entity::prelude::*;

/// Row of the `comments` table
///
/// Owned by its writer. Also removed when the post it belongs to is deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(indexed)]
    pub writer_id: i64,
    #[sea_orm(indexed)]
    pub post_id: i64,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::WriterId",
        to = "super::member::Column::Id",
        on_delete = "Restrict"
    )]
    Writer,
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "Restrict"
    )]
    Post,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Writer.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
