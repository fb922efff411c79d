use sea_orm::entity::prelude::*;

/// Row of the `posts` table, owned by the member in `writer_id`
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(indexed)]
    pub writer_id: i64,
    pub title: String,
    pub content: String,
    // Unix timestamps (seconds)
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
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Writer.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
