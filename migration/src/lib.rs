pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_members;
mod m20250301_000002_create_posts_and_comments;

/// Schema for the membership module: members plus the posts and comments they own
pub struct BlogMigrator;

#[async_trait::async_trait]
impl MigratorTrait for BlogMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_members::Migration),
            Box::new(m20250301_000002_create_posts_and_comments::Migration),
        ]
    }
}
