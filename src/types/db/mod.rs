// Database entities - SeaORM models
pub mod comment;
pub mod member;
pub mod post;

pub use member::Role;
