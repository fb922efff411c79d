// Internal types - domain values that never map one-to-one onto a table
pub mod auth;
pub mod member;
pub mod post;

pub use auth::UserCredentials;
pub use member::{Member, NewMember};
pub use post::NewPost;
