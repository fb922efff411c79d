// Stores layer - Data access and repository pattern
pub mod comment_store;
pub mod member_store;
pub mod post_store;

pub use comment_store::CommentStore;
pub use member_store::MemberStore;
pub use post_store::PostStore;
