/// Content of a post about to be written
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}
