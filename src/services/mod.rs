// Services layer - Business logic and orchestration
pub mod login_service;
pub mod member_service;
pub mod password_encoder;

pub use login_service::LoginService;
pub use member_service::{MemberService, MemberUpdate};
pub use password_encoder::{Argon2PasswordEncoder, DelegatingPasswordEncoder, PasswordEncoder};
