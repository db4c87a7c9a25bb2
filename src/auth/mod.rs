pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod utils;

pub use claims::{Claims, UserRole};
pub use jwt::JwtService;
pub use middleware::{AuthMiddleware, AuthenticatedUser};
pub use utils::{require_admin, require_course_instructor, require_instructor};
