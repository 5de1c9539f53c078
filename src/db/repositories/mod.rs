//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity.

pub mod category;
pub mod contact;
pub mod event;
pub mod gallery;
pub mod post;
pub mod project;
pub mod session;
pub mod tag;
pub mod user;

pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use contact::{ContactRepository, SqlxContactRepository};
pub use event::{EventRepository, SqlxEventRepository};
pub use gallery::{GalleryRepository, SqlxGalleryRepository};
pub use post::{PostRepository, SqlxPostRepository};
pub use project::{ProjectRepository, SqlxProjectRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use tag::{SqlxTagRepository, TagRepository};
pub use user::{SqlxUserRepository, UserRepository};
