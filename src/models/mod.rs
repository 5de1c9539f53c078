//! Data models
//!
//! This module contains all data structures used throughout the NEABI
//! backend. Models are plain structs; persistence, validation and slug
//! assignment live in the repository and service layers.

mod category;
mod contact;
mod event;
mod gallery;
mod post;
mod project;
mod session;
mod tag;
mod user;

pub use category::{Category, CreateCategoryInput, UpdateCategoryInput};
pub use contact::{ContactMessage, CreateContactMessageInput};
pub use event::{
    CreateEventInput, Event, EventFilter, EventStatus, EventType, UpdateEventInput,
};
pub use gallery::{CreateGalleryImageInput, GalleryImage, UpdateGalleryImageInput};
pub use post::{
    CreatePostInput, ListParams, PagedResult, Post, PostFilter, PostStatus, UpdatePostInput,
};
pub use project::{CreateProjectInput, Project, UpdateProjectInput};
pub use session::Session;
pub use tag::Tag;
pub use user::{UpdatePermissionsInput, UpdateUserInput, User, UserRole};
