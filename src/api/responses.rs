//! Shared API response types
//!
//! Response structures used across public and admin endpoints so both
//! sides serialize entities the same way.

use serde::{Deserialize, Serialize};

use crate::models::{Category, ContactMessage, Event, GalleryImage, Post, Project, Tag, User};

/// Category info embedded in entity responses
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CategoryInfo {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

impl From<Category> for CategoryInfo {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            slug: c.slug,
            name: c.name,
        }
    }
}

/// Tag info embedded in entity responses
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TagInfo {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

impl From<Tag> for TagInfo {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            slug: t.slug,
            name: t.name,
        }
    }
}

/// Simple message envelope for mutations (the JSON analog of the flash
/// messages the original site showed after each admin action).
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Full post response
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub content_html: String,
    pub author_id: Option<i64>,
    pub category_id: i64,
    pub status: String,
    pub published_date: String,
    pub read_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagInfo>>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            slug: post.slug,
            title: post.title,
            excerpt: post.excerpt,
            content: post.content,
            content_html: post.content_html,
            author_id: post.author_id,
            category_id: post.category_id,
            status: post.status.to_string(),
            published_date: post.published_date.to_rfc3339(),
            read_time: post.read_time,
            image: post.image,
            views: post.views,
            likes: post.likes,
            featured: post.featured,
            created_at: post.created_at.to_rfc3339(),
            updated_at: post.updated_at.to_rfc3339(),
            category: None,
            tags: None,
        }
    }
}

impl PostResponse {
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category.map(Into::into);
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// Full event response
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub category_id: Option<i64>,
    pub event_type: String,
    pub status: String,
    pub capacity: i64,
    pub registered: i64,
    pub spots_remaining: i64,
    pub is_full: bool,
    pub organizer: String,
    pub speakers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub featured: bool,
    pub registration_required: bool,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_link: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagInfo>>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        let speakers = event.speakers_list();
        let spots_remaining = event.spots_remaining();
        let is_full = event.is_full();

        Self {
            id: event.id,
            slug: event.slug,
            title: event.title,
            description: event.description,
            date: event.date.to_string(),
            start_time: event.start_time.to_string(),
            end_time: event.end_time.to_string(),
            location: event.location,
            category_id: event.category_id,
            event_type: event.event_type.to_string(),
            status: event.status.to_string(),
            capacity: event.capacity,
            registered: event.registered,
            spots_remaining,
            is_full,
            organizer: event.organizer,
            speakers,
            image: event.image,
            featured: event.featured,
            registration_required: event.registration_required,
            price: event.price,
            registration_link: event.registration_link,
            created_at: event.created_at.to_rfc3339(),
            updated_at: event.updated_at.to_rfc3339(),
            category: None,
            tags: None,
        }
    }
}

impl EventResponse {
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category.map(Into::into);
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// Project response
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_to_join: Option<String>,
    pub is_active: bool,
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<TagInfo>>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            slug: project.slug,
            title: project.title,
            description: project.description,
            image: project.image,
            category_id: project.category_id,
            link_to_join: project.link_to_join,
            is_active: project.is_active,
            featured: project.featured,
            created_at: project.created_at.to_rfc3339(),
            updated_at: project.updated_at.to_rfc3339(),
            category: None,
            tags: None,
        }
    }
}

impl ProjectResponse {
    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category.map(Into::into);
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// Gallery image response
#[derive(Debug, Serialize)]
pub struct GalleryImageResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image: String,
    pub event_id: Option<i64>,
    pub published: bool,
    pub uploaded_at: String,
}

impl From<GalleryImage> for GalleryImageResponse {
    fn from(image: GalleryImage) -> Self {
        Self {
            id: image.id,
            title: image.title,
            description: image.description,
            image: image.image,
            event_id: image.event_id,
            published: image.published,
            uploaded_at: image.uploaded_at.to_rfc3339(),
        }
    }
}

/// User response (never exposes the password hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let full_name = user.full_name();
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            full_name,
            role: user.role.to_string(),
            is_active: user.is_active,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Contact message response
#[derive(Debug, Serialize)]
pub struct ContactMessageResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<ContactMessage> for ContactMessageResponse {
    fn from(message: ContactMessage) -> Self {
        Self {
            id: message.id,
            name: message.name,
            email: message.email,
            subject: message.subject,
            message: message.message,
            is_read: message.is_read,
            created_at: message.created_at.to_rfc3339(),
        }
    }
}
