//! API layer - HTTP handlers and routing
//!
//! Public pages (home, blog, events, gallery, projects, contact) live at
//! the site root; the back-office lives under /admin-area behind the
//! admin middleware; uploaded media is served from /media.

pub mod admin;
pub mod auth;
pub mod categories;
pub mod contact;
pub mod events;
pub mod gallery;
pub mod middleware;
pub mod posts;
pub mod projects;
pub mod responses;
pub mod site;
pub mod tags;
pub mod upload;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::path::Path;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// Build the admin-area router (gated by the admin middleware).
fn admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        // Posts (slug-addressed)
        .route("/posts", get(posts::admin_list))
        .route("/posts/create", post(posts::admin_create))
        .route(
            "/posts/edit/{slug}",
            get(posts::admin_get).put(posts::admin_update),
        )
        .route(
            "/posts/delete/{slug}",
            get(posts::admin_get).delete(posts::admin_delete),
        )
        // Events (slug-addressed)
        .route("/events", get(events::admin_list))
        .route("/events/create", post(events::admin_create))
        .route(
            "/events/edit/{slug}",
            get(events::admin_get).put(events::admin_update),
        )
        .route(
            "/events/delete/{slug}",
            get(events::admin_get).delete(events::admin_delete),
        )
        // Categories
        .route("/categories", get(categories::list))
        .route("/categories/create", post(categories::admin_create))
        .route(
            "/categories/edit/{id}",
            get(categories::admin_get).put(categories::admin_update),
        )
        .route(
            "/categories/delete/{id}",
            get(categories::admin_get).delete(categories::admin_delete),
        )
        // Tags
        .route("/tags", get(tags::list))
        .route("/tags/create", post(tags::admin_create))
        .route("/tags/edit/{id}", put(tags::admin_update))
        .route("/tags/delete/{id}", delete(tags::admin_delete))
        // Gallery
        .route("/gallery", get(gallery::admin_list))
        .route("/gallery/create", post(gallery::admin_create))
        .route(
            "/gallery/edit/{id}",
            get(gallery::admin_get).put(gallery::admin_update),
        )
        .route(
            "/gallery/delete/{id}",
            get(gallery::admin_get).delete(gallery::admin_delete),
        )
        // Projects
        .route("/projects", get(projects::admin_list))
        .route("/projects/create", post(projects::admin_create))
        .route(
            "/projects/edit/{id}",
            get(projects::admin_get).put(projects::admin_update),
        )
        .route(
            "/projects/delete/{id}",
            get(projects::admin_get).delete(projects::admin_delete),
        )
        // Users
        .route("/users", get(admin::list_users))
        .route(
            "/users/edit/{id}",
            get(admin::get_user).put(admin::update_user),
        )
        .route("/users/permissions/{id}", put(admin::update_permissions))
        .route(
            "/users/delete/{id}",
            get(admin::get_user).delete(admin::delete_user),
        )
        // Contact messages (read and mark only, never created here)
        .route("/messages", get(admin::list_messages))
        .route("/messages/mark-read/{id}", post(admin::mark_message_read))
        // Media upload
        .route("/upload/image", post(upload::upload_image))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_admin,
        ))
}

/// Build the complete application router.
pub fn build_router(state: AppState, cors_origin: &str, media_root: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000")),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    // Auth endpoints that require a valid session
    let protected_auth = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        // Public pages
        .route("/", get(site::home))
        .route("/blog", get(posts::list_public))
        .route("/blog/{slug}", get(posts::get_public))
        .route("/blog/{slug}/like", post(posts::like))
        .route("/events", get(events::list_public))
        .route("/events/{slug}", get(events::get_public))
        .route("/events/{slug}/register", post(events::register))
        .route("/gallery", get(gallery::list_public))
        .route("/projects", get(projects::list_public))
        .route("/projects/{slug}", get(projects::get_public))
        .route("/contact", post(contact::submit))
        .route("/categories", get(categories::list))
        .route("/tags", get(tags::list))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected_auth)
        // Admin area
        .nest("/admin-area", admin_router(state.clone()))
        // Uploaded media
        .nest_service("/media", ServeDir::new(media_root))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::config::{CacheConfig, UploadConfig};
    use crate::db::repositories::{
        SqlxCategoryRepository, SqlxContactRepository, SqlxEventRepository,
        SqlxGalleryRepository, SqlxPostRepository, SqlxProjectRepository,
        SqlxSessionRepository, SqlxTagRepository, SqlxUserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{UpdatePermissionsInput, UserRole};
    use crate::services::{
        CategoryService, ContactService, EventService, GalleryService, PostService,
        ProjectService, RegisterInput, TagService, UserService,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use std::sync::Arc;

    async fn build_test_state() -> AppState {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let cache = create_cache(&CacheConfig::default());
        let category_repo = SqlxCategoryRepository::boxed(pool.clone());
        let event_repo = SqlxEventRepository::boxed(pool.clone());

        AppState {
            user_service: Arc::new(UserService::new(
                SqlxUserRepository::boxed(pool.clone()),
                SqlxSessionRepository::boxed(pool.clone()),
            )),
            category_service: Arc::new(CategoryService::new(
                category_repo.clone(),
                cache.clone(),
            )),
            tag_service: Arc::new(TagService::new(SqlxTagRepository::boxed(pool.clone()), cache)),
            post_service: Arc::new(PostService::new(
                SqlxPostRepository::boxed(pool.clone()),
                category_repo,
            )),
            event_service: Arc::new(EventService::new(event_repo.clone())),
            project_service: Arc::new(ProjectService::new(SqlxProjectRepository::boxed(
                pool.clone(),
            ))),
            gallery_service: Arc::new(GalleryService::new(
                SqlxGalleryRepository::boxed(pool.clone()),
                event_repo,
            )),
            contact_service: Arc::new(ContactService::new(SqlxContactRepository::boxed(pool))),
            upload_config: Arc::new(UploadConfig::default()),
        }
    }

    async fn server(state: AppState) -> TestServer {
        let media_root = std::env::temp_dir();
        let app = build_router(state, "http://localhost:3000", &media_root);
        TestServer::new(app).expect("Failed to start test server")
    }

    /// Register a user and return a session token, optionally promoting
    /// them to admin first.
    async fn login_token(state: &AppState, username: &str, admin: bool) -> String {
        let user = state
            .user_service
            .register(RegisterInput::new(
                username,
                format!("{}@example.com", username),
                "senha123",
            ))
            .await
            .expect("register");

        if admin {
            state
                .user_service
                .update_permissions(
                    user.id,
                    UpdatePermissionsInput {
                        is_active: true,
                        role: UserRole::Admin,
                    },
                )
                .await
                .expect("promote");
        }

        let (_, session) = state
            .user_service
            .login(crate::services::LoginInput::new(username, "senha123"))
            .await
            .expect("login");
        session.id
    }

    #[tokio::test]
    async fn test_home_page_is_public() {
        let state = build_test_state().await;
        let server = server(state).await;

        let response = server.get("/").await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_area_redirects_unauthenticated() {
        let state = build_test_state().await;
        let server = server(state).await;

        for path in [
            "/admin-area/dashboard",
            "/admin-area/posts",
            "/admin-area/events",
            "/admin-area/users",
            "/admin-area/messages",
        ] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::SEE_OTHER);
            assert_eq!(response.header("location").to_str().unwrap(), "/");
        }
    }

    #[tokio::test]
    async fn test_admin_area_redirects_non_admin() {
        let state = build_test_state().await;
        let token = login_token(&state, "leitora", false).await;
        let server = server(state).await;

        let response = server
            .get("/admin-area/dashboard")
            .authorization_bearer(&token)
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location").to_str().unwrap(), "/");
    }

    #[tokio::test]
    async fn test_admin_can_open_dashboard() {
        let state = build_test_state().await;
        let token = login_token(&state, "gestora", true).await;
        let server = server(state).await;

        let response = server
            .get("/admin-area/dashboard")
            .authorization_bearer(&token)
            .await;

        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_post_lifecycle_through_http() {
        let state = build_test_state().await;
        let token = login_token(&state, "gestora", true).await;
        let server = server(state).await;

        let response = server
            .post("/admin-area/categories/create")
            .authorization_bearer(&token)
            .json(&serde_json::json!({"name": "Educação"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let category: serde_json::Value = response.json();

        let response = server
            .post("/admin-area/posts/create")
            .authorization_bearer(&token)
            .json(&serde_json::json!({
                "title": "Primeiro Post",
                "excerpt": "Resumo",
                "content": "Conteúdo",
                "category_id": category["id"],
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        // Public detail increments the view counter
        let response = server.get("/blog/primeiro-post").await;
        response.assert_status(StatusCode::OK);
        let post: serde_json::Value = response.json();
        assert_eq!(post["views"], 1);

        let response = server.get("/blog/primeiro-post").await;
        let post: serde_json::Value = response.json();
        assert_eq!(post["views"], 2);
    }

    #[tokio::test]
    async fn test_contact_form_validation() {
        let state = build_test_state().await;
        let server = server(state).await;

        let response = server
            .post("/contact")
            .json(&serde_json::json!({
                "name": "Maria",
                "email": "maria@example.com",
                "subject": "Dúvida",
                "message": "Como participo?",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let response = server
            .post("/contact")
            .json(&serde_json::json!({
                "name": "",
                "email": "maria@example.com",
                "subject": "Dúvida",
                "message": "Como participo?",
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_auth_me_requires_session() {
        let state = build_test_state().await;
        let token = login_token(&state, "maria", false).await;
        let server = server(state).await;

        let response = server.get("/auth/me").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let response = server.get("/auth/me").authorization_bearer(&token).await;
        response.assert_status(StatusCode::OK);
    }
}
