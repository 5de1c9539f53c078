//! NEABI - content management and event registration backend

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neabi::{
    api::{self, AppState},
    cache::create_cache,
    config::Config,
    db::{
        self,
        repositories::{
            SqlxCategoryRepository, SqlxContactRepository, SqlxEventRepository,
            SqlxGalleryRepository, SqlxPostRepository, SqlxProjectRepository,
            SqlxSessionRepository, SqlxTagRepository, SqlxUserRepository,
        },
    },
    services::{
        CategoryService, ContactService, EventService, GalleryService, PostService,
        ProjectService, TagService, UserService,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neabi=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting NEABI backend...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {}", config.database.url);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Initialize cache
    let cache = create_cache(&config.cache);

    // Create repositories
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());
    let category_repo = SqlxCategoryRepository::boxed(pool.clone());
    let tag_repo = SqlxTagRepository::boxed(pool.clone());
    let post_repo = SqlxPostRepository::boxed(pool.clone());
    let event_repo = SqlxEventRepository::boxed(pool.clone());
    let project_repo = SqlxProjectRepository::boxed(pool.clone());
    let gallery_repo = SqlxGalleryRepository::boxed(pool.clone());
    let contact_repo = SqlxContactRepository::boxed(pool.clone());

    // Initialize services
    let user_service = Arc::new(UserService::new(user_repo, session_repo.clone()));
    let category_service = Arc::new(CategoryService::new(category_repo.clone(), cache.clone()));
    let tag_service = Arc::new(TagService::new(tag_repo, cache.clone()));
    let post_service = Arc::new(PostService::new(post_repo, category_repo));
    let event_service = Arc::new(EventService::new(event_repo.clone()));
    let project_service = Arc::new(ProjectService::new(project_repo));
    let gallery_service = Arc::new(GalleryService::new(gallery_repo, event_repo));
    let contact_service = Arc::new(ContactService::new(contact_repo));

    // Build application state
    let state = AppState {
        user_service,
        category_service,
        tag_service,
        post_service,
        event_service,
        project_service,
        gallery_service,
        contact_service,
        upload_config: Arc::new(config.upload.clone()),
    };

    // Periodic expired-session sweep (runs hourly)
    {
        let session_repo = session_repo.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(3600));
            loop {
                interval.tick().await;
                match session_repo.delete_expired().await {
                    Ok(n) if n > 0 => tracing::debug!("Removed {} expired sessions", n),
                    Ok(_) => {}
                    Err(e) => tracing::warn!("Session cleanup failed: {}", e),
                }
            }
        });
    }

    // Build router
    let app = api::build_router(
        state,
        &config.server.cors_origin,
        &config.upload.media_root,
    );

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
