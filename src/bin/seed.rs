//! Seed initial NEABI data: admin and reader accounts, the category set,
//! the tag list and a handful of sample posts and events.
//!
//! Usage:
//!   cargo run --bin seed          # create anything that is missing
//!   cargo run --bin seed -- --reset   # wipe content tables first

use anyhow::Result;
use chrono::{Duration, NaiveTime, Utc};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neabi::{
    cache::create_cache,
    config::Config,
    db::{
        self,
        repositories::{
            SqlxCategoryRepository, SqlxEventRepository, SqlxPostRepository, SqlxTagRepository,
            SqlxUserRepository, UserRepository,
        },
    },
    models::{CreateCategoryInput, CreateEventInput, CreatePostInput, User, UserRole},
    services::{hash_password, CategoryService, EventService, PostService, TagService},
};

const CATEGORIES: &[&str] = &[
    "Educação",
    "Cultura",
    "Ciência",
    "Literatura",
    "Política",
    "Religião",
    "Arte",
    "Sociedade",
];

const TAGS: &[&str] = &[
    "representatividade",
    "quilombos",
    "povos indígenas",
    "literatura",
    "políticas afirmativas",
    "mulheres negras",
    "resistência",
    "cultura afro-brasileira",
    "conhecimento tradicional",
    "diáspora africana",
    "identidade",
    "universidade",
    "inclusão",
    "ancestralidade",
    "antirracismo",
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,neabi=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let reset = std::env::args().any(|arg| arg == "--reset");

    let config = Config::load_with_env(Path::new("config.yml"))?;
    let pool = db::create_pool(&config.database).await?;
    db::migrations::run_migrations(&pool).await?;

    if reset {
        tracing::info!("Resetting content tables...");
        for table in ["posts", "events", "gallery_images", "projects", "categories", "tags"] {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&pool)
                .await?;
        }
        sqlx::query("DELETE FROM users WHERE is_superuser = FALSE")
            .execute(&pool)
            .await?;
    }

    tracing::info!("Seeding NEABI initial data...");

    let cache = create_cache(&config.cache);
    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let category_repo = SqlxCategoryRepository::boxed(pool.clone());
    let category_service = CategoryService::new(category_repo.clone(), cache.clone());
    let tag_service = TagService::new(SqlxTagRepository::boxed(pool.clone()), cache);
    let post_service = PostService::new(SqlxPostRepository::boxed(pool.clone()), category_repo);
    let event_service = EventService::new(SqlxEventRepository::boxed(pool));

    // Users
    let admin_id = ensure_user(
        user_repo.as_ref(),
        "admin",
        "admin@neabi.edu.br",
        "admin123",
        "Administrador",
        "NEABI",
        UserRole::Admin,
    )
    .await?;
    ensure_user(
        user_repo.as_ref(),
        "leitor",
        "leitor@neabi.edu.br",
        "leitor123",
        "Usuário",
        "Leitor",
        UserRole::Reader,
    )
    .await?;

    // Categories
    for name in CATEGORIES {
        if category_service
            .list()
            .await?
            .iter()
            .any(|c| c.name == *name)
        {
            continue;
        }
        category_service
            .create(CreateCategoryInput::new(*name))
            .await?;
        tracing::info!("Created category: {}", name);
    }

    // Tags
    let existing_tags = tag_service.list().await?;
    for name in TAGS {
        if existing_tags.iter().any(|t| t.name == *name) {
            continue;
        }
        tag_service.create(name).await?;
        tracing::info!("Created tag: {}", name);
    }

    // Sample content
    let categories = category_service.list().await?;
    let educacao = categories
        .iter()
        .find(|c| c.name == "Educação")
        .expect("seeded category");
    let cultura = categories
        .iter()
        .find(|c| c.name == "Cultura")
        .expect("seeded category");

    let sample_posts = [
        (
            "A importância das ações afirmativas na universidade",
            "Como as políticas de cotas transformaram o acesso ao ensino superior.",
            educacao.id,
        ),
        (
            "Capoeira: patrimônio cultural e resistência",
            "Da criminalização ao reconhecimento como patrimônio imaterial.",
            cultura.id,
        ),
        (
            "Literatura afrodiaspórica em sala de aula",
            "Autores e obras para trabalhar a Lei 10.639 no ensino médio.",
            educacao.id,
        ),
    ];

    for (title, excerpt, category_id) in sample_posts {
        if post_service.get_by_slug(&neabi::services::slugify(title)).await?.is_some() {
            continue;
        }
        post_service
            .create(CreatePostInput {
                title: title.to_string(),
                slug: None,
                excerpt: excerpt.to_string(),
                content: format!("{}\n\nConteúdo completo em preparação.", excerpt),
                author_id: Some(admin_id),
                category_id,
                status: None,
                read_time: None,
                image: None,
                featured: false,
                tag_ids: Vec::new(),
            })
            .await?;
        tracing::info!("Created post: {}", title);
    }

    let next_month = (Utc::now() + Duration::days(30)).date_naive();
    let sample_events = [
        ("Roda de conversa: juventude negra na universidade", 60),
        ("Oficina de turbantes e identidade", 25),
    ];

    for (title, capacity) in sample_events {
        if event_service
            .get_by_slug(&neabi::services::slugify(title))
            .await?
            .is_some()
        {
            continue;
        }
        event_service
            .create(CreateEventInput {
                title: title.to_string(),
                slug: None,
                description: "Atividade aberta à comunidade acadêmica e externa.".to_string(),
                date: next_month,
                start_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
                location: "Auditório Central".to_string(),
                category_id: Some(cultura.id),
                event_type: None,
                status: None,
                capacity,
                organizer: "NEABI".to_string(),
                speakers: String::new(),
                image: None,
                featured: true,
                registration_required: true,
                price: None,
                registration_link: None,
                tag_ids: Vec::new(),
            })
            .await?;
        tracing::info!("Created event: {}", title);
    }

    tracing::info!("Seed completed");
    Ok(())
}

/// Create a user if the username is free; returns the user's ID either way.
async fn ensure_user(
    repo: &dyn UserRepository,
    username: &str,
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
    role: UserRole,
) -> Result<i64> {
    if let Some(existing) = repo.get_by_username(username).await? {
        return Ok(existing.id);
    }

    let mut user = User::new(
        username.to_string(),
        email.to_string(),
        hash_password(password)?,
        role,
    );
    user.first_name = first_name.to_string();
    user.last_name = last_name.to_string();
    if role == UserRole::Admin {
        user.is_staff = true;
        user.is_superuser = true;
    }

    let created = repo.create(&user).await?;
    tracing::info!("Created {} user: {}", role, created.email);
    Ok(created.id)
}
