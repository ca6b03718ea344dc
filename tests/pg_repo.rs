#![cfg(feature = "postgres-store")]

use chrono::NaiveDate;
use ideas_explorer::models::{IdeaStatus, NewIdea, TipoIdea, UpdateIdea};
use ideas_explorer::repo::{pg::PgRepo, IdeaRepo, RepoError};
use sqlx::{Pool, Postgres};

// One connection, so the session's temp table shadows the real one.
async fn pg_pool() -> Option<Pool<Postgres>> {
    let url = std::env::var("DATABASE_URL").ok()?;
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await
        .ok()
}

async fn temp_table(pool: &Pool<Postgres>, list_type: &str) {
    sqlx::query("DROP TABLE IF EXISTS pg_temp.ideas_social_content").execute(pool).await.unwrap();
    let ddl = format!(
        "CREATE TEMP TABLE ideas_social_content (
            id BIGSERIAL PRIMARY KEY,
            fecha DATE NOT NULL,
            nicho TEXT NOT NULL,
            body TEXT NOT NULL,
            tipo_idea TEXT,
            tipo_post TEXT,
            guion TEXT,
            idea TEXT NOT NULL,
            status INTEGER DEFAULT 1,
            web_app_prompt TEXT,
            db_structure TEXT,
            redes_sociales {list_type},
            images_prompt {list_type},
            created_at TIMESTAMPTZ DEFAULT now(),
            updated_at TIMESTAMPTZ DEFAULT now()
        )"
    );
    sqlx::query(&ddl).execute(pool).await.unwrap();
}

#[tokio::test]
#[serial_test::serial]
async fn pg_round_trip_through_mapper() {
    let Some(pool) = pg_pool().await else { eprintln!("skip: no DATABASE_URL"); return; };
    temp_table(&pool, "TEXT").await;
    let repo = PgRepo::new(pool);

    let created = repo
        .create_idea(NewIdea {
            fecha: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            nicho: "pg-test".into(),
            body: "created by the integration suite".into(),
            tipo_idea: Some(TipoIdea::WorkflowN8n),
            tipo_post: None,
            guion: Some("draft".into()),
            idea: "pg round trip".into(),
            status: None,
            web_app_prompt: None,
            db_structure: None,
            redes_sociales: vec!["YouTube".into(), "X".into()],
            images_prompt: vec![],
        })
        .await
        .unwrap();
    assert_eq!(created.status, IdeaStatus::Pending);
    assert_eq!(created.redes_sociales, ["YouTube", "X"]);

    let updated = repo
        .update_idea(created.id, UpdateIdea { guion: Some(None), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(updated.guion, None);
    assert_eq!(updated.idea, "pg round trip");

    let posted = repo.update_status(created.id, IdeaStatus::Posting).await.unwrap();
    assert_eq!(posted.status, IdeaStatus::Posting);

    repo.delete_idea(created.id).await.unwrap();
    assert!(matches!(repo.get_idea(created.id).await, Err(RepoError::NotFound)));
    assert!(matches!(repo.delete_idea(created.id).await, Err(RepoError::NotFound)));
}

#[tokio::test]
#[serial_test::serial]
async fn pg_reads_legacy_text_and_array_list_columns() {
    let Some(pool) = pg_pool().await else { eprintln!("skip: no DATABASE_URL"); return; };

    temp_table(&pool, "TEXT").await;
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO ideas_social_content (fecha, nicho, body, idea, status, redes_sociales, images_prompt) \
         VALUES ('2024-01-01', 'n', 'b', 'legacy', 9, 'Instagram|TikTok', NULL) RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let idea = PgRepo::new(pool.clone()).get_idea(id).await.unwrap();
    assert_eq!(idea.redes_sociales, ["Instagram", "TikTok"]);
    assert!(idea.images_prompt.is_empty());
    assert_eq!(idea.status, IdeaStatus::Pending);

    temp_table(&pool, "TEXT[]").await;
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO ideas_social_content (fecha, nicho, body, idea, redes_sociales, images_prompt) \
         VALUES ('2024-01-02', 'n', 'b', 'array', ARRAY['Instagram', 'TikTok'], ARRAY[]::text[]) RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    let repo = PgRepo::new(pool);
    let idea = repo.get_idea(id).await.unwrap();
    assert_eq!(idea.redes_sociales, ["Instagram", "TikTok"]);
    assert!(idea.images_prompt.is_empty());
    assert_eq!(repo.list_ideas().await.unwrap().len(), 1);
}
