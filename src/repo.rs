use async_trait::async_trait;

use crate::models::*;

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("not found")] NotFound,
    #[error("storage error: {0}")] Internal(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence for the `ideas_social_content` table. Every read goes through
/// the row mapper, so callers only ever see canonical [`Idea`]s.
#[async_trait]
pub trait IdeaRepo: Send + Sync {
    /// Newest `fecha` first.
    async fn list_ideas(&self) -> RepoResult<Vec<Idea>>;
    async fn get_idea(&self, id: Id) -> RepoResult<Idea>;
    async fn create_idea(&self, new: NewIdea) -> RepoResult<Idea>;
    async fn update_idea(&self, id: Id, upd: UpdateIdea) -> RepoResult<Idea>;
    async fn update_status(&self, id: Id, status: IdeaStatus) -> RepoResult<Idea>;
    async fn delete_idea(&self, id: Id) -> RepoResult<()>;
}

#[cfg(feature = "inmem-store")]
pub mod inmem {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

    use chrono::Utc;
    use serde::{Deserialize, Serialize};
    use serde_json::Value;
    use tracing::{error, info};

    use crate::mapper::encode_list;

    const SNAPSHOT_FILE: &str = "ideas.json";

    #[derive(Default, Serialize, Deserialize)]
    struct State {
        rows: BTreeMap<Id, IdeaRow>,
        // highest id ever handed out; ids are never reused after a delete
        next_id: Id,
    }

    /// Table kept in memory and written to a JSON snapshot after every
    /// mutation. Snapshot rows use the storage encoding, so hand-edited or
    /// imported rows with delimited or array list columns are still read
    /// correctly. A mutation whose snapshot write fails is rolled back.
    #[derive(Clone)]
    pub struct InMemRepo {
        state: Arc<RwLock<State>>,
        snapshot_path: Arc<PathBuf>,
    }

    impl InMemRepo {
        /// Snapshot stored as `ideas.json` inside `dir`.
        pub fn in_dir(dir: impl AsRef<Path>) -> RepoResult<Self> {
            Self::with_snapshot(dir.as_ref().join(SNAPSHOT_FILE))
        }

        /// Fails when the snapshot exists but cannot be read, so a bad file
        /// is never replaced by an empty table.
        pub fn with_snapshot(path: impl Into<PathBuf>) -> RepoResult<Self> {
            let path = path.into();
            let state = Self::load_state_from(&path)?;
            Ok(Self {
                state: Arc::new(RwLock::new(state)),
                snapshot_path: Arc::new(path),
            })
        }

        fn load_state_from(path: &Path) -> RepoResult<State> {
            let bytes = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    info!(path = %path.display(), "no idea snapshot, starting empty");
                    return Ok(State::default());
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "cannot read idea snapshot");
                    return Err(RepoError::Internal(format!("cannot read {}: {e}", path.display())));
                }
            };
            let mut s = serde_json::from_slice::<State>(&bytes).map_err(|e| {
                error!(path = %path.display(), error = %e, "unreadable idea snapshot");
                RepoError::Internal(format!("unreadable snapshot {}: {e}", path.display()))
            })?;
            let max_id = s.rows.keys().next_back().copied().unwrap_or(0);
            s.next_id = s.next_id.max(max_id);
            info!(path = %path.display(), rows = s.rows.len(), "loaded idea snapshot");
            Ok(s)
        }

        // Called with the write lock held so snapshots land in mutation order.
        fn persist(&self, state: &State) -> RepoResult<()> {
            let path = self.snapshot_path.as_path();
            let bytes = serde_json::to_vec_pretty(state).map_err(|e| RepoError::Internal(e.to_string()))?;
            let write = || -> std::io::Result<()> {
                if let Some(dir) = path.parent() {
                    std::fs::create_dir_all(dir)?;
                }
                std::fs::write(path, bytes)
            };
            write().map_err(|e| {
                error!(path = %path.display(), error = %e, "failed to write idea snapshot");
                RepoError::Internal(format!("cannot write {}: {e}", path.display()))
            })
        }

        fn read(&self) -> RepoResult<RwLockReadGuard<'_, State>> {
            self.state.read().map_err(|_| RepoError::Internal("state lock poisoned".into()))
        }

        fn write(&self) -> RepoResult<RwLockWriteGuard<'_, State>> {
            self.state.write().map_err(|_| RepoError::Internal("state lock poisoned".into()))
        }

        /// Insert a raw storage row as-is, e.g. when importing legacy data.
        pub fn import_row(&self, row: IdeaRow) -> RepoResult<()> {
            let mut s = self.write()?;
            let id = row.id;
            let previous = s.rows.insert(id, row);
            s.next_id = s.next_id.max(id);
            if let Err(e) = self.persist(&s) {
                match previous {
                    Some(prev) => s.rows.insert(id, prev),
                    None => s.rows.remove(&id),
                };
                return Err(e);
            }
            Ok(())
        }

        fn mutate<F>(&self, id: Id, apply: F) -> RepoResult<Idea>
        where
            F: FnOnce(&mut IdeaRow),
        {
            let mut s = self.write()?;
            let row = s.rows.get_mut(&id).ok_or(RepoError::NotFound)?;
            let previous = row.clone();
            apply(row);
            row.updated_at = Some(Utc::now());
            let updated = row.clone();
            if let Err(e) = self.persist(&s) {
                s.rows.insert(id, previous);
                return Err(e);
            }
            Ok(updated.into())
        }
    }

    fn list_column(items: &[String]) -> Option<Value> {
        Some(Value::String(encode_list(items)))
    }

    #[async_trait]
    impl IdeaRepo for InMemRepo {
        async fn list_ideas(&self) -> RepoResult<Vec<Idea>> {
            let s = self.read()?;
            let mut v: Vec<Idea> = s.rows.values().cloned().map(Idea::from).collect();
            v.sort_by(|a, b| b.fecha.cmp(&a.fecha).then(b.id.cmp(&a.id)));
            Ok(v)
        }

        async fn get_idea(&self, id: Id) -> RepoResult<Idea> {
            let s = self.read()?;
            s.rows.get(&id).cloned().map(Idea::from).ok_or(RepoError::NotFound)
        }

        async fn create_idea(&self, new: NewIdea) -> RepoResult<Idea> {
            let mut s = self.write()?;
            // the id is spent even if the snapshot write fails
            s.next_id += 1;
            let now = Utc::now();
            let row = IdeaRow {
                id: s.next_id,
                fecha: new.fecha,
                nicho: new.nicho,
                body: new.body,
                tipo_idea: new.tipo_idea.map(|t| t.as_str().to_string()),
                tipo_post: new.tipo_post.map(|t| t.as_str().to_string()),
                guion: new.guion,
                idea: new.idea,
                status: Some(i32::from(new.status.unwrap_or_default().code())),
                web_app_prompt: new.web_app_prompt,
                db_structure: new.db_structure,
                redes_sociales: list_column(&new.redes_sociales),
                images_prompt: list_column(&new.images_prompt),
                created_at: Some(now),
                updated_at: Some(now),
            };
            s.rows.insert(row.id, row.clone());
            if let Err(e) = self.persist(&s) {
                s.rows.remove(&row.id);
                return Err(e);
            }
            Ok(row.into())
        }

        async fn update_idea(&self, id: Id, upd: UpdateIdea) -> RepoResult<Idea> {
            self.mutate(id, |row| {
                if let Some(fecha) = upd.fecha { row.fecha = fecha; }
                if let Some(nicho) = upd.nicho { row.nicho = nicho; }
                if let Some(body) = upd.body { row.body = body; }
                if let Some(t) = upd.tipo_idea { row.tipo_idea = t.map(|t| t.as_str().to_string()); }
                if let Some(t) = upd.tipo_post { row.tipo_post = t.map(|t| t.as_str().to_string()); }
                if let Some(guion) = upd.guion { row.guion = guion; }
                if let Some(idea) = upd.idea { row.idea = idea; }
                if let Some(status) = upd.status { row.status = Some(i32::from(status.code())); }
                if let Some(p) = upd.web_app_prompt { row.web_app_prompt = p; }
                if let Some(db) = upd.db_structure { row.db_structure = db; }
                if let Some(redes) = upd.redes_sociales { row.redes_sociales = list_column(&redes); }
                if let Some(images) = upd.images_prompt { row.images_prompt = list_column(&images); }
            })
        }

        async fn update_status(&self, id: Id, status: IdeaStatus) -> RepoResult<Idea> {
            self.mutate(id, |row| row.status = Some(i32::from(status.code())))
        }

        async fn delete_idea(&self, id: Id) -> RepoResult<()> {
            let mut s = self.write()?;
            let removed = s.rows.remove(&id).ok_or(RepoError::NotFound)?;
            if let Err(e) = self.persist(&s) {
                s.rows.insert(id, removed);
                return Err(e);
            }
            Ok(())
        }
    }
}

// Postgres implementation (feature = "postgres-store")
#[cfg(feature = "postgres-store")]
pub mod pg {
    use super::*;
    use sqlx::{Pool, Postgres};

    use crate::mapper::encode_list;

    // Casts keep decoding stable whether the table uses SERIAL/BIGSERIAL or
    // TIMESTAMP/TIMESTAMPTZ. List columns go through `to_jsonb`: TEXT becomes
    // a JSON string for the mapper to parse, `text[]` and `jsonb` arrive as
    // arrays. Writes bind JSON array text, so they need TEXT list columns.
    macro_rules! columns {
        () => {
            "id::int8 AS id, fecha, nicho, body, tipo_idea, tipo_post, guion, idea, \
             status::int4 AS status, web_app_prompt, db_structure, \
             to_jsonb(redes_sociales) AS redes_sociales, to_jsonb(images_prompt) AS images_prompt, \
             created_at::timestamptz AS created_at, updated_at::timestamptz AS updated_at"
        };
    }

    const LIST_SQL: &str = concat!(
        "SELECT ", columns!(), " FROM ideas_social_content ORDER BY fecha DESC, id DESC"
    );
    const GET_SQL: &str = concat!("SELECT ", columns!(), " FROM ideas_social_content WHERE id = $1");
    const INSERT_SQL: &str = concat!(
        "INSERT INTO ideas_social_content \
         (fecha, nicho, body, tipo_idea, tipo_post, guion, idea, status, web_app_prompt, db_structure, \
          redes_sociales, images_prompt, created_at, updated_at) \
         VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12, now(), now()) RETURNING ",
        columns!()
    );
    // `CASE WHEN $flag` lets an explicit null clear a nullable column while an
    // absent field leaves it alone.
    const UPDATE_SQL: &str = concat!(
        "UPDATE ideas_social_content SET \
           fecha = COALESCE($2, fecha), \
           nicho = COALESCE($3, nicho), \
           body = COALESCE($4, body), \
           tipo_idea = CASE WHEN $5 THEN $6 ELSE tipo_idea END, \
           tipo_post = CASE WHEN $7 THEN $8 ELSE tipo_post END, \
           guion = CASE WHEN $9 THEN $10 ELSE guion END, \
           idea = COALESCE($11, idea), \
           status = COALESCE($12, status), \
           web_app_prompt = CASE WHEN $13 THEN $14 ELSE web_app_prompt END, \
           db_structure = CASE WHEN $15 THEN $16 ELSE db_structure END, \
           redes_sociales = COALESCE($17, redes_sociales), \
           images_prompt = COALESCE($18, images_prompt), \
           updated_at = now() \
         WHERE id = $1 RETURNING ",
        columns!()
    );
    const STATUS_SQL: &str = concat!(
        "UPDATE ideas_social_content SET status = $2, updated_at = now() WHERE id = $1 RETURNING ",
        columns!()
    );
    const DELETE_SQL: &str = "DELETE FROM ideas_social_content WHERE id = $1";

    fn storage_error(e: sqlx::Error) -> RepoError {
        match e {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            other => RepoError::Internal(other.to_string()),
        }
    }

    // (present, value) pair for the CASE WHEN binds
    fn nullable<T, U>(field: Option<Option<T>>, f: impl FnOnce(T) -> U) -> (bool, Option<U>) {
        match field {
            Some(v) => (true, v.map(f)),
            None => (false, None),
        }
    }

    #[derive(Clone)]
    pub struct PgRepo { pool: Pool<Postgres> }

    impl PgRepo {
        pub fn new(pool: Pool<Postgres>) -> Self { Self { pool } }
    }

    #[async_trait]
    impl IdeaRepo for PgRepo {
        async fn list_ideas(&self) -> RepoResult<Vec<Idea>> {
            let rows = sqlx::query_as::<_, IdeaRow>(LIST_SQL)
                .fetch_all(&self.pool).await.map_err(storage_error)?;
            Ok(rows.into_iter().map(Idea::from).collect())
        }

        async fn get_idea(&self, id: Id) -> RepoResult<Idea> {
            let row = sqlx::query_as::<_, IdeaRow>(GET_SQL)
                .bind(id)
                .fetch_optional(&self.pool).await.map_err(storage_error)?
                .ok_or(RepoError::NotFound)?;
            Ok(row.into())
        }

        async fn create_idea(&self, new: NewIdea) -> RepoResult<Idea> {
            let row = sqlx::query_as::<_, IdeaRow>(INSERT_SQL)
                .bind(new.fecha)
                .bind(&new.nicho)
                .bind(&new.body)
                .bind(new.tipo_idea.map(TipoIdea::as_str))
                .bind(new.tipo_post.map(TipoPost::as_str))
                .bind(&new.guion)
                .bind(&new.idea)
                .bind(i32::from(new.status.unwrap_or_default().code()))
                .bind(&new.web_app_prompt)
                .bind(&new.db_structure)
                .bind(encode_list(&new.redes_sociales))
                .bind(encode_list(&new.images_prompt))
                .fetch_one(&self.pool).await.map_err(storage_error)?;
            Ok(row.into())
        }

        async fn update_idea(&self, id: Id, upd: UpdateIdea) -> RepoResult<Idea> {
            let (set_tipo_idea, tipo_idea) = nullable(upd.tipo_idea, |t| t.as_str());
            let (set_tipo_post, tipo_post) = nullable(upd.tipo_post, |t| t.as_str());
            let (set_guion, guion) = nullable(upd.guion, |g| g);
            let (set_prompt, web_app_prompt) = nullable(upd.web_app_prompt, |p| p);
            let (set_db, db_structure) = nullable(upd.db_structure, |d| d);
            let row = sqlx::query_as::<_, IdeaRow>(UPDATE_SQL)
                .bind(id)
                .bind(upd.fecha)
                .bind(upd.nicho)
                .bind(upd.body)
                .bind(set_tipo_idea).bind(tipo_idea)
                .bind(set_tipo_post).bind(tipo_post)
                .bind(set_guion).bind(guion)
                .bind(upd.idea)
                .bind(upd.status.map(|s| i32::from(s.code())))
                .bind(set_prompt).bind(web_app_prompt)
                .bind(set_db).bind(db_structure)
                .bind(upd.redes_sociales.as_deref().map(encode_list))
                .bind(upd.images_prompt.as_deref().map(encode_list))
                .fetch_optional(&self.pool).await.map_err(storage_error)?
                .ok_or(RepoError::NotFound)?;
            Ok(row.into())
        }

        async fn update_status(&self, id: Id, status: IdeaStatus) -> RepoResult<Idea> {
            let row = sqlx::query_as::<_, IdeaRow>(STATUS_SQL)
                .bind(id)
                .bind(i32::from(status.code()))
                .fetch_optional(&self.pool).await.map_err(storage_error)?
                .ok_or(RepoError::NotFound)?;
            Ok(row.into())
        }

        async fn delete_idea(&self, id: Id) -> RepoResult<()> {
            let done = sqlx::query(DELETE_SQL)
                .bind(id)
                .execute(&self.pool).await.map_err(storage_error)?;
            if done.rows_affected() == 0 {
                return Err(RepoError::NotFound);
            }
            Ok(())
        }
    }
}
