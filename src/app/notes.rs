//! Notes: a small database-backed resource.

use std::time::Instant;

use futures_util::future::BoxFuture;
use serde::Serialize;
use sqlx::Row;

use crate::controller::{ActionResult, ActionTable, Controller, ControllerError, Reply, RequestContext};
use crate::db::{Database, DatabaseError, Model};
use crate::http::params::RequestParams;
use crate::routing::Args;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// Data access for notes.
#[derive(Debug, Clone)]
pub struct NoteStore {
    db: Database,
}

impl Model for NoteStore {
    fn database(&self) -> &Database {
        &self.db
    }
}

impl NoteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                body TEXT NOT NULL
            )",
        )
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Note>, DatabaseError> {
        let rows = sqlx::query("SELECT id, title, body FROM notes ORDER BY id")
            .fetch_all(self.pool())
            .await?;
        rows.iter().map(note_from_row).collect()
    }

    pub async fn find(&self, id: i64) -> Result<Option<Note>, DatabaseError> {
        let row = sqlx::query("SELECT id, title, body FROM notes WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(note_from_row).transpose()
    }

    pub async fn create(&self, title: &str, body: &str) -> Result<i64, DatabaseError> {
        let row = sqlx::query("INSERT INTO notes (title, body) VALUES ($1, $2) RETURNING id")
            .bind(title.to_string())
            .bind(body.to_string())
            .fetch_one(self.pool())
            .await?;
        Ok(row.try_get::<i64, _>(0)?)
    }
}

fn note_from_row(row: &sqlx::any::AnyRow) -> Result<Note, DatabaseError> {
    Ok(Note {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
    })
}

pub struct Notes {
    store: NoteStore,
    params: RequestParams,
    request_id: String,
    started: Option<Instant>,
}

impl Notes {
    pub fn new(store: NoteStore, context: &RequestContext) -> Self {
        Self {
            store,
            params: context.params.clone(),
            request_id: context.request_id.clone(),
            started: None,
        }
    }

    fn index(&mut self, _args: Args) -> BoxFuture<'_, ActionResult> {
        Box::pin(async move {
            let notes = self.store.list().await?;
            Reply::json(&notes)
        })
    }

    fn show_do(&mut self, args: Args) -> BoxFuture<'_, ActionResult> {
        Box::pin(async move {
            let id = note_id(&args)?;
            match self.store.find(id).await? {
                Some(note) => Reply::json(&note),
                None => Err(ControllerError::NotFound(format!("note {}", id))),
            }
        })
    }

    fn create_do(&mut self, _args: Args) -> BoxFuture<'_, ActionResult> {
        Box::pin(async move {
            let fields = self.params.pick(["title", "body"]);
            let title = fields
                .get("title")
                .cloned()
                .flatten()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| ControllerError::BadRequest("title is required".into()))?;
            let body = fields.get("body").cloned().flatten().unwrap_or_default();

            let id = self.store.create(&title, &body).await?;
            Ok(Reply::Redirect(format!("/notes/{}", id)))
        })
    }
}

fn note_id(args: &Args) -> Result<i64, ControllerError> {
    let raw = args
        .get("id")
        .ok_or_else(|| ControllerError::BadRequest("id is required".into()))?;
    raw.parse()
        .map_err(|_| ControllerError::BadRequest(format!("'{}' is not a note id", raw)))
}

impl Controller for Notes {
    fn actions() -> ActionTable<Self> {
        ActionTable::<Self>::new()
            .with("index", Notes::index)
            .with("show_do", Notes::show_do)
            .with("create_do", Notes::create_do)
    }

    fn before(&mut self, args: &mut Args) -> Result<(), ControllerError> {
        if args.contains_key("id") {
            note_id(args)?;
        }
        self.started = Some(Instant::now());
        Ok(())
    }

    fn after(&mut self) -> Result<(), ControllerError> {
        if let Some(started) = self.started {
            tracing::debug!(
                request_id = %self.request_id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Notes action finished"
            );
        }
        Ok(())
    }
}
