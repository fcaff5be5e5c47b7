//! Feed composition service
//!
//! Compositions are stored in `compositions` with their members in
//! `composition_members`. A member list is always replaced wholesale inside
//! one transaction, so readers see either the old list or the new one.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use shared::{
    validate_composition_name, validate_members, Composition, CompositionId, CompositionMember,
    CompositionNameInput, CompositionSummary, FeedItemId, ReplaceCompositionInput,
};

use crate::error::{AppError, AppResult};

/// Composition service for managing feed recipes
#[derive(Clone)]
pub struct CompositionService {
    db: PgPool,
}

/// Row for composition header queries
#[derive(Debug, FromRow)]
struct CompositionRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row for member queries
#[derive(Debug, FromRow)]
struct MemberRow {
    feed_item_id: i64,
    weight_kg: Decimal,
}

impl CompositionRow {
    fn into_composition(self, members: Vec<CompositionMember>) -> Composition {
        Composition {
            id: self.id,
            name: self.name,
            members,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }
}

/// Validated body of a replace request
#[derive(Debug, PartialEq)]
pub struct ReplaceCommand {
    pub name: String,
    pub members: Vec<CompositionMember>,
}

/// Check a replace payload before it touches the database
pub fn prepare_replace(input: ReplaceCompositionInput) -> AppResult<ReplaceCommand> {
    let name = validate_composition_name(&input.name)?.to_string();
    validate_members(&input.members)?;
    Ok(ReplaceCommand {
        name,
        members: input.members,
    })
}

fn duplicate_name(name: &str) -> String {
    format!("A composition named {} already exists", name)
}

impl CompositionService {
    /// Create a new CompositionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all compositions (id and name), ordered by name
    pub async fn list_compositions(&self) -> AppResult<Vec<CompositionSummary>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, name FROM compositions ORDER BY lower(name), id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| CompositionSummary { id, name })
            .collect())
    }

    /// Get a composition with its members
    pub async fn get_composition(&self, id: CompositionId) -> AppResult<Composition> {
        let row = sqlx::query_as::<_, CompositionRow>(
            "SELECT id, name, created_at, updated_at FROM compositions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Composition {}", id)))?;

        let members = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT feed_item_id, weight_kg
            FROM composition_members
            WHERE composition_id = $1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|m| CompositionMember::new(m.feed_item_id, m.weight_kg))
        .collect();

        Ok(row.into_composition(members))
    }

    /// Create an empty composition; the database assigns the id
    pub async fn create_composition(&self, input: CompositionNameInput) -> AppResult<Composition> {
        let name = validate_composition_name(&input.name)?;

        let row = sqlx::query_as::<_, CompositionRow>(
            r#"
            INSERT INTO compositions (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.db)
        .await
        .map_err(|e| AppError::from_db(e, || duplicate_name(name)))?;

        tracing::info!(composition_id = row.id, name = %row.name, "Composition created");
        Ok(row.into_composition(Vec::new()))
    }

    /// Replace name and member list in one transaction
    pub async fn replace_composition(
        &self,
        id: CompositionId,
        input: ReplaceCompositionInput,
    ) -> AppResult<Composition> {
        let command = prepare_replace(input)?;

        let mut tx = self.db.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM compositions WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            return Err(AppError::NotFound(format!("Composition {}", id)));
        }

        ensure_feed_items_exist(&mut tx, &command.members).await?;

        sqlx::query("UPDATE compositions SET name = $1, updated_at = NOW() WHERE id = $2")
            .bind(&command.name)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from_db(e, || duplicate_name(&command.name)))?;

        sqlx::query("DELETE FROM composition_members WHERE composition_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for (position, member) in command.members.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO composition_members (composition_id, feed_item_id, weight_kg, position)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(id)
            .bind(member.feed_item_id)
            .bind(member.weight_kg)
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            composition_id = id,
            members = command.members.len(),
            "Composition members replaced"
        );

        self.get_composition(id).await
    }

    /// Rename a composition, members untouched
    pub async fn rename_composition(
        &self,
        id: CompositionId,
        input: CompositionNameInput,
    ) -> AppResult<Composition> {
        let name = validate_composition_name(&input.name)?;

        let updated = sqlx::query_scalar::<_, i64>(
            "UPDATE compositions SET name = $1, updated_at = NOW() WHERE id = $2 RETURNING id",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| AppError::from_db(e, || duplicate_name(name)))?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Composition {}", id)));
        }

        tracing::info!(composition_id = id, name, "Composition renamed");
        self.get_composition(id).await
    }
}

/// Every member must point at a catalog feed item
async fn ensure_feed_items_exist(
    tx: &mut Transaction<'_, Postgres>,
    members: &[CompositionMember],
) -> AppResult<()> {
    if members.is_empty() {
        return Ok(());
    }

    let ids: Vec<FeedItemId> = members.iter().map(|m| m.feed_item_id).collect();
    let known: Vec<i64> = sqlx::query_scalar("SELECT id FROM feed_items WHERE id = ANY($1)")
        .bind(&ids)
        .fetch_all(&mut **tx)
        .await?;

    if let Some(missing) = ids.iter().find(|id| !known.contains(id)) {
        return Err(AppError::validation(
            "members",
            format!("Feed item {} does not exist", missing),
        ));
    }
    Ok(())
}
