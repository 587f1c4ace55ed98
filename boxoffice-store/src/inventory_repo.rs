use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use std::collections::HashMap;
use tracing::{info, warn};

use boxoffice_core::repository::{default_code_generator, CodeGenerator, MAX_CODE_ATTEMPTS};
use boxoffice_core::{
    rules, Event, EventDraft, EventId, InventoryError, InventoryResult, InventoryStore, OwnerId,
    Package, PackageDraft, PackageId, Ticket, TicketCode, TicketTarget,
};

const EVENT_COLUMNS: &str = "id, owner_id, name, location, description, seats";
const PACKAGE_COLUMNS: &str = "id, owner_id, name, location, description, seats";

/// Postgres-backed inventory.
///
/// Issuance and event updates take `FOR UPDATE` on the target row, so
/// count-then-insert is serialized per target across every process sharing
/// the database. Package creation share-locks its member events.
pub struct PgInventoryStore {
    pool: PgPool,
    codes: CodeGenerator,
}

impl PgInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            codes: default_code_generator(),
        }
    }

    pub fn with_code_generator(pool: PgPool, codes: CodeGenerator) -> Self {
        Self { pool, codes }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    owner_id: i64,
    name: String,
    location: Option<String>,
    description: Option<String>,
    seats: Option<i32>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: EventId(row.id),
            owner_id: OwnerId(row.owner_id),
            name: row.name,
            location: row.location,
            description: row.description,
            seats: row.seats,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PackageRow {
    id: i64,
    owner_id: i64,
    name: String,
    location: Option<String>,
    description: Option<String>,
    seats: Option<i32>,
}

impl PackageRow {
    fn into_package(self, event_ids: Vec<EventId>) -> Package {
        Package {
            id: PackageId(self.id),
            owner_id: OwnerId(self.owner_id),
            name: self.name,
            location: self.location,
            description: self.description,
            seats: self.seats,
            event_ids,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    code: String,
    event_id: Option<i64>,
    package_id: Option<i64>,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = InventoryError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let target = TicketTarget::from_selection(
            row.event_id.map(EventId),
            row.package_id.map(PackageId),
        )
        .map_err(|_| InventoryError::Storage(format!("ticket {} has no single target", row.code)))?;

        Ok(Ticket {
            code: TicketCode::from(row.code),
            target,
        })
    }
}

fn storage(err: sqlx::Error) -> InventoryError {
    InventoryError::Storage(err.to_string())
}

/// Unique-name violations become `DuplicateName`; the constraint is
/// authoritative even when two inserts race.
fn name_conflict(err: sqlx::Error, name: &str) -> InventoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            InventoryError::DuplicateName(name.to_string())
        }
        _ => storage(err),
    }
}

async fn count_tickets<'e, E>(executor: E, target: TicketTarget) -> InventoryResult<i64>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let (sql, id) = match target {
        TicketTarget::Event(id) => ("SELECT COUNT(*) FROM tickets WHERE event_id = $1", id.0),
        TicketTarget::Package(id) => ("SELECT COUNT(*) FROM tickets WHERE package_id = $1", id.0),
    };
    sqlx::query_scalar::<_, i64>(sql)
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(storage)
}

async fn member_ids<'e, E>(executor: E, package_ids: &[i64]) -> InventoryResult<HashMap<i64, Vec<EventId>>>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let rows = sqlx::query_as::<_, (i64, i64)>(
        "SELECT package_id, event_id FROM package_events WHERE package_id = ANY($1) ORDER BY event_id",
    )
    .bind(package_ids.to_vec())
    .fetch_all(executor)
    .await
    .map_err(storage)?;

    let mut members: HashMap<i64, Vec<EventId>> = HashMap::new();
    for (package_id, event_id) in rows {
        members.entry(package_id).or_default().push(EventId(event_id));
    }
    Ok(members)
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
    async fn insert_event(&self, owner: OwnerId, draft: &EventDraft) -> InventoryResult<Event> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "INSERT INTO events (owner_id, name, location, description, seats) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            EVENT_COLUMNS
        ))
        .bind(owner.0)
        .bind(&draft.name)
        .bind(&draft.location)
        .bind(&draft.description)
        .bind(draft.seats)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| name_conflict(e, &draft.name))?;

        Ok(row.into())
    }

    async fn get_event(&self, id: EventId) -> InventoryResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events WHERE id = $1",
            EVENT_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        Ok(row.map(Event::from))
    }

    async fn update_event(
        &self,
        id: EventId,
        caller: OwnerId,
        draft: &EventDraft,
    ) -> InventoryResult<Event> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let current: Event = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events WHERE id = $1 FOR UPDATE",
            EVENT_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage)?
        .ok_or_else(|| InventoryError::NotFound(format!("event {}", id)))?
        .into();

        let sold = count_tickets(&mut *tx, TicketTarget::Event(id)).await?;
        rules::check_event_update(&current, caller, draft, sold)?;

        let row = sqlx::query_as::<_, EventRow>(&format!(
            "UPDATE events SET name = $2, location = $3, description = $4, seats = $5 \
             WHERE id = $1 RETURNING {}",
            EVENT_COLUMNS
        ))
        .bind(id.0)
        .bind(&draft.name)
        .bind(&draft.location)
        .bind(&draft.description)
        .bind(draft.seats)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| name_conflict(e, &draft.name))?;

        tx.commit().await.map_err(storage)?;
        Ok(row.into())
    }

    async fn insert_package(
        &self,
        owner: OwnerId,
        draft: &PackageDraft,
        members: &[EventId],
    ) -> InventoryResult<Package> {
        let ids: Vec<i64> = members.iter().map(|id| id.0).collect();
        let mut tx = self.pool.begin().await.map_err(storage)?;

        // member capacities must not change until the package is committed
        let found: Vec<Event> = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events WHERE id = ANY($1) ORDER BY id FOR SHARE",
            EVENT_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(storage)?
        .into_iter()
        .map(Event::from)
        .collect();

        let missing = rules::missing_events(members, &found);
        if !missing.is_empty() {
            return Err(InventoryError::EventsNotFound(missing));
        }
        rules::check_package_capacity(draft.seats, &found)?;

        let row = sqlx::query_as::<_, PackageRow>(&format!(
            "INSERT INTO packages (owner_id, name, location, description, seats) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            PACKAGE_COLUMNS
        ))
        .bind(owner.0)
        .bind(&draft.name)
        .bind(&draft.location)
        .bind(&draft.description)
        .bind(draft.seats)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| name_conflict(e, &draft.name))?;

        for event_id in &ids {
            sqlx::query("INSERT INTO package_events (package_id, event_id) VALUES ($1, $2)")
                .bind(row.id)
                .bind(event_id)
                .execute(&mut *tx)
                .await
                .map_err(storage)?;
        }

        tx.commit().await.map_err(storage)?;
        info!(package_id = row.id, members = ids.len(), "package and memberships committed");

        Ok(row.into_package(members.to_vec()))
    }

    async fn get_package(&self, id: PackageId) -> InventoryResult<Option<Package>> {
        let Some(row) = sqlx::query_as::<_, PackageRow>(&format!(
            "SELECT {} FROM packages WHERE id = $1",
            PACKAGE_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        else {
            return Ok(None);
        };

        let mut members = member_ids(&self.pool, &[row.id]).await?;
        let event_ids = members.remove(&row.id).unwrap_or_default();
        Ok(Some(row.into_package(event_ids)))
    }

    async fn packages_for_event(&self, id: EventId) -> InventoryResult<Vec<Package>> {
        let rows = sqlx::query_as::<_, PackageRow>(
            "SELECT p.id, p.owner_id, p.name, p.location, p.description, p.seats \
             FROM packages p JOIN package_events pe ON pe.package_id = p.id \
             WHERE pe.event_id = $1 ORDER BY p.id",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        let package_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut members = member_ids(&self.pool, &package_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let event_ids = members.remove(&row.id).unwrap_or_default();
                row.into_package(event_ids)
            })
            .collect())
    }

    async fn events_for_package(&self, id: PackageId) -> InventoryResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT e.id, e.owner_id, e.name, e.location, e.description, e.seats \
             FROM events e JOIN package_events pe ON pe.event_id = e.id \
             WHERE pe.package_id = $1 ORDER BY e.id",
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn issue_ticket(&self, target: TicketTarget) -> InventoryResult<Ticket> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let (lock_sql, id) = match target {
            TicketTarget::Event(id) => ("SELECT seats FROM events WHERE id = $1 FOR UPDATE", id.0),
            TicketTarget::Package(id) => ("SELECT seats FROM packages WHERE id = $1 FOR UPDATE", id.0),
        };
        let seats = sqlx::query_scalar::<_, Option<i32>>(lock_sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?
            .ok_or_else(|| InventoryError::NotFound(target.to_string()))?;

        let sold = count_tickets(&mut *tx, target).await?;
        rules::check_issuable(target, seats, sold)?;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = (self.codes)();
            let inserted = sqlx::query(
                "INSERT INTO tickets (code, event_id, package_id) VALUES ($1, $2, $3) \
                 ON CONFLICT (code) DO NOTHING",
            )
            .bind(code.as_str())
            .bind(target.event_id().map(|id| id.0))
            .bind(target.package_id().map(|id| id.0))
            .execute(&mut *tx)
            .await
            .map_err(storage)?
            .rows_affected();

            if inserted == 1 {
                tx.commit().await.map_err(storage)?;
                return Ok(Ticket { code, target });
            }
            warn!(%code, "ticket code collision, regenerating");
        }

        Err(InventoryError::Storage(
            "could not allocate a unique ticket code".to_string(),
        ))
    }

    async fn find_ticket(&self, code: &TicketCode) -> InventoryResult<Option<Ticket>> {
        let row = sqlx::query_as::<_, TicketRow>(
            "SELECT code, event_id, package_id FROM tickets WHERE code = $1",
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(Ticket::try_from).transpose()
    }

    async fn tickets_sold(&self, target: TicketTarget) -> InventoryResult<i64> {
        count_tickets(&self.pool, target).await
    }
}
