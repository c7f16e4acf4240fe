//! SQLite backed event store

use std::fs;
use std::path::Path;

use rusqlite::{params, Connection, Row};
use tracing::{debug, info, instrument};

use super::schema;
use crate::orders::{FulfillmentEvent, Order};
use crate::simulation::{SimulationError, SimulationResult};
use crate::types::{format_timestamp, parse_timestamp, FulfillmentStatus, WorkerId};

/// Durable storage for orders and their fulfillment events
///
/// Orders are insert-or-replace by `order_id`; events are append only. Every
/// handle has the schema in place, so reads against a fresh store return
/// empty results instead of failing.
#[derive(Debug)]
pub struct EventStore {
    conn: Connection,
    location: String,
}

impl EventStore {
    /// Open (or create) the store at `path`, creating missing parent directories
    pub fn open<P: AsRef<Path>>(path: P) -> SimulationResult<Self> {
        let path = path.as_ref();
        let location = path.display().to_string();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                SimulationError::storage_unavailable(format!(
                    "cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let conn = Connection::open(path).map_err(|e| {
            SimulationError::storage_unavailable(format!("cannot open {}: {}", location, e))
        })?;
        Self::from_connection(conn, location)
    }

    /// Open a private in-memory store (used in tests)
    pub fn in_memory() -> SimulationResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SimulationError::storage_unavailable(e.to_string()))?;
        Self::from_connection(conn, ":memory:".to_string())
    }

    fn from_connection(conn: Connection, location: String) -> SimulationResult<Self> {
        // SQLite opens lazily; touch the file so bad paths fail here
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0)).map_err(|e| {
            SimulationError::storage_unavailable(format!("cannot read {}: {}", location, e))
        })?;
        // Orphan events are accepted; joined queries skip them
        conn.pragma_update(None, "foreign_keys", false)?;

        let store = Self { conn, location };
        store.init_schema()?;
        Ok(store)
    }

    /// Where the store lives (`:memory:` for in-memory stores)
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Create tables and indexes if they do not exist yet
    pub fn init_schema(&self) -> SimulationResult<()> {
        self.conn.execute_batch(schema::CREATE_SCHEMA)?;
        debug!(location = %self.location, "Event store schema ready");
        Ok(())
    }

    /// Persist a run's (order, event) pairs in one transaction
    ///
    /// Either every pair is visible afterwards or none is. Returns the event ids
    /// assigned by the store, in input order.
    #[instrument(skip(self, pairs), fields(location = %self.location, pairs = pairs.len()))]
    pub fn persist_batch(
        &mut self,
        pairs: &[(Order, FulfillmentEvent)],
    ) -> SimulationResult<Vec<i64>> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let tx = self.conn.transaction()?;
        let mut event_ids = Vec::with_capacity(pairs.len());
        {
            let mut upsert_order = tx.prepare(schema::UPSERT_ORDER)?;
            let mut append_event = tx.prepare(schema::APPEND_EVENT)?;

            for (order, event) in pairs {
                upsert_order.execute(params![
                    order.order_id.to_string(),
                    format_timestamp(&order.created_ts),
                    format_timestamp(&order.due_ts),
                    order.channel.as_str(),
                    order.items_count,
                    order.distance_miles,
                    order.is_expedited,
                ])?;
                append_event.execute(params![
                    event.order_id.to_string(),
                    event.worker_id.as_str(),
                    format_timestamp(&event.picked_ts),
                    format_timestamp(&event.packed_ts),
                    format_timestamp(&event.ready_ts),
                    event.delivered_ts.as_ref().map(format_timestamp),
                    event.status.as_str(),
                    event.out_of_stock_items,
                ])?;
                event_ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;

        info!(pairs = pairs.len(), "Committed generated batch");
        Ok(event_ids)
    }

    /// Every order, in insertion order
    pub fn orders(&self) -> SimulationResult<Vec<Order>> {
        let mut stmt = self.conn.prepare(schema::SELECT_ORDERS)?;
        let rows = stmt
            .query_map([], |row| OrderRow::read(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(OrderRow::decode).collect()
    }

    /// Every fulfillment event, in append order
    pub fn fulfillment_events(&self) -> SimulationResult<Vec<FulfillmentEvent>> {
        let mut stmt = self.conn.prepare(schema::SELECT_EVENTS)?;
        let rows = stmt
            .query_map([], |row| EventRow::read(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(EventRow::decode).collect()
    }

    /// Every event that has a stored order, paired with it, in append order
    pub fn joined_events(&self) -> SimulationResult<Vec<(Order, FulfillmentEvent)>> {
        self.query_joined(schema::SELECT_JOINED, [])
    }

    /// The `limit` most recently placed joined pairs, newest first
    ///
    /// Pairs placed at the same instant keep append order.
    pub fn recent_joined_events(
        &self,
        limit: usize,
    ) -> SimulationResult<Vec<(Order, FulfillmentEvent)>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_joined(schema::SELECT_RECENT_JOINED, [limit])
    }

    fn query_joined<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> SimulationResult<Vec<(Order, FulfillmentEvent)>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, |row| Ok((OrderRow::read(row, 0)?, EventRow::read(row, 7)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(order, event)| Ok::<_, SimulationError>((order.decode()?, event.decode()?)))
            .collect()
    }

    /// Stored events per status, largest count first, ties by status name
    pub fn status_counts(&self) -> SimulationResult<Vec<(FulfillmentStatus, usize)>> {
        let mut stmt = self.conn.prepare(schema::COUNT_BY_STATUS)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(status, count)| {
                let status: FulfillmentStatus =
                    status.parse().map_err(SimulationError::corrupt_record)?;
                Ok::<_, SimulationError>((status, count as usize))
            })
            .collect()
    }

    /// Number of events whose order is not stored
    pub fn orphaned_event_count(&self) -> SimulationResult<usize> {
        let count: i64 =
            self.conn.query_row(schema::COUNT_ORPHANED_EVENTS, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of stored orders
    pub fn order_count(&self) -> SimulationResult<usize> {
        let count: i64 = self.conn.query_row(schema::COUNT_ORDERS, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of stored fulfillment events
    pub fn event_count(&self) -> SimulationResult<usize> {
        let count: i64 = self.conn.query_row(schema::COUNT_EVENTS, [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Raw `orders` row as stored
struct OrderRow {
    order_id: String,
    created_ts: String,
    due_ts: String,
    channel: String,
    items_count: u32,
    distance_miles: f64,
    is_expedited: bool,
}

impl OrderRow {
    fn read(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            order_id: row.get(offset)?,
            created_ts: row.get(offset + 1)?,
            due_ts: row.get(offset + 2)?,
            channel: row.get(offset + 3)?,
            items_count: row.get(offset + 4)?,
            distance_miles: row.get(offset + 5)?,
            is_expedited: row.get(offset + 6)?,
        })
    }

    fn decode(self) -> SimulationResult<Order> {
        let order_id = self.order_id.parse().map_err(|e| {
            SimulationError::corrupt_record(format!("order id {:?}: {}", self.order_id, e))
        })?;
        Ok(Order {
            order_id,
            created_ts: decode_timestamp("created_ts", &self.created_ts)?,
            due_ts: decode_timestamp("due_ts", &self.due_ts)?,
            channel: self.channel.parse().map_err(SimulationError::corrupt_record)?,
            items_count: self.items_count,
            distance_miles: self.distance_miles,
            is_expedited: self.is_expedited,
        })
    }
}

/// Raw `fulfillment_events` row as stored
struct EventRow {
    event_id: i64,
    order_id: String,
    worker_id: String,
    picked_ts: String,
    packed_ts: String,
    ready_ts: String,
    delivered_ts: Option<String>,
    status: String,
    out_of_stock_items: u32,
}

impl EventRow {
    fn read(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            event_id: row.get(offset)?,
            order_id: row.get(offset + 1)?,
            worker_id: row.get(offset + 2)?,
            picked_ts: row.get(offset + 3)?,
            packed_ts: row.get(offset + 4)?,
            ready_ts: row.get(offset + 5)?,
            delivered_ts: row.get(offset + 6)?,
            status: row.get(offset + 7)?,
            out_of_stock_items: row.get(offset + 8)?,
        })
    }

    fn decode(self) -> SimulationResult<FulfillmentEvent> {
        let order_id = self.order_id.parse().map_err(|e| {
            SimulationError::corrupt_record(format!(
                "event {} order id {:?}: {}",
                self.event_id, self.order_id, e
            ))
        })?;
        let delivered_ts = match &self.delivered_ts {
            Some(text) => Some(decode_timestamp("delivered_ts", text)?),
            None => None,
        };
        Ok(FulfillmentEvent {
            event_id: Some(self.event_id),
            order_id,
            worker_id: WorkerId::new(self.worker_id),
            picked_ts: decode_timestamp("picked_ts", &self.picked_ts)?,
            packed_ts: decode_timestamp("packed_ts", &self.packed_ts)?,
            ready_ts: decode_timestamp("ready_ts", &self.ready_ts)?,
            delivered_ts,
            status: self.status.parse().map_err(SimulationError::corrupt_record)?,
            out_of_stock_items: self.out_of_stock_items,
        })
    }
}

fn decode_timestamp(column: &str, text: &str) -> SimulationResult<chrono::NaiveDateTime> {
    parse_timestamp(text)
        .ok_or_else(|| SimulationError::corrupt_record(format!("{} {:?} is not a timestamp", column, text)))
}
