//! Table definitions and statements for the event store
//!
//! Timestamps are fixed-width ISO-8601 text (see [`crate::types::STORAGE_FORMAT`]),
//! so `ORDER BY created_ts` is chronological.

/// Idempotent schema creation
pub const CREATE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS orders (
    order_id TEXT PRIMARY KEY,
    created_ts TEXT NOT NULL,
    due_ts TEXT NOT NULL,
    channel TEXT NOT NULL,
    items_count INTEGER NOT NULL,
    distance_miles REAL NOT NULL,
    is_expedited INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS fulfillment_events (
    event_id INTEGER PRIMARY KEY AUTOINCREMENT,
    order_id TEXT NOT NULL,
    worker_id TEXT NOT NULL,
    picked_ts TEXT NOT NULL,
    packed_ts TEXT NOT NULL,
    ready_ts TEXT NOT NULL,
    delivered_ts TEXT,
    status TEXT NOT NULL,
    out_of_stock_items INTEGER NOT NULL,
    FOREIGN KEY(order_id) REFERENCES orders(order_id)
);

CREATE INDEX IF NOT EXISTS idx_orders_created_ts ON orders(created_ts);
CREATE INDEX IF NOT EXISTS idx_events_order_id ON fulfillment_events(order_id);
";

/// Insert an order, replacing any existing row with the same id
pub const UPSERT_ORDER: &str = "
INSERT OR REPLACE INTO orders
    (order_id, created_ts, due_ts, channel, items_count, distance_miles, is_expedited)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

/// Append a fulfillment event; `event_id` is assigned by SQLite
pub const APPEND_EVENT: &str = "
INSERT INTO fulfillment_events
    (order_id, worker_id, picked_ts, packed_ts, ready_ts, delivered_ts, status, out_of_stock_items)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// All orders in physical (insertion) order
pub const SELECT_ORDERS: &str = "
SELECT order_id, created_ts, due_ts, channel, items_count, distance_miles, is_expedited
FROM orders
ORDER BY rowid ASC";

/// All fulfillment events in append order
pub const SELECT_EVENTS: &str = "
SELECT event_id, order_id, worker_id, picked_ts, packed_ts, ready_ts, delivered_ts, status,
       out_of_stock_items
FROM fulfillment_events
ORDER BY event_id ASC";

/// Every event paired with its order, in append order; orphan events drop out
pub const SELECT_JOINED: &str = "
SELECT o.order_id, o.created_ts, o.due_ts, o.channel, o.items_count, o.distance_miles,
       o.is_expedited,
       e.event_id, e.order_id, e.worker_id, e.picked_ts, e.packed_ts, e.ready_ts,
       e.delivered_ts, e.status, e.out_of_stock_items
FROM fulfillment_events e
JOIN orders o ON o.order_id = e.order_id
ORDER BY e.event_id ASC";

/// The `?1` most recently placed joined rows; ties keep append order
pub const SELECT_RECENT_JOINED: &str = "
SELECT o.order_id, o.created_ts, o.due_ts, o.channel, o.items_count, o.distance_miles,
       o.is_expedited,
       e.event_id, e.order_id, e.worker_id, e.picked_ts, e.packed_ts, e.ready_ts,
       e.delivered_ts, e.status, e.out_of_stock_items
FROM fulfillment_events e
JOIN orders o ON o.order_id = e.order_id
ORDER BY o.created_ts DESC, e.event_id ASC
LIMIT ?1";

/// Event counts per status, largest first, ties by status name
pub const COUNT_BY_STATUS: &str = "
SELECT status, COUNT(*) AS events
FROM fulfillment_events
GROUP BY status
ORDER BY events DESC, status ASC";

/// Events whose order is not stored
pub const COUNT_ORPHANED_EVENTS: &str = "
SELECT COUNT(*)
FROM fulfillment_events e
LEFT JOIN orders o ON o.order_id = e.order_id
WHERE o.order_id IS NULL";

/// Row count of the orders table
pub const COUNT_ORDERS: &str = "SELECT COUNT(*) FROM orders";

/// Row count of the fulfillment events table
pub const COUNT_EVENTS: &str = "SELECT COUNT(*) FROM fulfillment_events";
