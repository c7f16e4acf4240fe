//! Tests for the aggregator queries
//!
//! A small hand-built store with known timestamps lets every KPI be checked
//! against values worked out by hand.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use fulfillment_analytics_simulator::analysis::Aggregator;
use fulfillment_analytics_simulator::orders::{FulfillmentEvent, Order};
use fulfillment_analytics_simulator::simulation::{run, SimulationError};
use fulfillment_analytics_simulator::store::EventStore;
use fulfillment_analytics_simulator::types::{
    Channel, FulfillmentStatus, OrderId, SimulationConfig, WorkerId,
};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(9, 0, 0).unwrap()
}

struct Fixture {
    created_offset_hours: i64,
    worker: &'static str,
    pick_after: i64,
    ready_after: i64,
    delivered_after: Option<i64>,
    status: FulfillmentStatus,
    out_of_stock_items: u32,
}

fn build(fixture: &Fixture) -> (Order, FulfillmentEvent) {
    let created = base() + Duration::hours(fixture.created_offset_hours);
    let order = Order {
        order_id: OrderId::new(),
        created_ts: created,
        due_ts: created + Duration::hours(2),
        channel: Channel::Bopis,
        items_count: 4,
        distance_miles: 1.25,
        is_expedited: false,
    };
    let event = FulfillmentEvent {
        event_id: None,
        order_id: order.order_id,
        worker_id: WorkerId::from(fixture.worker),
        picked_ts: created + Duration::minutes(fixture.pick_after),
        packed_ts: created + Duration::minutes(fixture.ready_after - 1),
        ready_ts: created + Duration::minutes(fixture.ready_after),
        delivered_ts: fixture.delivered_after.map(|m| created + Duration::minutes(m)),
        status: fixture.status,
        out_of_stock_items: fixture.out_of_stock_items,
    };
    (order, event)
}

/// Completed (ready at 30), Late (ready at 60), Canceled (ready at 45)
fn three_order_store() -> EventStore {
    let fixtures = [
        Fixture {
            created_offset_hours: 0,
            worker: "W1",
            pick_after: 10,
            ready_after: 30,
            delivered_after: Some(90),
            status: FulfillmentStatus::Completed,
            out_of_stock_items: 0,
        },
        Fixture {
            created_offset_hours: 1,
            worker: "W2",
            pick_after: 20,
            ready_after: 60,
            delivered_after: Some(300),
            status: FulfillmentStatus::Late,
            out_of_stock_items: 0,
        },
        Fixture {
            created_offset_hours: 2,
            worker: "W1",
            pick_after: 15,
            ready_after: 45,
            delivered_after: None,
            status: FulfillmentStatus::Canceled,
            out_of_stock_items: 2,
        },
    ];

    let pairs: Vec<_> = fixtures.iter().map(build).collect();
    let mut store = EventStore::in_memory().unwrap();
    store.persist_batch(&pairs).unwrap();
    store
}

#[test]
fn test_kpis_on_three_orders() {
    let store = three_order_store();
    let kpis = Aggregator::new(&store).kpis().unwrap();

    assert_eq!(kpis.total, 3);
    assert_eq!(kpis.completed, 1);
    assert_eq!(kpis.late, 1);
    assert_eq!(kpis.canceled, 1);
    // Canceled rows count: (30 + 60 + 45) / 3
    assert_eq!(kpis.avg_minutes_to_ready, Some(45.0));
    // 2 / 3 rounds to 0.67
    assert_eq!(kpis.avg_out_of_stock_items, Some(0.67));
    assert!((kpis.late_rate() - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_status_breakdown_on_three_orders() {
    let store = three_order_store();
    let breakdown = Aggregator::new(&store).status_breakdown().unwrap();

    assert_eq!(breakdown.len(), 3);
    assert!(breakdown.iter().all(|row| row.count == 1));
    let statuses: Vec<&str> = breakdown.iter().map(|row| row.status.as_str()).collect();
    assert_eq!(statuses, vec!["Canceled", "Completed", "Late"]);
}

#[test]
fn test_worker_performance_on_three_orders() {
    let store = three_order_store();
    let workers = Aggregator::new(&store).worker_performance().unwrap();

    assert_eq!(workers.len(), 2);
    let w1 = &workers[0];
    assert_eq!(w1.worker_id.as_str(), "W1");
    assert_eq!(w1.orders_handled, 2);
    assert_eq!(w1.avg_minutes_to_pick, 12.5);
    assert_eq!(w1.avg_minutes_to_ready, 37.5);
    assert_eq!(w1.late, 0);
    assert_eq!(w1.canceled, 1);

    let w2 = &workers[1];
    assert_eq!(w2.worker_id.as_str(), "W2");
    assert_eq!(w2.orders_handled, 1);
    assert_eq!(w2.avg_minutes_to_ready, 60.0);
    assert_eq!(w2.late, 1);
}

#[test]
fn test_ready_time_distribution_in_event_order() {
    let store = three_order_store();
    let distribution = Aggregator::new(&store).ready_time_distribution().unwrap();
    assert_eq!(distribution, vec![30.0, 60.0, 45.0]);
}

#[test]
fn test_orders_detail_most_recent_first() {
    let store = three_order_store();
    let detail = Aggregator::new(&store).orders_detail(2).unwrap();

    assert_eq!(detail.len(), 2);
    assert_eq!(detail[0].status, FulfillmentStatus::Canceled);
    assert_eq!(detail[0].minutes_to_ready, 45.0);
    assert_eq!(detail[0].minutes_to_delivered, None);
    assert_eq!(detail[1].status, FulfillmentStatus::Late);
    assert_eq!(detail[1].minutes_to_delivered, Some(300.0));
}

#[test]
fn test_orders_detail_rejects_zero_limit() {
    let store = three_order_store();
    let result = Aggregator::new(&store).orders_detail(0);
    assert!(matches!(result, Err(SimulationError::InvalidArgument(_))));
}

#[test]
fn test_events_without_order_are_ignored_by_joins() {
    let mut store = three_order_store();
    let (order, event) = build(&Fixture {
        created_offset_hours: 3,
        worker: "W3",
        pick_after: 5,
        ready_after: 20,
        delivered_after: Some(40),
        status: FulfillmentStatus::Completed,
        out_of_stock_items: 0,
    });
    store.persist_batch(&[(order, event)]).unwrap();

    // An event whose order id never made it into the orders table
    let (unrelated_order, orphan) = build(&Fixture {
        created_offset_hours: 4,
        worker: "W4",
        pick_after: 5,
        ready_after: 20,
        delivered_after: Some(40),
        status: FulfillmentStatus::Completed,
        out_of_stock_items: 0,
    });
    let orphan = FulfillmentEvent { order_id: OrderId::new(), ..orphan };
    store.persist_batch(&[(unrelated_order, orphan)]).unwrap();

    let aggregator = Aggregator::new(&store);
    // Five events stored, four with a matching order
    assert_eq!(store.event_count().unwrap(), 5);
    assert_eq!(aggregator.kpis().unwrap().total, 4);
    let breakdown_total: usize =
        aggregator.status_breakdown().unwrap().iter().map(|row| row.count).sum();
    assert_eq!(breakdown_total, 5);
    assert_eq!(store.orphaned_event_count().unwrap(), 1);
    assert_eq!(aggregator.orders_detail(10).unwrap().len(), 4);
}

#[test]
fn test_empty_store_queries() {
    let store = EventStore::in_memory().unwrap();
    let aggregator = Aggregator::new(&store);

    let kpis = aggregator.kpis().unwrap();
    assert_eq!(kpis.total, 0);
    assert_eq!(kpis.completed + kpis.late + kpis.canceled, 0);
    assert!(kpis.avg_minutes_to_ready.is_none());
    assert!(kpis.avg_out_of_stock_items.is_none());

    assert!(aggregator.status_breakdown().unwrap().is_empty());
    assert!(aggregator.worker_performance().unwrap().is_empty());
    assert!(aggregator.ready_time_distribution().unwrap().is_empty());
    assert!(aggregator.orders_detail(10).unwrap().is_empty());
}

#[test]
fn test_aggregation_is_idempotent() {
    let mut store = EventStore::in_memory().unwrap();
    let config = SimulationConfig {
        order_count: 150,
        anchor_time: Some("2024-06-01T00:00:00".to_string()),
        ..Default::default()
    };
    run(&mut store, &config).unwrap();

    let aggregator = Aggregator::new(&store);
    assert_eq!(aggregator.kpis().unwrap(), aggregator.kpis().unwrap());
    assert_eq!(aggregator.status_breakdown().unwrap(), aggregator.status_breakdown().unwrap());
    assert_eq!(aggregator.worker_performance().unwrap(), aggregator.worker_performance().unwrap());
    assert_eq!(
        aggregator.ready_time_distribution().unwrap(),
        aggregator.ready_time_distribution().unwrap()
    );
    assert_eq!(aggregator.orders_detail(25).unwrap(), aggregator.orders_detail(25).unwrap());
    assert_eq!(store.event_count().unwrap(), 150);
}
