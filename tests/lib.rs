// Integration tests test your crate's public API. They only have access to items
// in your crate that are marked pub. See the Cargo Targets page of the Cargo Book
// for more information.
//
//   https://doc.rust-lang.org/cargo/reference/cargo-targets.html#integration-tests
//

use fulfillment_analytics_simulator::*;

mod aggregation_tests;

#[test]
fn test_core_id_types() {
    let order_id = OrderId::new();
    assert_ne!(order_id, OrderId::new());

    let text = order_id.to_string();
    assert_eq!(text.len(), 36);
    assert_eq!(text.parse::<OrderId>().unwrap(), order_id);

    let worker = WorkerId::from("W3");
    assert_eq!(worker.to_string(), "W3");
}

#[test]
fn test_enum_types() {
    for channel in Channel::ALL {
        assert_eq!(channel.as_str().parse::<Channel>().unwrap(), channel);
    }
    for status in FulfillmentStatus::ALL {
        assert_eq!(status.as_str().parse::<FulfillmentStatus>().unwrap(), status);
    }
    assert!(FulfillmentStatus::Completed.is_delivered());
    assert!(FulfillmentStatus::Late.is_delivered());
    assert!(!FulfillmentStatus::Canceled.is_delivered());
}

#[test]
fn test_end_to_end_report() {
    let config = SimulationConfig {
        order_count: 80,
        anchor_time: Some("2024-06-01T00:00:00".to_string()),
        ..Default::default()
    };
    config.validate().unwrap();

    let mut store = EventStore::in_memory().unwrap();
    let stats = simulation::run(&mut store, &config).unwrap();

    let report = Report::collect(&store, config.detail_limit, config.histogram_bins, &config.detail_filter)
        .unwrap();
    assert_eq!(report.kpis.total, stats.orders_generated);
    assert_eq!(report.kpis.late, stats.late);
    assert_eq!(report.kpis.canceled, stats.canceled);
    assert_eq!(report.orders_detail.len(), 80);

    let text = report.render(OutputFormat::Text).unwrap();
    assert!(text.contains("Fulfillment KPIs"));
    assert!(text.contains("Worker Performance"));
}
