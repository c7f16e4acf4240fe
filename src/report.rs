//! Report rendering
//!
//! Collects the five aggregator queries into one [`Report`] and renders it as
//! plain text tables or a single JSON document.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

use crate::analysis::{
    Aggregator, DetailFilter, KpiSummary, OrderDetail, ReadyTimeHistogram, StatusCount,
    WorkerPerformance,
};
use crate::simulation::SimulationResult;
use crate::store::EventStore;
use crate::types::{format_timestamp, OutputFormat};

const HISTOGRAM_BAR_WIDTH: usize = 40;

/// Everything the dashboard shows, computed once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Headline KPIs
    pub kpis: KpiSummary,
    /// Event counts per status
    pub status_breakdown: Vec<StatusCount>,
    /// Per-worker performance
    pub worker_performance: Vec<WorkerPerformance>,
    /// Minutes-to-ready histogram
    pub ready_time_histogram: ReadyTimeHistogram,
    /// Most recent orders, after filtering
    pub orders_detail: Vec<OrderDetail>,
}

impl Report {
    /// Run every query against `store`
    ///
    /// The filter is applied to the `detail_limit` most recent rows, so it can
    /// only narrow that window.
    #[instrument(skip(store, filter), fields(location = store.location()))]
    pub fn collect(
        store: &EventStore,
        detail_limit: usize,
        histogram_bins: usize,
        filter: &DetailFilter,
    ) -> SimulationResult<Self> {
        let aggregator = Aggregator::new(store);

        let report = Self {
            kpis: aggregator.kpis()?,
            status_breakdown: aggregator.status_breakdown()?,
            worker_performance: aggregator.worker_performance()?,
            ready_time_histogram: aggregator.ready_time_histogram(histogram_bins)?,
            orders_detail: filter.apply(aggregator.orders_detail(detail_limit)?),
        };

        debug!(rows = report.kpis.total, detail_rows = report.orders_detail.len(), "Collected report");
        Ok(report)
    }

    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> SimulationResult<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Text => Ok(self.render_text()),
        }
    }

    /// Plain text rendering
    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kpis = &self.kpis;
        writeln!(out, "Fulfillment KPIs")?;
        writeln!(out, "================")?;
        writeln!(out, "Total Orders:          {}", kpis.total)?;
        writeln!(out, "Completed:             {}", kpis.completed)?;
        writeln!(out, "Late:                  {}", kpis.late)?;
        writeln!(out, "Canceled:              {}", kpis.canceled)?;
        writeln!(out, "Late Rate:             {:.1}%", kpis.late_rate())?;
        writeln!(out, "Cancel Rate:           {:.1}%", kpis.cancel_rate())?;
        writeln!(out, "Avg Minutes to Ready:  {}", optional(kpis.avg_minutes_to_ready, 1))?;
        writeln!(out, "Avg Out-of-Stock:      {}", optional(kpis.avg_out_of_stock_items, 2))?;
        writeln!(out)?;

        writeln!(out, "Status Breakdown")?;
        writeln!(out, "----------------")?;
        if self.status_breakdown.is_empty() {
            writeln!(out, "  (no events)")?;
        }
        for row in &self.status_breakdown {
            writeln!(out, "  {:<10} {:>8}", row.status, row.count)?;
        }
        writeln!(out)?;

        writeln!(out, "Worker Performance")?;
        writeln!(out, "------------------")?;
        writeln!(
            out,
            "  {:<8} {:>7} {:>10} {:>11} {:>6} {:>9}",
            "Worker", "Orders", "Avg Pick", "Avg Ready", "Late", "Canceled"
        )?;
        for row in &self.worker_performance {
            writeln!(
                out,
                "  {:<8} {:>7} {:>10.1} {:>11.1} {:>6} {:>9}",
                row.worker_id,
                row.orders_handled,
                row.avg_minutes_to_pick,
                row.avg_minutes_to_ready,
                row.late,
                row.canceled
            )?;
        }
        writeln!(out)?;

        writeln!(out, "Minutes to Ready")?;
        writeln!(out, "----------------")?;
        if self.ready_time_histogram.is_empty() {
            writeln!(out, "  (no data)")?;
        }
        let peak = self.ready_time_histogram.peak().max(1);
        for bucket in &self.ready_time_histogram.buckets {
            let bar = "#".repeat(bucket.count * HISTOGRAM_BAR_WIDTH / peak);
            writeln!(
                out,
                "  {:>8.1} - {:<8.1} {:>6} {}",
                bucket.lower, bucket.upper, bucket.count, bar
            )?;
        }
        writeln!(out)?;

        writeln!(out, "Orders Detail ({} rows)", self.orders_detail.len())?;
        writeln!(out, "-------------")?;
        writeln!(
            out,
            "  {:<36} {:<26} {:<10} {:>5} {:<6} {:<9} {:>3} {:>8} {:>10}",
            "Order", "Created", "Channel", "Items", "Worker", "Status", "OOS", "Ready", "Delivered"
        )?;
        for row in &self.orders_detail {
            writeln!(
                out,
                "  {:<36} {:<26} {:<10} {:>5} {:<6} {:<9} {:>3} {:>8.1} {:>10}",
                row.order_id,
                format_timestamp(&row.created_ts),
                row.channel,
                row.items_count,
                row.worker_id,
                row.status,
                row.out_of_stock_items,
                row.minutes_to_ready,
                optional(row.minutes_to_delivered, 1)
            )?;
        }
        Ok(())
    }
}

fn optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}
