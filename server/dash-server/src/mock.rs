//! Mock sales data for demo/development

use chrono::{Duration, NaiveDate, Utc};
use dash_core::{Row, DATE_FORMAT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::data::Dataset;

pub const DEFAULT_SEED: u64 = 8509;

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];

/// Product name and unit price
const PRODUCTS: [(&str, f64); 5] = [
    ("Widget", 19.99),
    ("Gadget", 34.50),
    ("Gizmo", 12.75),
    ("Doohickey", 49.00),
    ("Sprocket", 7.25),
];

const COLUMNS: [&str; 7] = ["date", "region", "product", "customer_id", "units", "orders", "revenue"];

/// Seeded generator for a daily sales log
pub struct SalesGenerator {
    rng: StdRng,
    start: NaiveDate,
    days: i64,
    max_sales_per_day: usize,
    customers: u32,
}

impl SalesGenerator {
    /// 90 days ending today
    pub fn new(seed: u64) -> Self {
        let days = 90;
        Self {
            rng: StdRng::seed_from_u64(seed),
            start: Utc::now().date_naive() - Duration::days(days - 1),
            days,
            max_sales_per_day: 8,
            customers: 120,
        }
    }

    pub fn starting(mut self, start: NaiveDate) -> Self {
        self.start = start;
        self
    }

    pub fn days(mut self, days: i64) -> Self {
        self.days = days.max(0);
        self
    }

    fn sale(&mut self, date: NaiveDate, trend: f64) -> Row {
        let region = REGIONS[self.rng.gen_range(0..REGIONS.len())];
        let (product, price) = PRODUCTS[self.rng.gen_range(0..PRODUCTS.len())];
        let units: u32 = self.rng.gen_range(1..=6);
        let orders: u32 = self.rng.gen_range(1..=units.min(3));
        let discount = 1.0 - self.rng.r#gen::<f64>() * 0.15;
        let revenue = (units as f64 * price * discount * trend * 100.0).round() / 100.0;
        let customer = self.rng.gen_range(1..=self.customers);

        let mut row = Row::new();
        row.insert(COLUMNS[0].into(), Value::from(date.format(DATE_FORMAT).to_string()));
        row.insert(COLUMNS[1].into(), Value::from(region));
        row.insert(COLUMNS[2].into(), Value::from(product));
        row.insert(COLUMNS[3].into(), Value::from(format!("C{:04}", customer)));
        row.insert(COLUMNS[4].into(), Value::from(units));
        row.insert(COLUMNS[5].into(), Value::from(orders));
        row.insert(COLUMNS[6].into(), Value::from(revenue));
        row
    }

    pub fn generate(mut self) -> Dataset {
        tracing::info!("Generating {} days of sample sales data from {}", self.days, self.start);

        let mut rows = Vec::new();
        for day in 0..self.days {
            let date = self.start + Duration::days(day);
            // slow upward drift so the line chart has a shape
            let trend = 1.0 + day as f64 / self.days.max(1) as f64 * 0.5;
            let sales = self.rng.gen_range(1..=self.max_sales_per_day);
            for _ in 0..sales {
                rows.push(self.sale(date, trend));
            }
        }

        let columns = COLUMNS.iter().map(|c| c.to_string()).collect();
        Dataset::new(columns, rows).with_date_column(Some(COLUMNS[0].to_string()))
    }
}
