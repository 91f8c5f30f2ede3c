//! In-memory dataset and the aggregations behind each endpoint

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;

use chrono::NaiveDate;
use dash_core::{ChartResponse, FilterState, Metric, Point, Row, Table, DATE_FORMAT};
use serde_json::{Number, Value};

use crate::config::{ChartAggregation, ChartDef, MetricAggregation, MetricDef};

/// Rows returned by `/api/table`
pub const TABLE_LIMIT: usize = 50;

// ============================================================================
// DATASET
// ============================================================================

/// Tabular data loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
    date_column: Option<String>,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            date_column: None,
        }
    }

    /// Enable date filtering on `column`; ignored when the column is absent
    pub fn with_date_column(mut self, column: Option<String>) -> Self {
        self.date_column = match column {
            Some(column) if self.has_column(&column) => Some(column),
            Some(column) => {
                tracing::warn!("Date column '{}' not in dataset, date filters disabled", column);
                None
            }
            None => None,
        };
        self
    }

    pub fn from_csv<R: io::Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = csv::Reader::from_reader(reader);
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: Row = columns
                .iter()
                .zip(record.iter())
                .map(|(column, raw)| (column.clone(), parse_field(raw)))
                .collect();
            rows.push(row);
        }

        Ok(Self::new(columns, rows))
    }

    pub fn load(path: &Path) -> Result<Self, csv::Error> {
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_csv(file)?;
        tracing::info!("Loaded {} rows from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows inside the date range (all rows without a date column or filters).
    /// Rows with an unreadable date never match an active filter.
    pub fn filter(&self, filters: &FilterState) -> Vec<&Row> {
        match &self.date_column {
            Some(column) if !filters.is_empty() => self
                .rows
                .iter()
                .filter(|row| row_date(row, column).is_some_and(|date| filters.contains(date)))
                .collect(),
            _ => self.rows.iter().collect(),
        }
    }

    /// Most recent rows first (by date column when present)
    pub fn table(&self, filters: &FilterState) -> Table {
        let mut rows = self.filter(filters);
        if let Some(column) = &self.date_column {
            rows.sort_by(|a, b| row_date(b, column).cmp(&row_date(a, column)));
        }
        Table::new(rows.into_iter().take(TABLE_LIMIT).cloned().collect())
    }

    pub fn metrics(&self, defs: &[MetricDef], filters: &FilterState) -> Vec<Metric> {
        let rows = self.filter(filters);
        defs.iter().map(|def| self.metric(def, &rows)).collect()
    }

    fn metric(&self, def: &MetricDef, rows: &[&Row]) -> Metric {
        let value = match def.aggregation {
            MetricAggregation::Ratio => {
                let numerator = def.numerator.as_deref().map_or(0.0, |c| sum(rows, c));
                let denominator = def.denominator.as_deref().map_or(0.0, |c| sum(rows, c));
                numerator / if denominator == 0.0 { 1.0 } else { denominator }
            }
            aggregation => match def.column.as_deref() {
                Some(column) if self.has_column(column) => aggregate(aggregation, rows, column),
                _ => {
                    tracing::warn!("Metric '{}' has no usable column", def.id);
                    f64::NAN
                }
            },
        };

        let finite = value.is_finite();
        Metric {
            id: Some(def.id.clone()),
            label: def.display_label().to_string(),
            value: finite.then_some(value),
            formatted: finite.then(|| format_value(value, def.format.as_deref())),
        }
    }

    /// Group the filtered rows by `x`, aggregate `y`, sort by `x`
    pub fn chart(&self, def: &ChartDef, filters: &FilterState) -> ChartResponse {
        let mut response = ChartResponse {
            id: Some(def.id.clone()),
            label: Some(def.display_label().to_string()),
            kind: Some(def.kind_name().to_string()),
            points: Vec::new(),
        };

        if !self.has_column(&def.x) || !self.has_column(&def.y) {
            tracing::warn!("Chart '{}' references missing columns ({}, {})", def.id, def.x, def.y);
            return response;
        }

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(String, f64, usize)> = Vec::new();
        for row in self.filter(filters) {
            let Some(key) = row.get(&def.x).and_then(cell_key) else {
                continue;
            };
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push((key, 0.0, 0));
                groups.len() - 1
            });
            if let Some(y) = row.get(&def.y).and_then(number) {
                groups[slot].1 += y;
                groups[slot].2 += 1;
            }
        }

        sort_keys(&mut groups);

        response.points = groups
            .into_iter()
            .filter_map(|(key, total, count)| {
                let y = match def.aggregation {
                    ChartAggregation::Sum => total,
                    ChartAggregation::Mean if count > 0 => total / count as f64,
                    ChartAggregation::Mean => return None,
                };
                Some(Point::new(key, y))
            })
            .collect();

        response
    }
}

// ============================================================================
// CELLS
// ============================================================================

/// CSV field to JSON: integers and floats become numbers, empty becomes null
fn parse_field(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }
    match raw.parse::<f64>().ok().and_then(Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(raw.to_string()),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => finite(s.trim()),
        _ => None,
    }
}

/// Parse a finite number; `nan`/`inf` spellings stay text
fn finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Grouping/uniqueness key; nulls have none
fn cell_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn row_date(row: &Row, column: &str) -> Option<NaiveDate> {
    let raw = row.get(column)?.as_str()?;
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, DATE_FORMAT).ok()
}

/// Numeric order when every key is a number, lexical otherwise
fn sort_keys(groups: &mut [(String, f64, usize)]) {
    let numeric: Option<Vec<f64>> = groups.iter().map(|(k, _, _)| finite(k)).collect();
    if numeric.is_some() {
        groups.sort_by(|a, b| {
            let (a, b) = (finite(&a.0).unwrap_or(0.0), finite(&b.0).unwrap_or(0.0));
            a.total_cmp(&b)
        });
    } else {
        groups.sort_by(|a, b| a.0.cmp(&b.0));
    }
}

// ============================================================================
// AGGREGATIONS
// ============================================================================

fn values<'a>(rows: &'a [&Row], column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
    rows.iter().filter_map(move |row| row.get(column)).filter(|v| !v.is_null())
}

fn sum(rows: &[&Row], column: &str) -> f64 {
    values(rows, column).filter_map(number).sum()
}

fn aggregate(aggregation: MetricAggregation, rows: &[&Row], column: &str) -> f64 {
    match aggregation {
        MetricAggregation::Sum => sum(rows, column),
        MetricAggregation::Mean => {
            let numbers: Vec<f64> = values(rows, column).filter_map(number).collect();
            if numbers.is_empty() {
                f64::NAN
            } else {
                numbers.iter().sum::<f64>() / numbers.len() as f64
            }
        }
        MetricAggregation::Count => values(rows, column).count() as f64,
        MetricAggregation::Nunique => values(rows, column)
            .filter_map(cell_key)
            .collect::<HashSet<_>>()
            .len() as f64,
        MetricAggregation::Ratio => f64::NAN,
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Format a metric value: `,d` (grouped integer), `$,.2f` (currency),
/// `{}`/`{:.N}`/`{:,.N}` templates; anything else prints the raw value.
pub fn format_value(value: f64, format: Option<&str>) -> String {
    match format {
        None => value.to_string(),
        Some(",d") => {
            // -0.4 rounds to -0.0, which must print as "0"
            let rounded = value.round();
            let rounded = if rounded == 0.0 { 0.0 } else { rounded };
            group_thousands(&format!("{:.0}", rounded))
        }
        Some("$,.2f") => format!("${}", group_thousands(&format!("{:.2}", value))),
        Some(template) => match (template.find('{'), template.find('}')) {
            (Some(open), Some(close)) if open < close => {
                let rendered = render_spec(value, &template[open + 1..close]);
                format!("{}{}{}", &template[..open], rendered, &template[close + 1..])
            }
            _ => value.to_string(),
        },
    }
}

fn render_spec(value: f64, spec: &str) -> String {
    let spec = spec.trim_start_matches(':');
    let (grouped, spec) = match spec.strip_prefix(',') {
        Some(rest) => (true, rest),
        None => (false, spec),
    };
    let precision = spec
        .strip_prefix('.')
        .map(|p| p.trim_end_matches('f'))
        .and_then(|p| p.parse::<usize>().ok());

    let plain = match precision {
        Some(precision) => format!("{:.*}", precision, value),
        None => value.to_string(),
    };
    if grouped { group_thousands(&plain) } else { plain }
}

/// Insert `,` separators into the integer part of a formatted number
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}
