//! Sequential chart fetch queue
//!
//! Charts are fetched one at a time, first in, first out, in configuration
//! order. A slow chart delays the charts behind it, never the ones before it.

use dash_core::ChartConfig;
use std::collections::VecDeque;

/// One pending chart fetch
#[derive(Debug, Clone, PartialEq)]
pub struct ChartJob {
    /// Position in the configuration
    pub position: usize,
    pub chart: ChartConfig,
}

impl ChartJob {
    pub fn id(&self) -> &str {
        &self.chart.id
    }
}

/// FIFO of chart fetches for one refresh cycle
#[derive(Debug, Clone, Default)]
pub struct ChartQueue {
    jobs: VecDeque<ChartJob>,
}

impl ChartQueue {
    pub fn from_charts(charts: &[ChartConfig]) -> Self {
        Self {
            jobs: charts
                .iter()
                .cloned()
                .enumerate()
                .map(|(position, chart)| ChartJob { position, chart })
                .collect(),
        }
    }

    /// Next job to run
    pub fn pop(&mut self) -> Option<ChartJob> {
        self.jobs.pop_front()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl Iterator for ChartQueue {
    type Item = ChartJob;

    fn next(&mut self) -> Option<ChartJob> {
        self.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo_in_config_order() {
        let charts = vec![
            ChartConfig::new("c", "C"),
            ChartConfig::new("a", "A"),
            ChartConfig::new("b", "B"),
        ];
        let mut queue = ChartQueue::from_charts(&charts);
        assert_eq!(queue.len(), 3);

        let first = queue.pop().unwrap();
        assert_eq!((first.position, first.id()), (0, "c"));

        let rest: Vec<_> = queue.map(|job| job.chart.id).collect();
        assert_eq!(rest, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_queue() {
        let mut queue = ChartQueue::from_charts(&[]);
        assert!(queue.is_empty());
        assert!(queue.pop().is_none());
    }
}
