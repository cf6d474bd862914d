//! Per-generation statistics.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Summary of one generation.
///
/// `best` and `average` are taken over the primary objective of the
/// population; `secondary` and `budget` belong to the best-so-far
/// individual.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogRecord {
    pub generation: usize,
    pub best: f64,
    pub average: f64,
    pub secondary: f64,
    pub budget: Option<f64>,
}

/// Append-only sequence of [`LogRecord`]s, one per generation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Logbook {
    records: Vec<LogRecord>,
}

impl Logbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, record: LogRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&LogRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&LogRecord> {
        self.records.last()
    }

    /// Population best per generation.
    pub fn best_series(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.best).collect()
    }

    /// Population average per generation.
    pub fn average_series(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.average).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series() {
        let mut log = Logbook::new();
        for g in 0..3 {
            log.record(LogRecord {
                generation: g,
                best: 10.0 - g as f64,
                average: 20.0 - g as f64,
                secondary: 0.5,
                budget: None,
            });
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.best_series(), vec![10.0, 9.0, 8.0]);
        assert_eq!(log.average_series(), vec![20.0, 19.0, 18.0]);
        assert_eq!(log.first().map(|r| r.generation), Some(0));
        assert_eq!(log.last().map(|r| r.generation), Some(2));
    }
}
