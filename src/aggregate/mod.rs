//! The aggregation core.
//!
//! Groups flat records into `year -> month` (or `year -> city`, or
//! whole-dataset) buckets and reduces each bucket's raw values. This is the
//! single parameterized replacement for the grouping loop every chart used to
//! carry its own copy of.
//!
//! Buckets only exist when at least one record contributed, and a metric is
//! only present in a leaf when at least one contributing record carried its
//! field. Missing months are the chart layer's problem, which enumerates all
//! twelve and defaults to zero.

use std::collections::{BTreeMap, HashMap};

use crate::reading::{Field, Record};

/// How a metric collapses the values that landed in one bucket.
///
/// `First` keeps the first contributing value in input order. It exists for
/// the wind chart, which plots the first observed speed of each month next to
/// the maximum; every other reduction is order-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Sum,
    Mean,
    Min,
    Max,
    First,
    Count,
}

impl Reduction {
    /// Reduces the contributing values. `None` when nothing contributed, so
    /// empty buckets never surface as zeros or NaN.
    pub fn reduce(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }

        let value = match self {
            Reduction::Sum => values.iter().sum(),
            Reduction::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Reduction::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Reduction::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Reduction::First => values[0],
            Reduction::Count => values.len() as f64,
        };

        Some(value)
    }
}

/// A classifier as the aggregator sees it: the label set in display order and
/// a function from record to label. Records the function maps to `None` are
/// dropped from categorical aggregations.
#[derive(Clone, Copy)]
pub struct Classifier {
    pub labels: &'static [&'static str],
    pub apply: fn(&Record) -> Option<&'static str>,
}

/// Where a metric's bucket value comes from.
#[derive(Clone, Copy)]
pub enum Source {
    /// Reduce the raw values of a numeric field.
    Value(Field, Reduction),
    /// Most frequent classifier label, ties broken by first occurrence.
    ModeOf(Classifier),
}

/// One output metric of a monthly aggregation.
#[derive(Clone, Copy)]
pub struct MetricSpec {
    /// Leaf key in the aggregate result.
    pub name: &'static str,
    /// Series label on the rendered chart.
    pub label: &'static str,
    pub source: Source,
}

/// A reduced bucket value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Label(&'static str),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&'static str> {
        match self {
            Value::Number(_) => None,
            Value::Label(l) => Some(l),
        }
    }
}

pub type Leaf = BTreeMap<&'static str, Value>;
pub type MonthlyTable = BTreeMap<i32, BTreeMap<u32, Leaf>>;
pub type CountTable<K> = BTreeMap<i32, BTreeMap<K, BTreeMap<&'static str, u64>>>;

/// Buckets records by `(year, month)` and reduces every metric per bucket.
/// Records without a parsable date are skipped.
pub fn aggregate_monthly(records: &[Record], metrics: &[MetricSpec]) -> MonthlyTable {
    let mut buckets: BTreeMap<(i32, u32), Vec<&Record>> = BTreeMap::new();
    for record in records {
        if let Some(key) = record.month_key() {
            buckets.entry(key).or_default().push(record);
        }
    }

    let mut table = MonthlyTable::new();
    for ((year, month), contributors) in buckets {
        let mut leaf = Leaf::new();

        for metric in metrics {
            let value = match metric.source {
                Source::Value(field, reduction) => {
                    let values: Vec<f64> = contributors
                        .iter()
                        .filter_map(|r| field.extract(r))
                        .collect();
                    reduction.reduce(&values).map(Value::Number)
                }
                Source::ModeOf(classifier) => {
                    let labels: Vec<&'static str> = contributors
                        .iter()
                        .filter_map(|r| (classifier.apply)(r))
                        .collect();
                    mode(&labels).map(Value::Label)
                }
            };

            if let Some(value) = value {
                leaf.insert(metric.name, value);
            }
        }

        if !leaf.is_empty() {
            table.entry(year).or_default().insert(month, leaf);
        }
    }

    table
}

/// Category frequency per `(year, month)` bucket.
pub fn count_by_month(records: &[Record], classifier: &Classifier) -> CountTable<u32> {
    let mut table = CountTable::new();

    for record in records {
        let Some((year, month)) = record.month_key() else {
            continue;
        };
        if let Some(label) = (classifier.apply)(record) {
            *table
                .entry(year)
                .or_default()
                .entry(month)
                .or_default()
                .entry(label)
                .or_insert(0) += 1;
        }
    }

    table
}

/// Category frequency per `(year, city)` bucket. Records without a city are
/// skipped along with records without a parsable date.
pub fn count_by_city(records: &[Record], classifier: &Classifier) -> CountTable<String> {
    let mut table = CountTable::new();

    for record in records {
        let Some((year, _)) = record.month_key() else {
            continue;
        };
        let Some(city) = record.city.as_deref().filter(|c| !c.trim().is_empty()) else {
            continue;
        };
        if let Some(label) = (classifier.apply)(record) {
            *table
                .entry(year)
                .or_default()
                .entry(city.to_string())
                .or_default()
                .entry(label)
                .or_insert(0) += 1;
        }
    }

    table
}

/// Whole-dataset category counts in the classifier's declared label order.
/// Labels nothing classified into are present with a zero count, so pie
/// legends keep a stable shape.
pub fn distribution(records: &[Record], classifier: &Classifier) -> Vec<(&'static str, u64)> {
    let mut counts: HashMap<&'static str, u64> = HashMap::new();
    for record in records {
        if let Some(label) = (classifier.apply)(record) {
            *counts.entry(label).or_insert(0) += 1;
        }
    }

    classifier
        .labels
        .iter()
        .map(|&label| (label, counts.get(label).copied().unwrap_or(0)))
        .collect()
}

/// Most frequent label; ties go to the label seen first.
pub fn mode(labels: &[&'static str]) -> Option<&'static str> {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    let mut seen_order: Vec<&'static str> = Vec::new();

    for &label in labels {
        let count = counts.entry(label).or_insert(0);
        if *count == 0 {
            seen_order.push(label);
        }
        *count += 1;
    }

    let mut best: Option<(&'static str, usize)> = None;
    for label in seen_order {
        let count = counts[label];
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((label, count)),
        }
    }

    best.map(|(label, _)| label)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify;

    fn record(date: &str, magnitude: Option<f64>, rain: Option<f64>) -> Record {
        Record {
            date: Some(date.to_string()),
            magnitude,
            weather: crate::reading::Weather {
                rain_sum: rain,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    const MAG_METRICS: &[MetricSpec] = &[
        MetricSpec {
            name: "max_magnitude",
            label: "Max Magnitude",
            source: Source::Value(Field::Magnitude, Reduction::Max),
        },
        MetricSpec {
            name: "min_magnitude",
            label: "Min Magnitude",
            source: Source::Value(Field::Magnitude, Reduction::Min),
        },
        MetricSpec {
            name: "avg_magnitude",
            label: "Avg Magnitude",
            source: Source::Value(Field::Magnitude, Reduction::Mean),
        },
    ];

    #[test]
    fn should_aggregate_per_year_and_month() {
        let records = vec![
            record("2023-05-01", Some(1.5), None),
            record("2023-05-15", Some(6.0), None),
            record("2023-06-01", Some(4.0), None),
        ];

        let table = aggregate_monthly(&records, MAG_METRICS);

        let may = &table[&2023][&5];
        assert_eq!(may["max_magnitude"], Value::Number(6.0));
        assert_eq!(may["min_magnitude"], Value::Number(1.5));
        assert_eq!(may["avg_magnitude"], Value::Number(3.75));

        let june = &table[&2023][&6];
        assert_eq!(june["avg_magnitude"], Value::Number(4.0));
    }

    #[test]
    fn should_skip_unparsable_dates() {
        let records = vec![
            record("2024-01-01", Some(2.0), None),
            record("2024-13-01", Some(9.0), None),
        ];

        let table = aggregate_monthly(&records, MAG_METRICS);

        assert_eq!(table.len(), 1);
        assert_eq!(table[&2024].len(), 1);
        assert_eq!(table[&2024][&1]["max_magnitude"], Value::Number(2.0));
    }

    #[test]
    fn should_produce_empty_table_for_empty_input() {
        assert!(aggregate_monthly(&[], MAG_METRICS).is_empty());
        assert!(count_by_month(&[], &classify::MAGNITUDE).is_empty());
        assert!(count_by_city(&[], &classify::MAGNITUDE).is_empty());
    }

    #[test]
    fn should_exclude_absent_fields_from_reductions() {
        // One record carries no magnitude at all: the mean must not be
        // dragged down by a phantom zero.
        let records = vec![
            record("2023-05-01", Some(4.0), Some(1.0)),
            record("2023-05-02", None, Some(3.0)),
        ];

        let table = aggregate_monthly(&records, MAG_METRICS);
        assert_eq!(table[&2023][&5]["avg_magnitude"], Value::Number(4.0));
    }

    #[test]
    fn should_omit_metric_when_no_record_carries_the_field() {
        let metrics = &[
            MetricSpec {
                name: "total_rain_sum",
                label: "Total Rainfall",
                source: Source::Value(Field::RainSum, Reduction::Sum),
            },
            MetricSpec {
                name: "avg_magnitude",
                label: "Avg Magnitude",
                source: Source::Value(Field::Magnitude, Reduction::Mean),
            },
        ];
        let records = vec![record("2023-05-01", None, Some(1.0))];

        let table = aggregate_monthly(&records, metrics);
        let leaf = &table[&2023][&5];
        assert_eq!(leaf["total_rain_sum"], Value::Number(1.0));
        assert!(!leaf.contains_key("avg_magnitude"));
    }

    #[test]
    fn should_drop_bucket_when_no_metric_reduces() {
        let records = vec![record("2023-05-01", None, None)];
        assert!(aggregate_monthly(&records, MAG_METRICS).is_empty());
    }

    #[test]
    fn should_be_order_invariant_for_symmetric_reductions() {
        let mut records = vec![
            record("2023-05-01", Some(1.5), Some(2.0)),
            record("2023-05-15", Some(6.0), Some(7.0)),
            record("2023-05-20", Some(4.0), Some(11.0)),
        ];

        let forward = aggregate_monthly(&records, MAG_METRICS);
        records.reverse();
        let reversed = aggregate_monthly(&records, MAG_METRICS);

        assert_eq!(forward, reversed);
    }

    #[test]
    fn should_be_idempotent() {
        let records = vec![
            record("2023-05-01", Some(1.5), None),
            record("2023-06-01", Some(4.0), None),
        ];

        assert_eq!(
            aggregate_monthly(&records, MAG_METRICS),
            aggregate_monthly(&records, MAG_METRICS)
        );
    }

    #[test]
    fn should_keep_first_value_for_first_reduction() {
        let metrics = &[MetricSpec {
            name: "actual",
            label: "Actual",
            source: Source::Value(Field::Magnitude, Reduction::First),
        }];

        let records = vec![
            record("2023-05-03", Some(2.0), None),
            record("2023-05-01", Some(5.0), None),
        ];

        // Input order wins, not date order.
        let table = aggregate_monthly(&records, metrics);
        assert_eq!(table[&2023][&5]["actual"], Value::Number(2.0));
    }

    #[test]
    fn should_count_each_record_exactly_once() {
        let records = vec![
            record("2023-05-01", Some(1.5), None),
            record("2023-05-15", Some(6.0), None),
            record("2023-06-01", Some(4.0), None),
            record("bad date", Some(4.0), None),
        ];

        let table = count_by_month(&records, &classify::MAGNITUDE);
        let total: u64 = table
            .values()
            .flat_map(|months| months.values())
            .flat_map(|counts| counts.values())
            .sum();

        // Three parsable dates, all with classifiable magnitudes.
        assert_eq!(total, 3);
    }

    #[test]
    fn should_count_categories_per_year() {
        let records = vec![
            record("2023-05-01", Some(1.5), None),
            record("2023-05-15", Some(6.0), None),
            record("2023-06-01", Some(4.0), None),
        ];

        let table = count_by_month(&records, &classify::MAGNITUDE);
        let mut per_year: BTreeMap<&str, u64> = BTreeMap::new();
        for counts in table[&2023].values() {
            for (label, n) in counts {
                *per_year.entry(label).or_insert(0) += n;
            }
        }

        assert_eq!(per_year["Low_Magnitude"], 1);
        assert_eq!(per_year["Medium_Magnitude"], 1);
        assert_eq!(per_year["High_Magnitude"], 1);
    }

    #[test]
    fn should_skip_records_without_city() {
        let mut with_city = record("2023-05-01", Some(1.5), None);
        with_city.city = Some("Reykjavik".to_string());
        let without_city = record("2023-05-02", Some(1.5), None);
        let mut blank_city = record("2023-05-03", Some(1.5), None);
        blank_city.city = Some("  ".to_string());

        let table = count_by_city(&[with_city, without_city, blank_city], &classify::MAGNITUDE);

        assert_eq!(table[&2023].len(), 1);
        assert_eq!(table[&2023]["Reykjavik"]["Low_Magnitude"], 1);
    }

    #[test]
    fn should_list_distribution_in_declared_label_order() {
        let records = vec![
            record("2023-05-01", Some(6.0), None),
            record("2023-05-02", Some(7.0), None),
        ];

        let dist = distribution(&records, &classify::MAGNITUDE);

        assert_eq!(
            dist,
            vec![
                ("Low_Magnitude", 0),
                ("Medium_Magnitude", 0),
                ("High_Magnitude", 2),
            ]
        );
    }

    #[test]
    fn should_break_mode_ties_by_first_occurrence() {
        assert_eq!(mode(&["b", "a", "a", "b"]), Some("b"));
        assert_eq!(mode(&["a", "b", "b", "a", "c"]), Some("a"));
        assert_eq!(mode(&["c", "c", "a"]), Some("c"));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn should_reduce_empty_slice_to_none() {
        for reduction in [
            Reduction::Sum,
            Reduction::Mean,
            Reduction::Min,
            Reduction::Max,
            Reduction::First,
            Reduction::Count,
        ] {
            assert_eq!(reduction.reduce(&[]), None);
        }
    }

    #[test]
    fn should_reduce_values() {
        let values = [3.0, 1.0, 2.0];

        assert_eq!(Reduction::Sum.reduce(&values), Some(6.0));
        assert_eq!(Reduction::Mean.reduce(&values), Some(2.0));
        assert_eq!(Reduction::Min.reduce(&values), Some(1.0));
        assert_eq!(Reduction::Max.reduce(&values), Some(3.0));
        assert_eq!(Reduction::First.reduce(&values), Some(3.0));
        assert_eq!(Reduction::Count.reduce(&values), Some(3.0));
    }
}
