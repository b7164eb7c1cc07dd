use crate::chart::PieChart;
use crate::tally::Tally;

/// Plain-text slice table for headless runs.
pub fn print_summary(tally: &Tally) {
    let chart = tally.chart();
    println!("{}", chart.title);
    println!("{:<24} {:>8} {:>6}", "label", "count", "share");
    for slice in &chart.slices {
        println!("{:<24} {:>8} {:>5}%", slice.label, slice.size, slice.percent(chart.total));
    }
    println!("{:<16} {}", "Processed:", tally.processed());
    println!("{:<16} {}", "Dropped:", tally.dropped());
    println!("{:<16} {}", "Categories:", tally.table().len());
}

pub fn summary_json(tally: &Tally) -> serde_json::Value {
    let chart: PieChart = tally.chart();
    let slices: Vec<serde_json::Value> = chart
        .slices
        .iter()
        .map(|s| {
            serde_json::json!({
                "label": s.label,
                "size": s.size,
                "percent": s.percent(chart.total),
            })
        })
        .collect();
    serde_json::json!({
        "field": tally.field(),
        "title": chart.title,
        "processed": tally.processed(),
        "dropped": tally.dropped(),
        "counts": tally.table().sorted(),
        "slices": slices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{Payload, Record};
    use buzz_pie_common::ChartConfig;

    #[test]
    fn json_summary_has_slices_and_counters() {
        let mut t = Tally::new(&ChartConfig::default());
        for (i, line) in [r#"{"category":"a"}"#, r#"{"category":"a"}"#, r#"{"category":"b"}"#, "bad"].iter().enumerate() {
            t.process(Record::new(i as i64, Payload::Text(line.to_string())));
        }
        let doc = summary_json(&t);
        assert_eq!(doc["processed"], 4);
        assert_eq!(doc["dropped"], 1);
        assert_eq!(doc["slices"][0]["label"], "a");
        assert_eq!(doc["slices"][0]["percent"], 67);
        assert_eq!(doc["counts"][1][0], "b");
    }
}
