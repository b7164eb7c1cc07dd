use buzz_pie_common::ChartConfig;
use buzz_pie_core::{
    display_slices, spawn_consumer, DisplaySlice, FrequencyTable, LineSource, Outcome, Payload,
    Record, SourceEvent, Tally,
};
use std::io::Write;
use std::time::Duration;

fn table(pairs: &[(&str, u64)]) -> FrequencyTable {
    pairs.iter().copied().collect()
}

fn slices(pairs: &[(&str, u64)]) -> Vec<DisplaySlice> {
    pairs.iter().map(|&(l, s)| DisplaySlice::new(l, s)).collect()
}

#[test]
fn empty_table_shows_waiting() {
    assert_eq!(display_slices(&FrequencyTable::new(), 0.05), slices(&[("waiting", 1)]));
}

#[test]
fn small_category_folds_into_other() {
    let t = table(&[("sports", 90), ("politics", 3), ("tech", 7)]);
    assert_eq!(
        display_slices(&t, 0.05),
        slices(&[("sports", 90), ("tech", 7), ("other", 3)])
    );
}

#[test]
fn two_small_categories_both_kept() {
    // both under a 60% threshold, but the keep floor is two
    let t = table(&[("a", 5), ("b", 5)]);
    assert_eq!(display_slices(&t, 0.6), slices(&[("a", 5), ("b", 5)]));
}

#[test]
fn floor_applies_before_threshold() {
    let t = table(&[("a", 40), ("b", 30), ("c", 20), ("d", 10)]);
    assert_eq!(display_slices(&t, 0.5), slices(&[("a", 40), ("b", 30), ("other", 30)]));
}

#[test]
fn zero_threshold_keeps_everything() {
    let t = table(&[("a", 1), ("b", 1), ("c", 1000)]);
    assert_eq!(display_slices(&t, 0.0).len(), 3);
}

#[test]
fn collapsed_sizes_sum_to_total() {
    let cases: Vec<Vec<(&str, u64)>> = vec![
        vec![("a", 1)],
        vec![("a", 100), ("b", 1), ("c", 1), ("d", 1), ("e", 2)],
        vec![("x", 3), ("y", 3), ("z", 3), ("w", 3)],
        vec![("big", 999), ("s1", 1), ("s2", 1), ("s3", 1)],
        vec![("other", 50), ("a", 45), ("b", 3), ("c", 2)],
        vec![("a", 90), ("other", 1), ("b", 1), ("c", 8)],
    ];
    for pairs in cases {
        let t = table(&pairs);
        for share in [0.0, 0.05, 0.25, 0.9, 1.0] {
            let out = display_slices(&t, share);
            assert_eq!(out.iter().map(|s| s.size).sum::<u64>(), t.total());
            assert!(out.iter().filter(|s| s.label == "other").count() <= 1);
            assert!(out.len() >= 2usize.min(t.len()));
        }
    }
}

#[test]
fn equal_counts_order_by_label() {
    let t = table(&[("zeta", 4), ("alpha", 4), ("mid", 4)]);
    let labels: Vec<String> = display_slices(&t, 0.05).into_iter().map(|s| s.label).collect();
    assert_eq!(labels, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn total_counts_equal_messages_minus_dropped() {
    let mut tally = Tally::new(&ChartConfig::default());
    let inputs = vec![
        Payload::Text(r#"{"category":"Cats "}"#.into()),
        Payload::Text(r#"{"category":"cats"}"#.into()),
        Payload::Binary(br#"{"category":" CATS"}"#.to_vec()),
        Payload::Text("not json".into()),
        Payload::Binary(vec![0xc3, 0x28, 0xff]),
        Payload::Text("42".into()),
        Payload::Text(r#"{"category":null}"#.into()),
        Payload::Text(r#"{"name":"no category"}"#.into()),
        Payload::Empty,
    ];
    let n = inputs.len() as u64;
    let mut dropped = 0;
    for (i, p) in inputs.into_iter().enumerate() {
        if let Outcome::Dropped(_) = tally.process(Record::new(i as i64, p)) {
            dropped += 1;
        }
    }
    assert_eq!(dropped, 4);
    assert_eq!(tally.dropped(), dropped);
    assert_eq!(tally.table().total(), n - dropped);
    assert_eq!(tally.table().count("cats"), 3);
    assert_eq!(tally.table().count("unknown"), 2);
}

#[test]
fn malformed_text_leaves_table_unchanged() {
    let mut tally = Tally::new(&ChartConfig::default());
    tally.process(Record::new(0, Payload::Text(r#"{"category":"tech"}"#.into())));
    let before = tally.table().clone();
    tally.process(Record::new(1, Payload::Text("{\"category\": ".into())));
    assert_eq!(tally.table().sorted(), before.sorted());
    tally.process(Record::new(2, Payload::Text(r#"{"category":"tech"}"#.into())));
    assert_eq!(tally.table().count("tech"), 2);
}

#[test]
fn file_source_through_consumer_thread() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    writeln!(tmp, r#"{{"category":"Sports"}}"#).unwrap();
    writeln!(tmp, "garbage").unwrap();
    tmp.write_all(&[0xff, 0xfe, b'\n']).unwrap();
    writeln!(tmp, r#"{{"category":"tech"}}"#).unwrap();
    writeln!(tmp, r#"{{"category":"SPORTS"}}"#).unwrap();
    tmp.flush().unwrap();

    let src = LineSource::open(tmp.path()).unwrap();
    let handle = spawn_consumer(Box::new(src), 2).unwrap();
    let mut tally = Tally::new(&ChartConfig::default());
    loop {
        match handle.recv_timeout(Duration::from_secs(5)) {
            Some(SourceEvent::Record(r)) => {
                tally.process(r);
            }
            Some(SourceEvent::Error(e)) => panic!("unexpected source error: {e}"),
            Some(SourceEvent::Closed) | None => break,
        }
    }
    assert_eq!(tally.processed(), 5);
    assert_eq!(tally.dropped(), 2);
    let chart = tally.chart();
    assert_eq!(chart.slices, slices(&[("sports", 2), ("tech", 1)]));
    assert_eq!(chart.percent_label(0), "67%");
}
