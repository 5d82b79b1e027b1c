use qualmask::sequence_processor::scoring::WindowScorer;
use qualmask::{
    process_records, Decision, Interval, OutputRecord, Record, RecordOutcome, RejectionReason,
    RunConfig, TrimRange,
};

// Deterministic pseudo-random reads: mixed quality profiles, some soft-masked stretches,
// some explicit annotations and the occasional malformed record.
fn synthetic_reads(n: usize) -> Vec<Record> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    (0..n)
        .map(|i| {
            let len = (next() % 180) as usize;
            let mut bases = Vec::with_capacity(len);
            let mut qualities = Vec::with_capacity(len);
            for _ in 0..len {
                let base = b"ACGT"[(next() % 4) as usize];
                let low = next() % 5 == 0;
                bases.push(if next() % 23 == 0 { base.to_ascii_lowercase() } else { base });
                qualities.push(if low { 0.1 } else { 0.6 + (next() % 40) as f64 / 100.0 });
            }

            let mut record = Record::new(format!("read{}", i), bases, qualities);
            if i % 17 == 5 {
                record.qualities.pop();
            }
            if i % 11 == 2 && len > 30 {
                record = record.with_mask_annotations(vec![Interval::new(10, 20)]);
            }
            record
        })
        .collect()
}

fn run(records: Vec<Record>, window: usize, threads: usize, mask: bool) -> Vec<RecordOutcome> {
    let config = RunConfig::new(0.7, window, threads, mask).unwrap();
    process_records(records, &config).unwrap().0
}

fn single(record: Record, threshold: f64, window: usize, mask: bool) -> OutputRecord {
    let config = RunConfig::new(threshold, window, 1, mask).unwrap();
    let (mut outcomes, _) = process_records(vec![record], &config).unwrap();
    outcomes.remove(0).unwrap()
}

#[test]
fn output_is_identical_for_every_worker_count() {
    for mask in [false, true] {
        for window in [1, 7, 100] {
            let expected = run(synthetic_reads(400), window, 1, mask);
            assert_eq!(expected.len(), 400);
            for threads in [2, 4, 8] {
                let got = run(synthetic_reads(400), window, threads, mask);
                assert_eq!(got, expected, "mask={} window={} threads={}", mask, window, threads);
            }
        }
    }
}

#[test]
fn malformed_records_are_rejected_in_place() {
    let outcomes = run(synthetic_reads(40), 5, 4, false);
    assert_eq!(outcomes.len(), 40);
    for (i, outcome) in outcomes.iter().enumerate() {
        match outcome {
            Ok(record) => assert_eq!(record.id, format!("read{}", i)),
            Err(rejection) => {
                assert_eq!(i % 17, 5);
                assert_eq!(rejection.index, i as u64);
                assert!(matches!(rejection.reason, RejectionReason::LengthMismatch { .. }));
            }
        }
    }
}

#[test]
fn window_means_include_tail_window() {
    let means = WindowScorer::new(2).score(&[10.0, 20.0, 30.0, 40.0]);
    assert_eq!(means, vec![15.0, 25.0, 35.0, 40.0]);
}

#[test]
fn trim_keeps_leftmost_of_equal_runs() {
    let record = Record::new("r", b"ACGTA".to_vec(), vec![0.9, 0.9, 0.1, 0.9, 0.9]);
    let out = single(record, 0.5, 1, false);
    assert_eq!(out.decision, Decision::Trim(TrimRange::new(0, 2)));
    assert_eq!(out.bases, b"AC");
}

#[test]
fn window_at_threshold_is_reliable() {
    // Means [0.5, 0.5, 0.5, 0.25]; the clipped window at 2 is 0.75.
    let record = Record::new("r", b"ACGT".to_vec(), vec![0.75, 0.25, 0.75, 0.25]);
    let out = single(record, 0.5, 2, false);
    assert_eq!(out.decision, Decision::Trim(TrimRange::new(0, 3)));
    assert_eq!(out.bases, b"ACG");
}

#[test]
fn mask_mode_without_annotations_matches_trim_mode() {
    let record = Record::new(
        "r",
        b"ACGTACGTAC".to_vec(),
        vec![0.1, 0.2, 0.9, 0.9, 0.8, 0.9, 0.3, 0.9, 0.9, 0.1],
    );
    let trimmed = single(record.clone(), 0.5, 2, false);
    let fallback = single(record, 0.5, 2, true);

    assert!(fallback.mask_fallback);
    assert_eq!(fallback.bases, trimmed.bases);
    assert_eq!(fallback.qualities, trimmed.qualities);
    assert_eq!(fallback.decision, trimmed.decision);
}

#[test]
fn existing_mask_is_preserved_unchanged() {
    let mut qualities = vec![0.9; 20];
    for q in &mut qualities[5..10] {
        *q = 0.05;
    }
    let record = Record::new("r", vec![b'A'; 20], qualities)
        .with_mask_annotations(vec![Interval::new(5, 10)]);

    let out = single(record, 0.5, 1, true);
    match &out.decision {
        Decision::Mask(set) => assert_eq!(set.intervals(), &[Interval::new(5, 10)]),
        other => panic!("expected a mask decision, got {:?}", other),
    }
    assert_eq!(out.len(), 20);
    assert_eq!(out.bases, vec![b'A'; 20]);
    assert_eq!(&out.qualities[5..10], &[0.05; 5]);
}

#[test]
fn trimming_is_idempotent() {
    let mut qualities = vec![0.1, 0.1];
    qualities.extend([0.9; 10]);
    qualities.extend([0.1, 0.1]);
    let record = Record::new("r", vec![b'C'; 14], qualities);

    let once = single(record, 0.5, 3, false);
    assert_eq!(once.decision, Decision::Trim(TrimRange::new(1, 11)));

    let again_input = Record::new(once.id.clone(), once.bases.clone(), once.qualities.clone());
    let twice = single(again_input, 0.5, 3, false);
    assert_eq!(twice.decision, Decision::Trim(TrimRange::new(0, once.len())));
    assert_eq!(twice.bases, once.bases);
    assert_eq!(twice.qualities, once.qualities);
}

#[test]
fn trimming_is_idempotent_when_the_tail_window_shrinks() {
    // The window at 1 passes against the full read but not once the read ends at 2.
    let record = Record::new("r", b"ACG".to_vec(), vec![0.1, 0.9, 0.0]);
    let once = single(record, 0.5, 2, false);
    let twice = single(
        Record::new("r", once.bases.clone(), once.qualities.clone()),
        0.5,
        2,
        false,
    );
    assert_eq!(twice.decision, Decision::Trim(TrimRange::new(0, once.len())));

    // Quarter-step qualities keep every sum exact, so both passes see the same means.
    let mut state: u32 = 0x9e37_79b9;
    for i in 0..300 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let len = (state % 40) as usize;
        let window = 1 + i % 6;
        let qualities: Vec<f64> = (0..len)
            .map(|k| f64::from((state >> (k % 29)) % 5) / 4.0)
            .collect();
        let record = Record::new("r", vec![b'A'; len], qualities);

        let once = single(record, 0.5, window, false);
        let again = Record::new("r", once.bases.clone(), once.qualities.clone());
        let twice = single(again, 0.5, window, false);
        assert_eq!(
            twice.decision,
            Decision::Trim(TrimRange::new(0, once.len())),
            "read {} window {}",
            i,
            window
        );
    }
}

#[test]
fn fully_failing_record_is_emitted_empty() {
    let records = vec![
        Record::new("good", b"ACGT".to_vec(), vec![0.9; 4]),
        Record::new("bad", b"ACGT".to_vec(), vec![0.1; 4]),
        Record::new("good2", b"ACGT".to_vec(), vec![0.9; 4]),
    ];
    let config = RunConfig::new(0.5, 2, 2, false).unwrap();
    let (outcomes, stats) = process_records(records, &config).unwrap();

    assert_eq!(outcomes.len(), 3);
    let emptied = outcomes[1].as_ref().unwrap();
    assert_eq!(emptied.id, "bad");
    assert!(emptied.is_empty());
    assert_eq!(emptied.decision, Decision::Trim(TrimRange::empty()));
    assert_eq!(stats.emptied, 1);
    assert_eq!(stats.processed, 3);
}

#[test]
fn invalid_configuration_fails_before_processing() {
    let config = RunConfig {
        window_size: 0,
        ..RunConfig::default()
    };
    let records = vec![Record::new("r", b"A".to_vec(), vec![0.9])];
    assert!(process_records(records, &config).is_err());
}
