//! Integration tests for the feedback log.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use chrono::NaiveDateTime;
use loan_feedback::{COLUMNS, FeedbackError, FeedbackLog};
use loan_model::{AccuracyOpinion, FeedbackEntry, Rating, TIMESTAMP_FORMAT, Verdict};
use tempfile::TempDir;

fn entry(user: &str, rating: i64) -> FeedbackEntry {
    FeedbackEntry {
        timestamp: NaiveDateTime::parse_from_str("2026-10-17 09:30:00", TIMESTAMP_FORMAT)
            .unwrap(),
        user: user.to_string(),
        income: 75_000.0,
        loan_amount: 500_000.0,
        prediction: Verdict::Approved,
        model_confidence: Some(0.875),
        rating: Rating::new(rating).unwrap(),
        opinion: AccuracyOpinion::Yes,
        suggestion: String::new(),
    }
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path).unwrap().lines().count()
}

#[test]
fn first_append_creates_header() {
    let dir = TempDir::new().unwrap();
    let log = FeedbackLog::new(dir.path().join("feedback_results.csv"));
    assert!(!log.exists());

    log.append(&entry("Ayesha", 5)).unwrap();
    let text = fs::read_to_string(log.path()).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(COLUMNS.join(",").as_str()));
    assert_eq!(
        lines.next(),
        Some(r#""2026-10-17 09:30:00","Ayesha",75000,500000,"Approved",0.875,5,"Yes","""#)
    );
    assert_eq!(lines.next(), None);

    log.append(&entry("Bilal", 4)).unwrap();
    assert_eq!(line_count(log.path()), 3);
}

#[test]
fn appends_are_read_back_in_order() {
    let dir = TempDir::new().unwrap();
    let log = FeedbackLog::new(dir.path().join("log.csv"));
    let written: Vec<_> = (1..=5).map(|i| entry(&format!("user-{i}"), i)).collect();
    for item in &written {
        log.append(item).unwrap();
    }

    let snapshot = log.read_all().unwrap();
    assert!(snapshot.exists);
    assert!(snapshot.skipped.is_empty());
    assert_eq!(snapshot.entries, written);
}

#[test]
fn append_leaves_existing_bytes_untouched() {
    let dir = TempDir::new().unwrap();
    let log = FeedbackLog::new(dir.path().join("log.csv"));
    log.append(&entry("first", 3)).unwrap();
    let before = fs::read(log.path()).unwrap();

    log.append(&entry("second", 2)).unwrap();
    let after = fs::read(log.path()).unwrap();
    assert!(after.starts_with(&before));
}

#[test]
fn suggestion_with_delimiters_survives() {
    let dir = TempDir::new().unwrap();
    let log = FeedbackLog::new(dir.path().join("log.csv"));
    let mut tricky = entry("O'Neil, Jr.", 4);
    tricky.suggestion = "Faster, please.\nAlso \"dark mode\"".to_string();
    log.append(&tricky).unwrap();
    log.append(&entry("next", 1)).unwrap();

    let snapshot = log.read_all().unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.entries[0], tricky);
    assert_eq!(snapshot.entries[1].user, "next");
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let log = FeedbackLog::new(dir.path().join("absent.csv"));
    let snapshot = log.read_all().unwrap();
    assert!(!snapshot.exists);
    assert!(snapshot.is_empty());

    let nested = FeedbackLog::new(dir.path().join("no/such/dir/log.csv"));
    assert!(!nested.read_all().unwrap().exists);
}

#[test]
fn malformed_rows_are_skipped_with_line_numbers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    fs::write(
        &path,
        format!(
            "{}\n\
             \"2026-10-17 09:30:00\",\"A\",1000,2000,\"Approved\",0.9,5,\"Yes\",\"\"\n\
             \"not a date\",\"B\",1000,2000,\"Approved\",0.9,5,\"Yes\",\"\"\n\
             \"2026-10-17 09:31:00\",\"C\",1000\n\
             \"2026-10-17 09:32:00\",\"D\",1000,2000,\"Rejected\",,9,\"No\",\"\"\n\
             \"2026-10-17 09:33:00\",\"E\",1000,2000,\"Rejected\",,3,\"Maybe\",\"ok\"\n",
            COLUMNS.join(",")
        ),
    )
    .unwrap();

    let snapshot = FeedbackLog::new(&path).read_all().unwrap();
    let users: Vec<_> = snapshot.entries.iter().map(|e| e.user.as_str()).collect();
    assert_eq!(users, ["A", "E"]);
    let lines: Vec<_> = snapshot.skipped.iter().map(|s| s.line).collect();
    assert_eq!(lines, [3, 4, 5]);
    assert!(snapshot.skipped[0].reason.starts_with("Timestamp"));
    assert!(snapshot.skipped[1].reason.contains("expected 9 fields"));
    assert!(snapshot.skipped[2].reason.starts_with("Rating"));
}

#[test]
fn legacy_layout_is_readable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    fs::write(
        &path,
        "Timestamp,User,Income,Loan_Amount,Prediction,Rating,Accuracy_Opinion,Suggestions\n\
         2025-05-01 10:00:00,Sara,90000,1500000,Loan Approval: REJECTED ❌,2,No,\n",
    )
    .unwrap();

    let snapshot = FeedbackLog::new(&path).read_all().unwrap();
    assert_eq!(snapshot.len(), 1);
    let sara = &snapshot.entries[0];
    assert_eq!(sara.prediction, Verdict::Rejected);
    assert_eq!(sara.model_confidence, None);
    assert_eq!(sara.rating.get(), 2);
}

#[test]
fn append_refuses_other_layouts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    let legacy = "Timestamp,User,Income,Loan_Amount,Prediction,Rating,Accuracy_Opinion,Suggestions\n\
                  2025-05-01 10:00:00,Sara,90000,1500000,Loan Approval: REJECTED ❌,2,No,\n";
    fs::write(&path, legacy).unwrap();
    let log = FeedbackLog::new(&path);

    let err = log.append(&entry("late", 4)).unwrap_err();
    assert!(matches!(err, FeedbackError::HeaderMismatch { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), legacy);

    // A rewrite upgrades the file, after which appends work.
    let entries = log.read_all().unwrap().entries;
    log.rewrite(&entries).unwrap();
    log.append(&entry("late", 4)).unwrap();
    let snapshot = log.read_all().unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.entries[0].model_confidence, None);
}

#[test]
fn unknown_header_fails_the_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    fs::write(&path, "garbage,header\n1,2\n").unwrap();

    let err = FeedbackLog::new(&path).read_all().unwrap_err();
    match &err {
        FeedbackError::HeaderMismatch { found, .. } => assert_eq!(found, &["garbage", "header"]),
        other => panic!("expected HeaderMismatch, got {other:?}"),
    }
    assert!(err.user_message().contains("(garbage, header)"));
    assert!(err.suggestion().unwrap().contains("reset"));
}

#[test]
fn rewrite_round_trips() {
    let dir = TempDir::new().unwrap();
    let log = FeedbackLog::new(dir.path().join("log.csv"));
    for i in 1..=3 {
        log.append(&entry(&format!("u{i}"), i)).unwrap();
    }

    let mut entries = log.read_all().unwrap().entries;
    entries.remove(1);
    entries[0].opinion = AccuracyOpinion::Maybe;
    entries[1].model_confidence = None;
    log.rewrite(&entries).unwrap();

    assert_eq!(log.read_all().unwrap().entries, entries);
    assert!(!dir.path().join("log.csv.tmp").exists());
}

#[test]
fn rewrite_with_no_entries_keeps_header() {
    let dir = TempDir::new().unwrap();
    let log = FeedbackLog::new(dir.path().join("log.csv"));
    log.append(&entry("a", 1)).unwrap();
    log.rewrite(&[]).unwrap();

    let snapshot = log.read_all().unwrap();
    assert!(snapshot.exists);
    assert!(snapshot.is_empty());
    assert_eq!(line_count(log.path()), 1);
}

#[test]
fn reset_on_corrupted_file_then_append_recreates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    fs::write(&path, [0xff, 0xfe, 0x00, b'\n', b'x']).unwrap();
    let log = FeedbackLog::new(&path);
    assert!(log.read_all().is_err());

    assert!(log.reset().unwrap());
    assert!(!log.exists());
    assert!(!log.reset().unwrap());

    log.append(&entry("fresh", 5)).unwrap();
    let snapshot = log.read_all().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.skipped.is_empty());
}

#[test]
fn append_repairs_missing_trailing_newline() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.csv");
    fs::write(&path, COLUMNS.join(",")).unwrap();
    let log = FeedbackLog::new(&path);

    log.append(&entry("a", 3)).unwrap();
    assert_eq!(log.read_all().unwrap().len(), 1);
}

#[test]
fn export_copies_bytes_verbatim() {
    let dir = TempDir::new().unwrap();
    let log = FeedbackLog::new(dir.path().join("log.csv"));
    assert!(matches!(
        log.export(&mut Vec::new()),
        Err(FeedbackError::NotFound { .. })
    ));

    log.append(&entry("a", 3)).unwrap();
    let mut out = Vec::new();
    let copied = log.export(&mut out).unwrap();
    assert_eq!(copied, out.len() as u64);
    assert_eq!(out, fs::read(log.path()).unwrap());
}

#[test]
fn concurrent_appends_do_not_interleave() {
    let dir = TempDir::new().unwrap();
    let log = Arc::new(FeedbackLog::new(dir.path().join("log.csv")));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let log = Arc::clone(&log);
            thread::spawn(move || {
                for i in 0..10 {
                    let mut item = entry(&format!("t{t}-{i}"), 1 + (i % 5));
                    item.suggestion = "x".repeat(512);
                    log.append(&item).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = log.read_all().unwrap();
    assert_eq!(snapshot.len(), 80);
    assert!(snapshot.skipped.is_empty());
}
