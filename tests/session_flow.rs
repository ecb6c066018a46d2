// End-to-end flows across ingestion, the progress store, and the session
// state machine, using a temp directory for the backing file.

use typedrill::ingest;
use typedrill::session::{Action, Session, Status};
use typedrill::store::ProgressDb;

use std::fs;
use tempfile::tempdir;

fn write_doc(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn ingest_practice_resume_complete() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("progress.json");
    let doc_path = write_doc(
        &dir,
        "book.txt",
        "the quick brown fox\njumps over the dog\nand keeps on running\n",
    );

    let lines = ingest::extract_lines(&doc_path).unwrap();
    assert_eq!(lines.len(), 3);

    // first sitting: one perfect line, then stop
    {
        let mut db = ProgressDb::with_path(&db_path);
        db.add_file("book.txt", lines.len()).unwrap();

        let mut session = Session::start_or_resume(&db, "book.txt", lines.clone());
        assert_eq!(session.status(), Status::InProgress);

        session
            .submit(&mut db, "the quick brown fox", Action::Advance)
            .unwrap();
        let status = session.submit(&mut db, "", Action::Stop).unwrap();
        assert_eq!(status, Status::Stopped);
    }

    // second sitting: a fresh process reloads the file and resumes
    {
        let mut db = ProgressDb::with_path(&db_path);
        // re-ingesting must not clobber progress
        db.add_file("book.txt", lines.len()).unwrap();

        let mut session = Session::start_or_resume(&db, "book.txt", lines.clone());
        assert_eq!(session.current_index(), 1);

        session
            .submit(&mut db, "jumps over the dog", Action::Advance)
            .unwrap();
        let status = session
            .submit(&mut db, "and keeps on running", Action::Advance)
            .unwrap();
        assert_eq!(status, Status::Complete);

        let summary = session.summary();
        assert_eq!(summary.typed_lines, 3);
        assert_eq!(summary.total_lines, 3);
        // line 1 scored twice (a stop and a perfect retake), lines 2 and 3
        // perfect once each: sum = 100 + 0 + 100 + 100 over 3 lines
        assert!((summary.final_score - 100.0).abs() < 1e-9);

        let record = db.get_file_info("book.txt").unwrap();
        assert_eq!(record.current_index, 3);
        assert!(record.last_practiced.is_some());
    }
}

#[test]
fn mistakes_accumulate_across_sittings_and_rank_in_summary() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("progress.json");
    let lines = vec!["seaside".to_string(), "seabird".to_string()];

    let mut db = ProgressDb::with_path(&db_path);
    db.add_file("words.txt", lines.len()).unwrap();

    let mut session = Session::start_or_resume(&db, "words.txt", lines.clone());
    // 'a' typed as 'e' once, final 'e' typed as 'r' once
    session.submit(&mut db, "seesidr", Action::Advance).unwrap();
    drop(session);

    let mut db = ProgressDb::with_path(&db_path);
    let mut session = Session::start_or_resume(&db, "words.txt", lines);
    // 'a' typed as 'e' again
    session.submit(&mut db, "seebird", Action::Advance).unwrap();

    let summary = session.summary();
    assert_eq!(summary.ranked_mistakes[0].expected, 'a');
    assert_eq!(summary.ranked_mistakes[0].typed, 'e');
    assert_eq!(summary.ranked_mistakes[0].count, 2);
    assert_eq!(summary.ranked_mistakes[1].count, 1);
}

#[test]
fn resumes_from_a_file_written_by_an_older_version() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("progress.json");
    fs::write(
        &db_path,
        br#"{
            "legacy.txt": {
                "current_index": 2,
                "total_lines": 3,
                "score": 50.0,
                "mistakes": [{"expected": "o", "typed": "0"}, "o|0"]
            }
        }"#,
    )
    .unwrap();

    let mut db = ProgressDb::with_path(&db_path);
    let lines = vec![
        "first line of text".to_string(),
        "second line of text".to_string(),
        "third line of text".to_string(),
    ];
    let mut session = Session::start_or_resume(&db, "legacy.txt", lines.clone());

    // sum reconstructed from the stored average
    assert_eq!(session.average_score(), 50.0);
    assert_eq!(session.current_index(), 2);

    let status = session
        .submit(&mut db, "third line of text", Action::Advance)
        .unwrap();
    assert_eq!(status, Status::Complete);

    let summary = session.summary();
    // both legacy shapes decoded into the same pair
    assert_eq!(summary.ranked_mistakes.len(), 1);
    assert_eq!(summary.ranked_mistakes[0].count, 2);
    assert!((summary.final_score - (200.0 / 3.0)).abs() < 1e-9);

    // the rewrite normalizes everything to the flat format
    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&db_path).unwrap()).unwrap();
    assert_eq!(raw["legacy.txt"]["mistakes"][0], "o|0");
    assert_eq!(raw["legacy.txt"]["mistakes"][1], "o|0");
    assert_eq!(raw["legacy.txt"]["total_score"], 200.0);
}

#[test]
fn corrupt_progress_file_starts_over_but_still_practices() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("progress.json");
    fs::write(&db_path, b"\x00\x01 definitely not json").unwrap();

    let mut db = ProgressDb::with_path(&db_path);
    assert!(db.get_all_files().is_empty());

    let lines = vec!["still works fine".to_string()];
    db.add_file("doc.txt", lines.len()).unwrap();
    let mut session = Session::start_or_resume(&db, "doc.txt", lines);
    let status = session
        .submit(&mut db, "still works fine", Action::Advance)
        .unwrap();
    assert_eq!(status, Status::Complete);
}
