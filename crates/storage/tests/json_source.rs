use std::io::Write;

use storage::{JsonFileSource, QuestionSource, StorageError};

fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

#[tokio::test]
async fn loads_questions_from_absolute_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "questions.json",
        r#"[{"id":"a","text":"Что такое корутина?"},{"id":"b","text":"Что делает by lazy?"}]"#,
    );

    let bank = JsonFileSource::new(path).load().await.unwrap();
    let ids: Vec<_> = bank.iter().map(|q| q.id().as_str().to_owned()).collect();
    assert_eq!(ids, ["a", "b"]);
}

#[tokio::test]
async fn resolves_relative_path_against_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("bank")).unwrap();
    write_file(&dir, "bank/q.json", r#"[{"id":"only","text":"Q"}]"#);

    let bank = JsonFileSource::new("bank/q.json")
        .with_base_dir(dir.path())
        .load()
        .await
        .unwrap();
    assert_eq!(bank.len(), 1);
}

#[tokio::test]
async fn missing_file_reports_configured_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonFileSource::new("does/not/exist.json")
        .with_base_dir(dir.path())
        .load()
        .await
        .unwrap_err();

    match err {
        StorageError::NotFound { path } => assert_eq!(path.to_str(), Some("does/not/exist.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn duplicate_ids_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "dup.json",
        r#"[{"id":"a","text":"one"},{"id":"a","text":"two"}]"#,
    );

    let err = JsonFileSource::new(path).load().await.unwrap_err();
    assert!(matches!(err, StorageError::Bank(_)));
}
