//! Filesystem tests for the export writer.

#![allow(clippy::unwrap_used)]

use ddlscribe_core::{ObjectKind, SqlObject};
use ddlscribe_export::writer::DdlWriter;
use tokio_util::sync::CancellationToken;

fn sample_objects() -> Vec<SqlObject> {
    vec![
        SqlObject::new(
            "app",
            "Users",
            ObjectKind::Table,
            "CREATE TABLE [app].[Users]\r\n(\r\n\t [Id] INT NOT NULL\r\n)",
        ),
        SqlObject::new(
            "app",
            "Orders",
            ObjectKind::Table,
            "CREATE TABLE [app].[Orders] ([Id] INT NOT NULL)",
        ),
    ]
}

#[tokio::test]
async fn test_writes_one_file_per_object_under_category_directory() {
    let temp = tempfile::tempdir().unwrap();
    let writer = DdlWriter::new(temp.path(), "localhost", "appdb", false);
    let cancel = CancellationToken::new();

    let written = writer
        .write_category(ObjectKind::Table, &sample_objects(), &cancel)
        .await
        .unwrap();

    assert_eq!(written, 2);
    let tables = temp.path().join("localhost").join("appdb").join("tables");
    assert!(tables.join("Users.sql").is_file());
    assert!(tables.join("Orders.sql").is_file());
}

#[tokio::test]
async fn test_written_content_is_normalized_without_header() {
    let temp = tempfile::tempdir().unwrap();
    let writer = DdlWriter::new(temp.path(), "localhost", "appdb", false);
    let cancel = CancellationToken::new();

    writer
        .write_category(ObjectKind::Table, &sample_objects(), &cancel)
        .await
        .unwrap();

    let content = tokio::fs::read_to_string(writer.root().join("tables").join("Users.sql"))
        .await
        .unwrap();
    assert_eq!(
        content,
        "CREATE TABLE [app].[Users]\n(\n\t [Id] INT NOT NULL\n)\n"
    );
}

#[tokio::test]
async fn test_written_content_carries_header_block() {
    let temp = tempfile::tempdir().unwrap();
    let writer = DdlWriter::new(temp.path(), "localhost", "appdb", true);
    let cancel = CancellationToken::new();

    writer
        .write_category(ObjectKind::Table, &sample_objects(), &cancel)
        .await
        .unwrap();

    let content = tokio::fs::read_to_string(writer.root().join("tables").join("Users.sql"))
        .await
        .unwrap();
    assert!(content.starts_with("/*\n"));
    assert!(content.contains("Schema: app\n"));
    assert!(content.contains("Type: TABLE\n"));
    assert!(content.contains("ObjectName: Users\n"));
    assert!(content.contains("Execution: "));
    assert!(content.ends_with(")\n"));
}

#[tokio::test]
async fn test_empty_category_creates_no_directory() {
    let temp = tempfile::tempdir().unwrap();
    let writer = DdlWriter::new(temp.path(), "localhost", "appdb", false);
    let cancel = CancellationToken::new();

    let written = writer
        .write_category(ObjectKind::View, &[], &cancel)
        .await
        .unwrap();

    assert_eq!(written, 0);
    assert!(!writer.root().join("views").exists());
    // the server/database root is not created either
    assert!(!temp.path().join("localhost").exists());
}

#[tokio::test]
async fn test_rerun_overwrites_existing_files() {
    let temp = tempfile::tempdir().unwrap();
    let writer = DdlWriter::new(temp.path(), "localhost", "appdb", false);
    let cancel = CancellationToken::new();

    let first = vec![SqlObject::new("app", "V1", ObjectKind::View, "SELECT 1")];
    let second = vec![SqlObject::new("app", "V1", ObjectKind::View, "SELECT 2")];

    writer
        .write_category(ObjectKind::View, &first, &cancel)
        .await
        .unwrap();
    writer
        .write_category(ObjectKind::View, &second, &cancel)
        .await
        .unwrap();

    let content = tokio::fs::read_to_string(writer.root().join("views").join("V1.sql"))
        .await
        .unwrap();
    assert_eq!(content, "SELECT 2\n");
}

#[tokio::test]
async fn test_cancelled_token_writes_nothing() {
    let temp = tempfile::tempdir().unwrap();
    let writer = DdlWriter::new(temp.path(), "localhost", "appdb", false);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let error = writer
        .write_category(ObjectKind::Table, &sample_objects(), &cancel)
        .await
        .unwrap_err();

    assert!(error.is_cancelled());
    assert!(!writer.root().exists());
}

#[tokio::test]
async fn test_unwritable_root_is_io_error_with_path_context() {
    let temp = tempfile::tempdir().unwrap();
    // a regular file where a directory is needed
    let blocker = temp.path().join("blocked");
    tokio::fs::write(&blocker, b"not a directory").await.unwrap();

    let writer = DdlWriter::new(&blocker, "localhost", "appdb", false);
    let cancel = CancellationToken::new();

    let error = writer
        .write_category(ObjectKind::Table, &sample_objects(), &cancel)
        .await
        .unwrap_err();

    let detailed = error.format_detailed();
    assert!(detailed.contains("failed to create directory"));
    assert!(detailed.contains("tables"));
}
