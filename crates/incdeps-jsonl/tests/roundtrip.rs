//! Integration tests for read/write round-trip operations.
//!
//! These tests verify that data written with `JsonlWriter` or the atomic
//! helpers is read back unchanged by `JsonlReader`.

use incdeps_jsonl::{Error, JsonlReader, JsonlWriter, read_jsonl, write_jsonl_atomic};
use rstest::rstest;
use serde::{Deserialize, Serialize};
use std::io::Cursor;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct NodeRecord {
    file: String,
    includes: Vec<usize>,
    used_by: Vec<usize>,
}

fn node(file: &str, includes: &[usize], used_by: &[usize]) -> NodeRecord {
    NodeRecord {
        file: file.to_string(),
        includes: includes.to_vec(),
        used_by: used_by.to_vec(),
    }
}

/// Write all records to an in-memory buffer and read them back.
async fn roundtrip(records: &[NodeRecord]) -> Vec<NodeRecord> {
    let mut writer = JsonlWriter::new(Cursor::new(Vec::new()));
    writer.write_all(records).await.unwrap();
    writer.flush().await.unwrap();

    let data = writer.into_inner().into_inner().into_inner();
    JsonlReader::new(Cursor::new(data)).read_all().await.unwrap()
}

#[rstest]
#[case::single(vec![node("a.h", &[], &[])])]
#[case::chain(vec![node("a.h", &[], &[1]), node("b.h", &[0], &[2]), node("c.cpp", &[1], &[])])]
#[case::duplicate_edges(vec![node("a.h", &[], &[1, 1]), node("b.c", &[0, 0], &[])])]
#[case::special_chars(vec![node("dir with space/quote\"d.h", &[], &[])])]
#[case::unicode(vec![node("src/\u{4e16}\u{754c}.hpp", &[], &[])])]
#[case::empty(vec![])]
#[tokio::test]
async fn roundtrip_preserves_records_and_order(#[case] original: Vec<NodeRecord>) {
    let read_back = roundtrip(&original).await;
    assert_eq!(original, read_back);
}

#[tokio::test]
async fn atomic_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.jsonl");
    let records = vec![node("a.h", &[], &[1]), node("b.h", &[0], &[])];

    write_jsonl_atomic(&path, &records).await.unwrap();
    let read_back: Vec<NodeRecord> = read_jsonl(&path).await.unwrap();

    assert_eq!(records, read_back);
}

#[tokio::test]
async fn read_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let result = read_jsonl::<NodeRecord, _>(dir.path().join("absent.jsonl")).await;

    assert!(matches!(result, Err(Error::Io(_))));
}

#[tokio::test]
async fn record_with_wrong_shape_is_parse_error() {
    let data = b"{\"file\":\"a.h\",\"includes\":[],\"used_by\":[]}\n{\"file\":3}\n".to_vec();

    let result = JsonlReader::new(Cursor::new(data))
        .read_all::<NodeRecord>()
        .await;

    match result {
        Err(Error::Parse { line_number, .. }) => assert_eq!(line_number, 2),
        other => panic!("expected parse error, got {other:?}"),
    }
}
