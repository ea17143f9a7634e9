//! Integration test: file parsing and schema summaries

use svrlab::data::{read_table, DatasetSummary, PREVIEW_ROWS};
use svrlab::error::SvrlabError;

#[test]
fn test_csv_roundtrip_shape() {
    let csv = b"name,score\nalice,1.5\nbob,2.5\ncarol,3.5\n";
    let df = read_table(csv, "scores.csv").unwrap();
    assert_eq!(df.height(), 3);
    assert_eq!(df.width(), 2);
}

#[test]
fn test_missing_values_counted_per_column() {
    // Known null placement: two holes in `a`, one in `b`, none in `c`
    let csv = b"a,b,c\n1,2.0,x\n,3.0,y\n4,,z\n,5.0,w\n";
    let df = read_table(csv, "holes.csv").unwrap();
    let summary = DatasetSummary::describe(&df, "holes.csv");

    assert_eq!(summary.missing_values["a"], 2);
    assert_eq!(summary.missing_values["b"], 1);
    assert_eq!(summary.missing_values["c"], 0);
}

#[test]
fn test_preview_is_bounded() {
    let mut csv = String::from("v\n");
    for i in 0..50 {
        csv.push_str(&format!("{}\n", i));
    }
    let df = read_table(csv.as_bytes(), "long.csv").unwrap();
    let summary = DatasetSummary::describe(&df, "long.csv");
    assert_eq!(summary.preview.len(), PREVIEW_ROWS);
}

#[test]
fn test_preview_shorter_than_bound() {
    let df = read_table(b"v\n1\n2\n", "short.csv").unwrap();
    let summary = DatasetSummary::describe(&df, "short.csv");
    assert_eq!(summary.preview.len(), 2);
}

#[test]
fn test_dtype_labels_are_language_neutral() {
    let csv = b"i,f,s\n1,1.5,hello\n2,2.5,world\n";
    let df = read_table(csv, "typed.csv").unwrap();
    let summary = DatasetSummary::describe(&df, "typed.csv");

    assert_eq!(summary.dtypes["i"], "integer");
    assert_eq!(summary.dtypes["f"], "float");
    assert_eq!(summary.dtypes["s"], "string");
}

#[test]
fn test_unrecognized_extension_never_yields_schema() {
    for name in ["data.json", "data.parquet", "data.tsv", "data"] {
        let err = read_table(b"a,b\n1,2\n", name).unwrap_err();
        assert!(
            matches!(err, SvrlabError::UnsupportedFormat(_)),
            "{} must be rejected",
            name
        );
    }
}

#[test]
fn test_empty_and_header_only_files() {
    assert!(matches!(
        read_table(b"", "e.csv").unwrap_err(),
        SvrlabError::EmptyDataset
    ));
    assert!(matches!(
        read_table(b"a,b\n", "h.csv").unwrap_err(),
        SvrlabError::EmptyDataset
    ));
}

#[test]
fn test_summary_column_count_invariant() {
    let df = read_table(b"a,b,c\n1,2,3\n", "abc.csv").unwrap();
    let summary = DatasetSummary::describe(&df, "abc.csv");
    assert_eq!(summary.columns.len(), summary.shape.1);
    assert_eq!(summary.dtypes.len(), summary.columns.len());
    assert_eq!(summary.missing_values.len(), summary.columns.len());
}
