use fitrace::pipeline::process_batch;
use fitrace::utils::config::FormatOptions;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn write_trace(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn test_end_to_end_two_file_batch() {
    let batch = tempfile::tempdir().unwrap();

    write_trace(
        batch.path(),
        "llfi.stat.trace1-0.txt",
        "Mapping: 0 111\n\
         1,0,0,load,01-1-aa,02-2-bb\n",
    );
    // A call wide enough to force four generated operand columns
    write_trace(
        batch.path(),
        "llfi.stat.trace2-0.txt",
        "5,0,0,call-foo-d,00-1-aa,01-2-bb,02-3-cc,03-4-dd,04-5-ee\n",
    );

    let summary = process_batch(batch.path(), &FormatOptions::default()).unwrap();
    assert_eq!(summary.traces, 2);
    assert_eq!(summary.operand_width, 4);

    // Both tables share the batch-wide header
    let table1 = fs::read_to_string(batch.path().join("trace1-0/llfi.stat.trace1-0")).unwrap();
    let mut rows = table1.lines();
    assert_eq!(
        rows.next().unwrap(),
        "Timestamp,TID,IID,OPName,Value,Operand-0,Operand-1,Operand-2,Operand-3"
    );
    // The narrow load row is padded out to the header width
    assert_eq!(rows.next().unwrap(), "1,0,0,load,01-1-aa,02-2-bb,,,");
    assert_eq!(rows.next(), None);

    let table2 = fs::read_to_string(batch.path().join("trace2-0/llfi.stat.trace2-0")).unwrap();
    for row in table2.lines() {
        assert_eq!(row.split(',').count(), 9);
    }

    // The mapping metadata was extracted, stripped, and aggregated
    assert_eq!(
        fs::read_to_string(batch.path().join("trace_linear/mapping")).unwrap(),
        "0 111\n"
    );
    // ...and copied back so each trace directory is self-contained
    assert_eq!(
        fs::read_to_string(batch.path().join("trace1-0/mapping")).unwrap(),
        "0 111\n"
    );

    // Logical mapping is identical everywhere
    let index = "1,0\n2,0\n";
    for dir in ["trace_linear", "trace1-0", "trace2-0"] {
        assert_eq!(
            fs::read_to_string(batch.path().join(dir).join("logical_mapping")).unwrap(),
            index
        );
    }
}

#[test]
fn test_width_is_max_over_all_files() {
    let batch = tempfile::tempdir().unwrap();

    // Per-file operand-column maxima: 2, 5, 3
    write_trace(
        batch.path(),
        "llfi.stat.trace1.txt",
        "1,0,0,store,00-1-aa,01-2-bb,02-3-cc\n",
    );
    write_trace(
        batch.path(),
        "llfi.stat.trace2.txt",
        "2,0,0,call-f-d,00-1-aa,01-2-bb,02-3-cc,03-4-dd,04-5-ee,05-6-ff\n",
    );
    write_trace(
        batch.path(),
        "llfi.stat.trace3.txt",
        "3,0,0,br,00-1-aa,01-2-bb,02-3-cc,03-4-dd\n",
    );

    let summary = process_batch(batch.path(), &FormatOptions::default()).unwrap();
    assert_eq!(summary.operand_width, 5);

    // Every table in the batch is exactly ten columns wide
    for name in ["trace1", "trace2", "trace3"] {
        let table =
            fs::read_to_string(batch.path().join(name).join(format!("llfi.stat.{name}"))).unwrap();
        for row in table.lines() {
            assert_eq!(row.split(',').count(), 10, "row `{row}` in {name}");
        }
    }
}

#[test]
fn test_call_echoes_and_metadata_never_reach_the_table() {
    let batch = tempfile::tempdir().unwrap();

    write_trace(
        batch.path(),
        "llfi.stat.trace7.txt",
        "GlobalVariables: counter 4 1000\n\
         FAULT: bit 3 cycle 42\n\
         1,0,0,call-foo-d,00-1-aa\n\
         2,0,9,call-foo-d,00-1-aa\n\
         3,0,0,ret-i32,00-2-bb\n",
    );

    process_batch(batch.path(), &FormatOptions::default()).unwrap();

    let table = fs::read_to_string(batch.path().join("trace7/llfi.stat.trace7")).unwrap();
    let rows: Vec<&str> = table.lines().collect();
    assert_eq!(rows.len(), 3); // header + entry call + ret
    assert!(rows.iter().all(|r| !r.starts_with("2,0,9")));
    assert!(rows.iter().all(|r| !r.contains("GlobalVariables")));

    assert_eq!(
        fs::read_to_string(batch.path().join("trace_linear/globals")).unwrap(),
        "counter 4 1000\n"
    );
    assert_eq!(
        fs::read_to_string(batch.path().join("trace_linear/faultinj")).unwrap(),
        "bit 3 cycle 42\n"
    );
}

#[test]
fn test_malformed_records_are_dropped_not_fatal() {
    let batch = tempfile::tempdir().unwrap();

    write_trace(
        batch.path(),
        "llfi.stat.trace4.txt",
        "1,0,0,load,01-1-aa\n\
         corrupted noise\n\
         2,0,0,load,01-1-aa,02-2-bb\n",
    );

    let summary = process_batch(batch.path(), &FormatOptions::default()).unwrap();
    assert_eq!(summary.traces, 1);

    let table = fs::read_to_string(batch.path().join("trace4/llfi.stat.trace4")).unwrap();
    let rows: Vec<&str> = table.lines().collect();
    assert_eq!(rows.len(), 2); // header + the one valid load
    assert_eq!(rows[1], "2,0,0,load,01-1-aa,02-2-bb");
}

#[test]
fn test_rerun_does_not_duplicate_aggregates() {
    let batch = tempfile::tempdir().unwrap();

    write_trace(
        batch.path(),
        "llfi.stat.trace5.txt",
        "Mapping: 0 55\n\
         1,0,0,ret-i32,00-1-aa\n",
    );

    process_batch(batch.path(), &FormatOptions::default()).unwrap();
    process_batch(batch.path(), &FormatOptions::default()).unwrap();

    // Aggregates are rebuilt fresh per run, never appended to
    assert_eq!(
        fs::read_to_string(batch.path().join("trace_linear/mapping")).unwrap(),
        "0 55\n"
    );
    assert_eq!(
        fs::read_to_string(batch.path().join("trace_linear/logical_mapping")).unwrap(),
        "5\n"
    );
}

#[test]
fn test_preserve_call_index_mode() {
    let batch = tempfile::tempdir().unwrap();

    write_trace(
        batch.path(),
        "llfi.stat.trace6.txt",
        "10,0,0,call-foo-d,00-1-aa\n\
         20,0,7,call-foo-d,00-9-ff\n",
    );

    let options = FormatOptions {
        preserve_call_index: true,
        ..FormatOptions::default()
    };
    process_batch(batch.path(), &options).unwrap();

    let table = fs::read_to_string(batch.path().join("trace6/llfi.stat.trace6")).unwrap();
    let rows: Vec<&str> = table.lines().collect();
    assert_eq!(rows.len(), 2);
    // Entry timestamp, echo instance index
    assert_eq!(rows[1], "10,0,7,call-foo-d,00-9-ff");
}
