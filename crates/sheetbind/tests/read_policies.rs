//! End-to-end tests for binding, coercion errors and row policies

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use sheetbind::prelude::*;

/// Write raw text rows to an in-memory XLSX file
fn sheet_bytes(rows: &[Vec<&str>]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_rows_to_writer(&mut buf, rows).unwrap();
    buf
}

#[derive(Debug, Default, PartialEq, Record)]
struct Named {
    #[sheet(excel = "Name1")]
    name1: String,
}

/// Test whitespace trimming of string cells
#[test]
fn test_trim_space() {
    let buf = sheet_bytes(&[vec!["Name1"], vec!["  x  "]]);

    let trimmed = ReadOptions {
        trim_space: true,
        ..Default::default()
    };
    let read: Vec<Named> = read_from_bytes(&buf, &trimmed, &[]).unwrap();
    assert_eq!(read[0].name1, "x");

    let verbatim: Vec<Named> = read_from_bytes(&buf, &ReadOptions::default(), &[]).unwrap();
    assert_eq!(verbatim[0].name1, "  x  ");
}

/// Test header columns without a matching field
#[test]
fn test_unknown_columns() {
    let buf = sheet_bytes(&[vec!["Name1", "Name2"], vec!["a", "b"]]);

    let strict = ReadOptions {
        skip_unknown_columns: false,
        ..Default::default()
    };
    let err = read_from_bytes::<Named>(&buf, &strict, &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "no destination field with matching tag for column \"Name2\" at index 1"
    );

    let lenient = ReadOptions {
        skip_unknown_columns: true,
        ..Default::default()
    };
    let read: Vec<Named> = read_from_bytes(&buf, &lenient, &[]).unwrap();
    assert_eq!(read, vec![Named { name1: "a".into() }]);
}

#[derive(Debug, Default, PartialEq, Record)]
struct Unsigned {
    #[sheet(excel = "Value")]
    value: u32,
}

/// Test negative values into unsigned fields
#[test]
fn test_unsigned_field() {
    let buf = sheet_bytes(&[vec!["Value"], vec!["-123"]]);
    let err = read_from_bytes::<Unsigned>(&buf, &ReadOptions::default(), &[]).unwrap_err();
    let field_error = err.as_field_error().unwrap();
    assert!(matches!(field_error.cause(), CoerceError::NegativeUnsigned));

    let buf = sheet_bytes(&[vec!["Value"], vec!["123"]]);
    let read: Vec<Unsigned> = read_from_bytes(&buf, &ReadOptions::default(), &[]).unwrap();
    assert_eq!(read, vec![Unsigned { value: 123 }]);
}

/// Test values too large for the field width
#[test]
fn test_integer_overflow() {
    #[derive(Debug, Default, Record)]
    struct Small {
        #[sheet(excel = "Value")]
        value: i8,
    }

    let buf = sheet_bytes(&[vec!["Value"], vec!["128"]]);
    let err = read_from_bytes::<Small>(&buf, &ReadOptions::default(), &[]).unwrap_err();
    assert!(matches!(
        err.as_field_error().unwrap().cause(),
        CoerceError::Overflow
    ));

    let buf = sheet_bytes(&[vec!["Value"], vec!["127"]]);
    let read: Vec<Small> = read_from_bytes(&buf, &ReadOptions::default(), &[]).unwrap();
    assert_eq!(read[0].value, 127);
}

/// Three consecutive rows that all fail to coerce
fn three_bad_rows() -> Vec<u8> {
    sheet_bytes(&[
        vec!["Value"],
        vec!["-1"],
        vec!["-2"],
        vec!["-3"],
    ])
}

/// Test collect mode stops at the configured limit
#[test]
fn test_collect_with_limit() {
    let options = ReadOptions {
        error_handling: ErrorHandling::Collect,
        max_unmarshal_errors: 2,
        ..Default::default()
    };
    let err = read_from_bytes::<Unsigned>(&three_bad_rows(), &options, &[]).unwrap_err();
    let content = err.as_content_error().unwrap();
    assert_eq!(content.errors().len(), 2);
    assert!(content.limit_reached);
    assert_eq!(err.to_string(), "too many (2) errors reading data from Excel");
}

/// Test collect mode without a limit reports every error
#[test]
fn test_collect_unlimited() {
    let options = ReadOptions {
        error_handling: ErrorHandling::Collect,
        max_unmarshal_errors: 0,
        ..Default::default()
    };
    let err = read_from_bytes::<Unsigned>(&three_bad_rows(), &options, &[]).unwrap_err();
    let content = err.as_content_error().unwrap();
    assert_eq!(content.errors().len(), 3);
    assert!(!content.limit_reached);
    assert_eq!(
        content.errors().iter().map(|e| e.row_index).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert!(content
        .causes()
        .all(|cause| matches!(cause, CoerceError::NegativeUnsigned)));
}

/// Test abort mode stops on the first failing cell
#[test]
fn test_abort_on_first_error() {
    let err =
        read_from_bytes::<Unsigned>(&three_bad_rows(), &ReadOptions::default(), &[]).unwrap_err();
    let field_error = err.as_field_error().unwrap();
    assert_eq!(field_error.row_index, 1);
    assert_eq!(field_error.column_index, 0);
    assert_eq!(field_error.column_header, "Value");
    assert!(err.as_content_error().is_none());
    assert_eq!(
        err.to_string(),
        "error unmarshalling column \"Value\" in row 2: negative integer provided for unsigned field"
    );
}

/// Test ignore mode leaves failing fields at their default
#[test]
fn test_ignore_errors() {
    let buf = sheet_bytes(&[vec!["Value"], vec!["-1"], vec!["5"]]);
    let options = ReadOptions {
        error_handling: ErrorHandling::Ignore,
        ..Default::default()
    };
    let read: Vec<Unsigned> = read_from_bytes(&buf, &options, &[]).unwrap();
    assert_eq!(read, vec![Unsigned { value: 0 }, Unsigned { value: 5 }]);
}

/// Test the row error handler replaces the abort policy and may fill the field
#[test]
fn test_row_error_handler() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let options = ReadOptions::new().on_row_error(
        move |cell, record: &mut Unsigned, binding, err| {
            log.borrow_mut().push((
                cell.raw_text().into_owned(),
                binding.header().to_string(),
                err.to_string(),
            ));
            record.value = 999;
        },
    );

    let read: Vec<Unsigned> = read_from_bytes(&three_bad_rows(), &options, &[]).unwrap();
    assert_eq!(read.len(), 3);
    assert!(read.iter().all(|r| r.value == 999));

    let seen = seen.borrow();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].0, "-1");
    assert_eq!(seen[0].1, "Value");
    assert_eq!(seen[0].2, "negative integer provided for unsigned field");
}

#[derive(Debug, Default, PartialEq, Record)]
struct WithExtras {
    #[sheet(excel = "Name")]
    name: String,
    #[sheet(excel = "Tags")]
    tags: Vec<String>,
}

/// Test matched fields without a conversion
#[test]
fn test_unknown_types() {
    let buf = sheet_bytes(&[vec!["Name", "Tags"], vec!["a", "x,y"]]);

    let err = read_from_bytes::<WithExtras>(&buf, &ReadOptions::default(), &[]).unwrap_err();
    assert_eq!(err.to_string(), "no unmarshaler for column \"Tags\" at index 1");

    let options = ReadOptions {
        skip_unknown_types: true,
        ..Default::default()
    }
    .on_unused_column(|cell, record: &mut WithExtras, binding| {
        if binding.field_ident() == Some("tags") {
            record.tags = cell.raw_text().split(',').map(str::to_string).collect();
        }
    });
    let read: Vec<WithExtras> = read_from_bytes(&buf, &options, &[]).unwrap();
    assert_eq!(
        read,
        vec![WithExtras {
            name: "a".into(),
            tags: vec!["x".into(), "y".into()],
        }]
    );
}

/// Test the unused column handler sees columns without a field
#[test]
fn test_unused_column_handler() {
    let buf = sheet_bytes(&[vec!["Name1", "Extra"], vec!["a", "kept"]]);
    let extras = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&extras);
    let options = ReadOptions::new().on_unused_column(
        move |cell, _: &mut Named, binding| {
            sink.borrow_mut()
                .push(format!("{}={}", binding.header(), cell.raw_text()));
        },
    );

    let read: Vec<Named> = read_from_bytes(&buf, &options, &[]).unwrap();
    assert_eq!(read, vec![Named { name1: "a".into() }]);
    assert_eq!(*extras.borrow(), vec!["Extra=kept".to_string()]);
}

/// Test rejected rows are dropped but still count their errors
#[test]
fn test_row_filters() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Person {
        #[sheet(excel = "Name")]
        name: String,
        #[sheet(excel = "Age")]
        age: u8,
    }

    let buf = sheet_bytes(&[
        vec!["Name", "Age"],
        vec!["Ann", "30"],
        vec!["Bob", "12"],
        vec!["Cid", "-1"],
        vec!["Dee", "45"],
    ]);

    let adults = |p: &Person| p.age >= 18;
    let not_dee = |p: &Person| p.name != "Dee";

    let collect = ReadOptions {
        error_handling: ErrorHandling::Collect,
        ..Default::default()
    };
    let err = read_from_bytes::<Person>(&buf, &collect, &[&adults]).unwrap_err();
    // Cid fails coercion and is also filtered; the error is still reported
    let content = err.as_content_error().unwrap();
    assert_eq!(content.errors().len(), 1);
    assert_eq!(content.errors()[0].row_index, 3);

    let ignore = ReadOptions {
        error_handling: ErrorHandling::Ignore,
        ..Default::default()
    };
    let read = read_from_bytes::<Person>(&buf, &ignore, &[&adults, &not_dee]).unwrap();
    assert_eq!(
        read,
        vec![Person {
            name: "Ann".into(),
            age: 30
        }]
    );
}

/// Test custom header and data rows
#[test]
fn test_header_and_data_rows() {
    let buf = sheet_bytes(&[
        vec!["Report generated today"],
        vec!["Name1"],
        vec!["units"],
        vec!["a"],
        vec!["b"],
    ]);
    let options = ReadOptions {
        header_row_index: 1,
        data_start_row_index: 3,
        ..Default::default()
    };
    let read: Vec<Named> = read_from_bytes(&buf, &options, &[]).unwrap();
    assert_eq!(
        read,
        vec![Named { name1: "a".into() }, Named { name1: "b".into() }]
    );
}

/// Test configured rows and sheets past the end of the workbook
#[test]
fn test_structural_errors() {
    let buf = sheet_bytes(&[vec!["Name1"], vec!["a"]]);

    let options = ReadOptions {
        sheet_index: 3,
        ..Default::default()
    };
    let err = read_from_bytes::<Named>(&buf, &options, &[]).unwrap_err();
    assert_eq!(err.to_string(), "sheet index out of range: 3 (count: 1)");

    let options = ReadOptions {
        header_row_index: 5,
        ..Default::default()
    };
    let err = read_from_bytes::<Named>(&buf, &options, &[]).unwrap_err();
    assert_eq!(err.to_string(), "header row index out of range: 5 (rows: 2)");

    let options = ReadOptions {
        data_start_row_index: 2,
        ..Default::default()
    };
    let err = read_from_bytes::<Named>(&buf, &options, &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "data start row index out of range: 2 (rows: 2)"
    );
}

/// Test files that are not XLSX archives
#[test]
fn test_not_an_archive() {
    let err = read_from_bytes::<Named>(b"Name1\na\n", &ReadOptions::default(), &[]).unwrap_err();
    assert!(matches!(err, Error::Xlsx(_)));

    let dir = tempfile::tempdir().unwrap();
    let err = walk_sheet(dir.path().join("missing.xlsx"), 0, |_, _| {}).unwrap_err();
    assert!(matches!(err, Error::Xlsx(_)));
}

/// Test numeric cells written natively coerce into text and numeric fields
#[test]
fn test_native_cells_to_fields() {
    #[derive(Debug, Default, PartialEq, Record)]
    struct Source {
        #[sheet(excel = "Id")]
        id: u64,
        #[sheet(excel = "Ok")]
        ok: bool,
        #[sheet(excel = "Ratio")]
        ratio: f64,
    }

    #[derive(Debug, Default, PartialEq, Record)]
    struct AsText {
        #[sheet(excel = "Id")]
        id: String,
        #[sheet(excel = "Ok")]
        ok: String,
        #[sheet(excel = "Ratio")]
        ratio: String,
    }

    let mut buf = Vec::new();
    write_to_writer(
        &mut buf,
        &[Source {
            id: 42,
            ok: true,
            ratio: 0.5,
        }],
        &WriteOptions::default(),
    )
    .unwrap();

    let read: Vec<AsText> = read_from_bytes(&buf, &ReadOptions::default(), &[]).unwrap();
    assert_eq!(
        read,
        vec![AsText {
            id: "42".into(),
            ok: "TRUE".into(),
            ratio: "0.5".into(),
        }]
    );

    // Text cells spelling out truthy values read as booleans
    let buf = sheet_bytes(&[vec!["Id", "Ok", "Ratio"], vec!["7", "true", "1e-3"]]);
    let read: Vec<Source> = read_from_bytes(&buf, &ReadOptions::default(), &[]).unwrap();
    assert_eq!(
        read,
        vec![Source {
            id: 7,
            ok: true,
            ratio: 0.001,
        }]
    );
}
