use sheetpivot_io::{CalamineAdapter, IoError, LiteralValue, SpreadsheetReader, TableLoader};
use sheetpivot_testkit::{build_workbook, sales_workbook};

#[test]
fn calamine_reads_values_with_one_based_coordinates() {
    let fixture = build_workbook(|book| {
        let sh = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sh.get_cell_mut((2, 3)).set_value("Health"); // B3
        sh.get_cell_mut((3, 4)).set_value_number(12.5); // C4
    });

    let mut backend = CalamineAdapter::open_path(fixture.path()).unwrap();
    assert_eq!(backend.sheet_names().unwrap(), vec!["Sheet1".to_string()]);
    let sheet = backend.read_sheet("Sheet1").unwrap();
    assert_eq!(
        sheet.value(3, 2),
        Some(&LiteralValue::Text("Health".into()))
    );
    assert_eq!(sheet.value(4, 3), Some(&LiteralValue::Number(12.5)));
    assert_eq!(sheet.bounds_from_row(1), Some((3, 2, 4, 3)));
}

#[test]
fn calamine_open_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(CalamineAdapter::open_path(dir.path().join("nope.xlsx")).is_err());
}

#[test]
fn table_loader_over_calamine_finds_sales_columns() {
    let fixture = sales_workbook(&[("Female", "Health", 100.0), ("Male", "Food", 50.0)]);
    let backend = CalamineAdapter::open_path(fixture.path()).unwrap();
    let mut loader = TableLoader::new(backend);
    let table = loader.load_table(None).unwrap();

    assert_eq!(table.sheet, "Sheet1");
    assert_eq!(table.header_row, 1);
    assert_eq!(table.column("Gender"), Some(1));
    assert_eq!(table.column("Product line"), Some(2));
    assert_eq!(table.column("Total"), Some(3));
    assert_eq!(table.rows.len(), 2);
    assert_eq!(
        table.rows[0].1.get(&3),
        Some(&LiteralValue::Number(100.0))
    );

    let err = loader.load_table(Some("Other")).unwrap_err();
    assert!(matches!(err, IoError::SheetNotFound(_)));
}
