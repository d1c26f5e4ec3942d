use sheetpivot_io::{CellData, LiteralValue, SpreadsheetReader, SpreadsheetWriter, UmyaAdapter};

#[test]
fn umya_create_write_and_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("out.xlsx");

    let mut adapter = UmyaAdapter::create(&path);
    adapter.create_sheet("Report").unwrap();
    adapter
        .write_cell("Report", 5, 1, CellData::from_value("Gender"))
        .unwrap();
    adapter
        .write_cell("Report", 6, 2, CellData::from_value(180.0))
        .unwrap();
    adapter
        .write_cell("Report", 7, 2, CellData::from_formula("=SUM(B6:B6)"))
        .unwrap();
    adapter.set_active_sheet("Report").unwrap();
    adapter.save().unwrap();
    assert!(path.exists());

    let mut reopened = UmyaAdapter::open_path(&path).unwrap();
    assert_eq!(reopened.sheet_names().unwrap(), vec!["Report".to_string()]);
    let sheet = reopened.read_sheet("Report").unwrap();
    assert_eq!(
        sheet.value(5, 1),
        Some(&LiteralValue::Text("Gender".into()))
    );
    assert_eq!(sheet.value(6, 2), Some(&LiteralValue::Number(180.0)));
    assert_eq!(sheet.formula(7, 2), Some("=SUM(B6:B6)"));
    assert_eq!(sheet.bounds_from_row(1), Some((5, 1, 7, 2)));
}

#[test]
fn umya_writes_to_missing_sheet_fail() {
    let tmp = tempfile::tempdir().unwrap();
    let mut adapter = UmyaAdapter::create(tmp.path().join("out.xlsx"));
    let err = adapter
        .write_cell("Nowhere", 1, 1, CellData::from_value(1.0))
        .unwrap_err();
    assert!(err.to_string().contains("Nowhere"), "unexpected error: {err}");
    assert!(adapter.set_active_sheet("Nowhere").is_err());
}

#[test]
fn umya_save_writes_where_the_workbook_was_opened() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("report.xlsx");

    let mut adapter = UmyaAdapter::create(&path);
    adapter.create_sheet("Report").unwrap();
    adapter
        .write_cell("Report", 1, 1, CellData::from_value("first"))
        .unwrap();
    adapter.save().unwrap();

    let mut reopened = UmyaAdapter::open_path(&path).unwrap();
    reopened
        .write_cell("Report", 2, 1, CellData::from_value(2.0))
        .unwrap();
    reopened.save().unwrap();

    let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
    let ws = book.get_sheet_by_name("Report").unwrap();
    assert_eq!(ws.get_value((1, 1)), "first");
    assert_eq!(ws.get_value((1, 2)), "2");
}
