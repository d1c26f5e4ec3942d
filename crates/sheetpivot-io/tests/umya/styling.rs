use sheetpivot_io::{
    CellData, CellRef, ChartKind, ChartSeries, ChartSpec, FontSpec, RangeAddress,
    SpreadsheetReader, SpreadsheetStyler, SpreadsheetWriter, UmyaAdapter,
};

fn report_adapter(path: &std::path::Path) -> UmyaAdapter {
    let mut adapter = UmyaAdapter::create(path);
    adapter.create_sheet("Report").unwrap();
    let cells = [
        ((5, 1), CellData::from_value("Gender")),
        ((5, 2), CellData::from_value("Food")),
        ((5, 3), CellData::from_value("Health")),
        ((6, 1), CellData::from_value("Female")),
        ((6, 2), CellData::from_value(50.0)),
        ((6, 3), CellData::from_value(100.0)),
        ((7, 1), CellData::from_value("Male")),
        ((7, 2), CellData::from_value(0.0)),
        ((7, 3), CellData::from_value(80.0)),
    ];
    adapter
        .write_range("Report", cells.into_iter().collect())
        .unwrap();
    adapter
}

#[test]
fn styling_survives_save_and_keeps_values() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("styled.xlsx");
    let mut adapter = report_adapter(&path);

    adapter.set_column_width("Report", 1, 20.0).unwrap();
    adapter
        .set_font(
            "Report",
            1,
            1,
            &FontSpec {
                name: "Arial".into(),
                size: 20.0,
                bold: true,
            },
        )
        .unwrap();
    adapter
        .set_number_format("Report", 6, 2, "\"$\"#,##0.00")
        .unwrap();
    adapter.save().unwrap();

    let mut reopened = UmyaAdapter::open_path(&path).unwrap();
    let sheet = reopened.read_sheet("Report").unwrap();
    assert_eq!(sheet.bounds_from_row(1), Some((5, 1, 7, 3)));
    assert_eq!(sheet.value(6, 2), Some(&sheetpivot_io::LiteralValue::Number(50.0)));

    let book = umya_spreadsheet::reader::xlsx::read(&path).unwrap();
    let ws = book.get_sheet_by_name("Report").unwrap();
    let width = ws.get_column_dimension("A").map(|c| *c.get_width());
    assert_eq!(width, Some(20.0));
    let font = ws.get_style((1, 1)).get_font().unwrap();
    assert_eq!(font.get_name(), "Arial");
    assert_eq!(*font.get_size(), 20.0);
    assert!(*font.get_bold());
    let format = ws.get_style((2, 6)).get_number_format().unwrap();
    assert_eq!(format.get_format_code(), "\"$\"#,##0.00");
}

#[test]
fn bar_chart_is_embedded_in_saved_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("chart.xlsx");
    let mut adapter = report_adapter(&path);

    let spec = ChartSpec {
        kind: ChartKind::Bar,
        title: "Sales".into(),
        style: 2,
        anchor: CellRef::new(12, 2),
        extent_to: CellRef::new(27, 10),
        series: vec![
            ChartSeries {
                title: "Food".into(),
                values: RangeAddress::new("Report", 6, 2, 7, 2).unwrap(),
            },
            ChartSeries {
                title: "Health".into(),
                values: RangeAddress::new("Report", 6, 3, 7, 3).unwrap(),
            },
        ],
        categories: RangeAddress::new("Report", 6, 1, 7, 1).unwrap(),
    };
    adapter.add_chart("Report", &spec).unwrap();
    adapter.save().unwrap();

    let mut reopened = UmyaAdapter::open_path(&path).unwrap();
    let sheet = reopened.read_sheet("Report").unwrap();
    assert_eq!(sheet.bounds_from_row(1), Some((5, 1, 7, 3)));
    assert!(std::fs::metadata(&path).unwrap().len() > 100);
}
