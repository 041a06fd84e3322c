//! Workbook import tests

use bi_migration_sdk::events::{CollectingSink, EventKind, NullSink};
use bi_migration_sdk::import::{
    ExtractOptions, ImportError, WorkbookImporter, parse_xml, read_workbook,
};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::FileOptions;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_text() -> String {
    std::fs::read_to_string(fixture("superstore.twb")).unwrap()
}

fn write_bundle(dir: &TempDir, file_name: &str, members: &[(&str, &str)]) -> PathBuf {
    let path = dir.path().join(file_name);
    let file = File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (name, content) in members {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path
}

#[test]
fn test_import_fixture_header() {
    let meta = WorkbookImporter::new()
        .import_file(&fixture("superstore.twb"), &NullSink)
        .unwrap();

    assert_eq!(meta.report_id, "superstore");
    assert_eq!(meta.report_name, "Superstore Sales");
}

#[test]
fn test_import_fixture_datasources() {
    let events = CollectingSink::new();
    let meta = WorkbookImporter::new()
        .import_file(&fixture("superstore.twb"), &events)
        .unwrap();

    assert_eq!(meta.datasources.len(), 2);
    let orders = &meta.datasources[0];
    assert_eq!(orders.id, "Orders");
    assert_eq!(orders.name.as_deref(), Some("Orders Data"));
    assert_eq!(orders.connection_type.as_deref(), Some("sqlserver"));
    assert_eq!(orders.connection.get("server").map(String::as_str), Some("db01"));
    assert_eq!(
        orders.connection.get("custom-sql").map(String::as_str),
        Some("SELECT * FROM dbo.orders")
    );
    assert_eq!(orders.query.as_deref(), Some("SELECT * FROM dbo.orders"));

    let customers = &meta.datasources[1];
    assert_eq!(customers.connection_type.as_deref(), Some("excel-direct"));
    assert!(customers.query.is_none());

    assert_eq!(events.count(EventKind::DuplicateDatasource), 1);
}

#[test]
fn test_import_fixture_tables() {
    let meta = WorkbookImporter::new()
        .import_file(&fixture("superstore.twb"), &NullSink)
        .unwrap();

    let names: Vec<&str> = meta.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Orders", "Customers"]);

    let orders = meta.table("Orders").unwrap();
    let columns: Vec<&str> = orders.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        columns,
        vec![
            "order_id",
            "customer_id",
            "Sales Amount",
            "order_date",
            "region",
            "Total Sales"
        ]
    );
    assert_eq!(orders.columns[2].data_type.as_deref(), Some("real"));

    let customers = meta.table("Customers").unwrap();
    assert_eq!(customers.columns.len(), 3);
    assert!(customers.columns[1].data_type.is_none());
}

#[test]
fn test_import_fixture_relationships() {
    let events = CollectingSink::new();
    let meta = WorkbookImporter::new()
        .import_file(&fixture("superstore.twb"), &events)
        .unwrap();

    assert_eq!(meta.relationships.len(), 3);
    let first = &meta.relationships[0];
    assert_eq!(first.from_table.as_deref(), Some("Orders"));
    assert_eq!(first.from_column.as_deref(), Some("customer_id"));
    assert_eq!(first.to_table.as_deref(), Some("Customers"));
    assert_eq!(first.to_column.as_deref(), Some("id"));
    assert_eq!(first.cardinality.as_deref(), Some("many-to-one"));

    assert!(!meta.relationships[2].is_complete());
    assert!(meta.relationships[2].to_table.is_none());
    assert_eq!(events.count(EventKind::InvalidRelationship), 1);
}

#[test]
fn test_import_fixture_worksheets_and_dashboards() {
    let meta = WorkbookImporter::new()
        .import_file(&fixture("superstore.twb"), &NullSink)
        .unwrap();

    let names: Vec<&str> = meta.worksheets.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Sales by Region", "Customer List"]);

    let visuals = &meta.worksheets[0].visuals;
    assert_eq!(visuals.len(), 3);
    assert_eq!(visuals[0].id.as_deref(), Some("v1"));
    assert_eq!(visuals[0].visual_type, "PieChart");
    assert_eq!(visuals[0].title.as_deref(), Some("Share"));
    assert_eq!(visuals[0].fields, vec!["region", "Orders.amount"]);
    assert_eq!(visuals[1].visual_type, "Table");
    assert_eq!(visuals[1].fields, vec!["Total Sales"]);
    assert!(visuals[2].fields.is_empty());

    let viz = &meta.worksheets[1].visuals[0];
    assert_eq!(viz.visual_type, "viz");
    assert_eq!(viz.fields, vec!["segment"]);

    assert_eq!(meta.dashboards.len(), 1);
    let refs: Vec<Option<&str>> = meta.dashboards[0]
        .items
        .iter()
        .map(|i| i.reference.as_deref())
        .collect();
    assert_eq!(refs, vec![Some("Sales by Region"), Some("Customer List")]);
    assert_eq!(meta.dashboards[0].items[0].item_type, "zone");
}

#[test]
fn test_import_fixture_measures_and_connections() {
    let meta = WorkbookImporter::new()
        .import_file(&fixture("superstore.twb"), &NullSink)
        .unwrap();

    assert_eq!(meta.measures.len(), 3);
    assert_eq!(meta.measures[0].name.as_deref(), Some("Total Sales"));
    assert_eq!(meta.measures[0].expression.as_deref(), Some("SUM([amount])"));
    assert_eq!(meta.measures[1].name.as_deref(), Some("Profit Ratio"));
    assert_eq!(
        meta.measures[1].expression.as_deref(),
        Some("SUM([profit])/SUM([amount])")
    );
    // the nested <formula> element is a calculation node of its own
    assert!(meta.measures[2].name.is_none());

    assert_eq!(meta.connections.len(), 2);
    assert_eq!(meta.connections[1].get("filename").map(String::as_str), Some("customers.xlsx"));
}

#[test]
fn test_visual_limit_option() {
    let meta = WorkbookImporter::new()
        .with_options(ExtractOptions::default().with_visual_limit(1))
        .import_str(&fixture_text(), "superstore", &NullSink)
        .unwrap();
    assert_eq!(meta.worksheets[0].visuals.len(), 1);
}

#[test]
fn test_bundle_matches_bare_definition() {
    let dir = TempDir::new().unwrap();
    let text = fixture_text();
    let bundle = write_bundle(
        &dir,
        "superstore.twbx",
        &[("Data/extract.hyper", "binary"), ("superstore.twb", text.as_str())],
    );

    let importer = WorkbookImporter::new().with_timestamp(chrono::Utc::now());
    let from_bundle = importer.import_file(&bundle, &NullSink).unwrap();
    let from_definition = importer
        .import_file(&fixture("superstore.twb"), &NullSink)
        .unwrap();
    assert_eq!(from_bundle, from_definition);
}

#[test]
fn test_bundle_preferred_member() {
    let dir = TempDir::new().unwrap();
    let bundle = write_bundle(
        &dir,
        "book.twbx",
        &[
            ("first.twb", "<workbook name='First'/>"),
            ("nested/second.twb", "<workbook name='Second'/>"),
        ],
    );

    let events = CollectingSink::new();
    let meta = WorkbookImporter::new()
        .with_preferred_members(vec!["missing.twb".to_string(), "nested/second.twb".to_string()])
        .import_file(&bundle, &events)
        .unwrap();
    assert_eq!(meta.report_name, "Second");
    assert_eq!(events.count(EventKind::MemberSelected), 1);

    let meta = WorkbookImporter::new().import_file(&bundle, &NullSink).unwrap();
    assert_eq!(meta.report_name, "First");
}

#[test]
fn test_bundle_member_extension_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let bundle = write_bundle(&dir, "BOOK.TWBX", &[("Book.TWB", "<workbook name='Upper'/>")]);
    let meta = WorkbookImporter::new().import_file(&bundle, &NullSink).unwrap();
    assert_eq!(meta.report_id, "BOOK");
    assert_eq!(meta.report_name, "Upper");
}

#[test]
fn test_bundle_without_definition() {
    let dir = TempDir::new().unwrap();
    let bundle = write_bundle(&dir, "empty.twbx", &[("readme.txt", "none")]);
    let err = WorkbookImporter::new()
        .import_file(&bundle, &NullSink)
        .unwrap_err();
    assert!(matches!(err, ImportError::ArchiveMemberNotFound(_)));
}

#[test]
fn test_tree_reachable_iff_utf8() {
    let dir = TempDir::new().unwrap();

    let valid = dir.path().join("ok.twb");
    std::fs::write(&valid, "<workbook name='Ünïcode'/>").unwrap();
    let text = read_workbook(&valid, &[], &NullSink).unwrap();
    let root = parse_xml(&text).unwrap();
    assert_eq!(root.name, "workbook");
    assert_eq!(root.attr("name"), Some("Ünïcode"));

    let invalid = dir.path().join("latin1.twb");
    std::fs::write(&invalid, [b'<', b'w', b'/', b'>', 0xff, 0xfe]).unwrap();
    let err = read_workbook(&invalid, &[], &NullSink).unwrap_err();
    assert!(matches!(err, ImportError::Decode(_)));
}

#[test]
fn test_namespace_prefixes_ignored() {
    let xml = "<t:workbook xmlns:t='urn:x' t:name='Prefixed'>\
               <t:datasource t:name='Orders'><t:column t:name='id' t:datatype='integer'/></t:datasource>\
               </t:workbook>";
    let meta = WorkbookImporter::new()
        .import_str(xml, "prefixed", &NullSink)
        .unwrap();
    assert_eq!(meta.report_name, "Prefixed");
    assert_eq!(meta.tables[0].name, "Orders");
    assert_eq!(meta.tables[0].columns[0].data_type.as_deref(), Some("integer"));
}

#[test]
fn test_malformed_markup_is_recovered() {
    let xml = "<workbook name='Broken'><datasource name='Orders'>\
               <column name='id'></datasource></oops><worksheet name='Sheet 1'>";
    let events = CollectingSink::new();
    let meta = WorkbookImporter::new()
        .import_str(xml, "broken", &events)
        .unwrap();

    assert_eq!(meta.tables[0].name, "Orders");
    assert_eq!(meta.worksheets[0].name, "Sheet 1");
    assert!(events.count(EventKind::MarkupRecovered) >= 1);
}

#[test]
fn test_invalid_fragment_between_datasources() {
    let xml = "<workbook><datasource name='a'/><!x><datasource name='b'/></workbook>";
    let events = CollectingSink::new();
    let meta = WorkbookImporter::new()
        .import_str(xml, "resync", &events)
        .unwrap();

    let ids: Vec<&str> = meta.datasources.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(events.count(EventKind::MarkupRecovered) >= 1);
}

#[test]
fn test_markup_without_root_fails() {
    let err = WorkbookImporter::new()
        .import_str("just text, no elements", "empty", &NullSink)
        .unwrap_err();
    assert!(matches!(err, ImportError::MalformedMarkup(_)));
}
