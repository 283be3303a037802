//! End-to-end: TOML manifests on disk → generator service → artifacts on
//! disk, through the real adapters.

use std::fs;
use std::path::Path;

use admingen_adapters::{LocalOutputSink, MemorySchemaStore, TomlSchemaLoader};
use admingen_core::application::{GeneratorOptions, GeneratorService, MANIFEST_PATH};

fn write_demo_manifests(dir: &Path) {
    fs::write(
        dir.join("customer.toml"),
        r#"
[entity]
name = "Customer"
comment = "Customers"

[[columns]]
name = "Id"
type = "integer"
identity = true
primary = true

[[columns]]
name = "Name"
type = "text"
"#,
    )
    .unwrap();
    fs::write(
        dir.join("order.toml"),
        r#"
[entity]
name = "Order"
comment = "Customer orders"

[[columns]]
name = "Id"
type = "integer"
identity = true
primary = true

[[columns]]
name = "No"
type = "text"

[[columns]]
name = "CustomerId"
type = "integer"
nullable = true

[[navigations]]
property = "Customer"
target = "Customer"
local_columns = ["CustomerId"]
referenced_columns = ["Id"]
"#,
    )
    .unwrap();
}

#[test]
fn generates_artifact_tree_from_toml_schemas() {
    let schemas_dir = tempfile::tempdir().unwrap();
    write_demo_manifests(schemas_dir.path());
    let out_dir = tempfile::tempdir().unwrap();

    let store = TomlSchemaLoader::new(schemas_dir.path()).into_store().unwrap();
    let service = GeneratorService::new(
        Box::new(store),
        Box::new(LocalOutputSink::new(out_dir.path())),
    );

    let report = service
        .generate(
            &["Customer".into(), "Order".into()],
            &GeneratorOptions::default(),
        )
        .unwrap();

    assert_eq!(report.entities, 2);
    assert!(out_dir.path().join("src/controllers/customer.rs").exists());
    assert!(out_dir.path().join("src/controllers/order.rs").exists());
    assert!(out_dir.path().join("templates/order/list.html").exists());
    assert!(out_dir.path().join("templates/order/edit.html").exists());
    assert!(out_dir.path().join(MANIFEST_PATH).exists());

    let controller = fs::read_to_string(out_dir.path().join("src/controllers/order.rs")).unwrap();
    assert!(controller.contains("pub Customer_Id: Vec<i64>"));
}

#[test]
fn rerunning_a_batch_leaves_the_manifest_byte_identical() {
    let schemas_dir = tempfile::tempdir().unwrap();
    write_demo_manifests(schemas_dir.path());
    let out_dir = tempfile::tempdir().unwrap();
    let entities = vec!["Customer".to_string(), "Order".to_string()];

    let run = || {
        let store = TomlSchemaLoader::new(schemas_dir.path()).into_store().unwrap();
        let service = GeneratorService::new(
            Box::new(store),
            Box::new(LocalOutputSink::new(out_dir.path())),
        );
        service.generate(&entities, &GeneratorOptions::default()).unwrap()
    };

    let first = run();
    let manifest_first = fs::read_to_string(out_dir.path().join(MANIFEST_PATH)).unwrap();
    let second = run();
    let manifest_second = fs::read_to_string(out_dir.path().join(MANIFEST_PATH)).unwrap();

    assert!(first.manifest_appended > 0);
    assert_eq!(second.manifest_appended, 0);
    assert_eq!(manifest_first, manifest_second);
}

#[test]
fn demo_store_generates_every_fixture_entity() {
    let out_dir = tempfile::tempdir().unwrap();
    let store = MemorySchemaStore::with_demo().unwrap();
    let entities = {
        use admingen_core::application::ports::SchemaProvider;
        store.list().unwrap()
    };
    let service = GeneratorService::new(
        Box::new(store),
        Box::new(LocalOutputSink::new(out_dir.path())),
    );

    let options = GeneratorOptions {
        emit_support: true,
        ..Default::default()
    };
    let report = service.generate(&entities, &options).unwrap();

    assert_eq!(report.entities, 5);
    // 3 artifacts per entity + support module.
    assert_eq!(report.files_written, 16);
    assert!(out_dir
        .path()
        .join("src/controllers/api_result.rs")
        .exists());
    // The hierarchical fixture renders a tree selector.
    let edit = fs::read_to_string(out_dir.path().join("templates/category/edit.html")).unwrap();
    assert!(edit.contains("initTreeSelect"));
}
