//! End-to-end batch runs through the public API.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use trellis_gen::config::GeneratorConfig;
use trellis_gen::diagnostics::DiagnosticCode;
use trellis_gen::errors::GeneratorError;

const SCHEMA: &str = r#"
use trellis::{FramedEdge, FramedVertex, edge, vertex};

#[vertex]
pub trait Person: FramedVertex {
    fn get_name(&self) -> Option<String>;
    fn set_name(&self, name: Option<String>);

    #[linked_vertex(label = "knows")]
    fn get_knows_people(&self) -> Vec<Box<dyn Person>>;

    fn get_queue(&self) -> std::collections::VecDeque<Box<dyn Person>>;
    fn get_tags(&self) -> Vec<String>;
    fn add_nickname(&self, nickname: String);
    fn get_pairs(&self) -> std::collections::HashSet<Box<dyn Person>, std::hash::RandomState>;
}

#[edge(label = "knows")]
pub trait Knows: FramedEdge {
    fn get_since(&self) -> i64;
}
"#;

fn write_schema(dir: &Path, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    path
}

fn config(dir: &Path, inputs: Vec<std::path::PathBuf>) -> GeneratorConfig {
    GeneratorConfig {
        inputs,
        output: dir.join("generated"),
        ..GeneratorConfig::default()
    }
}

#[test]
fn batch_writes_adapters_and_reports_every_code() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_schema(temp_dir.path(), "schema.rs", SCHEMA);

    let report = trellis_gen::run(&config(temp_dir.path(), vec![input]), false).unwrap();

    assert!(!report.has_failures());
    let codes: Vec<_> = report.diagnostics.warnings().filter_map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![
            DiagnosticCode::UnrecognizedContainer,
            DiagnosticCode::UnrecognizedElement,
            DiagnosticCode::UnsupportedAdder,
            DiagnosticCode::TypeArgumentCount,
        ]
    );

    let person = fs::read_to_string(temp_dir.path().join("generated/person_impl.rs")).unwrap();
    assert!(person.contains("004: not yet supported"));
    assert!(person.contains("001: not yet supported"));
    assert!(person.contains("002: not yet supported"));
    assert!(person.contains("005: not yet supported"));

    let aggregate = fs::read_to_string(temp_dir.path().join("generated/adapters.rs")).unwrap();
    assert!(aggregate.contains(r#"registry.register_edge::<dyn Knows>("Knows", KnowsImpl::LABEL, KnowsImpl::boxed);"#));
}

#[test]
fn batches_span_multiple_files_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_schema(
        temp_dir.path(),
        "people.rs",
        "#[vertex]\npub trait Person: FramedVertex {}\n",
    );
    let second = write_schema(
        temp_dir.path(),
        "software.rs",
        "#[vertex]\npub trait Software: FramedVertex {\n    fn get_creators(&self) -> Vec<Box<dyn Person>>;\n}\n",
    );

    let report = trellis_gen::run(&config(temp_dir.path(), vec![first, second]), false).unwrap();

    let names: Vec<_> = report.files.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(names, vec!["person_impl.rs", "software_impl.rs", "adapters.rs"]);
    let software = &report.adapter("Software").unwrap().content;
    assert!(software.contains("PersonImpl::new"));
    assert!(software.contains(r#""creator""#));
}

#[test]
fn reruns_are_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_schema(temp_dir.path(), "schema.rs", SCHEMA);
    let config = config(temp_dir.path(), vec![input]);

    let first = trellis_gen::run(&config, false).unwrap();
    let second = trellis_gen::run(&config, false).unwrap();

    assert_eq!(first.files, second.files);
    assert!(second.written.is_empty());
}

#[test]
fn unparsable_input_fails_the_batch() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_schema(temp_dir.path(), "broken.rs", "pub trait {");

    let err = trellis_gen::run(&config(temp_dir.path(), vec![input]), false).unwrap_err();

    assert!(matches!(err, GeneratorError::ParseError { .. }));
    assert!(!temp_dir.path().join("generated").exists());
}

#[test]
fn empty_inputs_are_a_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = trellis_gen::run(&config(temp_dir.path(), Vec::new()), false).unwrap_err();
    assert!(matches!(err, GeneratorError::ConfigError(_)));
}
