//! End-to-end compilation through the library entry point.

use std::fs;
use std::path::{Path, PathBuf};

use schema2rdf::config::CompileConfig;
use schema2rdf::error::{ConfigError, ModelError, SourceError};
use schema2rdf::source::Dialect;
use schema2rdf::{compile, CompileError};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn config(input: PathBuf, org: &str, output_dir: &Path) -> CompileConfig {
    let mut config = CompileConfig::new(input, org);
    config.output_dir = output_dir.to_path_buf();
    config
}

const STUDY_SUBSET: &str = "\
@prefix NCIT: <http://purl.obolibrary.org/obo/NCIT_> .
@prefix dcterms: <http://purl.org/dc/terms/> .
@prefix model: <https://metadata.example/model/> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix study: <https://metadata.example/model/study/> .

study:study_id rdfs:label \"studyId\" ;
    dcterms:description \"Unique study identifier\" ;
    model:node model:study ;
    model:type \"string\" ;
    model:requiredBy model:study ;
    model:isKey \"true\" .

study:study_name rdfs:label \"studyName\" ;
    dcterms:description \"Name of the study\" ;
    model:node model:study ;
    model:type \"string\" ;
    model:requiredBy model:study ;
    skos:exactMatch NCIT:C68631 .

model:study model:primaryKey study:study_id .
";

#[test]
fn study_subset_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(fixture("dependency_model.csv"), "htan", dir.path());
    config.nodes = vec!["Study".to_string()];

    let report = compile(&config).unwrap();
    assert_eq!(report.output, dir.path().join("htan_study_v1.0.0.ttl"));
    assert_eq!(report.dialect, Dialect::DependencyGraph);
    assert_eq!(report.nodes, 1);
    assert_eq!(report.terms, 2);
    assert_eq!(report.key_relations, 1);
    assert_eq!(report.triples, 13);

    let ttl = fs::read_to_string(&report.output).unwrap();
    assert_eq!(ttl, STUDY_SUBSET);
}

#[test]
fn full_dependency_model() {
    let dir = tempfile::tempdir().unwrap();
    let report = compile(&config(fixture("dependency_model.csv"), "htan", dir.path())).unwrap();
    assert_eq!(report.output, dir.path().join("htan_all_v1.0.0.ttl"));
    assert_eq!(report.nodes, 3);
    assert_eq!(report.terms, 7);
    assert_eq!(report.key_relations, 3);

    let ttl = fs::read_to_string(&report.output).unwrap();
    let prefixes: Vec<_> = ttl.lines().filter(|l| l.starts_with("@prefix")).collect();
    assert_eq!(prefixes.len(), 8);
    assert_eq!(
        &prefixes[5..],
        [
            "@prefix study: <https://metadata.example/model/study/> .",
            "@prefix biospecimen: <https://metadata.example/model/biospecimen/> .",
            "@prefix individual: <https://metadata.example/model/individual/> .",
        ]
    );

    assert!(ttl.contains(
        "biospecimen:specimen_type rdfs:label \"specimenType\" ;\n    \
         dcterms:description \"Kind of specimen\" ;\n    \
         model:node model:biospecimen ;\n    \
         model:type \"array[string;enum]\" ;\n    \
         model:hasEnum \"['Blood', 'Tissue', 'Saliva']\" .\n"
    ));
    assert!(ttl.contains(
        "biospecimen:specimen_type_other rdfs:label \"specimenTypeOther\" ;\n    \
         dcterms:description \"Free-text specimen type\" ;\n    \
         model:node model:biospecimen .\n"
    ));
    assert!(ttl.contains("    model:type \"num\" .\n"));
    assert!(ttl.ends_with(
        "model:study model:primaryKey study:study_id .\n\
         model:biospecimen model:primaryKey biospecimen:biospecimen_id .\n\
         model:individual model:primaryKey individual:individual_id .\n"
    ));
}

#[test]
fn subset_excludes_other_nodes() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(fixture("dependency_model.csv"), "htan", dir.path());
    config.nodes = vec!["Study".to_string()];
    let ttl = fs::read_to_string(compile(&config).unwrap().output).unwrap();
    assert!(!ttl.contains("biospecimen"));
    assert!(!ttl.contains("individual"));
}

#[test]
fn output_is_deterministic() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let a = compile(&config(fixture("flat_model.tsv"), "cds", first.path())).unwrap();
    let b = compile(&config(fixture("flat_model.tsv"), "cds", second.path())).unwrap();
    assert_eq!(fs::read(a.output).unwrap(), fs::read(b.output).unwrap());
}

#[test]
fn flat_model_keys() {
    let dir = tempfile::tempdir().unwrap();
    let report = compile(&config(fixture("flat_model.tsv"), "cds", dir.path())).unwrap();
    assert_eq!(report.dialect, Dialect::FlatNodeProperty);
    assert_eq!(report.nodes, 3);
    assert_eq!(report.terms, 10);
    assert_eq!(report.key_relations, 5);

    let ttl = fs::read_to_string(&report.output).unwrap();
    assert!(ttl.contains("model:participant model:foreignKey study:study_id .\n"));
    assert!(ttl.contains("model:sample model:foreignKey participant:participant_id .\n"));
    assert!(ttl.contains("skos:exactMatch caDSR:6380049"));
    assert!(ttl.contains(
        "@prefix caDSR: <https://cadsr.cancer.gov/onedata/dmdirect/NIH/NCI/CO/CDEDD?filter=CDEDD.ITEM_ID=> .\n"
    ));
}

#[test]
fn subset_names_the_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(fixture("flat_model.tsv"), "cds", dir.path());
    config.nodes = vec!["participant".to_string(), "sample".to_string()];
    config.version = "v2".to_string();
    assert_eq!(
        compile(&config).unwrap().output,
        dir.path().join("cds_participant-sample_v2.ttl")
    );

    config.subset_name = Some("clinical".to_string());
    assert_eq!(
        compile(&config).unwrap().output,
        dir.path().join("cds_clinical_v2.ttl")
    );
}

#[test]
fn unknown_org_is_sniffed_from_the_header() {
    let dir = tempfile::tempdir().unwrap();
    let report = compile(&config(fixture("flat_model.tsv"), "newcenter", dir.path())).unwrap();
    assert_eq!(report.dialect, Dialect::FlatNodeProperty);
}

#[test]
fn model_errors_leave_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.csv");
    fs::write(
        &input,
        "Attribute,DependsOn\nStudy,\"Component, studyId, ghost\"\nstudyId,\n",
    )
    .unwrap();
    let out = dir.path().join("out");

    let err = compile(&config(input, "htan", &out)).unwrap_err();
    assert!(matches!(
        err,
        CompileError::Model(ModelError::DanglingReference { .. })
    ));
    assert!(!out.exists());
}

#[test]
fn unknown_subset_node_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(fixture("dependency_model.csv"), "htan", dir.path());
    config.nodes = vec!["Assay".to_string()];
    assert!(matches!(
        compile(&config),
        Err(CompileError::Model(ModelError::UnknownNode(_)))
    ));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn wrong_dialect_reports_missing_column() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(fixture("flat_model.tsv"), "cds", dir.path());
    config.dialect = Some(Dialect::DependencyGraph);
    assert!(matches!(
        compile(&config),
        Err(CompileError::Source(SourceError::MissingColumn { .. }))
    ));
}

#[test]
fn invalid_configuration_is_rejected_first() {
    let dir = tempfile::tempdir().unwrap();
    let mut bad_uri = config(fixture("missing.csv"), "htan", dir.path());
    bad_uri.base_uri = "not a uri".to_string();
    assert!(matches!(
        compile(&bad_uri),
        Err(CompileError::Config(ConfigError::InvalidBaseUri(_)))
    ));

    let mut bad_org = config(fixture("missing.csv"), "../htan", dir.path());
    bad_org.base_uri = "https://example.org/m/".to_string();
    assert!(matches!(
        compile(&bad_org),
        Err(CompileError::Config(ConfigError::InvalidOrg(_)))
    ));

    let mut escaping = config(fixture("missing.csv"), "htan", dir.path());
    escaping.subset_name = Some("../../etc/evil".to_string());
    assert!(matches!(
        compile(&escaping),
        Err(CompileError::Config(ConfigError::InvalidSubsetName(_)))
    ));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

    let mut duplicate = config(fixture("missing.csv"), "htan", dir.path());
    duplicate.nodes = vec!["Study".to_string(), "Study".to_string()];
    assert!(matches!(
        compile(&duplicate),
        Err(CompileError::Config(ConfigError::DuplicateNode(_)))
    ));
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        compile(&config(fixture("missing.csv"), "htan", dir.path())),
        Err(CompileError::Source(SourceError::Io { .. }))
    ));
}
