//! Turtle serialization of mapped models.

use schema2rdf::emitter::write_model;
use schema2rdf::model::iri::{IriMinter, NodeUri, TermUri};
use schema2rdf::model::record::{KeyRelation, KeyRole, TripleRecord, VocabRef};
use schema2rdf::pipeline::mapper::MappedModel;

fn minter() -> IriMinter {
    IriMinter::new("https://metadata.example/model/", "model")
}

fn term(node: &str, attribute: &str) -> TermUri {
    TermUri {
        node: node.to_string(),
        attribute: attribute.to_string(),
    }
}

fn node(segment: &str) -> NodeUri {
    NodeUri(segment.to_string())
}

fn triple(node_segment: &str, attribute: &str, label: &str, description: &str) -> TripleRecord {
    TripleRecord {
        term: term(node_segment, attribute),
        label: label.to_string(),
        description: description.to_string(),
        node: node(node_segment),
        value_type: None,
        required_by: None,
        is_key: false,
        has_enum: None,
        maps_to: Vec::new(),
    }
}

fn render(model: &MappedModel) -> (String, u64) {
    let mut out = Vec::new();
    let count = write_model(model, &minter(), &mut out).unwrap();
    (String::from_utf8(out).unwrap(), count)
}

fn study_model() -> MappedModel {
    let mut study_id = triple("study", "study_id", "studyId", "Unique study identifier");
    study_id.value_type = Some("string".into());
    study_id.required_by = Some(node("study"));
    study_id.is_key = true;

    let mut study_name = triple("study", "study_name", "studyName", "Name of the study");
    study_name.maps_to = vec![VocabRef {
        namespace: "NCIT".into(),
        code: "C68631".into(),
    }];

    MappedModel {
        nodes: vec![node("study")],
        triples: vec![study_id, study_name],
        keys: vec![
            KeyRelation {
                role: KeyRole::Primary,
                node: node("study"),
                term: term("study", "study_id"),
            },
            KeyRelation {
                role: KeyRole::Primary,
                node: node("study"),
                term: term("study", "study_name"),
            },
        ],
    }
}

#[test]
fn full_document() {
    let (ttl, count) = render(&study_model());
    let expected = "\
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
    skos:exactMatch NCIT:C68631 .

model:study model:primaryKey study:study_id .
";
    assert_eq!(ttl, expected);
    assert_eq!(count, 11);
}

#[test]
fn minimal_block_has_three_lines() {
    let model = MappedModel {
        nodes: vec![node("biospecimen")],
        triples: vec![triple(
            "biospecimen",
            "specimen_type_other",
            "specimenTypeOther",
            "Free-text specimen type",
        )],
        keys: Vec::new(),
    };
    let (ttl, count) = render(&model);
    assert!(ttl.ends_with(
        "biospecimen:specimen_type_other rdfs:label \"specimenTypeOther\" ;\n    \
         dcterms:description \"Free-text specimen type\" ;\n    \
         model:node model:biospecimen .\n"
    ));
    assert_eq!(count, 3);
}

#[test]
fn enum_clause_can_end_the_block() {
    let mut record = triple("biospecimen", "specimen_type", "specimenType", "Kind");
    record.has_enum = Some("['Blood', 'Tissue']".into());
    let model = MappedModel {
        nodes: vec![node("biospecimen")],
        triples: vec![record],
        keys: Vec::new(),
    };
    let (ttl, _) = render(&model);
    assert!(ttl.contains("    model:node model:biospecimen ;\n"));
    assert!(ttl.ends_with("    model:hasEnum \"['Blood', 'Tissue']\" .\n"));
}

#[test]
fn every_node_gets_a_prefix_once() {
    let model = MappedModel {
        nodes: vec![node("study"), node("individual"), node("study")],
        triples: vec![triple("study", "study_id", "studyId", "")],
        keys: Vec::new(),
    };
    let (ttl, _) = render(&model);
    let prefixes: Vec<_> = ttl.lines().filter(|l| l.starts_with("@prefix")).collect();
    assert_eq!(
        prefixes,
        vec![
            "@prefix dcterms: <http://purl.org/dc/terms/> .",
            "@prefix model: <https://metadata.example/model/> .",
            "@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .",
            "@prefix study: <https://metadata.example/model/study/> .",
            "@prefix individual: <https://metadata.example/model/individual/> .",
        ]
    );
    // No skos prefix without a mapping.
    assert!(!ttl.contains("skos"));
}

#[test]
fn foreign_key_terms_use_the_referenced_namespace() {
    let model = MappedModel {
        nodes: vec![node("participant")],
        triples: Vec::new(),
        keys: vec![KeyRelation {
            role: KeyRole::Foreign,
            node: node("participant"),
            term: term("study", "study_id"),
        }],
    };
    let (ttl, count) = render(&model);
    assert!(ttl.contains("@prefix study: <https://metadata.example/model/study/> .\n"));
    assert!(ttl.ends_with("model:participant model:foreignKey study:study_id .\n"));
    assert_eq!(count, 1);
}

#[test]
fn keys_without_identifier_tokens_are_skipped() {
    let model = MappedModel {
        nodes: vec![node("study")],
        triples: Vec::new(),
        keys: vec![KeyRelation {
            role: KeyRole::Primary,
            node: node("study"),
            term: term("study", "accession"),
        }],
    };
    let (ttl, count) = render(&model);
    assert!(!ttl.contains("primaryKey"));
    assert_eq!(count, 0);
}

#[test]
fn literals_are_escaped() {
    let model = MappedModel {
        nodes: vec![node("study")],
        triples: vec![triple("study", "notes", "notes", "Say \"hi\"\nthen C:\\path")],
        keys: Vec::new(),
    };
    let (ttl, _) = render(&model);
    assert!(ttl.contains("dcterms:description \"Say \\\"hi\\\"\\nthen C:\\\\path\" ;"));
}

#[test]
fn unwritable_names_fall_back_to_full_iris() {
    let mut record = triple("study", "âge", "âge", "");
    record.maps_to = vec![
        VocabRef {
            namespace: "NCIT".into(),
            code: "C12.3".into(),
        },
        VocabRef {
            namespace: "GO".into(),
            code: "0008150".into(),
        },
        VocabRef {
            namespace: "model".into(),
            code: "X1".into(),
        },
    ];
    let model = MappedModel {
        nodes: vec![node("study")],
        triples: vec![record],
        keys: Vec::new(),
    };
    let (ttl, _) = render(&model);
    assert!(ttl.contains("<https://metadata.example/model/study/%C3%A2ge> rdfs:label"));
    assert!(ttl.contains("skos:exactMatch <http://purl.obolibrary.org/obo/NCIT_C12.3> ;"));
    // Unregistered vocabularies get a namespace under the base URI.
    assert!(ttl.contains("@prefix GO: <https://metadata.example/model/ext/GO/> .\n"));
    assert!(ttl.contains("skos:exactMatch GO:0008150 ;"));
    // A prefix already bound to another namespace is never rebound.
    assert!(ttl.contains("skos:exactMatch <https://metadata.example/model/ext/model/X1> .\n"));
}

#[test]
fn vocabulary_spellings_share_one_prefix() {
    let mut upper = triple("study", "study_name", "studyName", "");
    upper.maps_to = vec![VocabRef {
        namespace: "NCIT".into(),
        code: "C1".into(),
    }];
    let mut lower = triple("study", "study_title", "studyTitle", "");
    lower.maps_to = vec![
        VocabRef {
            namespace: "ncit".into(),
            code: "C2".into(),
        },
        VocabRef {
            namespace: "Uberon".into(),
            code: "0000178".into(),
        },
    ];
    let model = MappedModel {
        nodes: vec![node("study")],
        triples: vec![upper, lower],
        keys: Vec::new(),
    };
    let (ttl, _) = render(&model);
    assert_eq!(ttl.matches("<http://purl.obolibrary.org/obo/NCIT_>").count(), 1);
    assert!(ttl.contains("@prefix NCIT: <http://purl.obolibrary.org/obo/NCIT_> .\n"));
    assert!(ttl.contains("skos:exactMatch NCIT:C1 .\n"));
    assert!(ttl.contains("skos:exactMatch NCIT:C2 ;\n"));
    assert!(ttl.contains("skos:exactMatch UBERON:0000178 .\n"));
    assert!(!ttl.contains("ncit:"));
}
