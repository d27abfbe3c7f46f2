use std::fs;

use goenrich::{
    AbundanceMatrix, Alternative, Annotation, AnnotationTable, Aspect, AspectFilter,
    EnrichmentEngine, EnrichmentError, GoFileSource, InMemorySource, TermHierarchy,
    TransformConfig,
};
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const PROTEINS: [&str; 20] = [
    "P10809", "P35527", "Q9UMS4", "P35637", "P07437", "Q86UX7", "Q8N766", "P52907", "Q9NV31",
    "P50570", "Q9BZJ0", "Q9GZM5", "P08758", "Q9BRU9", "Q8NBJ7", "Q15532", "Q14241", "Q14562",
    "Q9NZM5", "P52926",
];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn generate_proteins(seed: u64) -> AbundanceMatrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let values = Array2::from_shape_fn((PROTEINS.len(), 3), |_| {
        rng.gen_range(100_000..1_000_000) as f64
    });
    AbundanceMatrix::new(
        PROTEINS.iter().map(|p| p.to_string()).collect(),
        vec!["Sample 1".into(), "Sample 2".into(), "Sample 3".into()],
        values,
    )
    .unwrap()
}

fn cc(accession: &str, id: &str, name: &str) -> Annotation {
    Annotation::new(
        accession.to_string(),
        id.to_string(),
        Aspect::CellularComponent,
        name.to_string(),
    )
}

/// Five proteins in the cytoplasm, the rest spread over nuclear terms
fn generate_annotations() -> AnnotationTable {
    let terms = [
        ("GO:0005737", "cytoplasm"),
        ("GO:0005634", "nucleus"),
        ("GO:0005654", "nucleoplasm"),
        ("GO:0000791", "euchromatin"),
    ];
    PROTEINS
        .iter()
        .enumerate()
        .map(|(i, accession)| {
            let (id, name) = if i < 5 { terms[0] } else { terms[1 + i % 3] };
            cc(accession, id, name)
        })
        .collect()
}

fn nuclear_hierarchy() -> TermHierarchy {
    let mut hierarchy = TermHierarchy::default();
    hierarchy.add_child("GO:0005634", "GO:0005654");
    hierarchy.add_child("GO:0005654", "GO:0000791");
    hierarchy
}

#[test]
fn test_single_term_subset() {
    init_logger();
    let engine = EnrichmentEngine::builder()
        .go_subset(vec!["cytoplasm".to_string()])
        .build();
    let results = engine
        .run_with(&generate_proteins(1), generate_annotations(), None)
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results.terms[0].id, "GO:0005737");
    assert_eq!(results.samples.len(), 3);
    for p in results.pvalues.iter() {
        assert!((0.0..=1.0).contains(p));
    }
}

#[test]
fn test_single_term_without_background() {
    init_logger();
    let annotations = AnnotationTable::for_term(
        PROTEINS[..5].iter().copied(),
        Aspect::CellularComponent,
        "cytoplasm",
        Some("GO:0005737"),
    );
    let engine = EnrichmentEngine::builder()
        .go_subset(vec!["cytoplasm".to_string()])
        .build();
    let results = engine
        .run_with(&generate_proteins(2), annotations, None)
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results.unannotated, 15);
    for p in results.pvalues.iter() {
        assert!((0.0..=1.0).contains(p));
    }
}

#[test]
fn test_subset_terms_only() {
    init_logger();
    let subset = ["nucleus", "nucleoplasm", "lysosome", "cytoplasm"]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();
    let engine = EnrichmentEngine::builder()
        .go_subset(subset.clone())
        .aggregate_terms(false)
        .build();
    let results = engine
        .run_with(&generate_proteins(3), generate_annotations(), None)
        .unwrap();

    assert_eq!(results.len(), 3);
    assert!(results.terms.iter().all(|t| subset.contains(&t.name)));
}

#[test]
fn test_full_enrichment() {
    init_logger();
    let results = EnrichmentEngine::default()
        .run(&generate_proteins(4), &InMemorySource::new(generate_annotations()))
        .unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(results.unannotated, 0);
    for p in results.pvalues.iter() {
        assert!((0.0..=1.0).contains(p));
    }
}

#[test]
fn test_aggregation_changes_results() {
    init_logger();
    let subset = vec!["nucleus".to_string(), "cytoplasm".to_string()];
    let source = InMemorySource::new(generate_annotations()).with_hierarchy(nuclear_hierarchy());
    let proteins = generate_proteins(5);

    let flat = EnrichmentEngine::builder()
        .go_subset(subset.clone())
        .aggregate_terms(false)
        .correction(TransformConfig::Identity)
        .build()
        .run(&proteins, &source)
        .unwrap();
    let aggregated = EnrichmentEngine::builder()
        .go_subset(subset)
        .correction(TransformConfig::Identity)
        .build()
        .run(&proteins, &source)
        .unwrap();

    // nucleus absorbs nucleoplasm and euchromatin through the hierarchy
    assert_eq!(flat.unannotated, 10);
    assert_eq!(aggregated.unannotated, 0);
    assert_ne!(flat.pvalues, aggregated.pvalues);
}

#[test]
fn test_cyclic_hierarchy_fails() {
    init_logger();
    let mut hierarchy = nuclear_hierarchy();
    hierarchy.add_child("GO:0000791", "GO:0005634");
    let engine = EnrichmentEngine::builder()
        .go_subset(vec!["nucleus".to_string()])
        .build();
    let result = engine.run_with(&generate_proteins(6), generate_annotations(), Some(&hierarchy));
    assert!(matches!(result, Err(EnrichmentError::CycleDetected(_))));
}

#[test]
fn test_less_mirrors_negated_greater() {
    init_logger();
    let proteins = generate_proteins(7);
    let less = EnrichmentEngine::builder()
        .alternative(Alternative::Less)
        .build()
        .run_with(&proteins, generate_annotations(), None)
        .unwrap();
    let negated = EnrichmentEngine::builder()
        .desc(false)
        .build()
        .run_with(&proteins, generate_annotations(), None)
        .unwrap();
    assert_eq!(less.terms, negated.terms);
    for (a, b) in less.pvalues.iter().zip(negated.pvalues.iter()) {
        approx::assert_relative_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn test_invalid_arguments() {
    assert!(matches!(
        "sideways".parse::<Alternative>(),
        Err(EnrichmentError::InvalidArgument(_))
    ));
    assert!(matches!(
        "xx".parse::<AspectFilter>(),
        Err(EnrichmentError::InvalidArgument(_))
    ));
}

const OBO: &str = "format-version: 1.2

[Term]
id: GO:0005575
name: cellular_component

[Term]
id: GO:0005634
name: nucleus
is_a: GO:0005575 ! cellular_component

[Term]
id: GO:0005654
name: nucleoplasm
is_a: GO:0005634 ! nucleus

[Term]
id: GO:0005737
name: cytoplasm
is_a: GO:0005575 ! cellular_component
";

fn write_cache(dir: &std::path::Path) {
    fs::create_dir_all(dir.join("ontologies")).unwrap();
    fs::create_dir_all(dir.join("annotations")).unwrap();
    fs::write(dir.join("ontologies").join("go-basic.obo"), OBO).unwrap();

    let mut gaf = String::from("!gaf-version: 2.2\n");
    for (i, accession) in PROTEINS.iter().enumerate() {
        let go_id = match i % 4 {
            0 => "GO:0005737",
            1 => "GO:0005634",
            _ => "GO:0005654",
        };
        gaf.push_str(&format!(
            "UniProtKB\t{accession}\tSYM{i}\tlocated_in\t{go_id}\tPMID:1\tIDA\t\tC\tprotein {i}\t\tprotein\ttaxon:9606\t20240101\tUniProt\t\t\n"
        ));
    }
    // a molecular function annotation that the aspect filter removes
    gaf.push_str("UniProtKB\tP10809\tSYM0\tenables\tGO:0005198\tPMID:1\tIDA\t\tF\tprotein 0\t\tprotein\ttaxon:9606\t20240101\tUniProt\t\t\n");
    fs::write(dir.join("annotations").join("goa_human.gaf"), gaf).unwrap();
}

#[test]
fn test_go_file_source() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    write_cache(dir.path());
    let source = GoFileSource::new(dir.path(), "human").unwrap();

    let engine = EnrichmentEngine::builder()
        .aspect("cc".parse().unwrap())
        .go_subset(vec!["nucleus".to_string(), "cytoplasm".to_string()])
        .build();
    let results = engine.run(&generate_proteins(8), &source).unwrap();

    let names = results
        .terms
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["nucleus", "cytoplasm"]);
    // nucleoplasm proteins count towards the nucleus
    assert_eq!(results.unannotated, 0);

    let mut buffer = Vec::new();
    results.write_tsv(&mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.starts_with("term_id\tterm_name\taspect\tSample 1\tSample 2\tSample 3\n"));
}
