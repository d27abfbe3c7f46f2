use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use log::info;

use crate::{
    annotation::AnnotationTable,
    config::AspectFilter,
    gaf::read_gaf,
    hierarchy::TermHierarchy,
    obo::{read_obo, Ontology},
};

/// Supplies the annotations and term hierarchy an enrichment run tests against
pub trait AnnotationSource {
    fn annotations(&self, aspect: AspectFilter) -> Result<AnnotationTable>;

    /// The parent to children term relationships, if the source knows them
    ///
    /// The hierarchy is shared, so repeated runs do not copy it.
    fn hierarchy(&self) -> Result<Option<Arc<TermHierarchy>>>;
}

/// Annotations and an optional hierarchy supplied directly by the caller
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    annotations: AnnotationTable,
    hierarchy: Option<Arc<TermHierarchy>>,
}
impl InMemorySource {
    pub fn new(annotations: AnnotationTable) -> Self {
        Self {
            annotations,
            hierarchy: None,
        }
    }

    pub fn with_hierarchy(mut self, hierarchy: impl Into<Arc<TermHierarchy>>) -> Self {
        self.hierarchy = Some(hierarchy.into());
        self
    }
}
impl AnnotationSource for InMemorySource {
    fn annotations(&self, aspect: AspectFilter) -> Result<AnnotationTable> {
        Ok(self.annotations.filter_aspect(aspect))
    }

    fn hierarchy(&self) -> Result<Option<Arc<TermHierarchy>>> {
        Ok(self.hierarchy.clone())
    }
}

/// Maps common species names onto their GO annotation file stems
pub fn annotation_stem(species: &str) -> String {
    let species = species.to_lowercase();
    match species.as_str() {
        "human" | "homo sapiens" => "goa_human".to_string(),
        "yeast" | "saccharomyces cerevisiae" => "sgd".to_string(),
        _ => species,
    }
}

/// Gene Ontology files already present in a local cache directory
///
/// Expects `<cache_dir>/ontologies/go-basic.obo` and
/// `<cache_dir>/annotations/<stem>.gaf`. Nothing is downloaded.
#[derive(Debug, Clone)]
pub struct GoFileSource {
    annotation_path: PathBuf,
    names: HashMap<String, String>,
    hierarchy: Arc<TermHierarchy>,
}
impl GoFileSource {
    pub fn new(cache_dir: &Path, species: &str) -> Result<Self> {
        let ontology_path = cache_dir.join("ontologies").join("go-basic.obo");
        let annotation_path = cache_dir
            .join("annotations")
            .join(format!("{}.gaf", annotation_stem(species)));

        info!("Loading ontology from {}", ontology_path.display());
        let Ontology { names, hierarchy } = read_obo(&ontology_path)?;
        Ok(Self {
            annotation_path,
            names,
            hierarchy: Arc::new(hierarchy),
        })
    }

    pub fn annotation_path(&self) -> &Path {
        &self.annotation_path
    }
}
impl AnnotationSource for GoFileSource {
    fn annotations(&self, aspect: AspectFilter) -> Result<AnnotationTable> {
        read_gaf(&self.annotation_path, &self.names, aspect)
    }

    fn hierarchy(&self) -> Result<Option<Arc<TermHierarchy>>> {
        Ok(Some(Arc::clone(&self.hierarchy)))
    }
}
