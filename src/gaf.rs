//! Reading protein annotations from GAF 2.x files.

use std::{collections::HashMap, fs::File, io::Read, path::Path};

use anyhow::{Context, Result};
use log::debug;

use crate::{
    annotation::{Annotation, AnnotationTable},
    config::{Aspect, AspectFilter},
};

const DB: usize = 0;
const ACCESSION: usize = 1;
const GO_ID: usize = 4;
const ASPECT: usize = 8;
const GENE_PRODUCT_FORM_ID: usize = 16;

pub fn read_gaf(
    path: &Path,
    names: &HashMap<String, String>,
    filter: AspectFilter,
) -> Result<AnnotationTable> {
    let file = File::open(path).with_context(|| format!("opening annotations {}", path.display()))?;
    parse_gaf(file, names, filter).with_context(|| format!("parsing {}", path.display()))
}

/// Parses GAF records into annotations
///
/// Rows from databases other than UniProtKB take their accession from the
/// `UniProtKB:<accession>` gene product form, and are skipped without one.
/// Terms missing from `names` are named by their id.
pub fn parse_gaf<R: Read>(
    reader: R,
    names: &HashMap<String, String>,
    filter: AspectFilter,
) -> Result<AnnotationTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'!'))
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut skipped = 0;
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading record {i}"))?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let aspect = field(ASPECT)
            .parse::<Aspect>()
            .with_context(|| format!("record {i} has an invalid aspect"))?;
        if !filter.accepts(aspect) {
            continue;
        }

        let accession = if field(DB) == "UniProtKB" {
            Some(field(ACCESSION))
        } else {
            field(GENE_PRODUCT_FORM_ID).strip_prefix("UniProtKB:")
        };
        let Some(accession) = accession.filter(|a| !a.is_empty()) else {
            skipped += 1;
            continue;
        };

        let go_id = field(GO_ID);
        let name = names.get(go_id).map_or(go_id, String::as_str);
        rows.push(Annotation::new(
            accession.to_string(),
            go_id.to_string(),
            aspect,
            name.to_string(),
        ));
    }

    if skipped > 0 {
        debug!("Skipped {skipped} annotations without a UniProtKB accession");
    }
    Ok(AnnotationTable::new(rows))
}
