//! Namespaces used by CellDL metadata, and CURIE helpers.

use super::NamedNode;

pub const CELLDL_URI: &str = "http://celldl.org/ontologies/celldl#";

pub const BG_URI: &str = "https://bg-rdf.org/ontologies/bondgraph#";
pub const BGF_URI: &str = "https://bg-rdf.org/ontologies/bondgraph-framework#";
pub const CDT_URI: &str = "https://w3id.org/cdt/";
pub const TPL_URI: &str = "https://bg-rdf.org/templates/";

pub const DCT_URI: &str = "http://purl.org/dc/terms/";
pub const OWL_URI: &str = "http://www.w3.org/2002/07/owl#";
pub const RDF_URI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_URI: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const SVG_URI: &str = "http://www.w3.org/2000/svg/";
pub const XSD_URI: &str = "http://www.w3.org/2001/XMLSchema#";

/// Prefixes recognised in CURIEs, in lookup order.
const DECLARED_NAMESPACES: [(&str, &str); 11] = [
    ("celldl", CELLDL_URI),
    ("bg", BG_URI),
    ("bgf", BGF_URI),
    ("cdt", CDT_URI),
    ("tpl", TPL_URI),
    ("dcterms", DCT_URI),
    ("owl", OWL_URI),
    ("rdf", RDF_URI),
    ("rdfs", RDFS_URI),
    ("svg", SVG_URI),
    ("xsd", XSD_URI),
];

/// A namespace IRI from which terms are minted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    uri: String,
}

impl Namespace {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// Returns the term `local` in this namespace.
    pub fn uri(&self, local: &str) -> NamedNode {
        NamedNode::new(format!("{}{local}", self.uri))
    }

    /// The namespace IRI itself.
    pub fn base(&self) -> &str {
        &self.uri
    }
}

macro_rules! namespace_fn {
    ($($(#[$meta:meta])* $name:ident => $uri:expr),+ $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $name() -> Namespace {
                Namespace::new($uri)
            }
        )+
    };
}

namespace_fn! {
    /// The CellDL vocabulary.
    celldl => CELLDL_URI,
    bg => BG_URI,
    bgf => BGF_URI,
    cdt => CDT_URI,
    tpl => TPL_URI,
    /// Dublin Core terms.
    dct => DCT_URI,
    owl => OWL_URI,
    rdf => RDF_URI,
    rdfs => RDFS_URI,
    xsd => XSD_URI,
}

/// Expands a CURIE with a declared prefix to a full IRI.
///
/// Anything else is returned unchanged.
///
/// ```
/// # use celldl::metadata::namespaces::expand_curie;
/// assert_eq!(
///     expand_curie("celldl:Component"),
///     "http://celldl.org/ontologies/celldl#Component"
/// );
/// assert_eq!(expand_curie("unknown:x"), "unknown:x");
/// ```
pub fn expand_curie(curie: &str) -> String {
    if let Some((prefix, local)) = curie.split_once(':') {
        if let Some((_, uri)) = DECLARED_NAMESPACES.iter().find(|(p, _)| *p == prefix) {
            return format!("{uri}{local}");
        }
    }
    curie.to_string()
}

/// Abbreviates an IRI in a declared namespace to a CURIE.
///
/// IRIs outside every declared namespace are returned unchanged.
pub fn get_curie(uri: &str) -> String {
    DECLARED_NAMESPACES
        .iter()
        .find_map(|(prefix, ns)| {
            uri.strip_prefix(ns)
                .map(|local| format!("{prefix}:{local}"))
        })
        .unwrap_or_else(|| uri.to_string())
}

/// Returns the local part of a term (IRI or CURIE) within `namespace`.
///
/// Terms outside the namespace are returned unchanged.
pub fn curie_suffix(namespace: &Namespace, term: &str) -> String {
    let full = expand_curie(term);
    match full.strip_prefix(namespace.base()) {
        Some(local) => local.to_string(),
        None => term.to_string(),
    }
}

/// The fragment of an IRI, after its last `#`; the whole IRI if it has none.
pub fn fragment(uri: &str) -> &str {
    uri.rsplit_once('#').map_or(uri, |(_, fragment)| fragment)
}
