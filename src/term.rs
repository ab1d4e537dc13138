//! Phenotype terms and per-gene term collections
use std::fmt::Display;

/// Separator between joined term names or ids in flat output fields
const JOIN_SEPARATOR: &str = ", ";

/// A single Human Phenotype Ontology term
///
/// Combines the term identifier (e.g. `HP:0001250`) with its human
/// readable name (e.g. `Seizure`). Both values are kept verbatim as they
/// appear in the association source, no validation against the ontology
/// is performed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HpoTerm {
    id: String,
    name: String,
}

impl HpoTerm {
    /// Initializes a new term from its id and name
    pub fn new(id: &str, name: &str) -> HpoTerm {
        HpoTerm {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    /// The term identifier, e.g. `HP:0001250`
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The term name, e.g. `Seizure`
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for HpoTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id, self.name)
    }
}

/// A set of [`HpoTerm`]s associated with one gene
///
/// Each term can occur only once in the set. The terms are kept sorted by
/// id so that iteration order is deterministic for a given content,
/// regardless of insertion order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TermSet {
    terms: Vec<HpoTerm>,
}

impl TermSet {
    /// Constructs a new, empty [`TermSet`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`TermSet`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the set contains no terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the number of terms in the set
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Adds a new [`HpoTerm`] to the set
    ///
    /// Returns whether the term was newly inserted. That is:
    ///
    /// - If the set did not previously contain this term, true is returned.
    /// - If the set already contained this term, false is returned.
    pub fn insert(&mut self, term: HpoTerm) -> bool {
        match self.terms.binary_search(&term) {
            Ok(_) => false,
            Err(idx) => {
                self.terms.insert(idx, term);
                true
            }
        }
    }

    /// Returns `true` if the set contains the term
    pub fn contains(&self, term: &HpoTerm) -> bool {
        self.terms.binary_search(term).is_ok()
    }

    /// Returns an iterator of the terms inside the set
    pub fn iter(&self) -> std::slice::Iter<'_, HpoTerm> {
        self.terms.iter()
    }

    /// All term names joined into one field
    ///
    /// The n-th name refers to the same term as the n-th id of
    /// [`TermSet::joined_ids`].
    pub fn joined_names(&self) -> String {
        self.terms
            .iter()
            .map(HpoTerm::name)
            .collect::<Vec<&str>>()
            .join(JOIN_SEPARATOR)
    }

    /// All term ids joined into one field
    pub fn joined_ids(&self) -> String {
        self.terms
            .iter()
            .map(HpoTerm::id)
            .collect::<Vec<&str>>()
            .join(JOIN_SEPARATOR)
    }
}

impl<'a> IntoIterator for &'a TermSet {
    type Item = &'a HpoTerm;
    type IntoIter = std::slice::Iter<'a, HpoTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl FromIterator<HpoTerm> for TermSet {
    fn from_iter<I: IntoIterator<Item = HpoTerm>>(iter: I) -> Self {
        let mut set = TermSet::new();
        for term in iter {
            set.insert(term);
        }
        set
    }
}
