use crate::model::DocumentRecord;

/// Records whose title contains `term`, ignoring case, in their original
/// order. An empty term matches everything.
pub fn filter_documents<'a>(
    documents: &'a [DocumentRecord],
    term: &str,
) -> impl Iterator<Item = &'a DocumentRecord> + 'a {
    let needle = term.to_lowercase();
    documents
        .iter()
        .filter(move |doc| needle.is_empty() || doc.title.to_lowercase().contains(&needle))
}
