use crate::record::{Attribute, StructuredLog};

/// Fold whatever is left of a log after field extraction into a list of
/// [`Attribute`]s, ordered by key.
///
/// The order does not depend on how the map iterates, so the same input
/// always yields the same output bytes.
pub fn collect_attributes(log: StructuredLog) -> Vec<Attribute> {
    let mut attributes: Vec<Attribute> = log
        .into_iter()
        .map(|(key, val)| Attribute { key, val })
        .collect();
    attributes.sort_unstable_by(|a, b| a.key.cmp(&b.key));
    attributes
}
