//! Ordering of assembled parameter sets.

use std::collections::BTreeMap;

use crate::key::ID_FIELD;

/// Sort key derived from a record's write sequence number.
///
/// A missing or non-numeric `id` maps to `i64::MIN`, so records written
/// outside the current path sort ahead of everything else instead of failing
/// the whole query.
pub fn id_sort_key(fields: &BTreeMap<String, String>) -> i64 {
	fields.get(ID_FIELD).and_then(|id| id.parse().ok()).unwrap_or(i64::MIN)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fields_with_id(id: &str) -> BTreeMap<String, String> {
		BTreeMap::from([(ID_FIELD.to_string(), id.to_string())])
	}

	#[test]
	fn numeric_ids_sort_by_value() {
		assert!(id_sort_key(&fields_with_id("2")) < id_sort_key(&fields_with_id("10")));
	}

	#[test]
	fn negative_ids_parse() {
		assert_eq!(id_sort_key(&fields_with_id("-3")), -3);
	}

	#[test]
	fn missing_id_sorts_lowest() {
		assert_eq!(id_sort_key(&BTreeMap::new()), i64::MIN);
	}

	#[test]
	fn non_numeric_id_sorts_lowest() {
		assert_eq!(id_sort_key(&fields_with_id("forty-two")), i64::MIN);
		assert_eq!(id_sort_key(&fields_with_id("")), i64::MIN);
	}
}
