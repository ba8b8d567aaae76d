use serde_json::Value;

/// Removes empty-string fields from each object nested in the payload, so
/// that blank form fields do not overwrite stored values.
///
/// `{ "post": { "title": "", "body": "foo" } }` becomes `{ "post": { "body": "foo" } }`.
/// Only the first level of nesting is touched.
pub fn remove_blanks(payload: &mut Value) {
	let Value::Object(payload) = payload else {
		return;
	};

	for value in payload.values_mut() {
		if let Value::Object(fields) = value {
			fields.retain(|_, field| !matches!(field, Value::String(s) if s.is_empty()));
		}
	}
}
