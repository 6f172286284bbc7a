use crate::TagCatalog;

/// Build the generation prompt from selected tag names.
///
/// Names with a prompt hint become `"<name> (<hint>)"`. Everything else,
/// including free text that is not in the catalog, is used as is. Order and
/// duplicates are preserved.
#[must_use]
pub fn build_prompt<S: AsRef<str>>(catalog: &TagCatalog, names: &[S]) -> String {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            match catalog.get(name).and_then(|tag| tag.prompt_hint.as_deref()) {
                Some(hint) => format!("{name} ({hint})"),
                None => name.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split the comma-separated tag field into trimmed, non-empty names.
#[must_use]
pub fn parse_tag_text(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
