use crate::{Tag, TagCatalog};

/// Companion tags suggested when `tag` is selected.
///
/// Only figures have recommendations. A figure's curated list wins over its
/// roles and eras; era-group suggestions and the nationality topic are always
/// added. The result keeps insertion order and holds no duplicates.
#[must_use]
pub fn lookup_recommendations(catalog: &TagCatalog, tag: &Tag) -> Vec<String> {
    if !tag.is_figure() {
        return Vec::new();
    }

    let mut recommendations = Recommendations::default();

    let context = catalog.figure_context(&tag.name);
    if let Some(context) = context {
        recommendations.extend(&context.recommendations);
    }
    if recommendations.is_empty() {
        if let Some(context) = context {
            recommendations.extend(&context.role);
            recommendations.extend(&context.era);
        }
    }

    if let Some(era_group) = &tag.era_group {
        recommendations.extend(catalog.era_group_suggestions(era_group));
    }

    if let Some(nationality) = tag.nationality {
        recommendations.push(nationality.topic_tag());
    }

    recommendations.0
}

#[derive(Default)]
struct Recommendations(Vec<String>);

impl Recommendations {
    fn push(&mut self, name: &str) {
        if !self.0.iter().any(|existing| existing == name) {
            self.0.push(name.to_string());
        }
    }

    fn extend<'a>(&mut self, names: impl IntoIterator<Item = &'a String>) {
        for name in names {
            self.push(name);
        }
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
