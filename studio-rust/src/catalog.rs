use crate::StudioResult;
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::{Arc, OnceLock},
};

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.json");

/// Sub-category used for items that do not declare one.
pub const DEFAULT_ITEM_SUB_CATEGORY: &str = "General_Misc";
/// Era group used for figures that do not declare one.
pub const UNCATEGORIZED_ERA_GROUP: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
    Figure,
    Role,
    Era,
    Setting,
    Action,
    Item,
    Style,
    Topic,
}

impl TagCategory {
    /// Display order of the category sections.
    pub const ORDER: [Self; 8] = [
        Self::Figure,
        Self::Role,
        Self::Era,
        Self::Setting,
        Self::Action,
        Self::Item,
        Self::Style,
        Self::Topic,
    ];

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Figure => "인물 (Figure)",
            Self::Role => "역할 (Role)",
            Self::Era => "시대 (Era)",
            Self::Setting => "배경 (Setting)",
            Self::Action => "행동 (Action)",
            Self::Item => "아이템 (Item)",
            Self::Style => "스타일 (Style)",
            Self::Topic => "주제 (Topic)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Nationality {
    Korean,
    World,
}

impl Nationality {
    /// Topic tag every figure of this nationality is recommended.
    #[must_use]
    pub fn topic_tag(self) -> &'static str {
        match self {
            Self::Korean => "한국사",
            Self::World => "세계사",
        }
    }

    /// Era groups in chronological order.
    #[must_use]
    pub fn era_order(self) -> &'static [&'static str] {
        match self {
            Self::Korean => &[
                "Gojoseon",
                "ThreeKingdoms_Goguryeo",
                "ThreeKingdoms_Baekje",
                "ThreeKingdoms_Silla",
                "UnifiedSilla",
                "LaterThreeKingdoms",
                "Goryeo",
                "Joseon",
                "Modern_Korea",
            ],
            Self::World => &[
                "Ancient_Egypt",
                "Ancient_China",
                "Ancient_Greece",
                "Ancient_Rome",
                "Medieval",
                "Renaissance",
                "Enlightenment",
                "Modern_World",
            ],
        }
    }
}

/// A selectable prompt descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub category: TagCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// English text appended to the name when the prompt is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<Nationality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub era_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
}

impl Tag {
    #[must_use]
    pub fn is_figure(&self) -> bool {
        self.category == TagCategory::Figure
    }
}

/// Eras and roles a figure is associated with, plus an optional curated list
/// of companion tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureContext {
    #[serde(default)]
    pub era: Vec<String>,
    #[serde(default)]
    pub role: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Deserialize)]
struct CatalogFile {
    tags: Vec<Tag>,
    #[serde(default)]
    figures: Vec<FigureEntry>,
    #[serde(default)]
    era_groups: Vec<EraGroupEntry>,
}

#[derive(Deserialize)]
struct FigureEntry {
    name: String,
    #[serde(flatten)]
    context: FigureContext,
}

#[derive(Deserialize)]
struct EraGroupEntry {
    era_group: String,
    tags: Vec<String>,
}

/// Static tag dataset with name, figure and era-group lookups.
///
/// Tags are kept in listing order: by category section, figures Korean first
/// then chronologically by era group, everything else by name.
#[derive(Debug, Clone, Default)]
pub struct TagCatalog {
    tags: Vec<Tag>,
    by_name: HashMap<String, usize>,
    figures: HashMap<String, FigureContext>,
    era_groups: HashMap<String, Vec<String>>,
}

impl TagCatalog {
    /// The catalog shipped with the crate, parsed on first use.
    pub fn builtin() -> StudioResult<Arc<Self>> {
        static CATALOG: OnceLock<Arc<TagCatalog>> = OnceLock::new();

        if let Some(catalog) = CATALOG.get() {
            return Ok(catalog.clone());
        }
        let catalog = Arc::new(Self::from_json(BUILTIN_CATALOG)?);
        Ok(CATALOG.get_or_init(|| catalog).clone())
    }

    pub fn from_json(json: &str) -> StudioResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;

        let figures = file
            .figures
            .into_iter()
            .map(|entry| (entry.name, entry.context))
            .collect();
        let era_groups = file
            .era_groups
            .into_iter()
            .map(|entry| (entry.era_group, entry.tags))
            .collect();

        Ok(Self::new(file.tags, figures, era_groups))
    }

    #[must_use]
    pub fn new(
        mut tags: Vec<Tag>,
        figures: HashMap<String, FigureContext>,
        era_groups: HashMap<String, Vec<String>>,
    ) -> Self {
        tags.sort_by(listing_order);
        let by_name = tags
            .iter()
            .enumerate()
            .map(|(index, tag)| (tag.name.clone(), index))
            .collect();

        Self {
            tags,
            by_name,
            figures,
            era_groups,
        }
    }

    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.by_name.get(name).map(|&index| &self.tags[index])
    }

    #[must_use]
    pub fn is_figure(&self, name: &str) -> bool {
        self.get(name).is_some_and(Tag::is_figure)
    }

    #[must_use]
    pub fn figure_context(&self, name: &str) -> Option<&FigureContext> {
        self.figures.get(name)
    }

    #[must_use]
    pub fn era_group_suggestions(&self, era_group: &str) -> &[String] {
        self.era_groups.get(era_group).map_or(&[], Vec::as_slice)
    }

    pub fn by_category(&self, category: TagCategory) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(move |tag| tag.category == category)
    }

    /// Figures grouped by nationality, then by era group. A figure without a
    /// nationality is listed as `World`.
    #[must_use]
    pub fn grouped_figures(&self) -> BTreeMap<Nationality, BTreeMap<String, Vec<&Tag>>> {
        let mut groups: BTreeMap<Nationality, BTreeMap<String, Vec<&Tag>>> = BTreeMap::new();
        for tag in self.by_category(TagCategory::Figure) {
            let nationality = tag.nationality.unwrap_or(Nationality::World);
            let era_group = tag
                .era_group
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED_ERA_GROUP.to_string());
            groups
                .entry(nationality)
                .or_default()
                .entry(era_group)
                .or_default()
                .push(tag);
        }
        groups
    }

    /// Items grouped by sub-category, in [`ITEM_SUB_CATEGORY_ORDER`].
    #[must_use]
    pub fn grouped_items(&self) -> Vec<(&str, Vec<&Tag>)> {
        let mut groups: Vec<(&str, Vec<&Tag>)> = Vec::new();
        for tag in self.by_category(TagCategory::Item) {
            let sub_category = tag
                .sub_category
                .as_deref()
                .unwrap_or(DEFAULT_ITEM_SUB_CATEGORY);
            match groups.iter_mut().find(|(name, _)| *name == sub_category) {
                Some((_, tags)) => tags.push(tag),
                None => groups.push((sub_category, vec![tag])),
            }
        }
        groups.sort_by_key(|(name, _)| {
            ITEM_SUB_CATEGORY_ORDER
                .iter()
                .position(|candidate| candidate == name)
                .unwrap_or(ITEM_SUB_CATEGORY_ORDER.len())
        });
        groups
    }
}

pub const ITEM_SUB_CATEGORY_ORDER: [&str; 14] = [
    "Korean_Clothing",
    "Korean_Props",
    "Roman",
    "Egyptian",
    "Greek",
    "Japanese",
    "Scottish",
    "Indian",
    "European_Medieval",
    "European_Renaissance",
    "General_Weaponry",
    "General_Academic",
    "General_Royal",
    "General_Misc",
];

#[must_use]
pub fn era_display_name(era_group: &str) -> &str {
    match era_group {
        "Gojoseon" => "고조선",
        "ThreeKingdoms_Goguryeo" => "삼국시대 - 고구려",
        "ThreeKingdoms_Baekje" => "삼국시대 - 백제",
        "ThreeKingdoms_Silla" => "삼국시대 - 신라",
        "UnifiedSilla" => "통일신라",
        "LaterThreeKingdoms" => "후삼국시대",
        "Goryeo" => "고려",
        "Joseon" => "조선",
        "Modern_Korea" | "Modern_World" => "근현대",
        "Ancient_Egypt" => "고대 이집트",
        "Ancient_China" => "고대 중국",
        "Ancient_Greece" => "고대 그리스",
        "Ancient_Rome" => "고대 로마",
        "Medieval" => "중세",
        "Renaissance" => "르네상스",
        "Enlightenment" => "계몽주의",
        UNCATEGORIZED_ERA_GROUP => "기타",
        other => other,
    }
}

#[must_use]
pub fn item_sub_category_display_name(sub_category: &str) -> &str {
    match sub_category {
        "Korean_Clothing" => "한국 전통 의복 (Korean Clothing)",
        "Korean_Props" => "한국 전통 소품 (Korean Props)",
        "Roman" => "고대 로마 (Ancient Rome)",
        "Egyptian" => "고대 이집트 (Ancient Egypt)",
        "Greek" => "고대 그리스 (Ancient Greece)",
        "Japanese" => "일본 (Japan)",
        "Scottish" => "스코틀랜드 (Scotland)",
        "Indian" => "인도 (India)",
        "European_Medieval" => "유럽 중세 (Medieval Europe)",
        "European_Renaissance" => "유럽 르네상스 (Renaissance Europe)",
        "General_Weaponry" => "일반 무기류 (General Weaponry)",
        "General_Academic" => "일반 학술/예술 (General Academic/Art)",
        "General_Royal" => "일반 왕실 (General Royal)",
        DEFAULT_ITEM_SUB_CATEGORY => "기타 (Miscellaneous)",
        other => other,
    }
}

fn listing_order(a: &Tag, b: &Tag) -> Ordering {
    let category = a.category.cmp(&b.category);
    if category != Ordering::Equal {
        return category;
    }

    if a.is_figure() && b.is_figure() {
        // Korean first; a missing nationality sorts with World.
        let nationality_a = a.nationality.unwrap_or(Nationality::World);
        let nationality_b = b.nationality.unwrap_or(Nationality::World);
        if nationality_a != nationality_b {
            return nationality_a.cmp(&nationality_b);
        }

        let order = nationality_a.era_order();
        let position = |tag: &Tag| {
            tag.era_group
                .as_deref()
                .and_then(|group| order.iter().position(|candidate| *candidate == group))
                .unwrap_or(order.len())
        };
        let era = position(a).cmp(&position(b));
        if era != Ordering::Equal {
            return era;
        }
    }

    a.name.cmp(&b.name)
}
