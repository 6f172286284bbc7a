use pixel_sprite_studio::{
    build_prompt, lookup_recommendations, parse_tag_text, Nationality, TagCatalog, TagCategory,
};

fn catalog() -> std::sync::Arc<TagCatalog> {
    TagCatalog::builtin().expect("builtin catalog parses")
}

#[test]
fn builtin_catalog_has_every_category() {
    let catalog = catalog();
    for category in TagCategory::ORDER {
        assert!(
            catalog.by_category(category).next().is_some(),
            "{category:?} has no tags"
        );
    }
    assert_eq!(catalog.get("곤룡포").map(|tag| tag.category), Some(TagCategory::Item));
    assert!(catalog.is_figure("이순신"));
    assert!(!catalog.is_figure("검"));
}

#[test]
fn tags_are_listed_by_category_then_korean_figures_first() {
    let catalog = catalog();
    let tags = catalog.tags();

    let positions: Vec<usize> = tags
        .iter()
        .map(|tag| {
            TagCategory::ORDER
                .iter()
                .position(|c| *c == tag.category)
                .expect("known category")
        })
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] <= pair[1]));

    assert_eq!(tags[0].name, "단군왕검");
    let first_world = tags
        .iter()
        .position(|tag| tag.nationality == Some(Nationality::World))
        .expect("world figures exist");
    assert!(tags[..first_world]
        .iter()
        .all(|tag| tag.nationality == Some(Nationality::Korean)));
}

#[test]
fn grouped_items_follow_sub_category_order() {
    let catalog = catalog();
    let groups = catalog.grouped_items();

    assert_eq!(groups[0].0, "Korean_Clothing");
    assert!(groups[0].1.iter().any(|tag| tag.name == "곤룡포"));
    assert!(groups
        .iter()
        .flat_map(|(_, tags)| tags)
        .all(|tag| tag.category == TagCategory::Item));
}

#[test]
fn grouped_figures_split_by_nationality_and_era() {
    let catalog = catalog();
    let groups = catalog.grouped_figures();

    let joseon = &groups[&Nationality::Korean]["Joseon"];
    assert!(joseon.iter().any(|tag| tag.name == "이순신"));
    assert!(groups[&Nationality::World].contains_key("Ancient_Egypt"));
}

#[test]
fn curated_recommendations_come_first() {
    let catalog = catalog();
    let sejong = catalog.get("세종대왕").expect("tag exists");

    assert_eq!(
        lookup_recommendations(&catalog, sejong),
        vec!["왕", "조선", "곤룡포", "익선관", "왕좌", "책", "글쓰는", "한국사"]
    );
}

#[test]
fn figure_without_context_gets_era_group_and_topic() {
    let catalog = catalog();
    let yi = catalog.get("이순신").expect("tag exists");

    assert_eq!(lookup_recommendations(&catalog, yi), vec!["조선", "한국사"]);
}

#[test]
fn world_figures_get_world_history_topic() {
    let catalog = catalog();
    let tut = catalog.get("Tutankhamun").expect("tag exists");

    let recommendations = lookup_recommendations(&catalog, tut);
    assert_eq!(recommendations.last().map(String::as_str), Some("세계사"));
    assert!(recommendations.contains(&"고대 이집트".to_string()));
    assert!(!recommendations.contains(&"한국사".to_string()));
}

#[test]
fn roles_and_eras_fill_in_without_curated_list() {
    let catalog = TagCatalog::from_json(
        r#"{
            "tags": [
                { "name": "강감찬", "category": "figure", "nationality": "Korean", "era_group": "Goryeo" },
                { "name": "장군", "category": "role" },
                { "name": "고려", "category": "era" }
            ],
            "figures": [
                { "name": "강감찬", "era": ["고려"], "role": ["장군"] }
            ],
            "era_groups": [
                { "era_group": "Goryeo", "tags": ["고려"] }
            ]
        }"#,
    )
    .expect("catalog parses");
    let figure = catalog.get("강감찬").expect("tag exists");

    assert_eq!(
        lookup_recommendations(&catalog, figure),
        vec!["장군", "고려", "한국사"]
    );
}

#[test]
fn only_figures_have_recommendations() {
    let catalog = catalog();
    let sword = catalog.get("검").expect("tag exists");

    assert!(lookup_recommendations(&catalog, sword).is_empty());
}

#[test]
fn recommendations_are_deterministic() {
    let catalog = catalog();
    for tag in catalog.by_category(TagCategory::Figure) {
        let first = lookup_recommendations(&catalog, tag);
        let second = lookup_recommendations(&catalog, tag);
        assert_eq!(first, second);

        let mut unique = first.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), first.len(), "{} has duplicates", tag.name);
    }
}

#[test]
fn prompt_uses_hints_when_present() {
    let catalog = catalog();

    assert_eq!(build_prompt(&catalog, &["이순신", "검"]), "이순신, 검");
    assert_eq!(
        build_prompt(&catalog, &["곤룡포"]),
        "곤룡포 (Gollyongpo, the formal robe for kings of the Joseon Dynasty)"
    );
}

#[test]
fn prompt_passes_free_text_through_in_order() {
    let catalog = catalog();

    assert_eq!(
        build_prompt(&catalog, &["a knight in the rain", "검", "검"]),
        "a knight in the rain, 검, 검"
    );
    assert_eq!(build_prompt::<&str>(&catalog, &[]), "");
}

#[test]
fn tag_text_is_split_and_trimmed() {
    assert_eq!(
        parse_tag_text(" 이순신 ,검,, , 전신샷 "),
        vec!["이순신", "검", "전신샷"]
    );
    assert!(parse_tag_text(" , ").is_empty());
}
