use pixel_sprite_studio::{
    parse_tag_text, ClickOutcome, ModalAnchor, Placement, TagCatalog, TagRect, TagSelection,
    Viewport, DEFAULT_TAG,
};
use std::{collections::HashSet, sync::Arc};

fn catalog() -> Arc<TagCatalog> {
    TagCatalog::builtin().expect("builtin catalog parses")
}

fn click(selection: &mut TagSelection, catalog: &TagCatalog, name: &str) -> ClickOutcome {
    let tag = catalog.get(name).expect("tag exists");
    selection.click(catalog, tag, TagRect::default(), Viewport::default())
}

fn figure_count(selection: &TagSelection, catalog: &TagCatalog) -> usize {
    selection
        .names()
        .iter()
        .filter(|name| catalog.is_figure(name))
        .count()
}

#[test]
fn starts_with_full_body_shot() {
    let selection = TagSelection::default();
    assert_eq!(selection.names(), [DEFAULT_TAG]);
    assert_eq!(selection.text(), DEFAULT_TAG);
}

#[test]
fn starts_from_previous_text() {
    let selection = TagSelection::new("이순신, 검");
    assert_eq!(selection.names(), ["이순신", "검"]);
    assert_eq!(selection.text(), "이순신, 검");
}

#[test]
fn clicking_toggles_non_figure_tags() {
    let catalog = catalog();
    let mut selection = TagSelection::default();

    assert_eq!(click(&mut selection, &catalog, "검"), ClickOutcome::Added);
    assert_eq!(selection.text(), "전신샷, 검");

    assert_eq!(click(&mut selection, &catalog, "전신샷"), ClickOutcome::Deselected);
    assert_eq!(selection.text(), "검");
}

#[test]
fn figure_click_opens_prompt_without_changing_selection() {
    let catalog = catalog();
    let mut selection = TagSelection::default();

    assert_eq!(click(&mut selection, &catalog, "세종대왕"), ClickOutcome::Prompted);
    assert_eq!(selection.names(), [DEFAULT_TAG]);

    let prompt = selection.pending().expect("prompt open");
    assert_eq!(prompt.figure, "세종대왕");
    assert!(prompt.recommendations.contains(&"곤룡포".to_string()));
}

#[test]
fn confirm_adds_figure_and_recommendations() {
    let catalog = catalog();
    let mut selection = TagSelection::new("검");

    click(&mut selection, &catalog, "세종대왕");
    assert!(selection.confirm(&catalog));

    assert_eq!(
        selection.names(),
        [
            "검",
            "세종대왕",
            "왕",
            "조선",
            "곤룡포",
            "익선관",
            "왕좌",
            "책",
            "글쓰는",
            "한국사"
        ]
    );
    assert!(selection.pending().is_none());
    assert!(!selection.confirm(&catalog));
}

#[test]
fn cancel_adds_only_the_figure() {
    let catalog = catalog();
    let mut selection = TagSelection::default();

    click(&mut selection, &catalog, "이순신");
    assert!(selection.cancel(&catalog));

    assert_eq!(selection.names(), [DEFAULT_TAG, "이순신"]);
    assert_eq!(selection.text(), "전신샷, 이순신");
}

#[test]
fn second_figure_evicts_the_first() {
    let catalog = catalog();
    let mut selection = TagSelection::default();

    click(&mut selection, &catalog, "이순신");
    selection.cancel(&catalog);
    click(&mut selection, &catalog, "세종대왕");
    selection.confirm(&catalog);

    assert!(!selection.contains("이순신"));
    assert!(selection.contains("세종대왕"));
    assert_eq!(figure_count(&selection, &catalog), 1);

    click(&mut selection, &catalog, "Tutankhamun");
    selection.cancel(&catalog);
    assert_eq!(figure_count(&selection, &catalog), 1);
    assert!(selection.contains("Tutankhamun"));
}

#[test]
fn text_edits_rederive_the_selection() {
    let catalog = catalog();
    let mut selection = TagSelection::default();

    selection.set_text("이순신,  검 , a stormy sea, 검");
    assert_eq!(selection.names(), ["이순신", "검", "a stormy sea"]);
    assert_eq!(selection.text(), "이순신,  검 , a stormy sea, 검");

    click(&mut selection, &catalog, "검");
    assert_eq!(selection.text(), "이순신, a stormy sea");
}

#[test]
fn text_and_selection_stay_consistent() {
    let catalog = catalog();
    let mut selection = TagSelection::default();

    for name in ["검", "갑옷", "전신샷", "검", "곤룡포", "갑옷"] {
        click(&mut selection, &catalog, name);

        let from_text: HashSet<String> = parse_tag_text(selection.text()).into_iter().collect();
        let from_set: HashSet<String> = selection.names().iter().cloned().collect();
        assert_eq!(from_text, from_set);
    }
}

#[test]
fn prompt_goes_below_a_tag_near_the_top() {
    let anchor = ModalAnchor::near(
        TagRect {
            left: 500.0,
            top: 100.0,
            width: 80.0,
            height: 30.0,
        },
        Viewport {
            width: 1200.0,
            height: 800.0,
        },
    );

    assert_eq!(anchor.placement, Placement::Below);
    assert!((anchor.y - 142.0).abs() < f64::EPSILON);
    assert!((anchor.x - 540.0).abs() < f64::EPSILON);
}

#[test]
fn prompt_flips_above_a_tag_near_the_bottom() {
    let anchor = ModalAnchor::near(
        TagRect {
            left: 500.0,
            top: 700.0,
            width: 80.0,
            height: 30.0,
        },
        Viewport {
            width: 1200.0,
            height: 800.0,
        },
    );

    assert_eq!(anchor.placement, Placement::Above);
    assert!((anchor.y - 688.0).abs() < f64::EPSILON);
}

#[test]
fn prompt_is_clamped_into_the_viewport() {
    let viewport = Viewport {
        width: 1000.0,
        height: 400.0,
    };

    let left_edge = ModalAnchor::near(
        TagRect {
            left: 0.0,
            top: 100.0,
            width: 40.0,
            height: 20.0,
        },
        viewport,
    );
    assert!((left_edge.x - 204.0).abs() < f64::EPSILON);
    // Not enough room below and less room above: stays below, pushed up.
    assert_eq!(left_edge.placement, Placement::Below);
    assert!((left_edge.y - 96.0).abs() < f64::EPSILON);

    let right_edge = ModalAnchor::near(
        TagRect {
            left: 980.0,
            top: 300.0,
            width: 20.0,
            height: 20.0,
        },
        viewport,
    );
    assert!((right_edge.x - 796.0).abs() < f64::EPSILON);
    assert_eq!(right_edge.placement, Placement::Above);
    assert!((right_edge.y - 304.0).abs() < f64::EPSILON);
}
