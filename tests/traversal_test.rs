use tourgroup::{Document, ElementCollection, Root};

const FAMILY: &str = r#"
    <div id="grandparent">
        <div id="parent">
            <div id="sibling1"></div>
            <div id="sibling2" class="tmp-c"></div>
            <div id="sibling3"></div>
            <div id="sibling4" class="stop"></div>
            <div id="sibling5"></div>
        </div>
    </div>
"#;

fn ids(collection: &ElementCollection<'_>) -> Vec<String> {
    collection.map(|n| n.attr("id").map(|v| v.to_string()).unwrap_or_default())
}

#[test]
fn selector_construction_is_document_ordered() {
    let doc = Document::parse(FAMILY);
    let divs = doc.at("#parent div").expect("valid selector");
    assert_eq!(
        ids(&divs),
        vec!["sibling1", "sibling2", "sibling3", "sibling4", "sibling5"]
    );
}

#[test]
fn falsy_and_root_inputs() {
    let doc = Document::parse(FAMILY);
    assert!(doc.at("").expect("empty input").is_empty());
    assert!(doc.at(None::<&str>).expect("none input").is_empty());

    let root = doc.at(Root).expect("root");
    assert_eq!(root.len(), 1);
    assert_eq!(root[0].id, doc.root().id);
}

#[test]
fn sequence_input_drops_duplicates() {
    let doc = Document::parse(FAMILY);
    let one = doc.at("#sibling1").expect("valid").first().expect("exists");
    let two = doc.at("#sibling2").expect("valid").first().expect("exists");

    let group = doc.at(vec![two, one, two]).expect("sequence");
    assert_eq!(ids(&group), vec!["sibling2", "sibling1"]);
}

#[test]
fn invalid_selector_is_an_error() {
    let doc = Document::parse(FAMILY);
    assert!(doc.at("div[").is_err());
    assert!(doc.at("#parent").expect("valid").children(Some(":::")).is_err());
}

#[test]
fn children_with_and_without_filter() {
    let doc = Document::parse(FAMILY);
    let parent = doc.at("#parent").expect("valid");

    assert_eq!(parent.children(None).expect("valid").len(), 5);
    assert_eq!(ids(&parent.children(Some(".tmp-c")).expect("valid")), vec!["sibling2"]);
}

#[test]
fn closest_includes_self() {
    let doc = Document::parse(FAMILY);
    let s2 = doc.at("#sibling2").expect("valid");

    assert_eq!(ids(&s2.closest(".tmp-c").expect("valid")), vec!["sibling2"]);
    assert_eq!(ids(&s2.closest("#grandparent").expect("valid")), vec!["grandparent"]);
    assert!(s2.closest("table").expect("valid").is_empty());
}

#[test]
fn descendants_from_overlapping_members_appear_once() {
    let doc = Document::parse(FAMILY);
    let outer = doc.at("#grandparent, #parent").expect("valid");
    assert_eq!(outer.descendants("div").expect("valid").len(), 6);
}

#[test]
fn next_is_a_single_filtered_step() {
    let doc = Document::parse(FAMILY);
    let s1 = doc.at("#sibling1").expect("valid");

    assert_eq!(ids(&s1.next(None).expect("valid")), vec!["sibling2"]);
    assert_eq!(ids(&s1.next(Some(".tmp-c")).expect("valid")), vec!["sibling2"]);
    assert!(s1.next(Some(".stop")).expect("valid").is_empty());
}

#[test]
fn next_until_stops_before_match() {
    let doc = Document::parse(FAMILY);
    let s1 = doc.at("#sibling1").expect("valid");

    assert_eq!(
        ids(&s1.next_until(Some(".stop")).expect("valid")),
        vec!["sibling2", "sibling3"]
    );
    assert_eq!(s1.next_until(None).expect("valid").len(), 4);
}

#[test]
fn prev_until_lists_nearest_first() {
    let doc = Document::parse(FAMILY);
    let s5 = doc.at("#sibling5").expect("valid");

    assert!(s5.prev_until(Some(".stop")).expect("valid").is_empty());
    assert_eq!(
        ids(&doc.at("#sibling3").expect("valid").prev_until(None).expect("valid")),
        vec!["sibling2", "sibling1"]
    );
    assert_eq!(ids(&s5.prev(Some(".stop")).expect("valid")), vec!["sibling4"]);
}

#[test]
fn parent_of_siblings_is_shared() {
    let doc = Document::parse(FAMILY);
    let kids = doc.at("#parent > div").expect("valid");
    assert_eq!(ids(&kids.parent()), vec!["parent"]);
}

#[test]
fn parent_until_excludes_match() {
    let doc = Document::parse(FAMILY);
    let s3 = doc.at("#sibling3").expect("valid");

    assert_eq!(ids(&s3.parent_until(Some("#grandparent")).expect("valid")), vec!["parent"]);

    let to_top = s3.parent_until(None).expect("valid");
    let tags = to_top.map(|n| n.node_name().map(|t| t.to_string()).unwrap_or_default());
    assert_eq!(tags.last().map(String::as_str), Some("html"));
}

#[test]
fn siblings_exclude_self_and_keep_first_occurrence_order() {
    let doc = Document::parse(r#"<div><p id="a"></p><p id="b"></p><p id="c"></p></div>"#);
    let ab = doc.at("#a, #b").expect("valid");
    assert_eq!(ids(&ab.siblings(None).expect("valid")), vec!["b", "c", "a"]);
}

#[test]
fn empty_collections_propagate() {
    let doc = Document::parse(FAMILY);
    let none = doc.at("#missing").expect("valid");

    for selector in [None, Some("div")] {
        assert!(none.children(selector).expect("valid").is_empty());
        assert!(none.next(selector).expect("valid").is_empty());
        assert!(none.next_until(selector).expect("valid").is_empty());
        assert!(none.prev(selector).expect("valid").is_empty());
        assert!(none.prev_until(selector).expect("valid").is_empty());
        assert!(none.parent_until(selector).expect("valid").is_empty());
        assert!(none.siblings(selector).expect("valid").is_empty());
    }
    assert!(none.closest("div").expect("valid").is_empty());
    assert!(none.descendants("div").expect("valid").is_empty());
    assert!(none.exclude("div").expect("valid").is_empty());
    assert!(none.has("div").expect("valid").is_empty());
    assert!(none.parent().is_empty());
    assert!(none.next_element_sibling().is_empty());
    assert!(none.previous_element_sibling().is_empty());
    assert!(none.first().is_none());
    assert!(none.last().is_none());
}

#[test]
fn empty_collections_ignore_malformed_selectors() {
    let doc = Document::parse(FAMILY);
    let none = doc.empty();

    assert!(none.children(Some("li[")).expect("never tested").is_empty());
    assert!(none.next(Some("li[")).expect("never tested").is_empty());
    assert!(none.closest("li[").expect("never tested").is_empty());
    assert!(none.exclude("li[").expect("never tested").is_empty());

    let last = doc.at("#sibling5").expect("valid");
    assert!(last.next(Some("li[")).expect("no sibling to test").is_empty());
    assert!(last.prev(Some("li[")).is_err());
}

#[test]
fn filtering_helpers() {
    let doc = Document::parse(
        r#"<div id="parent">
             <div id="sibling1"><div class="tmp-c"></div></div>
             <div id="sibling2"></div>
             <div id="sibling3"><div class="tmp-c"></div></div>
           </div>"#,
    );
    let divs = doc.at("div").expect("valid");

    assert_eq!(divs.exclude(".tmp-c").expect("valid").len(), 4);
    assert_eq!(
        ids(&divs.has(".tmp-c").expect("valid")),
        vec!["parent", "sibling1", "sibling3"]
    );

    let kids = doc.at("#parent > div").expect("valid");
    assert_eq!(kids.first().and_then(|n| n.attr("id")).as_deref(), Some("sibling1"));
    assert_eq!(kids.last().and_then(|n| n.attr("id")).as_deref(), Some("sibling3"));
}

#[test]
fn children_of_disjoint_members_keep_member_order() {
    let doc = Document::parse(
        r#"<ul id="x"><li id="x1"></li><li id="x2"></li></ul><ul id="y"><li id="y1"></li></ul>"#,
    );
    let lists = doc.at("#y, #x").expect("valid");
    assert_eq!(ids(&lists), vec!["x", "y"]);
    assert_eq!(ids(&lists.children(None).expect("valid")), vec!["x1", "x2", "y1"]);
}

#[test]
fn wrapping_a_collection_is_identity() {
    let doc = Document::parse(FAMILY);
    let divs = doc.at("div").expect("valid");
    let storage = divs.as_slice().as_ptr();
    let again = doc.at(divs).expect("passthrough");
    assert_eq!(again.as_slice().as_ptr(), storage);
    assert_eq!(again.len(), 7);
}
