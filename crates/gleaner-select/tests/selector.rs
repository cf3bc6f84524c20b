//! Tests for selector lists and the default HTML selector.

use gleaner_select::{HtmlSelector, Response, Selector, compile};

const LISTING: &str = r#"<html><body>
<ul id="items">
  <li><a href="/p/1">First</a> <em>£10.50</em></li>
  <li><a href="/p/2">Second</a> <em>£7.25</em></li>
</ul>
</body></html>"#;

#[test]
fn builds_from_response_body() {
    let response = Response::new("http://example.com/list", LISTING);
    let sel = HtmlSelector::from_response(&response);
    let titles = sel.select("#items a::text").unwrap().extract();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[test]
fn list_regex_flattens_in_document_order() {
    let sel = HtmlSelector::from_text(LISTING);
    let prices = sel.select("em::text").unwrap();
    let re = compile(r"(\d+)\.(\d+)").unwrap();
    assert_eq!(prices.re(&re), vec!["10", "50", "7", "25"]);
    assert_eq!(prices.re_first(&re).as_deref(), Some("10"));
}

#[test]
fn indexed_access_into_matches_and_members() {
    let sel = HtmlSelector::from_text(LISTING);
    let prices = sel.select("em::text").unwrap();
    let re = compile(r"(\d+)\.(\d+)").unwrap();
    assert_eq!(prices.re_at(&re, 2).as_deref(), Some("7"));
    assert!(prices.re_at(&re, 4).is_none());
    assert_eq!(prices.extract_at(1).as_deref(), Some("£7.25"));
    assert!(prices.extract_at(2).is_none());
}

#[test]
fn rows_can_be_queried_for_their_cells() {
    let sel = HtmlSelector::from_text(
        "<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>",
    );
    let rows = sel.select("tr").unwrap();
    let second = rows.iter().nth(1).unwrap();
    assert_eq!(second.select("td::text").unwrap().extract(), vec!["c"]);
}

#[test]
fn empty_selection_has_no_first() {
    let sel = HtmlSelector::from_text(LISTING);
    let missing = sel.select("table td").unwrap();
    assert!(missing.is_empty());
    assert!(missing.extract_first().is_none());
}

#[test]
fn element_markup_snapshot() {
    let sel = HtmlSelector::from_text(LISTING);
    let first = sel.select("li").unwrap().extract_first().unwrap();
    insta::assert_snapshot!(first, @r#"<li><a href="/p/1">First</a> <em>£10.50</em></li>"#);
}
