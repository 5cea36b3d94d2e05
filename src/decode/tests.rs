//! Tests for decode module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

const REF: &str = "https://example.org/ValueSet/";

fn bundle_body() -> String {
    json!({
        "resourceType": "Bundle",
        "id": "page-1",
        "type": "searchset",
        "total": 25,
        "link": [
            {"relation": "self", "url": "https://example.org/ValueSet/"},
            {"relation": "next", "url": "https://example.org/ValueSet/?_getpages=abc&_getpagesoffset=10"}
        ],
        "entry": [
            {
                "fullUrl": "https://example.org/ValueSet/vs-1",
                "resource": {"id": "vs-1", "name": "One", "title": "First", "publisher": "CDC", "date": "2019-05-01"}
            },
            {
                "fullUrl": "https://example.org/ValueSet/vs-2",
                "resource": {"id": "vs-2", "name": "Two", "title": "Second", "publisher": "CDC", "date": "2019-05-02"}
            }
        ]
    })
    .to_string()
}

#[test]
fn test_decode_bundle() {
    let page = decode_page(REF, &bundle_body());

    assert_eq!(page.reference, REF);
    assert_eq!(page.total, Some(25));
    assert_eq!(page.links.len(), 2);
    assert_eq!(
        page.next_link(),
        Some("https://example.org/ValueSet/?_getpages=abc&_getpagesoffset=10")
    );
    assert_eq!(page.len(), 2);
    assert_eq!(page.records[0].id, "vs-1");
    assert_eq!(page.last_id(), Some("vs-2"));
}

#[test]
fn test_decode_preserves_entry_verbatim() {
    let page = decode_page(REF, &bundle_body());
    assert_eq!(
        page.records[1].detail["resource"]["title"],
        json!("Second")
    );
    assert_eq!(
        page.records[1].detail["fullUrl"],
        json!("https://example.org/ValueSet/vs-2")
    );
}

#[test]
fn test_decode_capitalized_fields() {
    let body = json!({
        "Total": 3,
        "Link": [{"Relation": "next", "Url": "/ValueSet?page=2"}],
        "Entry": []
    })
    .to_string();

    let page = decode_page(REF, &body);
    assert_eq!(page.total, Some(3));
    assert_eq!(page.next_link(), Some("/ValueSet?page=2"));
    assert!(page.is_empty());
}

#[test]
fn test_decode_bundle_without_entries() {
    let page = decode_page(REF, r#"{"resourceType": "Bundle", "total": 0}"#);
    assert!(page.is_empty());
    assert_eq!(page.total, Some(0));
    assert!(page.links.is_empty());
}

#[test_case("" ; "empty body")]
#[test_case("   \n" ; "whitespace body")]
#[test_case("<html>Service Unavailable</html>" ; "html body")]
#[test_case("[1, 2, 3]" ; "json array")]
#[test_case(r#"{"total": 5, "entry": ["# ; "truncated json")]
#[test_case(r#"{"total": "many"}"# ; "wrong field type")]
fn test_undecodable_body_is_empty_page(body: &str) {
    let page = decode_page(REF, body);
    assert!(page.is_empty());
    assert_eq!(page.reference, REF);
    assert_eq!(page.total, None);
}

#[test]
fn test_try_decode_reports_reason() {
    let err = try_decode_page(REF, "").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("empty"));

    let err = try_decode_page(REF, "oops").unwrap_err();
    assert!(err.to_string().contains("not a JSON object"));
}
