use preview_core::{is_previewable, Url};

fn page() -> Url {
    Url::parse("https://docs.example.com/guide/intro/").unwrap()
}

#[test]
fn relative_link_to_other_page_is_previewable() {
    assert!(is_previewable("../x/", &page()));
    assert!(is_previewable("/reference/api/", &page()));
    assert!(is_previewable("https://docs.example.com/guide/x/", &page()));
}

#[test]
fn other_host_is_rejected() {
    assert!(!is_previewable("https://github.com/org/repo", &page()));
    assert!(!is_previewable("//cdn.example.com/guide/x/", &page()));
}

#[test]
fn same_path_is_rejected() {
    assert!(!is_previewable("./", &page()));
    assert!(!is_previewable("/guide/intro/", &page()));
    assert!(!is_previewable("/guide/intro/?tab=2", &page()));
    assert!(!is_previewable("/guide/intro/#install", &page()));
}

#[test]
fn fragment_href_is_rejected() {
    assert!(!is_previewable("#install", &page()));
    assert!(!is_previewable("#", &page()));
}

#[test]
fn malformed_or_empty_href_is_rejected() {
    assert!(!is_previewable("", &page()));
    assert!(!is_previewable("http://[::1", &page()));
    assert!(!is_previewable("javascript:void(0)", &page()));
}
