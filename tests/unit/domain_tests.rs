use wpt_import::{ImportError, extract_domain};

#[test]
fn test_plain_host() {
    let host = extract_domain("http://example.com").unwrap();
    assert_eq!(host.domain, "example.com");
    assert_eq!(host.site_name, "example");
}

#[test]
fn test_www_label_is_skipped() {
    let host = extract_domain("http://www.example.com").unwrap();
    assert_eq!(host.domain, "www.example.com");
    assert_eq!(host.site_name, "example");
}

#[test]
fn test_path_port_and_case() {
    let host = extract_domain("  HTTPS://Shop.Example.COM:8080/catalog?page=2 ").unwrap();
    assert_eq!(host.domain, "shop.example.com");
    assert_eq!(host.site_name, "shop");
}

#[test]
fn test_single_label_host() {
    let host = extract_domain("http://localhost/").unwrap();
    assert_eq!(host.domain, "localhost");
    assert_eq!(host.site_name, "localhost");
}

#[test]
fn test_invalid_hosts() {
    for host in [
        "",
        "example.com",
        "ftp://example.com",
        "http://",
        "http://exa mple.com",
        "http://-example.com",
    ] {
        match extract_domain(host) {
            Err(ImportError::InvalidHostUrl { host: reported }) => assert_eq!(reported, host),
            other => panic!("Expected InvalidHostUrl for {:?}, got {:?}", host, other),
        }
    }
}
