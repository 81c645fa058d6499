use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LocationType {
    Game,
    Social,
    External,
    Unknown,
}

fn is_service_host(host: &str) -> bool {
    if host == "krunker.io" {
        return true;
    }
    // Single-label subdomains only (comp.krunker.io etc.).
    match host.strip_suffix(".krunker.io") {
        Some(label) => !label.is_empty() && !label.contains('.'),
        None => false,
    }
}

fn classify_service_path(path: &str) -> LocationType {
    if path.starts_with("/social") || path.starts_with("/editor") {
        LocationType::Social
    } else {
        LocationType::Game
    }
}

fn classify_absolute(url: &Url) -> LocationType {
    if !matches!(url.scheme(), "http" | "https") {
        return LocationType::Unknown;
    }
    match url.host_str() {
        Some(host) if is_service_host(host) => classify_service_path(url.path()),
        Some(_) => LocationType::External,
        None => LocationType::Unknown,
    }
}

/// Classifies a URL string. Total over arbitrary input: anything that is not
/// a well-formed absolute http(s) URL and does not look like a bare
/// `krunker.io/...` path is `Unknown`. Query string and fragment never
/// influence the result.
pub(crate) fn location_type(raw: &str) -> LocationType {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return LocationType::Unknown;
    }

    match Url::parse(trimmed) {
        Ok(url) => classify_absolute(&url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            // Scheme-less game shorthand ("krunker.io/?game=..") still counts.
            match Url::parse(&format!("https://{trimmed}")) {
                Ok(url) if url.host_str().is_some_and(is_service_host) => {
                    classify_service_path(url.path())
                }
                _ => LocationType::Unknown,
            }
        }
        Err(_) => LocationType::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_urls_classify_as_game() {
        assert_eq!(location_type("https://krunker.io/"), LocationType::Game);
        assert_eq!(
            location_type("https://krunker.io/?game=FRA:abc123"),
            LocationType::Game
        );
        assert_eq!(
            location_type("https://comp.krunker.io/"),
            LocationType::Game
        );
    }

    #[test]
    fn social_and_editor_paths_classify_as_social() {
        assert_eq!(
            location_type("https://krunker.io/social.html"),
            LocationType::Social
        );
        assert_eq!(
            location_type("https://krunker.io/editor.html"),
            LocationType::Social
        );
        assert_eq!(
            location_type("https://krunker.io/social.html?p=profile&q=x#frag"),
            LocationType::Social
        );
    }

    #[test]
    fn other_hosts_classify_as_external() {
        assert_eq!(
            location_type("https://example.com/"),
            LocationType::External
        );
        assert_eq!(
            location_type("http://discord.gg/invite"),
            LocationType::External
        );
        // Multi-label or look-alike hosts are not the service.
        assert_eq!(
            location_type("https://a.b.krunker.io/"),
            LocationType::External
        );
        assert_eq!(
            location_type("https://notkrunker.io/"),
            LocationType::External
        );
    }

    #[test]
    fn query_and_fragment_never_change_the_category() {
        for (base, with_extras) in [
            ("https://krunker.io/", "https://krunker.io/?x=1#y"),
            (
                "https://example.com/page",
                "https://example.com/page?x=1#y",
            ),
        ] {
            assert_eq!(location_type(base), location_type(with_extras));
        }
    }

    #[test]
    fn malformed_and_empty_inputs_are_unknown() {
        assert_eq!(location_type(""), LocationType::Unknown);
        assert_eq!(location_type("   "), LocationType::Unknown);
        assert_eq!(location_type("not a url"), LocationType::Unknown);
        assert_eq!(location_type("ftp://krunker.io/"), LocationType::Unknown);
        assert_eq!(location_type("javascript:alert(1)"), LocationType::Unknown);
        assert_eq!(location_type("/social.html"), LocationType::Unknown);
    }

    #[test]
    fn bare_service_paths_are_recognized() {
        assert_eq!(location_type("krunker.io/"), LocationType::Game);
        assert_eq!(
            location_type("krunker.io/social.html"),
            LocationType::Social
        );
        assert_eq!(location_type("example.com/"), LocationType::Unknown);
    }
}
