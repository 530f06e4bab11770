/// Resource a seminar page reads its semester from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceLocator {
    /// `data/current.json`, used by the site's landing page.
    Current,
    /// `data/<slug>.json`, used by `semesters/<slug>.html`.
    Semester(String),
}

impl ResourceLocator {
    pub fn resource_name(&self) -> &str {
        match self {
            ResourceLocator::Current => "current",
            ResourceLocator::Semester(slug) => slug,
        }
    }
}

/// Whether `name` can be used as a single file name and URL path segment.
pub fn is_safe_slug(name: &str) -> bool {
    !name.is_empty()
        && !name.contains("..")
        && !name.contains(['/', '\\', ':'])
}

/// Map a page path to the semester resource it displays.
///
/// `…/semesters/<slug>.html` reads `<slug>`; every other path reads `current`.
pub fn resolve_data_source(current_path: &str) -> ResourceLocator {
    const MARKER: &str = "semesters/";
    for (pos, _) in current_path.match_indices(MARKER) {
        let rest = &current_path[pos + MARKER.len()..];
        let segment = rest.split('/').next().unwrap_or_default();
        if let Some(end) = segment.rfind(".html") {
            let slug = &segment[..end];
            if !slug.is_empty() {
                return ResourceLocator::Semester(slug.to_string());
            }
        }
    }
    ResourceLocator::Current
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semester_page_maps_to_its_slug() {
        assert_eq!(
            resolve_data_source("/semesters/fall-2024.html"),
            ResourceLocator::Semester("fall-2024".into())
        );
        assert_eq!(
            resolve_data_source("/seminar/semesters/spring-2023.html"),
            ResourceLocator::Semester("spring-2023".into())
        );
    }

    #[test]
    fn other_paths_map_to_current() {
        assert_eq!(resolve_data_source("/"), ResourceLocator::Current);
        assert_eq!(resolve_data_source("/index.html"), ResourceLocator::Current);
        assert_eq!(
            resolve_data_source("/past-seminars.html"),
            ResourceLocator::Current
        );
    }

    #[test]
    fn semesters_directory_without_page_maps_to_current() {
        assert_eq!(resolve_data_source("/semesters/"), ResourceLocator::Current);
        assert_eq!(
            resolve_data_source("/semesters/fall-2024/index.htm"),
            ResourceLocator::Current
        );
        assert_eq!(resolve_data_source("semesters/.html"), ResourceLocator::Current);
    }

    #[test]
    fn slugs_must_stay_in_one_segment() {
        assert!(is_safe_slug("fall-2024"));
        assert!(is_safe_slug("semesters-index"));
        for bad in ["", "../../pwned", "a/b", r"a\b", "https://evil.example/x", "c:", ".."] {
            assert!(!is_safe_slug(bad), "{bad:?} accepted");
        }
    }

    #[test]
    fn resource_names() {
        assert_eq!(ResourceLocator::Current.resource_name(), "current");
        assert_eq!(
            ResourceLocator::Semester("fall-2024".into()).resource_name(),
            "fall-2024"
        );
    }
}
