//! Mount path construction.

/// Joins path pieces with `/`, collapsing repeated separators and dropping
/// a trailing one. The root is `/`.
pub(crate) fn join<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut path = String::new();
    for segment in parts.into_iter().flat_map(|p| p.split('/')).filter(|s| !s.is_empty()) {
        path.push('/');
        path.push_str(segment);
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}

/// Splits `/users/42.json` into (`/users/42`, `json`). Only the last segment
/// is considered, and dot-files such as `/.well-known` have no extension.
pub(crate) fn split_extension(path: &str) -> Option<(&str, &str)> {
    let last = path.rsplit('/').next()?;
    let dot = last.rfind('.')?;
    if dot == 0 || dot + 1 == last.len() {
        return None;
    }
    let cut = path.len() - last.len() + dot;
    Some((&path[..cut], &path[cut + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_prefix_version_and_path() {
        assert_eq!(join(["/", "v1", "users"]), "/v1/users");
        assert_eq!(join(["/api/", "v2", "/users/{id}/"]), "/api/v2/users/{id}");
        assert_eq!(join(["//api//", "", "users"]), "/api/users");
        assert_eq!(join(["/", "", ""]), "/");
    }

    #[test]
    fn splits_trailing_extension() {
        assert_eq!(split_extension("/v1/users.json"), Some(("/v1/users", "json")));
        assert_eq!(split_extension("/v1/users/a.b.xml"), Some(("/v1/users/a.b", "xml")));
        assert_eq!(split_extension("/v1.0/users"), None);
        assert_eq!(split_extension("/.well-known"), None);
        assert_eq!(split_extension("/users."), None);
    }
}
