//! Route labels for request spans and metrics.

use uuid::Uuid;

/// Replace UUID path segments with `{id}` so label cardinality stays bounded.
pub(super) fn route_template(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut template = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            template.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            template.push_str("{id}");
        } else {
            template.push_str(segment);
        }
    }

    template
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_collapsed() {
        let path = format!("/admin/products/{}/restore", Uuid::now_v7());

        assert_eq!(route_template(&path), "/admin/products/{id}/restore");
    }

    #[test]
    fn plain_paths_are_unchanged() {
        assert_eq!(route_template("/"), "/");
        assert_eq!(route_template("/checkout"), "/checkout");
        assert_eq!(route_template("/products"), "/products");
    }
}
