//! Route templates for span names and metric labels.

use uuid::Uuid;

/// Replace identifier segments with `{id}` so `/orders/<uuid>/cancel` and
/// every other order share one label.
pub(super) fn template(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if Uuid::try_parse(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_segments_are_collapsed() {
        let order = Uuid::now_v7();
        let variant = Uuid::now_v7();

        assert_eq!(template(&format!("/orders/{order}/cancel")), "/orders/{id}/cancel");
        assert_eq!(
            template(&format!("/products/{order}/variants/{variant}")),
            "/products/{id}/variants/{id}"
        );
    }

    #[test]
    fn literal_paths_are_kept() {
        assert_eq!(template("/cart/summary"), "/cart/summary");
        assert_eq!(template("/orders/my-orders"), "/orders/my-orders");
        assert_eq!(template("/"), "/");
    }
}
