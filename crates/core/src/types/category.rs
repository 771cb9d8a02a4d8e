//! Denormalized category snapshot served from the categories cache.

use serde::Serialize;

use super::id::CategoryId;

const DEFAULT_NAME: &str = "Untitled";
const DEFAULT_NAME_ARABIC: &str = "غير محدد";
const DEFAULT_DESCRIPTION: &str = "No description available.";
const DEFAULT_IMAGE: &str = "/static/images/default.png";

/// An immutable category record with every display field filled in.
///
/// Serializes with the field names the public categories API has always
/// used (`nameArabic`, `desc`, `img`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "nameArabic")]
    pub name_arabic: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(rename = "img")]
    pub image: String,
}

impl CategoryRecord {
    /// Build a record from nullable storage columns, substituting defaults.
    ///
    /// The Arabic name falls back to the English name before the generic
    /// placeholder.
    #[must_use]
    pub fn from_columns(
        id: CategoryId,
        name: Option<String>,
        name_arabic: Option<String>,
        description: Option<String>,
        image: Option<String>,
    ) -> Self {
        let name = non_blank(name);
        let name_arabic = non_blank(name_arabic)
            .or_else(|| name.clone())
            .unwrap_or_else(|| DEFAULT_NAME_ARABIC.to_owned());

        Self {
            id,
            name: name.unwrap_or_else(|| DEFAULT_NAME.to_owned()),
            name_arabic,
            description: non_blank(description).unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned()),
            image: non_blank(image).unwrap_or_else(|| DEFAULT_IMAGE.to_owned()),
        }
    }

    /// Synthetic record shown when storage is unreachable and nothing is cached.
    #[must_use]
    pub fn loading_placeholder() -> Self {
        Self {
            id: CategoryId::new(0),
            name: "Loading...".to_owned(),
            name_arabic: "جاري التحميل...".to_owned(),
            description: "Please wait".to_owned(),
            image: "/static/images/loading.gif".to_owned(),
        }
    }

    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.id.as_i32() == 0
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_substituted_for_missing_columns() {
        let record = CategoryRecord::from_columns(CategoryId::new(3), None, None, None, None);
        assert_eq!(record.name, "Untitled");
        assert_eq!(record.name_arabic, "غير محدد");
        assert_eq!(record.description, "No description available.");
        assert_eq!(record.image, "/static/images/default.png");
    }

    #[test]
    fn test_arabic_name_falls_back_to_english_name() {
        let record = CategoryRecord::from_columns(
            CategoryId::new(3),
            Some("Wood Coatings".to_owned()),
            Some("  ".to_owned()),
            Some("Varnish and stains".to_owned()),
            Some("/static/images/wood.png".to_owned()),
        );
        assert_eq!(record.name_arabic, "Wood Coatings");
        assert_eq!(record.description, "Varnish and stains");
        assert_eq!(record.image, "/static/images/wood.png");
    }

    #[test]
    fn test_placeholder_shape() {
        let record = CategoryRecord::loading_placeholder();
        assert!(record.is_placeholder());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["nameArabic"], "جاري التحميل...");
        assert_eq!(json["img"], "/static/images/loading.gif");
        assert_eq!(json["id"], 0);
    }
}
