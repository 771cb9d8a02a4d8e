//! Content rows as stored in `PostgreSQL`.
//!
//! Most text columns are nullable because rows were imported from the
//! legacy site; accessors return `""` for missing values so templates can
//! render them directly.

use serde::Serialize;
use sqlx::FromRow;

use noble_paints_core::{
    ApprovalId, CatalogId, CategoryId, CategoryRecord, CertificateId, DatasheetId,
    LocalizedContent, PostId, ProductId, SocialLinkId, UploadId,
};

fn text(value: Option<&String>) -> &str {
    value.map_or("", String::as_str)
}

fn lang_code(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

/// A category row with raw, possibly missing fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: Option<String>,
    pub name_arabic: Option<String>,
    pub description: Option<String>,
    pub img: Option<String>,
}

impl Category {
    #[must_use]
    pub fn name_text(&self) -> &str {
        text(self.name.as_ref())
    }

    #[must_use]
    pub fn name_arabic_text(&self) -> &str {
        text(self.name_arabic.as_ref())
    }

    #[must_use]
    pub fn description_text(&self) -> &str {
        text(self.description.as_ref())
    }

    #[must_use]
    pub fn image(&self) -> &str {
        text(self.img.as_ref())
    }
}

impl From<Category> for CategoryRecord {
    fn from(row: Category) -> Self {
        Self::from_columns(row.id, row.name, row.name_arabic, row.description, row.img)
    }
}

/// A product in one locale.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub img: Option<String>,
    pub name: String,
    #[serde(rename = "desc")]
    pub description: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub lang: Option<String>,
    /// Datasheet upload.
    pub datasheet: Option<UploadId>,
}

impl Product {
    #[must_use]
    pub fn image(&self) -> &str {
        text(self.img.as_ref())
    }

    #[must_use]
    pub fn description_text(&self) -> &str {
        text(self.description.as_ref())
    }

    #[must_use]
    pub fn category_name(&self) -> &str {
        text(self.category.as_ref())
    }

    #[must_use]
    pub fn country_name(&self) -> &str {
        text(self.country.as_ref())
    }

    #[must_use]
    pub fn lang_code(&self) -> &str {
        text(self.lang.as_ref())
    }
}

impl LocalizedContent for Product {
    fn content_id(&self) -> i32 {
        self.id.as_i32()
    }

    fn lang(&self) -> Option<&str> {
        lang_code(self.lang.as_ref())
    }
}


/// A downloadable catalog; the PDF lives in `uploads`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Catalog {
    pub id: CatalogId,
    pub img: Option<String>,
    pub name: String,
    pub link: Option<UploadId>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub lang: Option<String>,
}

impl Catalog {
    #[must_use]
    pub fn image(&self) -> &str {
        text(self.img.as_ref())
    }

    #[must_use]
    pub fn category_name(&self) -> &str {
        text(self.category.as_ref())
    }

    #[must_use]
    pub fn country_name(&self) -> &str {
        text(self.country.as_ref())
    }

    #[must_use]
    pub fn lang_code(&self) -> &str {
        text(self.lang.as_ref())
    }
}



/// A technical datasheet; `link` is an external URL.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Datasheet {
    pub id: DatasheetId,
    pub name: String,
    pub link: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub lang: Option<String>,
}

impl Datasheet {
    #[must_use]
    pub fn url(&self) -> &str {
        text(self.link.as_ref())
    }

    #[must_use]
    pub fn category_name(&self) -> &str {
        text(self.category.as_ref())
    }

    #[must_use]
    pub fn country_name(&self) -> &str {
        text(self.country.as_ref())
    }

    #[must_use]
    pub fn lang_code(&self) -> &str {
        text(self.lang.as_ref())
    }
}



/// A news item.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub description: Option<String>,
    /// Free-form display date as entered in the control panel.
    pub date: Option<String>,
    pub lang: Option<String>,
    pub img: Option<String>,
    pub category: Option<String>,
    pub views: i32,
}

impl Post {
    #[must_use]
    pub fn image(&self) -> &str {
        text(self.img.as_ref())
    }

    #[must_use]
    pub fn description_text(&self) -> &str {
        text(self.description.as_ref())
    }

    #[must_use]
    pub fn date_text(&self) -> &str {
        text(self.date.as_ref())
    }

    #[must_use]
    pub fn lang_code(&self) -> &str {
        text(self.lang.as_ref())
    }
}

/// A quality certificate.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Certificate {
    pub id: CertificateId,
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub img: Option<String>,
}

/// A regulatory approval. Same shape as [`Certificate`], separate table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Approval {
    pub id: ApprovalId,
    pub title: String,
    pub description: Option<String>,
    pub link: Option<String>,
    pub img: Option<String>,
}

macro_rules! document_accessors {
    ($ty:ty) => {
        impl $ty {
            #[must_use]
            pub fn image(&self) -> &str {
                text(self.img.as_ref())
            }

            #[must_use]
            pub fn url(&self) -> &str {
                text(self.link.as_ref())
            }

            #[must_use]
            pub fn description_text(&self) -> &str {
                text(self.description.as_ref())
            }
        }
    };
}

document_accessors!(Certificate);
document_accessors!(Approval);

/// A footer social icon.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SocialLink {
    pub id: SocialLinkId,
    pub name: Option<String>,
    pub icon: String,
    pub link: String,
}

impl SocialLink {
    #[must_use]
    pub fn label(&self) -> &str {
        text(self.name.as_ref())
    }
}

/// A stored file.
#[derive(Clone, FromRow)]
pub struct Upload {
    pub id: UploadId,
    pub filename: String,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("id", &self.id)
            .field("filename", &self.filename)
            .field("len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(lang: Option<&str>) -> Product {
        Product {
            id: ProductId::new(5),
            img: None,
            name: "Gloss Enamel".to_owned(),
            description: Some("High gloss".to_owned()),
            category: Some("Metal".to_owned()),
            country: None,
            lang: lang.map(str::to_owned),
            datasheet: Some(UploadId::new(9)),
        }
    }

    #[test]
    fn test_blank_lang_is_unset() {
        assert_eq!(product(Some("  ")).lang(), None);
        assert_eq!(product(None).lang(), None);
        assert_eq!(product(Some("ar")).lang(), Some("ar"));
    }

    #[test]
    fn test_product_json_uses_public_field_names() {
        let json = serde_json::to_value(product(Some("en"))).unwrap();
        assert_eq!(json["desc"], "High gloss");
        assert_eq!(json["datasheet"], 9);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_upload_debug_omits_bytes() {
        let upload = Upload {
            id: UploadId::new(1),
            filename: "catalog.pdf".to_owned(),
            data: vec![0x25, 0x50, 0x44, 0x46],
        };
        let debug_output = format!("{upload:?}");
        assert!(debug_output.contains("catalog.pdf"));
        assert!(debug_output.contains("len: 4"));
    }
}
