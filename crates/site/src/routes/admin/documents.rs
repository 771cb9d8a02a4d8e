//! Certificate and approval management.
//!
//! Both kinds share a payload and handler shape; `document_handlers!`
//! stamps out one set per table.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use noble_paints_core::{ApprovalId, CertificateId};

use super::{AdminListQuery, Chrome, edit_value, json_body, parse_id, required};
use crate::db::content::{DocumentUpdate, NewDocument};
use crate::db::{ApprovalRepository, CertificateRepository};
use crate::error::{ApiError, Result};
use crate::filters;
use crate::middleware::{ActiveLocale, RequireAdminAuth};
use crate::models::{Approval, Certificate};
use crate::routes::Success;
use crate::state::AppState;

super::admin_listing!(CertificatesTemplate, "admin/documents.html", Certificate, endpoint: &'static str);
super::admin_listing!(ApprovalsTemplate, "admin/documents.html", Approval, endpoint: &'static str);

/// JSON body of certificate and approval writes.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl DocumentPayload {
    /// Fields of a new row, or `None` without a title and description.
    fn into_new(self) -> Option<NewDocument> {
        let title = required(self.title.as_ref())?;
        let description = required(self.description.as_ref())?;
        Some(NewDocument {
            title,
            description,
            img: edit_value(self.img),
            link: edit_value(self.link),
        })
    }

    fn into_update(self) -> DocumentUpdate {
        DocumentUpdate {
            title: edit_value(self.title),
            description: edit_value(self.description),
            img: edit_value(self.img),
            link: edit_value(self.link),
        }
    }
}

macro_rules! document_handlers {
    (
        $repo:ident, $id:ty, $template:ident, $entity:literal, $section:literal, $path:literal,
        $index:ident, $add:ident, $edit:ident, $remove:ident,
        $created:literal, $updated:literal, $deleted:literal
    ) => {
        /// One page of rows, newest first.
        ///
        /// # Errors
        ///
        /// Returns an error if the query fails.
        pub async fn $index(
            State(state): State<AppState>,
            session: Session,
            active: ActiveLocale,
            RequireAdminAuth(admin): RequireAdminAuth,
            Query(query): Query<AdminListQuery>,
        ) -> Result<$template> {
            let show = query.show();
            let (items, pagination) = $repo::new(state.pool())
                .list_page(query.page(), show)
                .await?;
            let chrome =
                Chrome::new(&session, &active, admin, $section, $path, &pagination, show).await;
            Ok($template::from_chrome(chrome, items, $path))
        }

        /// # Errors
        ///
        /// Returns 400 without a title and description.
        #[instrument(skip(state, _admin, body))]
        pub async fn $add(
            State(state): State<AppState>,
            _admin: RequireAdminAuth,
            body: Bytes,
        ) -> std::result::Result<Success, ApiError> {
            let payload: DocumentPayload = json_body(&body);
            let Some(document) = payload.into_new() else {
                return Err(ApiError::BadRequest(
                    "Title and description are required.".to_owned(),
                ));
            };
            let id = $repo::new(state.pool()).create(&document).await?;
            Ok(Success::created($created, id))
        }

        /// # Errors
        ///
        /// Returns 404 for an unknown id.
        #[instrument(skip(state, _admin, body))]
        pub async fn $edit(
            State(state): State<AppState>,
            _admin: RequireAdminAuth,
            Path(id): Path<String>,
            body: Bytes,
        ) -> std::result::Result<Success, ApiError> {
            let id: $id = parse_id(&id, $entity)?;
            let payload: DocumentPayload = json_body(&body);
            $repo::new(state.pool())
                .update(id, &payload.into_update())
                .await
                .map_err(ApiError::for_entity($entity))?;
            Ok(Success::new($updated))
        }

        /// # Errors
        ///
        /// Returns 404 for an unknown id.
        #[instrument(skip(state, _admin))]
        pub async fn $remove(
            State(state): State<AppState>,
            _admin: RequireAdminAuth,
            Path(id): Path<String>,
        ) -> std::result::Result<Success, ApiError> {
            let id: $id = parse_id(&id, $entity)?;
            $repo::new(state.pool())
                .delete(id)
                .await
                .map_err(ApiError::for_entity($entity))?;
            Ok(Success::new($deleted))
        }
    };
}

document_handlers!(
    CertificateRepository,
    CertificateId,
    CertificatesTemplate,
    "Certificate",
    "cp.certificates",
    "/ControlPanel/certificates/",
    certificates,
    add_certificate,
    edit_certificate,
    remove_certificate,
    "Certificate created successfully.",
    "Certificate updated successfully.",
    "Certificate deleted successfully."
);

document_handlers!(
    ApprovalRepository,
    ApprovalId,
    ApprovalsTemplate,
    "Approval",
    "cp.approvals",
    "/ControlPanel/approvals/",
    approvals,
    add_approval,
    edit_approval,
    remove_approval,
    "Approval created successfully.",
    "Approval updated successfully.",
    "Approval deleted successfully."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_requires_title_and_description() {
        let payload: DocumentPayload = json_body(br#"{"title":"ISO 9001","description":" "}"#);
        assert!(payload.into_new().is_none());

        let payload: DocumentPayload =
            json_body(br#"{"title":"ISO 9001","description":"Quality","link":"undefined"}"#);
        let document = payload.into_new();
        assert!(document.as_ref().is_some_and(|d| d.link.is_none()));
        assert!(document.is_some_and(|d| d.title == "ISO 9001"));
    }
}
