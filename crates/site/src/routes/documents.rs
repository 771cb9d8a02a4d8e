//! Certificate and approval listings.
//!
//! Both render `documents.html`; the rows share their accessors.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use super::{Layout, or_empty};
use crate::db::{ApprovalRepository, CertificateRepository};
use crate::filters;
use crate::middleware::ActiveLocale;
use crate::models::{Approval, Certificate};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "documents.html")]
pub struct CertificatesTemplate {
    pub layout: Layout,
    /// Translation key of the heading.
    pub heading: &'static str,
    pub items: Vec<Certificate>,
}

#[derive(Template, WebTemplate)]
#[template(path = "documents.html")]
pub struct ApprovalsTemplate {
    pub layout: Layout,
    pub heading: &'static str,
    pub items: Vec<Approval>,
}

/// Every certificate, newest first.
pub async fn certificates(
    State(state): State<AppState>,
    active: ActiveLocale,
) -> CertificatesTemplate {
    let items = or_empty(
        CertificateRepository::new(state.pool()).list_all().await,
        "certificates",
    );
    CertificatesTemplate {
        layout: Layout::new(&active),
        heading: "nav.certificates",
        items,
    }
}

/// Every approval, newest first.
pub async fn approvals(State(state): State<AppState>, active: ActiveLocale) -> ApprovalsTemplate {
    let items = or_empty(
        ApprovalRepository::new(state.pool()).list_all().await,
        "approvals",
    );
    ApprovalsTemplate {
        layout: Layout::new(&active),
        heading: "nav.approvals",
        items,
    }
}
