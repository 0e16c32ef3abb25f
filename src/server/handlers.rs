//! HTTP handlers for the audit query API

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::audit::{Action, AuditId, AuditRecord};
use crate::error::AuditError;
use crate::query::{parse_date_bound, AuditPage, AuditQuery, DateBound};
use crate::services::AuditService;

/// Raw `GET /audits` query string
///
/// Everything arrives as text so malformed values produce a validation
/// error with a readable message instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub collection_name: Option<String>,
    pub action: Option<String>,
    pub document_id: Option<String>,
    pub actor: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    /// Convert into a query, using `default_limit` when no limit is given
    pub fn into_query(self, default_limit: usize) -> Result<AuditQuery, AuditError> {
        let mut query = AuditQuery::new().limit(default_limit);

        query.collection_name = non_empty(self.collection_name);
        query.document_id = non_empty(self.document_id);
        query.actor = non_empty(self.actor);

        if let Some(action) = non_empty(self.action) {
            query.action = Some(action.parse::<Action>()?);
        }
        if let Some(from) = non_empty(self.from) {
            query.date_from = Some(parse_date_bound(&from, DateBound::Start)?);
        }
        if let Some(to) = non_empty(self.to) {
            query.date_to = Some(parse_date_bound(&to, DateBound::End)?);
        }
        if let Some(page) = non_empty(self.page) {
            query.page = parse_number("page", &page)?;
        }
        if let Some(limit) = non_empty(self.limit) {
            query.limit = parse_number("limit", &limit)?;
        }

        Ok(query)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number(name: &str, value: &str) -> Result<usize, AuditError> {
    value.parse::<usize>().map_err(|_| {
        AuditError::Validation(format!("{} must be a positive integer, got '{}'", name, value))
    })
}

/// Error response wrapper for AuditError
#[derive(Debug)]
pub struct ApiError(AuditError);

impl From<AuditError> for ApiError {
    fn from(e: AuditError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AuditError::Validation(_) => StatusCode::BAD_REQUEST,
            AuditError::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "audit query failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "audit query rejected");
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// `GET /audits`
pub async fn list_audits(
    State(service): State<AuditService>,
    Query(params): Query<ListParams>,
) -> Result<Json<AuditPage>, ApiError> {
    let query = params.into_query(service.default_limit())?;
    let page = service.list(query).await?;
    Ok(Json(page))
}

/// `GET /audits/:id`
pub async fn get_audit(
    State(service): State<AuditService>,
    Path(id): Path<String>,
) -> Result<Json<AuditRecord>, ApiError> {
    let id: AuditId = id
        .parse()
        .map_err(|_| AuditError::record_not_found(id.clone()))?;
    let record = service.get(id).await?;
    Ok(Json(record))
}

/// `GET /healthz`
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut p = ListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "collectionName" => p.collection_name = value,
                "action" => p.action = value,
                "documentId" => p.document_id = value,
                "actor" => p.actor = value,
                "from" => p.from = value,
                "to" => p.to = value,
                "page" => p.page = value,
                "limit" => p.limit = value,
                other => panic!("unknown param {}", other),
            }
        }
        p
    }

    #[test]
    fn test_into_query_defaults() {
        let query = ListParams::default().into_query(20).unwrap();
        assert_eq!(query, AuditQuery::new().limit(20));
    }

    #[test]
    fn test_into_query_parses_everything() {
        let query = params(&[
            ("collectionName", "Employee"),
            ("action", "update"),
            ("documentId", "emp-1"),
            ("actor", "hr-1"),
            ("from", "2025-01-01"),
            ("to", "2025-01-31"),
            ("page", "2"),
            ("limit", "50"),
        ])
        .into_query(20)
        .unwrap();

        assert_eq!(query.collection_name.as_deref(), Some("Employee"));
        assert_eq!(query.action, Some(Action::Update));
        assert_eq!(query.document_id.as_deref(), Some("emp-1"));
        assert_eq!(query.actor.as_deref(), Some("hr-1"));
        assert!(query.date_from.unwrap() < query.date_to.unwrap());
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 50);
    }

    #[test]
    fn test_blank_params_are_ignored() {
        let query = params(&[("collectionName", "  "), ("page", "")])
            .into_query(20)
            .unwrap();
        assert!(query.collection_name.is_none());
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_malformed_params_are_validation_errors() {
        for pair in [
            ("action", "archive"),
            ("page", "-1"),
            ("limit", "ten"),
            ("from", "last week"),
        ] {
            let err = params(&[pair]).into_query(20).unwrap_err();
            assert!(err.is_validation(), "{:?} should be rejected", pair);
        }
    }

    #[test]
    fn test_error_status_mapping() {
        let status = |e: AuditError| ApiError::from(e).into_response().status();

        assert_eq!(status(AuditError::Validation("bad".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(AuditError::record_not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(
            status(AuditError::Storage("disk".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
