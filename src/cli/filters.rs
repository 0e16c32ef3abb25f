//! Filter arguments shared by `list` and `export`

use clap::Args;

use crate::audit::Action;
use crate::error::AuditResult;
use crate::query::{parse_date_bound, AuditQuery, DateBound};

/// Record filters
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only records for this collection (e.g. Employee)
    #[arg(short, long)]
    pub collection: Option<String>,

    /// Only records with this action (create, update, delete, access)
    #[arg(short, long)]
    pub action: Option<String>,

    /// Only records for this document ID
    #[arg(short, long)]
    pub document_id: Option<String>,

    /// Only records by this actor
    #[arg(long)]
    pub actor: Option<String>,

    /// Earliest creation time (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest creation time (YYYY-MM-DD or RFC 3339, dates are inclusive)
    #[arg(long)]
    pub to: Option<String>,
}

impl FilterArgs {
    /// Build a query carrying these filters and default paging
    pub fn to_query(&self) -> AuditResult<AuditQuery> {
        let mut query = AuditQuery::new();

        query.collection_name = self.collection.clone();
        query.document_id = self.document_id.clone();
        query.actor = self.actor.clone();

        if let Some(action) = &self.action {
            query.action = Some(action.parse::<Action>()?);
        }
        if let Some(from) = &self.from {
            query.date_from = Some(parse_date_bound(from, DateBound::Start)?);
        }
        if let Some(to) = &self.to {
            query.date_to = Some(parse_date_bound(to, DateBound::End)?);
        }

        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters() {
        assert_eq!(FilterArgs::default().to_query().unwrap(), AuditQuery::new());
    }

    #[test]
    fn test_filters_carried_over() {
        let args = FilterArgs {
            collection: Some("Employee".into()),
            action: Some("Delete".into()),
            from: Some("2025-02-01".into()),
            to: Some("2025-02-28".into()),
            ..FilterArgs::default()
        };

        let query = args.to_query().unwrap();
        assert_eq!(query.collection_name.as_deref(), Some("Employee"));
        assert_eq!(query.action, Some(Action::Delete));
        assert!(query.date_from.unwrap() < query.date_to.unwrap());
    }

    #[test]
    fn test_bad_action_rejected() {
        let args = FilterArgs {
            action: Some("purge".into()),
            ..FilterArgs::default()
        };
        assert!(args.to_query().unwrap_err().is_validation());
    }
}
