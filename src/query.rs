//! Audit log queries
//!
//! Filters are conjunctive and date bounds are inclusive on `created_at`.
//! Results come back newest first; records written in the same instant
//! keep later insertions ahead of earlier ones.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::audit::{Action, AuditRecord};
use crate::error::{AuditError, AuditResult};

/// Page size used when none is requested
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Filter and pagination parameters for listing audit records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditQuery {
    pub collection_name: Option<String>,
    pub action: Option<Action>,
    pub document_id: Option<String>,
    pub actor: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    /// 1-indexed page number
    pub page: usize,
    pub limit: usize,
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            collection_name: None,
            action: None,
            document_id: None,
            actor: None,
            date_from: None,
            date_to: None,
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl AuditQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(mut self, collection_name: impl Into<String>) -> Self {
        self.collection_name = Some(collection_name.into());
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn document(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = Some(document_id.into());
        self
    }

    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn since(mut self, date_from: DateTime<Utc>) -> Self {
        self.date_from = Some(date_from);
        self
    }

    pub fn until(mut self, date_to: DateTime<Utc>) -> Self {
        self.date_to = Some(date_to);
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Reject malformed parameters and clamp the page size to `max_limit`
    pub fn validate(mut self, max_limit: usize) -> AuditResult<Self> {
        if self.page < 1 {
            return Err(AuditError::Validation(
                "page must be 1 or greater".to_string(),
            ));
        }

        if self.limit < 1 {
            return Err(AuditError::Validation(
                "limit must be 1 or greater".to_string(),
            ));
        }

        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(AuditError::Validation(format!(
                    "from ({}) is after to ({})",
                    from.to_rfc3339(),
                    to.to_rfc3339()
                )));
            }
        }

        if self.limit > max_limit {
            tracing::debug!(requested = self.limit, max_limit, "clamping page limit");
            self.limit = max_limit.max(1);
        }

        Ok(self)
    }

    /// Check whether a record passes every filter
    pub fn matches(&self, record: &AuditRecord) -> bool {
        if let Some(collection) = &self.collection_name {
            if &record.collection_name != collection {
                return false;
            }
        }

        if let Some(action) = self.action {
            if record.action != action {
                return false;
            }
        }

        if let Some(document_id) = &self.document_id {
            if record.document_id.as_ref() != Some(document_id) {
                return false;
            }
        }

        if let Some(actor) = &self.actor {
            if record.actor.as_ref() != Some(actor) {
                return false;
            }
        }

        if let Some(from) = self.date_from {
            if record.created_at < from {
                return false;
            }
        }

        if let Some(to) = self.date_to {
            if record.created_at > to {
                return false;
            }
        }

        true
    }

    /// Every matching record, newest first
    ///
    /// `records` must be in insertion order.
    pub fn filter_sorted(&self, records: Vec<AuditRecord>) -> Vec<AuditRecord> {
        let mut matching: Vec<AuditRecord> = records
            .into_iter()
            .rev()
            .filter(|r| self.matches(r))
            .collect();

        // Stable, so equal timestamps keep the reversed insertion order
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }

    /// Filter, order and cut one page out of `records`
    pub fn paginate(&self, records: Vec<AuditRecord>) -> AuditPage {
        let matching = self.filter_sorted(records);
        let total = matching.len();
        let skip = self.page.saturating_sub(1).saturating_mul(self.limit);

        let items = matching.into_iter().skip(skip).take(self.limit).collect();

        AuditPage {
            items,
            total,
            page: self.page,
            limit: self.limit,
        }
    }
}

/// One page of query results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditPage {
    pub items: Vec<AuditRecord>,
    /// Number of records matching the filters across all pages
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

impl AuditPage {
    /// Number of pages needed to show every match
    pub fn page_count(&self) -> usize {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }
}

/// Which end of a date range a bound is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

/// Parse a `from`/`to` parameter
///
/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates. A plain date
/// used as an end bound covers the whole day.
pub fn parse_date_bound(input: &str, bound: DateBound) -> AuditResult<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        AuditError::Validation(format!(
            "Invalid date '{}'. Use YYYY-MM-DD or an RFC 3339 timestamp",
            input
        ))
    })?;

    let time = match bound {
        DateBound::Start => NaiveTime::MIN,
        DateBound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN),
    };

    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}
