//! Shared validation helpers for inbound HTTP adapters.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn invalid_field_error(field: FieldName, message: String, code: &str, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code,
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        let field_name = field.as_str();
        invalid_field_error(
            field,
            format!("{field_name} must be a valid UUID"),
            "invalid_uuid",
            value,
        )
    })
}

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let field_name = field.as_str();
        invalid_field_error(
            field,
            format!("{field_name} must be a YYYY-MM-DD date"),
            "invalid_date",
            value,
        )
    })
}

/// Query parameters accepted by paginated list endpoints.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Rows per page, capped server-side.
    pub limit: Option<u32>,
    /// Case-insensitive substring filter.
    pub search: Option<String>,
}

/// Query parameters for paginated list endpoints that take no search filter.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Rows per page, capped server-side.
    pub limit: Option<u32>,
}

impl ListQuery {
    /// The search term with blanks collapsed to `None`.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use crate::domain::ErrorCode;

    #[rstest]
    fn parse_uuid_reports_field_context() {
        let error = parse_uuid("nope", FieldName::new("studentId")).expect_err("invalid uuid");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details attached");
        assert_eq!(details["field"], "studentId");
        assert_eq!(details["code"], "invalid_uuid");
    }

    #[rstest]
    fn parse_date_accepts_iso_dates() {
        let date = parse_date("1990-12-10", FieldName::new("dateOfBirth")).expect("valid date");
        assert_eq!(date.to_string(), "1990-12-10");
    }

    #[rstest]
    #[case("12/10/1990")]
    #[case("1990-13-01")]
    #[case("")]
    fn parse_date_rejects_other_shapes(#[case] raw: &str) {
        let error = parse_date(raw, FieldName::new("dateOfBirth")).expect_err("invalid date");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn search_term_collapses_blank() {
        let query = ListQuery {
            page: None,
            limit: None,
            search: Some("   ".to_owned()),
        };
        assert_eq!(query.search_term(), None);

        let query = ListQuery {
            search: Some(" math ".to_owned()),
            ..ListQuery::default()
        };
        assert_eq!(query.search_term(), Some("math"));
    }
}
