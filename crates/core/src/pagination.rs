//! Pagination and sort-constraint guard.
//!
//! Every paginated endpoint validates its raw `page`/`size`/`sort` input
//! here before anything reaches the query layer. Sort fields are checked
//! against a per-endpoint [`SortConstraint`]; with both lists empty,
//! sorting is closed entirely (fail-closed), so an endpoint must opt in to
//! every sortable field explicitly.

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// Default page index when the client omits `page`.
pub const DEFAULT_PAGE: u32 = 0;

/// Default page size when the client omits `size`.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

// ---------------------------------------------------------------------------
// Sort constraint
// ---------------------------------------------------------------------------

/// Static per-endpoint sort policy, declared once next to the handler and
/// never constructed at request time.
///
/// - Non-empty `whitelist`: only listed fields may be sorted on.
/// - Non-empty `blacklist`: listed fields may never be sorted on (checked
///   in addition to the whitelist when both are given).
/// - Both empty: any sort request is rejected outright.
#[derive(Debug, Clone, Copy)]
pub struct SortConstraint {
    pub whitelist: &'static [&'static str],
    pub blacklist: &'static [&'static str],
}

impl SortConstraint {
    /// A constraint that permits sorting only by the given fields.
    pub const fn whitelist(fields: &'static [&'static str]) -> Self {
        Self {
            whitelist: fields,
            blacklist: &[],
        }
    }

    /// A constraint that forbids all sorting.
    pub const fn closed() -> Self {
        Self {
            whitelist: &[],
            blacklist: &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Sort terms
// ---------------------------------------------------------------------------

/// Direction of a single sort term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One `(field, direction)` pair, in the order the client submitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortTerm {
    pub field: String,
    pub direction: SortDirection,
}

/// A validated pagination request. Only ever built through
/// [`validate_pageable`], so holding one implies the sort terms passed the
/// endpoint's constraint.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortTerm>,
}

impl PageRequest {
    /// SQL LIMIT value.
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Number of pages needed for `total` rows at this page size. Zero
    /// rows (or size 0) is a single empty page by convention.
    pub fn total_pages(&self, total: i64) -> i64 {
        if self.size == 0 || total <= 0 {
            return if total > 0 { 1 } else { 0 };
        }
        (total + i64::from(self.size) - 1) / i64::from(self.size)
    }
}

// ---------------------------------------------------------------------------
// Sort string parsing
// ---------------------------------------------------------------------------

/// Parse the `sort` query parameter: comma-separated `field` or
/// `field:asc` / `field:desc` terms, order preserved. Absent or blank
/// input means no sorting.
pub fn parse_sort_terms(raw: Option<&str>) -> CoreResult<Vec<SortTerm>> {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r,
        _ => return Ok(Vec::new()),
    };

    let mut terms = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (field, direction) = match part.split_once(':') {
            None => (part, SortDirection::Asc),
            Some((field, dir)) => {
                let direction = match dir.trim().to_lowercase().as_str() {
                    "asc" | "" => SortDirection::Asc,
                    "desc" => SortDirection::Desc,
                    other => {
                        return Err(CoreError::InvalidParameter(format!(
                            "Invalid sort direction '{other}' for field '{}'. \
                             Allowed values: asc, desc",
                            field.trim()
                        )))
                    }
                };
                (field.trim(), direction)
            }
        };

        if field.is_empty() {
            return Err(CoreError::InvalidParameter(
                "Sort term is missing a field name".to_string(),
            ));
        }

        terms.push(SortTerm {
            field: field.to_string(),
            direction,
        });
    }

    Ok(terms)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a raw `page`/`size` value. Absent or blank values are fine
/// (defaults apply downstream); present values must parse as a
/// non-negative integer.
pub fn validate_page_param(raw: Option<&str>, field: &'static str) -> CoreResult<Option<u32>> {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r.trim(),
        _ => return Ok(None),
    };

    match raw.parse::<i32>() {
        Ok(n) if n >= 0 => Ok(Some(n as u32)),
        Ok(_) => Err(CoreError::InvalidParameter(format!(
            "'{field}' must be >= 0, but got: {raw}"
        ))),
        Err(_) => Err(CoreError::InvalidParameter(format!(
            "'{field}' must be a valid integer, but got: {raw}"
        ))),
    }
}

/// Check every sort term against the endpoint's constraint.
///
/// Fails fast: the first offending term (in submitted order) is reported.
/// With both lists empty, a single "sorting is forbidden" error covers any
/// non-empty term sequence.
pub fn validate_sort(constraint: &SortConstraint, terms: &[SortTerm]) -> CoreResult<()> {
    let whitelist_empty = constraint.whitelist.is_empty();
    let blacklist_empty = constraint.blacklist.is_empty();

    if whitelist_empty && blacklist_empty {
        if terms.is_empty() {
            return Ok(());
        }
        return Err(CoreError::InvalidParameter(
            "Sorting is forbidden".to_string(),
        ));
    }

    for term in terms {
        let field = term.field.as_str();

        if !whitelist_empty && !constraint.whitelist.contains(&field) {
            return Err(CoreError::InvalidParameter(format!(
                "Sorting by field '{field}' is not allowed. Allowed fields: [{}]",
                constraint.whitelist.join(", ")
            )));
        }

        if !blacklist_empty && constraint.blacklist.contains(&field) {
            return Err(CoreError::InvalidParameter(format!(
                "Sorting by field '{field}' is forbidden. Forbidden fields: [{}]",
                constraint.blacklist.join(", ")
            )));
        }
    }

    Ok(())
}

/// Validate raw pagination input and build a [`PageRequest`].
///
/// Page and size are checked first, then every sort term; the request is
/// rejected outright on the first violation (no partial acceptance).
pub fn validate_pageable(
    raw_page: Option<&str>,
    raw_size: Option<&str>,
    sort_terms: Vec<SortTerm>,
    constraint: &SortConstraint,
) -> CoreResult<PageRequest> {
    let page = validate_page_param(raw_page, "page")?.unwrap_or(DEFAULT_PAGE);
    let size = validate_page_param(raw_size, "size")?.unwrap_or(DEFAULT_PAGE_SIZE);

    validate_sort(constraint, &sort_terms)?;

    Ok(PageRequest {
        page,
        size,
        sort: sort_terms,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn term(field: &str, direction: SortDirection) -> SortTerm {
        SortTerm {
            field: field.to_string(),
            direction,
        }
    }

    // -- validate_page_param tests --------------------------------------------

    #[test]
    fn absent_page_is_allowed() {
        assert_eq!(validate_page_param(None, "page").unwrap(), None);
        assert_eq!(validate_page_param(Some("  "), "page").unwrap(), None);
    }

    #[test]
    fn valid_page_parses() {
        assert_eq!(validate_page_param(Some("0"), "page").unwrap(), Some(0));
        assert_eq!(validate_page_param(Some("42"), "size").unwrap(), Some(42));
    }

    #[test]
    fn negative_page_rejected_with_field_name() {
        let err = validate_page_param(Some("-1"), "page").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'page'"));
        assert!(msg.contains("-1"));
        assert!(msg.contains(">= 0"));
    }

    #[test]
    fn non_numeric_size_rejected_with_field_name() {
        let err = validate_page_param(Some("abc"), "size").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'size'"));
        assert!(msg.contains("abc"));
        assert!(msg.contains("valid integer"));
    }

    #[test]
    fn overflowing_page_rejected_as_invalid_integer() {
        assert!(validate_page_param(Some("99999999999999"), "page").is_err());
    }

    // -- parse_sort_terms tests -----------------------------------------------

    #[test]
    fn absent_sort_yields_no_terms() {
        assert!(parse_sort_terms(None).unwrap().is_empty());
        assert!(parse_sort_terms(Some("")).unwrap().is_empty());
    }

    #[test]
    fn bare_field_defaults_to_asc() {
        let terms = parse_sort_terms(Some("amount")).unwrap();
        assert_eq!(terms, vec![term("amount", SortDirection::Asc)]);
    }

    #[test]
    fn explicit_directions_parse_in_order() {
        let terms = parse_sort_terms(Some("amount:desc, status:asc")).unwrap();
        assert_eq!(
            terms,
            vec![
                term("amount", SortDirection::Desc),
                term("status", SortDirection::Asc),
            ]
        );
    }

    #[test]
    fn unknown_direction_rejected() {
        let err = parse_sort_terms(Some("amount:sideways")).unwrap_err();
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn empty_field_rejected() {
        assert!(parse_sort_terms(Some(":desc")).is_err());
    }

    // -- validate_sort tests --------------------------------------------------

    const ORDER_SORT: SortConstraint =
        SortConstraint::whitelist(&["status", "payment_method", "amount"]);

    #[test]
    fn closed_constraint_rejects_any_sort() {
        let constraint = SortConstraint::closed();
        let err =
            validate_sort(&constraint, &[term("amount", SortDirection::Asc)]).unwrap_err();
        assert_eq!(err.to_string(), "Sorting is forbidden");
    }

    #[test]
    fn closed_constraint_accepts_empty_sort() {
        assert!(validate_sort(&SortConstraint::closed(), &[]).is_ok());
    }

    #[test]
    fn whitelisted_fields_accepted() {
        let terms = vec![
            term("amount", SortDirection::Desc),
            term("status", SortDirection::Asc),
        ];
        assert!(validate_sort(&ORDER_SORT, &terms).is_ok());
    }

    #[test]
    fn non_whitelisted_field_rejected_naming_allowed_set() {
        let constraint = SortConstraint::whitelist(&["amount"]);
        let err =
            validate_sort(&constraint, &[term("status", SortDirection::Asc)]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'status'"));
        assert!(msg.contains("amount"));
        assert!(msg.contains("not allowed"));
    }

    #[test]
    fn first_offending_term_reported() {
        let terms = vec![
            term("amount", SortDirection::Asc),
            term("email", SortDirection::Asc),
            term("city", SortDirection::Asc),
        ];
        let err = validate_sort(&ORDER_SORT, &terms).unwrap_err();
        assert!(err.to_string().contains("'email'"));
    }

    #[test]
    fn blacklisted_field_rejected_naming_forbidden_set() {
        let constraint = SortConstraint {
            whitelist: &[],
            blacklist: &["email"],
        };
        let err =
            validate_sort(&constraint, &[term("email", SortDirection::Asc)]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'email'"));
        assert!(msg.contains("forbidden"));
    }

    #[test]
    fn blacklist_checked_in_addition_to_whitelist() {
        let constraint = SortConstraint {
            whitelist: &["amount", "status"],
            blacklist: &["status"],
        };
        assert!(validate_sort(&constraint, &[term("amount", SortDirection::Asc)]).is_ok());
        assert!(validate_sort(&constraint, &[term("status", SortDirection::Asc)]).is_err());
    }

    #[test]
    fn blacklist_only_allows_other_fields() {
        let constraint = SortConstraint {
            whitelist: &[],
            blacklist: &["email"],
        };
        assert!(validate_sort(&constraint, &[term("city", SortDirection::Asc)]).is_ok());
    }

    // -- validate_pageable tests ----------------------------------------------

    #[test]
    fn defaults_applied_when_absent() {
        let req = validate_pageable(None, None, Vec::new(), &ORDER_SORT).unwrap();
        assert_eq!(req.page, DEFAULT_PAGE);
        assert_eq!(req.size, DEFAULT_PAGE_SIZE);
        assert!(req.sort.is_empty());
    }

    #[test]
    fn invalid_page_rejects_whole_request() {
        let err = validate_pageable(
            Some("-1"),
            Some("10"),
            Vec::new(),
            &ORDER_SORT,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'page'"));
    }

    #[test]
    fn invalid_sort_rejects_whole_request() {
        let terms = vec![term("email", SortDirection::Asc)];
        assert!(validate_pageable(Some("0"), Some("10"), terms, &ORDER_SORT).is_err());
    }

    #[test]
    fn size_zero_is_accepted() {
        let req = validate_pageable(None, Some("0"), Vec::new(), &ORDER_SORT).unwrap();
        assert_eq!(req.size, 0);
        assert_eq!(req.limit(), 0);
    }

    #[test]
    fn offset_is_page_times_size() {
        let req = validate_pageable(Some("3"), Some("20"), Vec::new(), &ORDER_SORT).unwrap();
        assert_eq!(req.offset(), 60);
        assert_eq!(req.limit(), 20);
    }

    #[test]
    fn total_pages_rounds_up() {
        let req = validate_pageable(None, Some("10"), Vec::new(), &ORDER_SORT).unwrap();
        assert_eq!(req.total_pages(0), 0);
        assert_eq!(req.total_pages(1), 1);
        assert_eq!(req.total_pages(10), 1);
        assert_eq!(req.total_pages(11), 2);
    }
}
