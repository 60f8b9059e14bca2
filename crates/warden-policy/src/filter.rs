//! Named policy predicates
//!
//! Callers narrow policy lookups with a [`PolicyFilter`] value instead of a
//! closure, so the predicate can be logged, compared and serialized.

use serde::{Deserialize, Serialize};
use warden_core::{OrganizationId, Policy};

/// Extra predicate applied on top of type and eligibility checks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PolicyFilter {
    /// Accept every policy
    #[default]
    Any,
    /// Only policies of this organization
    Organization(OrganizationId),
    /// Every organization except this one
    ExcludeOrganization(OrganizationId),
    /// Payload field must be `true`, e.g. `autoEnrollEnabled`
    DataFlag(String),
    /// Every inner filter must accept
    All(Vec<PolicyFilter>),
}

impl PolicyFilter {
    /// Whether the policy passes this filter
    pub fn accepts(&self, policy: &Policy) -> bool {
        match self {
            Self::Any => true,
            Self::Organization(id) => policy.organization_id == *id,
            Self::ExcludeOrganization(id) => policy.organization_id != *id,
            Self::DataFlag(key) => policy.data.as_ref().is_some_and(|data| data.flag(key)),
            Self::All(filters) => filters.iter().all(|f| f.accepts(policy)),
        }
    }

    /// Combine with another filter
    pub fn and(self, other: PolicyFilter) -> Self {
        match (self, other) {
            (Self::Any, f) | (f, Self::Any) => f,
            (Self::All(mut filters), Self::All(more)) => {
                filters.extend(more);
                Self::All(filters)
            }
            (Self::All(mut filters), f) | (f, Self::All(mut filters)) => {
                filters.push(f);
                Self::All(filters)
            }
            (a, b) => Self::All(vec![a, b]),
        }
    }
}

/// Apply an optional filter, `None` accepts everything
pub(crate) fn accepts(filter: Option<&PolicyFilter>, policy: &Policy) -> bool {
    filter.map_or(true, |f| f.accepts(policy))
}
