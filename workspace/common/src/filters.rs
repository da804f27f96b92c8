//! Filter selection shared by the dashboard and the query parameters derived
//! from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive date bounds as `YYYY-MM-DD` strings, applied to the month key
/// of the revenue trend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    pub fn new(start: Option<String>, end: Option<String>) -> Self {
        Self {
            start: normalize(start),
            end: normalize(end),
        }
    }

    pub fn is_active(&self) -> bool {
        is_set(&self.start) || is_set(&self.end)
    }
}

/// Names one clearable part of the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterKind {
    Category,
    Client,
    Product,
    Employee,
    Country,
    DateRange,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterKind::Category => "category",
            FilterKind::Client => "client",
            FilterKind::Product => "product",
            FilterKind::Employee => "employee",
            FilterKind::Country => "country",
            FilterKind::DateRange => "dateRange",
        };
        f.write_str(name)
    }
}

/// The user's current narrowing criteria.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    pub selected_category: Option<String>,
    pub selected_client: Option<String>,
    pub selected_product: Option<String>,
    pub selected_employee: Option<String>,
    pub selected_country: Option<String>,
    pub date_range: DateRange,
}

impl FilterSelection {
    /// True iff any field holds a non-empty value.
    pub fn has_active_filters(&self) -> bool {
        is_set(&self.selected_category)
            || is_set(&self.selected_client)
            || is_set(&self.selected_product)
            || is_set(&self.selected_employee)
            || is_set(&self.selected_country)
            || self.date_range.is_active()
    }

    /// Returns the field named by `kind`. `DateRange` has two bounds and
    /// yields `None` here; read [`FilterSelection::date_range`] instead.
    pub fn value(&self, kind: FilterKind) -> Option<&str> {
        let field = match kind {
            FilterKind::Category => &self.selected_category,
            FilterKind::Client => &self.selected_client,
            FilterKind::Product => &self.selected_product,
            FilterKind::Employee => &self.selected_employee,
            FilterKind::Country => &self.selected_country,
            FilterKind::DateRange => return None,
        };
        field.as_deref()
    }

    /// Query parameters for the data-access layer. Empty values are dropped.
    pub fn to_params(&self) -> FilterParams {
        FilterParams {
            category: normalize(self.selected_category.clone()),
            client: normalize(self.selected_client.clone()),
            product: normalize(self.selected_product.clone()),
            employee: normalize(self.selected_employee.clone()),
            country: normalize(self.selected_country.clone()),
            start_date: normalize(self.date_range.start.clone()),
            end_date: normalize(self.date_range.end.clone()),
        }
    }
}

/// Filter values as passed to fetch functions.
///
/// `employee` is carried for completeness but no view query applies it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterParams {
    pub category: Option<String>,
    pub client: Option<String>,
    pub product: Option<String>,
    pub employee: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl FilterParams {
    pub fn is_empty(&self) -> bool {
        self == &FilterParams::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = normalize(Some(category.into()));
        self
    }

    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = normalize(Some(client.into()));
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = normalize(Some(product.into()));
        self
    }

    pub fn with_employee(mut self, employee: impl Into<String>) -> Self {
        self.employee = normalize(Some(employee.into()));
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = normalize(Some(country.into()));
        self
    }

    pub fn with_dates(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.start_date = normalize(start);
        self.end_date = normalize(end);
        self
    }
}

/// Maps the empty string to `None`. Any other value, whitespace included,
/// is a filter.
pub fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection_is_inactive() {
        let selection = FilterSelection::default();
        assert!(!selection.has_active_filters());
        assert!(selection.to_params().is_empty());
    }

    #[test]
    fn test_single_field_activates() {
        let selection = FilterSelection {
            selected_country: Some("Germany".to_string()),
            ..Default::default()
        };
        assert!(selection.has_active_filters());
        assert_eq!(selection.value(FilterKind::Country), Some("Germany"));
    }

    #[test]
    fn test_empty_strings_are_inactive() {
        let selection = FilterSelection {
            selected_category: Some(String::new()),
            date_range: DateRange {
                start: Some(String::new()),
                end: None,
            },
            ..Default::default()
        };
        assert!(!selection.has_active_filters());
        assert!(selection.to_params().is_empty());
    }

    #[test]
    fn test_whitespace_is_a_value() {
        let selection = FilterSelection {
            selected_client: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(selection.has_active_filters());
        assert_eq!(selection.to_params().client.as_deref(), Some(" "));
        assert!(DateRange::new(Some(" ".to_string()), None).is_active());
    }

    #[test]
    fn test_to_params_maps_every_field() {
        let selection = FilterSelection {
            selected_category: Some("Beverages".to_string()),
            selected_client: Some("Ernst Handel".to_string()),
            selected_product: Some("Chai".to_string()),
            selected_employee: Some("Nancy Davolio".to_string()),
            selected_country: Some("Austria".to_string()),
            date_range: DateRange::new(Some("1997-01-01".to_string()), Some("1997-12-31".to_string())),
        };

        let params = selection.to_params();
        assert_eq!(params.category.as_deref(), Some("Beverages"));
        assert_eq!(params.client.as_deref(), Some("Ernst Handel"));
        assert_eq!(params.product.as_deref(), Some("Chai"));
        assert_eq!(params.employee.as_deref(), Some("Nancy Davolio"));
        assert_eq!(params.country.as_deref(), Some("Austria"));
        assert_eq!(params.start_date.as_deref(), Some("1997-01-01"));
        assert_eq!(params.end_date.as_deref(), Some("1997-12-31"));
    }

    #[test]
    fn test_param_builders_drop_empty_values() {
        let params = FilterParams::default().with_category("").with_country("France");
        assert_eq!(params.category, None);
        assert_eq!(params.country.as_deref(), Some("France"));
    }
}
