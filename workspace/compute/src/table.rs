//! Client-side state for the orders table: free-text search, column sorting
//! and pagination over an already fetched list of orders.

use common::CustomerOrder;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

pub const ITEMS_PER_PAGE: usize = 10;

/// Number of page buttons shown before the pager collapses into ellipses.
const MAX_VISIBLE_PAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    OrderId,
    CustomerId,
    CompanyName,
    OrderDate,
    ShippedDate,
    ShipCountry,
    ProductCount,
    TotalAmount,
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "order_id" | "id" => Ok(SortColumn::OrderId),
            "customer_id" | "customer" => Ok(SortColumn::CustomerId),
            "company_name" | "company" | "client" => Ok(SortColumn::CompanyName),
            "order_date" | "date" => Ok(SortColumn::OrderDate),
            "shipped_date" | "shipped" => Ok(SortColumn::ShippedDate),
            "ship_country" | "country" => Ok(SortColumn::ShipCountry),
            "product_count" | "products" => Ok(SortColumn::ProductCount),
            "total_amount" | "amount" | "total" => Ok(SortColumn::TotalAmount),
            other => Err(format!("Unknown sort column: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("asc"),
            SortDirection::Desc => f.write_str("desc"),
        }
    }
}

/// One rendered page of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a CustomerOrder>,
    /// 1-based, clamped to `1..=total_pages`.
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTable {
    search: String,
    sort_column: SortColumn,
    sort_direction: SortDirection,
    page: usize,
    page_size: usize,
}

impl Default for OrderTable {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_column: SortColumn::OrderDate,
            sort_direction: SortDirection::Desc,
            page: 1,
            page_size: ITEMS_PER_PAGE,
        }
    }
}

impl OrderTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> (SortColumn, SortDirection) {
        (self.sort_column, self.sort_direction)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Changing the search term returns to the first page.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    /// Same column flips the direction; a new column starts ascending.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        if self.sort_column == column {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_column = column;
            self.sort_direction = SortDirection::Asc;
        }
        trace!(?column, direction = %self.sort_direction, "Table sort changed");
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn view<'a>(&self, orders: &'a [CustomerOrder]) -> TablePage<'a> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<&CustomerOrder> = orders
            .iter()
            .filter(|order| needle.is_empty() || matches_search(order, &needle))
            .collect();

        rows.sort_by(|a, b| {
            let ordering = compare(a, b, self.sort_column);
            match self.sort_direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        let total_matches = rows.len();
        let total_pages = total_matches.div_ceil(self.page_size).max(1);
        let page = self.page.min(total_pages);
        let rows = rows
            .into_iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .collect();

        TablePage {
            rows,
            page,
            total_pages,
            total_matches,
        }
    }
}

fn matches_search(order: &CustomerOrder, needle: &str) -> bool {
    order.order_id.to_string().contains(needle)
        || order.customer_id.to_lowercase().contains(needle)
        || order.company_name.to_lowercase().contains(needle)
        || order.ship_country.to_lowercase().contains(needle)
}

fn compare(a: &CustomerOrder, b: &CustomerOrder, column: SortColumn) -> Ordering {
    match column {
        SortColumn::OrderId => a.order_id.cmp(&b.order_id),
        SortColumn::CustomerId => a.customer_id.cmp(&b.customer_id),
        SortColumn::CompanyName => a.company_name.to_lowercase().cmp(&b.company_name.to_lowercase()),
        SortColumn::OrderDate => a.order_date.cmp(&b.order_date),
        SortColumn::ShippedDate => a.shipped_date.cmp(&b.shipped_date),
        SortColumn::ShipCountry => a.ship_country.cmp(&b.ship_country),
        SortColumn::ProductCount => a.product_count.cmp(&b.product_count),
        SortColumn::TotalAmount => a.total_amount.cmp(&b.total_amount),
    }
}

/// Page buttons to show for `current` of `total` pages. `None` marks an
/// ellipsis. First and last page are always present.
pub fn page_numbers(current: usize, total: usize) -> Vec<Option<usize>> {
    if total <= 1 {
        return Vec::new();
    }
    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(Some).collect();
    }

    let current = current.clamp(1, total);
    let mut pages = vec![Some(1)];

    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);

    if start > 2 {
        pages.push(None);
    }
    pages.extend((start..=end).map(Some));
    if end < total - 1 {
        pages.push(None);
    }
    pages.push(Some(total));
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn order(id: i64, company: &str, country: &str, date: &str, amount: i64) -> CustomerOrder {
        CustomerOrder {
            order_id: id,
            customer_id: company.chars().take(5).collect::<String>().to_uppercase(),
            company_name: company.to_string(),
            order_date: date.to_string(),
            ship_country: country.to_string(),
            total_amount: Decimal::from(amount),
            ..Default::default()
        }
    }

    fn sample() -> Vec<CustomerOrder> {
        vec![
            order(10248, "Vins et alcools Chevalier", "France", "1996-07-04", 440),
            order(10249, "Toms Spezialitaten", "Germany", "1996-07-05", 1863),
            order(10250, "Hanari Carnes", "Brazil", "1996-07-08", 1552),
            order(10251, "Victuailles en stock", "France", "1996-07-08", 654),
        ]
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let orders = sample();
        let table = OrderTable::new();
        let page = table.view(&orders);
        let ids: Vec<_> = page.rows.iter().map(|o| o.order_id).collect();
        // equal dates keep their input order
        assert_eq!(ids, vec![10250, 10251, 10249, 10248]);
    }

    #[test]
    fn test_toggle_sort() {
        let mut table = OrderTable::new();
        table.toggle_sort(SortColumn::TotalAmount);
        assert_eq!(table.sort(), (SortColumn::TotalAmount, SortDirection::Asc));
        table.toggle_sort(SortColumn::TotalAmount);
        assert_eq!(table.sort(), (SortColumn::TotalAmount, SortDirection::Desc));

        let orders = sample();
        let page = table.view(&orders);
        assert_eq!(page.rows[0].order_id, 10249);
        assert_eq!(page.rows[3].order_id, 10248);
    }

    #[test]
    fn test_search_is_case_insensitive_and_resets_page() {
        let orders = sample();
        let mut table = OrderTable::new().with_page_size(1);
        table.set_page(3);
        table.set_search("FRANCE");
        assert_eq!(table.page(), 1);

        let page = table.view(&orders);
        assert_eq!(page.total_matches, 2);
        assert_eq!(page.total_pages, 2);

        table.set_search("10250");
        assert_eq!(table.view(&orders).rows[0].company_name, "Hanari Carnes");
    }

    #[test]
    fn test_pagination_clamps_page() {
        let orders: Vec<_> = (0..25)
            .map(|i| order(11000 + i, "Ernst Handel", "Austria", "1998-01-01", i))
            .collect();
        let mut table = OrderTable::new();
        table.set_page(9);

        let page = table.view(&orders);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
        assert_eq!(page.rows.len(), 5);
    }

    #[test]
    fn test_empty_table_has_one_page() {
        let page = OrderTable::new().view(&[]);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_sort_column_from_str() {
        assert_eq!("amount".parse::<SortColumn>(), Ok(SortColumn::TotalAmount));
        assert_eq!("Order-Date".parse::<SortColumn>(), Ok(SortColumn::OrderDate));
        assert!("colour".parse::<SortColumn>().is_err());
    }

    #[test]
    fn test_page_numbers() {
        assert!(page_numbers(1, 1).is_empty());
        assert_eq!(page_numbers(2, 4), vec![Some(1), Some(2), Some(3), Some(4)]);
        assert_eq!(
            page_numbers(5, 10),
            vec![Some(1), None, Some(4), Some(5), Some(6), None, Some(10)]
        );
        assert_eq!(page_numbers(1, 10), vec![Some(1), Some(2), None, Some(10)]);
    }
}
