//! In-memory copy of the last full fetch plus a sortable, filterable view over
//! it. The view never reorders the table itself; it keeps a list of indices
//! into the table so a visible position can always be mapped back to the
//! canonical row.

use crate::models::{sample_customers, Column, Customer};

/// Where the rows in a [`CustomerTable`] came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DataOrigin {
    Store,
    /// Placeholder rows shown while disconnected. Nothing here is persisted.
    Sample,
}

/// Snapshot of the `customers` table. Rebuilt wholesale after each mutation.
#[derive(Debug, Clone)]
pub struct CustomerTable {
    rows: Vec<Customer>,
    origin: DataOrigin,
}

impl CustomerTable {
    pub fn from_store(rows: Vec<Customer>) -> Self {
        Self {
            rows,
            origin: DataOrigin::Store,
        }
    }

    pub fn samples() -> Self {
        Self {
            rows: sample_customers(),
            origin: DataOrigin::Sample,
        }
    }

    pub fn empty() -> Self {
        Self::from_store(Vec::new())
    }

    pub fn origin(&self) -> DataOrigin {
        self.origin
    }

    pub fn is_placeholder(&self) -> bool {
        self.origin == DataOrigin::Sample
    }

    pub fn rows(&self) -> &[Customer] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Customer> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers() -> Vec<&'static str> {
        Column::ALL.iter().map(|column| column.header()).collect()
    }

    pub fn position_of(&self, id: i64) -> Option<usize> {
        self.rows.iter().position(|customer| customer.id == id)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Ascending => "▲",
            SortOrder::Descending => "▼",
        }
    }
}

/// Sort/filter proxy over a [`CustomerTable`].
#[derive(Debug, Clone)]
pub struct TableView {
    visible: Vec<usize>,
    sort: Option<(Column, SortOrder)>,
    filter: Option<String>,
    selected: usize,
}

impl Default for TableView {
    fn default() -> Self {
        Self {
            visible: Vec::new(),
            sort: None,
            filter: None,
            selected: 0,
        }
    }
}

impl TableView {
    pub fn new(table: &CustomerTable) -> Self {
        let mut view = Self::default();
        view.rebuild(table);
        view
    }

    /// Recompute the visible rows after the table was replaced, keeping the
    /// selection on the same customer when it is still visible.
    pub fn refresh(&mut self, table: &CustomerTable, previous: Option<i64>) {
        self.rebuild(table);
        if let Some(id) = previous {
            if self.select_id(table, id) {
                return;
            }
        }
        self.clamp_selection();
    }

    pub fn sort(&self) -> Option<(Column, SortOrder)> {
        self.sort
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Sort by `column`, or go back to store order with `None`. The current
    /// selection follows its customer.
    pub fn set_sort(&mut self, table: &CustomerTable, sort: Option<(Column, SortOrder)>) {
        let keep = self.selected_customer(table).map(|customer| customer.id);
        self.sort = sort;
        self.refresh(table, keep);
    }

    /// Step the sort column through `None → ID → … → Updated → None`.
    pub fn cycle_sort(&mut self, table: &CustomerTable, forward: bool) {
        let order = self.sort.map(|(_, order)| order).unwrap_or(SortOrder::Ascending);
        let next = match self.sort {
            None if forward => Some(0),
            None => Some(Column::ALL.len() - 1),
            Some((column, _)) => {
                let index = column.index();
                if forward {
                    (index + 1 < Column::ALL.len()).then_some(index + 1)
                } else {
                    index.checked_sub(1)
                }
            }
        };
        let sort = next.map(|index| (Column::ALL[index], order));
        self.set_sort(table, sort);
    }

    pub fn reverse_sort(&mut self, table: &CustomerTable) {
        if let Some((column, order)) = self.sort {
            self.set_sort(table, Some((column, order.reversed())));
        }
    }

    /// Case-insensitive substring filter over every displayed column.
    pub fn set_filter(&mut self, table: &CustomerTable, filter: Option<String>) {
        let keep = self.selected_customer(table).map(|customer| customer.id);
        self.filter = filter.filter(|query| !query.trim().is_empty());
        self.refresh(table, keep);
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Canonical table index for the row shown at `visible`.
    pub fn map_to_source(&self, visible: usize) -> Option<usize> {
        self.visible.get(visible).copied()
    }

    /// Customers in display order.
    pub fn visible_rows<'a>(
        &'a self,
        table: &'a CustomerTable,
    ) -> impl Iterator<Item = &'a Customer> + 'a {
        self.visible.iter().filter_map(move |&index| table.row(index))
    }

    pub fn selected(&self) -> Option<usize> {
        (!self.visible.is_empty()).then_some(self.selected)
    }

    /// The canonical row behind the current visible selection.
    pub fn selected_customer<'a>(&self, table: &'a CustomerTable) -> Option<&'a Customer> {
        let visible = self.selected()?;
        self.map_to_source(visible).and_then(|index| table.row(index))
    }

    pub fn select(&mut self, visible: usize) {
        self.selected = visible;
        self.clamp_selection();
    }

    /// Move the selection to customer `id`. Returns false when it is filtered
    /// out or gone.
    pub fn select_id(&mut self, table: &CustomerTable, id: i64) -> bool {
        let Some(source) = table.position_of(id) else {
            return false;
        };
        match self.visible.iter().position(|&index| index == source) {
            Some(position) => {
                self.selected = position;
                true
            }
            None => false,
        }
    }

    pub fn move_selection(&mut self, offset: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
    }

    fn rebuild(&mut self, table: &CustomerTable) {
        let query = self.filter.as_ref().map(|q| q.trim().to_lowercase());
        self.visible = table
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, customer)| match &query {
                Some(query) => matches_query(customer, query),
                None => true,
            })
            .map(|(index, _)| index)
            .collect();

        if let Some((column, order)) = self.sort {
            let rows = table.rows();
            self.visible.sort_by(|&a, &b| {
                let cmp = column.compare(&rows[a], &rows[b]);
                match order {
                    SortOrder::Ascending => cmp,
                    SortOrder::Descending => cmp.reverse(),
                }
            });
        }
    }

    fn clamp_selection(&mut self) {
        if self.visible.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.visible.len() {
            self.selected = self.visible.len() - 1;
        }
    }
}

fn matches_query(customer: &Customer, query: &str) -> bool {
    Column::ALL
        .iter()
        .any(|column| column.display(customer).to_lowercase().contains(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomerFields;

    fn customer(id: i64, company: &str, city: &str) -> Customer {
        Customer {
            id,
            fields: CustomerFields {
                company_name: company.to_string(),
                city: city.to_string(),
                is_active: true,
                ..CustomerFields::default()
            },
            date_created: "2024-01-01 00:00:00".to_string(),
            date_updated: "2024-01-01 00:00:00".to_string(),
        }
    }

    fn table() -> CustomerTable {
        CustomerTable::from_store(vec![
            customer(7, "Zeta Ltd", "Oslo"),
            customer(3, "alpha inc", "Berlin"),
            customer(5, "Mid Co", "Oslo"),
        ])
    }

    #[test]
    fn unsorted_view_keeps_store_order() {
        let table = table();
        let view = TableView::new(&table);
        let ids: Vec<i64> = view.visible_rows(&table).map(|c| c.id).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn sorted_selection_maps_back_to_canonical_row() {
        let table = table();
        let mut view = TableView::new(&table);
        view.set_sort(&table, Some((Column::CompanyName, SortOrder::Ascending)));

        view.select(0);
        assert_eq!(view.map_to_source(0), Some(1));
        assert_eq!(view.selected_customer(&table).map(|c| c.id), Some(3));

        view.select(2);
        assert_eq!(view.selected_customer(&table).map(|c| c.id), Some(7));
    }

    #[test]
    fn descending_sort_reverses_order() {
        let table = table();
        let mut view = TableView::new(&table);
        view.set_sort(&table, Some((Column::Id, SortOrder::Ascending)));
        view.reverse_sort(&table);
        let ids: Vec<i64> = view.visible_rows(&table).map(|c| c.id).collect();
        assert_eq!(ids, vec![7, 5, 3]);
    }

    #[test]
    fn filter_matches_any_column_case_insensitively() {
        let table = table();
        let mut view = TableView::new(&table);
        view.set_filter(&table, Some("OSLO".to_string()));
        let ids: Vec<i64> = view.visible_rows(&table).map(|c| c.id).collect();
        assert_eq!(ids, vec![7, 5]);

        view.select(1);
        assert_eq!(view.selected_customer(&table).map(|c| c.id), Some(5));
    }

    #[test]
    fn blank_filter_is_ignored() {
        let table = table();
        let mut view = TableView::new(&table);
        view.set_filter(&table, Some("   ".to_string()));
        assert_eq!(view.filter(), None);
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn selection_follows_customer_across_sort_changes() {
        let table = table();
        let mut view = TableView::new(&table);
        view.select(2);
        view.set_sort(&table, Some((Column::Id, SortOrder::Ascending)));
        assert_eq!(view.selected_customer(&table).map(|c| c.id), Some(5));
        assert_eq!(view.selected(), Some(1));
    }

    #[test]
    fn refresh_clamps_when_selected_row_disappears() {
        let table = table();
        let mut view = TableView::new(&table);
        view.select(2);

        let smaller = CustomerTable::from_store(vec![customer(7, "Zeta Ltd", "Oslo")]);
        view.refresh(&smaller, Some(5));
        assert_eq!(view.selected(), Some(0));
        assert_eq!(view.selected_customer(&smaller).map(|c| c.id), Some(7));
    }

    #[test]
    fn empty_view_has_no_selection() {
        let table = CustomerTable::empty();
        let mut view = TableView::new(&table);
        view.move_selection(3);
        assert_eq!(view.selected(), None);
        assert!(view.selected_customer(&table).is_none());
    }

    #[test]
    fn cycling_sort_walks_columns_and_returns_to_store_order() {
        let table = table();
        let mut view = TableView::new(&table);
        view.cycle_sort(&table, true);
        assert_eq!(view.sort(), Some((Column::Id, SortOrder::Ascending)));
        view.cycle_sort(&table, false);
        assert_eq!(view.sort(), None);
        view.cycle_sort(&table, false);
        assert_eq!(view.sort(), Some((Column::Updated, SortOrder::Ascending)));
    }

    #[test]
    fn headers_cover_every_column() {
        let headers = CustomerTable::headers();
        assert_eq!(headers.len(), 16);
        assert_eq!(headers[4], "Contact");
        assert_eq!(headers[13], "Active");
    }

    #[test]
    fn samples_are_tagged_as_placeholders() {
        let table = CustomerTable::samples();
        assert!(table.is_placeholder());
        assert_eq!(table.origin(), DataOrigin::Sample);
        assert!(!CustomerTable::empty().is_placeholder());
    }
}
