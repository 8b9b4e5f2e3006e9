use crate::types::{Item, ItemStatus};

/// Which subset of a column is on screen. The last filter applied wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewFilter {
    #[default]
    All,
    Search(String),
    Status(ItemStatus),
}

/// Display overlay for one column.
///
/// Keeps the full item list next to the active filter so the filter can be
/// changed or cleared without going back to the store.
#[derive(Debug, Clone, Default)]
pub struct ColumnView {
    items: Vec<Item>,
    filter: ViewFilter,
}

impl ColumnView {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            filter: ViewFilter::All,
        }
    }

    /// Replace the unfiltered list after a store change; the filter stays.
    pub fn refresh(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    pub fn set_query(&mut self, query: &str) {
        self.filter = ViewFilter::Search(query.to_string());
    }

    pub fn filter_by_status(&mut self, status: ItemStatus) {
        self.filter = ViewFilter::Status(status);
    }

    pub fn clear_filter(&mut self) {
        self.filter = ViewFilter::All;
    }

    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn visible(&self) -> Vec<&Item> {
        match &self.filter {
            ViewFilter::All => clear_filter(&self.items),
            ViewFilter::Search(query) => search(&self.items, query),
            ViewFilter::Status(status) => filter_by_status(&self.items, *status),
        }
    }
}

/// Items whose "title description" text contains every whitespace-separated
/// term of `query`, case-insensitively. Accents are matched as written. A
/// query without terms matches all.
pub fn search<'a>(items: &'a [Item], query: &str) -> Vec<&'a Item> {
    let terms = search_terms(query);
    if terms.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            let haystack = format!("{} {}", item.title, item.description).to_lowercase();
            terms.iter().all(|term| haystack.contains(term.as_str()))
        })
        .collect()
}

pub fn filter_by_status(items: &[Item], status: ItemStatus) -> Vec<&Item> {
    items.iter().filter(|item| item.status == status).collect()
}

pub fn clear_filter(items: &[Item]) -> Vec<&Item> {
    items.iter().collect()
}

fn search_terms(query: &str) -> Vec<String> {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|term| !term.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str, description: &str, status: ItemStatus) -> Item {
        Item {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            status,
        }
    }

    fn sample() -> Vec<Item> {
        vec![
            item("1", "Urgent", "login bug", ItemStatus::Todo),
            item("2", "Bug triage", "not urgent", ItemStatus::InProgress),
            item("3", "Urgent", "release notes", ItemStatus::Done),
            item("4", "Café menu", "update prices", ItemStatus::Todo),
        ]
    }

    fn ids(items: &[&Item]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_search_requires_every_term() {
        let items = sample();
        assert_eq!(ids(&search(&items, "urgent bug")), vec!["1", "2"]);
        assert_eq!(ids(&search(&items, "BUG  Urgent")), vec!["1", "2"]);
        assert_eq!(ids(&search(&items, "release")), vec!["3"]);
        assert!(search(&items, "urgent missing").is_empty());
    }

    #[test]
    fn test_search_spans_title_and_description() {
        let items = vec![item("1", "Fix", "parser", ItemStatus::Todo)];
        assert_eq!(search(&items, "fix parser").len(), 1);
        assert_eq!(search(&items, "fix pars").len(), 1);
    }

    #[test]
    fn test_empty_query_returns_all() {
        let items = sample();
        assert_eq!(search(&items, "").len(), 4);
        assert_eq!(search(&items, "   \t ").len(), 4);
    }

    #[test]
    fn test_search_matches_accents_as_written() {
        let items = sample();
        assert!(search(&items, "cafe").is_empty());
        assert_eq!(ids(&search(&items, "café")), vec!["4"]);
        assert_eq!(ids(&search(&items, "CAFÉ")), vec!["4"]);
    }

    #[test]
    fn test_combining_mark_query_is_a_real_term() {
        let items = vec![
            item("1", "plain", "text", ItemStatus::Todo),
            item("2", "x\u{301}", "", ItemStatus::Todo),
        ];
        assert_eq!(ids(&search(&items, "\u{301}")), vec!["2"]);
    }

    #[test]
    fn test_filter_by_status() {
        let items = sample();
        assert_eq!(ids(&filter_by_status(&items, ItemStatus::Todo)), vec!["1", "4"]);
        assert_eq!(ids(&filter_by_status(&items, ItemStatus::Done)), vec!["3"]);
        assert_eq!(clear_filter(&items).len(), 4);
    }

    #[test]
    fn test_column_view_last_filter_wins() {
        let mut view = ColumnView::new(sample());
        view.set_query("urgent");
        assert_eq!(ids(&view.visible()), vec!["1", "2", "3"]);

        view.filter_by_status(ItemStatus::Todo);
        assert_eq!(ids(&view.visible()), vec!["1", "4"]);

        view.clear_filter();
        assert_eq!(view.filter(), &ViewFilter::All);
        assert_eq!(view.visible().len(), 4);
    }

    #[test]
    fn test_column_view_refresh_keeps_filter() {
        let mut view = ColumnView::new(sample());
        view.set_query("urgent");
        let mut items = sample();
        items.remove(0);
        view.refresh(items);
        assert_eq!(ids(&view.visible()), vec!["2", "3"]);
        assert_eq!(view.items().len(), 3);
    }
}
