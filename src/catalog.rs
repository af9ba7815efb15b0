//! Catalog search: a wholesale-fetched list filtered client-side by name.

use crate::models::{CatalogEntity, Client};

/// Anything that can be searched by its display name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for CatalogEntity {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Client {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Case-insensitive substring match on `name`, preserving catalog order.
pub fn filter_by_name<'a, T: Named>(items: &'a [T], query: &str) -> Vec<&'a T> {
    matching_indices(items, query)
        .into_iter()
        .map(|i| &items[i])
        .collect()
}

fn matching_indices<T: Named>(items: &[T], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..items.len()).collect();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.name().to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// A catalog plus the current search query and its filtered view.
#[derive(Debug, Clone)]
pub struct CatalogView<T> {
    items: Vec<T>,
    query: String,
    matches: Vec<usize>,
}

impl<T: Named> Default for CatalogView<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            query: String::new(),
            matches: Vec::new(),
        }
    }
}

impl<T: Named> CatalogView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole catalog, keeping the current query.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.refilter();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.refilter();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Entities matching the query, in catalog order.
    pub fn matches(&self) -> impl Iterator<Item = &T> + '_ {
        self.matches.iter().map(move |&i| &self.items[i])
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// The `n`-th entity of the filtered view.
    pub fn get(&self, n: usize) -> Option<&T> {
        self.matches.get(n).map(|&i| &self.items[i])
    }

    fn refilter(&mut self) {
        self.matches = matching_indices(&self.items, &self.query);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn entity(name: &str) -> CatalogEntity {
        CatalogEntity {
            name: name.to_string(),
            price: Decimal::ONE,
            description: String::new(),
            owner_ref: "u1".to_string(),
        }
    }

    fn names<'a>(items: impl IntoIterator<Item = &'a CatalogEntity>) -> Vec<&'a str> {
        items.into_iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_filter_scenario() {
        let catalog = vec![entity("Aspirin"), entity("Ibuprofen")];
        assert_eq!(names(filter_by_name(&catalog, "asp")), vec!["Aspirin"]);
        assert_eq!(
            names(filter_by_name(&catalog, "")),
            vec!["Aspirin", "Ibuprofen"]
        );
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let catalog = vec![entity("Amoxicillin"), entity("CLAVAMOX"), entity("Gauze")];
        assert_eq!(
            names(filter_by_name(&catalog, "MoX")),
            vec!["Amoxicillin", "CLAVAMOX"]
        );
        assert!(filter_by_name(&catalog, "zzz").is_empty());
    }

    #[test]
    fn test_view_keeps_query_across_refetch() {
        let mut view = CatalogView::new();
        view.push_char('i');
        view.push_char('b');
        view.replace(vec![entity("Aspirin"), entity("Ibuprofen")]);
        assert_eq!(names(view.matches()), vec!["Ibuprofen"]);
        assert_eq!(view.get(0).map(|e| e.name.as_str()), Some("Ibuprofen"));
        assert!(view.get(1).is_none());

        view.pop_char();
        view.pop_char();
        assert_eq!(view.match_count(), 2);
    }

    proptest! {
        #[test]
        fn prop_empty_query_returns_catalog_in_order(raw in prop::collection::vec("[a-zA-Z ]{0,12}", 0..20)) {
            let catalog: Vec<CatalogEntity> = raw.iter().map(|n| entity(n)).collect();
            let filtered = filter_by_name(&catalog, "");
            prop_assert_eq!(filtered.len(), catalog.len());
            for (a, b) in filtered.iter().zip(catalog.iter()) {
                prop_assert_eq!(&a.name, &b.name);
            }
        }

        #[test]
        fn prop_every_match_contains_query(raw in prop::collection::vec("[a-zA-Z]{0,12}", 0..20), query in "[a-zA-Z]{0,3}") {
            let catalog: Vec<CatalogEntity> = raw.iter().map(|n| entity(n)).collect();
            let needle = query.to_lowercase();
            let filtered = filter_by_name(&catalog, &query);
            for item in &filtered {
                prop_assert!(item.name.to_lowercase().contains(&needle));
            }
            let expected = catalog.iter().filter(|e| e.name.to_lowercase().contains(&needle)).count();
            prop_assert_eq!(filtered.len(), expected);
        }
    }
}
