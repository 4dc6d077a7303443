//! Collection listings: paged students, student search and active items.

use crate::records;
use mercy_core::{Item, Student};
use mercy_store::{DocumentStore, Filter, StoreError};

/// A 1-based page of `limit` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
}

impl Page {
    /// A page only exists when both numbers are at least 1.
    pub fn new(page: u64, limit: u64) -> Option<Self> {
        (page >= 1 && limit >= 1).then_some(Self { page, limit })
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// All students, or one page of them.
pub async fn list_students(
    store: &dyn DocumentStore,
    page: Option<Page>,
) -> Result<Vec<Student>, StoreError> {
    match page {
        Some(page) => records::find_all(store, &Filter::default(), page.skip(), Some(page.limit)).await,
        None => records::find_all(store, &Filter::default(), 0, None).await,
    }
}

/// Students whose `studentId` or name contains `prompt`, ignoring case.
/// An empty prompt matches nothing.
pub async fn search_students(
    store: &dyn DocumentStore,
    prompt: &str,
) -> Result<Vec<Student>, StoreError> {
    let needle = prompt.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    let students: Vec<Student> = records::find_all(store, &Filter::default(), 0, None).await?;
    Ok(students
        .into_iter()
        .filter(|s| {
            s.student_id.to_lowercase().contains(&needle) || s.name.to_lowercase().contains(&needle)
        })
        .collect())
}

pub async fn active_items(store: &dyn DocumentStore) -> Result<Vec<Item>, StoreError> {
    records::find_all(store, &Filter::eq("active", true), 0, None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::insert;
    use mercy_store::MemoryStore;

    async fn seed_students(store: &MemoryStore) {
        for (id, name) in [("S1", "Ann Lee"), ("S2", "Bo"), ("T3", "Annabel"), ("S4", "Cy")] {
            let mut student = Student::new(id);
            student.name = name.to_string();
            insert(store, &student).await.unwrap();
        }
    }

    fn ids(students: &[Student]) -> Vec<&str> {
        students.iter().map(|s| s.student_id.as_str()).collect()
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(Page::new(0, 10), None);
        assert_eq!(Page::new(1, 0), None);
        assert_eq!(Page::new(3, 10).unwrap().skip(), 20);
    }

    #[tokio::test]
    async fn test_list_students_pages() {
        let store = MemoryStore::new();
        seed_students(&store).await;

        let all = list_students(&store, None).await.unwrap();
        assert_eq!(ids(&all), vec!["S1", "S2", "T3", "S4"]);

        let second = list_students(&store, Page::new(2, 3)).await.unwrap();
        assert_eq!(ids(&second), vec!["S4"]);

        let past_end = list_students(&store, Page::new(5, 3)).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_id_or_name_case_insensitively() {
        let store = MemoryStore::new();
        seed_students(&store).await;

        let found = search_students(&store, "ANN").await.unwrap();
        assert_eq!(ids(&found), vec!["S1", "T3"]);

        let found = search_students(&store, "t3").await.unwrap();
        assert_eq!(ids(&found), vec!["T3"]);

        assert!(search_students(&store, "  ").await.unwrap().is_empty());
        assert!(search_students(&store, "zzz").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_active_items_only() {
        let store = MemoryStore::new();
        let pen = Item::new("pen");
        let mut retired = Item::new("lamp");
        retired.active = false;
        insert(&store, &pen).await.unwrap();
        insert(&store, &retired).await.unwrap();

        let items = active_items(&store).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "pen");
    }
}
