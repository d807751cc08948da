use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{Store, StoreExt};
use crate::error::{ApiError, StorageError};

/// A record type generated once per day and stored as one JSON array.
pub trait DailyContent: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Document name in the store
    const COLLECTION: &'static str;
    /// Singular noun used in API messages ("Word", "Idiom", ...)
    const NOUN: &'static str;

    fn id(&self) -> &str;
    fn date_added(&self) -> &str;
}

/// Read-modify-write access to one collection.
///
/// All mutations go through a per-repository lock so concurrent requests in
/// this process cannot interleave a read with another request's write.
#[derive(Debug)]
pub struct DailyRepository<T> {
    store: Arc<dyn Store>,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DailyContent> DailyRepository<T> {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store, lock: Mutex::new(()), _marker: PhantomData }
    }

    pub async fn all(&self) -> Result<Vec<T>, StorageError> {
        self.store.load::<Vec<T>>(T::COLLECTION).await
    }

    /// Items whose `dateAdded` equals `date`.
    pub async fn for_date(&self, date: &str) -> Result<Vec<T>, StorageError> {
        let mut items = self.all().await?;
        items.retain(|item| item.date_added() == date);
        Ok(items)
    }

    pub async fn get(&self, id: &str) -> Result<Option<T>, StorageError> {
        Ok(self.all().await?.into_iter().find(|item| item.id() == id))
    }

    pub async fn append(&self, items: Vec<T>) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        self.append_locked(items).await
    }

    async fn append_locked(&self, items: Vec<T>) -> Result<(), StorageError> {
        let mut all = self.all().await?;
        all.extend(items);
        self.store.save(T::COLLECTION, &all).await
    }

    /// Return the items for `date`, generating and storing a batch first when
    /// there are none. The flag is `true` when the items were already stored.
    ///
    /// The lock is held across `generate`, so simultaneous first requests of
    /// the day produce a single batch.
    pub async fn todays_or_generate<F, Fut>(
        &self,
        date: &str,
        generate: F,
    ) -> Result<(Vec<T>, bool), StorageError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Vec<T>> + Send,
    {
        let _guard = self.lock.lock().await;

        let existing = self.for_date(date).await?;
        if !existing.is_empty() {
            debug!(collection = T::COLLECTION, count = existing.len(), "serving cached daily content");
            return Ok((existing, true));
        }

        let fresh = generate().await;
        info!(collection = T::COLLECTION, count = fresh.len(), date, "storing generated daily content");
        self.append_locked(fresh.clone()).await?;
        Ok((fresh, false))
    }

    /// Apply `change` to the record with `id` and persist the collection.
    /// Returns `Ok(None)` when no record has that id.
    pub async fn update<F, E>(&self, id: &str, change: F) -> Result<Option<T>, E>
    where
        F: FnOnce(&mut T) -> Result<(), E> + Send,
        E: From<StorageError>,
    {
        let _guard = self.lock.lock().await;

        let mut all = self.all().await?;
        let Some(record) = all.iter_mut().find(|item| item.id() == id) else {
            return Ok(None);
        };
        change(record)?;
        let updated = record.clone();
        self.store.save(T::COLLECTION, &all).await?;
        Ok(Some(updated))
    }

    /// Shallow-merge the fields of `updates` into the record with `id`.
    pub async fn merge(&self, id: &str, updates: &Value) -> Result<Option<T>, ApiError> {
        self.update(id, |record| {
            *record = merge_fields(record, updates)?;
            Ok(())
        })
        .await
    }
}

/// Overlay the top-level keys of `updates` onto `record`. The `id` field is
/// never replaced, and the result must still be a valid `T`.
pub fn merge_fields<T: DailyContent>(record: &T, updates: &Value) -> Result<T, ApiError> {
    let Value::Object(patch) = updates else {
        return Err(ApiError::BadRequest("updates must be a JSON object".to_string()));
    };

    let mut merged = serde_json::to_value(record).map_err(StorageError::from)?;
    if let Value::Object(fields) = &mut merged {
        for (key, value) in patch {
            if key != "id" {
                fields.insert(key.clone(), value.clone());
            }
        }
    }

    serde_json::from_value(merged)
        .map_err(|e| ApiError::BadRequest(format!("Invalid updates for {}: {e}", T::NOUN.to_lowercase())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VocabularyWord;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn word(id: &str, date: &str) -> VocabularyWord {
        VocabularyWord {
            id: id.to_string(),
            word: "Laconic".to_string(),
            meaning: "Using very few words".to_string(),
            synonym: "Terse".to_string(),
            example: "His laconic reply ended the debate.".to_string(),
            field: "literary".to_string(),
            user_example: None,
            learned: false,
            difficult: false,
            date_added: date.to_string(),
        }
    }

    #[test]
    fn merge_keeps_id_and_applies_fields() {
        let merged = merge_fields(&word("w1", "2024-01-01"), &json!({"id": "other", "learned": true})).unwrap();
        assert_eq!(merged.id, "w1");
        assert!(merged.learned);
    }

    #[test]
    fn merge_rejects_wrong_types() {
        let err = merge_fields(&word("w1", "2024-01-01"), &json!({"learned": "yes"})).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        let err = merge_fields(&word("w1", "2024-01-01"), &json!(["learned"])).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn generation_runs_once_per_date() {
        let repo = DailyRepository::<VocabularyWord>::new(Arc::new(MemoryStore::new()));

        let (first, cached) = repo
            .todays_or_generate("2024-01-01", || async { vec![word("a", "2024-01-01")] })
            .await
            .unwrap();
        assert!(!cached);
        assert_eq!(first.len(), 1);

        let (second, cached) = repo
            .todays_or_generate("2024-01-01", || async { vec![word("regenerated", "2024-01-01")] })
            .await
            .unwrap();
        assert!(cached);
        assert_eq!(second, first);

        let (next_day, cached) = repo
            .todays_or_generate("2024-01-02", || async { vec![word("b", "2024-01-02")] })
            .await
            .unwrap();
        assert!(!cached);
        assert_eq!(next_day[0].id, "b");
        assert_eq!(repo.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn merge_unknown_id_is_none() {
        let repo = DailyRepository::<VocabularyWord>::new(Arc::new(MemoryStore::new()));
        repo.append(vec![word("a", "2024-01-01")]).await.unwrap();
        assert!(repo.merge("missing", &json!({"learned": true})).await.unwrap().is_none());
        let updated = repo.merge("a", &json!({"learned": true})).await.unwrap().unwrap();
        assert!(updated.learned);
        assert!(repo.all().await.unwrap()[0].learned);
    }
}
