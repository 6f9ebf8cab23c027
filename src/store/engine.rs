//! Moodlog entry store
//!
//! The store owns the full entry collection in memory, hydrated once from a
//! single JSON document and re-serialized in full after every mutating
//! operation. There is no incremental write log; at personal-journal scale
//! (thousands of rows) a whole-collection rewrite per mutation is cheap, and
//! callers must not assume the design tolerates much more.
//!
//! Thread-safe via Tokio's async RwLock for concurrent access.

use crate::goals::AchievementTracker;
use crate::integrations::webhook::WebhookNotifier;
use crate::store::codec;
use crate::store::error::{StoreError, StoreResult};
use crate::store::types::{normalize_tags, MoodEntry, MoodRating};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Configuration for the entry store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for all persisted state
    pub data_dir: PathBuf,
    /// Optional obfuscation passphrase for the entry collection
    pub passphrase: Option<String>,
    /// Interval for the background reconciliation poll, in seconds
    pub sync_interval_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("moodlog_data"),
            passphrase: None,
            sync_interval_secs: 30,
        }
    }
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Builder: set the obfuscation passphrase
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    /// Path to the entry collection file
    pub fn entries_path(&self) -> PathBuf {
        self.data_dir.join("entries.json")
    }

    /// Path to the search history file
    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("search_history.json")
    }

    /// Path to the goals file
    pub fn goals_path(&self) -> PathBuf {
        self.data_dir.join("goals.json")
    }

    /// Path to the unlocked-achievements file
    pub fn achievements_path(&self) -> PathBuf {
        self.data_dir.join("achievements.json")
    }
}

/// How imported entries merge into the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Keep existing entries; skip imported entries whose id already exists
    Append,
    /// Discard existing entries and take the imported list wholesale
    Replace,
}

/// Outcome of an import or restore operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Entries added to the collection
    pub added: usize,
    /// Imported entries dropped because their id already existed (Append only)
    pub skipped_duplicates: usize,
}

/// The moodlog entry store
pub struct EntryStore {
    config: StoreConfig,
    /// The whole collection, kept sorted by `date` ascending
    entries: Arc<RwLock<Vec<MoodEntry>>>,
    /// Unlocked-achievement bookkeeping, re-evaluated on every save
    achievements: Arc<RwLock<AchievementTracker>>,
    /// Optional outbound event notifier
    notifier: Option<Arc<WebhookNotifier>>,
    /// Shutdown signal for the background sync task
    shutdown: Arc<RwLock<bool>>,
}

impl EntryStore {
    /// Open the store, hydrating the collection from disk
    ///
    /// A missing file yields an empty collection. Corrupt plain JSON is
    /// logged and degrades to an empty collection so the application stays
    /// usable; an obfuscated payload that cannot be decoded surfaces
    /// [`StoreError::WrongPassphrase`] so the caller can prompt again.
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let entries = Self::load_entries(&config)?;
        tracing::info!(count = entries.len(), "Loaded entry collection");

        let achievements = AchievementTracker::load(&config.achievements_path());

        Ok(Self {
            config,
            entries: Arc::new(RwLock::new(entries)),
            achievements: Arc::new(RwLock::new(achievements)),
            notifier: None,
            shutdown: Arc::new(RwLock::new(false)),
        })
    }

    /// Attach a webhook notifier for store events
    pub fn with_notifier(mut self, notifier: Arc<WebhookNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    fn load_entries(config: &StoreConfig) -> StoreResult<Vec<MoodEntry>> {
        let path = config.entries_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let raw = std::fs::read_to_string(&path)?;
        let was_obfuscated = codec::is_obfuscated(&raw);
        let json = if was_obfuscated {
            let passphrase = config
                .passphrase
                .as_deref()
                .ok_or(StoreError::WrongPassphrase)?;
            codec::decode(&raw, passphrase)?
        } else {
            raw
        };

        match serde_json::from_str::<Vec<MoodEntry>>(&json) {
            Ok(mut entries) => {
                entries.sort_by_key(|e| e.date);
                Ok(entries)
            }
            // A wrong passphrase can decode to UTF-8 garbage; parse failure
            // of a payload that went through the codec is a passphrase
            // problem. A plain corrupt file is not.
            Err(_) if was_obfuscated => Err(StoreError::WrongPassphrase),
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Corrupt entry collection, starting empty");
                Ok(Vec::new())
            }
        }
    }

    /// Serialize the collection and write it to disk
    fn write_entries(&self, entries: &[MoodEntry]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let payload = match &self.config.passphrase {
            Some(pass) => codec::encode(json.as_bytes(), pass),
            None => json,
        };
        std::fs::write(self.config.entries_path(), payload)?;
        Ok(())
    }

    /// Persist after a mutation, then run the save-time hooks
    async fn save(&self, entries: &[MoodEntry]) -> StoreResult<()> {
        self.write_entries(entries)?;
        self.evaluate_achievements(entries).await;
        Ok(())
    }

    async fn evaluate_achievements(&self, entries: &[MoodEntry]) {
        let newly = {
            let mut tracker = self.achievements.write().await;
            let newly = tracker.evaluate(entries);
            if !newly.is_empty() {
                if let Err(e) = tracker.save(&self.config.achievements_path()) {
                    tracing::warn!(error = %e, "Failed to persist achievements");
                }
            }
            newly
        };

        for achievement in newly {
            tracing::info!(id = %achievement.id, "Achievement unlocked: {}", achievement.name);
            self.notify(
                "achievement.unlocked",
                serde_json::json!({ "id": achievement.id, "name": achievement.name }),
            );
        }
    }

    fn notify(&self, event: &str, data: serde_json::Value) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(event, data);
        }
    }

    /// A snapshot of the collection, sorted by date ascending
    pub async fn snapshot(&self) -> Vec<MoodEntry> {
        self.entries.read().await.clone()
    }

    /// Number of entries in the collection
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the collection is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Look up a single entry by id
    pub async fn get(&self, id: &str) -> Option<MoodEntry> {
        self.entries.read().await.iter().find(|e| e.id == id).cloned()
    }

    /// Add a new entry
    ///
    /// The incoming id is ignored; the store assigns a fresh one. Tags are
    /// re-normalized and the mood value re-validated on the way in.
    pub async fn add(&self, mut entry: MoodEntry) -> StoreResult<MoodEntry> {
        if !MoodRating::in_range(entry.mood.value) {
            return Err(StoreError::InvalidMood(entry.mood.value));
        }
        entry.id = uuid::Uuid::new_v4().to_string();
        entry.tags = normalize_tags(&entry.tags);

        let snapshot = {
            let mut entries = self.entries.write().await;
            entries.push(entry.clone());
            entries.sort_by_key(|e| e.date);
            entries.clone()
        };
        self.save(&snapshot).await?;

        self.notify(
            "entry.created",
            serde_json::json!({ "id": entry.id, "mood": entry.mood.value }),
        );
        Ok(entry)
    }

    /// Replace an existing entry (matched by id)
    pub async fn update(&self, mut updated: MoodEntry) -> StoreResult<()> {
        if !MoodRating::in_range(updated.mood.value) {
            return Err(StoreError::InvalidMood(updated.mood.value));
        }
        updated.tags = normalize_tags(&updated.tags);

        let snapshot = {
            let mut entries = self.entries.write().await;
            let slot = entries
                .iter_mut()
                .find(|e| e.id == updated.id)
                .ok_or_else(|| StoreError::EntryNotFound(updated.id.clone()))?;
            *slot = updated.clone();
            entries.sort_by_key(|e| e.date);
            entries.clone()
        };
        self.save(&snapshot).await?;

        self.notify("entry.updated", serde_json::json!({ "id": updated.id }));
        Ok(())
    }

    /// Delete an entry by id
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let snapshot = {
            let mut entries = self.entries.write().await;
            let before = entries.len();
            entries.retain(|e| e.id != id);
            if entries.len() == before {
                return Err(StoreError::EntryNotFound(id.to_string()));
            }
            entries.clone()
        };
        self.save(&snapshot).await?;

        self.notify("entry.deleted", serde_json::json!({ "id": id }));
        Ok(())
    }

    /// Delete a batch of entries; returns how many were removed
    pub async fn delete_many(&self, ids: &[String]) -> StoreResult<usize> {
        let (snapshot, removed) = {
            let mut entries = self.entries.write().await;
            let before = entries.len();
            entries.retain(|e| !ids.contains(&e.id));
            (entries.clone(), before - entries.len())
        };
        if removed > 0 {
            self.save(&snapshot).await?;
            self.notify("entries.deleted", serde_json::json!({ "count": removed }));
        }
        Ok(removed)
    }

    /// Batch edit: add tags to every entry in the id set
    ///
    /// Returns how many entries were touched.
    pub async fn tag_many(&self, ids: &[String], tags: &[String]) -> StoreResult<usize> {
        let new_tags = normalize_tags(tags);
        if new_tags.is_empty() {
            return Ok(0);
        }

        let (snapshot, touched) = {
            let mut entries = self.entries.write().await;
            let mut touched = 0;
            for entry in entries.iter_mut().filter(|e| ids.contains(&e.id)) {
                let mut merged = entry.tags.clone();
                merged.extend(new_tags.iter().cloned());
                entry.tags = normalize_tags(&merged);
                touched += 1;
            }
            (entries.clone(), touched)
        };
        if touched > 0 {
            self.save(&snapshot).await?;
            self.notify("entries.tagged", serde_json::json!({ "count": touched }));
        }
        Ok(touched)
    }

    /// Merge a validated import batch into the collection
    ///
    /// Incoming ids are preserved so an export → import(Replace) round trip
    /// is exact. In Append mode, entries whose id already exists are skipped.
    pub async fn import(
        &self,
        incoming: Vec<MoodEntry>,
        mode: ImportMode,
    ) -> StoreResult<ImportOutcome> {
        let (snapshot, outcome) = {
            let mut entries = self.entries.write().await;
            let outcome = match mode {
                ImportMode::Replace => {
                    let added = incoming.len();
                    *entries = incoming;
                    ImportOutcome {
                        added,
                        skipped_duplicates: 0,
                    }
                }
                ImportMode::Append => {
                    let mut added = 0;
                    let mut skipped = 0;
                    for entry in incoming {
                        if entries.iter().any(|e| e.id == entry.id) {
                            skipped += 1;
                        } else {
                            entries.push(entry);
                            added += 1;
                        }
                    }
                    ImportOutcome {
                        added,
                        skipped_duplicates: skipped,
                    }
                }
            };
            entries.sort_by_key(|e| e.date);
            (entries.clone(), outcome)
        };
        self.save(&snapshot).await?;

        self.notify(
            "entries.imported",
            serde_json::json!({ "added": outcome.added, "skipped": outcome.skipped_duplicates }),
        );
        Ok(outcome)
    }

    /// Serialize the collection for backup, obfuscated if a passphrase is set
    pub async fn backup(&self) -> StoreResult<String> {
        let entries = self.entries.read().await;
        let json = serde_json::to_string_pretty(&*entries)?;
        Ok(match &self.config.passphrase {
            Some(pass) => codec::encode(json.as_bytes(), pass),
            None => json,
        })
    }

    /// Replace the collection from a backup payload
    ///
    /// Accepts plain or obfuscated backups. Any decode or parse failure is a
    /// recoverable error raised before the collection is touched.
    pub async fn restore(&self, raw: &str) -> StoreResult<usize> {
        let json = if codec::is_obfuscated(raw) {
            let passphrase = self
                .config
                .passphrase
                .as_deref()
                .ok_or(StoreError::WrongPassphrase)?;
            codec::decode(raw, passphrase)?
        } else {
            raw.to_string()
        };

        let mut restored: Vec<MoodEntry> = serde_json::from_str(&json)
            .map_err(|e| StoreError::InvalidBackup(e.to_string()))?;
        restored.sort_by_key(|e| e.date);
        let count = restored.len();

        let snapshot = {
            let mut entries = self.entries.write().await;
            *entries = restored;
            entries.clone()
        };
        self.save(&snapshot).await?;

        self.notify("store.restored", serde_json::json!({ "count": count }));
        Ok(count)
    }

    /// Reconcile the in-memory collection with the on-disk snapshot
    ///
    /// If another process rewrote the store file, the in-memory copy is
    /// replaced wholesale when the two differ. Last writer wins at the
    /// granularity of the whole collection; concurrent edits from two
    /// processes to different entries will lose one side's change on the
    /// next tick.
    pub async fn reconcile(&self) -> StoreResult<bool> {
        let on_disk = Self::load_entries(&self.config)?;

        let mut entries = self.entries.write().await;
        if *entries != on_disk {
            tracing::info!(
                memory = entries.len(),
                disk = on_disk.len(),
                "Store file changed externally, adopting disk snapshot"
            );
            *entries = on_disk;
            return Ok(true);
        }
        Ok(false)
    }

    /// Store configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Unlocked achievement ids
    pub async fn unlocked_achievements(&self) -> Vec<String> {
        self.achievements.read().await.unlocked().to_vec()
    }

    /// Signal the background sync task to stop
    pub async fn shutdown(&self) {
        *self.shutdown.write().await = true;
    }

    pub(crate) fn shutdown_flag(&self) -> Arc<RwLock<bool>> {
        Arc::clone(&self.shutdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::MoodRating;
    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    async fn create_test_store() -> (EntryStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path());
        let store = EntryStore::open(config).await.unwrap();
        (store, dir)
    }

    fn entry(mood: u8) -> MoodEntry {
        MoodEntry::new(MoodRating::new(mood).unwrap())
    }

    #[tokio::test]
    async fn test_open_empty() {
        let (store, _dir) = create_test_store().await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let (store, _dir) = create_test_store().await;

        let added = store
            .add(entry(4).note("walked the dog").tags(["Outdoors"]))
            .await
            .unwrap();

        let fetched = store.get(&added.id).await.unwrap();
        assert_eq!(fetched.mood.value, 4);
        assert_eq!(fetched.tags, vec!["outdoors"]);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_mood() {
        let (store, _dir) = create_test_store().await;

        let mut bad = entry(3);
        bad.mood.value = 9;
        let result = store.add(bad).await;
        assert!(matches!(result, Err(StoreError::InvalidMood(9))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (store, _dir) = create_test_store().await;

        let added = store.add(entry(2)).await.unwrap();

        let mut changed = added.clone();
        changed.note = "felt better later".to_string();
        store.update(changed).await.unwrap();
        assert_eq!(store.get(&added.id).await.unwrap().note, "felt better later");

        store.delete(&added.id).await.unwrap();
        assert!(store.is_empty().await);

        let result = store.delete(&added.id).await;
        assert!(matches!(result, Err(StoreError::EntryNotFound(_))));
    }

    #[tokio::test]
    async fn test_snapshot_sorted_by_date() {
        let (store, _dir) = create_test_store().await;
        let now = Utc::now();

        store.add(entry(3).at(now)).await.unwrap();
        store.add(entry(4).at(now - Duration::days(2))).await.unwrap();
        store.add(entry(5).at(now - Duration::days(1))).await.unwrap();

        let snapshot = store.snapshot().await;
        assert!(snapshot.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[tokio::test]
    async fn test_persistence_across_sessions() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path());

        {
            let store = EntryStore::open(config.clone()).await.unwrap();
            store.add(entry(5).note("persisted")).await.unwrap();
        }

        let store = EntryStore::open(config).await.unwrap();
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].note, "persisted");
    }

    #[tokio::test]
    async fn test_corrupt_file_degrades_to_empty() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path());
        std::fs::create_dir_all(&config.data_dir).unwrap();
        std::fs::write(config.entries_path(), "{not valid json").unwrap();

        let store = EntryStore::open(config).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_plain_corrupt_file_degrades_even_with_passphrase_set() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path()).passphrase("hunter2");
        std::fs::create_dir_all(&config.data_dir).unwrap();
        // Never went through the codec, so this is corruption, not a
        // passphrase problem
        std::fs::write(config.entries_path(), "{not valid json").unwrap();

        let store = EntryStore::open(config).await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_obfuscated_round_trip_and_wrong_passphrase() {
        let dir = tempdir().unwrap();

        {
            let config = StoreConfig::new(dir.path()).passphrase("hunter2");
            let store = EntryStore::open(config).await.unwrap();
            store.add(entry(4).note("secret")).await.unwrap();
        }

        // Correct passphrase
        {
            let config = StoreConfig::new(dir.path()).passphrase("hunter2");
            let store = EntryStore::open(config).await.unwrap();
            assert_eq!(store.len().await, 1);
        }

        // Missing passphrase
        let config = StoreConfig::new(dir.path());
        let result = EntryStore::open(config).await;
        assert!(matches!(result, Err(StoreError::WrongPassphrase)));
    }

    #[tokio::test]
    async fn test_import_replace_is_exact() {
        let (store, _dir) = create_test_store().await;
        store.add(entry(2)).await.unwrap();

        let incoming = vec![entry(5).note("imported"), entry(3)];
        let ids: Vec<String> = incoming.iter().map(|e| e.id.clone()).collect();

        let outcome = store.import(incoming, ImportMode::Replace).await.unwrap();
        assert_eq!(outcome.added, 2);

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        // Ids preserved through import
        for e in &snapshot {
            assert!(ids.contains(&e.id));
        }
    }

    #[tokio::test]
    async fn test_import_append_skips_duplicate_ids() {
        let (store, _dir) = create_test_store().await;
        let existing = store.add(entry(3)).await.unwrap();

        let dup = MoodEntry {
            id: existing.id.clone(),
            ..entry(5)
        };
        let fresh = entry(4);

        let outcome = store
            .import(vec![dup, fresh], ImportMode::Append)
            .await
            .unwrap();
        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.skipped_duplicates, 1);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_backup_restore_round_trip() {
        let (store, _dir) = create_test_store().await;
        store.add(entry(4).note("keep me").tags(["work"])).await.unwrap();
        let original = store.snapshot().await;

        let backup = store.backup().await.unwrap();

        store.delete_many(&original.iter().map(|e| e.id.clone()).collect::<Vec<_>>())
            .await
            .unwrap();
        assert!(store.is_empty().await);

        let count = store.restore(&backup).await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(store.snapshot().await, original);
    }

    #[tokio::test]
    async fn test_restore_rejects_garbage_before_mutation() {
        let (store, _dir) = create_test_store().await;
        store.add(entry(3)).await.unwrap();

        let result = store.restore("definitely not a backup").await;
        assert!(matches!(result, Err(StoreError::InvalidBackup(_))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_tag_many() {
        let (store, _dir) = create_test_store().await;
        let a = store.add(entry(3).tags(["work"])).await.unwrap();
        let b = store.add(entry(4)).await.unwrap();

        let touched = store
            .tag_many(
                &[a.id.clone(), b.id.clone()],
                &["Weekend".to_string(), "work".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(touched, 2);

        let a = store.get(&a.id).await.unwrap();
        assert_eq!(a.tags, vec!["work", "weekend"]);
    }

    #[tokio::test]
    async fn test_reconcile_adopts_external_snapshot() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path());
        let store = EntryStore::open(config.clone()).await.unwrap();
        store.add(entry(3)).await.unwrap();

        // Another process rewrites the file
        let external = vec![entry(5).note("from elsewhere")];
        std::fs::write(
            config.entries_path(),
            serde_json::to_string(&external).unwrap(),
        )
        .unwrap();

        let changed = store.reconcile().await.unwrap();
        assert!(changed);
        assert_eq!(store.snapshot().await[0].note, "from elsewhere");

        // Second reconcile is a no-op
        assert!(!store.reconcile().await.unwrap());
    }
}
