/* ------------ 上傳清單：依完成順序 ------------ */
use chrono::{DateTime, Local};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
    pub uploaded_at: DateTime<Local>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self { name: name.into(), size, uploaded_at: Local::now() }
    }
}

// clone 共用同一份清單
#[derive(Clone, Default)]
pub struct UploadStore {
    files: Arc<RwLock<Vec<UploadedFile>>>,
}

impl UploadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, file: UploadedFile) {
        self.files.write().await.push(file);
    }

    pub async fn snapshot(&self) -> Vec<UploadedFile> {
        self.files.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn concurrent_appends_are_all_kept() {
        let store = UploadStore::new();
        let mut tasks = Vec::new();
        for i in 0..64u64 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store.append(UploadedFile::new(format!("f{i}.bin"), i)).await;
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }

        let snap = store.snapshot().await;
        assert_eq!(snap.len(), 64);
        for i in 0..64u64 {
            let hits: Vec<_> = snap.iter().filter(|f| f.name == format!("f{i}.bin")).collect();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].size, i);
        }
    }

    #[tokio::test]
    async fn duplicate_names_are_both_retained_in_order() {
        let store = UploadStore::new();
        store.append(UploadedFile::new("a.txt", 1)).await;
        store.append(UploadedFile::new("a.txt", 2)).await;

        let snap = store.snapshot().await;
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].size, 1);
        assert_eq!(snap[1].size, 2);
    }

    #[tokio::test]
    async fn snapshot_is_detached_from_later_appends() {
        let store = UploadStore::new();
        store.append(UploadedFile::new("a.txt", 1)).await;
        let before = store.snapshot().await;
        store.append(UploadedFile::new("b.txt", 2)).await;

        assert_eq!(before.len(), 1);
        assert_eq!(store.len().await, 2);
    }
}
