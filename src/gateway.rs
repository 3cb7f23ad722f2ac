/* ── 上傳 / 下載：先落地，再登記，再廣播 ── */
use bytes::Bytes;
use futures_util::Stream;
use tokio::fs::File;
use tracing::info;

use crate::{
    error::{AppErr, AppResult},
    hub::{BroadcastHub, Event},
    storage::DiskStorage,
    store::{UploadStore, UploadedFile},
    utils::sanitize,
};

#[derive(Clone)]
pub struct Gateway {
    store: UploadStore,
    hub: BroadcastHub,
    storage: DiskStorage,
    max_upload: u64,
}

impl Gateway {
    pub fn new(store: UploadStore, hub: BroadcastHub, storage: DiskStorage, max_upload: u64) -> Self {
        Self { store, hub, storage, max_upload }
    }

    pub fn max_upload(&self) -> u64 {
        self.max_upload
    }

    // file_name 需已清洗
    pub async fn handle_upload<S, E>(&self, file_name: &str, body: S) -> AppResult<UploadedFile>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<AppErr>,
    {
        if file_name.is_empty() {
            return Err(AppErr::EmptyFilename);
        }

        let size = self.storage.store(file_name, body, self.max_upload).await?;
        let file = UploadedFile::new(file_name, size);
        self.store.append(file.clone()).await;
        let seen_by = self.hub.publish(Event::Upload(file.clone())).await;
        let total = self.store.len().await;

        info!(name = %file.name, size, seen_by, total, "file uploaded");
        Ok(file)
    }

    // 只認原樣的檔名；清洗後會變的名字不可能存過
    pub async fn handle_download(&self, file_name: &str) -> AppResult<(File, u64)> {
        if file_name.is_empty() || sanitize::filename(file_name) != file_name {
            return Err(AppErr::NotFound(file_name.to_string()));
        }
        self.storage.open(file_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use tokio::io::AsyncReadExt;

    fn one_chunk(data: Vec<u8>) -> impl Stream<Item = Result<Bytes, AppErr>> {
        stream::iter(vec![Ok(Bytes::from(data))])
    }

    fn setup(dir: &tempfile::TempDir, limit: u64) -> (Gateway, UploadStore, BroadcastHub) {
        let store = UploadStore::new();
        let hub = BroadcastHub::new(16);
        let gw = Gateway::new(store.clone(), hub.clone(), DiskStorage::new(dir.path()), limit);
        (gw, store, hub)
    }

    #[tokio::test]
    async fn upload_registers_and_broadcasts() {
        let dir = tempfile::tempdir().unwrap();
        let (gw, store, hub) = setup(&dir, 4096);
        let (_, mut rx) = hub.register().await;
        rx.recv().await.unwrap(); // own connect notice

        let file = gw.handle_upload("report.pdf", one_chunk(vec![7u8; 1024])).await.unwrap();
        assert_eq!(file.name, "report.pdf");
        assert_eq!(file.size, 1024);

        let snap = store.snapshot().await;
        assert_eq!(snap.len(), 1);
        assert_eq!((snap[0].name.as_str(), snap[0].size), ("report.pdf", 1024));

        hub.publish(Event::Chat {
            user: "alice".into(),
            message: "got it".into(),
            sent_at: chrono::Local::now(),
        })
        .await;
        assert_eq!(rx.recv().await, Some(Event::Upload(file)));
        assert!(matches!(rx.recv().await, Some(Event::Chat { .. })));
    }

    #[tokio::test]
    async fn oversized_upload_leaves_registry_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let (gw, store, hub) = setup(&dir, 100);
        let (_, mut rx) = hub.register().await;
        rx.recv().await.unwrap();

        let err = gw.handle_upload("big.bin", one_chunk(vec![0u8; 101])).await.unwrap_err();
        assert!(matches!(err, AppErr::PayloadTooLarge { limit: 100 }));
        assert_eq!(store.len().await, 0);
        assert!(rx.try_recv().is_err());
        assert!(matches!(gw.handle_download("big.bin").await, Err(AppErr::NotFound(_))));
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (gw, store, _) = setup(&dir, 100);

        let err = gw.handle_upload("", one_chunk(b"x".to_vec())).await.unwrap_err();
        assert!(matches!(err, AppErr::EmptyFilename));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn download_round_trip_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let (gw, _, _) = setup(&dir, 1 << 20);
        let payload: Vec<u8> = (0..=255u8).cycle().take(5000).collect();

        gw.handle_upload("data.bin", one_chunk(payload.clone())).await.unwrap();

        let (mut file, len) = gw.handle_download("data.bin").await.unwrap();
        let mut got = Vec::new();
        file.read_to_end(&mut got).await.unwrap();
        assert_eq!(len, 5000);
        assert_eq!(got, payload);

        assert!(matches!(gw.handle_download("never.bin").await, Err(AppErr::NotFound(_))));
    }

    #[tokio::test]
    async fn download_does_not_alias_to_a_cleaned_name() {
        let dir = tempfile::tempdir().unwrap();
        let (gw, _, _) = setup(&dir, 1024);
        gw.handle_upload("x_y.txt", one_chunk(b"secret-bytes".to_vec())).await.unwrap();

        for asked in ["x y.txt", "..x_y.txt", "x_y.txt\u{2713}", "../x_y.txt", ""] {
            assert!(
                matches!(gw.handle_download(asked).await, Err(AppErr::NotFound(_))),
                "{asked:?} should be 404"
            );
        }
        assert!(gw.handle_download("x_y.txt").await.is_ok());
    }
}
