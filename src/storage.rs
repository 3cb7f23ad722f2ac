/* ── 檔案落地：只管 bytes，不碰清單與廣播 ── */
use bytes::Bytes;
use futures_util::{pin_mut, Stream, StreamExt};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};

use crate::error::{AppErr, AppResult};

#[derive(Clone, Debug)]
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn ensure_root(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    // 先寫 .part，完整才 rename；失敗或超過 limit 就刪掉暫存檔。同名覆蓋。
    pub async fn store<S, E>(&self, name: &str, body: S, limit: u64) -> AppResult<u64>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<AppErr>,
    {
        self.ensure_root().await?;
        let tmp = self.root.join(format!(".{}.part", uuid::Uuid::new_v4()));

        match write_limited(&tmp, body, limit).await {
            Ok(size) => {
                if let Err(e) = fs::rename(&tmp, self.root.join(name)).await {
                    let _ = fs::remove_file(&tmp).await;
                    return Err(e.into());
                }
                Ok(size)
            }
            Err(e) => {
                let _ = fs::remove_file(&tmp).await;
                Err(e)
            }
        }
    }

    pub async fn open(&self, name: &str) -> AppResult<(File, u64)> {
        let path = self.root.join(name);
        let file = File::open(&path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => AppErr::NotFound(name.to_string()),
            _ => AppErr::Storage(e),
        })?;
        let meta = file.metadata().await?;
        if !meta.is_file() {
            return Err(AppErr::NotFound(name.to_string()));
        }
        Ok((file, meta.len()))
    }
}

async fn write_limited<S, E>(path: &Path, body: S, limit: u64) -> AppResult<u64>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<AppErr>,
{
    pin_mut!(body);
    let mut file = File::create(path).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(Into::<AppErr>::into)?;
        written += chunk.len() as u64;
        if written > limit {
            return Err(AppErr::PayloadTooLarge { limit });
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    file.sync_all().await?;
    Ok(written)
}
