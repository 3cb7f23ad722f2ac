/* ── 設定：環境變數（.env 由 main 用 dotenvy 載入） ── */
use anyhow::{bail, Context};
use std::{net::IpAddr, path::PathBuf, str::FromStr};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MAX_UPLOAD: u64 = 500 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: IpAddr,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub session_queue: usize,
    pub max_message_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            upload_dir: "uploads".into(),
            static_dir: "static".into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD,
            session_queue: 64,
            max_message_chars: 2000,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let d = Self::default();
        let cfg = Self {
            bind: parse(&get, "LAN_HUB_BIND")?.unwrap_or(d.bind),
            port: parse(&get, "LAN_HUB_PORT")?.unwrap_or(d.port),
            upload_dir: get("LAN_HUB_UPLOAD_DIR").map(PathBuf::from).unwrap_or(d.upload_dir),
            static_dir: get("LAN_HUB_STATIC_DIR").map(PathBuf::from).unwrap_or(d.static_dir),
            max_upload_bytes: parse(&get, "LAN_HUB_MAX_UPLOAD_BYTES")?.unwrap_or(d.max_upload_bytes),
            session_queue: parse(&get, "LAN_HUB_SESSION_QUEUE")?.unwrap_or(d.session_queue),
            max_message_chars: parse(&get, "LAN_HUB_MAX_MESSAGE_CHARS")?
                .unwrap_or(d.max_message_chars),
        };

        if cfg.max_upload_bytes == 0 {
            bail!("LAN_HUB_MAX_UPLOAD_BYTES must be > 0");
        }
        if cfg.session_queue == 0 {
            bail!("LAN_HUB_SESSION_QUEUE must be > 0");
        }
        Ok(cfg)
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    get(key)
        .map(|raw| raw.trim().parse::<T>().with_context(|| format!("invalid {key}: {raw:?}")))
        .transpose()
}
