use crate::adapters::state::StoreState;
use crate::domain::model::{Lead, NewLead, ProbabilityConfig};
use crate::domain::ports::{ConfigStore, DocumentMutation, LeadStore};
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use fd_lock::RwLock;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// 以單一 JSON 檔案保存所有資料的儲存層。
/// 每次操作都在 `<檔名>.lock` 的 OS 檔案鎖下重新讀取檔案，
/// 多個 handle 或多個行程共用同一個檔案時不會互相覆蓋。
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// 開啟資料檔；檔案不存在時從空白狀態開始，第一次寫入時才建立
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };

        // 先讀一次，損壞的檔案在開啟時就回報
        let (documents, leads) = store
            .run_blocking(|path| {
                with_shared(&path, |state| (state.documents.len(), state.leads.len()))
            })
            .await?;

        tracing::debug!(
            "Opened data file {} ({} documents, {} leads)",
            store.path.display(),
            documents,
            leads
        );

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run_blocking<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(PathBuf) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || f(path))
            .await
            .map_err(|e| AppError::IoError(std::io::Error::other(e)))?
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("store"));
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

fn open_lock(path: &Path) -> Result<RwLock<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(sibling(path, "lock"))?;
    Ok(RwLock::new(file))
}

fn read_state(path: &Path) -> Result<StoreState> {
    match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(StoreState::default()),
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreState::default()),
        Err(e) => Err(e.into()),
    }
}

fn write_state(path: &Path, state: &StoreState) -> Result<()> {
    // 先寫暫存檔再 rename，避免寫到一半的檔案
    let tmp_path = sibling(path, "tmp");
    fs::write(&tmp_path, serde_json::to_vec_pretty(state)?)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn with_shared<T>(path: &Path, f: impl FnOnce(&StoreState) -> T) -> Result<T> {
    let lock = open_lock(path)?;
    let _guard = lock.read()?;
    let state = read_state(path)?;
    Ok(f(&state))
}

/// 鎖住檔案後 read-modify-write；`f` 或寫入失敗時檔案不變
fn with_exclusive<T>(path: &Path, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
    let mut lock = open_lock(path)?;
    let _guard = lock.write()?;
    let mut state = read_state(path)?;
    let output = f(&mut state)?;
    write_state(path, &state)?;
    Ok(output)
}

#[async_trait]
impl ConfigStore for JsonFileStore {
    async fn get_document(&self, key: &str) -> Result<Option<ProbabilityConfig>> {
        let key = key.to_string();
        self.run_blocking(move |path| with_shared(&path, |state| state.document(&key)))
            .await
    }

    async fn modify_document(
        &self,
        key: &str,
        mutation: DocumentMutation,
    ) -> Result<ProbabilityConfig> {
        let key = key.to_string();
        self.run_blocking(move |path| with_exclusive(&path, |state| state.apply(&key, mutation)))
            .await
    }
}

#[async_trait]
impl LeadStore for JsonFileStore {
    async fn insert_lead(&self, lead: NewLead) -> Result<Lead> {
        // 時間在鎖內取得，跨行程也保持遞增
        self.run_blocking(move |path| {
            with_exclusive(&path, |state| Ok(state.append_lead(lead, Utc::now())))
        })
        .await
    }

    async fn list_leads(&self) -> Result<Vec<Lead>> {
        self.run_blocking(|path| with_shared(&path, |state| state.leads.clone()))
            .await
    }
}
