//! File-based Conversation Store Adapter
//!
//! Stores each conversation as a YAML file named after its id, so a
//! conversation can be inspected (or hand-edited while debugging) on disk.
//!
//! Writes and deletes go through one per-store mutex, which is what makes
//! `update` atomic against a concurrent `delete` within the process.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::conversation::Conversation;
use crate::domain::foundation::ConversationId;
use crate::ports::{ConversationStore, ConversationStoreError};

/// File-based storage for conversations
#[derive(Debug, Clone)]
pub struct FileConversationStore {
    base_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileConversationStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileConversationStore::new("./data/conversations");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn file_path(&self, id: ConversationId) -> PathBuf {
        self.base_path.join(format!("{}.yaml", id))
    }

    async fn ensure_dir(&self) -> Result<(), ConversationStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| ConversationStoreError::Backend(e.to_string()))
    }

    async fn file_exists(&self, id: ConversationId) -> Result<bool, ConversationStoreError> {
        fs::try_exists(self.file_path(id))
            .await
            .map_err(|e| ConversationStoreError::Backend(e.to_string()))
    }

    /// Caller holds `write_lock`.
    async fn write_file(&self, conversation: &Conversation) -> Result<(), ConversationStoreError> {
        let yaml = serde_yaml::to_string(conversation)
            .map_err(|e| ConversationStoreError::SerializationFailed(e.to_string()))?;

        // Written beside the target, then renamed into place.
        let final_path = self.file_path(conversation.id());
        let tmp_path = final_path.with_extension("yaml.tmp");
        fs::write(&tmp_path, yaml)
            .await
            .map_err(|e| ConversationStoreError::Backend(e.to_string()))?;
        fs::rename(&tmp_path, &final_path)
            .await
            .map_err(|e| ConversationStoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl ConversationStore for FileConversationStore {
    async fn save(&self, conversation: &Conversation) -> Result<(), ConversationStoreError> {
        self.ensure_dir().await?;
        let _lock = self.write_lock.lock().await;
        self.write_file(conversation).await
    }

    async fn update(&self, conversation: &Conversation) -> Result<(), ConversationStoreError> {
        let _lock = self.write_lock.lock().await;
        if !self.file_exists(conversation.id()).await? {
            return Err(ConversationStoreError::NotFound(conversation.id()));
        }
        self.write_file(conversation).await
    }

    async fn load(&self, id: ConversationId) -> Result<Conversation, ConversationStoreError> {
        let yaml = match fs::read_to_string(self.file_path(id)).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConversationStoreError::NotFound(id))
            }
            Err(e) => return Err(ConversationStoreError::Backend(e.to_string())),
        };

        serde_yaml::from_str(&yaml)
            .map_err(|e| ConversationStoreError::DeserializationFailed(e.to_string()))
    }

    async fn exists(&self, id: ConversationId) -> Result<bool, ConversationStoreError> {
        self.file_exists(id).await
    }

    async fn delete(&self, id: ConversationId) -> Result<(), ConversationStoreError> {
        let _lock = self.write_lock.lock().await;
        match fs::remove_file(self.file_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ConversationStoreError::NotFound(id)),
            Err(e) => Err(ConversationStoreError::Backend(e.to_string())),
        }
    }
}
