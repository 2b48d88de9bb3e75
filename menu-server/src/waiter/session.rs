//! Waiter chat session

use super::gemini::{GeminiBackend, WaiterConfig};
use super::prompt::system_instruction;
use crate::menu::MenuBook;
use async_trait::async_trait;
use shared::chat::{ChatMessage, ChatReply};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell};

/// Shown when the model answers with nothing
pub const EMPTY_REPLY_FALLBACK: &str = "客官，我刚才走神了，您再说一遍？(Network Error)";
/// Shown when the model cannot be reached
pub const ERROR_FALLBACK: &str = "不好意思客官，店里网不太好，您稍等一下再喊我。 (API Error)";

#[derive(Debug, Error)]
pub enum WaiterError {
    #[error("Waiter is not configured (missing API key)")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Model returned an empty reply")]
    EmptyReply,
}

/// Language model behind the waiter
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String, WaiterError>;
}

enum BackendSource {
    Gemini(WaiterConfig),
    Fixed(Arc<dyn ChatBackend>),
}

#[derive(Default)]
struct Conversation {
    /// Built from the menu on the first turn after creation or reset
    instruction: Option<String>,
    history: Vec<ChatMessage>,
}

/// One conversation with the waiter
///
/// The backend is created on first use. Turns are serialized; history only
/// grows when the model actually answered.
pub struct WaiterSession {
    source: BackendSource,
    backend: OnceCell<Option<Arc<dyn ChatBackend>>>,
    menu: Arc<MenuBook>,
    conversation: Mutex<Conversation>,
}

impl WaiterSession {
    pub fn new(config: WaiterConfig, menu: Arc<MenuBook>) -> Self {
        if !config.is_configured() {
            tracing::warn!("GEMINI_API_KEY not set, waiter will only answer with fallback text");
        }
        Self::from_source(BackendSource::Gemini(config), menu)
    }

    pub fn with_backend(backend: Arc<dyn ChatBackend>, menu: Arc<MenuBook>) -> Self {
        Self::from_source(BackendSource::Fixed(backend), menu)
    }

    fn from_source(source: BackendSource, menu: Arc<MenuBook>) -> Self {
        Self {
            source,
            backend: OnceCell::new(),
            menu,
            conversation: Mutex::new(Conversation::default()),
        }
    }

    async fn backend(&self) -> Option<Arc<dyn ChatBackend>> {
        self.backend
            .get_or_init(|| async {
                match &self.source {
                    BackendSource::Fixed(backend) => Some(backend.clone()),
                    BackendSource::Gemini(config) => match GeminiBackend::new(config) {
                        Ok(backend) => {
                            tracing::info!(model = %config.model, "Waiter backend ready");
                            Some(Arc::new(backend) as Arc<dyn ChatBackend>)
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Waiter backend unavailable");
                            None
                        }
                    },
                }
            })
            .await
            .clone()
    }

    /// One turn, errors included
    pub async fn send(&self, message: &str) -> Result<String, WaiterError> {
        let backend = self.backend().await.ok_or(WaiterError::NotConfigured)?;
        let mut conversation = self.conversation.lock().await;

        let instruction = match &conversation.instruction {
            Some(instruction) => instruction.clone(),
            None => {
                let instruction = system_instruction(&self.menu.dishes().await);
                conversation.instruction = Some(instruction.clone());
                instruction
            }
        };

        let text = backend
            .send(&instruction, &conversation.history, message)
            .await?;
        if text.trim().is_empty() {
            return Err(WaiterError::EmptyReply);
        }

        conversation.history.push(ChatMessage::user(message));
        conversation.history.push(ChatMessage::model(text.clone()));
        Ok(text)
    }

    /// One turn; failures become the friendly fallback text
    pub async fn reply(&self, message: &str) -> ChatReply {
        match self.send(message).await {
            Ok(reply) => ChatReply {
                reply,
                answered: true,
            },
            Err(WaiterError::EmptyReply) => {
                tracing::warn!("Waiter got an empty reply");
                ChatReply {
                    reply: EMPTY_REPLY_FALLBACK.to_string(),
                    answered: false,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Waiter reply failed");
                ChatReply {
                    reply: ERROR_FALLBACK.to_string(),
                    answered: false,
                }
            }
        }
    }

    pub async fn history(&self) -> Vec<ChatMessage> {
        self.conversation.lock().await.history.clone()
    }

    /// Forget the conversation; the next turn picks up the current menu
    pub async fn reset(&self) {
        *self.conversation.lock().await = Conversation::default();
        tracing::info!("Waiter conversation reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex as SyncMutex;
    use shared::chat::ChatRole;

    /// Replays canned answers and records what it was sent
    struct ScriptedBackend {
        answers: SyncMutex<Vec<Result<String, WaiterError>>>,
        seen: SyncMutex<Vec<(String, usize, String)>>,
    }

    impl ScriptedBackend {
        fn new(answers: Vec<Result<String, WaiterError>>) -> Arc<Self> {
            Arc::new(Self {
                answers: SyncMutex::new(answers),
                seen: SyncMutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn send(
            &self,
            system_instruction: &str,
            history: &[ChatMessage],
            message: &str,
        ) -> Result<String, WaiterError> {
            self.seen.lock().push((
                system_instruction.to_string(),
                history.len(),
                message.to_string(),
            ));
            let mut answers = self.answers.lock();
            if answers.is_empty() {
                return Err(WaiterError::EmptyReply);
            }
            answers.remove(0)
        }
    }

    async fn menu() -> (tempfile::TempDir, Arc<MenuBook>) {
        let dir = tempfile::tempdir().unwrap();
        let book = Arc::new(MenuBook::load(dir.path()).await);
        (dir, book)
    }

    #[tokio::test]
    async fn test_history_grows_only_on_success() {
        let (_dir, menu) = menu().await;
        let backend = ScriptedBackend::new(vec![
            Ok("来个驴肉火烧吧 🥢".into()),
            Err(WaiterError::Status {
                status: 500,
                body: "boom".into(),
            }),
            Ok("   ".into()),
            Ok("再配碗小米粥 🥣".into()),
        ]);
        let session = WaiterSession::with_backend(backend.clone(), menu);

        let first = session.reply("推荐点什么").await;
        assert!(first.answered);
        assert_eq!(session.history().await.len(), 2);

        let failed = session.reply("还有呢").await;
        assert_eq!(failed.reply, ERROR_FALLBACK);
        assert!(!failed.answered);

        let empty = session.reply("还有呢").await;
        assert_eq!(empty.reply, EMPTY_REPLY_FALLBACK);
        assert_eq!(session.history().await.len(), 2);

        let second = session.reply("还有呢").await;
        assert!(second.answered);
        let history = session.history().await;
        assert_eq!(history.len(), 4);
        assert_eq!(history[2].role, ChatRole::User);
        assert_eq!(history[3].text, "再配碗小米粥 🥣");

        // Prior turns are sent along with each new message
        let seen = backend.seen.lock();
        assert_eq!(seen[0].1, 0);
        assert_eq!(seen[3].1, 2);
        assert!(seen[0].0.contains("驴肉火烧"));
    }

    #[tokio::test]
    async fn test_reset_clears_history_and_refreshes_menu() {
        let (_dir, menu) = menu().await;
        let backend = ScriptedBackend::new(vec![Ok("好嘞".into()), Ok("好嘞".into())]);
        let session = WaiterSession::with_backend(backend.clone(), menu.clone());

        session.reply("你好").await;
        menu.remove_dish("d-lvrou").await.unwrap();
        session.reset().await;
        assert!(session.history().await.is_empty());

        session.reply("你好").await;
        let seen = backend.seen.lock();
        assert!(seen[0].0.contains("驴肉火烧"));
        assert!(!seen[1].0.contains("驴肉火烧"));
        assert_eq!(seen[1].1, 0);
    }

    #[tokio::test]
    async fn test_missing_api_key_answers_with_fallback() {
        let (_dir, menu) = menu().await;
        let config = WaiterConfig {
            api_key: None,
            model: "m".into(),
            base_url: "http://localhost:9".into(),
            temperature: 0.7,
            timeout_ms: 100,
        };
        let session = WaiterSession::new(config, menu);
        assert!(matches!(
            session.send("你好").await,
            Err(WaiterError::NotConfigured)
        ));
        let reply = session.reply("你好").await;
        assert_eq!(reply.reply, ERROR_FALLBACK);
        assert!(session.history().await.is_empty());
    }
}
