//! 智能服务员 (小二)
//!
//! - [`session`] - 会话状态与兜底回复
//! - [`gemini`] - Gemini HTTP 后端与配置
//! - [`prompt`] - 人设与菜单提示词

pub mod gemini;
pub mod prompt;
pub mod session;

pub use gemini::{GeminiBackend, WaiterConfig};
pub use session::{ChatBackend, WaiterError, WaiterSession};
