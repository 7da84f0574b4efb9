//! 破坏性操作确认抽象 Trait

use async_trait::async_trait;
use serde::Serialize;

use crate::traits::FormEntity;

/// 用户决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Proceed,
    Abort,
}

/// 确认提示内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationPrompt {
    /// 标题
    pub title: String,
    /// 正文，包含实体标签
    pub content: String,
    /// 被删除实体的标签
    pub label: String,
}

impl ConfirmationPrompt {
    /// 构造删除确认提示
    #[must_use]
    pub fn delete<E: FormEntity>(entity: &E) -> Self {
        let label = entity.display_label().to_string();
        Self {
            title: format!("Do you want to delete this {}?", E::KIND),
            content: format!("{} [{label}]", E::DISPLAY_NAME),
            label,
        }
    }
}

/// 确认门 Trait
///
/// 由展示层实现（弹窗、终端提示、channel 等），编辑器只依赖此能力。
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    /// 请求用户确认
    async fn confirm(&self, prompt: &ConfirmationPrompt) -> Decision;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;

    #[test]
    fn delete_prompt_carries_label() {
        let prompt = ConfirmationPrompt::delete(&Priority::with_id(7, "Urgent"));
        assert_eq!(prompt.title, "Do you want to delete this priority?");
        assert_eq!(prompt.content, "Priority [Urgent]");
        assert_eq!(prompt.label, "Urgent");
    }
}
