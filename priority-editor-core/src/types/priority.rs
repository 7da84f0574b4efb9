//! Priority 实体定义

use serde::{Deserialize, Serialize};

use crate::traits::FormEntity;
use crate::types::FieldRule;

/// 优先级记录
///
/// `id` 由远端服务分配，未持久化时为 `None`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    /// 优先级 ID
    #[serde(rename = "idPriority")]
    pub id: Option<i64>,
    /// 显示名称（必填）
    pub label: String,
}

impl Priority {
    /// 创建一条尚未持久化的记录
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
        }
    }

    /// 创建一条已持久化的记录
    #[must_use]
    pub fn with_id(id: i64, label: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            label: label.into(),
        }
    }
}

impl FormEntity for Priority {
    type Id = i64;

    const KIND: &'static str = "priority";
    const DISPLAY_NAME: &'static str = "Priority";

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn display_label(&self) -> &str {
        &self.label
    }

    fn field_values(&self) -> Vec<(&'static str, String)> {
        vec![("label", self.label.clone())]
    }

    fn apply_field(&mut self, name: &str, value: &str) -> bool {
        match name {
            "label" => {
                self.label = value.to_string();
                true
            }
            _ => false,
        }
    }

    fn field_rules() -> Vec<FieldRule> {
        vec![FieldRule::required("label", "Label")]
    }
}
