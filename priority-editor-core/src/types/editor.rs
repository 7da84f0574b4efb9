//! 编辑器会话相关类型

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::FieldError;

/// 编辑器模式
///
/// 只由会话入口标识符推导，不单独存储。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// 未提供标识符：新建
    New,
    /// 提供了标识符：编辑已有记录
    Existing,
}

impl EditorMode {
    #[must_use]
    pub fn from_identifier<T>(id: Option<&T>) -> Self {
        if id.is_some() {
            Self::Existing
        } else {
            Self::New
        }
    }

    #[must_use]
    pub fn is_new(self) -> bool {
        self == Self::New
    }
}

/// 失败类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    Load,
    Save,
    Delete,
    Validation,
}

/// 最近一次失败
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorFailure {
    pub kind: FailureKind,
    pub message: String,
    /// 仅 `Validation` 时非空
    pub field_errors: Vec<FieldError>,
}

impl EditorFailure {
    #[must_use]
    pub fn from_error(kind: FailureKind, error: &CoreError) -> Self {
        let field_errors = match error {
            CoreError::Validation(errors) => errors.errors.clone(),
            _ => Vec::new(),
        };
        Self {
            kind,
            message: error.to_string(),
            field_errors,
        }
    }
}

/// 展示层要显示的提示
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "message", rename_all = "camelCase")]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    #[must_use]
    pub fn saved(display_name: &str) -> Self {
        Self::Success(format!("{display_name} Saved"))
    }

    #[must_use]
    pub fn failed(kind: FailureKind, display_name: &str) -> Self {
        let message = match kind {
            FailureKind::Load => format!("Could not load the {display_name}. Try again later."),
            FailureKind::Save => format!("Could not save the {display_name}. Try again later."),
            FailureKind::Delete => {
                format!("Could not delete the {display_name}. Try again later.")
            }
            FailureKind::Validation => "Please fill in all the required fields.".to_string(),
        };
        Self::Error(message)
    }
}

/// 编辑器状态快照（只读，供展示层渲染）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView<E> {
    pub mode: EditorMode,
    pub current: Option<E>,
    pub fields: BTreeMap<String, String>,
    pub submitted: bool,
    pub error: Option<EditorFailure>,
    pub busy: bool,
    pub closed: bool,
    pub notice: Option<Notice>,
}

impl<E> EditorView<E> {
    /// 对应展示层的单一错误标记
    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// 展示层发往编辑器的意图
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorIntent<Id> {
    /// 会话入口标识符变化
    Load(Option<Id>),
    /// 字段输入
    FieldChanged { name: String, value: String },
    /// 提交表单
    Submit,
    /// 重置表单
    Reset,
    /// 删除（需确认）
    Delete,
    /// 关闭成功提示
    AcknowledgeSuccess,
    /// 关闭错误提示
    DismissError,
    /// 离开页面
    Close,
}

/// 删除请求结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// 已删除，会话结束，控制权交回列表页
    Deleted { return_to: String },
    /// 用户取消
    Aborted,
}

/// `Editor::dispatch` 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 状态已更新，重新渲染即可
    Applied,
    /// 删除完成，需要导航到 `return_to`
    Navigate { return_to: String },
}
