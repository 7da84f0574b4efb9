//! 类型定义模块

mod editor;
mod priority;
mod validation;

pub use editor::{
    DeleteOutcome, DispatchOutcome, EditorFailure, EditorIntent, EditorMode, EditorView,
    FailureKind, Notice,
};
pub use priority::Priority;
pub use validation::{EntityPatch, FieldError, FieldRule, RuleKind, ValidationErrors};
