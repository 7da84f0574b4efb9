//! 表单校验相关类型

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::traits::FormEntity;

/// 校验规则种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    /// 必填（非空、非纯空白）
    Required,
}

/// 单个字段的校验规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    /// 字段键名
    pub field: &'static str,
    /// 显示标签
    pub label: &'static str,
    /// 规则种类
    pub kind: RuleKind,
}

impl FieldRule {
    #[must_use]
    pub fn required(field: &'static str, label: &'static str) -> Self {
        Self {
            field,
            label,
            kind: RuleKind::Required,
        }
    }

    /// 检查字段值，不满足时返回对应的字段错误
    #[must_use]
    pub fn check(&self, value: Option<&str>) -> Option<FieldError> {
        match self.kind {
            RuleKind::Required => {
                let filled = value.is_some_and(|v| !v.trim().is_empty());
                (!filled).then(|| FieldError {
                    field: self.field.to_string(),
                    rule: self.kind,
                    message: format!("{} is required", self.label),
                })
            }
        }
    }
}

/// 字段级校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub rule: RuleKind,
    pub message: String,
}

/// 一次校验中所有未满足的规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// 出错的字段名列表
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }

    /// 获取某个字段的错误
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

/// 通过校验后从表单缓冲区提取的字段补丁
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityPatch {
    values: BTreeMap<String, String>,
}

impl EntityPatch {
    #[must_use]
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// 将补丁合并到实体上（未知字段会被忽略）
    pub fn apply_to<E: FormEntity>(&self, entity: &mut E) {
        for (name, value) in &self.values {
            if !entity.apply_field(name, value) {
                log::debug!("Ignoring unknown {} field: {name}", E::KIND);
            }
        }
    }
}
