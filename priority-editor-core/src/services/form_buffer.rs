//! 表单缓冲区
//!
//! 保存尚未提交的字段值，与已确认的实体快照相互独立，放弃编辑不会污染快照。

use std::collections::BTreeMap;

use crate::traits::FormEntity;
use crate::types::{EntityPatch, FieldRule, ValidationErrors};

/// 表单缓冲区
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBuffer {
    values: BTreeMap<String, String>,
    rules: Vec<FieldRule>,
}

impl FormBuffer {
    #[must_use]
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self {
            values: BTreeMap::new(),
            rules,
        }
    }

    /// 使用实体类型自带的校验规则创建缓冲区
    #[must_use]
    pub fn for_entity<E: FormEntity>() -> Self {
        Self::new(E::field_rules())
    }

    /// 写入字段值（总是成功）
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    #[must_use]
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 校验所有规则，通过时返回字段补丁
    ///
    /// 所有未满足的规则都会被报告，而不是只报告第一个。
    pub fn validate_and_extract(&self) -> Result<EntityPatch, ValidationErrors> {
        let errors: Vec<_> = self
            .rules
            .iter()
            .filter_map(|rule| rule.check(self.value(rule.field)))
            .collect();

        if errors.is_empty() {
            Ok(EntityPatch::new(self.values.clone()))
        } else {
            Err(ValidationErrors::new(errors))
        }
    }

    /// 用实体的字段值重新填充
    pub fn reset_from<E: FormEntity>(&mut self, entity: &E) {
        self.values = entity
            .field_values()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
    }

    /// 清空所有字段值
    pub fn clear(&mut self) {
        self.values.clear();
    }
}
