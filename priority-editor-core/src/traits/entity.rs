//! 可编辑实体抽象 Trait

use std::fmt::{Debug, Display};

use crate::types::FieldRule;

/// 可以通过表单编辑的实体
///
/// 编辑流程只通过此 trait 访问实体，因此同一套状态机可以复用到任意字段集合。
pub trait FormEntity: Clone + Default + Debug + Send + Sync + 'static {
    /// 远端服务分配的标识符类型
    type Id: Clone + Debug + Display + PartialEq + Send + Sync + 'static;

    /// 机器可读的实体名（用于日志、路由、REST 资源名）
    const KIND: &'static str;

    /// 面向用户的实体名
    const DISPLAY_NAME: &'static str;

    /// 标识符（未持久化时为 `None`）
    fn id(&self) -> Option<&Self::Id>;

    /// 写入标识符
    fn set_id(&mut self, id: Self::Id);

    /// 用于确认提示的可识别文本
    fn display_label(&self) -> &str;

    /// 所有可编辑字段的当前值
    fn field_values(&self) -> Vec<(&'static str, String)>;

    /// 写入单个字段，未知字段返回 `false`
    fn apply_field(&mut self, name: &str, value: &str) -> bool;

    /// 表单校验规则
    fn field_rules() -> Vec<FieldRule>;
}
