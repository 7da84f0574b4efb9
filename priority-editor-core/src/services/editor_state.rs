//! 编辑器状态机
//!
//! 所有状态迁移都是同步的纯函数，异步的服务调用由 `Editor` 在两次迁移之间完成：
//!
//! ```text
//! begin_xxx()  ->  EntityService 调用（挂起点）  ->  complete_xxx(ticket, result)
//! ```
//!
//! 每个进行中的操作持有一个带单调递增序号的 `OperationTicket`。
//! 只有与 `pending` 相同的 ticket 才能完成迁移，新的 load、关闭会话都会让旧 ticket 失效，
//! 因此迟到的响应会被丢弃而不是覆盖状态。

use crate::error::{CoreError, CoreResult, ServiceResult};
use crate::services::FormBuffer;
use crate::traits::{ConfirmationPrompt, FormEntity};
use crate::types::{EditorFailure, EditorMode, EditorView, FailureKind, Notice};

/// 操作种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Load,
    Create,
    Update,
    Delete,
}

/// 进行中操作的凭据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationTicket {
    kind: OperationKind,
    seq: u64,
}

impl OperationTicket {
    #[must_use]
    pub fn kind(self) -> OperationKind {
        self.kind
    }

    #[must_use]
    pub fn seq(self) -> u64 {
        self.seq
    }
}

/// 单个编辑会话的状态
#[derive(Debug, Clone)]
pub struct EditorState<E: FormEntity> {
    /// 最近一次与服务端一致的快照，或新建时的默认实体
    current: Option<E>,
    /// 会话入口标识符，模式由它推导
    target: Option<E::Id>,
    form: FormBuffer,
    submitted: bool,
    error: Option<EditorFailure>,
    pending: Option<OperationTicket>,
    last_seq: u64,
    closed: bool,
}

impl<E: FormEntity> Default for EditorState<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: FormEntity> EditorState<E> {
    /// 新会话，初始为新建模式
    #[must_use]
    pub fn new() -> Self {
        let fresh = E::default();
        let mut form = FormBuffer::for_entity::<E>();
        form.reset_from(&fresh);
        Self {
            current: Some(fresh),
            target: None,
            form,
            submitted: false,
            error: None,
            pending: None,
            last_seq: 0,
            closed: false,
        }
    }

    // ===== 只读访问 =====

    #[must_use]
    pub fn mode(&self) -> EditorMode {
        EditorMode::from_identifier(self.target.as_ref())
    }

    #[must_use]
    pub fn current(&self) -> Option<&E> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn target(&self) -> Option<&E::Id> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn form(&self) -> &FormBuffer {
        &self.form
    }

    #[must_use]
    pub fn submitted(&self) -> bool {
        self.submitted
    }

    #[must_use]
    pub fn error(&self) -> Option<&EditorFailure> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// 生成展示层快照
    #[must_use]
    pub fn view(&self) -> EditorView<E> {
        let notice = match (&self.error, self.submitted) {
            (Some(failure), _) => Some(Notice::failed(failure.kind, E::DISPLAY_NAME)),
            (None, true) => Some(Notice::saved(E::DISPLAY_NAME)),
            (None, false) => None,
        };
        EditorView {
            mode: self.mode(),
            current: self.current.clone(),
            fields: self.form.values().clone(),
            submitted: self.submitted,
            error: self.error.clone(),
            busy: self.is_busy(),
            closed: self.closed,
            notice,
        }
    }

    // ===== 加载 =====

    /// 无标识符：同步重置为新建状态，不调用服务
    pub fn reset_to_new(&mut self) -> CoreResult<()> {
        self.ensure_open()?;
        self.supersede_pending();
        let fresh = E::default();
        self.form.reset_from(&fresh);
        self.current = Some(fresh);
        self.target = None;
        self.submitted = false;
        self.error = None;
        Ok(())
    }

    /// 有标识符：开始加载，旧的进行中操作全部作废
    pub fn begin_load(&mut self, id: E::Id) -> CoreResult<OperationTicket> {
        self.ensure_open()?;
        self.supersede_pending();
        self.target = Some(id);
        self.error = None;
        Ok(self.issue(OperationKind::Load))
    }

    /// 加载完成；失败时保留原有快照
    pub fn complete_load(
        &mut self,
        ticket: OperationTicket,
        result: ServiceResult<E>,
    ) -> CoreResult<()> {
        self.accept(ticket)?;
        match result {
            Ok(entity) => {
                self.form.reset_from(&entity);
                self.current = Some(entity);
                self.error = None;
                Ok(())
            }
            Err(e) => Err(self.record_failure(FailureKind::Load, e.into())),
        }
    }

    // ===== 编辑 =====

    /// 字段输入只进入缓冲区，不影响快照和提示标记
    pub fn apply_field_change(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.form.set_field(name, value);
    }

    /// 表单的 Reset 按钮：只清空缓冲区
    pub fn reset_form(&mut self) {
        self.form.clear();
    }

    /// 关闭成功提示，回到全新的默认实体（与模式无关）
    pub fn acknowledge_success(&mut self) {
        self.submitted = false;
        let fresh = E::default();
        self.form.reset_from(&fresh);
        self.current = Some(fresh);
    }

    /// 关闭错误提示
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // ===== 提交 =====

    /// 校验缓冲区并生成待提交的实体
    ///
    /// 新建模式从默认实体出发（标识符保持为空）；
    /// 编辑模式从当前快照出发，快照缺少标识符时使用会话标识符。
    pub fn begin_submit(&mut self) -> CoreResult<(OperationTicket, E)> {
        self.ensure_idle()?;
        self.error = None;

        let patch = match self.form.validate_and_extract() {
            Ok(patch) => patch,
            Err(errors) => {
                return Err(
                    self.record_failure(FailureKind::Validation, CoreError::Validation(errors))
                );
            }
        };

        let (kind, candidate) = match self.mode() {
            EditorMode::New => {
                let mut candidate = E::default();
                patch.apply_to(&mut candidate);
                (OperationKind::Create, candidate)
            }
            EditorMode::Existing => {
                let mut candidate = self.current.clone().unwrap_or_default();
                patch.apply_to(&mut candidate);
                match (candidate.id().cloned(), self.target.clone()) {
                    (None, Some(id)) => candidate.set_id(id),
                    // 上一次加载失败时快照仍属于旧记录
                    (Some(id), Some(target)) if id != target => log::warn!(
                        "Submitting {} {id} while the session targets {target}",
                        E::KIND
                    ),
                    _ => {}
                }
                (OperationKind::Update, candidate)
            }
        };

        Ok((self.issue(kind), candidate))
    }

    /// 按 ticket 种类分派到 `complete_create` / `complete_update`
    pub fn complete_submit(
        &mut self,
        ticket: OperationTicket,
        result: ServiceResult<E>,
    ) -> CoreResult<E> {
        match ticket.kind {
            OperationKind::Create => self.complete_create(ticket, result),
            _ => self.complete_update(ticket, result),
        }
    }

    /// 新建完成：快照替换为响应，表单整体清空以便录入下一条
    pub fn complete_create(
        &mut self,
        ticket: OperationTicket,
        result: ServiceResult<E>,
    ) -> CoreResult<E> {
        self.accept(ticket)?;
        match result {
            Ok(created) => {
                self.current = Some(created.clone());
                self.submitted = true;
                self.form.clear();
                Ok(created)
            }
            Err(e) => Err(self.record_failure(FailureKind::Save, e.into())),
        }
    }

    /// 更新完成：快照替换为响应，表单按新快照重新填充
    pub fn complete_update(
        &mut self,
        ticket: OperationTicket,
        result: ServiceResult<E>,
    ) -> CoreResult<E> {
        self.accept(ticket)?;
        match result {
            Ok(updated) => {
                self.form.reset_from(&updated);
                self.current = Some(updated.clone());
                self.submitted = true;
                Ok(updated)
            }
            Err(e) => Err(self.record_failure(FailureKind::Save, e.into())),
        }
    }

    // ===== 删除 =====

    /// 开始删除：返回确认提示和要删除的标识符
    ///
    /// 从此刻起删除处于进行中，确认期间再次请求会得到 `Busy`。
    pub fn begin_delete(&mut self) -> CoreResult<(OperationTicket, ConfirmationPrompt, E::Id)> {
        self.ensure_idle()?;
        if self.mode().is_new() {
            return Err(CoreError::NotPersisted);
        }
        let Some((prompt, id)) = self.current.as_ref().and_then(|entity| {
            entity
                .id()
                .map(|id| (ConfirmationPrompt::delete(entity), id.clone()))
        }) else {
            return Err(CoreError::NotPersisted);
        };
        Ok((self.issue(OperationKind::Delete), prompt, id))
    }

    /// 用户取消：除释放进行中标记外不改变任何状态
    pub fn abort_delete(&mut self, ticket: OperationTicket) {
        if self.pending == Some(ticket) {
            self.pending = None;
        }
    }

    /// 用户确认：真正的删除调用即将开始
    pub fn confirm_delete(&mut self, ticket: OperationTicket) -> CoreResult<()> {
        self.ensure_current(ticket)?;
        self.error = None;
        Ok(())
    }

    /// 删除完成：成功则会话结束
    pub fn complete_delete(
        &mut self,
        ticket: OperationTicket,
        result: ServiceResult<()>,
    ) -> CoreResult<()> {
        self.accept(ticket)?;
        match result {
            Ok(()) => {
                self.closed = true;
                Ok(())
            }
            Err(e) => Err(self.record_failure(FailureKind::Delete, e.into())),
        }
    }

    /// 关闭会话，之后到达的响应全部丢弃
    pub fn close(&mut self) {
        self.closed = true;
        self.pending = None;
    }

    /// 调用方放弃了进行中的操作（future 被 drop）
    ///
    /// 只有 ticket 仍是 `pending` 时才释放，已完成或已被取代的 ticket 不产生任何效果。
    pub fn release(&mut self, ticket: OperationTicket) {
        self.release_seq(ticket.seq);
    }

    pub(crate) fn release_seq(&mut self, seq: u64) {
        if self.pending.is_some_and(|pending| pending.seq == seq) {
            if let Some(stale) = self.pending.take() {
                log::debug!("{} {:?} #{seq} abandoned by caller", E::KIND, stale.kind);
            }
        }
    }

    // ===== 内部辅助 =====

    fn issue(&mut self, kind: OperationKind) -> OperationTicket {
        self.last_seq += 1;
        let ticket = OperationTicket {
            kind,
            seq: self.last_seq,
        };
        self.pending = Some(ticket);
        ticket
    }

    fn supersede_pending(&mut self) {
        if let Some(stale) = self.pending.take() {
            log::debug!(
                "{} {:?} #{} superseded by a new load",
                E::KIND,
                stale.kind,
                stale.seq
            );
        }
    }

    fn ensure_open(&self) -> CoreResult<()> {
        if self.closed {
            return Err(CoreError::SessionClosed);
        }
        Ok(())
    }

    fn ensure_idle(&self) -> CoreResult<()> {
        self.ensure_open()?;
        if self.pending.is_some() {
            return Err(CoreError::Busy);
        }
        Ok(())
    }

    fn ensure_current(&self, ticket: OperationTicket) -> CoreResult<()> {
        self.ensure_open()?;
        if self.pending != Some(ticket) {
            return Err(CoreError::Superseded);
        }
        Ok(())
    }

    fn accept(&mut self, ticket: OperationTicket) -> CoreResult<()> {
        self.ensure_current(ticket)?;
        self.pending = None;
        Ok(())
    }

    fn record_failure(&mut self, kind: FailureKind, error: CoreError) -> CoreError {
        self.error = Some(EditorFailure::from_error(kind, &error));
        error
    }
}
