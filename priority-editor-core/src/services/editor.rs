//! 编辑会话服务
//!
//! 把 `EditorState` 的同步迁移和 `EntityService` / `ConfirmationGate` 的异步调用串起来。
//! 状态锁只在迁移期间持有，绝不跨越服务调用的 `.await`。
//!
//! 调用方可能在服务调用期间 drop 掉 future（超时、`select!`、界面任务被取消），
//! 此时 `PendingRelease` 负责释放对应的 ticket，会话不会一直处于 busy。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{CoreError, CoreResult};
use crate::services::{EditorState, OperationKind, OperationTicket};
use crate::traits::{ConfirmationGate, Decision, EntityService, FormEntity};
use crate::types::{DeleteOutcome, DispatchOutcome, EditorIntent, EditorMode, EditorView};

/// 没有被放弃的 ticket（序号从 1 开始）
const NO_ABANDONED: u64 = 0;

/// 单个编辑会话
pub struct Editor<E: FormEntity> {
    service: Arc<dyn EntityService<E>>,
    gate: Arc<dyn ConfirmationGate>,
    state: RwLock<EditorState<E>>,
    /// drop 时拿不到状态锁的 ticket 序号，下一次访问状态时释放
    abandoned: AtomicU64,
    listing_route: String,
}

/// 进行中操作的释放守卫
///
/// 正常完成时 ticket 已不是 `pending`，释放不产生任何效果。
struct PendingRelease<'a, E: FormEntity> {
    editor: &'a Editor<E>,
    ticket: OperationTicket,
}

impl<E: FormEntity> Drop for PendingRelease<'_, E> {
    fn drop(&mut self) {
        match self.editor.state.try_write() {
            Ok(mut state) => state.release(self.ticket),
            Err(_) => self
                .editor
                .abandoned
                .store(self.ticket.seq(), Ordering::Release),
        }
    }
}

impl<E: FormEntity> Editor<E> {
    /// 创建编辑会话（初始为新建模式）
    #[must_use]
    pub fn new(service: Arc<dyn EntityService<E>>, gate: Arc<dyn ConfirmationGate>) -> Self {
        Self {
            service,
            gate,
            state: RwLock::new(EditorState::new()),
            abandoned: AtomicU64::new(NO_ABANDONED),
            listing_route: format!("/{}/list", E::KIND),
        }
    }

    /// 删除成功后交回控制权的列表路由
    #[must_use]
    pub fn with_listing_route(mut self, route: impl Into<String>) -> Self {
        self.listing_route = route.into();
        self
    }

    #[must_use]
    pub fn listing_route(&self) -> &str {
        &self.listing_route
    }

    /// 当前模式
    pub async fn mode(&self) -> EditorMode {
        self.read_state().await.mode()
    }

    /// 展示层快照
    pub async fn snapshot(&self) -> EditorView<E> {
        self.read_state().await.view()
    }

    /// 会话入口标识符变化
    ///
    /// `None` 同步重置为新建状态；`Some(id)` 从服务加载。
    /// 失败会记录到状态中，同时返回给调用方。
    pub async fn load(&self, id: Option<E::Id>) -> CoreResult<()> {
        let Some(id) = id else {
            self.write_state().await.reset_to_new()?;
            log::debug!("{} editor reset for a new entry", E::KIND);
            return Ok(());
        };

        let ticket = self.write_state().await.begin_load(id.clone())?;
        let _release = self.release_on_drop(ticket);
        log::debug!("Loading {} {id}", E::KIND);

        let result = self.service.get(&id).await;
        let loaded = self.write_state().await.complete_load(ticket, result);
        loaded.inspect_err(|e| log_failure::<E>("load", e))
    }

    /// 字段输入
    pub async fn apply_field_change(&self, name: impl Into<String>, value: impl Into<String>) {
        self.write_state().await.apply_field_change(name, value);
    }

    /// 提交表单：新建模式调用 `create`，编辑模式调用 `update`
    pub async fn submit(&self) -> CoreResult<E> {
        let (ticket, candidate) = self
            .write_state()
            .await
            .begin_submit()
            .inspect_err(|e| log_failure::<E>("submit", e))?;
        let _release = self.release_on_drop(ticket);

        let result = match ticket.kind() {
            OperationKind::Create => {
                log::debug!("Creating {}: {candidate:?}", E::KIND);
                self.service.create(&candidate).await
            }
            _ => {
                log::debug!("Updating {}: {candidate:?}", E::KIND);
                self.service.update(&candidate).await
            }
        };

        let saved = self
            .write_state()
            .await
            .complete_submit(ticket, result)
            .inspect_err(|e| log_failure::<E>("submit", e))?;
        log::info!("{} saved: {saved:?}", E::DISPLAY_NAME);
        Ok(saved)
    }

    /// 关闭成功提示
    pub async fn acknowledge_success(&self) {
        self.write_state().await.acknowledge_success();
    }

    /// 关闭错误提示
    pub async fn dismiss_error(&self) {
        self.write_state().await.dismiss_error();
    }

    /// 表单 Reset
    pub async fn reset_form(&self) {
        self.write_state().await.reset_form();
    }

    /// 请求删除当前实体
    ///
    /// 先经过确认门：取消时不产生任何副作用；确认后只调用一次 `remove`，成功则会话结束。
    pub async fn request_delete(&self) -> CoreResult<DeleteOutcome> {
        let (ticket, prompt, id) = self
            .write_state()
            .await
            .begin_delete()
            .inspect_err(|e| log_failure::<E>("delete", e))?;
        let _release = self.release_on_drop(ticket);

        if self.gate.confirm(&prompt).await == Decision::Abort {
            self.write_state().await.abort_delete(ticket);
            log::info!("Delete of {} [{}] cancelled", E::KIND, prompt.label);
            return Ok(DeleteOutcome::Aborted);
        }

        self.write_state().await.confirm_delete(ticket)?;
        log::debug!("Removing {} {id}", E::KIND);

        let result = self.service.remove(&id).await;
        self.write_state()
            .await
            .complete_delete(ticket, result)
            .inspect_err(|e| log_failure::<E>("delete", e))?;

        log::info!("{} {id} deleted", E::DISPLAY_NAME);
        Ok(DeleteOutcome::Deleted {
            return_to: self.listing_route.clone(),
        })
    }

    /// 离开会话，之后到达的响应全部丢弃
    pub async fn close(&self) {
        self.write_state().await.close();
    }

    /// 消息式入口，供 Event -> Message -> Update 形式的展示层使用
    pub async fn dispatch(&self, intent: EditorIntent<E::Id>) -> CoreResult<DispatchOutcome> {
        match intent {
            EditorIntent::Load(id) => self.load(id).await?,
            EditorIntent::FieldChanged { name, value } => {
                self.apply_field_change(name, value).await;
            }
            EditorIntent::Submit => {
                self.submit().await?;
            }
            EditorIntent::Reset => self.reset_form().await,
            EditorIntent::Delete => {
                if let DeleteOutcome::Deleted { return_to } = self.request_delete().await? {
                    return Ok(DispatchOutcome::Navigate { return_to });
                }
            }
            EditorIntent::AcknowledgeSuccess => self.acknowledge_success().await,
            EditorIntent::DismissError => self.dismiss_error().await,
            EditorIntent::Close => self.close().await,
        }
        Ok(DispatchOutcome::Applied)
    }

    // ===== 状态访问 =====

    fn release_on_drop(&self, ticket: OperationTicket) -> PendingRelease<'_, E> {
        PendingRelease {
            editor: self,
            ticket,
        }
    }

    async fn write_state(&self) -> RwLockWriteGuard<'_, EditorState<E>> {
        let mut state = self.state.write().await;
        let seq = self.abandoned.swap(NO_ABANDONED, Ordering::AcqRel);
        if seq != NO_ABANDONED {
            state.release_seq(seq);
        }
        state
    }

    async fn read_state(&self) -> RwLockReadGuard<'_, EditorState<E>> {
        if self.abandoned.load(Ordering::Acquire) != NO_ABANDONED {
            return self.write_state().await.downgrade();
        }
        self.state.read().await
    }
}

fn log_failure<E: FormEntity>(action: &str, err: &CoreError) {
    match err {
        CoreError::Superseded | CoreError::SessionClosed => {
            log::debug!("Discarded {} {action} result: {err}", E::KIND);
        }
        e if e.is_expected() => log::warn!("{} {action} failed: {e}", E::DISPLAY_NAME),
        e => log::error!("{} {action} failed: {e}", E::DISPLAY_NAME),
    }
}
