//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Notify, RwLock};

use crate::error::{ServiceError, ServiceResult};
use crate::services::Editor;
use crate::traits::{ConfirmationGate, ConfirmationPrompt, Decision, EntityService};
use crate::types::Priority;

/// 挂起调用：进入时通知 `entered`，等待 `release` 后继续
pub struct CallHold {
    pub entered: Notify,
    pub release: Notify,
}

impl CallHold {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Notify::new(),
        })
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

// ===== MockPriorityService =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    Get,
    Create,
    Update,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Get(i64),
    Create(Priority),
    Update(Priority),
    Remove(i64),
}

pub struct MockPriorityService {
    store: RwLock<HashMap<i64, Priority>>,
    next_id: RwLock<i64>,
    calls: RwLock<Vec<MockCall>>,
    /// 设置后对应操作返回此错误
    failures: RwLock<HashMap<MockOp, ServiceError>>,
    hold: RwLock<Option<Arc<CallHold>>>,
}

impl MockPriorityService {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            next_id: RwLock::new(1),
            calls: RwLock::new(Vec::new()),
            failures: RwLock::new(HashMap::new()),
            hold: RwLock::new(None),
        }
    }

    pub async fn insert(&self, priority: Priority) {
        if let Some(id) = priority.id {
            self.store.write().await.insert(id, priority);
        }
    }

    pub async fn set_next_id(&self, id: i64) {
        *self.next_id.write().await = id;
    }

    pub async fn set_failure(&self, op: MockOp, err: Option<ServiceError>) {
        let mut failures = self.failures.write().await;
        match err {
            Some(err) => failures.insert(op, err),
            None => failures.remove(&op),
        };
    }

    /// 之后的每次调用都会挂起，直到测试释放
    pub async fn hold_calls(&self) -> Arc<CallHold> {
        let hold = CallHold::new();
        *self.hold.write().await = Some(Arc::clone(&hold));
        hold
    }

    /// 不再挂起新的调用（已挂起的调用仍需 `release`）
    pub async fn release_hold(&self) {
        *self.hold.write().await = None;
    }

    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.read().await.clone()
    }

    pub async fn create_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Create(_))).await
    }

    pub async fn remove_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Remove(_))).await
    }

    async fn count(&self, f: impl Fn(&MockCall) -> bool) -> usize {
        self.calls.read().await.iter().filter(|c| f(c)).count()
    }

    async fn enter(&self, op: MockOp, call: MockCall) -> ServiceResult<()> {
        self.calls.write().await.push(call);
        let hold = self.hold.read().await.clone();
        if let Some(hold) = hold {
            hold.pass().await;
        }
        match self.failures.read().await.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EntityService<Priority> for MockPriorityService {
    async fn get(&self, id: &i64) -> ServiceResult<Priority> {
        self.enter(MockOp::Get, MockCall::Get(*id)).await?;
        self.store
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound { id: id.to_string() })
    }

    async fn create(&self, entity: &Priority) -> ServiceResult<Priority> {
        self.enter(MockOp::Create, MockCall::Create(entity.clone()))
            .await?;
        let mut next_id = self.next_id.write().await;
        let id = *next_id;
        *next_id += 1;
        let created = Priority::with_id(id, entity.label.clone());
        self.store.write().await.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, entity: &Priority) -> ServiceResult<Priority> {
        self.enter(MockOp::Update, MockCall::Update(entity.clone()))
            .await?;
        let Some(id) = entity.id else {
            return Err(ServiceError::Rejected {
                status: 400,
                message: "missing idPriority".to_string(),
            });
        };
        let mut store = self.store.write().await;
        if !store.contains_key(&id) {
            return Err(ServiceError::NotFound { id: id.to_string() });
        }
        store.insert(id, entity.clone());
        Ok(entity.clone())
    }

    async fn remove(&self, id: &i64) -> ServiceResult<()> {
        self.enter(MockOp::Remove, MockCall::Remove(*id)).await?;
        self.store
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound { id: id.to_string() })
    }
}

// ===== ScriptedGate =====

/// 按脚本返回决定的确认门，队列为空时返回 `Abort`
pub struct ScriptedGate {
    decisions: RwLock<VecDeque<Decision>>,
    prompts: RwLock<Vec<ConfirmationPrompt>>,
    hold: RwLock<Option<Arc<CallHold>>>,
}

impl ScriptedGate {
    pub fn new() -> Self {
        Self {
            decisions: RwLock::new(VecDeque::new()),
            prompts: RwLock::new(Vec::new()),
            hold: RwLock::new(None),
        }
    }

    pub async fn push_decision(&self, decision: Decision) {
        self.decisions.write().await.push_back(decision);
    }

    pub async fn prompts(&self) -> Vec<ConfirmationPrompt> {
        self.prompts.read().await.clone()
    }

    /// 下一次确认会挂起，直到测试释放
    pub async fn hold(&self) -> Arc<CallHold> {
        let hold = CallHold::new();
        *self.hold.write().await = Some(Arc::clone(&hold));
        hold
    }
}

#[async_trait]
impl ConfirmationGate for ScriptedGate {
    async fn confirm(&self, prompt: &ConfirmationPrompt) -> Decision {
        self.prompts.write().await.push(prompt.clone());
        let hold = self.hold.write().await.take();
        if let Some(hold) = hold {
            hold.pass().await;
        }
        self.decisions
            .write()
            .await
            .pop_front()
            .unwrap_or(Decision::Abort)
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `Editor`
pub fn create_test_editor() -> (
    Editor<Priority>,
    Arc<MockPriorityService>,
    Arc<ScriptedGate>,
) {
    let service = Arc::new(MockPriorityService::new());
    let gate = Arc::new(ScriptedGate::new());
    let editor = Editor::new(service.clone(), gate.clone());
    (editor, service, gate)
}
