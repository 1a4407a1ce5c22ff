//! 全局通知队列
//!
//! 所有用户可见的提示都经过这里，由布局组件渲染成 toast。

use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    /// 对应的 daisyUI alert 样式
    pub fn alert_class(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "alert alert-success",
            NoticeLevel::Error => "alert alert-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct Notifier {
    notices: RwSignal<Vec<Notice>>,
    next_id: RwSignal<u64>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            notices: RwSignal::new(Vec::new()),
            next_id: RwSignal::new(1),
        }
    }

    /// 当前通知（响应式）
    pub fn notices(&self) -> Signal<Vec<Notice>> {
        self.notices.into()
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        let message = message.into();
        log::info!("{}", message);
        self.push(NoticeLevel::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        let message = message.into();
        log::warn!("{}", message);
        self.push(NoticeLevel::Error, message)
    }

    pub fn dismiss(&self, id: u64) {
        self.notices.update(|list| list.retain(|n| n.id != id));
    }

    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices.get_untracked()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices
            .with_untracked(|list| list.iter().map(|n| n.message.clone()).collect())
    }

    fn push(&self, level: NoticeLevel, message: String) -> u64 {
        let id = self.next_id.get_untracked();
        self.next_id.set(id + 1);
        self.notices.update(|list| list.push(Notice { id, level, message }));
        id
    }
}
