//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 替代 `gloo-storage`，提供简洁的本地存储接口。
//! 会话仓库只依赖 `KeyValueStorage`，测试中替换为内存实现。

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::Mutex;

/// 持久化键值存储
///
/// 失败只会返回 `false`/`None`，不会中断调用方。
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

/// 浏览器 LocalStorage
///
/// 每次访问都重新获取 `window.localStorage`，结构体本身不持有 JS 对象。
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStorage for LocalStorage {
    /// 获取存储的字符串值
    ///
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

// =========================================================
// 测试工具: MemoryStorage
// =========================================================

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn with_item(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage.set(key, value);
        storage
    }
}

#[cfg(test)]
impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.items.lock().unwrap().remove(key);
        true
    }
}
