//! Tool registry / 工具注册表

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use super::{Tool, ToolInfo};

pub type ToolBox = Arc<dyn Tool>;

/// Registry of invocable tools / 可调用工具的注册表
///
/// Tools are stateless; one instance serves every invocation
/// 工具无状态，单实例服务全部调用
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Arc<RwLock<HashMap<String, ToolBox>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool / 注册工具
    pub async fn register(&self, tool: ToolBox) -> Result<()> {
        let name = tool.name().to_string();
        let mut tools = self.tools.write().await;
        tools.insert(name.clone(), tool);
        tracing::info!("Tool registered: {}", name);
        Ok(())
    }

    /// Get a tool by name / 按名称获取工具
    pub async fn get(&self, name: &str) -> Option<ToolBox> {
        let tools = self.tools.read().await;
        tools.get(name).cloned()
    }

    /// List registered tool names / 列出已注册的工具名称
    pub async fn tool_names(&self) -> Vec<String> {
        let tools = self.tools.read().await;
        let mut names: Vec<String> = tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// List complete tool infos / 列出完整工具信息
    pub async fn list_infos(&self) -> Vec<ToolInfo> {
        let tools = self.tools.read().await;
        let mut infos: Vec<ToolInfo> = tools.values().map(|t| t.info()).collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }
}
