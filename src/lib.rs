pub mod config;
pub mod content_type;
pub mod cos;
pub mod models;
pub mod naming;
pub mod payload;
pub mod provider;
pub mod server;
pub mod tool;
pub mod utils;

// Tool modules (point to project root tools via path attribute) / 工具模块
#[path = "../tools/mod.rs"]
pub mod tools;

// Register all tools (call unified registration function from tools module) / 注册所有工具
pub async fn register_tools(registry: &tool::ToolRegistry) -> anyhow::Result<()> {
    tools::register_all(registry).await
}
