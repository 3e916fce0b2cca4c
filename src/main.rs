use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cos_toolbox::config;
use cos_toolbox::server;
use cos_toolbox::tool::ToolRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "cos-toolbox {} (built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIME")
    );

    // 加载配置
    let app_config = config::init_config().map_err(|e| anyhow::anyhow!(e))?;
    let bind_addr = app_config.read().get_bind_address();

    // 注册工具
    let registry = ToolRegistry::new();
    cos_toolbox::register_tools(&registry).await?;
    tracing::info!("Registered tools: {:?}", registry.tool_names().await);

    // 启动HTTP服务
    let app = server::router(registry);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
