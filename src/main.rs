use anyhow::Result;
use sheet_exam::utils::logging;
use sheet_exam::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init_with(&config);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
