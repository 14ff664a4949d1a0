use anyhow::Result;
use math_galaxy_quiz::app::App;
use math_galaxy_quiz::config::Config;
use math_galaxy_quiz::logger;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logger::init(&config);
    logger::log_startup(&config);

    // 初始化并运行应用
    App::initialize(config)?.run().await?;

    Ok(())
}
