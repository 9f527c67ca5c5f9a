// src/main.rs

use execod::{cli, config, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("execod error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let config = config::from_env(&args)?;
    logging::init_logging(config.log_level())?;
    run(config).await?;
    Ok(())
}
