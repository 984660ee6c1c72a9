// src/main.rs

use gentr::{cli, config, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("gentr error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let options = config::load_options(&args)?;
    logging::init_logging(args.log_level, options.debug)?;
    run(args, options).await
}
