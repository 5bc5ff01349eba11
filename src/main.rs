use clap::Parser;

use snaplink::config::{Cli, StaticConfig, init_config};
use snaplink::errors::SnaplinkError;
use snaplink::runtime::modes::run_server;
use snaplink::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在时忽略
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match StaticConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    config.apply_args(&cli);
    let config = init_config(config);

    let _guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => exit_with(&e),
    };

    run_server().await
}

fn exit_with(err: &SnaplinkError) -> ! {
    eprintln!("{}", err.format_colored());
    std::process::exit(1);
}
