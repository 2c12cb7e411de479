use anyhow::Context;
use cpark::kernel::config::load_config;
use cpark_logger::Logger;
use cpark_runtime::{RuntimeConfig, build_runtime};
use cpark_server::Server;

fn main() -> anyhow::Result<()> {
    let rt = build_runtime(&RuntimeConfig::high_performance())?;

    rt.block_on(async {
        let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).init()?;

        let cfg = load_config(Some("server")).context("Critical: Configuration is malformed")?;

        Server::builder().config(cfg).build().await?.run().await
    })
}
