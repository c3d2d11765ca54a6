// src/bin/proxy.rs
use pena::config::options::ProxyOptions;
use pena::{log, proxy};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let opts = ProxyOptions::from_env();
    log::init_stdout(opts.log_json);
    if opts.require_key && opts.key.is_none() {
        tracing::warn!("PROXY_REQUIRE_KEY is set but PROXY_KEY is empty; requests are not checked");
    }
    if let Err(e) = proxy::serve(opts).await {
        tracing::error!(error = %e, "proxy stopped");
        return Err(e);
    }
    Ok(())
}
