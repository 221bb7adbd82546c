use filedrop_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    filedrop_api::setup::init_tracing();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (storage, services, routes)
    let (state, router) = filedrop_api::setup::initialize_app(config).await?;

    // Start the server
    filedrop_api::setup::server::start_server(state, router).await?;

    Ok(())
}
