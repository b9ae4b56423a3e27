use clap::Parser;
use some_cycler::{Config, CyclerService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Logs go to stderr so stdout stays clean for console replies
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "some_cycler=info,scene_cycler=info".into()))
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	tracing::info!("🚀 Starting scene cycler");

	let config = Config::parse();
	tracing::info!("📋 Configuration: {}, roster: {}", config.config.display(), config.roster.display());

	let service = CyclerService::new(config)?;
	service.run().await?;

	tracing::info!("👋 Scene cycler shutdown complete");
	Ok(())
}
