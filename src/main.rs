//! Runs the relay service configured from the environment (and `.env`).

// crates.io
use color_eyre::Result;
use tokio::net::TcpListener;
// self
use threads_relay::{
	config::Config,
	obs,
	server::{self, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	obs::init_subscriber();

	let config = Config::from_env()?;
	let state = AppState::from_config(&config)?;
	let listener = TcpListener::bind(config.bind_addr).await?;

	server::serve(listener, state).await?;

	Ok(())
}
