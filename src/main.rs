use anyhow::Result;
use clap::Parser;
use hill_calories::app::App;
use hill_calories::models::Config;
use hill_calories::photo::Photo;
use hill_calories::session::ViewState;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "hill-calories")]
#[command(about = "Instant meal nutrition from one photo")]
struct CliArgs {
    /// Analyze this photo and exit instead of starting the interactive session.
    #[arg(value_name = "PHOTO", conflicts_with = "camera")]
    photo: Option<PathBuf>,

    /// Capture one frame from the camera, analyze it and exit.
    #[arg(long)]
    camera: bool,

    /// Analysis webhook URL, overriding MEAL_WEBHOOK_URL.
    #[arg(long, value_name = "URL", value_parser = parse_endpoint_arg)]
    endpoint: Option<String>,
}

fn parse_endpoint_arg(input: &str) -> std::result::Result<String, String> {
    reqwest::Url::parse(input)
        .map(|_| input.to_string())
        .map_err(|e| format!("Invalid endpoint '{}': {}", input, e))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hill_calories=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env_with_endpoint(args.endpoint) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::from_config(&config);

    let photo = if let Some(path) = args.photo {
        Some(Photo::from_path(&path).await?)
    } else if args.camera {
        Some(app.trigger().open_camera().await?)
    } else {
        None
    };

    match photo {
        Some(photo) => {
            info!("Analyzing {}", photo.file_name());
            if app.analyze(photo).await? != ViewState::Results {
                std::process::exit(1);
            }
            Ok(())
        }
        None => {
            app.run().await?;
            Ok(())
        }
    }
}
