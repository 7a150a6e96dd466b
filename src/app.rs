//! Terminal front end: wires configuration to services and drives the
//! session from user commands.

use crate::analysis::{AnalysisService, MockAnalysisClient, WebhookAnalysisClient};
use crate::input::Prompt;
use crate::models::Config;
use crate::notify::{Notifier, TerminalNotifier, Toast};
use crate::photo::{CameraCapture, Photo, PhotoPicker, PhotoTrigger};
use crate::session::{Session, ViewState};
use crate::{views, Error, Result};
use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn};

/// One line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Camera,
    Upload,
    /// Anything that is not a keyword is taken as a dropped or typed path.
    Drop(String),
    Reset,
    Clear,
    Help,
    Quit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Command::Empty,
            "c" | "camera" => Command::Camera,
            "u" | "upload" => Command::Upload,
            "r" | "reset" => Command::Reset,
            "x" | "clear" => Command::Clear,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => Command::Drop(trimmed.to_string()),
        }
    }
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub analysis: Arc<dyn AnalysisService>,
    pub notifier: Arc<dyn Notifier>,
    pub trigger: Arc<dyn PhotoTrigger>,
    pub prompt: Arc<Prompt>,
}

pub struct App<W: Write> {
    session: Session,
    notifier: Arc<dyn Notifier>,
    trigger: Arc<dyn PhotoTrigger>,
    prompt: Arc<Prompt>,
    out: W,
}

impl App<std::io::Stdout> {
    /// Build the stdin/stdout app from environment configuration.
    pub fn from_config(config: &Config) -> Self {
        let prompt = Arc::new(Prompt::stdin());

        let analysis: Arc<dyn AnalysisService> = if config.dry_run {
            info!("MEAL_DRY_RUN enabled, analyses are served by the mock client");
            Arc::new(MockAnalysisClient::new())
        } else {
            info!("Analysis endpoint: {}", config.webhook_url);
            Arc::new(WebhookAnalysisClient::new(config.webhook_url.clone()))
        };

        let trigger = Arc::new(PhotoPicker::new(
            CameraCapture::new(config.camera_command.clone()),
            prompt.clone(),
        ));

        Self::with_services(
            AppServices {
                analysis,
                notifier: Arc::new(TerminalNotifier),
                trigger,
                prompt,
            },
            std::io::stdout(),
        )
    }
}

impl<W: Write> App<W> {
    pub fn with_services(services: AppServices, out: W) -> Self {
        Self {
            session: Session::new(services.analysis, services.notifier.clone()),
            notifier: services.notifier,
            trigger: services.trigger,
            prompt: services.prompt,
            out,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The camera/file-picker capability of the upload surface.
    pub fn trigger(&self) -> Arc<dyn PhotoTrigger> {
        self.trigger.clone()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn show(&mut self, view: &str) -> Result<()> {
        self.out.write_all(view.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn show_current(&mut self) -> Result<()> {
        let view = match self.session.state() {
            ViewState::Upload => views::render_upload(),
            ViewState::Analyzing => {
                views::render_analyzing(self.session.photo(), self.session.preview())
            }
            ViewState::Results => match self.session.data() {
                Some(data) => views::render_results(data),
                None => views::render_upload(),
            },
        };
        self.show(&view)
    }

    /// Analyze one photo, rendering the analyzing view while the request is
    /// in flight and whichever view the session resolves to afterwards.
    pub async fn analyze(&mut self, photo: Photo) -> Result<ViewState> {
        self.session.select_photo(photo).await?;
        self.show_current()?;
        let state = self.session.run_analysis().await?;
        self.show("\n")?;
        self.show_current()?;
        Ok(state)
    }

    fn report_photo_error(&self, err: &Error) {
        warn!("Could not load photo: {}", err);
        let toast = match err {
            Error::NotAnImage(name) => Toast::destructive(
                "Unsupported File",
                format!("{} is not a JPG or PNG image.", name),
            ),
            Error::Capture(_) => {
                Toast::destructive("Camera Unavailable", "Could not capture a photo.")
            }
            Error::Io(_) => Toast::destructive("Photo Not Found", "Check the path and try again."),
            other => Toast::destructive("Photo Not Loaded", other.to_string()),
        };
        self.notifier.notify(toast);
    }

    async fn acquire(&mut self, command: Command) -> Result<Option<Photo>> {
        let outcome = match command {
            Command::Camera => self.trigger.open_camera().await.map(Some),
            Command::Upload => {
                self.show("Path to your meal photo: ")?;
                self.trigger.open_file_picker().await
            }
            Command::Drop(text) => PhotoPicker::from_drop(&text).await,
            _ => Ok(None),
        };

        match outcome {
            Ok(photo) => Ok(photo),
            Err(e) => {
                self.report_photo_error(&e);
                Ok(None)
            }
        }
    }

    /// Interactive loop until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        self.show(&views::render_hero())?;
        self.show("\n")?;
        self.show_current()?;

        loop {
            self.show("> ")?;
            let Some(line) = self.prompt.next_line().await? else {
                break;
            };

            let command = Command::parse(&line);
            match (self.session.state(), command) {
                (_, Command::Quit) => break,
                (_, Command::Empty) => {}
                (_, Command::Help) => self.show_current()?,
                (ViewState::Upload, Command::Clear) => {
                    self.session.clear()?;
                    self.show_current()?;
                }
                (ViewState::Upload, Command::Reset) => self.show_current()?,
                (ViewState::Upload, command) => {
                    if let Some(photo) = self.acquire(command).await? {
                        self.analyze(photo).await?;
                    }
                }
                (ViewState::Results, Command::Reset) => {
                    self.session.reset()?;
                    self.show_current()?;
                }
                (ViewState::Results, _) => {
                    self.show("Press r to analyze another meal.\n")?;
                }
                (ViewState::Analyzing, _) => {
                    return Err(Error::InvalidState(
                        "input received while an analysis is pending".to_string(),
                    ))
                }
            }
        }

        self.show(&views::render_footer())
    }
}
