//! The upload → analyzing → results flow.
//!
//! A [`Session`] owns the pending photo, its preview and the latest result.
//! Requests are driven through `&mut self`, so a second analysis cannot start
//! while one is in flight.

use crate::analysis::AnalysisService;
use crate::models::NutritionData;
use crate::notify::{Notifier, Toast};
use crate::photo::{Photo, Preview};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Upload,
    Analyzing,
    Results,
}

pub struct Session {
    analysis: Arc<dyn AnalysisService>,
    notifier: Arc<dyn Notifier>,
    state: ViewState,
    photo: Option<Photo>,
    preview: Option<Preview>,
    data: Option<NutritionData>,
}

impl Session {
    pub fn new(analysis: Arc<dyn AnalysisService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            analysis,
            notifier,
            state: ViewState::Upload,
            photo: None,
            preview: None,
            data: None,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn photo(&self) -> Option<&Photo> {
        self.photo.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn data(&self) -> Option<&NutritionData> {
        self.data.as_ref()
    }

    /// Take `photo` as the pending photo and enter `Analyzing`.
    ///
    /// Only valid in `Upload`. Any previously pending photo and its preview
    /// are replaced.
    pub async fn select_photo(&mut self, photo: Photo) -> Result<()> {
        if self.state != ViewState::Upload {
            return Err(Error::InvalidState(format!(
                "cannot select a photo while in {:?}",
                self.state
            )));
        }

        self.release_preview();
        self.preview = match Preview::create(&photo).await {
            Ok(preview) => Some(preview),
            Err(e) => {
                warn!("Could not build preview for {}: {}", photo.file_name(), e);
                None
            }
        };

        info!("Selected {} for analysis", photo.file_name());
        self.photo = Some(photo);
        self.state = ViewState::Analyzing;
        Ok(())
    }

    /// Run the one analysis for the pending photo and resolve the state.
    ///
    /// Every analysis failure lands back in `Upload` with a failure toast;
    /// only calling this outside `Analyzing` is an error.
    pub async fn run_analysis(&mut self) -> Result<ViewState> {
        let photo = match (&self.state, &self.photo) {
            (ViewState::Analyzing, Some(photo)) => photo,
            _ => {
                return Err(Error::InvalidState(format!(
                    "no analysis pending in {:?}",
                    self.state
                )))
            }
        };

        match self.analysis.analyze(photo).await {
            Ok(data) => {
                info!("Analysis complete: {} food items", data.food.len());
                self.notifier
                    .notify(Toast::analysis_complete(data.food.len()));
                self.data = Some(data);
                self.state = ViewState::Results;
            }
            Err(e) => {
                error!("Analysis failed: {}", e);
                self.notifier.notify(Toast::analysis_failed());
                self.photo = None;
                self.data = None;
                self.release_preview();
                self.state = ViewState::Upload;
            }
        }
        Ok(self.state)
    }

    /// Select and analyze in one step.
    pub async fn submit(&mut self, photo: Photo) -> Result<ViewState> {
        self.select_photo(photo).await?;
        self.run_analysis().await
    }

    /// Drop the pending photo without analyzing it.
    pub fn clear(&mut self) -> Result<()> {
        if self.state != ViewState::Upload {
            return Err(Error::InvalidState(format!(
                "nothing to clear in {:?}",
                self.state
            )));
        }
        self.photo = None;
        self.release_preview();
        Ok(())
    }

    /// Return to `Upload` with no photo, preview or result left over.
    pub fn reset(&mut self) -> Result<()> {
        if self.state == ViewState::Analyzing {
            return Err(Error::InvalidState(
                "cannot reset while an analysis is in flight".to_string(),
            ));
        }
        self.photo = None;
        self.data = None;
        self.release_preview();
        self.state = ViewState::Upload;
        Ok(())
    }

    fn release_preview(&mut self) {
        if let Some(preview) = self.preview.take() {
            if let Err(e) = preview.release() {
                warn!("Failed to release preview: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{MockAnalysisClient, MockOutcome};
    use crate::notify::{RecordingNotifier, ToastVariant};
    use crate::photo::test_support::png_bytes;

    fn photo(name: &str) -> Photo {
        Photo::from_bytes(name, png_bytes(16, 16)).unwrap()
    }

    fn session_with(analysis: MockAnalysisClient) -> (Session, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let session = Session::new(Arc::new(analysis), Arc::new(notifier.clone()));
        (session, notifier)
    }

    #[tokio::test]
    async fn test_starts_in_upload() {
        let (session, _) = session_with(MockAnalysisClient::new());
        assert_eq!(session.state(), ViewState::Upload);
        assert!(session.photo().is_none());
        assert!(session.data().is_none());
    }

    #[tokio::test]
    async fn test_select_enters_analyzing_with_preview() {
        let (mut session, notifier) = session_with(MockAnalysisClient::new());

        session.select_photo(photo("meal.png")).await.unwrap();

        assert_eq!(session.state(), ViewState::Analyzing);
        assert_eq!(session.photo().unwrap().file_name(), "meal.png");
        assert!(session.preview().unwrap().path().exists());
        assert!(notifier.get_toasts().is_empty());
    }

    #[tokio::test]
    async fn test_success_moves_to_results() {
        let analysis = MockAnalysisClient::new();
        let probe = analysis.clone();
        let (mut session, notifier) = session_with(analysis);

        let state = session.submit(photo("meal.png")).await.unwrap();

        assert_eq!(state, ViewState::Results);
        assert_eq!(session.data(), Some(&MockAnalysisClient::sample_data()));
        assert_eq!(probe.get_call_count(), 1);
        assert_eq!(notifier.last(), Some(Toast::analysis_complete(1)));
    }

    #[tokio::test]
    async fn test_failure_returns_to_upload_and_releases_preview() {
        let (mut session, notifier) =
            session_with(MockAnalysisClient::new().with_outcome(MockOutcome::Transport(500)));

        session.select_photo(photo("meal.png")).await.unwrap();
        let preview_path = session.preview().unwrap().path().to_path_buf();

        let state = session.run_analysis().await.unwrap();

        assert_eq!(state, ViewState::Upload);
        assert!(session.photo().is_none());
        assert!(session.data().is_none());
        assert!(session.preview().is_none());
        assert!(!preview_path.exists());

        let toast = notifier.last().unwrap();
        assert_eq!(toast.title, "Analysis Failed");
        assert_eq!(toast.variant, ToastVariant::Destructive);
    }

    #[tokio::test]
    async fn test_format_failure_is_treated_like_transport_failure() {
        let (mut session, notifier) = session_with(
            MockAnalysisClient::new().with_outcome(MockOutcome::Format("status error".into())),
        );

        let state = session.submit(photo("meal.png")).await.unwrap();

        assert_eq!(state, ViewState::Upload);
        assert!(session.data().is_none());
        assert_eq!(notifier.last(), Some(Toast::analysis_failed()));
    }

    #[tokio::test]
    async fn test_select_outside_upload_is_rejected() {
        let (mut session, _) = session_with(MockAnalysisClient::new());
        session.submit(photo("one.png")).await.unwrap();

        let err = session.select_photo(photo("two.png")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
        assert_eq!(session.photo().unwrap().file_name(), "one.png");
    }

    #[tokio::test]
    async fn test_run_analysis_without_selection_is_rejected() {
        let (mut session, _) = session_with(MockAnalysisClient::new());
        assert!(matches!(
            session.run_analysis().await,
            Err(Error::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let (mut session, _) = session_with(MockAnalysisClient::new());
        session.submit(photo("meal.png")).await.unwrap();
        let preview_path = session.preview().unwrap().path().to_path_buf();

        session.reset().unwrap();

        assert_eq!(session.state(), ViewState::Upload);
        assert!(session.photo().is_none());
        assert!(session.data().is_none());
        assert!(session.preview().is_none());
        assert!(!preview_path.exists());
    }

    #[tokio::test]
    async fn test_reset_while_analyzing_is_rejected() {
        let (mut session, _) = session_with(MockAnalysisClient::new());
        session.select_photo(photo("meal.png")).await.unwrap();
        assert!(session.reset().is_err());
        assert_eq!(session.state(), ViewState::Analyzing);
    }

    #[tokio::test]
    async fn test_runs_after_reset_are_independent() {
        let analysis = MockAnalysisClient::new();
        let probe = analysis.clone();
        let (mut session, _) = session_with(analysis);

        session.submit(photo("first.png")).await.unwrap();
        session.reset().unwrap();
        session.submit(photo("second.png")).await.unwrap();

        assert_eq!(session.photo().unwrap().file_name(), "second.png");
        assert_eq!(probe.get_received(), vec!["first.png", "second.png"]);
    }

    #[tokio::test]
    async fn test_clear_drops_pending_photo() {
        let (mut session, _) = session_with(MockAnalysisClient::new());
        session.clear().unwrap();
        assert!(session.photo().is_none());
        assert_eq!(session.state(), ViewState::Upload);
    }

    #[tokio::test]
    async fn test_undecodable_photo_still_analyzed_without_preview() {
        let (mut session, _) = session_with(MockAnalysisClient::new());
        let broken = Photo::from_bytes("broken.png", vec![0x89, 0x50, 0x4E, 0x47, 9]).unwrap();

        session.select_photo(broken).await.unwrap();
        assert!(session.preview().is_none());
        assert_eq!(session.run_analysis().await.unwrap(), ViewState::Results);
    }
}
