use super::AnalysisService;
use crate::models::{FoodItem, NutritionData, NutritionTotals, SUCCESS_STATUS};
use crate::photo::Photo;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted result for one mock analysis call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Success(NutritionData),
    Transport(u16),
    Format(String),
}

#[derive(Clone)]
pub struct MockAnalysisClient {
    outcomes: Arc<Mutex<Vec<MockOutcome>>>,
    call_count: Arc<Mutex<usize>>,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockAnalysisClient {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_outcome(self, outcome: MockOutcome) -> Self {
        self.outcomes.lock().unwrap().push(outcome);
        self
    }

    pub fn with_success(self, data: NutritionData) -> Self {
        self.with_outcome(MockOutcome::Success(data))
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// File names of every photo analyzed so far, in call order.
    pub fn get_received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    /// The single-apple analysis served when no outcome is scripted.
    pub fn sample_data() -> NutritionData {
        NutritionData {
            status: SUCCESS_STATUS.to_string(),
            food: vec![FoodItem {
                name: "Apple".to_string(),
                quantity: "1 medium".to_string(),
                calories: 95.0,
                protein: 0.5,
                carbs: 25.0,
                fat: 0.3,
            }],
            total: NutritionTotals {
                calories: 95.0,
                protein: 0.5,
                carbs: 25.0,
                fat: 0.3,
            },
            confidence: None,
        }
    }
}

impl Default for MockAnalysisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisService for MockAnalysisClient {
    async fn analyze(&self, photo: &Photo) -> Result<NutritionData> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        self.received
            .lock()
            .unwrap()
            .push(photo.file_name().to_string());

        let outcome = {
            let outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                MockOutcome::Success(Self::sample_data())
            } else {
                outcomes[(count - 1) % outcomes.len()].clone()
            }
        };

        match outcome {
            MockOutcome::Success(data) => Ok(data),
            MockOutcome::Transport(status) => Err(Error::Transport {
                status,
                body: "mock transport failure".to_string(),
            }),
            MockOutcome::Format(reason) => Err(Error::Format(reason)),
        }
    }
}
