use super::{Photo, PhotoTrigger};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockPhotoTrigger {
    camera_photos: Arc<Mutex<VecDeque<Photo>>>,
    picker_photos: Arc<Mutex<VecDeque<Photo>>>,
    camera_count: Arc<Mutex<usize>>,
    picker_count: Arc<Mutex<usize>>,
}

impl MockPhotoTrigger {
    pub fn new() -> Self {
        Self {
            camera_photos: Arc::new(Mutex::new(VecDeque::new())),
            picker_photos: Arc::new(Mutex::new(VecDeque::new())),
            camera_count: Arc::new(Mutex::new(0)),
            picker_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_camera_photo(self, photo: Photo) -> Self {
        self.camera_photos.lock().unwrap().push_back(photo);
        self
    }

    pub fn with_picker_photo(self, photo: Photo) -> Self {
        self.picker_photos.lock().unwrap().push_back(photo);
        self
    }

    pub fn get_camera_count(&self) -> usize {
        *self.camera_count.lock().unwrap()
    }

    pub fn get_picker_count(&self) -> usize {
        *self.picker_count.lock().unwrap()
    }
}

impl Default for MockPhotoTrigger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PhotoTrigger for MockPhotoTrigger {
    async fn open_camera(&self) -> Result<Photo> {
        *self.camera_count.lock().unwrap() += 1;
        self.camera_photos
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Capture("Mock camera has no frames".to_string()))
    }

    async fn open_file_picker(&self) -> Result<Option<Photo>> {
        *self.picker_count.lock().unwrap() += 1;
        Ok(self.picker_photos.lock().unwrap().pop_front())
    }
}
