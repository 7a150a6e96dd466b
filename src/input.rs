//! Line-oriented terminal input shared by the app loop and the file picker.

use crate::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

pub struct Prompt {
    reader: Mutex<Box<dyn AsyncBufRead + Send + Unpin>>,
}

impl Prompt {
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        Self {
            reader: Mutex::new(Box::new(reader)),
        }
    }

    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }

    /// Next line without its terminator, or `None` at end of input.
    pub async fn next_line(&self) -> Result<Option<String>> {
        let mut reader = self.reader.lock().await;
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
