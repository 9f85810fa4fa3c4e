/// Magika backend: Google's deep-learning content-type model.
///
/// Loading the ONNX model is the expensive step, so exactly one session is
/// created per run. `Session::identify_file_sync` needs `&mut self`, hence
/// the mutex: workers serialise on inference but still overlap their
/// directory walking and stat calls.
use super::Classifier;
use crate::error::{ClassificationError, RunError};
use crate::model::TypeLabel;
use parking_lot::Mutex;
use std::path::Path;
use tracing::debug;

pub struct MagikaClassifier {
    session: Mutex<::magika::Session>,
}

impl MagikaClassifier {
    pub fn new() -> Result<Self, RunError> {
        let session = ::magika::Session::new().map_err(|e| RunError::ClassifierStartup {
            backend: "magika",
            message: e.to_string(),
        })?;
        debug!("Magika session initialised");
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl Classifier for MagikaClassifier {
    fn name(&self) -> &'static str {
        "magika"
    }

    fn classify(&self, path: &Path) -> Result<TypeLabel, ClassificationError> {
        let result = self
            .session
            .lock()
            .identify_file_sync(path)
            .map_err(|e| ClassificationError::model(path, e.to_string()))?;
        Ok(TypeLabel::new(result.info().label))
    }

    fn serialises_calls(&self) -> bool {
        true
    }
}
