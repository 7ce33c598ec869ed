//! Reading and writing encoded models on disk.

use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::persistence::codec::{ModelCodec, ModelFormat};

/// Encode `model` with `codec` and write it to `path`.
pub fn save_model<T, C>(path: &Path, model: &T, codec: &C) -> Result<()>
where
    T: Serialize,
    C: ModelCodec,
{
    let bytes = codec.encode(model)?;
    fs::write(path, &bytes)?;
    info!(
        "Saved model to {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        codec.name()
    );
    Ok(())
}

/// Read the model at `path` with `codec`.
pub fn load_model<T, C>(path: &Path, codec: &C) -> Result<T>
where
    T: DeserializeOwned,
    C: ModelCodec,
{
    let bytes = fs::read(path)?;
    let model = codec.decode(&bytes)?;
    info!("Loaded model from {} ({})", path.display(), codec.name());
    Ok(model)
}

/// Read the model at `path`, choosing the codec from the file contents.
pub fn load_model_detect<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)?;
    let format = ModelFormat::detect(&bytes);
    let model = format.decode(&bytes)?;
    info!("Loaded model from {} ({})", path.display(), format.name());
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LexisenseError;
    use crate::persistence::codec::{BincodeCodec, JsonCodec};
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counts {
        name: String,
        counts: Vec<(u32, f64)>,
    }

    fn counts() -> Counts {
        Counts {
            name: "bank".to_string(),
            counts: vec![(0, 2.5), (7, 1.0)],
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.bin");

        save_model(&path, &counts(), &BincodeCodec).unwrap();
        let loaded: Counts = load_model(&path, &BincodeCodec).unwrap();
        assert_eq!(loaded, counts());

        let detected: Counts = load_model_detect(&path).unwrap();
        assert_eq!(detected, counts());
    }

    #[test]
    fn test_detects_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.json");

        save_model(&path, &counts(), &JsonCodec::pretty()).unwrap();
        let loaded: Counts = load_model_detect(&path).unwrap();
        assert_eq!(loaded, counts());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result: Result<Counts> = load_model(&temp_dir.path().join("absent"), &BincodeCodec);
        assert!(matches!(result, Err(LexisenseError::Io(_))));
    }
}
