use std::path::{Path, PathBuf};

/// Subdirectory holding the ONNX weights, relative to the model directory
pub const WEIGHTS_DIR: &str = "onnx";

/// One file to download from the hub and publish to the bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub local_path: &'static str,
    pub remote_path: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Files the web app needs at runtime
pub const FILES: &[FileEntry] = &[
    FileEntry {
        local_path: "config.json",
        remote_path: "config.json",
        required: true,
        description: "Model configuration",
    },
    FileEntry {
        local_path: "generation_config.json",
        remote_path: "generation_config.json",
        required: true,
        description: "Decoding configuration",
    },
    FileEntry {
        local_path: "tokenizer.json",
        remote_path: "tokenizer.json",
        required: true,
        description: "Tokenizer",
    },
    FileEntry {
        local_path: "tokenizer_config.json",
        remote_path: "tokenizer_config.json",
        required: true,
        description: "Tokenizer configuration",
    },
    FileEntry {
        local_path: "special_tokens_map.json",
        remote_path: "special_tokens_map.json",
        required: true,
        description: "Special token map",
    },
    FileEntry {
        local_path: "preprocessor_config.json",
        remote_path: "preprocessor_config.json",
        required: true,
        description: "Preprocessor configuration",
    },
    FileEntry {
        local_path: "onnx/encoder_model.onnx",
        remote_path: "onnx/encoder_model.onnx",
        required: true,
        description: "Encoder (WebGPU/WASM)",
    },
    FileEntry {
        local_path: "onnx/decoder_model_merged_q4.onnx",
        remote_path: "onnx/decoder_model_merged_q4.onnx",
        required: true,
        description: "Quantized decoder (q4, WebGPU)",
    },
    FileEntry {
        local_path: "onnx/decoder_model_merged_quantized.onnx",
        remote_path: "onnx/decoder_model_merged_quantized.onnx",
        required: true,
        description: "Quantized decoder (q8, WASM)",
    },
];

impl FileEntry {
    /// Location of this file inside a model directory
    #[must_use]
    pub fn local_file(&self, model_dir: &Path) -> PathBuf {
        model_dir.join(self.local_path)
    }

    /// Object key under `prefix`
    #[must_use]
    pub fn remote_key(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.remote_path)
    }
}

/// Include filters for the hub CLI, one per entry
#[must_use]
pub fn include_patterns(files: &[FileEntry]) -> Vec<&'static str> {
    files.iter().map(|f| f.local_path).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_shape() {
        assert_eq!(FILES.len(), 9);
        assert!(FILES.iter().all(|f| f.required));

        let onnx = FILES
            .iter()
            .filter(|f| f.local_path.starts_with("onnx/"))
            .count();
        assert_eq!(onnx, 3);
    }

    #[test]
    fn test_remote_mirrors_local() {
        for entry in FILES {
            assert_eq!(entry.local_path, entry.remote_path);
        }
    }

    #[test]
    fn test_remote_key() {
        let entry = &FILES[6];
        assert_eq!(
            entry.remote_key("models/onnx-community/whisper-small/"),
            "models/onnx-community/whisper-small/onnx/encoder_model.onnx"
        );
    }

    #[test]
    fn test_local_file() {
        let path = FILES[0].local_file(Path::new("models/whisper-small"));
        assert_eq!(path, PathBuf::from("models/whisper-small/config.json"));
    }

    #[test]
    fn test_include_patterns() {
        let patterns = include_patterns(FILES);
        assert_eq!(patterns.len(), FILES.len());
        assert_eq!(patterns[0], "config.json");
        assert!(patterns.contains(&"onnx/decoder_model_merged_q4.onnx"));
    }
}
