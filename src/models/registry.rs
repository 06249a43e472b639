/// A model published on the Hugging Face Hub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub hf_repo: &'static str,
    /// Approximate size of the manifest files, used for the disk space check
    pub size_mb: u64,
    pub description: &'static str,
}

/// Whisper small, ONNX export used by the web app
pub const WHISPER_SMALL: ModelSpec = ModelSpec {
    hf_repo: "onnx-community/whisper-small",
    size_mb: 700,
    description: "Whisper Small (ONNX, WebGPU/WASM)",
};

/// Local staging directory for [`WHISPER_SMALL`]
pub const OUTPUT_DIR: &str = "./models/whisper-small";

/// Bucket prefix every uploaded file lives under
pub const REMOTE_PREFIX: &str = "models/onnx-community/whisper-small/";
