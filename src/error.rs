use std::path::PathBuf;
use thiserror::Error;

/// Main error type for model-oss
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Hugging Face CLI unavailable: {0}\n\nTroubleshooting:\n- Install manually: curl -LsSf https://hf.co/cli/install.sh | bash\n- Make sure the `hf` binary is on PATH (often ~/.local/bin)\n- Alternative: pip install -U \"huggingface_hub[cli]\"")]
    Tool(String),

    #[error("Model download failed: {0}\n\nTroubleshooting:\n- Check internet connection and access to huggingface.co\n- Remove a partial download directory and run again\n- Run with RUST_LOG=debug for more details")]
    Download(String),

    #[error("Not enough disk space: {required_mb} MB required, {available_mb} MB available\n\nTroubleshooting:\n- Free some space on the target filesystem\n- Remove old model directories under ./models")]
    DiskSpace { required_mb: u64, available_mb: u64 },

    #[error("OSS configuration incomplete: missing {0}\n\nSet it through environment variables:\n  export OSS_ACCESS_KEY_ID='your-key-id'\n  export OSS_ACCESS_KEY_SECRET='your-key-secret'\n  export OSS_BUCKET_NAME='your-bucket-name'\n  export OSS_ENDPOINT='oss-cn-hangzhou.aliyuncs.com'\n\nOr enter the values when prompted (not recommended, input stays in the terminal)")]
    Config(String),

    #[error("Failed to read input: {0}\n\nTroubleshooting:\n- Prompts need an interactive terminal\n- Export OSS_ACCESS_KEY_ID, OSS_ACCESS_KEY_SECRET and OSS_BUCKET_NAME instead")]
    Prompt(String),

    #[error("OSS connection failed: {0}\n\nPlease check:\n  1. AccessKey ID and Secret are correct\n  2. Bucket name is correct\n  3. Endpoint matches the bucket region\n  4. Bucket exists and the key has access to it")]
    Connectivity(#[source] OssError),

    #[error("Required file missing: {}\n\nTroubleshooting:\n- Check that the model was downloaded completely\n- If the file was renamed upstream, check the file list on Hugging Face\n- Delete the model directory to force a fresh download", .0.display())]
    MissingFile(PathBuf),

    #[error("Upload of required file {key} failed: {source}\n\nTroubleshooting:\n- Check that the AccessKey has write permission on the bucket\n- Check internet connection and access to the OSS endpoint\n- Run with RUST_LOG=debug for more details")]
    Upload {
        key: String,
        #[source]
        source: OssError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Object storage errors
#[derive(Error, Debug)]
pub enum OssError {
    #[error("HTTP {status} {code}: {message} (request id: {request_id})")]
    Http {
        status: u16,
        code: String,
        message: String,
        request_id: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Failed to sign request: {0}")]
    Signing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for OssError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_lists_env_vars() {
        let msg = DeployError::Config("OSS_BUCKET_NAME".to_string()).to_string();
        for var in [
            "OSS_ACCESS_KEY_ID",
            "OSS_ACCESS_KEY_SECRET",
            "OSS_BUCKET_NAME",
            "OSS_ENDPOINT",
        ] {
            assert!(msg.contains(var), "missing {var} in: {msg}");
        }
    }

    #[test]
    fn test_connectivity_error_keeps_cause() {
        let err = DeployError::Connectivity(OssError::Http {
            status: 403,
            code: "AccessDenied".to_string(),
            message: "denied".to_string(),
            request_id: "abc".to_string(),
        });
        let msg = err.to_string();
        assert!(msg.contains("HTTP 403 AccessDenied"));
        assert!(msg.contains("Bucket name is correct"));
    }

    #[test]
    fn test_upload_error_has_troubleshooting() {
        let err = DeployError::Upload {
            key: "models/x/config.json".to_string(),
            source: OssError::Network("connection reset".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.contains("models/x/config.json"));
        assert!(msg.contains("connection reset"));
        assert!(msg.contains("write permission"));
    }

    #[test]
    fn test_missing_file_shows_path() {
        let err = DeployError::MissingFile(PathBuf::from("models/x/config.json"));
        assert!(err.to_string().contains("models/x/config.json"));
    }
}
