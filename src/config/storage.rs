use crate::config::prompt::Prompter;
use crate::error::{DeployError, Result};

pub const ENV_ACCESS_KEY_ID: &str = "OSS_ACCESS_KEY_ID";
pub const ENV_ACCESS_KEY_SECRET: &str = "OSS_ACCESS_KEY_SECRET";
pub const ENV_ENDPOINT: &str = "OSS_ENDPOINT";
pub const ENV_BUCKET_NAME: &str = "OSS_BUCKET_NAME";
/// Older name for [`ENV_BUCKET_NAME`]
pub const ENV_BUCKET_LEGACY: &str = "OSS_BUCKET";

pub const DEFAULT_ENDPOINT: &str = "oss-cn-hangzhou.aliyuncs.com";
pub const DEFAULT_REGION: &str = "cn-hangzhou";

/// Credentials and location of the target bucket
#[derive(Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub access_key_secret: String,
    /// Endpoint host without scheme, e.g. `oss-cn-hangzhou.aliyuncs.com`
    pub endpoint: String,
    pub bucket_name: String,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"***")
            .field("endpoint", &self.endpoint)
            .field("bucket_name", &self.bucket_name)
            .finish()
    }
}

impl StorageConfig {
    /// Read raw values through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            access_key_id: get(ENV_ACCESS_KEY_ID).unwrap_or_default(),
            access_key_secret: get(ENV_ACCESS_KEY_SECRET).unwrap_or_default(),
            endpoint: get(ENV_ENDPOINT)
                .map_or_else(|| DEFAULT_ENDPOINT.to_string(), |e| normalize_endpoint(&e)),
            bucket_name: get(ENV_BUCKET_NAME)
                .or_else(|| get(ENV_BUCKET_LEGACY))
                .unwrap_or_default(),
        }
    }

    /// Environment first, prompts if the access key id is missing, then validate
    ///
    /// # Errors
    /// - Returns error if a prompt cannot be read
    /// - Returns error if key id, secret or bucket is still empty
    pub fn resolve<F, P>(lookup: F, prompter: &mut P) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
        P: Prompter + ?Sized,
    {
        let mut config = Self::from_lookup(lookup);

        if config.access_key_id.is_empty() {
            config.prompt_missing(prompter)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn prompt_missing<P: Prompter + ?Sized>(&mut self, prompter: &mut P) -> Result<()> {
        println!("\n{}", "=".repeat(60));
        println!("Aliyun OSS settings required");
        println!("{}", "=".repeat(60));
        println!("💡 Prefer environment variables for credentials, e.g.");
        println!("   export {ENV_ACCESS_KEY_ID}='your-key-id'");
        println!("{}", "=".repeat(60));

        self.access_key_id = prompter.input("AccessKey ID")?;
        self.access_key_secret = prompter.secret("AccessKey Secret")?;
        self.bucket_name = prompter.input("Bucket name")?;

        let endpoint = prompter.input(&format!("Endpoint (default: {})", self.endpoint))?;
        if !endpoint.is_empty() {
            self.endpoint = normalize_endpoint(&endpoint);
        }

        Ok(())
    }

    /// Check that every mandatory value is present
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            (ENV_ACCESS_KEY_ID, &self.access_key_id),
            (ENV_ACCESS_KEY_SECRET, &self.access_key_secret),
            (ENV_BUCKET_NAME, &self.bucket_name),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DeployError::Config(missing.join(", ")))
        }
    }

    /// Region label derived from the endpoint (informational)
    #[must_use]
    pub fn region(&self) -> String {
        derive_region(&self.endpoint)
    }

    /// Virtual host of the bucket
    #[must_use]
    pub fn bucket_host(&self) -> String {
        format!("{}.{}", self.bucket_name, self.endpoint)
    }

    /// Public HTTPS root of the bucket, without trailing slash
    #[must_use]
    pub fn public_base_url(&self) -> String {
        format!("https://{}", self.bucket_host())
    }
}

/// Strip scheme and trailing slashes from an endpoint
#[must_use]
pub fn normalize_endpoint(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);

    without_scheme.trim_end_matches('/').to_string()
}

/// `oss-cn-shanghai.aliyuncs.com` -> `cn-shanghai`; anything else -> [`DEFAULT_REGION`]
#[must_use]
pub fn derive_region(endpoint: &str) -> String {
    endpoint.strip_prefix("oss-").map_or_else(
        || DEFAULT_REGION.to_string(),
        |rest| rest.strip_suffix(".aliyuncs.com").unwrap_or(rest).to_string(),
    )
}
