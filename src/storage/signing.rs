//! OSS header signature (V1)
//!
//! `Authorization: OSS <AccessKeyId>:<Signature>` where the signature is
//! `base64(hmac-sha1(secret, StringToSign))` and
//!
//! ```text
//! StringToSign = VERB + "\n"
//!              + Content-MD5 + "\n"
//!              + Content-Type + "\n"
//!              + Date + "\n"
//!              + CanonicalizedOSSHeaders
//!              + CanonicalizedResource
//! ```
//!
//! No `x-oss-*` headers are sent, so CanonicalizedOSSHeaders is always empty.

use crate::error::OssError;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// `/<bucket>/<key>` with an optional sub-resource such as `bucketInfo`
#[must_use]
pub fn canonical_resource(bucket: &str, key: &str, subresource: Option<&str>) -> String {
    match subresource {
        Some(sub) => format!("/{bucket}/{key}?{sub}"),
        None => format!("/{bucket}/{key}"),
    }
}

#[must_use]
pub fn string_to_sign(
    verb: &str,
    content_md5: &str,
    content_type: &str,
    date: &str,
    resource: &str,
) -> String {
    format!("{verb}\n{content_md5}\n{content_type}\n{date}\n{resource}")
}

/// Base64 HMAC-SHA1 of `string_to_sign`
pub fn sign(secret: &str, string_to_sign: &str) -> Result<String, OssError> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .map_err(|e| OssError::Signing(e.to_string()))?;
    mac.update(string_to_sign.as_bytes());

    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

#[must_use]
pub fn authorization(access_key_id: &str, signature: &str) -> String {
    format!("OSS {access_key_id}:{signature}")
}

/// RFC 1123 date as OSS expects it in the `Date` header
#[must_use]
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
