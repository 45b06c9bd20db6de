use anyhow::Result;
use std::env;

/// Ambient backend configuration, read from the environment (with `.env`
/// support). Everything here is optional; absent values fall back to the
/// AWS SDK default resolution chain.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl Config {
    /// Load configuration from environment variables and `.env` file
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if it exists

        let region = env::var("AWS_REGION").ok();
        if let Some(region) = &region {
            Self::validate_region(region)?;
        }

        let profile = env::var("AWS_PROFILE").ok();

        Ok(Self { region, profile })
    }

    /// Validate AWS region format
    fn validate_region(region: &str) -> Result<()> {
        if region.is_empty() {
            anyhow::bail!("AWS_REGION cannot be empty");
        }

        // Basic validation - ensure it looks like a region (contains a dash)
        if !region.contains('-') {
            anyhow::bail!(
                "AWS_REGION '{}' doesn't look like a valid region (e.g., us-west-2, eu-west-1)",
                region
            );
        }

        Ok(())
    }

    /// Validate an S3 bucket name according to AWS rules, before any
    /// network call is made with it.
    pub fn validate_bucket_name(bucket: &str) -> Result<()> {
        if bucket.is_empty() {
            anyhow::bail!("bucket name cannot be empty");
        }

        if bucket.len() < 3 || bucket.len() > 63 {
            anyhow::bail!(
                "bucket '{}' must be between 3 and 63 characters (got {})",
                bucket,
                bucket.len()
            );
        }

        let first = bucket.chars().next().unwrap_or_default();
        if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
            anyhow::bail!("bucket '{}' must start with a lowercase letter or number", bucket);
        }

        let last = bucket.chars().last().unwrap_or_default();
        if !last.is_ascii_lowercase() && !last.is_ascii_digit() {
            anyhow::bail!("bucket '{}' must end with a lowercase letter or number", bucket);
        }

        for c in bucket.chars() {
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' && c != '.' {
                anyhow::bail!(
                    "bucket '{}' contains invalid character '{}'. Only lowercase letters, numbers, hyphens, and periods are allowed",
                    bucket,
                    c
                );
            }
        }

        if bucket.contains("..") {
            anyhow::bail!("bucket '{}' cannot contain consecutive periods", bucket);
        }

        // IP address format is not allowed
        if bucket
            .split('.')
            .all(|part| part.parse::<u8>().is_ok() && !part.is_empty())
        {
            anyhow::bail!("bucket '{}' cannot be formatted as an IP address", bucket);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_name_validation() {
        // Valid bucket names
        assert!(Config::validate_bucket_name("my-bucket").is_ok());
        assert!(Config::validate_bucket_name("my.bucket.123").is_ok());
        assert!(Config::validate_bucket_name("abc").is_ok());
        assert!(Config::validate_bucket_name("backups-2024").is_ok());

        // Invalid bucket names
        assert!(Config::validate_bucket_name("ab").is_err()); // Too short
        assert!(Config::validate_bucket_name(&"a".repeat(64)).is_err()); // Too long
        assert!(Config::validate_bucket_name("MY-BUCKET").is_err()); // Uppercase
        assert!(Config::validate_bucket_name("my_bucket").is_err()); // Underscore
        assert!(Config::validate_bucket_name("-mybucket").is_err()); // Starts with dash
        assert!(Config::validate_bucket_name("mybucket-").is_err()); // Ends with dash
        assert!(Config::validate_bucket_name("my..bucket").is_err()); // Consecutive periods
        assert!(Config::validate_bucket_name("192.168.1.1").is_err()); // IP address format
        assert!(Config::validate_bucket_name("").is_err()); // Empty
    }

    #[test]
    fn test_region_validation() {
        assert!(Config::validate_region("us-west-2").is_ok());
        assert!(Config::validate_region("eu-west-1").is_ok());

        assert!(Config::validate_region("").is_err()); // Empty
        assert!(Config::validate_region("uswest2").is_err()); // No dash
    }
}
