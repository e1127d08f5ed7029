//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "processing.parallel_workers must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        // A kernel wider than twice the largest accepted side blurs no
        // differently from one that just spans it.
        let max_kernel = self.limits.max_image_dimension.saturating_mul(2).saturating_add(1);
        for (name, size) in [
            ("light", self.blur.light),
            ("medium", self.blur.medium),
            ("heavy", self.blur.heavy),
        ] {
            if size == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "blur.{name} must be > 0"
                )));
            }
            if size > max_kernel {
                return Err(ConfigError::ValidationError(format!(
                    "blur.{name} must be <= {max_kernel} (twice limits.max_image_dimension, plus one)"
                )));
            }
        }

        let skin = &self.skin_tone;
        if skin.hue_max > 179 {
            return Err(ConfigError::ValidationError(
                "skin_tone.hue_max must be <= 179".into(),
            ));
        }
        if skin.hue_min > skin.hue_max
            || skin.saturation_min > skin.saturation_max
            || skin.value_min > skin.value_max
        {
            return Err(ConfigError::ValidationError(
                "skin_tone band minimums must not exceed maximums".into(),
            ));
        }
        if skin.morph_kernel_size == 0 || skin.morph_kernel_size % 2 == 0 {
            return Err(ConfigError::ValidationError(
                "skin_tone.morph_kernel_size must be odd and > 0".into(),
            ));
        }

        for (name, quality) in [
            ("encode.jpeg_quality", self.encode.jpeg_quality),
            ("preview.jpeg_quality", self.preview.jpeg_quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 1 and 100"
                )));
            }
        }
        if self.metadata.display_truncate == 0 {
            return Err(ConfigError::ValidationError(
                "metadata.display_truncate must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_parallel_workers() {
        let mut config = Config::default();
        config.processing.parallel_workers = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("parallel_workers"));
    }

    #[test]
    fn test_validate_rejects_zero_kernel() {
        let mut config = Config::default();
        config.blur.heavy = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("blur.heavy"));
    }

    #[test]
    fn test_validate_rejects_oversized_kernel() {
        let mut config = Config::default();
        config.blur.heavy = u32::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("blur.heavy"));

        config.blur.heavy = 401;
        config.limits.max_image_dimension = 200;
        assert!(config.validate().is_ok());
        config.blur.heavy = 402;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_even_kernel() {
        let mut config = Config::default();
        config.blur.light = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_skin_band() {
        let mut config = Config::default();
        config.skin_tone.value_min = 200;
        config.skin_tone.value_max = 100;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("skin_tone"));
    }

    #[test]
    fn test_validate_rejects_even_morph_kernel() {
        let mut config = Config::default();
        config.skin_tone.morph_kernel_size = 6;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("morph_kernel_size"));
    }

    #[test]
    fn test_validate_rejects_jpeg_quality_out_of_range() {
        let mut config = Config::default();
        config.encode.jpeg_quality = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("encode.jpeg_quality"));

        config.encode.jpeg_quality = 95;
        config.preview.jpeg_quality = 101;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("preview.jpeg_quality"));
    }
}
