//! # Aim Engine Configuration
//!
//! 회전 엔진 설정을 한 곳에서 관리.
//!
//! - [`RotationsConfig`]: per-producer smoothing and reset policy
//! - [`ManagerConfig`]: engine-wide options (sensitivity snapping)
//!
//! ```rust
//! use aim_core::engine::config::AimConfig;
//!
//! let config = AimConfig::from_json(r#"{"rotations":{"ticks_until_reset":8}}"#).unwrap();
//! assert_eq!(config.rotations.ticks_until_reset, 8);
//! ```

mod rotations_config;

pub use rotations_config::RotationsConfig;

use crate::engine::rotation::sensitivity_gcd;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Engine-wide options.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ManagerConfig {
    /// Mouse sensitivity (0..1) for GCD snapping; `None` disables snapping
    #[validate(range(min = 0.0, max = 1.0))]
    pub mouse_sensitivity: Option<f32>,
}

impl ManagerConfig {
    pub fn gcd(&self) -> Option<f32> {
        self.mouse_sensitivity.map(sensitivity_gcd)
    }
}

/// Full configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AimConfig {
    pub rotations: RotationsConfig,
    pub manager: ManagerConfig,
}

impl AimConfig {
    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AimConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn check(&self) -> Result<()> {
        self.rotations.check()?;
        self.manager.validate()?;
        Ok(())
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::smoothing::{SigmoidSmoothing, SmoothingStrategy};
    use crate::error::AimError;

    #[test]
    fn test_default_config() {
        let cfg = AimConfig::default();
        assert!(cfg.check().is_ok());
        assert!(cfg.manager.gcd().is_none());
        assert_eq!(cfg.rotations.ticks_until_reset, 5);
    }

    #[test]
    fn test_config_serialization() {
        let mut cfg = AimConfig::default();
        cfg.rotations.smoothing = SmoothingStrategy::Sigmoid(SigmoidSmoothing::default());
        cfg.manager.mouse_sensitivity = Some(0.5);

        let json = cfg.to_json().unwrap();
        let parsed = AimConfig::from_json(&json).unwrap();
        assert_eq!(parsed.rotations.smoothing, cfg.rotations.smoothing);
        assert!((parsed.manager.gcd().unwrap() - 0.15).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_sensitivity_rejected() {
        let err = AimConfig::from_json(r#"{"manager":{"mouse_sensitivity":1.5}}"#).unwrap_err();
        assert!(matches!(err, AimError::InvalidConfig(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_malformed_json() {
        let err = AimConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, AimError::ConfigParse(_)));
    }
}
