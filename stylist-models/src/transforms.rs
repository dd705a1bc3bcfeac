//! Preprocessing transforms and the categorical label codec.

use serde::{Deserialize, Serialize};

/// Standard scaler: `(x - mean) / scale`. A zero scale is treated as 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn identity(len: usize) -> Self {
        Self {
            mean: vec![0.0; len],
            scale: vec![1.0; len],
        }
    }

    pub fn validate(&self, expected_len: usize) -> Result<(), String> {
        if self.mean.len() != expected_len || self.scale.len() != expected_len {
            return Err(format!(
                "scaler has {}/{} mean/scale entries, expected {expected_len}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self
            .mean
            .iter()
            .chain(self.scale.iter())
            .any(|v| !v.is_finite())
        {
            return Err("scaler contains non-finite values".to_string());
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .map(|(i, x)| {
                let mean = self.mean.get(i).copied().unwrap_or(0.0);
                (x - mean) / effective_scale(self.scale.get(i).copied())
            })
            .collect()
    }

    pub fn inverse_transform(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .map(|(i, z)| {
                let mean = self.mean.get(i).copied().unwrap_or(0.0);
                z * effective_scale(self.scale.get(i).copied()) + mean
            })
            .collect()
    }
}

fn effective_scale(scale: Option<f64>) -> f64 {
    match scale {
        Some(s) if s != 0.0 => s,
        _ => 1.0,
    }
}

/// Index → label mapping produced at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCodec {
    pub classes: Vec<String>,
}

impl LabelCodec {
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("label codec has no classes".to_string());
        }
        Ok(())
    }

    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaler_round_trips_through_inverse() {
        let scaler = StandardScaler {
            mean: vec![1.0, 10.0],
            scale: vec![2.0, 0.0],
        };
        let z = scaler.transform(&[3.0, 12.0]);
        assert_eq!(z, vec![1.0, 2.0]);
        assert_eq!(scaler.inverse_transform(&z), vec![3.0, 12.0]);
    }

    #[test]
    fn scaler_length_is_checked() {
        assert!(StandardScaler::identity(20).validate(21).is_err());
        assert!(StandardScaler::identity(21).validate(21).is_ok());
    }

    #[test]
    fn codec_decodes_by_index() {
        let codec = LabelCodec {
            classes: vec!["compact".into(), "spacious".into()],
        };
        assert_eq!(codec.decode(1), Some("spacious"));
        assert_eq!(codec.decode(2), None);
    }
}
