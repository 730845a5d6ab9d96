//! Categorical encoding
//!
//! Maps raw telemetry strings to the integer codes the classifier was
//! trained on. Values never seen during training fall back to code 0
//! instead of failing the request; code 0 may also be a legitimate learned
//! code, so an unseen value is indistinguishable downstream from whatever
//! the training run assigned code 0.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::telemetry::{IncidentTelemetry, FIELD_COUNT};

/// Code assigned to any value absent from a field's vocabulary.
pub const FALLBACK_CODE: i64 = 0;

/// Encoded telemetry in training field order.
pub type EncodedFeatureVector = [i64; FIELD_COUNT];

/// Learned value -> code mapping for a single categorical field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    classes: HashMap<String, i64>,
}

impl Vocabulary {
    /// Learned code for `value`, or the fallback code when unseen.
    pub fn code(&self, value: &str) -> i64 {
        self.classes.get(value).copied().unwrap_or(FALLBACK_CODE)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl FromIterator<(String, i64)> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            classes: iter.into_iter().collect(),
        }
    }
}

/// Vocabularies for every categorical field, keyed by field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldEncoders {
    fields: HashMap<String, Vocabulary>,
}

impl FieldEncoders {
    pub fn new(fields: HashMap<String, Vocabulary>) -> Self {
        Self { fields }
    }

    /// Encode one field's raw value.
    ///
    /// A field without a vocabulary passes through unmodified: a numeric
    /// raw value is used as-is, anything else degrades to the fallback code.
    pub fn encode(&self, field: &str, value: &str) -> i64 {
        match self.fields.get(field) {
            Some(vocab) => vocab.code(value),
            None => value.parse().unwrap_or(FALLBACK_CODE),
        }
    }

    /// Encode full telemetry in training order.
    pub fn encode_telemetry(&self, telemetry: &IncidentTelemetry) -> EncodedFeatureVector {
        let mut codes = [FALLBACK_CODE; FIELD_COUNT];
        for (slot, (field, value)) in codes.iter_mut().zip(telemetry.fields()) {
            *slot = self.encode(field, value);
        }
        codes
    }
}
