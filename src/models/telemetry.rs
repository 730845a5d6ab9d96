//! Incident telemetry model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Number of categorical fields the classifier was trained on.
pub const FIELD_COUNT: usize = 7;

/// One security incident as reported by an upstream sensor.
///
/// All seven fields are required strings. Permitted values are not enforced
/// here: a value the encoders have never seen degrades to the fallback code
/// during encoding instead of failing the request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct IncidentTelemetry {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub category: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub mitre_techniques: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub action_grouped: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub entity_type: String,

    #[serde(rename = "OSFamily")]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub os_family: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub suspicion_level: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub country_code: String,
}

impl IncidentTelemetry {
    /// Field name/value pairs in the order the model was trained on.
    ///
    /// Encoding and tensor layout both derive from this single ordering.
    pub fn fields(&self) -> [(&'static str, &str); FIELD_COUNT] {
        [
            ("Category", &self.category),
            ("MitreTechniques", &self.mitre_techniques),
            ("ActionGrouped", &self.action_grouped),
            ("EntityType", &self.entity_type),
            ("OSFamily", &self.os_family),
            ("SuspicionLevel", &self.suspicion_level),
            ("CountryCode", &self.country_code),
        ]
    }
}
