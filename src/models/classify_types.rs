use serde::Serialize;

/// The two fixed output categories of the waste classifier.
pub const LABEL_BIODEGRADABLE: &str = "Biodegradable";
pub const LABEL_NON_BIODEGRADABLE: &str = "Non-Biodegradable";

#[derive(Debug, Serialize, Clone)]
pub struct ModelStatus {
    pub downloaded: bool,
    pub loading: bool,
    pub ready: bool,
    pub error: Option<String>,
}

/// Label plus the probability mass assigned to it.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Classification {
    pub label: &'static str,
    pub confidence: f32,
    /// Raw sigmoid output of the model, before the threshold decision.
    pub probability: f32,
}

#[derive(Debug, Serialize, Clone)]
pub struct ClassifyResult {
    pub file_name: String,
    pub classification: Classification,
}
