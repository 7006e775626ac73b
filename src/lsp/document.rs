use crate::validation::ValidationResult;

/// State for each open document
#[derive(Debug)]
pub struct DocumentState {
    pub content: String,
    /// Editor language id, resolved against the profile registry on every validation
    pub language_id: String,
    /// Last published result, used for code actions
    pub result: Option<ValidationResult>,
}

impl DocumentState {
    pub fn new(content: String, language_id: String) -> Self {
        Self {
            content,
            language_id,
            result: None,
        }
    }

    /// Corrected text, if the last result differs from what the editor holds
    pub fn pending_correction(&self) -> Option<&str> {
        self.result
            .as_ref()
            .map(|result| result.corrected_code.as_str())
            .filter(|corrected| !corrected.is_empty() && *corrected != self.content)
    }

    /// Keep `result` only if it was computed for the text the document still holds
    pub fn store_result(&mut self, validated: &str, result: ValidationResult) -> bool {
        if self.content != validated {
            return false;
        }
        self.result = Some(result);
        true
    }
}
