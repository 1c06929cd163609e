use super::AssessmentError;

/// Parse the model's raw text into the analysis object.
///
/// Accepts either a bare JSON object or one wrapped in ```json fences
/// (local models routinely add the fences despite instructions). The only
/// enforced invariant is that the payload parses to a JSON object; its
/// fields are passed through opaquely.
pub fn parse_analysis(response: &str) -> Result<serde_json::Value, AssessmentError> {
    let candidate = extract_json_block(response);
    if candidate.is_empty() {
        return Err(AssessmentError::MalformedResponse("Empty response".into()));
    }

    let value: serde_json::Value = serde_json::from_str(candidate)
        .map_err(|e| AssessmentError::JsonParsing(e.to_string()))?;

    if !value.is_object() {
        return Err(AssessmentError::MalformedResponse(
            "AI payload is not a JSON object".into(),
        ));
    }

    Ok(value)
}

/// Extract the JSON candidate from the response: the content of a ```json
/// fence when present, otherwise the whole trimmed response.
fn extract_json_block(response: &str) -> &str {
    if let Some(fence_start) = response.find("```json") {
        let content_start = fence_start + 7;
        if let Some(fence_end) = response[content_start..].find("```") {
            return response[content_start..content_start + fence_end].trim();
        }
        // Unclosed fence — take everything after it.
        return response[content_start..].trim();
    }
    response.trim()
}
