const FEEDBACK_HEADER: &str = "> *Feedback:*";
const FOLLOWUP_HEADER: &str = "> *What could we have done better?*";

/// Compose the quoted survey section of a cancellation notice.
///
/// Input is inserted verbatim, without escaping.
pub fn message_body(
    survey_response: &str,
    feedback: Option<&str>,
    followup_response: Option<&str>,
) -> String {
    let mut message = match feedback {
        Some(feedback) => format!("{}\n> {} — {}", FEEDBACK_HEADER, survey_response, feedback),
        None => format!("{}\n> {}", FEEDBACK_HEADER, survey_response),
    };

    if let Some(followup_response) = followup_response {
        message.push_str(&format!("\n\n{}\n> {}", FOLLOWUP_HEADER, followup_response));
    }

    message
}
