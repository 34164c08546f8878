use crate::models::Program;
use crate::services::artifacts::tokenize;

/// Generates the one-sentence justification for a content-based match
///
/// Interest tokens are matched by literal substring containment against the
/// program's combined lowercase text. At most the first two matched tokens
/// are ever named, a deliberate brevity policy.
pub fn content_explanation(interests: &str, program: &Program) -> String {
    let tokens = tokenize(interests);
    let matches: Vec<&str> = tokens
        .iter()
        .filter(|token| program.text.contains(token.as_str()))
        .map(String::as_str)
        .collect();

    let matched_text = match matches.len() {
        0 => {
            return format!(
                "This program focuses on {}, which may align with your background and interests.",
                program.tags_text
            );
        }
        1 => matches[0].to_string(),
        2 => format!("{} and {}", matches[0], matches[1]),
        _ => format!("{}, {}, and others", matches[0], matches[1]),
    };

    format!(
        "Recommended because you're interested in {}, and this program focuses on {}.",
        matched_text, program.tags_text
    )
}
