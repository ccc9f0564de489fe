//! Instructions for expanding a short trend description into a full
//! creative direction.

use vstudio_models::GenerationMode;

/// Build the expansion instruction for the text model.
pub fn trend_expansion_prompt(description: &str, mode: GenerationMode) -> String {
    let description = description.trim();
    match mode {
        GenerationMode::Image => format!(
            r#"You are a creative director for short-form vertical social media ads.

Expand this short trend idea into a detailed creative direction for a single product marketing image:
"{description}"

Describe the visual concept, composition, setting, lighting, styling and mood in one or two short paragraphs.
Write plain prose only. No headings, lists or preamble."#
        ),
        GenerationMode::Video => format!(
            r#"You are a creative director for short-form vertical social media ads.

Expand this short trend idea into a detailed creative direction for a video clip that is at most 8 seconds long:
"{description}"

Describe the concept, the key shots, camera movement, pacing and mood. Everything must be achievable within 8 seconds, so keep it to one clear idea with at most three beats.
Write plain prose only. No headings, lists or preamble."#
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_expansion_is_time_boxed() {
        let prompt = trend_expansion_prompt("  slow-mo pour ", GenerationMode::Video);
        assert!(prompt.contains("\"slow-mo pour\""));
        assert!(prompt.contains("8 seconds"));

        let prompt = trend_expansion_prompt("slow-mo pour", GenerationMode::Image);
        assert!(prompt.contains("single product marketing image"));
        assert!(!prompt.contains("8 seconds"));
    }
}
