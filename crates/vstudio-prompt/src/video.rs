//! Video prompt assembly.

use vstudio_models::{AspectRatio, BrandKit, ClipDuration, ReferenceTag};

use crate::sections::{bullets, PromptBuilder};

pub const REFERENCE_IMAGES_TITLE: &str = "REFERENCE IMAGES";
pub const CREATIVE_TREND_TITLE: &str = "CREATIVE TREND";
pub const BRAND_GUIDELINES_TITLE: &str = "BRAND GUIDELINES";
pub const COLOR_PALETTE_TITLE: &str = "COLOR PALETTE";
pub const NARRATIVE_TITLE: &str = "NARRATIVE (MOST IMPORTANT)";
pub const VIDEO_SPECIFICATIONS_TITLE: &str = "VIDEO SPECIFICATIONS";

const REFERENCE_DURATION_NOTICE: &str = "Reference images are attached, so the clip is locked to 8 seconds. Keep every referenced subject recognisable and consistent from the first frame to the last.";

const DEFAULT_BRAND_INTRO: &str = "No specific brand guidelines were provided. Produce a polished, premium short-form ad that feels native to a vertical video feed.";

const DEFAULT_BRAND_DO: &[&str] = &[
    "Hook the viewer within the first second",
    "Keep the product on screen and in focus for most of the clip",
    "Use clean, modern visuals with confident camera movement",
    "Favor one clear idea that lands inside the time limit",
];

const DEFAULT_BRAND_DONT: &[&str] = &[
    "Cram in more scenes than the duration can carry",
    "Use cluttered backgrounds that compete with the product",
    "Rely on on-screen text to tell the story",
    "Let the product change shape, color or label between shots",
];

const FRAMING_GUIDELINES: &[&str] = &[
    "Keep the subject inside the central safe zone, clear of platform UI overlays",
    "Start on motion; avoid a static opening frame",
    "Design for loop playback: the final frame should flow naturally back into the first",
    "Keep camera motion smooth and intentional",
    "No watermarks, captions or burned-in text",
];

/// Inputs to the video assembler.
#[derive(Debug, Clone)]
pub struct VideoPromptParams<'a> {
    /// One tag per anchor image actually attached, in attachment order.
    pub references: &'a [ReferenceTag],
    pub trend_text: Option<&'a str>,
    pub brand: &'a BrandKit,
    pub narrative: &'a str,
    pub narrative_template: Option<&'a str>,
    /// Effective duration, already resolved against the anchors.
    pub duration: ClipDuration,
    pub aspect_ratio: AspectRatio,
}

/// Build the full video prompt.
pub fn build_video_prompt(params: &VideoPromptParams<'_>) -> String {
    let mut builder = PromptBuilder::new();
    let has_references = !params.references.is_empty();

    if has_references {
        let lines = params
            .references
            .iter()
            .enumerate()
            .map(|(i, tag)| format!("Image {}: {}", i + 1, tag.label()))
            .collect::<Vec<_>>()
            .join("\n");
        builder.section(
            REFERENCE_IMAGES_TITLE,
            format!("{}\n\n{}", lines, REFERENCE_DURATION_NOTICE),
        );
    }

    builder.optional(CREATIVE_TREND_TITLE, params.trend_text);

    let guidelines = params
        .brand
        .guidelines
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());
    match guidelines {
        Some(text) => builder.section(BRAND_GUIDELINES_TITLE, text),
        None => builder.section(BRAND_GUIDELINES_TITLE, default_brand_guidelines()),
    };

    builder.section(
        COLOR_PALETTE_TITLE,
        format!(
            "Primary color: {}\nSecondary color: {}\nThe primary color should dominate every shot; use the secondary color as an accent only.\nKeep the palette continuous second to second: the same color grade, white balance and brand color placement throughout, with no flicker or sudden shifts between shots.",
            params.brand.primary_color, params.brand.secondary_color
        ),
    );

    builder.section(NARRATIVE_TITLE, narrative_body(params, has_references));

    builder.section(
        VIDEO_SPECIFICATIONS_TITLE,
        format!(
            "Aspect ratio: {}\nDuration: {}\nFormat: {}\n\nFraming guidelines:\n{}",
            params.aspect_ratio,
            params.duration,
            ratio_guidance(params.aspect_ratio),
            bullets(FRAMING_GUIDELINES.iter().copied())
        ),
    );

    builder.build()
}

/// Structure hint for a named narrative template.
pub fn narrative_structure(template: &str) -> String {
    let hint = match template.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
        "problem-solution" => "Open on a relatable problem, introduce the product as the fix, end on the relief it brings.",
        "before-after" => "Show the before state, a clear moment of change, then the improved after state.",
        "unboxing" => "Build anticipation with the packaging, reveal the product, end on a satisfying hero shot.",
        "tutorial" => "Show the product being used step by step, ending on the finished result.",
        "testimonial" => "A real-feeling person reacts to and recommends the product in their own setting.",
        "day-in-the-life" => "Follow a quick sequence of everyday moments with the product woven naturally into each.",
        _ => return format!("Follow a \"{}\" structure.", template.trim()),
    };
    hint.to_string()
}

/// Ratio-specific framing guidance.
pub fn ratio_guidance(ratio: AspectRatio) -> &'static str {
    match (ratio.width, ratio.height) {
        (9, 16) => "Vertical full-screen video. Frame for a phone held upright and keep the action in the middle two thirds.",
        (1, 1) => "Square video. Keep the action centered so it reads in both feed and grid placements.",
        (16, 9) => "Horizontal widescreen video. Use the width for lateral movement and keep the subject off dead center.",
        _ => "Keep the subject clearly framed with key action away from the edges.",
    }
}

fn default_brand_guidelines() -> String {
    format!(
        "{}\n\nDO:\n{}\n\nDON'T:\n{}",
        DEFAULT_BRAND_INTRO,
        bullets(DEFAULT_BRAND_DO.iter().copied()),
        bullets(DEFAULT_BRAND_DONT.iter().copied())
    )
}

fn narrative_body(params: &VideoPromptParams<'_>, has_references: bool) -> String {
    let mut body = params.narrative.trim().to_string();

    if let Some(template) = params.narrative_template.filter(|t| !t.trim().is_empty()) {
        body.push_str("\n\nStructure: ");
        body.push_str(&narrative_structure(template));
    }

    if has_references {
        let seconds = params.duration.seconds();
        let core_end = seconds.saturating_sub(2);
        body.push_str(&format!(
            "\n\nTimeline:\n- 0-2s: Hook. Establish the referenced subject with immediate motion.\n- 2-{}s: Core action. Deliver the main story beat.\n- {}-{}s: Payoff. Land on the product with a clean final frame.",
            core_end, core_end, seconds
        ));
    }

    body
}
