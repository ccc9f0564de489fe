//! Creative trend presets.
//!
//! Two static catalogs, one per generation mode. Both are built once on first
//! use and never mutated.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;
use vstudio_models::GenerationMode;

/// A named creative trend and the prompt fragment it contributes.
#[derive(Debug, Clone, Serialize)]
pub struct TrendPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing)]
    pub prompt: &'static str,
}

/// Read-only id -> preset table.
#[derive(Debug)]
pub struct PresetCatalog {
    presets: &'static [TrendPreset],
    index: HashMap<&'static str, usize>,
}

impl PresetCatalog {
    fn new(presets: &'static [TrendPreset]) -> Self {
        let index = presets
            .iter()
            .enumerate()
            .map(|(i, preset)| (preset.id, i))
            .collect();
        Self { presets, index }
    }

    /// Catalog for the given mode.
    pub fn for_mode(mode: GenerationMode) -> &'static PresetCatalog {
        match mode {
            GenerationMode::Image => &IMAGE_CATALOG,
            GenerationMode::Video => &VIDEO_CATALOG,
        }
    }

    pub fn lookup(&self, id: &str) -> Option<&TrendPreset> {
        self.index.get(id.trim()).map(|&i| &self.presets[i])
    }

    /// Presets in display order.
    pub fn presets(&self) -> &[TrendPreset] {
        self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

static IMAGE_CATALOG: LazyLock<PresetCatalog> = LazyLock::new(|| PresetCatalog::new(IMAGE_PRESETS));

static VIDEO_CATALOG: LazyLock<PresetCatalog> = LazyLock::new(|| PresetCatalog::new(VIDEO_PRESETS));

/// Image catalog.
pub fn image_catalog() -> &'static PresetCatalog {
    &IMAGE_CATALOG
}

/// Video catalog.
pub fn video_catalog() -> &'static PresetCatalog {
    &VIDEO_CATALOG
}

const IMAGE_PRESETS: &[TrendPreset] = &[
    TrendPreset {
        id: "unboxing-moment",
        name: "Unboxing Moment",
        description: "The instant the lid comes off: anticipation, tissue paper, first reveal.",
        prompt: "Capture the peak unboxing moment from a slightly elevated point of view. The product sits half revealed inside premium packaging with tissue paper folded back. Hands may enter from the frame edge. Soft top light, crisp packaging textures, a sense of anticipation and discovery.",
    },
    TrendPreset {
        id: "flat-lay-aesthetic",
        name: "Flat Lay Aesthetic",
        description: "Top-down curated arrangement of the product with lifestyle props.",
        prompt: "Shoot a strictly top-down flat lay. Arrange the product as the hero with three to five complementary lifestyle props on a textured surface. Use deliberate negative space, a cohesive muted palette around the brand colors and soft, even daylight with gentle shadows.",
    },
    TrendPreset {
        id: "before-after-split",
        name: "Before & After",
        description: "Split composition contrasting the problem and the result.",
        prompt: "Compose a split image: the left half shows the 'before' state in flatter, cooler light; the right half shows the 'after' state with the product in use, warmer and more vibrant. The divide should be clean and immediately readable at thumbnail size.",
    },
    TrendPreset {
        id: "pov-hands",
        name: "POV Hands-On",
        description: "First-person view of hands using the product.",
        prompt: "Frame the scene from a first-person point of view with the viewer's hands naturally holding or using the product. Shallow depth of field, the product in sharp focus, a believable everyday setting in the background. It should feel like a casual phone capture while staying polished.",
    },
    TrendPreset {
        id: "neon-night",
        name: "Neon Night Drop",
        description: "Moody after-dark product drop with neon accents.",
        prompt: "Place the product in a dark, moody night scene lit by neon signage and colored rim light. Wet reflective surfaces, light haze, high contrast. Neon accents should pick up the brand colors. The mood is an exclusive late-night product drop.",
    },
    TrendPreset {
        id: "y2k-retro",
        name: "Y2K Retro Flash",
        description: "Direct-flash, glossy, early-2000s nostalgia.",
        prompt: "Style the image with early-2000s nostalgia: harsh direct on-camera flash, glossy surfaces, chrome and translucent plastic props, slightly saturated colors and playful angles. Keep the product clearly recognisable despite the retro treatment.",
    },
    TrendPreset {
        id: "get-ready-with-me",
        name: "Get Ready With Me",
        description: "Vanity or mirror setup in a personal morning routine.",
        prompt: "Set the product within a get-ready-with-me routine: a vanity or bathroom counter, mirror reflections, warm morning light, personal items slightly out of focus. The product is mid-use and reads as a natural part of the routine.",
    },
    TrendPreset {
        id: "floating-product",
        name: "Levitating Product",
        description: "Product suspended mid-air with dynamic elements.",
        prompt: "Show the product levitating mid-air against a clean gradient background, surrounded by a few dynamic floating elements related to its ingredients or features. Studio lighting with a soft shadow below to ground it. Crisp, premium, high-end commercial look.",
    },
];

const VIDEO_PRESETS: &[TrendPreset] = &[
    TrendPreset {
        id: "pov-story",
        name: "POV Story",
        description: "First-person mini story where the viewer is the main character.",
        prompt: "Film the clip from a first-person point of view so the viewer is the main character. Handheld, natural motion. The product enters the story at a relatable moment and changes how it ends. Keep cuts minimal so the story reads in one continuous take.",
    },
    TrendPreset {
        id: "snap-transition",
        name: "Snap Transition",
        description: "A hand snap or swipe that instantly transforms the scene.",
        prompt: "Build the clip around one sharp transition: a snap, swipe or cover-the-lens move that instantly transforms the scene from ordinary to branded. The before and after halves mirror each other in framing so the switch feels seamless.",
    },
    TrendPreset {
        id: "asmr-unboxing",
        name: "ASMR Unboxing",
        description: "Slow, tactile, close-up unboxing.",
        prompt: "Shoot a slow, tactile unboxing in extreme close-ups: fingertips peeling seals, lids lifting, textures catching the light. Camera moves are slow and steady. Every action should look like it makes a satisfying sound.",
    },
    TrendPreset {
        id: "day-in-the-life",
        name: "Day in the Life",
        description: "Rapid montage of a day with the product woven in.",
        prompt: "Create a quick montage of moments across one day (morning, midday, evening) with the product appearing naturally in each. Consistent color grade, a clear time-of-day progression in the light, and rhythmic pacing.",
    },
    TrendPreset {
        id: "before-after-reveal",
        name: "Before/After Reveal",
        description: "Show the problem, then the transformed result.",
        prompt: "Open on the problem state, then reveal the transformed result after the product is used. The reveal should land on a single clear moment with a camera push-in. Keep the framing identical between before and after so the difference is obvious.",
    },
    TrendPreset {
        id: "product-orbit",
        name: "360 Product Orbit",
        description: "Smooth orbit around the hero product.",
        prompt: "Orbit the camera smoothly around the hero product on a pedestal or clean surface, revealing every side. Controlled studio lighting with moving highlights across the surfaces. End facing the logo side of the product.",
    },
    TrendPreset {
        id: "green-screen-react",
        name: "Green Screen Reaction",
        description: "Creator reacting in front of a product backdrop.",
        prompt: "Place a creator in the foreground reacting with genuine surprise to the product shown large in the background, in the style of a green-screen reaction. Expressive face, direct eye contact with the camera, bright and punchy lighting.",
    },
    TrendPreset {
        id: "stop-motion-build",
        name: "Stop-Motion Build",
        description: "Playful frame-by-frame assembly of the product or scene.",
        prompt: "Animate the scene in a playful stop-motion style: items hop into place frame by frame until the finished product or setup is assembled. Fixed top-down or front camera, consistent lighting, tactile handmade charm.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let preset = image_catalog().lookup("neon-night").unwrap();
        assert_eq!(preset.name, "Neon Night Drop");
        assert!(image_catalog().lookup("does-not-exist").is_none());
        assert!(video_catalog().lookup("neon-night").is_none());
        assert!(video_catalog().lookup(" pov-story ").is_some());
    }

    #[test]
    fn test_ids_are_unique() {
        for catalog in [image_catalog(), video_catalog()] {
            assert_eq!(catalog.index.len(), catalog.len());
        }
    }

    #[test]
    fn test_for_mode() {
        assert_eq!(
            PresetCatalog::for_mode(GenerationMode::Video).len(),
            video_catalog().len()
        );
    }

    #[test]
    fn test_listing_hides_prompt() {
        let json = serde_json::to_value(&image_catalog().presets()[0]).unwrap();
        assert!(json.get("prompt").is_none());
        assert_eq!(json["id"], "unboxing-moment");
    }
}
