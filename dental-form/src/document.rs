//! Page description types edited by the form
//!
//! These structs are both the live editing state and, once bullet points have
//! been normalized, the exported snapshot. Serialized keys are camelCase and
//! appear in field declaration order.

use serde::{Deserialize, Serialize};

/// Root of a dental data page description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Document {
    /// Path of the hero image (e.g. `/images/hero.webp`)
    pub hero_image: String,

    /// Light weight part of the page heading
    pub heading_light: String,

    /// Bold weight part of the page heading
    pub heading_bold: String,

    /// Call to action buttons shown below the heading
    pub call_to_actions: Vec<CallToAction>,

    /// Content sections of the page
    pub sections: Vec<Section>,

    /// Whether the page shows link cards
    pub is_link_cards: bool,

    /// Whether the page shows link blocks
    pub is_link_blocks: bool,

    /// Link cards, rendered only when `is_link_cards` is set
    pub link_cards: Vec<LinkCard>,

    /// Link blocks, rendered only when `is_link_blocks` is set
    pub link_blocks: Vec<LinkBlock>,
}

impl Document {
    /// Create the starting document of an editing session
    ///
    /// Every repeated group holds exactly one empty row so the user has
    /// something to type into.
    ///
    /// # Returns
    /// * `Document` - Empty scalar fields, both toggles off, one row per group
    pub fn new() -> Self {
        Self {
            call_to_actions: vec![CallToAction::default()],
            sections: vec![Section::default()],
            link_cards: vec![LinkCard::default()],
            link_blocks: vec![LinkBlock::default()],
            ..Self::default()
        }
    }
}

/// A call to action button
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CallToAction {
    /// Button label
    pub name: String,
    /// Button target
    pub link: String,
}

/// A content section with heading, description and image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Section {
    /// Light weight part of the section heading
    pub heading_light: String,
    /// Bold weight part of the section heading
    pub heading_bold: String,
    /// Body text of the section
    pub description: Description,
    /// Path of the section image
    pub image: String,
}

/// Body text of a section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Description {
    /// First paragraph
    pub paragraph1: String,
    /// Second paragraph
    pub paragraph2: String,
    /// Normalized bullet points
    ///
    /// Only meaningful in an exported snapshot. While editing, the raw bullet
    /// text held by the model is the source of truth and this list is left
    /// untouched until export overwrites it.
    pub bullet_points: Vec<String>,
}

/// A card linking to another page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinkCard {
    pub title: String,
    pub link: String,
}

/// A block linking to another page, with a subtitle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinkBlock {
    pub title: String,
    pub sub_title: String,
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_one_row_per_group() {
        let doc = Document::new();

        assert_eq!(doc.call_to_actions.len(), 1);
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.link_cards.len(), 1);
        assert_eq!(doc.link_blocks.len(), 1);
        assert!(!doc.is_link_cards);
        assert!(!doc.is_link_blocks);
        assert!(doc.hero_image.is_empty());
        assert!(doc.sections[0].description.bullet_points.is_empty());
    }

    #[test]
    fn test_keys_are_camel_case_in_declaration_order() {
        let json = serde_json::to_string(&Document::new()).unwrap();

        let expected_order = [
            "\"heroImage\"",
            "\"headingLight\"",
            "\"headingBold\"",
            "\"callToActions\"",
            "\"sections\"",
            "\"isLinkCards\"",
            "\"isLinkBlocks\"",
            "\"linkCards\"",
            "\"linkBlocks\"",
        ];
        let positions: Vec<usize> = expected_order
            .iter()
            .map(|key| json.find(key).unwrap_or_else(|| panic!("missing {key}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");

        assert!(json.contains("\"subTitle\""));
        assert!(json.contains("\"bulletPoints\""));
        assert!(json.contains("\"paragraph1\""));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let json = r#"{"name":"Book now","link":"/book","colour":"red"}"#;
        assert!(serde_json::from_str::<CallToAction>(json).is_err());
    }

    #[test]
    fn test_missing_keys_are_rejected() {
        let json = r#"{"title":"Implants","link":"/implants"}"#;
        assert!(serde_json::from_str::<LinkBlock>(json).is_err());
    }
}
