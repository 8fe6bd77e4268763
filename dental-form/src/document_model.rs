//! Document model holding the state of one editing session

use itertools::Itertools;

use crate::document::{CallToAction, Document, LinkBlock, LinkCard, Section};
use crate::exporter::{self, Export, ExportError, Snapshot};
use crate::location::{
    CallToActionField, DescriptionField, FieldPath, LinkBlockField, LinkCardField,
    RepeatedGroup, RootField, SectionField, Toggle,
};

/// Everything the user has entered so far
///
/// Owns the document, the raw bullet text of every section and the file name.
/// All mutation goes through the methods below, which keep `raw_bullets`
/// index-aligned with `document.sections` and every repeated group non-empty.
///
/// Indices passed to the model must come from its current state. An index
/// outside a group is a bug in the caller and panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentModel {
    document: Document,
    /// Unparsed bullet text, one entry per section
    raw_bullets: Vec<String>,
    /// Name of the export artifact, never serialized
    file_name: String,
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentModel {
    /// Create the model for a fresh session
    ///
    /// # Returns
    /// * `DocumentModel` - One empty row in every repeated group, one empty
    ///   raw bullet entry and an empty file name
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            raw_bullets: vec![String::new()],
            file_name: String::new(),
        }
    }

    /// Reopen a previously exported snapshot for editing
    ///
    /// The raw bullet text of each section is rebuilt by joining its bullet
    /// points with `", "`. Exporting without further edits reproduces the
    /// snapshot, unless a bullet point itself contains a comma or a bullet
    /// glyph.
    ///
    /// Empty groups in the snapshot receive one empty row, since every group
    /// must keep at least one.
    ///
    /// # Parameters
    /// * `snapshot` - Parsed export
    /// * `file_name` - Initial value of the file name field
    pub fn from_snapshot(snapshot: Snapshot, file_name: impl Into<String>) -> Self {
        let mut document = snapshot.into_document();

        if document.call_to_actions.is_empty() {
            document.call_to_actions.push(CallToAction::default());
        }
        if document.sections.is_empty() {
            document.sections.push(Section::default());
        }
        if document.link_cards.is_empty() {
            document.link_cards.push(LinkCard::default());
        }
        if document.link_blocks.is_empty() {
            document.link_blocks.push(LinkBlock::default());
        }

        let raw_bullets = document
            .sections
            .iter()
            .map(|section| section.description.bullet_points.iter().join(", "))
            .collect();

        Self {
            document,
            raw_bullets,
            file_name: file_name.into(),
        }
    }

    /// The document as edited so far
    ///
    /// Bullet points stored here are stale until export.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Raw bullet text, one entry per section
    pub fn raw_bullets(&self) -> &[String] {
        &self.raw_bullets
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Number of rows currently in a repeated group
    pub fn group_len(&self, group: RepeatedGroup) -> usize {
        match group {
            RepeatedGroup::CallToActions => self.document.call_to_actions.len(),
            RepeatedGroup::Sections => self.document.sections.len(),
            RepeatedGroup::LinkCards => self.document.link_cards.len(),
            RepeatedGroup::LinkBlocks => self.document.link_blocks.len(),
        }
    }

    /// Read a scalar field
    ///
    /// # Panics
    /// If the path's index is outside its group.
    pub fn field(&self, path: FieldPath) -> &str {
        self.assert_in_bounds(path);
        let doc = &self.document;

        match path {
            FieldPath::Root(field) => match field {
                RootField::HeroImage => &doc.hero_image,
                RootField::HeadingLight => &doc.heading_light,
                RootField::HeadingBold => &doc.heading_bold,
            },
            FieldPath::CallToAction(i, field) => {
                let cta = &doc.call_to_actions[i];
                match field {
                    CallToActionField::Name => &cta.name,
                    CallToActionField::Link => &cta.link,
                }
            }
            FieldPath::Section(i, field) => {
                let section = &doc.sections[i];
                match field {
                    SectionField::HeadingLight => &section.heading_light,
                    SectionField::HeadingBold => &section.heading_bold,
                    SectionField::Image => &section.image,
                }
            }
            FieldPath::SectionDescription(i, field) => {
                let description = &doc.sections[i].description;
                match field {
                    DescriptionField::Paragraph1 => &description.paragraph1,
                    DescriptionField::Paragraph2 => &description.paragraph2,
                }
            }
            FieldPath::LinkCard(i, field) => {
                let card = &doc.link_cards[i];
                match field {
                    LinkCardField::Title => &card.title,
                    LinkCardField::Link => &card.link,
                }
            }
            FieldPath::LinkBlock(i, field) => {
                let block = &doc.link_blocks[i];
                match field {
                    LinkBlockField::Title => &block.title,
                    LinkBlockField::SubTitle => &block.sub_title,
                    LinkBlockField::Link => &block.link,
                }
            }
        }
    }

    /// Read a boolean toggle
    pub fn toggle(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::IsLinkCards => self.document.is_link_cards,
            Toggle::IsLinkBlocks => self.document.is_link_blocks,
        }
    }

    /// Store a string in a scalar field
    ///
    /// Any string is accepted, including the empty string. No other state
    /// changes.
    ///
    /// # Panics
    /// If the path's index is outside its group.
    pub fn set_scalar_field(&mut self, path: FieldPath, value: impl Into<String>) {
        log::debug!("set {}", path);
        *self.field_mut(path) = value.into();
    }

    /// Switch link cards or link blocks on or off
    pub fn set_boolean_field(&mut self, toggle: Toggle, value: bool) {
        log::debug!("set {} = {}", toggle, value);
        match toggle {
            Toggle::IsLinkCards => self.document.is_link_cards = value,
            Toggle::IsLinkBlocks => self.document.is_link_blocks = value,
        }
    }

    /// Append an empty row to a repeated group
    ///
    /// Appending a section also appends its (empty) raw bullet text.
    pub fn append_repeated_item(&mut self, group: RepeatedGroup) {
        match group {
            RepeatedGroup::CallToActions => {
                self.document.call_to_actions.push(CallToAction::default());
            }
            RepeatedGroup::Sections => {
                self.document.sections.push(Section::default());
                self.raw_bullets.push(String::new());
            }
            RepeatedGroup::LinkCards => self.document.link_cards.push(LinkCard::default()),
            RepeatedGroup::LinkBlocks => self.document.link_blocks.push(LinkBlock::default()),
        }
        log::debug!("appended to {} (now {})", group, self.group_len(group));
    }

    /// Remove a row from a repeated group
    ///
    /// Does nothing when the group has a single row left. Removing a section
    /// also removes its raw bullet text.
    ///
    /// # Panics
    /// If the group has more than one row and `index` is outside it.
    pub fn remove_repeated_item(&mut self, group: RepeatedGroup, index: usize) {
        let len = self.group_len(group);
        if len <= 1 {
            log::debug!("ignored removal of the last row of {}", group);
            return;
        }
        assert_index(group, index, len);

        match group {
            RepeatedGroup::CallToActions => {
                self.document.call_to_actions.remove(index);
            }
            RepeatedGroup::Sections => {
                self.document.sections.remove(index);
                if index < self.raw_bullets.len() {
                    self.raw_bullets.remove(index);
                }
            }
            RepeatedGroup::LinkCards => {
                self.document.link_cards.remove(index);
            }
            RepeatedGroup::LinkBlocks => {
                self.document.link_blocks.remove(index);
            }
        }
        log::debug!("removed {}[{}] (now {})", group, index, len - 1);
    }

    /// Replace the raw bullet text of a section
    ///
    /// A buffer shorter than the section list is padded with empty strings
    /// first.
    ///
    /// # Panics
    /// If `section_index` is outside the current sections.
    pub fn set_raw_bullet_text(&mut self, section_index: usize, text: impl Into<String>) {
        assert_index(RepeatedGroup::Sections, section_index, self.document.sections.len());

        if section_index >= self.raw_bullets.len() {
            log::warn!(
                "raw bullet buffer has {} entries for {} sections, padding",
                self.raw_bullets.len(),
                self.document.sections.len()
            );
            self.raw_bullets.resize(section_index + 1, String::new());
        }
        self.raw_bullets[section_index] = text.into();
    }

    pub fn set_file_name(&mut self, name: impl Into<String>) {
        self.file_name = name.into();
    }

    /// Normalize the current state into an export snapshot
    pub fn snapshot(&self) -> Snapshot {
        exporter::build_snapshot(&self.document, &self.raw_bullets)
    }

    /// Produce the artifact name and JSON payload for the current state
    ///
    /// # Returns
    /// * `Ok(Export)` - File name and serialized snapshot
    /// * `Err(ExportError)` - Serialization failed
    pub fn export(&self) -> Result<Export, ExportError> {
        let snapshot = self.snapshot();
        let export = Export {
            file_name: exporter::derive_file_name(&self.file_name),
            payload: exporter::serialize(&snapshot)?,
        };
        log::info!(
            "exported {} sections as {}",
            snapshot.document().sections.len(),
            export.file_name
        );
        Ok(export)
    }

    fn field_mut(&mut self, path: FieldPath) -> &mut String {
        self.assert_in_bounds(path);
        let doc = &mut self.document;

        match path {
            FieldPath::Root(field) => match field {
                RootField::HeroImage => &mut doc.hero_image,
                RootField::HeadingLight => &mut doc.heading_light,
                RootField::HeadingBold => &mut doc.heading_bold,
            },
            FieldPath::CallToAction(i, field) => {
                let cta = &mut doc.call_to_actions[i];
                match field {
                    CallToActionField::Name => &mut cta.name,
                    CallToActionField::Link => &mut cta.link,
                }
            }
            FieldPath::Section(i, field) => {
                let section = &mut doc.sections[i];
                match field {
                    SectionField::HeadingLight => &mut section.heading_light,
                    SectionField::HeadingBold => &mut section.heading_bold,
                    SectionField::Image => &mut section.image,
                }
            }
            FieldPath::SectionDescription(i, field) => {
                let description = &mut doc.sections[i].description;
                match field {
                    DescriptionField::Paragraph1 => &mut description.paragraph1,
                    DescriptionField::Paragraph2 => &mut description.paragraph2,
                }
            }
            FieldPath::LinkCard(i, field) => {
                let card = &mut doc.link_cards[i];
                match field {
                    LinkCardField::Title => &mut card.title,
                    LinkCardField::Link => &mut card.link,
                }
            }
            FieldPath::LinkBlock(i, field) => {
                let block = &mut doc.link_blocks[i];
                match field {
                    LinkBlockField::Title => &mut block.title,
                    LinkBlockField::SubTitle => &mut block.sub_title,
                    LinkBlockField::Link => &mut block.link,
                }
            }
        }
    }

    fn assert_in_bounds(&self, path: FieldPath) {
        if let Some((group, index)) = path.row() {
            assert_index(group, index, self.group_len(group));
        }
    }
}

fn assert_index(group: RepeatedGroup, index: usize, len: usize) {
    assert!(
        index < len,
        "index {} out of bounds for {} with {} rows",
        index,
        group,
        len
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_paths(model: &DocumentModel) -> Vec<FieldPath> {
        let mut paths: Vec<FieldPath> =
            RootField::ALL.iter().map(|f| FieldPath::Root(*f)).collect();
        for i in 0..model.group_len(RepeatedGroup::CallToActions) {
            paths.extend(CallToActionField::ALL.iter().map(|f| FieldPath::CallToAction(i, *f)));
        }
        for i in 0..model.group_len(RepeatedGroup::Sections) {
            paths.extend(SectionField::ALL.iter().map(|f| FieldPath::Section(i, *f)));
            paths.extend(
                DescriptionField::ALL
                    .iter()
                    .map(|f| FieldPath::SectionDescription(i, *f)),
            );
        }
        for i in 0..model.group_len(RepeatedGroup::LinkCards) {
            paths.extend(LinkCardField::ALL.iter().map(|f| FieldPath::LinkCard(i, *f)));
        }
        for i in 0..model.group_len(RepeatedGroup::LinkBlocks) {
            paths.extend(LinkBlockField::ALL.iter().map(|f| FieldPath::LinkBlock(i, *f)));
        }
        paths
    }

    fn two_rows_everywhere() -> DocumentModel {
        let mut model = DocumentModel::new();
        for group in RepeatedGroup::ALL {
            model.append_repeated_item(*group);
        }
        model
    }

    #[test]
    fn test_new_model_is_synchronized() {
        let model = DocumentModel::new();

        for group in RepeatedGroup::ALL {
            assert_eq!(model.group_len(*group), 1, "{}", group);
        }
        assert_eq!(model.raw_bullets(), &[String::new()]);
        assert_eq!(model.file_name(), "");
    }

    #[test]
    fn test_set_scalar_field_frame_property() {
        let base = two_rows_everywhere();

        for path in all_paths(&base) {
            let mut model = base.clone();
            model.set_scalar_field(path, "edited");

            assert_eq!(model.field(path), "edited", "{}", path);
            for other in all_paths(&base).into_iter().filter(|p| *p != path) {
                assert_eq!(model.field(other), "", "{} changed when setting {}", other, path);
            }
            assert_eq!(model.raw_bullets(), base.raw_bullets());
            assert_eq!(model.document().is_link_cards, base.document().is_link_cards);
        }
    }

    #[test]
    fn test_set_scalar_field_accepts_empty_string() {
        let mut model = DocumentModel::new();
        let path = FieldPath::Root(RootField::HeroImage);
        model.set_scalar_field(path, "/images/hero.webp");
        model.set_scalar_field(path, "");
        assert_eq!(model.field(path), "");
    }

    #[test]
    #[should_panic(expected = "index 1 out of bounds for linkCards with 1 rows")]
    fn test_set_scalar_field_out_of_bounds_panics() {
        let mut model = DocumentModel::new();
        model.set_scalar_field(FieldPath::LinkCard(1, LinkCardField::Title), "Crowns");
    }

    #[test]
    fn test_set_boolean_field() {
        let mut model = DocumentModel::new();
        model.set_boolean_field(Toggle::IsLinkBlocks, true);

        assert!(model.toggle(Toggle::IsLinkBlocks));
        assert!(!model.toggle(Toggle::IsLinkCards));

        model.set_boolean_field(Toggle::IsLinkBlocks, false);
        assert!(!model.document().is_link_blocks);
    }

    #[test]
    fn test_append_section_grows_raw_bullets() {
        let mut model = DocumentModel::new();
        model.append_repeated_item(RepeatedGroup::Sections);
        model.append_repeated_item(RepeatedGroup::Sections);

        assert_eq!(model.group_len(RepeatedGroup::Sections), 3);
        assert_eq!(model.raw_bullets().len(), 3);
        assert_eq!(model.document().sections[2], Section::default());
    }

    #[test]
    fn test_append_other_groups_leaves_raw_bullets() {
        let mut model = DocumentModel::new();
        model.append_repeated_item(RepeatedGroup::LinkBlocks);

        assert_eq!(model.group_len(RepeatedGroup::LinkBlocks), 2);
        assert_eq!(model.raw_bullets().len(), 1);
    }

    #[test]
    fn test_remove_last_row_is_noop() {
        for group in RepeatedGroup::ALL {
            let mut model = DocumentModel::new();
            model.set_raw_bullet_text(0, "Keep me");
            let before = model.clone();

            model.remove_repeated_item(*group, 0);

            assert_eq!(model, before, "{}", group);
        }
    }

    #[test]
    fn test_remove_section_keeps_bullets_aligned() {
        let mut model = DocumentModel::new();
        model.append_repeated_item(RepeatedGroup::Sections);
        model.append_repeated_item(RepeatedGroup::Sections);
        for i in 0..3 {
            model.set_scalar_field(FieldPath::Section(i, SectionField::HeadingBold), format!("S{}", i));
            model.set_raw_bullet_text(i, format!("B{}", i));
        }

        model.remove_repeated_item(RepeatedGroup::Sections, 1);

        let headings: Vec<&str> = model
            .document()
            .sections
            .iter()
            .map(|s| s.heading_bold.as_str())
            .collect();
        assert_eq!(headings, vec!["S0", "S2"]);
        assert_eq!(model.raw_bullets(), &["B0".to_string(), "B2".to_string()]);
    }

    #[test]
    fn test_remove_call_to_action_by_index() {
        let mut model = DocumentModel::new();
        model.append_repeated_item(RepeatedGroup::CallToActions);
        model.set_scalar_field(FieldPath::CallToAction(0, CallToActionField::Name), "Book");
        model.set_scalar_field(FieldPath::CallToAction(1, CallToActionField::Name), "Call");

        model.remove_repeated_item(RepeatedGroup::CallToActions, 0);

        assert_eq!(model.document().call_to_actions.len(), 1);
        assert_eq!(model.document().call_to_actions[0].name, "Call");
    }

    #[test]
    #[should_panic(expected = "out of bounds for sections")]
    fn test_remove_out_of_bounds_panics() {
        let mut model = DocumentModel::new();
        model.append_repeated_item(RepeatedGroup::Sections);
        model.remove_repeated_item(RepeatedGroup::Sections, 2);
    }

    #[test]
    fn test_set_raw_bullet_text_pads_short_buffer() {
        let mut model = DocumentModel::new();
        model.document.sections.push(Section::default());
        model.document.sections.push(Section::default());

        model.set_raw_bullet_text(2, "Late");

        assert_eq!(
            model.raw_bullets(),
            &[String::new(), String::new(), "Late".to_string()]
        );
    }

    #[test]
    #[should_panic(expected = "out of bounds for sections")]
    fn test_set_raw_bullet_text_outside_sections_panics() {
        let mut model = DocumentModel::new();
        model.set_raw_bullet_text(1, "Nowhere");
    }

    #[test]
    fn test_bullet_points_stay_inert_until_export() {
        let mut model = DocumentModel::new();
        model.set_raw_bullet_text(0, "A, B");

        assert!(model.document().sections[0].description.bullet_points.is_empty());
        assert_eq!(
            model.snapshot().document().sections[0].description.bullet_points,
            vec!["A", "B"]
        );
    }

    #[test]
    fn test_export_uses_file_name() {
        let mut model = DocumentModel::new();
        model.set_file_name("Missing Teeth Treatment");

        let export = model.export().unwrap();

        assert_eq!(export.file_name, "missing-teeth-treatment.json");
        assert!(!export.payload.contains("Missing Teeth"));
    }

    #[test]
    fn test_from_snapshot_reexports_identically() {
        let mut model = DocumentModel::new();
        model.append_repeated_item(RepeatedGroup::Sections);
        model.set_raw_bullet_text(0, "• Fast • Painless");
        model.set_raw_bullet_text(1, "Affordable,, Friendly");
        model.set_scalar_field(FieldPath::Root(RootField::HeadingBold), "Smile");
        let snapshot = model.snapshot();

        let reopened = DocumentModel::from_snapshot(snapshot.clone(), "smile");

        assert_eq!(reopened.raw_bullets(), &["Fast, Painless", "Affordable, Friendly"]);
        assert_eq!(reopened.snapshot(), snapshot);
        assert_eq!(reopened.file_name(), "smile");
    }

    #[test]
    fn test_from_snapshot_restores_empty_groups() {
        let mut document = Document::new();
        document.link_cards.clear();
        document.sections.clear();
        let snapshot = exporter::build_snapshot(&document, &[]);

        let model = DocumentModel::from_snapshot(snapshot, "");

        assert_eq!(model.group_len(RepeatedGroup::LinkCards), 1);
        assert_eq!(model.group_len(RepeatedGroup::Sections), 1);
        assert_eq!(model.raw_bullets().len(), 1);
    }
}
