//! Typed addresses into a [`Document`](crate::document::Document)
//!
//! Every editable scalar field is reached through a [`FieldPath`]: a location
//! variant carrying the row index (for repeated groups) and a field enum that
//! only names the fields that location actually has. Invalid field/location
//! pairs cannot be constructed.
//!
//! Paths also have a textual form used by the command language:
//!
//! ```text
//! heroImage
//! callToActions[0].link
//! sections[2].headingBold
//! sections[2].description.paragraph1
//! linkBlocks[1].subTitle
//! ```

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Errors produced when a textual location, group or toggle is not recognized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The text does not look like `field`, `group[i].field` or
    /// `sections[i].description.field`
    #[error("Malformed location '{0}'")]
    Malformed(String),

    /// The location is well formed but has no such field
    #[error("'{location}' has no editable field '{field}'")]
    UnknownField {
        /// Location the field was looked up on (e.g. `linkCards[]`)
        location: String,
        /// The field name that was not found
        field: String,
    },

    /// Not one of the repeated groups
    #[error("Unknown group '{0}' (expected callToActions, sections, linkCards or linkBlocks)")]
    UnknownGroup(String),

    /// Not one of the boolean toggles
    #[error("Unknown toggle '{0}' (expected isLinkCards or isLinkBlocks)")]
    UnknownToggle(String),
}

/// Declares a closed set of field names with their serialized spelling
macro_rules! field_names {
    ($(#[$meta:meta])* $name:ident, $location:literal { $($variant:ident => $key:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// All fields of this location, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Serialized (camelCase) name of the field
            pub fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            fn parse_key(field: &str) -> Result<Self, LocationError> {
                match field {
                    $($key => Ok($name::$variant),)+
                    _ => Err(LocationError::UnknownField {
                        location: $location.to_string(),
                        field: field.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        }
    };
}

field_names!(
    /// Scalar fields on the document root
    RootField, "root" {
        HeroImage => "heroImage",
        HeadingLight => "headingLight",
        HeadingBold => "headingBold",
    }
);

field_names!(
    /// Fields of a call to action row
    CallToActionField, "callToActions[]" {
        Name => "name",
        Link => "link",
    }
);

field_names!(
    /// Scalar fields directly on a section
    SectionField, "sections[]" {
        HeadingLight => "headingLight",
        HeadingBold => "headingBold",
        Image => "image",
    }
);

field_names!(
    /// Editable fields of a section description
    ///
    /// `bulletPoints` is not listed: it is derived at export time
    /// from the raw bullet text.
    DescriptionField, "sections[].description" {
        Paragraph1 => "paragraph1",
        Paragraph2 => "paragraph2",
    }
);

field_names!(
    /// Fields of a link card row
    LinkCardField, "linkCards[]" {
        Title => "title",
        Link => "link",
    }
);

field_names!(
    /// Fields of a link block row
    LinkBlockField, "linkBlocks[]" {
        Title => "title",
        SubTitle => "subTitle",
        Link => "link",
    }
);

/// One of the variable-length groups of the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatedGroup {
    CallToActions,
    Sections,
    LinkCards,
    LinkBlocks,
}

impl RepeatedGroup {
    /// All groups, in document order
    pub const ALL: &'static [RepeatedGroup] = &[
        RepeatedGroup::CallToActions,
        RepeatedGroup::Sections,
        RepeatedGroup::LinkCards,
        RepeatedGroup::LinkBlocks,
    ];

    /// Serialized name of the group
    pub fn key(self) -> &'static str {
        match self {
            Self::CallToActions => "callToActions",
            Self::Sections => "sections",
            Self::LinkCards => "linkCards",
            Self::LinkBlocks => "linkBlocks",
        }
    }
}

impl fmt::Display for RepeatedGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RepeatedGroup {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|group| group.key() == s)
            .ok_or_else(|| LocationError::UnknownGroup(s.to_string()))
    }
}

/// Boolean switches on the document root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    IsLinkCards,
    IsLinkBlocks,
}

impl Toggle {
    pub const ALL: &'static [Toggle] = &[Toggle::IsLinkCards, Toggle::IsLinkBlocks];

    /// Serialized name of the toggle
    pub fn key(self) -> &'static str {
        match self {
            Self::IsLinkCards => "isLinkCards",
            Self::IsLinkBlocks => "isLinkBlocks",
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Toggle {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|toggle| toggle.key() == s)
            .ok_or_else(|| LocationError::UnknownToggle(s.to_string()))
    }
}

/// Address of one editable string field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldPath {
    Root(RootField),
    CallToAction(usize, CallToActionField),
    Section(usize, SectionField),
    SectionDescription(usize, DescriptionField),
    LinkCard(usize, LinkCardField),
    LinkBlock(usize, LinkBlockField),
}

impl FieldPath {
    /// The repeated group and row this path points into, if any
    ///
    /// # Returns
    /// * `Some((group, index))` - Path addresses a row of a repeated group
    /// * `None` - Path addresses a root field
    pub fn row(&self) -> Option<(RepeatedGroup, usize)> {
        match *self {
            FieldPath::Root(_) => None,
            FieldPath::CallToAction(i, _) => Some((RepeatedGroup::CallToActions, i)),
            FieldPath::Section(i, _) | FieldPath::SectionDescription(i, _) => {
                Some((RepeatedGroup::Sections, i))
            }
            FieldPath::LinkCard(i, _) => Some((RepeatedGroup::LinkCards, i)),
            FieldPath::LinkBlock(i, _) => Some((RepeatedGroup::LinkBlocks, i)),
        }
    }

    /// Every field reachable in a document with one row per group
    ///
    /// Used to list the valid locations to the user; indices are always 0.
    pub fn templates() -> Vec<FieldPath> {
        let mut paths = Vec::new();
        paths.extend(RootField::ALL.iter().map(|f| FieldPath::Root(*f)));
        paths.extend(
            CallToActionField::ALL
                .iter()
                .map(|f| FieldPath::CallToAction(0, *f)),
        );
        paths.extend(SectionField::ALL.iter().map(|f| FieldPath::Section(0, *f)));
        paths.extend(
            DescriptionField::ALL
                .iter()
                .map(|f| FieldPath::SectionDescription(0, *f)),
        );
        paths.extend(LinkCardField::ALL.iter().map(|f| FieldPath::LinkCard(0, *f)));
        paths.extend(LinkBlockField::ALL.iter().map(|f| FieldPath::LinkBlock(0, *f)));
        paths
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Root(field) => write!(f, "{}", field),
            FieldPath::CallToAction(i, field) => write!(f, "callToActions[{}].{}", i, field),
            FieldPath::Section(i, field) => write!(f, "sections[{}].{}", i, field),
            FieldPath::SectionDescription(i, field) => {
                write!(f, "sections[{}].description.{}", i, field)
            }
            FieldPath::LinkCard(i, field) => write!(f, "linkCards[{}].{}", i, field),
            FieldPath::LinkBlock(i, field) => write!(f, "linkBlocks[{}].{}", i, field),
        }
    }
}

static ROW_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<group>[A-Za-z]+)\[(?P<index>\d+)\]\.(?:(?P<nested>description)\.)?(?P<field>[A-Za-z0-9]+)$")
        .expect("row path pattern is valid")
});

impl FromStr for FieldPath {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if !s.contains('[') {
            return RootField::parse_key(s).map(FieldPath::Root);
        }

        let caps = ROW_PATH
            .captures(s)
            .ok_or_else(|| LocationError::Malformed(s.to_string()))?;

        let group: RepeatedGroup = caps["group"].parse()?;
        let index: usize = caps["index"]
            .parse()
            .map_err(|_| LocationError::Malformed(s.to_string()))?;
        let field = &caps["field"];
        let nested = caps.name("nested").is_some();

        match (group, nested) {
            (RepeatedGroup::Sections, true) => {
                DescriptionField::parse_key(field).map(|f| FieldPath::SectionDescription(index, f))
            }
            (_, true) => Err(LocationError::Malformed(s.to_string())),
            (RepeatedGroup::CallToActions, false) => {
                CallToActionField::parse_key(field).map(|f| FieldPath::CallToAction(index, f))
            }
            (RepeatedGroup::Sections, false) => {
                SectionField::parse_key(field).map(|f| FieldPath::Section(index, f))
            }
            (RepeatedGroup::LinkCards, false) => {
                LinkCardField::parse_key(field).map(|f| FieldPath::LinkCard(index, f))
            }
            (RepeatedGroup::LinkBlocks, false) => {
                LinkBlockField::parse_key(field).map(|f| FieldPath::LinkBlock(index, f))
            }
        }
    }
}
