//! Column schema for the equipment import file.
//!
//! The importer reads two kinds of columns: native asset attributes
//! (`title`, `location`, ...) and custom fields whose header encodes a display
//! name and a field type as `cf:<Name>,type:<kind>`. Both are modelled as a
//! [`ColumnDescriptor`]; the fixed column order lives in [`Column::ALL`].

use std::borrow::Cow;
use std::fmt;

const CUSTOM_FIELD_PREFIX: &str = "cf:";
const TYPE_MARKER: &str = ",type:";

/// Declared type of a custom field column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    MultilineText,
    Option,
    Date,
    Boolean,
    Number,
    Amount,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::MultilineText => "multiline_text",
            FieldKind::Option => "option",
            FieldKind::Date => "date",
            FieldKind::Boolean => "boolean",
            FieldKind::Number => "number",
            FieldKind::Amount => "amount",
        }
    }
}

impl std::str::FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(FieldKind::Text),
            "multiline_text" | "multiline text" | "multiline" => Ok(FieldKind::MultilineText),
            "option" => Ok(FieldKind::Option),
            "date" => Ok(FieldKind::Date),
            "boolean" => Ok(FieldKind::Boolean),
            "number" => Ok(FieldKind::Number),
            "amount" => Ok(FieldKind::Amount),
            _ => Err(format!(
                "Unknown custom field type: {}. Valid types: text, multiline_text, option, date, boolean, number, amount",
                s
            )),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name plus optional custom field type of one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: Cow<'static, str>,
    /// `None` for native columns, `Some` for `cf:` custom fields
    pub kind: Option<FieldKind>,
}

impl ColumnDescriptor {
    pub const fn native(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            kind: None,
        }
    }

    pub const fn custom(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name: Cow::Borrowed(name),
            kind: Some(kind),
        }
    }

    pub fn is_custom_field(&self) -> bool {
        self.kind.is_some()
    }

    /// Header text as the importer expects it
    pub fn header(&self) -> String {
        match self.kind {
            Some(kind) => format!("{}{}{}{}", CUSTOM_FIELD_PREFIX, self.name, TYPE_MARKER, kind),
            None => self.name.to_string(),
        }
    }

    /// Parse a single header cell. Custom fields without a `,type:` suffix
    /// are treated as text, which is what the importer does.
    pub fn parse(header: &str) -> anyhow::Result<Self> {
        let header = header.trim();
        if header.is_empty() {
            anyhow::bail!("empty column header");
        }

        let Some(rest) = header.strip_prefix(CUSTOM_FIELD_PREFIX) else {
            return Ok(Self {
                name: Cow::Owned(header.to_string()),
                kind: None,
            });
        };

        let (name, kind) = match rest.rfind(TYPE_MARKER) {
            Some(pos) => {
                let kind: FieldKind = rest[pos + TYPE_MARKER.len()..]
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))?;
                (&rest[..pos], kind)
            }
            None => (rest, FieldKind::Text),
        };

        if name.trim().is_empty() {
            anyhow::bail!("custom field header has no name: {}", header);
        }

        Ok(Self {
            name: Cow::Owned(name.trim().to_string()),
            kind: Some(kind),
        })
    }
}

impl fmt::Display for ColumnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header())
    }
}

/// The columns of an equipment record, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title,
    Description,
    Category,
    Tags,
    Location,
    Valuation,
    Custodian,
    AssetId,
    Manufacturer,
    PurchaseDate,
    WarrantyExpiry,
    LastCalibration,
    OperationalStatus,
    RequiresCertification,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::Title,
        Column::Description,
        Column::Category,
        Column::Tags,
        Column::Location,
        Column::Valuation,
        Column::Custodian,
        Column::AssetId,
        Column::Manufacturer,
        Column::PurchaseDate,
        Column::WarrantyExpiry,
        Column::LastCalibration,
        Column::OperationalStatus,
        Column::RequiresCertification,
    ];

    pub const fn descriptor(self) -> ColumnDescriptor {
        match self {
            Column::Title => ColumnDescriptor::native("title"),
            Column::Description => ColumnDescriptor::native("description"),
            Column::Category => ColumnDescriptor::native("category"),
            Column::Tags => ColumnDescriptor::native("tags"),
            Column::Location => ColumnDescriptor::native("location"),
            Column::Valuation => ColumnDescriptor::native("valuation"),
            Column::Custodian => ColumnDescriptor::native("custodian"),
            Column::AssetId => ColumnDescriptor::custom("Asset ID", FieldKind::Text),
            Column::Manufacturer => ColumnDescriptor::custom("Manufacturer", FieldKind::Option),
            Column::PurchaseDate => ColumnDescriptor::custom("Purchase date", FieldKind::Date),
            Column::WarrantyExpiry => ColumnDescriptor::custom("Warranty expiry", FieldKind::Date),
            Column::LastCalibration => ColumnDescriptor::custom("Last calibration", FieldKind::Date),
            Column::OperationalStatus => {
                ColumnDescriptor::custom("Operational status", FieldKind::Option)
            }
            Column::RequiresCertification => {
                ColumnDescriptor::custom("Requires certification", FieldKind::Boolean)
            }
        }
    }

    /// Position of this column in [`Column::ALL`]
    pub fn position(self) -> usize {
        Column::ALL
            .iter()
            .position(|c| *c == self)
            .unwrap_or_default()
    }
}

/// Header cells for the given columns, unquoted
pub fn header_cells(columns: &[Column]) -> Vec<String> {
    columns.iter().map(|c| c.descriptor().header()).collect()
}
