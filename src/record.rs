use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Number of searchable free-text fields per record.
pub const FIELD_COUNT: usize = 7;

/// Joins non-empty fields in [`Record::assembled_text`].
pub const FIELD_SEPARATOR: char = ' ';

/// Searchable fields in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Prefecture,
    City,
    Town,
    Street,
    Block,
    OrgName,
    OrgAddress,
}

impl Field {
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Prefecture,
        Field::City,
        Field::Town,
        Field::Street,
        Field::Block,
        Field::OrgName,
        Field::OrgAddress,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Prefecture => "prefecture",
            Field::City => "city",
            Field::Town => "town",
            Field::Street => "street",
            Field::Block => "block",
            Field::OrgName => "org_name",
            Field::OrgAddress => "org_address",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// One address entry. Fields are fixed at construction; the assembled text
/// is computed on first use and cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RecordRow", into = "RecordRow")]
pub struct Record {
    code: String,
    fields: [String; FIELD_COUNT],
    assembled: OnceCell<String>,
}

impl Record {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }

    /// Set one field. Consumes the record so that a shared `Record` is never
    /// mutated after it has been handed out.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.fields[field.slot()] = value.into();
        self.assembled = OnceCell::new();
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn field(&self, field: Field) -> &str {
        &self.fields[field.slot()]
    }

    /// Non-empty fields in canonical order.
    pub fn searchable_fields(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        Field::ALL
            .into_iter()
            .map(move |f| (f, self.field(f)))
            .filter(|(_, v)| !v.is_empty())
    }

    /// Non-empty fields joined by [`FIELD_SEPARATOR`].
    pub fn assembled_text(&self) -> &str {
        self.assembled.get_or_init(|| {
            let mut out = String::new();
            for (_, v) in self.searchable_fields() {
                if !out.is_empty() {
                    out.push(FIELD_SEPARATOR);
                }
                out.push_str(v);
            }
            out
        })
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.fields == other.fields
    }
}

impl Eq for Record {}

/// Flat, named-key form used for JSONL input and the JSON container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordRow {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub prefecture: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub town: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub block: String,
    #[serde(default)]
    pub org_name: String,
    #[serde(default)]
    pub org_address: String,
}

impl From<RecordRow> for Record {
    fn from(r: RecordRow) -> Self {
        Record {
            code: r.code,
            fields: [
                r.prefecture,
                r.city,
                r.town,
                r.street,
                r.block,
                r.org_name,
                r.org_address,
            ],
            assembled: OnceCell::new(),
        }
    }
}

impl From<Record> for RecordRow {
    fn from(r: Record) -> Self {
        let [prefecture, city, town, street, block, org_name, org_address] = r.fields;
        RecordRow {
            code: r.code,
            prefecture,
            city,
            town,
            street,
            block,
            org_name,
            org_address,
        }
    }
}
