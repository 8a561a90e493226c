//! Data models for exported database objects.
//!
//! A [`SqlObject`] is one exported object: its schema, name, kind, and raw
//! DDL text. Objects are produced by the row streaming adapter and consumed
//! by the export writer; nothing in between mutates them.

use serde::{Deserialize, Serialize};

/// The five exported object categories.
///
/// The declaration order here is also the extraction order; see
/// [`ObjectKind::CATEGORY_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Schema,
    Table,
    Function,
    Procedure,
    View,
}

impl ObjectKind {
    /// Fixed extraction order: schemas, tables, functions, procedures, views.
    ///
    /// The order is a documented convention, not a data dependency; no
    /// category's query reads another category's output.
    pub const CATEGORY_ORDER: [Self; 5] = [
        Self::Schema,
        Self::Table,
        Self::Function,
        Self::Procedure,
        Self::View,
    ];

    /// The type literal carried in the third result column of every
    /// category query.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Schema => "SCHEMA",
            Self::Table => "TABLE",
            Self::Function => "FUNCTION",
            Self::Procedure => "PROCEDURE",
            Self::View => "VIEW",
        }
    }

    /// The category directory name under `<output>/<server>/<database>/`.
    #[must_use]
    pub const fn directory(self) -> &'static str {
        match self {
            Self::Schema => "schemas",
            Self::Table => "tables",
            Self::Function => "functions",
            Self::Procedure => "procedures",
            Self::View => "views",
        }
    }

    /// Plural label used in progress messages ("==== Writing Schemas ...").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Schema => "Schemas",
            Self::Table => "Tables",
            Self::Function => "Functions",
            Self::Procedure => "Procedures",
            Self::View => "Views",
        }
    }

    /// Parses the wire-level type literal back into a kind.
    #[must_use]
    pub fn from_wire(literal: &str) -> Option<Self> {
        match literal {
            "SCHEMA" => Some(Self::Schema),
            "TABLE" => Some(Self::Table),
            "FUNCTION" => Some(Self::Function),
            "PROCEDURE" => Some(Self::Procedure),
            "VIEW" => Some(Self::View),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One exported database object.
///
/// Identity is `(schema, name, kind)`; `definition` is the raw DDL source
/// text as returned by the server (or synthesized, for schemas).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlObject {
    /// Schema the object belongs to
    pub schema: String,
    /// Object name; becomes the file name (`<name>.sql`)
    pub name: String,
    /// Object category
    pub kind: ObjectKind,
    /// Raw DDL source text
    pub definition: String,
}

impl SqlObject {
    /// Creates a new object record.
    pub fn new(
        schema: impl Into<String>,
        name: impl Into<String>,
        kind: ObjectKind,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            kind,
            definition: definition.into(),
        }
    }

    /// Renders the text written to disk for this object.
    ///
    /// With `include_header`, a comment block with schema, type, object
    /// name, and export timestamp (RFC 3339 UTC) precedes the definition.
    /// The definition's line endings are normalized to `\n` and the result
    /// ends with exactly one trailing newline.
    #[must_use]
    pub fn sql_definition(&self, include_header: bool) -> String {
        let mut out = String::new();
        if include_header {
            out.push_str("/*\n");
            out.push_str(&format!("Schema: {}\n", self.schema));
            out.push_str(&format!("Type: {}\n", self.kind));
            out.push_str(&format!("ObjectName: {}\n", self.name));
            out.push_str(&format!(
                "Execution: {}\n",
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
            ));
            out.push_str("*/\n");
        }
        let normalized = normalize_line_endings(&self.definition);
        out.push_str(normalized.trim_end_matches('\n'));
        out.push('\n');
        out
    }

    /// File name for this object under its category directory.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.sql", self.name)
    }
}

/// Normalizes `\r\n` and bare `\r` line endings to `\n`.
#[must_use]
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
