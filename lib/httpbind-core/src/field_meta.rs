//! Field metadata for runtime access.
//!
//! `#[derive(Bind)]` records, once per destination type, which field binds
//! from which key of which request location. Stages read it to decide what to
//! coerce; hosts can read it for documentation or debugging.

use std::fmt;

/// Request location a field binds from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// Header value (e.g., `#[header("content-type")]`)
    Header,
    /// Query parameter (e.g., `#[query("limit")]`)
    Query,
    /// Route parameter supplied by the host router (e.g., `#[param("id")]`)
    Param,
    /// URL-encoded form body field (e.g., `#[form("name")]`)
    Form,
}

impl Location {
    /// The tag name used in field attributes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Query => "query",
            Self::Param => "param",
            Self::Form => "form",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata about one tagged field.
///
/// A field tagged for several locations appears once per location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMeta {
    /// The field name as declared in the struct.
    pub name: &'static str,
    /// Where the value comes from.
    pub location: Location,
    /// The external key (header name, query key, route parameter name, form key).
    pub key: &'static str,
    /// The Rust type name (e.g., "u64", "Option<String>").
    pub type_name: &'static str,
}

impl FieldMeta {
    /// Fields of `fields` bound from `location`, in declaration order.
    pub fn at(fields: &'static [Self], location: Location) -> impl Iterator<Item = &'static Self> {
        fields.iter().filter(move |field| field.location == location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FIELDS: &[FieldMeta] = &[
        FieldMeta {
            name: "q",
            location: Location::Query,
            key: "q",
            type_name: "String",
        },
        FieldMeta {
            name: "person_id",
            location: Location::Param,
            key: "person_id",
            type_name: "i64",
        },
        FieldMeta {
            name: "page",
            location: Location::Query,
            key: "p",
            type_name: "Option<u32>",
        },
    ];

    #[test]
    fn location_display() {
        assert_eq!(Location::Header.to_string(), "header");
        assert_eq!(Location::Query.to_string(), "query");
        assert_eq!(Location::Param.to_string(), "param");
        assert_eq!(Location::Form.to_string(), "form");
    }

    #[test]
    fn fields_at_location_keep_declaration_order() {
        let keys: Vec<_> = FieldMeta::at(FIELDS, Location::Query)
            .map(|field| field.key)
            .collect();
        assert_eq!(keys, ["q", "p"]);

        assert_eq!(FieldMeta::at(FIELDS, Location::Param).count(), 1);
        assert_eq!(FieldMeta::at(FIELDS, Location::Header).count(), 0);
    }
}
