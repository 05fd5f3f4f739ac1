//! Attribute parsing for httpbind derive macros.

use proc_macro2::{TokenStream, TokenTree};
use quote::quote;
use syn::{Attribute, LitStr};

/// Request location named by a field tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagLocation {
    Header,
    Query,
    Param,
    Form,
}

impl TagLocation {
    /// All field tags, in the order their stages usually run.
    pub(crate) const ALL: [Self; 4] = [Self::Header, Self::Query, Self::Param, Self::Form];

    /// The attribute name for this tag.
    #[must_use]
    pub(crate) const fn attr_name(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Query => "query",
            Self::Param => "param",
            Self::Form => "form",
        }
    }

    /// Path to the matching `Location` variant in generated code.
    pub(crate) fn to_tokens(self) -> TokenStream {
        match self {
            Self::Header => quote! { ::httpbind::Location::Header },
            Self::Query => quote! { ::httpbind::Location::Query },
            Self::Param => quote! { ::httpbind::Location::Param },
            Self::Form => quote! { ::httpbind::Location::Form },
        }
    }

    fn from_attr(attr: &Attribute) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|location| attr.path().is_ident(location.attr_name()))
    }
}

/// A field tag such as `#[query]` or `#[header("content-type")]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tag {
    pub(crate) location: TagLocation,
    /// Explicit key; `None` falls back to the (renamed) field name.
    pub(crate) key: Option<String>,
}

/// Field options parsed from tag attributes.
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldAttrs {
    pub(crate) tags: Vec<Tag>,
    /// Marked `#[body]`.
    pub(crate) body: bool,
    /// Marked `#[serde(skip)]` or `#[serde(skip_deserializing)]`.
    pub(crate) serde_skipped: bool,
}

/// Parse the tags and the body marker of a field.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut options = FieldAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("body") {
            attr.meta.require_path_only()?;
            options.body = true;
            continue;
        }
        if attr.path().is_ident("serde") {
            options.serde_skipped |= is_serde_skip(attr);
            continue;
        }

        let Some(location) = TagLocation::from_attr(attr) else {
            continue;
        };
        let key = match &attr.meta {
            syn::Meta::Path(_) => None,
            syn::Meta::List(meta_list) => {
                let key: LitStr = syn::parse2(meta_list.tokens.clone())?;
                if key.value().is_empty() {
                    return Err(syn::Error::new_spanned(&key, "tag key cannot be empty"));
                }
                Some(key.value())
            }
            syn::Meta::NameValue(_) => {
                return Err(syn::Error::new_spanned(
                    attr,
                    format!(
                        "expected `#[{0}]` or `#[{0}(\"key\")]`",
                        location.attr_name()
                    ),
                ));
            }
        };
        options.tags.push(Tag { location, key });
    }

    Ok(options)
}

/// Returns `true` for a top-level `skip` or `skip_deserializing` inside `#[serde(...)]`.
fn is_serde_skip(attr: &Attribute) -> bool {
    let syn::Meta::List(meta_list) = &attr.meta else {
        return false;
    };
    meta_list.tokens.clone().into_iter().any(|token| {
        matches!(token, TokenTree::Ident(ident) if ident == "skip" || ident == "skip_deserializing")
    })
}

/// Struct-level options parsed from `#[bind(...)]` attributes.
#[derive(Debug, Clone, Default)]
pub(crate) struct BindStructOptions {
    /// Rename all untagged keys using the given case convention.
    pub(crate) rename_all: Option<RenameRule>,
    /// The whole struct is the body target.
    pub(crate) body: bool,
}

/// Parse struct-level options from `#[bind(...)]` attributes.
pub(crate) fn parse_struct_options(attrs: &[Attribute]) -> syn::Result<BindStructOptions> {
    let mut options = BindStructOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("bind") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: LitStr = meta.value()?.parse()?;
                let rule = RenameRule::parse(&value.value()).ok_or_else(|| {
                    syn::Error::new_spanned(
                        &value,
                        format!(
                            "unknown rename_all value: \"{}\". Expected one of: \
                             lowercase, UPPERCASE, camelCase, PascalCase, \
                             snake_case, SCREAMING_SNAKE_CASE, kebab-case, SCREAMING-KEBAB-CASE",
                            value.value()
                        ),
                    )
                })?;
                options.rename_all = Some(rule);
                Ok(())
            } else if meta.path.is_ident("body") {
                options.body = true;
                Ok(())
            } else {
                Err(meta.error("unknown bind option, expected `rename_all` or `body`"))
            }
        })?;
    }

    Ok(options)
}

/// Case conversion rules for `rename_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub(crate) enum RenameRule {
    /// `lowercase`
    LowerCase,
    /// `UPPERCASE`
    UpperCase,
    /// `camelCase`
    CamelCase,
    /// `PascalCase`
    PascalCase,
    /// `snake_case`
    SnakeCase,
    /// `SCREAMING_SNAKE_CASE`
    ScreamingSnakeCase,
    /// `kebab-case`
    KebabCase,
    /// `SCREAMING-KEBAB-CASE`
    ScreamingKebabCase,
}

impl RenameRule {
    /// Parse a rename rule from a string.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s {
            "lowercase" => Some(Self::LowerCase),
            "UPPERCASE" => Some(Self::UpperCase),
            "camelCase" => Some(Self::CamelCase),
            "PascalCase" => Some(Self::PascalCase),
            "snake_case" => Some(Self::SnakeCase),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnakeCase),
            "kebab-case" => Some(Self::KebabCase),
            "SCREAMING-KEBAB-CASE" => Some(Self::ScreamingKebabCase),
            _ => None,
        }
    }

    /// Apply the rename rule to a field name.
    pub(crate) fn apply(self, name: &str) -> String {
        match self {
            Self::LowerCase => name.to_lowercase(),
            Self::UpperCase => name.to_uppercase(),
            Self::CamelCase => to_camel_case(name),
            Self::PascalCase => to_pascal_case(name),
            Self::SnakeCase => to_snake_case(name),
            Self::ScreamingSnakeCase => to_snake_case(name).to_uppercase(),
            Self::KebabCase => to_snake_case(name).replace('_', "-"),
            Self::ScreamingKebabCase => to_snake_case(name).to_uppercase().replace('_', "-"),
        }
    }
}

/// Convert a string to `snake_case`.
fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_lowercase().next().unwrap_or(c));
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert a string to `camelCase`.
fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_uppercase().next().unwrap_or(c));
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert a string to `PascalCase`.
fn to_pascal_case(s: &str) -> String {
    let camel = to_camel_case(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Coerce derive options parsed from `#[coerce(...)]` attributes.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CoerceOptions {
    /// Decode through `FromStr` instead of `FromText`.
    pub(crate) from_str: bool,
}

/// Parse `#[coerce(...)]` options.
pub(crate) fn parse_coerce_options(attrs: &[Attribute]) -> syn::Result<CoerceOptions> {
    let mut options = CoerceOptions::default();

    for attr in attrs {
        if !attr.path().is_ident("coerce") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("from_str") {
                options.from_str = true;
                Ok(())
            } else {
                Err(meta.error("unknown coerce option, expected `from_str`"))
            }
        })?;
    }

    Ok(options)
}
