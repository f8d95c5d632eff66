//! Parsing of `#[seek(...)]` field attributes.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// Kind of value a leaf field resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekType {
    /// `#[seek(String)]`
    String,
    /// `#[seek(Number)]`
    Number,
    /// `#[seek(Timestamp)]`
    Timestamp,
    /// `#[seek(Enum)]`
    Enum,
    /// `#[seek(Bool)]`
    Bool,
}

impl SeekType {
    fn parse_name(name: &str, span: Span) -> Result<Self> {
        match name {
            "String" | "string" => Ok(SeekType::String),
            "Number" | "number" => Ok(SeekType::Number),
            "Timestamp" | "timestamp" => Ok(SeekType::Timestamp),
            "Enum" | "enum" | "enumeration" => Ok(SeekType::Enum),
            "Bool" | "bool" | "boolean" => Ok(SeekType::Bool),
            other => Err(Error::new(
                span,
                format!(
                    "unknown seek type: '{other}'. Expected one of: String, Number, Timestamp, Enum, Bool"
                ),
            )),
        }
    }

    /// Parses a seek type from a bare identifier.
    pub fn from_ident(ident: &Ident) -> Result<Self> {
        SeekType::parse_name(&ident.to_string(), ident.span())
    }
}

/// Everything `#[seek(...)]` can say about one field.
#[derive(Debug, Clone)]
pub struct SeekAttr {
    pub seek_type: Option<SeekType>,
    /// Field is another `Seekable`; its paths are exposed under this prefix.
    pub nested: bool,
    /// Field is an `Option<_>`; `None` resolves to `Value::None`.
    pub optional: bool,
    pub skip: bool,
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for SeekAttr {
    fn default() -> Self {
        SeekAttr {
            seek_type: None,
            nested: false,
            optional: false,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl SeekAttr {
    /// Returns `true` if the field is exposed at all.
    pub fn is_exposed(&self) -> bool {
        !self.skip && (self.nested || self.seek_type.is_some())
    }
}

fn string_literal(value: &syn::Expr, what: &str) -> Result<syn::LitStr> {
    match value {
        syn::Expr::Lit(syn::ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.clone()),
        other => Err(Error::new(
            other.span(),
            format!("{what} must be a string literal"),
        )),
    }
}

impl Parse for SeekAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = SeekAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) if p.is_ident("nested") => {
                    attr.nested = true;
                    attr.span = p.span();
                }
                Meta::Path(p) if p.is_ident("optional") => attr.optional = true,
                Meta::Path(p) => {
                    let ident = p.get_ident().ok_or_else(|| {
                        Error::new(
                            p.span(),
                            "expected seek type: String, Number, Timestamp, Enum, Bool, nested, optional, or skip",
                        )
                    })?;
                    attr.seek_type = Some(SeekType::from_ident(ident)?);
                    attr.span = ident.span();
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    attr.rename = Some(string_literal(&nv.value, "rename")?.value());
                }
                // `ty = "enum"` spells types that collide with keywords.
                Meta::NameValue(nv) if nv.path.is_ident("ty") => {
                    let lit = string_literal(&nv.value, "ty")?;
                    attr.seek_type = Some(SeekType::parse_name(&lit.value(), lit.span())?);
                    attr.span = lit.span();
                }
                Meta::NameValue(nv) => {
                    return Err(Error::new(
                        nv.path.span(),
                        "unknown attribute. Expected: rename or ty",
                    ));
                }
                Meta::List(_) => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown seek attribute. Expected: String, Number, Timestamp, Enum, Bool, nested, optional, skip, rename = \"...\", or ty = \"...\"",
                    ));
                }
            }
        }

        if attr.nested && attr.seek_type.is_some() {
            return Err(Error::new(
                attr.span,
                "a field is either nested or has a seek type, not both",
            ));
        }
        if attr.optional && !attr.nested && attr.seek_type.is_none() && !attr.skip {
            return Err(Error::new(
                attr.span,
                "optional needs a seek type or nested",
            ));
        }

        Ok(attr)
    }
}

/// Extracts the `#[seek(...)]` attribute of a field, if any.
pub fn parse_seek_attrs(attrs: &[Attribute]) -> Result<SeekAttr> {
    match attrs.iter().find(|attr| attr.path().is_ident("seek")) {
        Some(attr) => attr.parse_args::<SeekAttr>(),
        None => Ok(SeekAttr::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_seek(tokens: &str) -> Result<SeekAttr> {
        syn::parse_str::<SeekAttr>(tokens)
    }

    #[test]
    fn leaf_types() {
        assert_eq!(parse_seek("String").unwrap().seek_type, Some(SeekType::String));
        assert_eq!(parse_seek("Number").unwrap().seek_type, Some(SeekType::Number));
        assert_eq!(parse_seek("Timestamp").unwrap().seek_type, Some(SeekType::Timestamp));
        assert_eq!(parse_seek("Enum").unwrap().seek_type, Some(SeekType::Enum));
        assert_eq!(parse_seek("Bool").unwrap().seek_type, Some(SeekType::Bool));
        assert_eq!(parse_seek("boolean").unwrap().seek_type, Some(SeekType::Bool));
    }

    #[test]
    fn keyword_types_via_ty() {
        let attr = parse_seek(r#"ty = "enum", rename = "element""#).unwrap();
        assert_eq!(attr.seek_type, Some(SeekType::Enum));
        assert_eq!(attr.rename.as_deref(), Some("element"));
    }

    #[test]
    fn nested_and_optional_flags() {
        let attr = parse_seek("nested, optional").unwrap();
        assert!(attr.nested);
        assert!(attr.optional);
        assert!(attr.is_exposed());

        let attr = parse_seek("Number, optional").unwrap();
        assert_eq!(attr.seek_type, Some(SeekType::Number));
        assert!(attr.optional);
    }

    #[test]
    fn skip_hides_the_field() {
        let attr = parse_seek("String, skip").unwrap();
        assert!(attr.skip);
        assert!(!attr.is_exposed());
        assert!(!SeekAttr::default().is_exposed());
    }

    #[test]
    fn rejects_contradictions() {
        assert!(parse_seek("nested, String").is_err());
        assert!(parse_seek("optional").is_err());
    }

    #[test]
    fn rejects_unknown_input() {
        let err = parse_seek("Float").unwrap_err();
        assert!(err.to_string().contains("unknown seek type"));
        assert!(parse_seek("rename = 3").is_err());
        assert!(parse_seek(r#"alias = "x""#).is_err());
        assert!(parse_seek("String(x)").is_err());
    }
}
