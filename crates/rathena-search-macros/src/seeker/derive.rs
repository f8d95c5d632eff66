//! Code generation for `#[derive(Seekable)]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument, PathArguments, Result,
    Type,
};

use super::attrs::{parse_seek_attrs, SeekType};

/// Generates the path constants and the `Seekable` impl.
pub fn seekable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Seekable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Seekable can only be derived for structs",
            ))
        }
    };

    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut leaf_arms: Vec<TokenStream> = Vec::new();
    let mut nested_lookups: Vec<TokenStream> = Vec::new();
    let mut path_pushes: Vec<TokenStream> = Vec::new();

    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let seek_attrs = parse_seek_attrs(&field.attrs)?;
        if !seek_attrs.is_exposed() {
            continue;
        }

        let query_name = seek_attrs
            .rename
            .clone()
            .unwrap_or_else(|| field_name.to_string());
        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        field_constants.push(quote! {
            /// Field path constant for type-safe queries.
            pub const #const_name: &'static str = #query_name;
        });

        if seek_attrs.nested {
            let nested_ty = if seek_attrs.optional {
                option_inner(&field.ty)?
            } else {
                &field.ty
            };
            let prefix = format!("{query_name}.");
            let lookup = quote! {
                ::rathena_search::Seekable::seeker_field_value(inner, rest)
            };
            let body = if seek_attrs.optional {
                quote! {
                    match &self.#field_name {
                        ::core::option::Option::Some(inner) => #lookup,
                        ::core::option::Option::None => ::rathena_search::Value::None,
                    }
                }
            } else {
                quote! {{
                    let inner = &self.#field_name;
                    #lookup
                }}
            };

            nested_lookups.push(quote! {
                if let ::core::option::Option::Some(rest) = path.strip_prefix(#prefix) {
                    return #body;
                }
            });
            path_pushes.push(quote! {
                paths.extend(::rathena_search::prefixed_paths(
                    #query_name,
                    <#nested_ty as ::rathena_search::Seekable>::field_paths(),
                ));
            });
            continue;
        }

        let Some(seek_type) = seek_attrs.seek_type else {
            continue;
        };
        let value = leaf_value(seek_type, &quote!(value));
        let body = if seek_attrs.optional {
            quote! {
                match &self.#field_name {
                    ::core::option::Option::Some(value) => #value,
                    ::core::option::Option::None => ::rathena_search::Value::None,
                }
            }
        } else {
            quote! {{
                let value = &self.#field_name;
                #value
            }}
        };

        leaf_arms.push(quote! {
            #query_name => #body,
        });
        path_pushes.push(quote! {
            paths.push(::std::string::String::from(#query_name));
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::rathena_search::Seekable for #struct_name #ty_generics #where_clause {
            fn seeker_field_value(&self, path: &str) -> ::rathena_search::Value<'_> {
                match path {
                    #(#leaf_arms)*
                    _ => {
                        #(#nested_lookups)*
                        ::rathena_search::Value::None
                    }
                }
            }

            #[allow(unused_mut)]
            fn field_paths() -> ::std::vec::Vec<::std::string::String> {
                let mut paths = ::std::vec::Vec::new();
                #(#path_pushes)*
                paths
            }
        }
    };

    Ok(expanded)
}

/// Expression turning `value: &T` into a `Value`.
fn leaf_value(seek_type: SeekType, value: &TokenStream) -> TokenStream {
    match seek_type {
        SeekType::String => quote! {
            ::rathena_search::Value::String(::core::convert::AsRef::<str>::as_ref(#value))
        },
        SeekType::Number => quote! {
            ::rathena_search::Value::Number(::rathena_search::Number::from(*#value))
        },
        SeekType::Timestamp => quote! {
            ::rathena_search::Value::Timestamp(
                ::rathena_search::SeekerTimestamp::seeker_timestamp(#value)
            )
        },
        SeekType::Enum => quote! {
            ::rathena_search::Value::Enum(
                ::rathena_search::SeekerEnum::seeker_discriminant(#value)
            )
        },
        SeekType::Bool => quote! {
            ::rathena_search::Value::Bool(*#value)
        },
    }
}

/// `T` of an `Option<T>` field type.
fn option_inner(ty: &Type) -> Result<&Type> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return Ok(inner);
                    }
                }
            }
        }
    }
    Err(Error::new(
        ty.span(),
        "optional fields must have type Option<_>",
    ))
}

/// Converts a field path to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if matches!(c, '_' | '-' | '.') {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("name"), "NAME");
        assert_eq!(to_screaming_snake_case("aegis_name"), "AEGIS_NAME");
        assert_eq!(to_screaming_snake_case("mvpExp"), "MVP_EXP");
        assert_eq!(to_screaming_snake_case("monster.name"), "MONSTER_NAME");
        assert_eq!(to_screaming_snake_case("attack-range"), "ATTACK_RANGE");
    }

    #[test]
    fn option_inner_type() {
        let ty: Type = syn::parse_quote!(Option<Stats>);
        let inner = option_inner(&ty).unwrap();
        assert_eq!(quote!(#inner).to_string(), "Stats");

        let ty: Type = syn::parse_quote!(::std::option::Option<u32>);
        assert!(option_inner(&ty).is_ok());

        let ty: Type = syn::parse_quote!(Vec<u32>);
        assert!(option_inner(&ty).is_err());
    }

    #[test]
    fn generates_leaf_and_nested_lookups() {
        let input: DeriveInput = syn::parse_quote! {
            struct Monster {
                #[seek(String)]
                name: String,
                #[seek(nested)]
                stats: Stats,
                #[seek(Number, optional, rename = "respawnMs")]
                respawn: Option<u64>,
                internal: u8,
            }
        };

        let code = seekable_derive_impl(input).unwrap().to_string();
        assert!(code.contains("pub const NAME"));
        assert!(code.contains("pub const STATS"));
        assert!(code.contains("pub const RESPAWN_MS"));
        assert!(!code.contains("INTERNAL"));
        assert!(code.contains("\"stats.\""));
        assert!(code.contains("Stats as"));
    }

    #[test]
    fn rejects_non_structs() {
        let input: DeriveInput = syn::parse_quote! {
            enum Element { Neutral, Water }
        };
        assert!(seekable_derive_impl(input).is_err());

        let input: DeriveInput = syn::parse_quote! {
            struct Pair(u32, u32);
        };
        assert!(seekable_derive_impl(input).is_err());
    }
}
