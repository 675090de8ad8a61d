use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Data, DeriveInput, Error, Field, Fields, Generics, Ident, LitStr, Result};

/// Cast names accepted in `#[host(cast = "...")]`, with the `CastKind` variant each maps to.
const CASTS: &[(&str, &str)] = &[
    ("array", "Array"),
    ("json", "Json"),
    ("object", "Object"),
    ("collection", "Collection"),
    ("string", "String"),
    ("integer", "Integer"),
    ("int", "Integer"),
    ("float", "Float"),
    ("double", "Float"),
    ("boolean", "Boolean"),
    ("bool", "Boolean"),
    ("datetime", "Datetime"),
];

pub(crate) struct ParsedHost {
    name: Ident,
    generics: Generics,
    attributes: Vec<ParsedAttribute>,
}

struct ParsedAttribute {
    ident: Ident,
    name: String,
    cast: Option<Ident>,
}

impl ParsedHost {
    pub(crate) fn from_input(input: &DeriveInput) -> Result<Self> {
        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => &named.named,
                _ => return Err(Error::new(input.ident.span(), "HostEntity requires named fields")),
            },
            _ => return Err(Error::new(input.ident.span(), "HostEntity can only be derived for structs")),
        };

        let mut attributes: Vec<ParsedAttribute> = Vec::new();
        for field in fields {
            if let Some(parsed) = ParsedAttribute::from_field(field)? {
                if attributes.iter().any(|existing| existing.name == parsed.name) {
                    return Err(Error::new(
                        parsed.ident.span(),
                        format!("attribute `{}` is declared more than once", parsed.name),
                    ));
                }
                attributes.push(parsed);
            }
        }

        Ok(Self {
            name: input.ident.clone(),
            generics: input.generics.clone(),
            attributes,
        })
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let name = &self.name;
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let names: Vec<LitStr> = self
            .attributes
            .iter()
            .map(|attr| LitStr::new(&attr.name, Span::call_site()))
            .collect();
        let idents: Vec<&Ident> = self.attributes.iter().map(|attr| &attr.ident).collect();

        let cast_arms = self.attributes.iter().filter_map(|attr| {
            attr.cast.as_ref().map(|variant| {
                let lit = LitStr::new(&attr.name, Span::call_site());
                quote! { #lit => ::core::option::Option::Some(::jsonfield::host::CastKind::#variant), }
            })
        });

        quote! {
            impl #impl_generics ::jsonfield::host::HostEntity for #name #ty_generics #where_clause {
                fn attribute(&self, name: &str) -> ::core::option::Option<::jsonfield::__serde_json::Value> {
                    match name {
                        #( #names => ::jsonfield::__serde_json::to_value(&self.#idents).ok(), )*
                        _ => ::core::option::Option::None,
                    }
                }

                #[allow(unused_variables)]
                fn set_attribute(
                    &mut self,
                    name: &str,
                    value: ::jsonfield::__serde_json::Value,
                ) -> ::core::result::Result<(), ::jsonfield::errors::FieldError> {
                    match name {
                        #( #names => {
                            self.#idents = ::jsonfield::__serde_json::from_value(value)?;
                            ::core::result::Result::Ok(())
                        } )*
                        _ => ::core::result::Result::Err(::jsonfield::errors::FieldError::UnknownAttribute {
                            attribute: name.to_string(),
                        }),
                    }
                }

                fn cast(&self, name: &str) -> ::core::option::Option<::jsonfield::host::CastKind> {
                    match name {
                        #( #cast_arms )*
                        _ => ::core::option::Option::None,
                    }
                }
            }
        }
    }
}

impl ParsedAttribute {
    /// `None` for fields marked `#[host(skip)]`.
    fn from_field(field: &Field) -> Result<Option<Self>> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new(Span::call_site(), "HostEntity requires named fields"))?;
        let mut name = ident.to_string().trim_start_matches("r#").to_string();
        let mut cast = None;
        let mut skip = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("host") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("cast") {
                    let value: LitStr = meta.value()?.parse()?;
                    let raw = value.value();
                    let variant = CASTS
                        .iter()
                        .find(|(known, _)| *known == raw)
                        .map(|(_, variant)| *variant)
                        .ok_or_else(|| {
                            let expected: Vec<&str> = CASTS.iter().map(|(known, _)| *known).collect();
                            Error::new(
                                value.span(),
                                format!("unknown cast `{raw}`, expected one of {}", expected.join(", ")),
                            )
                        })?;
                    cast = Some(Ident::new(variant, value.span()));
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    if value.value().is_empty() {
                        return Err(meta.error("rename requires a non-empty attribute name"));
                    }
                    name = value.value();
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported host attribute, expected `cast`, `rename` or `skip`"))
                }
            })?;
        }

        if skip {
            if cast.is_some() {
                return Err(Error::new(ident.span(), "a skipped field cannot declare a cast"));
            }
            return Ok(None);
        }

        Ok(Some(Self { ident, name, cast }))
    }
}
