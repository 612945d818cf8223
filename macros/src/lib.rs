//! Derive macros for Magic Decoder
//!
//! This crate provides `#[derive(Bind)]`, which turns a struct with named
//! fields into a record the Magic Decoder engine can populate from route
//! variables, query strings and JSON bodies.
//!
//! # Example
//!
//! ```ignore
//! use magic_decoder_macros::Bind;
//!
//! #[derive(Bind, Default)]
//! #[bind(sources(query, path, json))]
//! struct Item {
//!     #[bind(path = "id")]
//!     id: i64,
//!     #[bind(form = "name")]
//!     name: String,
//!     #[bind(form = "pet")]
//!     pet: String,
//!     #[bind(json = "money")]
//!     money: f64,
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr,
    PathArguments, Type,
};

const JSON_NAMESPACE: &str = "json";
const FORM_NAMESPACE: &str = "form";
const PATH_NAMESPACE: &str = "path";
const SKIP_TAG: &str = "-";

/// Derive macro for bindable records
///
/// Generates an implementation of `magic_decoder_core::Bind`:
/// - a static descriptor table with each field's kind and tags
/// - typed slot accessors used by the coercion engine
/// - a JSON merge that decodes body members into `json`-tagged fields
/// - the list of request sources the record is decoded from
///
/// # Attributes
///
/// - `#[bind(<namespace> = "key")]` on a field - bind the field to `key` in
///   `namespace` (`path`, `form`, `json`, or any custom name). Text after a
///   `,` in the key is ignored, and `"-"` opts the field out.
/// - `#[bind(flatten)]` on a field - mark an embedded sub-record; it is never
///   traversed.
/// - `#[bind(sources(query, path, json))]` on the struct - the request
///   aspects to decode from, in order. Defaults to the namespaces the fields
///   use, in the order query, path, json.
///
/// The field kind is read from the declared type: `bool`, `i8`..`i64`,
/// `isize`, `u8`..`u64`, `usize`, `f32`, `f64`, `String`, `DateTime<_>`,
/// `NaiveDateTime`, `Vec` of a signed integer, and `Vec<String>`. Other
/// types are left untouched by the engine.
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to an enum, union, tuple struct or unit struct
/// - A `bind` attribute is malformed or repeats a namespace
///
/// # Example
///
/// ```ignore
/// #[derive(Bind, Default)]
/// struct Filter {
///     #[bind(form = "active")]
///     active: bool,
///     #[bind(form = "ids")]
///     ids: Vec<i64>,
///     #[bind(form = "since")]
///     since: Option<DateTime<Local>>, // unsupported, left alone
/// }
/// ```
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_bind(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Field kind as classified from the declared type.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Timestamp,
    IntList,
    StringList,
    Unsupported,
}

impl Kind {
    fn variant(self) -> Ident {
        let name = match self {
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Uint => "Uint",
            Self::Float => "Float",
            Self::String => "String",
            Self::Timestamp => "Timestamp",
            Self::IntList => "IntList",
            Self::StringList => "StringList",
            Self::Unsupported => "Unsupported",
        };
        Ident::new(name, proc_macro2::Span::call_site())
    }
}

/// Everything the derive needs to know about one field.
struct BoundField {
    ident: Ident,
    kind: Kind,
    tags: Vec<(String, String)>,
    embedded: bool,
}

impl BoundField {
    /// Binding key for `namespace`, honouring options and the skip sentinel.
    fn key(&self, namespace: &str) -> Option<String> {
        let (_, tag) = self.tags.iter().find(|(ns, _)| ns == namespace)?;
        let key = tag.split(',').next().unwrap_or_default();
        (!key.is_empty() && key != SKIP_TAG).then(|| key.to_string())
    }
}

fn expand_bind(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Bind)] can only be used on structs",
        ));
    };

    let Fields::Named(named) = &data_struct.fields else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Bind)] requires a struct with named fields",
        ));
    };

    let fields = named
        .named
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .clone()
                .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
            let (tags, embedded) = parse_field_attributes(&field.attrs)?;
            let kind = if embedded {
                Kind::Unsupported
            } else {
                classify(&field.ty)
            };
            Ok(BoundField {
                ident,
                kind,
                tags,
                embedded,
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let sources = match parse_struct_sources(&input.attrs)? {
        Some(sources) => sources,
        None => default_sources(&fields),
    };

    let descriptors = fields.iter().map(|field| {
        let field_name = field.ident.to_string();
        let kind = field.kind.variant();
        let embedded = field.embedded;
        let tags = field.tags.iter().map(|(ns, tag)| quote! { (#ns, #tag) });
        quote! {
            ::magic_decoder_core::FieldDescriptor {
                name: #field_name,
                kind: ::magic_decoder_core::FieldKind::#kind,
                tags: &[#(#tags),*],
                embedded: #embedded,
            }
        }
    });

    let slot_arms = fields.iter().enumerate().map(|(index, field)| {
        let ident = &field.ident;
        let variant = field.kind.variant();
        if field.kind == Kind::Unsupported {
            quote! { #index => ::magic_decoder_core::FieldSlot::Unsupported, }
        } else {
            quote! { #index => ::magic_decoder_core::FieldSlot::#variant(&mut self.#ident), }
        }
    });

    let json_merges = fields
        .iter()
        .filter(|field| !field.embedded)
        .filter_map(|field| {
            let key = field.key(JSON_NAMESPACE)?;
            let ident = &field.ident;
            Some(quote! {
                if let Some(value) = object.get(#key) {
                    self.#ident = ::magic_decoder_core::json::decode_field(#key, value)?;
                }
            })
        });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::magic_decoder_core::Bind for #name #ty_generics #where_clause {
            fn descriptors(&self) -> &'static [::magic_decoder_core::FieldDescriptor] {
                const DESCRIPTORS: &[::magic_decoder_core::FieldDescriptor] = &[#(#descriptors),*];
                DESCRIPTORS
            }

            fn slot(&mut self, index: usize) -> ::magic_decoder_core::FieldSlot<'_> {
                match index {
                    #(#slot_arms)*
                    _ => ::magic_decoder_core::FieldSlot::Unsupported,
                }
            }

            #[allow(unused_variables)]
            fn merge_json(
                &mut self,
                object: &::magic_decoder_core::JsonObject,
            ) -> ::magic_decoder_core::Result<()> {
                #(#json_merges)*
                Ok(())
            }

            fn sources() -> &'static [::magic_decoder_core::Source] {
                &[#(::magic_decoder_core::Source::#sources),*]
            }
        }
    })
}

/// Parse `#[bind(...)]` on a field into its tags and the flatten marker.
fn parse_field_attributes(attrs: &[Attribute]) -> syn::Result<(Vec<(String, String)>, bool)> {
    let mut tags: Vec<(String, String)> = Vec::new();
    let mut embedded = false;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("bind")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("flatten") {
                embedded = true;
                return Ok(());
            }

            let Some(namespace) = meta.path.get_ident().map(ToString::to_string) else {
                return Err(meta.error("expected a tag namespace such as `path` or `form`"));
            };

            if tags.iter().any(|(ns, _)| *ns == namespace) {
                return Err(meta.error(format!("duplicate `{namespace}` tag")));
            }

            let value: LitStr = meta.value()?.parse()?;
            tags.push((namespace, value.value()));
            Ok(())
        })?;
    }

    Ok((tags, embedded))
}

/// Parse `#[bind(sources(...))]` on the struct, if present.
fn parse_struct_sources(attrs: &[Attribute]) -> syn::Result<Option<Vec<Ident>>> {
    let mut sources: Option<Vec<Ident>> = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("bind")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("sources") {
                return Err(meta.error("expected `sources(...)`"));
            }

            let list = sources.get_or_insert_with(Vec::new);
            meta.parse_nested_meta(|source| {
                let variant = if source.path.is_ident("query") {
                    "Query"
                } else if source.path.is_ident("path") {
                    "Path"
                } else if source.path.is_ident("json") || source.path.is_ident("body") {
                    "Body"
                } else {
                    return Err(source.error("expected `query`, `path` or `json`"));
                };
                list.push(Ident::new(variant, proc_macro2::Span::call_site()));
                Ok(())
            })
        })?;
    }

    Ok(sources)
}

/// Sources implied by the namespaces the fields are tagged with.
fn default_sources(fields: &[BoundField]) -> Vec<Ident> {
    [
        (FORM_NAMESPACE, "Query"),
        (PATH_NAMESPACE, "Path"),
        (JSON_NAMESPACE, "Body"),
    ]
    .into_iter()
    .filter(|(namespace, _)| {
        fields
            .iter()
            .any(|field| !field.embedded && field.key(namespace).is_some())
    })
    .map(|(_, variant)| Ident::new(variant, proc_macro2::Span::call_site()))
    .collect()
}

/// Classify a field type by its last path segment.
fn classify(ty: &Type) -> Kind {
    let Type::Path(type_path) = ty else {
        return Kind::Unsupported;
    };
    if type_path.qself.is_some() {
        return Kind::Unsupported;
    }
    let Some(segment) = type_path.path.segments.last() else {
        return Kind::Unsupported;
    };

    match segment.ident.to_string().as_str() {
        "bool" => Kind::Bool,
        "i8" | "i16" | "i32" | "i64" | "isize" => Kind::Int,
        "u8" | "u16" | "u32" | "u64" | "usize" => Kind::Uint,
        "f32" | "f64" => Kind::Float,
        "String" => Kind::String,
        "DateTime" | "NaiveDateTime" => Kind::Timestamp,
        "Vec" => match single_type_argument(&segment.arguments).map(classify) {
            Some(Kind::Int) => Kind::IntList,
            Some(Kind::String) => Kind::StringList,
            _ => Kind::Unsupported,
        },
        _ => Kind::Unsupported,
    }
}

fn single_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(generic) = arguments else {
        return None;
    };
    match generic.args.first()? {
        GenericArgument::Type(ty) if generic.args.len() == 1 => Some(ty),
        _ => None,
    }
}
