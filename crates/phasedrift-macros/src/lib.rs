use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Data, DeriveInput, Error, Field, Fields, Result, Type, parse_macro_input};

/// Derives `Default` for configuration structs from inline `#[default(...)]`
/// attributes.
///
/// String fields accept string literals; everything else is used as written.
///
/// # Example
/// ```
/// use phasedrift_macros::ConfigDefaults;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(ConfigDefaults, Serialize, Deserialize)]
/// #[serde(default)]
/// pub struct SimulationSection {
///     #[default("lorenz")]
///     pub system: String,
///
///     #[default(0.01)]
///     pub time_step: f64,
///
///     #[default(None)]
///     pub integrator: Option<String>,
/// }
///
/// let section = SimulationSection::default();
/// assert_eq!(section.system, "lorenz");
/// assert_eq!(section.time_step, 0.01);
/// assert_eq!(section.integrator, None);
/// ```
///
/// Every field needs a default:
///
/// ```compile_fail
/// use phasedrift_macros::ConfigDefaults;
///
/// #[derive(ConfigDefaults)]
/// struct MissingDefault {
///     #[default(42)]
///     pub first: i32,
///     pub second: String,
/// }
/// ```
#[proc_macro_derive(ConfigDefaults, attributes(default))]
pub fn config_defaults(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_config_defaults(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Derives a named numeric parameter set for a struct of scalar fields.
///
/// Each field carries its default in `#[default(...)]`. The derive generates:
///
/// - `Default`, built from those attributes;
/// - `NAMES`, the field names in declaration order;
/// - `get(name)` / `set(name, value)` for access by name;
/// - `to_map()`, a name → value snapshot.
///
/// # Example
/// ```
/// use phasedrift_macros::ParameterSet;
///
/// #[derive(ParameterSet, Debug, Clone, Copy, PartialEq)]
/// pub struct Oscillator {
///     #[default(1.0)]
///     pub mu: f64,
///     #[default(2.0 * 0.5)]
///     pub omega: f64,
/// }
///
/// let mut params = Oscillator::default();
/// assert_eq!(Oscillator::NAMES, &["mu", "omega"]);
/// assert_eq!(params.get("omega"), Some(1.0));
/// assert!(params.set("mu", 3.5));
/// assert!(!params.set("nope", 1.0));
/// assert_eq!(params.to_map()["mu"], 3.5);
/// ```
///
/// Only named-field structs are accepted:
///
/// ```compile_fail
/// use phasedrift_macros::ParameterSet;
///
/// #[derive(ParameterSet)]
/// struct Tuple(#[default(1.0)] f64);
/// ```
#[proc_macro_derive(ParameterSet, attributes(default))]
pub fn parameter_set(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_parameter_set(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_config_defaults(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let fields = named_fields(input, "ConfigDefaults")?;
    let default_impl = default_impl(input, fields)?;

    Ok(quote! { #default_impl })
}

fn expand_parameter_set(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let fields = named_fields(input, "ParameterSet")?;
    let default_impl = default_impl(input, fields)?;

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let idents: Vec<_> = fields.iter().filter_map(|f| f.ident.as_ref()).collect();
    let keys: Vec<String> = idents.iter().map(|i| i.to_string()).collect();

    Ok(quote! {
        #default_impl

        #[automatically_derived]
        impl #impl_generics #name #ty_generics #where_clause {
            /// Parameter names in declaration order.
            pub const NAMES: &'static [&'static str] = &[#(#keys),*];

            /// Value of the named parameter, if it exists.
            pub fn get(&self, name: &str) -> ::std::option::Option<f64> {
                match name {
                    #(#keys => ::std::option::Option::Some(self.#idents),)*
                    _ => ::std::option::Option::None,
                }
            }

            /// Overwrites the named parameter. Returns `false` for unknown names.
            pub fn set(&mut self, name: &str, value: f64) -> bool {
                match name {
                    #(#keys => {
                        self.#idents = value;
                        true
                    })*
                    _ => false,
                }
            }

            /// Snapshot of every parameter keyed by name.
            pub fn to_map(&self) -> ::std::collections::BTreeMap<::std::string::String, f64> {
                let mut map = ::std::collections::BTreeMap::new();
                #(map.insert(::std::string::String::from(#keys), self.#idents);)*
                map
            }
        }
    })
}

/// Fields of a struct with named fields, or a spanned error naming the derive.
fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> Result<&'a Punctuated<Field, Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            Fields::Unnamed(_) => Err(Error::new_spanned(
                input,
                format!("{derive} only supports structs with named fields"),
            )),
            Fields::Unit => Err(Error::new_spanned(
                input,
                format!("{derive} cannot be derived for unit structs"),
            )),
        },
        Data::Enum(_) => Err(Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs, not enums"),
        )),
        Data::Union(_) => Err(Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs, not unions"),
        )),
    }
}

fn default_impl(
    input: &DeriveInput,
    fields: &Punctuated<Field, Comma>,
) -> Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let initializers = fields
        .iter()
        .map(|field| {
            let ident = &field.ident;
            let value = default_value(field)?;

            if is_string(&field.ty) {
                Ok(quote! { #ident: ::std::convert::Into::into(#value) })
            } else {
                Ok(quote! { #ident: #value })
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::std::default::Default for #name #ty_generics #where_clause {
            fn default() -> Self {
                Self {
                    #(#initializers),*
                }
            }
        }
    })
}

fn is_string(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "String"),
        _ => false,
    }
}

/// Tokens inside the field's `#[default(...)]` attribute.
fn default_value(field: &Field) -> Result<proc_macro2::TokenStream> {
    let field_name = field
        .ident
        .as_ref()
        .map_or_else(|| "unnamed field".to_string(), |i| i.to_string());

    let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("default")) else {
        return Err(Error::new_spanned(
            field,
            format!("field '{field_name}' needs a #[default(...)] attribute"),
        ));
    };

    let tokens: proc_macro2::TokenStream = attr.parse_args().map_err(|e| {
        Error::new_spanned(
            attr,
            format!("could not parse #[default] on field '{field_name}': {e}"),
        )
    })?;

    if tokens.is_empty() {
        return Err(Error::new_spanned(
            attr,
            format!("field '{field_name}' has an empty #[default()]"),
        ));
    }

    Ok(tokens)
}
