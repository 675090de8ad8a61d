use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod parsed;

use parsed::ParsedHost;

/// Implements `jsonfield::HostEntity` for a struct with named fields.
///
/// Every field becomes an attribute named after it. Field attributes:
///
/// - `#[host(cast = "array")]` declares the cast (`array`, `json`, `object`,
///   `collection`, `string`, `integer`, `float`, `boolean`, `datetime`);
/// - `#[host(rename = "name")]` exposes the field under another attribute name;
/// - `#[host(skip)]` hides the field from the host interface.
///
/// Reads serialize the field with `serde_json::to_value`; writes deserialize with
/// `serde_json::from_value` and leave the field untouched when that fails.
///
/// ```text
/// #[derive(HostEntity)]
/// struct User {
///     #[host(cast = "array")]
///     address: serde_json::Value,
///     name: String,
/// }
/// ```
#[proc_macro_derive(HostEntity, attributes(host))]
pub fn derive_host_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedHost::from_input(&input) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
