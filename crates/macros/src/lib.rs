//! Procedural macros for standin.
//!
//! Provides the `#[contract]` attribute macro, which turns a trait into a
//! contract declaration and generates its adapter.

use proc_macro::TokenStream;

/// Contract attribute macro implementation.
mod contract;

/// Declares a contract and generates its runtime adapter.
///
/// Trait members are classified by marker:
/// * `#[watch]` - property whose writes notify the dispatch sink
/// * `#[property]` - plain property, stored locally only
/// * unmarked - command forwarded to the dispatch sink
///
/// Properties are declared as getters; a `set_<name>` setter is added to the
/// trait. Commands return `standin::Result<()>` (synchronous, forwarded
/// detached) or `standin::Result<standin::Pending>` (asynchronous). Command
/// member names are the UpperCamelCase form of the method name, so
/// `dispatch`, `dispatch_async`, `dispose` and `dispose_async` map onto the
/// reserved members.
///
/// ```ignore
/// #[contract]
/// pub trait Counter {
///     #[watch]
///     fn label(&self) -> Option<String>;
///     #[property]
///     fn count(&self) -> i64;
///     fn increment(&self, amount: i64) -> standin::Result<()>;
///     fn reset_async(&self) -> standin::Result<standin::Pending>;
/// }
/// ```
///
/// Generates:
/// * `COUNTER_CONTRACT` static `ContractDef`, registered via `inventory`
/// * `CounterProxy` adapter implementing `Counter`, `ContractType`,
///   `PropertyType`, `Serialize` and `Deserialize`
///
/// # Attributes
///
/// - `name = "Name"` - Optional: contract identity (default: trait name)
/// - `adapter = Ident` - Optional: adapter type name (default: `<Trait>Proxy`)
#[proc_macro_attribute]
pub fn contract(attr: TokenStream, item: TokenStream) -> TokenStream {
	contract::contract(attr, item)
}
