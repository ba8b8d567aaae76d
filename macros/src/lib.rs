mod model;
mod route;

use proc_macro::TokenStream;

/// Creates a documentation function for the route, named after the original function with the suffix `_docs`.
///
/// The first line of the doc comment becomes the summary, the rest becomes the description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::from_input(args, input)
}

/// Creates two input structs for a stored model: `CreateXInput` and `UpdateXInput`.
///
/// Fields marked `#[serde(skip_deserializing)]` or `#[serde(skip)]` are server-owned and
/// left out of both. In `UpdateXInput` every remaining field is wrapped in an `Option`.
/// Row-mapping derives and `#[sqlx]` attributes are not forwarded to the inputs.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::from_input(input)
}
