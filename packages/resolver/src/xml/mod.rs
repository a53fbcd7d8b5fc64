//! XML reading: parsing, type tag extraction and conversion to JSON.

mod convert;
mod response;
mod type_tags;
mod utils;

pub use convert::{element_to_json, to_json};
pub use response::{check_service_response, envelope_body, into_items};
pub use type_tags::{extract_type_tags, type_tag_of, TypeTag, TypeTagSet};
pub use utils::{
    declared_namespaces, element_children, get_tag_name, local_type_name,
    qualified_attribute_name, split_declared_type,
};

use roxmltree::Document;

use crate::error::Result;

/// Parse raw markup into a navigable document.
pub fn parse(raw: &str) -> Result<Document<'_>> {
    Ok(Document::parse(raw)?)
}
