/// Reference resolution module.
///
/// Parses the path-like entity references carried by relations and resolves
/// them into a per-document graph of related entities.
mod reference;
mod resolver;

pub use reference::{parse_reference, parse_reference_in, EntityReference};
pub use resolver::RelationResolver;
