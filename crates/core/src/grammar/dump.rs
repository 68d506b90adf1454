use super::ast::Group;

/// Serialize a parse tree to a pretty-printed JSON string.
pub fn to_pretty_json(root: &Group) -> String {
    serde_json::to_string_pretty(root).expect("Group serialization cannot fail")
}
