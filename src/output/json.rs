//! JSON rendering of the package tree.
//!
//! Same content as the markup document, shaped by the serde derives on the
//! tree model: nodes carry `id`, `name` and `type`, containers their
//! `children`, `child_stats` and optional `aggregate`.

use crate::tree::Tree;
use crate::utils::error::OutputError;
use log::debug;

/// Serialize the tree to pretty-printed JSON
///
/// **Public** - alternative to the markup document
///
/// # Errors
/// * `OutputError::SerializationFailed` - JSON serialization error
pub fn tree_to_json(tree: &Tree) -> Result<String, OutputError> {
    let mut json = serde_json::to_string_pretty(tree).map_err(OutputError::SerializationFailed)?;
    json.push('\n');
    debug!("Rendered tree as JSON ({} bytes)", json.len());
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::compute_tree_statistics;
    use crate::parser::Record;

    #[test]
    fn test_tree_json_shape() {
        let mut tree = Tree::with_separator('/');
        tree.insert(&"7 3 10 42 20 pkg/file.cpp(42): foo".parse::<Record>().unwrap());
        compute_tree_statistics(&mut tree);

        let json = tree_to_json(&tree).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let pkg = &value["roots"]["pkg"];
        assert_eq!(pkg["id"], 3);
        assert_eq!(pkg["type"], "package");
        assert_eq!(pkg["child_stats"]["1"]["mmcc"], 7);
        assert_eq!(pkg["aggregate"]["median"]["lif"], 20);

        let file = &pkg["children"]["file.cpp"];
        assert_eq!(file["type"], "file");
        assert_eq!(file["source_path"], "pkg/file.cpp");

        let item = &file["children"]["foo(42):"];
        assert_eq!(item["type"], "item");
        assert_eq!(item["name"], "foo");
        assert_eq!(item["flf"], 42);
    }

    #[test]
    fn test_tree_without_statistics_omits_aggregate() {
        let mut tree = Tree::with_separator('/');
        tree.insert(&"1 1 1 1 1 a.cpp(1): f".parse::<Record>().unwrap());
        let value: serde_json::Value = serde_json::from_str(&tree_to_json(&tree).unwrap()).unwrap();
        assert!(value["roots"]["a.cpp"].get("aggregate").is_none());
    }
}
