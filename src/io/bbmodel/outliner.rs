use std::collections::HashMap;

use super::{Element, Err, GroupEntry, OutlinerEntry};

/// A resolved outliner node borrowing from its document.
#[derive(Debug)]
pub enum OutlinerNode<'a> {
    Part(&'a Element),
    Group {
        group: &'a GroupEntry,
        children: Vec<OutlinerNode<'a>>,
    },
}

impl OutlinerNode<'_> {
    pub fn name(&self) -> &str {
        match self {
            OutlinerNode::Part(element) => &element.name,
            OutlinerNode::Group { group, .. } => &group.name,
        }
    }
}

/// Resolves the outliner of a document into a tree of borrowed nodes, in
/// authored order.
///
/// Fails on repeated element uuids and on outliner entries naming an element
/// that does not exist.
pub fn resolve<'a>(elements: &'a [Element], outliner: &'a [OutlinerEntry]) -> Result<Vec<OutlinerNode<'a>>, Err> {
    let mut lookup = HashMap::with_capacity(elements.len());
    for element in elements {
        if lookup.insert(element.uuid.as_str(), element).is_some() {
            return Err(Err::DuplicateUuid { uuid: element.uuid.clone() });
        }
    }

    let nodes = resolve_entries(outliner, &lookup)?;

    if log::log_enabled!(log::Level::Warn) {
        let mut referenced = 0;
        count_parts(&nodes, &mut referenced);
        if referenced < elements.len() {
            log::warn!("{} element(s) are not placed in the outliner and are dropped", elements.len() - referenced);
        }
    }
    Ok(nodes)
}

fn resolve_entries<'a>(
    entries: &'a [OutlinerEntry],
    lookup: &HashMap<&str, &'a Element>,
) -> Result<Vec<OutlinerNode<'a>>, Err> {
    entries.iter()
        .map(|entry| match entry {
            OutlinerEntry::Uuid(uuid) => lookup.get(uuid.as_str())
                .map(|&element| OutlinerNode::Part(element))
                .ok_or_else(|| Err::UnresolvedReference { uuid: uuid.clone() }),
            OutlinerEntry::Group(group) => Ok(OutlinerNode::Group {
                group,
                children: resolve_entries(&group.children, lookup)?,
            }),
        })
        .collect()
}

fn count_parts(nodes: &[OutlinerNode<'_>], count: &mut usize) {
    for node in nodes {
        match node {
            OutlinerNode::Part(_) => *count += 1,
            OutlinerNode::Group { children, .. } => count_parts(children, count),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::bbmodel::Document;

    fn doc(json: &str) -> Document {
        Document::from_slice(json.as_bytes()).unwrap()
    }

    fn shape(nodes: &[OutlinerNode<'_>]) -> Vec<String> {
        nodes.iter()
            .map(|n| match n {
                OutlinerNode::Part(e) => e.name.clone(),
                OutlinerNode::Group { group, children } => format!("{}{:?}", group.name, shape(children)),
            })
            .collect()
    }

    #[test]
    fn authored_order_is_kept() {
        let d = doc(r#"{
            "elements": [{"uuid": "1", "name": "a"}, {"uuid": "2", "name": "b"}, {"uuid": "3", "name": "c"}],
            "outliner": ["3", {"name": "g", "children": ["1", {"name": "empty"}, "2"]}]
        }"#);
        let nodes = resolve(&d.elements, &d.outliner).unwrap();
        assert_eq!(shape(&nodes), vec![
            "c".to_string(),
            r#"g["a", "empty[]", "b"]"#.to_string(),
        ]);
    }

    #[test]
    fn missing_reference_is_named() {
        let d = doc(r#"{"elements": [{"uuid": "1"}], "outliner": [{"name": "g", "children": ["missing-123"]}]}"#);
        match resolve(&d.elements, &d.outliner) {
            Err(Err::UnresolvedReference { uuid }) => assert_eq!(uuid, "missing-123"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn duplicate_uuid_is_rejected() {
        let d = doc(r#"{"elements": [{"uuid": "x"}, {"uuid": "x"}], "outliner": ["x"]}"#);
        assert!(matches!(resolve(&d.elements, &d.outliner), Err(Err::DuplicateUuid { uuid }) if uuid == "x"));
    }

    #[test]
    fn empty_outliner_resolves_to_nothing() {
        let d = doc(r#"{"elements": [{"uuid": "x"}]}"#);
        assert!(resolve(&d.elements, &d.outliner).unwrap().is_empty());
    }
}
