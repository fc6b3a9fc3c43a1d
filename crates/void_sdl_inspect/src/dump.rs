//! Tree dumps, as indented text or JSON

use std::io::{self, Write};

use serde::Serialize;
use void_sdl_tree::{ItemModel, TreeError, TreeIndex, DATA_COLUMN, TYPE_COLUMN};

/// Snapshot of one tree node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DumpNode {
    pub data: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DumpNode>,
}

impl DumpNode {
    /// Snapshot the whole tree under the implicit root
    pub fn build(model: &dyn ItemModel, show_types: bool) -> Result<Self, TreeError> {
        let root = model.index(0, DATA_COLUMN, None)?;
        Self::build_node(model, root, show_types)
    }

    fn build_node(model: &dyn ItemModel, index: TreeIndex, show_types: bool) -> Result<Self, TreeError> {
        let children = (0..model.row_count(Some(index))?)
            .map(|row| {
                let child = model.index(row, DATA_COLUMN, Some(index))?;
                Self::build_node(model, child, show_types)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            data: model.data(index, DATA_COLUMN),
            type_name: show_types.then(|| model.data(index, TYPE_COLUMN)),
            children,
        })
    }

    /// Write as an indented tree
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.write_text_at(out, 0)
    }

    fn write_text_at<W: Write>(&self, out: &mut W, depth: usize) -> io::Result<()> {
        let indent = "    ".repeat(depth);
        match &self.type_name {
            Some(type_name) => writeln!(out, "{}{}  [{}]", indent, self.data, type_name)?,
            None => writeln!(out, "{}{}", indent, self.data)?,
        }
        for child in &self.children {
            child.write_text_at(out, depth + 1)?;
        }
        Ok(())
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use void_sdl::{DescriptorRegistry, Record, StateDescriptor, VarDescriptor, VarType};
    use void_sdl_tree::StateTreeModel;

    fn model() -> StateTreeModel {
        let desc = StateDescriptor::new("Door", 1)
            .with_var(VarDescriptor::new("open", VarType::Bool, 1).with_default("true"))
            .with_var(VarDescriptor::variable("tags", VarType::String));
        StateTreeModel::new(Record::new(Arc::new(desc), &DescriptorRegistry::new()).unwrap())
    }

    #[test]
    fn test_text_dump() {
        let model = model();
        let node = DumpNode::build(&model, true).unwrap();
        let mut out = Vec::new();
        node.write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "Door  [STATEDESC]\n    open  [BOOL[1]]\n        True  [BOOL]\n    tags  [STRING[]]\n"
        );
    }

    #[test]
    fn test_json_dump() {
        let model = model();
        let node = DumpNode::build(&model, false).unwrap();
        let json: serde_json::Value = serde_json::from_str(&node.to_json().unwrap()).unwrap();

        assert_eq!(json["data"], "Door");
        assert!(json.get("type").is_none());
        assert_eq!(json["children"][0]["children"][0]["data"], "True");
        assert!(json["children"][1].get("children").is_none());
    }
}
