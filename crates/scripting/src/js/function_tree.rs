//! Addressable view over the functions of a parsed script

use super::ast::{FunctionRole, NodeId};
use super::decompiler::{decompile, DecompileOptions, Decompiler};
use super::parser::ScriptTree;
use super::props::PropKind;
use jscrunch_core::{CrunchError, Result};
use serde::Serialize;

/// Summary of one function, in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionInfo {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub line: u32,
    pub depth: usize,
    /// Index of the enclosing function, if any
    pub parent: Option<usize>,
    #[serde(skip)]
    pub node: NodeId,
    #[serde(skip)]
    pub role: FunctionRole,
}

/// A script with every function, nested ones included, numbered in
/// pre-order so each can be rendered on its own
pub struct FunctionTree {
    tree: ScriptTree,
    functions: Vec<FunctionInfo>,
}

impl FunctionTree {
    pub fn new(tree: ScriptTree) -> Self {
        let mut functions = Vec::new();
        let top = tree.arena.get(tree.root).props.get_nodes(PropKind::Functions).to_vec();
        collect(&tree, &top, None, 0, &mut functions);
        Self { tree, functions }
    }

    pub fn tree(&self) -> &ScriptTree {
        &self.tree
    }

    pub fn into_tree(self) -> ScriptTree {
        self.tree
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn functions(&self) -> &[FunctionInfo] {
        &self.functions
    }

    pub fn function(&self, index: usize) -> Option<&FunctionInfo> {
        self.functions.get(index)
    }

    /// Index of the first function declared with `name`
    pub fn find(&self, name: &str) -> Option<usize> {
        self.functions
            .iter()
            .position(|f| f.name.as_deref() == Some(name))
    }

    /// Indices of the functions nested directly inside `index`
    pub fn nested(&self, index: usize) -> Vec<usize> {
        self.functions
            .iter()
            .enumerate()
            .filter(|(_, f)| f.parent == Some(index))
            .map(|(i, _)| i)
            .collect()
    }

    /// Render the whole script
    pub fn decompile(&self, options: &DecompileOptions) -> String {
        decompile(&self.tree, options)
    }

    /// Render one function, header and body
    pub fn decompile_function(&self, index: usize, options: &DecompileOptions) -> Result<String> {
        let info = self.lookup(index)?;
        let mut d = Decompiler::new(&self.tree.arena, options);
        d.function(info.node);
        Ok(d.finish())
    }

    /// Render only the statements of one function's body
    pub fn decompile_body(&self, index: usize, options: &DecompileOptions) -> Result<String> {
        let info = self.lookup(index)?;
        let mut d = Decompiler::new(&self.tree.arena, options);
        if let Some(body) = self.tree.arena.get(info.node).first() {
            d.statements(body, 0);
            d.trailing_comments(body);
        }
        Ok(d.finish())
    }

    fn lookup(&self, index: usize) -> Result<&FunctionInfo> {
        self.functions.get(index).ok_or_else(|| {
            CrunchError::InvalidArgument(format!(
                "function index {index} out of range ({} functions)",
                self.functions.len()
            ))
        })
    }
}

fn collect(
    tree: &ScriptTree,
    nodes: &[NodeId],
    parent: Option<usize>,
    depth: usize,
    out: &mut Vec<FunctionInfo>,
) {
    for &node in nodes {
        let n = tree.arena.get(node);
        let Some(data) = n.function() else {
            continue;
        };
        let index = out.len();
        out.push(FunctionInfo {
            name: data.name.clone(),
            params: data.params.clone(),
            line: n.line,
            depth,
            parent,
            node,
            role: data.role,
        });
        let nested = n.props.get_nodes(PropKind::Functions).to_vec();
        collect(tree, &nested, Some(index), depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js::parser::{parse, ParseOptions};
    use jscrunch_core::LayoutOptions;
    use pretty_assertions::assert_eq;

    const SRC: &str = "function outer(a) {\n  var f = function () { return a; };\n  function inner(b) { return b * 2; }\n  return inner(f());\n}\nvar g = function named() {};\n";

    fn tree() -> FunctionTree {
        FunctionTree::new(parse(SRC, &ParseOptions::default()).unwrap().tree)
    }

    #[test]
    fn test_preorder_numbering() {
        let ft = tree();
        let names: Vec<_> = ft.functions().iter().map(|f| f.name.clone()).collect();
        assert_eq!(
            names,
            vec![
                Some("outer".to_string()),
                None,
                Some("inner".to_string()),
                Some("named".to_string())
            ]
        );
        assert_eq!(ft.function(1).unwrap().parent, Some(0));
        assert_eq!(ft.function(2).unwrap().depth, 1);
        assert_eq!(ft.function(3).unwrap().parent, None);
        assert_eq!(ft.nested(0), vec![1, 2]);
        assert_eq!(ft.find("inner"), Some(2));
        assert_eq!(ft.function(0).unwrap().role, FunctionRole::Statement);
        assert_eq!(ft.function(1).unwrap().role, FunctionRole::Expression);
    }

    #[test]
    fn test_decompile_single_function() {
        let ft = tree();
        let compact = DecompileOptions::compact();
        assert_eq!(
            ft.decompile_function(2, &compact).unwrap(),
            "function inner(b){return b*2}"
        );
        assert!(ft.decompile_body(0, &compact).unwrap().ends_with("return inner(f())"));
        assert_eq!(
            ft.decompile_body(2, &DecompileOptions::expanded(LayoutOptions::default()))
                .unwrap(),
            "return b * 2;\n"
        );
    }

    #[test]
    fn test_index_out_of_range() {
        let err = tree().decompile_function(9, &DecompileOptions::compact()).unwrap_err();
        assert!(matches!(err, CrunchError::InvalidArgument(_)));
    }
}
