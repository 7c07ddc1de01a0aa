//! # Graph Command Implementation
//!
//! Displays the collected modules as a tree rooted at the project, where each
//! module sits below the module that imported (or vendored) it.
//!
//! A module imported by several others appears once, under the importer
//! that was walked first.

use anyhow::Result;
use clap::Args;
use ptree::{print_tree, TreeItem};

use site_modules::module::{Module, ModulesConfig};
use site_modules::output::{module_label, OutputConfig};

use super::SourceArgs;

/// Show the module import graph
#[derive(Args, Debug, Default)]
pub struct GraphArgs {
    /// Maximum depth to display; 0 shows only the project.
    #[arg(long, value_name = "NUM")]
    pub depth: Option<usize>,
}

/// Execute the `graph` command.
pub fn execute(args: GraphArgs, source: &SourceArgs, output: &OutputConfig) -> Result<()> {
    let collected = super::collect(source)?;
    let root = build_graph(&collected, output, args.depth.unwrap_or(usize::MAX))
        .ok_or_else(|| anyhow::anyhow!("No project module was collected"))?;

    print_tree(&root).map_err(|e| anyhow::anyhow!("Failed to display graph: {}", e))?;
    Ok(())
}

/// Build the display tree, or `None` if there is no project module.
pub fn build_graph(collected: &ModulesConfig, output: &OutputConfig, max_depth: usize) -> Option<GraphNode> {
    collected
        .project()
        .map(|project| build_node(collected, project, output, max_depth, 0))
}

fn build_node(
    collected: &ModulesConfig,
    module: &Module,
    output: &OutputConfig,
    max_depth: usize,
    depth: usize,
) -> GraphNode {
    let label = module_label(output, module);
    if depth >= max_depth {
        return GraphNode {
            label,
            children: vec![],
        };
    }

    let children = collected
        .children_of(module)
        .map(|child| build_node(collected, child, output, max_depth, depth + 1))
        .collect();
    GraphNode { label, children }
}

/// Tree node structure for ptree visualization
#[derive(Clone, Debug)]
pub struct GraphNode {
    label: String,
    children: Vec<GraphNode>,
}

impl TreeItem for GraphNode {
    type Child = GraphNode;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _style: &ptree::Style) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<'_, [Self::Child]> {
        std::borrow::Cow::Borrowed(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_modules::config::ModuleConfig;
    use std::path::Path;

    fn imported(path: &str, dir: &str, owner: &Module) -> Module {
        let mut module = Module::project(None, Path::new(dir), ModuleConfig::default());
        module.is_project = false;
        module.path = path.to_string();
        module.owner = Some(owner.as_owner());
        module
    }

    fn collected() -> ModulesConfig {
        let project = Module::project(None, Path::new("/site"), ModuleConfig::default());
        let a = imported("a", "/site/themes/a/", &project);
        let b = imported("b", "/site/themes/b/", &a);
        let c = imported("c", "/site/themes/c/", &project);
        ModulesConfig {
            all_modules: vec![a, b, c, project],
            ..Default::default()
        }
    }

    fn render(node: &GraphNode) -> String {
        let mut out = Vec::new();
        ptree::write_tree(node, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_graph_follows_owners() {
        let root = build_graph(&collected(), &OutputConfig::without_color(), usize::MAX).unwrap();
        assert_eq!(root.label, "project [project]");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].label, "a");
        assert_eq!(root.children[0].children[0].label, "b");
        assert_eq!(root.children[1].label, "c");

        let text = render(&root);
        assert!(text.contains("project [project]"));
        assert!(text.contains("b"));
    }

    #[test]
    fn test_graph_depth_limit() {
        let root = build_graph(&collected(), &OutputConfig::without_color(), 1).unwrap();
        assert_eq!(root.children.len(), 2);
        assert!(root.children[0].children.is_empty());
    }

    #[test]
    fn test_graph_without_project() {
        let empty = ModulesConfig::default();
        assert!(build_graph(&empty, &OutputConfig::without_color(), usize::MAX).is_none());
    }
}
