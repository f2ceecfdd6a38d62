use std::path::Path;

use anyhow::Context;
use netgrid_topology::SwitchTree;

pub fn validate(path: &str) -> anyhow::Result<()> {
    let tree = SwitchTree::from_file(Path::new(path))
        .with_context(|| format!("invalid switch record {path}"))?;

    println!("✓ {path}");
    println!("{}", summary(&tree));
    Ok(())
}

pub(crate) fn summary(tree: &SwitchTree) -> String {
    let depth = tree.switches().iter().map(|s| s.level).max().unwrap_or(0);
    format!(
        "  switches: {} ({} leaf)\n  nodes:    {}\n  roots:    {}\n  levels:   {}",
        tree.switches().len(),
        tree.leaf_count(),
        tree.node_count(),
        tree.roots().map(|s| s.name.as_str()).collect::<Vec<_>>().join(", "),
        depth + 1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_switches_and_nodes() {
        let record = netgrid_topology::SwitchRecordFile::from_toml_str(
            r#"
[[switches]]
name = "leaf0"
nodes = "n[1-3]"

[[switches]]
name = "spine"
switches = "leaf0"
"#,
        )
        .unwrap();
        let tree = SwitchTree::from_record(&record).unwrap();

        let text = summary(&tree);
        assert!(text.contains("switches: 2 (1 leaf)"));
        assert!(text.contains("nodes:    3"));
        assert!(text.contains("roots:    spine"));
        assert!(text.contains("levels:   2"));
    }

    #[test]
    fn validate_rejects_missing_file() {
        assert!(validate("/nonexistent/topology.toml").is_err());
    }
}
