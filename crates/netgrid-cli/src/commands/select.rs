use std::path::Path;

use netgrid_topology::{Selection, SwitchTreeEvaluator, TopologyEvaluator, hostlist};

pub fn select(
    topology: &str,
    nodes: &str,
    required: &str,
    min_member: u32,
    format: &str,
) -> anyhow::Result<()> {
    let selection = run(Path::new(topology), nodes, required, min_member)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&selection)?);
        }
        _ => {
            println!("{}", format_selection(&selection));
        }
    }

    Ok(())
}

fn run(topology: &Path, nodes: &str, required: &str, min_member: u32) -> anyhow::Result<Selection> {
    let available = hostlist::expand(nodes)?;
    let required = hostlist::expand(required)?;

    let evaluator = SwitchTreeEvaluator::new();
    evaluator.validate_switch_record(topology)?;
    Ok(evaluator.eval_nodes_tree(&available, &required, min_member)?)
}

fn format_selection(selection: &Selection) -> String {
    format!(
        "selected {} node(s) across {} leaf switch(es): {}",
        selection.nodes.len(),
        selection.leaf_switch_count,
        selection.nodes.join(", ")
    )
}
