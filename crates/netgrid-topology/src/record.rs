//! Switch record file parser.
//!
//! A switch record describes the network hierarchy as a flat list of
//! switches. Leaf switches list the compute nodes they connect; upper-level
//! switches list their child switches.
//!
//! ```toml
//! [[switches]]
//! name = "leaf0"
//! nodes = "node[01-04]"
//!
//! [[switches]]
//! name = "leaf1"
//! nodes = "node[05-08]"
//!
//! [[switches]]
//! name = "spine"
//! switches = "leaf[0-1]"
//! link_speed = 100
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{TopologyError, TopologyResult};
use crate::hostlist;

/// The whole switch record file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SwitchRecordFile {
    #[serde(default)]
    pub switches: Vec<SwitchRecord>,
}

/// One switch entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwitchRecord {
    pub name: String,
    /// Hostlist of directly attached compute nodes.
    pub nodes: Option<String>,
    /// Hostlist of child switches.
    pub switches: Option<String>,
    /// Informational link speed; not used for selection.
    pub link_speed: Option<u32>,
}

impl SwitchRecord {
    /// Expanded names of directly attached nodes.
    pub fn node_names(&self) -> TopologyResult<Vec<String>> {
        self.nodes.as_deref().map_or(Ok(Vec::new()), hostlist::expand)
    }

    /// Expanded names of child switches.
    pub fn switch_names(&self) -> TopologyResult<Vec<String>> {
        self.switches.as_deref().map_or(Ok(Vec::new()), hostlist::expand)
    }
}

impl SwitchRecordFile {
    pub fn from_file(path: &Path) -> TopologyResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| TopologyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> TopologyResult<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_leaf_and_spine() {
        let record = SwitchRecordFile::from_toml_str(
            r#"
[[switches]]
name = "leaf0"
nodes = "n[1-2]"

[[switches]]
name = "spine"
switches = "leaf0"
link_speed = 100
"#,
        )
        .unwrap();

        assert_eq!(record.switches.len(), 2);
        assert_eq!(record.switches[0].node_names().unwrap(), vec!["n1", "n2"]);
        assert!(record.switches[0].switch_names().unwrap().is_empty());
        assert_eq!(record.switches[1].switch_names().unwrap(), vec!["leaf0"]);
        assert_eq!(record.switches[1].link_speed, Some(100));
    }

    #[test]
    fn missing_switches_table_is_empty() {
        let record = SwitchRecordFile::from_toml_str("").unwrap();
        assert!(record.switches.is_empty());
    }

    #[test]
    fn missing_name_is_a_parse_error() {
        let err = SwitchRecordFile::from_toml_str("[[switches]]\nnodes = \"n1\"\n").unwrap_err();
        assert!(matches!(err, TopologyError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SwitchRecordFile::from_file(Path::new("/nonexistent/topology.toml")).unwrap_err();
        assert!(matches!(err, TopologyError::Io { .. }));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topology.toml");
        std::fs::write(&path, "[[switches]]\nname = \"s0\"\nnodes = \"a,b\"\n").unwrap();

        let record = SwitchRecordFile::from_file(&path).unwrap();
        assert_eq!(record.switches[0].name, "s0");
    }
}
